//! `blnt query` and `blnt models`

use blnt_foundation::BlntConfig;
use blnt_provider::{LlmBackend, OllamaClient};

/// Run a single prompt against the selected backend
pub async fn run_query(
    config: &BlntConfig,
    prompt: &str,
    model: Option<&str>,
) -> anyhow::Result<()> {
    let backend = LlmBackend::select(&config.provider, None).await?;
    eprintln!("📡 Using: {}", backend.name());

    let response = backend.chat(prompt, model).await?;
    println!("{}", response);
    Ok(())
}

pub async fn list_models(config: &BlntConfig) -> anyhow::Result<()> {
    let client = OllamaClient::from_settings(&config.provider)?;
    if !client.ping().await {
        anyhow::bail!(
            "Ollama is not reachable at {}. Please ensure Ollama is running.",
            client.base_url()
        );
    }
    let models = client.list_models().await?;

    if models.is_empty() {
        println!(
            "No models installed. Pull one with 'ollama pull {}'.",
            client.model()
        );
        return Ok(());
    }

    println!("\nAvailable models ({}):\n", client.base_url());
    let tagged = format!("{}:", client.model());
    for name in models {
        let marker = if name == client.model() || name.starts_with(&tagged) {
            "*"
        } else {
            " "
        };
        println!(" {} {}", marker, name);
    }
    println!();
    Ok(())
}
