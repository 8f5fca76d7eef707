//! `blnt context` - ask the model with a project context file prepended

use anyhow::Context as _;
use blnt_foundation::BlntConfig;
use blnt_provider::LlmBackend;
use std::path::Path;
use tracing::debug;

/// Default context file, resolved against the working directory
pub const DEFAULT_CONTEXT_FILE: &str = "BLNT.md";

pub async fn run_context(
    config: &BlntConfig,
    query: &str,
    file: &Path,
    model: Option<&str>,
) -> anyhow::Result<()> {
    let context = load_context(file)?;
    match &context {
        Some(_) => eprintln!("📄 Loading context from: {}", file.display()),
        None => eprintln!(
            "⚠️  Context file not found: {}. Proceeding without context.",
            file.display()
        ),
    }

    let backend = LlmBackend::select(&config.provider, None).await?;
    eprintln!("📡 Using: {}", backend.name());

    let prompt = build_prompt(context.as_deref(), query);
    debug!(prompt_len = prompt.len(), "Context query");

    let response = backend.generate(&prompt, model).await?;
    println!("{}", response);
    Ok(())
}

/// File contents, or `None` when the file does not exist
pub fn load_context(file: &Path) -> anyhow::Result<Option<String>> {
    if !file.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read context file {}", file.display()))?;
    Ok(Some(content))
}

/// Question alone, or the context followed by the question
pub fn build_prompt(context: Option<&str>, query: &str) -> String {
    match context {
        Some(context) if !context.is_empty() => {
            format!("Context:\n{}\n\nQuestion: {}", context, query)
        }
        _ => query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_prompt() {
        assert_eq!(build_prompt(None, "why?"), "why?");
        assert_eq!(build_prompt(Some(""), "why?"), "why?");
        assert_eq!(
            build_prompt(Some("A CLI tool."), "What is it?"),
            "Context:\nA CLI tool.\n\nQuestion: What is it?"
        );
    }

    #[test]
    fn test_load_context() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# Project").unwrap();

        assert_eq!(load_context(file.path()).unwrap().as_deref(), Some("# Project"));
        assert!(load_context(Path::new("/nonexistent/BLNT.md")).unwrap().is_none());
    }
}
