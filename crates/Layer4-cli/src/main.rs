//! BLNT CLI - Main entry point

mod agent;
mod config;
mod context;
mod executors;
mod init;
mod output;
mod query;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// BLNT - browser, desktop and terminal automation with a local LLM
#[derive(Parser, Debug)]
#[command(name = "blnt")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize BLNT in the current directory
    Init {
        /// Overwrite an existing project configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Autonomous agent operations
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },
    /// Ask the language model a single question
    Query {
        prompt: String,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Ask the language model with a context file prepended
    Context {
        query: String,

        /// Context file to use
        #[arg(short, long, default_value = context::DEFAULT_CONTEXT_FILE)]
        file: PathBuf,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },
    /// List models available on the local Ollama server
    Models,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print one value, e.g. `agent.maxConcurrentTasks`
    Get { key: String },
    /// Change one value
    Set {
        key: String,
        value: String,

        /// Write to the project file instead of the global one
        #[arg(long)]
        project: bool,
    },
    /// Restore defaults
    Reset {
        /// Reset the project file instead of the global one
        #[arg(long)]
        project: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgentAction {
    /// Run the agent against a goal or a task plan
    Run {
        /// Agent goal/objective
        #[arg(short, long, required_unless_present = "plan")]
        goal: Option<String>,

        /// JSON file holding an array of tasks
        #[arg(short, long, conflicts_with = "goal")]
        plan: Option<PathBuf>,

        /// Drain with up to agent.maxConcurrentTasks tasks in flight
        #[arg(long)]
        concurrent: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Print task reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Execute a single task
    Task {
        /// Task type (browser, desktop, terminal, composite)
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Task description
        #[arg(short, long)]
        description: String,

        /// Print the task report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show agent status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = blnt_foundation::BlntConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}", e);
        blnt_foundation::BlntConfig::default()
    });

    // Initialize logging
    let log_level = if args.debug {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match args.command {
        Command::Init { force } => init::init_project(force),
        Command::Config { action } => config::run(action, &config),
        Command::Agent { action } => agent::run(action, &config).await,
        Command::Query { prompt, model } => {
            query::run_query(&config, &prompt, model.as_deref()).await
        }
        Command::Context { query, file, model } => {
            context::run_context(&config, &query, &file, model.as_deref()).await
        }
        Command::Models => query::list_models(&config).await,
    }
}
