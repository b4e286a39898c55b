//! thinkloop CLI — the main entry point.
//!
//! Commands:
//! - `react`   — Answer a question with the ReAct agent and web search
//! - `plan`    — Answer a question with Plan-and-Solve
//! - `chat`    — Stream a single completion (gateway smoke test)
//! - `tools`   — List the registered tools
//! - `config`  — Show the effective configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "thinkloop",
    about = "thinkloop — ReAct and Plan-and-Solve agents over any OpenAI-compatible model",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question with the ReAct agent
    React {
        /// The question to answer
        question: String,

        /// Override the step budget
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Answer a question by planning first, then solving step by step
    Plan {
        /// The question to answer
        question: String,
    },

    /// Stream a single completion to stdout
    Chat {
        /// The user prompt
        prompt: String,

        /// Optional system prompt
        #[arg(short, long)]
        system: Option<String>,
    },

    /// List the tools available to the ReAct agent
    Tools,

    /// Show the effective configuration
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::React {
            question,
            max_steps,
        } => commands::react::run(&question, max_steps).await?,
        Commands::Plan { question } => commands::plan::run(&question).await?,
        Commands::Chat { prompt, system } => commands::chat::run(&prompt, system).await?,
        Commands::Tools => commands::tools::run()?,
        Commands::Config { default } => commands::config_cmd::show(default)?,
    }

    Ok(())
}
