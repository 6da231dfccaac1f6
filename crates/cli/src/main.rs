//! toolwise CLI — the main entry point.
//!
//! Commands:
//! - `budget`   — Token budget for a conversation
//! - `select`   — Pick a tool from ranked candidates
//! - `catalog`  — Pick a tool from the full catalog
//! - `screen`   — Decide whether a request needs a tool
//! - `assemble` — Fill a tool schema field by field
//! - `config`   — Show, locate, validate or create the config file
//! - `doctor`   — Diagnose setup

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod input;
mod terminal;

#[derive(Parser)]
#[command(
    name = "toolwise",
    about = "toolwise — decide when and which tool an assistant should call",
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
    /// Show how many generation tokens a conversation leaves
    Budget {
        /// Conversation JSON file (`-` for stdin)
        #[arg(short, long)]
        conversation: PathBuf,

        /// Tool schemas JSON file counted as prompt overhead
        #[arg(short, long)]
        tools: Option<PathBuf>,

        /// Override the configured model
        #[arg(short, long, env = "TOOLWISE_MODEL")]
        model: Option<String>,
    },

    /// Select among ranked tool candidates
    Select {
        /// Candidates JSON file (`[{"name": ..., "distance": ...}]`)
        #[arg(short, long)]
        candidates: PathBuf,

        /// Tool schemas JSON file offered after "more ..."
        #[arg(short, long)]
        tools: Option<PathBuf>,

        /// Tool dependence entry, `<dependence>[!<threshold>]`
        #[arg(short, long)]
        dependence: Option<String>,
    },

    /// Select any tool from a catalog
    Catalog {
        /// Tool schemas JSON file
        #[arg(short, long)]
        tools: PathBuf,
    },

    /// Screen a request through the guided dialogue
    Screen {
        /// The user request
        request: String,
    },

    /// Fill a tool schema field by field
    Assemble {
        /// Tool schema JSON file
        #[arg(short, long)]
        schema: PathBuf,

        /// Conversation JSON file used as context
        #[arg(short, long)]
        conversation: Option<PathBuf>,

        /// Request the answers should focus on
        #[arg(short, long)]
        request: Option<String>,

        /// Print a single JSON object
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration and tokenizer setup
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Validate the config file
    Validate,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Budget {
            conversation,
            tools,
            model,
        } => commands::budget::run(&conversation, tools.as_deref(), model).await?,
        Commands::Select {
            candidates,
            tools,
            dependence,
        } => commands::select::run(&candidates, tools.as_deref(), dependence.as_deref()).await?,
        Commands::Catalog { tools } => commands::catalog::run(&tools).await?,
        Commands::Screen { request } => commands::screen::run(&request).await?,
        Commands::Assemble {
            schema,
            conversation,
            request,
            json,
        } => {
            commands::assemble::run(&schema, conversation.as_deref(), request.as_deref(), json).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Init { force } => commands::config_cmd::init(force).await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
