//! aidict CLI - inspect and maintain the aidict database
//!
//! - `init`: create the schema and run the recovery sweep
//! - `dialog`: create, fork and read dialogues
//! - `feed`: the newest dialogues and words
//! - `word`: read and delete word records
//!
//! Every command prints pretty JSON on stdout.

use std::sync::Arc;

use aidict_core::config::load_dotenv;
use aidict_core::prompt::PromptCatalog;
use aidict_core::{AidictConfig, AppState};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;

mod backend;
mod commands;
mod tracing_setup;

use backend::OfflineBackend;
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "aidict",
    author,
    version,
    about = "Inspect and maintain the aidict dialogue and word database"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Database URL (overrides config files)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the schema and remove words left processing by a previous run
    Init,
    /// Dialogue operations (create, fork, show)
    Dialog(commands::dialog::DialogArgs),
    /// Recent activity feeds (chats, words)
    Feed(commands::feed::FeedArgs),
    /// Word record operations (show, get, delete)
    Word(commands::word::WordArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    let config = AidictConfig::load().with_database_url(cli.database_url);
    debug!(database = %config.database.url, "using database");

    let generator = Arc::new(PromptCatalog::with_version(
        OfflineBackend,
        config.prompt.version.clone(),
    ));
    let state = AppState::connect(&config, generator)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;

    match cli.command {
        Commands::Init => {
            let removed = state.recover().await.context("Recovery sweep failed")?;
            commands::print_json(&json!({
                "database": config.database.url,
                "removed_processing_words": removed,
            }))?;
        }
        Commands::Dialog(args) => commands::run_dialog(&state, args).await?,
        Commands::Feed(args) => commands::run_feed(&state, args).await?,
        Commands::Word(args) => commands::run_word(&state, args).await?,
    }

    state.pool().close().await;
    Ok(())
}
