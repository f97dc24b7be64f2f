//! Word commands
//!
//! Commands: show, get, delete

use aidict_core::AppState;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use super::print_json;

#[derive(Parser, Debug)]
pub struct WordArgs {
    #[command(subcommand)]
    pub command: WordCommands,
}

#[derive(Subcommand, Debug)]
pub enum WordCommands {
    /// Full record by word ID
    Show {
        /// Word ID
        word_id: String,
    },
    /// Summary by word text
    Get {
        /// Word text
        word: String,
    },
    /// Delete a word record
    Delete {
        /// Word ID
        word_id: String,
    },
}

pub async fn run_word(state: &AppState, args: WordArgs) -> Result<()> {
    match args.command {
        WordCommands::Show { word_id } => {
            let info = state
                .words()
                .get_by_id(&word_id)
                .await
                .with_context(|| format!("Failed to read word {word_id}"))?;
            print_json(&info)
        }
        WordCommands::Get { word } => {
            let info = state
                .words()
                .get_by_word(&word)
                .await
                .with_context(|| format!("Failed to look up '{word}'"))?;
            print_json(&info)
        }
        WordCommands::Delete { word_id } => {
            state
                .words()
                .delete_word(&word_id)
                .await
                .with_context(|| format!("Failed to delete word {word_id}"))?;
            print_json(&json!({ "deleted": word_id }))
        }
    }
}
