//! Feed commands
//!
//! Commands: chats, words

use aidict_core::AppState;
use anyhow::Result;
use clap::{Parser, Subcommand};

use super::print_json;

#[derive(Parser, Debug)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommands,
}

#[derive(Subcommand, Debug)]
pub enum FeedCommands {
    /// Newest dialogues
    Chats,
    /// Newest words
    Words,
}

pub async fn run_feed(state: &AppState, args: FeedArgs) -> Result<()> {
    match args.command {
        FeedCommands::Chats => print_json(&state.feed().get_chat_feed(None).await?),
        FeedCommands::Words => print_json(&state.feed().get_word_feed().await?),
    }
}
