//! Dialogue commands
//!
//! Commands: create, fork, show

use aidict_core::models::Message;
use aidict_core::AppState;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use super::print_json;

#[derive(Parser, Debug)]
pub struct DialogArgs {
    #[command(subcommand)]
    pub command: DialogCommands,
}

#[derive(Subcommand, Debug)]
pub enum DialogCommands {
    /// Start a new dialogue
    Create(CreateArgs),
    /// Continue a dialogue as a new fork
    Fork(ForkArgs),
    /// Print every message of a dialogue, ancestors first
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Message as SENDER:CONTENT (repeatable, kept in order)
    #[arg(short = 'm', long = "message", value_parser = parse_message)]
    messages: Vec<Message>,

    /// Also publish the dialogue to the chat feed under this title
    #[arg(long)]
    title: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ForkArgs {
    /// Dialogue ID to continue
    dialog_id: String,

    /// Message as SENDER:CONTENT (repeatable, kept in order)
    #[arg(short = 'm', long = "message", value_parser = parse_message)]
    messages: Vec<Message>,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Dialogue ID
    dialog_id: String,
}

fn parse_message(raw: &str) -> Result<Message, String> {
    let (sender, content) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected SENDER:CONTENT, got '{raw}'"))?;
    Message::new(sender, content).map_err(|e| e.to_string())
}

pub async fn run_dialog(state: &AppState, args: DialogArgs) -> Result<()> {
    match args.command {
        DialogCommands::Create(args) => {
            let id = state
                .dialogues()
                .create_dialog(&args.messages)
                .await
                .context("Failed to create dialogue")?;
            if let Some(title) = args.title.as_deref() {
                state.feed().push_new_chat(&id, title, None).await?;
            }
            print_json(&json!({ "id": id }))
        }
        DialogCommands::Fork(args) => {
            let id = state
                .dialogues()
                .append_messages(&args.dialog_id, &args.messages)
                .await
                .with_context(|| format!("Failed to fork dialogue {}", args.dialog_id))?;
            print_json(&json!({ "id": id, "parent": args.dialog_id }))
        }
        DialogCommands::Show(args) => {
            let messages = state
                .dialogues()
                .get_dialog(&args.dialog_id)
                .await
                .with_context(|| format!("Failed to read dialogue {}", args.dialog_id))?;
            print_json(&json!({ "id": args.dialog_id, "messages": messages }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message() {
        let msg = parse_message("user:Hi: there").unwrap();
        assert_eq!(msg.sender, "user");
        assert_eq!(msg.content, "Hi: there");

        assert!(parse_message("no separator").is_err());
        assert!(parse_message(":empty sender").is_err());
        assert_eq!(parse_message("bot:").unwrap().content, "");
    }
}
