//! Command implementations for the aidict CLI

pub mod dialog;
pub mod feed;
pub mod word;

pub use dialog::run_dialog;
pub use feed::run_feed;
pub use word::run_word;

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
