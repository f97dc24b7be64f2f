//! aidict-core: storage and lifecycle services for the aidict app
//!
//! Persists dialogue threads, word records and the two "recent activity"
//! feeds, and drives a word through its generation lifecycle.
//!
//! Leaf-first:
//! - `db`: SQLite pool, schema, repositories
//! - `processing`: output streams and the in-process registry
//! - `prompt`: prompt generation collaborator boundary
//! - `services`: thin facades plus the word lifecycle
//! - `state`: context that owns all of the above

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod processing;
pub mod prompt;
pub mod services;
pub mod state;

pub use config::AidictConfig;
pub use error::{Error, Result};
pub use processing::{ProcessingRegistry, StreamError, StreamState, StreamStatus, WordStream};
pub use state::AppState;
