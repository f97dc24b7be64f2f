//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Owns a cloned pool handle so it can move into spawned tasks
//! - Maps "no row" to `DbError::NotFound`
//! - Maps "zero rows affected" on insert to `DbError::WriteFailed`

pub mod dialogues;
pub mod feed;
pub mod words;

pub use dialogues::DialogueRepo;
pub use feed::{FeedRepo, DEFAULT_FEED_CAPACITY};
pub use words::WordRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("stored JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("failed to {operation} {resource}: no rows affected")]
    WriteFailed {
        resource: &'static str,
        operation: &'static str,
    },

    #[error("cyclic dependency: dialogue '{id}' is its own ancestor")]
    CyclicDependency { id: String },

    #[error("invalid word status '{value}'")]
    InvalidStatus { value: String },
}
