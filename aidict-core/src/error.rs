//! Error types for aidict-core
//!
//! Each layer owns a structured error (`DbError`, `GenerationError`,
//! `StreamError`, `ValidationError`). Services surface them through the
//! crate-level `Error` so callers can match on the layer that failed.

use thiserror::Error;

use crate::db::repos::DbError;
use crate::models::ValidationError;
use crate::processing::StreamError;
use crate::prompt::GenerationError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("output stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("lifecycle task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the underlying storage lookup found no row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Db(DbError::NotFound { .. }))
    }
}
