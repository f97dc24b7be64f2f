//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One pool per process, cloned into repositories
//! - Schema is applied idempotently when the pool is created
//! - Zero affected rows on a write is an error, never silently ignored
//! - No multi-statement transactions; feed trimming is best-effort

pub mod pool;
pub mod repos;

pub use pool::{apply_schema, create_pool, create_pool_with_options};
pub use repos::*;
