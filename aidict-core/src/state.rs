//! Application context shared across callers

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use crate::config::AidictConfig;
use crate::db::pool::create_pool_with_options;
use crate::db::repos::{DbError, DialogueRepo, FeedRepo, WordRepo};
use crate::processing::ProcessingRegistry;
use crate::prompt::PromptGenerator;
use crate::services::{DialogueService, FeedService, WordService};
use crate::Result;

/// Owns the pool, the processing registry and the services built on them
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: SqlitePool,
    registry: ProcessingRegistry,
    dialogues: DialogueService,
    feed: FeedService,
    words: WordService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &AidictConfig, generator: Arc<dyn PromptGenerator>) -> Self {
        let registry = ProcessingRegistry::new();
        let dialogues = DialogueService::new(DialogueRepo::new(pool.clone()));
        let feed = FeedService::with_top(
            FeedRepo::with_capacity(pool.clone(), config.feed.capacity),
            config.feed.top,
        );
        let words = WordService::new(WordRepo::new(pool.clone(), registry.clone()), generator);

        Self {
            inner: Arc::new(AppStateInner {
                pool,
                registry,
                dialogues,
                feed,
                words,
            }),
        }
    }

    /// Open the configured database and build the context.
    ///
    /// Does not run the recovery sweep; call [`AppState::recover`] once per
    /// process start.
    pub async fn connect(config: &AidictConfig, generator: Arc<dyn PromptGenerator>) -> Result<Self> {
        let pool = create_pool_with_options(&config.database.url, config.database.max_connections)
            .await
            .map_err(DbError::from)?;
        Ok(Self::new(pool, config, generator))
    }

    /// Startup recovery sweep: drop every `processing` word and clear the
    /// registry. Returns the number of records removed.
    pub async fn recover(&self) -> Result<u64> {
        let removed = self.inner.words.initialize().await?;
        info!(removed, "recovery sweep finished");
        Ok(removed)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    pub fn registry(&self) -> &ProcessingRegistry {
        &self.inner.registry
    }

    pub fn dialogues(&self) -> &DialogueService {
        &self.inner.dialogues
    }

    pub fn feed(&self) -> &FeedService {
        &self.inner.feed
    }

    pub fn words(&self) -> &WordService {
        &self.inner.words
    }
}
