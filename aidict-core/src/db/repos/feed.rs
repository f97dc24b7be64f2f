//! Feed repository - bounded recent-activity logs
//!
//! Two independent logs (dialogues, words). Each write inserts and then
//! trims the oldest rows past capacity. The insert and the trim are separate
//! statements, so concurrent writers can briefly push a log past capacity.

use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::DbError;
use crate::models::{DialogueFeedEntry, WordFeedEntry};

/// Default capacity of each feed log
pub const DEFAULT_FEED_CAPACITY: u32 = 100;

#[derive(Debug, Clone, Copy)]
enum FeedLog {
    Dialogues,
    Words,
}

impl FeedLog {
    fn table(&self) -> &'static str {
        match self {
            Self::Dialogues => "newest_dialogues",
            Self::Words => "newest_words",
        }
    }

    fn label_column(&self) -> &'static str {
        match self {
            Self::Dialogues => "title",
            Self::Words => "original_word",
        }
    }
}

/// Feed repository
#[derive(Debug, Clone)]
pub struct FeedRepo {
    pool: SqlitePool,
    capacity: u32,
}

impl FeedRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_capacity(pool, DEFAULT_FEED_CAPACITY)
    }

    pub fn with_capacity(pool: SqlitePool, capacity: u32) -> Self {
        Self { pool, capacity }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Newest `top` dialogue entries, newest first.
    pub async fn get_newest_chat(&self, top: u32) -> Result<Vec<DialogueFeedEntry>, DbError> {
        let rows = self.newest(FeedLog::Dialogues, top).await?;
        rows.into_iter()
            .map(|r| -> Result<DialogueFeedEntry, DbError> {
                Ok(DialogueFeedEntry {
                    id: r.try_get("id")?,
                    title: r.try_get("label")?,
                    created_at: r.try_get("created_at")?,
                })
            })
            .collect()
    }

    /// Newest `top` word entries, newest first.
    pub async fn get_newest_word(&self, top: u32) -> Result<Vec<WordFeedEntry>, DbError> {
        let rows = self.newest(FeedLog::Words, top).await?;
        rows.into_iter()
            .map(|r| -> Result<WordFeedEntry, DbError> {
                Ok(WordFeedEntry {
                    id: r.try_get("id")?,
                    original_word: r.try_get("label")?,
                    created_at: r.try_get("created_at")?,
                })
            })
            .collect()
    }

    pub async fn write_newest_chat(&self, dialog_id: &str, title: &str) -> Result<(), DbError> {
        self.write(FeedLog::Dialogues, dialog_id, title).await
    }

    pub async fn write_newest_word(&self, word_id: &str, original_word: &str) -> Result<(), DbError> {
        self.write(FeedLog::Words, word_id, original_word).await
    }

    pub async fn count_chats(&self) -> Result<i64, DbError> {
        self.count(FeedLog::Dialogues).await
    }

    pub async fn count_words(&self) -> Result<i64, DbError> {
        self.count(FeedLog::Words).await
    }

    async fn newest(
        &self,
        log: FeedLog,
        top: u32,
    ) -> Result<Vec<sqlx::sqlite::SqliteRow>, DbError> {
        if top == 0 {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT id, {label} AS label, created_at FROM {table} \
             ORDER BY created_at DESC, seq DESC LIMIT ?",
            label = log.label_column(),
            table = log.table(),
        );
        let rows = sqlx::query(&query)
            .bind(i64::from(top))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn write(&self, log: FeedLog, id: &str, label: &str) -> Result<(), DbError> {
        let insert = format!(
            "INSERT INTO {table} (id, {label}) VALUES (?, ?)",
            table = log.table(),
            label = log.label_column(),
        );
        let result = sqlx::query(&insert)
            .bind(id)
            .bind(label)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::WriteFailed {
                resource: log.table(),
                operation: "insert into",
            });
        }

        let count = self.count(log).await?;
        let excess = count - i64::from(self.capacity);
        if excess > 0 {
            // SQLite builds without DELETE ... LIMIT, so trim through a subquery
            let trim = format!(
                "DELETE FROM {table} WHERE seq IN ( \
                 SELECT seq FROM {table} ORDER BY created_at ASC, seq ASC LIMIT ?)",
                table = log.table(),
            );
            let trimmed = sqlx::query(&trim)
                .bind(excess)
                .execute(&self.pool)
                .await?
                .rows_affected();
            debug!(table = log.table(), trimmed, "feed trimmed to capacity");
        }

        Ok(())
    }

    async fn count(&self, log: FeedLog) -> Result<i64, DbError> {
        let query = format!("SELECT COUNT(*) FROM {}", log.table());
        let count: i64 = sqlx::query_scalar(&query).fetch_one(&self.pool).await?;
        Ok(count)
    }
}
