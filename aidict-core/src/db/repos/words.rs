//! Word repository
//!
//! Persists word records and tracks which words are mid-generation. The
//! processing registry is injected by the owner (`AppState`), never global.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::DbError;
use crate::models::{NewWord, WordRecord, WordStatus};
use crate::processing::{ProcessingRegistry, WordStream};

const WORD_COLUMNS: &str = "id, original_word, status, prompt_version, create_time, word_doc";

/// Word repository
#[derive(Debug, Clone)]
pub struct WordRepo {
    pool: SqlitePool,
    registry: ProcessingRegistry,
}

impl WordRepo {
    pub fn new(pool: SqlitePool, registry: ProcessingRegistry) -> Self {
        Self { pool, registry }
    }

    pub fn registry(&self) -> &ProcessingRegistry {
        &self.registry
    }

    /// Track `stream` as the live output of `word_id`.
    ///
    /// The entry is dropped automatically once the stream ends or fails.
    pub fn create_processing_word(&self, word_id: &str, stream: WordStream) {
        self.registry.register(word_id, stream);
    }

    pub fn get_processing_word(&self, word_id: &str) -> Option<WordStream> {
        self.registry.get(word_id)
    }

    pub fn delete_processing_word(&self, word_id: &str) {
        if self.registry.remove(word_id).is_some() {
            debug!(word_id, "deregistered processing word");
        }
    }

    /// Startup recovery: forget every registered stream and delete every
    /// row still marked processing. Returns the number of rows deleted.
    pub async fn delete_processing_words_on_initialization(&self) -> Result<u64, DbError> {
        self.registry.clear();
        let deleted = sqlx::query("DELETE FROM words WHERE status = ?")
            .bind(WordStatus::Processing.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();
        info!(deleted, "removed words left in processing state");
        Ok(deleted)
    }

    /// Insert a new record and return its generated id.
    pub async fn create_word(&self, word: &NewWord) -> Result<String, DbError> {
        let id = Uuid::new_v4().to_string();
        let result = sqlx::query(
            r#"
            INSERT INTO words (id, original_word, status, prompt_version, create_time, word_doc)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&word.original_word)
        .bind(word.status.as_str())
        .bind(&word.prompt_version)
        .bind(storage_time(&word.create_time))
        .bind(word.word_doc.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::WriteFailed {
                resource: "word",
                operation: "create",
            });
        }
        Ok(id)
    }

    pub async fn get_word_by_id(&self, word_id: &str) -> Result<WordRecord, DbError> {
        let query = format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(word_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "word",
                id: word_id.to_owned(),
            })?;

        record_from_row(&row)
    }

    /// Look up by text. The text is expected to be unique; if it is not,
    /// the most recently created record wins.
    pub async fn get_by_original_word(&self, original_word: &str) -> Result<WordRecord, DbError> {
        let query = format!(
            "SELECT {WORD_COLUMNS} FROM words WHERE original_word = ? \
             ORDER BY create_time DESC LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(original_word)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "word",
                id: original_word.to_owned(),
            })?;

        record_from_row(&row)
    }

    /// Overwrite every column of an existing record.
    pub async fn update_word(&self, word_id: &str, word: &NewWord) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE words
            SET original_word = ?, status = ?, prompt_version = ?, create_time = ?, word_doc = ?
            WHERE id = ?
            "#,
        )
        .bind(&word.original_word)
        .bind(word.status.as_str())
        .bind(&word.prompt_version)
        .bind(storage_time(&word.create_time))
        .bind(word.word_doc.as_deref())
        .bind(word_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "word",
                id: word_id.to_owned(),
            });
        }
        Ok(())
    }

    pub async fn delete_word(&self, word_id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM words WHERE id = ?")
            .bind(word_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "word",
                id: word_id.to_owned(),
            });
        }
        Ok(())
    }
}

/// `create_time` is ordered as text, so every row uses the same fixed
/// microsecond precision.
fn storage_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn record_from_row(row: &SqliteRow) -> Result<WordRecord, DbError> {
    let status: String = row.try_get("status")?;
    let status = WordStatus::parse(&status).ok_or(DbError::InvalidStatus { value: status })?;
    let create_time: DateTime<Utc> = row.try_get("create_time")?;

    Ok(WordRecord {
        id: row.try_get("id")?,
        original_word: row.try_get("original_word")?,
        status,
        prompt_version: row.try_get("prompt_version")?,
        create_time,
        word_doc: row.try_get("word_doc")?,
    })
}
