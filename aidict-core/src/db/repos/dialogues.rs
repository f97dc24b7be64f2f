//! Dialogue repository
//!
//! A dialogue stores only its own messages plus the ids of the dialogues it
//! continues. Forking never copies history; reads resolve the parent chain.

use futures::future::{BoxFuture, FutureExt};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::DbError;
use crate::models::Message;

/// Raw dialogue row
#[derive(Debug, Clone, sqlx::FromRow)]
struct DialogueRow {
    dependent_dialog_id_list: String,
    messages: String,
}

/// Dialogue repository
#[derive(Debug, Clone)]
pub struct DialogueRepo {
    pool: SqlitePool,
}

impl DialogueRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a root dialogue with the given messages.
    pub async fn create_dialog(&self, messages: &[Message]) -> Result<String, DbError> {
        self.insert(&[], messages, "create").await
    }

    /// Create a dialogue continuing `dialog_id` with `messages` appended.
    ///
    /// The parent is not checked here; a dangling parent surfaces as
    /// `NotFound` when the fork is read.
    pub async fn fork_dialog(
        &self,
        dialog_id: &str,
        messages: &[Message],
    ) -> Result<String, DbError> {
        self.insert(&[dialog_id.to_owned()], messages, "fork").await
    }

    /// Full message sequence: every parent's messages (depth-first, in
    /// listed order) followed by this dialogue's own.
    pub async fn get_dialog(&self, dialog_id: &str) -> Result<Vec<Message>, DbError> {
        let mut path = Vec::new();
        self.resolve(dialog_id.to_owned(), &mut path).await
    }

    /// Check whether a dialogue row exists.
    pub async fn exists(&self, dialog_id: &str) -> Result<bool, DbError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM dialogues WHERE id = ?)")
            .bind(dialog_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists.0)
    }

    async fn insert(
        &self,
        parents: &[String],
        messages: &[Message],
        operation: &'static str,
    ) -> Result<String, DbError> {
        let id = Uuid::new_v4().to_string();
        let result = sqlx::query(
            "INSERT INTO dialogues (id, dependent_dialog_id_list, messages) VALUES (?, ?, ?)",
        )
        .bind(&id)
        .bind(serde_json::to_string(parents)?)
        .bind(serde_json::to_string(messages)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::WriteFailed {
                resource: "dialogue",
                operation,
            });
        }
        Ok(id)
    }

    /// `path` holds the dialogues currently being resolved, so a parent
    /// already on it means the chain loops back on itself.
    fn resolve<'a>(
        &'a self,
        dialog_id: String,
        path: &'a mut Vec<String>,
    ) -> BoxFuture<'a, Result<Vec<Message>, DbError>> {
        async move {
            if path.contains(&dialog_id) {
                return Err(DbError::CyclicDependency { id: dialog_id });
            }

            let row: DialogueRow = sqlx::query_as(
                "SELECT dependent_dialog_id_list, messages FROM dialogues WHERE id = ?",
            )
            .bind(&dialog_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "dialogue",
                id: dialog_id.clone(),
            })?;

            let parents: Vec<String> = serde_json::from_str(&row.dependent_dialog_id_list)?;
            let own: Vec<Message> = serde_json::from_str(&row.messages)?;

            path.push(dialog_id);
            let mut messages = Vec::new();
            for parent in parents {
                messages.extend(self.resolve(parent, &mut *path).await?);
            }
            path.pop();

            messages.extend(own);
            Ok(messages)
        }
        .boxed()
    }
}
