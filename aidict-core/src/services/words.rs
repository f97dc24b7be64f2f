//! Word lifecycle
//!
//! ```text
//! create_word ──► processing ──stream ends, doc generated──► completed
//!                     │
//!                     └──stream error / generation error──► deleted
//! ```
//!
//! `create_word` returns as soon as the processing record exists. The rest
//! runs on a spawned task that the caller can await through
//! `GenerationTask`. Nothing is retried; a failed word must be requested
//! again. A task whose record was replaced or deleted meanwhile reports
//! `Superseded` however its stream ended.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::db::repos::{DbError, WordRepo};
use crate::models::{NewWord, OriginalWord, WordFullInfo, WordInfo, WordStatus};
use crate::processing::WordStream;
use crate::prompt::PromptGenerator;
use crate::Result;

/// How a word's generation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Record is now `completed` with this document
    Completed { word_doc: String },
    /// Record was deleted; the reason was logged
    Failed { reason: String },
    /// A newer request for the same text replaced this record mid-flight
    Superseded,
}

/// Handle to a word's background lifecycle
#[derive(Debug)]
pub struct GenerationTask {
    handle: JoinHandle<GenerationOutcome>,
}

impl GenerationTask {
    /// Wait for the lifecycle to finish.
    pub async fn wait(self) -> Result<GenerationOutcome> {
        Ok(self.handle.await?)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Result of a creation request
#[derive(Debug)]
pub struct WordCreation {
    pub id: String,
    pub task: GenerationTask,
}

/// Word service
#[derive(Clone)]
pub struct WordService {
    repo: WordRepo,
    generator: Arc<dyn PromptGenerator>,
}

impl WordService {
    pub fn new(repo: WordRepo, generator: Arc<dyn PromptGenerator>) -> Self {
        Self { repo, generator }
    }

    /// Startup recovery sweep. Returns the number of records removed.
    pub async fn initialize(&self) -> Result<u64> {
        Ok(self.repo.delete_processing_words_on_initialization().await?)
    }

    /// Summary lookup by text, normalized the same way `create_word` stores it.
    pub async fn get_by_word(&self, original_word: &str) -> Result<WordInfo> {
        let word = OriginalWord::new(original_word)?;
        let record = self.repo.get_by_original_word(word.as_str()).await?;
        Ok(WordInfo::from(record))
    }

    /// Full lookup by id, with the live stream attached while processing.
    pub async fn get_by_id(&self, word_id: &str) -> Result<WordFullInfo> {
        let record = self.repo.get_word_by_id(word_id).await?;
        let stream = match record.status {
            WordStatus::Processing => self.repo.get_processing_word(word_id),
            WordStatus::Completed => None,
        };
        Ok(WordFullInfo::from_record(record, stream))
    }

    /// Remove a word and any live registration.
    pub async fn delete_word(&self, word_id: &str) -> Result<()> {
        self.repo.delete_processing_word(word_id);
        Ok(self.repo.delete_word(word_id).await?)
    }

    /// Start generating `original_word`, with `stream` carrying the output.
    ///
    /// An existing record for the same text is replaced. Must be called from
    /// within a tokio runtime.
    pub async fn create_word(&self, original_word: &str, stream: WordStream) -> Result<WordCreation> {
        let word = OriginalWord::new(original_word)?;
        let prompt_version = self.generator.prompt_version().to_owned();

        match self.repo.get_by_original_word(word.as_str()).await {
            Ok(existing) => {
                self.repo.delete_processing_word(&existing.id);
                match self.repo.delete_word(&existing.id).await {
                    Ok(()) | Err(DbError::NotFound { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
                debug!(word_id = %existing.id, word = word.as_str(), "superseded existing word");
            }
            Err(DbError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        let id = self
            .repo
            .create_word(&NewWord::processing(word.as_str(), &prompt_version))
            .await?;
        self.repo.create_processing_word(&id, stream.clone());
        info!(word_id = %id, word = word.as_str(), "word generation started");

        let lifecycle = Lifecycle {
            repo: self.repo.clone(),
            generator: Arc::clone(&self.generator),
            word_id: id.clone(),
            original_word: word.into_string(),
            prompt_version,
        };
        let handle = tokio::spawn(lifecycle.run(stream));

        Ok(WordCreation {
            id,
            task: GenerationTask { handle },
        })
    }
}

struct Lifecycle {
    repo: WordRepo,
    generator: Arc<dyn PromptGenerator>,
    word_id: String,
    original_word: String,
    prompt_version: String,
}

impl Lifecycle {
    async fn run(self, stream: WordStream) -> GenerationOutcome {
        let err = match self.complete(&stream).await {
            Ok(word_doc) => {
                info!(word_id = %self.word_id, "word generation completed");
                return GenerationOutcome::Completed { word_doc };
            }
            Err(err) => err,
        };

        if err.is_not_found() || self.is_superseded().await {
            debug!(word_id = %self.word_id, error = %err, "word was replaced before completion");
            self.repo.delete_processing_word(&self.word_id);
            return GenerationOutcome::Superseded;
        }

        error!(word_id = %self.word_id, error = %err, "error generating word");
        self.discard().await;
        GenerationOutcome::Failed {
            reason: err.to_string(),
        }
    }

    async fn complete(&self, stream: &WordStream) -> Result<String> {
        stream.finished().await?;
        let word_doc = self.generator.generate_word_doc(&self.original_word).await?;
        let completed = NewWord::completed(&self.original_word, &self.prompt_version, word_doc.clone());
        self.repo.update_word(&self.word_id, &completed).await?;
        Ok(word_doc)
    }

    /// True once this task's row is gone. Lookup errors count as still
    /// current so the failure path runs.
    async fn is_superseded(&self) -> bool {
        matches!(
            self.repo.get_word_by_id(&self.word_id).await,
            Err(DbError::NotFound { .. })
        )
    }

    async fn discard(&self) {
        match self.repo.delete_word(&self.word_id).await {
            Ok(()) | Err(DbError::NotFound { .. }) => {}
            Err(e) => warn!(word_id = %self.word_id, error = %e, "failed to delete failed word"),
        }
        self.repo.delete_processing_word(&self.word_id);
    }
}
