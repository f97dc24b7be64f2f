//! Output streams for in-flight word generation
//!
//! A `WordStream` is the caller-supplied channel that carries generation
//! output for one word. The producer pushes text and then either finishes
//! or fails the stream; observers subscribe or await termination.
//!
//! `ProcessingRegistry` maps word ids to their live streams. It is owned by
//! `AppState` and injected into the word repository, so "currently
//! processing" is only ever visible within one process.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::debug;

/// Error observed on an output stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("stream failed: {0}")]
    Failed(String),

    #[error("stream already closed")]
    Closed,
}

/// Where a stream is in its life
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamStatus {
    #[default]
    Open,
    Ended,
    Failed(String),
}

impl StreamStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }
}

/// Accumulated text plus status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    pub text: String,
    pub status: StreamStatus,
}

/// Cloneable handle to one generation output stream.
///
/// Clones share the same underlying channel. Terminal states are sticky:
/// once ended or failed, pushes are rejected and further transitions are
/// ignored.
#[derive(Debug, Clone)]
pub struct WordStream {
    tx: Arc<watch::Sender<StreamState>>,
}

impl Default for WordStream {
    fn default() -> Self {
        Self::new()
    }
}

impl WordStream {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StreamState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Append output text. Fails with `Closed` after the stream terminated.
    pub fn push(&self, chunk: &str) -> Result<(), StreamError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|state| {
            if state.status.is_terminal() {
                outcome = Err(StreamError::Closed);
                false
            } else {
                state.text.push_str(chunk);
                true
            }
        });
        outcome
    }

    /// Mark the stream as ended. Returns false if it had already terminated.
    pub fn finish(&self) -> bool {
        self.transition(StreamStatus::Ended)
    }

    /// Mark the stream as failed. Returns false if it had already terminated.
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.transition(StreamStatus::Failed(reason.into()))
    }

    fn transition(&self, next: StreamStatus) -> bool {
        self.tx.send_if_modified(|state| {
            if state.status.is_terminal() {
                false
            } else {
                state.status = next;
                true
            }
        })
    }

    /// Current text and status.
    pub fn snapshot(&self) -> StreamState {
        self.tx.borrow().clone()
    }

    /// Watch receiver for observers that want every update.
    pub fn subscribe(&self) -> watch::Receiver<StreamState> {
        self.tx.subscribe()
    }

    /// Wait until the stream terminates.
    ///
    /// Resolves with the full text on end, or the failure reason.
    pub async fn finished(&self) -> Result<String, StreamError> {
        let mut rx = self.tx.subscribe();
        let state = rx
            .wait_for(|state| state.status.is_terminal())
            .await
            .map_err(|_| StreamError::Closed)?;

        match &state.status {
            StreamStatus::Ended => Ok(state.text.clone()),
            StreamStatus::Failed(reason) => Err(StreamError::Failed(reason.clone())),
            StreamStatus::Open => Err(StreamError::Closed),
        }
    }

    /// True if both handles refer to the same stream.
    pub fn same_stream(&self, other: &WordStream) -> bool {
        Arc::ptr_eq(&self.tx, &other.tx)
    }
}

/// Word id → live output stream, shared by clones.
#[derive(Debug, Clone, Default)]
pub struct ProcessingRegistry {
    streams: Arc<DashMap<String, WordStream>>,
}

impl ProcessingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stream under `word_id`.
    ///
    /// Spawns a watcher that removes the entry once the stream terminates,
    /// unless the entry has since been replaced by another stream. Must be
    /// called from within a tokio runtime.
    pub fn register(&self, word_id: &str, stream: WordStream) {
        let previous = self.streams.insert(word_id.to_owned(), stream.clone());
        debug!(word_id, replaced = previous.is_some(), "registered processing word");

        let registry = self.clone();
        let word_id = word_id.to_owned();
        tokio::spawn(async move {
            let _ = stream.finished().await;
            if registry.remove_if_same(&word_id, &stream) {
                debug!(word_id = %word_id, "processing word stream terminated, deregistered");
            }
        });
    }

    pub fn get(&self, word_id: &str) -> Option<WordStream> {
        self.streams.get(word_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, word_id: &str) -> bool {
        self.streams.contains_key(word_id)
    }

    /// Explicit deregistration. Returns the removed stream, if any.
    pub fn remove(&self, word_id: &str) -> Option<WordStream> {
        self.streams.remove(word_id).map(|(_, stream)| stream)
    }

    fn remove_if_same(&self, word_id: &str, stream: &WordStream) -> bool {
        self.streams
            .remove_if(word_id, |_, current| current.same_stream(stream))
            .is_some()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.streams.clear();
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
