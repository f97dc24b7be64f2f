//! Recent-activity feed entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry in the recent dialogues feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueFeedEntry {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Entry in the recent words feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFeedEntry {
    pub id: String,
    pub original_word: String,
    pub created_at: DateTime<Utc>,
}

/// Feed response wrapper, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed<T> {
    pub newest: Vec<T>,
}
