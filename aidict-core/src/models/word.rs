//! Word records and their lifecycle status

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::processing::WordStream;

/// Maximum length for a looked-up word or phrase
const MAX_WORD_LEN: usize = 128;

/// Lifecycle status of a word record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    Processing,
    Completed,
}

impl WordStatus {
    /// Parse status from its stored form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated original word text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OriginalWord(String);

impl OriginalWord {
    /// Create a new original word.
    ///
    /// # Rules
    /// - Surrounding whitespace is trimmed
    /// - Must be non-empty after trimming
    /// - Max 128 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "original word",
            });
        }
        if trimmed.chars().count() > MAX_WORD_LEN {
            return Err(ValidationError::TooLong {
                field: "original word",
                max: MAX_WORD_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for OriginalWord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Word record as stored in the `words` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub id: String,
    pub original_word: String,
    pub status: WordStatus,
    pub prompt_version: String,
    pub create_time: DateTime<Utc>,
    pub word_doc: Option<String>,
}

/// Column values for inserting or overwriting a word record
#[derive(Debug, Clone)]
pub struct NewWord {
    pub original_word: String,
    pub status: WordStatus,
    pub prompt_version: String,
    pub create_time: DateTime<Utc>,
    pub word_doc: Option<String>,
}

impl NewWord {
    /// A freshly requested word: processing, no document yet.
    pub fn processing(original_word: &str, prompt_version: &str) -> Self {
        Self {
            original_word: original_word.to_owned(),
            status: WordStatus::Processing,
            prompt_version: prompt_version.to_owned(),
            create_time: Utc::now(),
            word_doc: None,
        }
    }

    /// A finished word carrying its generated document.
    pub fn completed(original_word: &str, prompt_version: &str, word_doc: String) -> Self {
        Self {
            original_word: original_word.to_owned(),
            status: WordStatus::Completed,
            prompt_version: prompt_version.to_owned(),
            create_time: Utc::now(),
            word_doc: Some(word_doc),
        }
    }
}

/// Summary view returned by text lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordInfo {
    pub id: String,
    pub status: WordStatus,
    pub prompt_version: String,
    pub create_time: DateTime<Utc>,
}

impl From<WordRecord> for WordInfo {
    fn from(w: WordRecord) -> Self {
        Self {
            id: w.id,
            status: w.status,
            prompt_version: w.prompt_version,
            create_time: w.create_time,
        }
    }
}

/// Full view returned by id lookup.
///
/// `stream` is attached only while the word is processing and its output
/// stream is still registered in this process.
#[derive(Debug, Clone, Serialize)]
pub struct WordFullInfo {
    pub id: String,
    pub original_word: String,
    pub status: WordStatus,
    pub prompt_version: String,
    pub create_time: DateTime<Utc>,
    pub word_doc: Option<String>,
    #[serde(skip)]
    pub stream: Option<WordStream>,
}

impl WordFullInfo {
    pub fn from_record(w: WordRecord, stream: Option<WordStream>) -> Self {
        Self {
            id: w.id,
            original_word: w.original_word,
            status: w.status,
            prompt_version: w.prompt_version,
            create_time: w.create_time,
            word_doc: w.word_doc,
            stream,
        }
    }
}
