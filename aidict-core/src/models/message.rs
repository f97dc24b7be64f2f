//! Dialogue message

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for message content (64KB)
const MAX_CONTENT_LEN: usize = 65536;

/// Maximum length for a sender label
const MAX_SENDER_LEN: usize = 64;

/// A single message in a dialogue.
///
/// Stored as JSON inside the owning dialogue row, so field names are part
/// of the persisted format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub content: String,
}

impl Message {
    /// Create a validated message.
    ///
    /// # Rules
    /// - Sender must be non-empty, max 64 chars
    /// - Content max 64KB (65536 bytes), empty allowed
    ///
    /// # Example
    /// ```
    /// use aidict_core::models::Message;
    ///
    /// assert!(Message::new("user", "Hi").is_ok());
    /// assert!(Message::new("", "Hi").is_err());
    /// ```
    pub fn new(sender: &str, content: &str) -> Result<Self, ValidationError> {
        let sender = sender.trim();
        if sender.is_empty() {
            return Err(ValidationError::Empty { field: "sender" });
        }
        if sender.chars().count() > MAX_SENDER_LEN {
            return Err(ValidationError::TooLong {
                field: "sender",
                max: MAX_SENDER_LEN,
            });
        }
        if content.len() > MAX_CONTENT_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_CONTENT_LEN,
            });
        }

        Ok(Self {
            sender: sender.to_owned(),
            content: content.to_owned(),
        })
    }
}
