//! Domain models with validation at construction
//!
//! User input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod feed;
pub mod message;
pub mod validation;
pub mod word;

pub use feed::{DialogueFeedEntry, Feed, WordFeedEntry};
pub use message::Message;
pub use validation::ValidationError;
pub use word::{NewWord, OriginalWord, WordFullInfo, WordInfo, WordRecord, WordStatus};
