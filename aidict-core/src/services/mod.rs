//! Services composed over the repositories
//!
//! - dialogues: pass-through over dialogue storage
//! - feed: fixed-size "newest" views over the feed logs
//! - words: word creation lifecycle

pub mod dialogues;
pub mod feed;
pub mod words;

pub use dialogues::DialogueService;
pub use feed::{FeedService, DEFAULT_FEED_TOP};
pub use words::{GenerationOutcome, GenerationTask, WordCreation, WordService};
