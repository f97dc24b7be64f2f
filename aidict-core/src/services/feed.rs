use crate::db::repos::FeedRepo;
use crate::models::{DialogueFeedEntry, Feed, WordFeedEntry};
use crate::Result;

/// Number of entries in a feed view
pub const DEFAULT_FEED_TOP: u32 = 20;

/// Feed facade returning fixed-size newest views
#[derive(Debug, Clone)]
pub struct FeedService {
    repo: FeedRepo,
    top: u32,
}

impl FeedService {
    pub fn new(repo: FeedRepo) -> Self {
        Self::with_top(repo, DEFAULT_FEED_TOP)
    }

    pub fn with_top(repo: FeedRepo, top: u32) -> Self {
        Self { repo, top }
    }

    /// Newest dialogues. `_word_id` is reserved for personalized feeds.
    pub async fn get_chat_feed(&self, _word_id: Option<&str>) -> Result<Feed<DialogueFeedEntry>> {
        let newest = self.repo.get_newest_chat(self.top).await?;
        Ok(Feed { newest })
    }

    pub async fn get_word_feed(&self) -> Result<Feed<WordFeedEntry>> {
        let newest = self.repo.get_newest_word(self.top).await?;
        Ok(Feed { newest })
    }

    pub async fn push_new_chat(
        &self,
        dialog_id: &str,
        title: &str,
        _word_id: Option<&str>,
    ) -> Result<()> {
        Ok(self.repo.write_newest_chat(dialog_id, title).await?)
    }

    pub async fn push_new_word(&self, word_id: &str, original_word: &str) -> Result<()> {
        Ok(self.repo.write_newest_word(word_id, original_word).await?)
    }
}
