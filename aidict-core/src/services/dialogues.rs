use crate::db::repos::DialogueRepo;
use crate::models::Message;
use crate::Result;

/// Dialogue facade
#[derive(Debug, Clone)]
pub struct DialogueService {
    repo: DialogueRepo,
}

impl DialogueService {
    pub fn new(repo: DialogueRepo) -> Self {
        Self { repo }
    }

    /// Start a new dialogue, returning its id.
    pub async fn create_dialog(&self, messages: &[Message]) -> Result<String> {
        Ok(self.repo.create_dialog(messages).await?)
    }

    /// Every message of the dialogue, ancestors first.
    pub async fn get_dialog(&self, dialog_id: &str) -> Result<Vec<Message>> {
        Ok(self.repo.get_dialog(dialog_id).await?)
    }

    /// Continue a dialogue. Returns the id of the new fork; the source
    /// dialogue is left untouched.
    pub async fn append_messages(&self, dialog_id: &str, new_messages: &[Message]) -> Result<String> {
        Ok(self.repo.fork_dialog(dialog_id, new_messages).await?)
    }
}
