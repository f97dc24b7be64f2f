//! Model backend used by the CLI
//!
//! The CLI never generates documents itself, so every completion fails.
//! Words created elsewhere are still readable.

use aidict_core::prompt::{GenerationError, ModelBackend, ModelConf, Prompt};
use async_trait::async_trait;

pub struct OfflineBackend;

#[async_trait]
impl ModelBackend for OfflineBackend {
    async fn complete(&self, conf: &ModelConf, _prompts: &[Prompt]) -> Result<String, GenerationError> {
        Err(GenerationError::Model(format!(
            "no model backend configured for {}",
            conf.model
        )))
    }
}
