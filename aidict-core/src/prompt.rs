//! Prompt generation - the boundary to the language model
//!
//! Each use case gets a `PromptPlan`: which model settings to use, how to
//! turn input into prompts, and how to read the model's reply. Running the
//! model is somebody else's job (`ModelBackend`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Prompt set version recorded on every word
pub const DEFAULT_PROMPT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("model call failed: {0}")]
    Model(String),

    #[error("could not parse {use_case} response: {reason}")]
    Parse {
        use_case: &'static str,
        reason: String,
    },

    #[error("model returned an empty document for '{word}'")]
    EmptyDocument { word: String },
}

/// Model selection and sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConf {
    pub model: String,
    pub temperature: f32,
}

impl ModelConf {
    fn new(model: &str, temperature: f32) -> Self {
        Self {
            model: model.to_owned(),
            temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub prompt: String,
}

/// What the model is being asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseCase {
    LegalAuditForward,
    RelatedWords,
    CreateWordDoc,
    ChatTitle,
    LegalAuditForWordQuestion,
    AppendMessageToWordDialogue,
    CreateWordQuestionDialogue,
}

impl UseCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LegalAuditForward => "legal_audit_forward",
            Self::RelatedWords => "related_words",
            Self::CreateWordDoc => "create_word_doc",
            Self::ChatTitle => "chat_title",
            Self::LegalAuditForWordQuestion => "legal_audit_for_word_question",
            Self::AppendMessageToWordDialogue => "append_message_to_word_dialogue",
            Self::CreateWordQuestionDialogue => "create_word_question_dialogue",
        }
    }

    pub fn model_conf(&self) -> ModelConf {
        match self {
            Self::LegalAuditForward | Self::RelatedWords => ModelConf::new("3.5", 0.0),
            Self::LegalAuditForWordQuestion => ModelConf::new("4.3", 0.0),
            Self::CreateWordDoc
            | Self::ChatTitle
            | Self::AppendMessageToWordDialogue
            | Self::CreateWordQuestionDialogue => ModelConf::new("4", 0.2),
        }
    }
}

/// Input handed to a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Text(String),
    History(Vec<String>),
    WordQuestion { origin_word: String, word_doc: String },
}

impl PromptInput {
    fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::History(messages) => messages.join(" "),
            Self::WordQuestion {
                origin_word,
                word_doc,
            } => format!("{} {}", origin_word, word_doc),
        }
    }
}

/// Structured reply, one shape per family of use cases
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    Audit { is_legal: bool, reason: String },
    RelatedWords(Vec<String>),
    WordDoc(String),
    Title(String),
    Message(String),
}

#[derive(Debug, Deserialize)]
struct AuditVerdict {
    #[serde(alias = "isLegal")]
    is_legal: bool,
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptPlan {
    pub use_case: UseCase,
    pub model_conf: ModelConf,
}

impl PromptPlan {
    pub fn new(use_case: UseCase) -> Self {
        Self {
            use_case,
            model_conf: use_case.model_conf(),
        }
    }

    pub fn generate_prompts(&self, input: &PromptInput) -> Vec<Prompt> {
        vec![Prompt {
            prompt: input.render(),
        }]
    }

    pub fn parse_response(&self, output: &str) -> Result<ParsedResponse, GenerationError> {
        let output = output.trim();
        match self.use_case {
            UseCase::LegalAuditForward | UseCase::LegalAuditForWordQuestion => {
                let verdict: AuditVerdict =
                    serde_json::from_str(output).map_err(|e| GenerationError::Parse {
                        use_case: self.use_case.as_str(),
                        reason: e.to_string(),
                    })?;
                Ok(ParsedResponse::Audit {
                    is_legal: verdict.is_legal,
                    reason: verdict.reason,
                })
            }
            UseCase::RelatedWords => Ok(ParsedResponse::RelatedWords(parse_word_list(output))),
            UseCase::CreateWordDoc => Ok(ParsedResponse::WordDoc(output.to_owned())),
            UseCase::ChatTitle => {
                let title = output
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or_default()
                    .trim_matches(|c: char| c == '"' || c == '\'');
                Ok(ParsedResponse::Title(title.to_owned()))
            }
            UseCase::AppendMessageToWordDialogue | UseCase::CreateWordQuestionDialogue => {
                Ok(ParsedResponse::Message(output.to_owned()))
            }
        }
    }
}

/// JSON array of strings, or one word per line with optional bullets.
fn parse_word_list(output: &str) -> Vec<String> {
    if let Ok(words) = serde_json::from_str::<Vec<String>>(output) {
        return words;
    }
    output
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Runs prompts against a model and returns its raw text reply.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn complete(&self, conf: &ModelConf, prompts: &[Prompt]) -> Result<String, GenerationError>;
}

/// Collaborator the word lifecycle depends on.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    fn prompt_version(&self) -> &str;

    fn plan(&self, use_case: UseCase) -> PromptPlan {
        PromptPlan::new(use_case)
    }

    /// Produce the dictionary document for a word.
    async fn generate_word_doc(&self, original_word: &str) -> Result<String, GenerationError>;
}

/// `PromptGenerator` backed by a `ModelBackend`
pub struct PromptCatalog<B> {
    version: String,
    backend: B,
}

impl<B: ModelBackend> PromptCatalog<B> {
    pub fn new(backend: B) -> Self {
        Self::with_version(backend, DEFAULT_PROMPT_VERSION)
    }

    pub fn with_version(backend: B, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            backend,
        }
    }
}

#[async_trait]
impl<B: ModelBackend> PromptGenerator for PromptCatalog<B> {
    fn prompt_version(&self) -> &str {
        &self.version
    }

    async fn generate_word_doc(&self, original_word: &str) -> Result<String, GenerationError> {
        let plan = self.plan(UseCase::CreateWordDoc);
        let prompts = plan.generate_prompts(&PromptInput::Text(original_word.to_owned()));
        let output = self.backend.complete(&plan.model_conf, &prompts).await?;

        match plan.parse_response(&output)? {
            ParsedResponse::WordDoc(doc) if !doc.is_empty() => Ok(doc),
            _ => Err(GenerationError::EmptyDocument {
                word: original_word.to_owned(),
            }),
        }
    }
}
