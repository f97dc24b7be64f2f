use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::db::repos::DEFAULT_FEED_CAPACITY;
use crate::prompt::DEFAULT_PROMPT_VERSION;
use crate::services::DEFAULT_FEED_TOP;

/// Load `.env` from the current directory, then `~/.aidict/.env`.
///
/// Variables already set in the environment are never overwritten.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path.display().to_string());
    }

    if let Some(env_file) = config_dir().map(|d| d.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => loaded_from.push(env_file.display().to_string()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.aidict)");
    } else {
        info!("Loaded environment from: {}", loaded_from.join(", "));
    }
}

/// The aidict config directory (`~/.aidict`)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aidict"))
}

/// TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AidictConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite://path/to.db` or `sqlite::memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Entries kept per feed log before the oldest are evicted
    #[serde(default = "default_feed_capacity")]
    pub capacity: u32,

    /// Entries returned per feed view
    #[serde(default = "default_feed_top")]
    pub top: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: default_feed_capacity(),
            top: default_feed_top(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Stamped on every word record
    #[serde(default = "default_prompt_version")]
    pub version: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            version: default_prompt_version(),
        }
    }
}

fn default_database_url() -> String {
    match config_dir() {
        Some(dir) => format!("sqlite://{}", dir.join("aidict.db").display()),
        None => "sqlite://aidict.db".to_string(),
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_feed_capacity() -> u32 {
    DEFAULT_FEED_CAPACITY
}

fn default_feed_top() -> u32 {
    DEFAULT_FEED_TOP
}

fn default_prompt_version() -> String {
    DEFAULT_PROMPT_VERSION.to_string()
}

impl AidictConfig {
    /// Load config.
    ///
    /// Priority order (highest to lowest):
    /// 1. `DATABASE_URL` environment variable (database url only)
    /// 2. ./aidict.toml
    /// 3. ~/.aidict/config.toml
    /// 4. Built-in defaults
    pub fn load() -> Self {
        let mut config = AidictConfig::default();

        if let Some(global) = config_dir().map(|d| d.join("config.toml")) {
            if let Some(parsed) = Self::read_file(&global) {
                config = parsed;
            }
        }

        if let Some(local) = Self::read_file(Path::new("aidict.toml")) {
            config = local;
        }

        config.with_database_url(std::env::var("DATABASE_URL").ok())
    }

    /// Parse a config file. Missing or malformed files yield `None`.
    pub fn read_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        match toml::from_str::<AidictConfig>(&contents) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Override the database url when one is given.
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.database.url = url;
        }
        self
    }
}
