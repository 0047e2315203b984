//! ApplyBot configuration.
//!
//! Loaded from TOML, with secrets filled in from the environment:
//!
//! ```toml
//! source_url = "https://example.com/posts/answers"
//! top_k = 4
//!
//! [openai]
//! chat_model = "gpt-3.5-turbo"
//! temperature = 0.2
//!
//! [server]
//! bind = "127.0.0.1:5000"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Page holding the applicant's previous answers.
pub const DEFAULT_SOURCE_URL: &str =
    "https://chriswillsflannery.vercel.app/posts/ragExamplesForJobApplication";

/// Identifies us to the source server. Replace the contact address with your own.
pub const DEFAULT_USER_AGENT: &str =
    "applybot/0.1 (job-application assistant; contact: applicant@example.com)";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_source_url() -> String { DEFAULT_SOURCE_URL.into() }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.into() }
fn default_top_k() -> usize { crate::retrieve::DEFAULT_TOP_K }
fn default_timeout() -> u64 { 30 }

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            user_agent: default_user_agent(),
            top_k: default_top_k(),
            request_timeout_secs: default_timeout(),
            openai: OpenAiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `./applybot.toml` if it exists, defaults otherwise.
    /// Environment overrides are applied either way.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from a specific path. Environment overrides are not applied.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Get the default config path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from("applybot.toml")
    }

    /// Fill secrets and endpoint overrides from the environment.
    ///
    /// - `OPENAI_API_KEY` is used when no key is configured
    /// - `OPENAI_API_BASE` replaces the configured base URL
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.openai.api_key.is_empty() {
            if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
                self.openai.api_key = key;
            }
        }
        if let Some(base) = lookup("OPENAI_API_BASE").filter(|b| !b.is_empty()) {
            self.openai.api_base = base.trim_end_matches('/').to_string();
        }
    }
}

/// Settings for the OpenAI-compatible embedding and chat endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_api_base() -> String { "https://api.openai.com/v1".into() }
fn default_embedding_model() -> String { "text-embedding-ada-002".into() }
fn default_chat_model() -> String { "gpt-3.5-turbo".into() }
fn default_temperature() -> f32 { 0.2 }

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            embedding_model: default_embedding_model(),
            chat_model: default_chat_model(),
            temperature: default_temperature(),
        }
    }
}

/// Web front end configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:5000".into() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}
