//! # configs
//!
//! Layered application configuration: an optional `config.toml` in the
//! working directory, overridden by `CIVIC__`-prefixed environment
//! variables (e.g. `CIVIC__VOTING__RESOLVE_THRESHOLD=5`). Secrets are
//! wrapped in `secrecy` types so they never appear in debug output.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:civic_guardian.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Admin surface settings. The token has no default: the admin routes
/// stay unreachable until one is configured.
#[derive(Clone, Default, Deserialize)]
pub struct AdminConfig {
    pub token: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VotingConfig {
    pub resolve_threshold: i64,
    pub reopen_threshold: i64,
    /// Stage a complaint returns to when the reopen threshold is reached.
    pub reopen_stage: String,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            resolve_threshold: 3,
            reopen_threshold: 3,
            reopen_stage: "assigned".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub root_path: String,
    pub url_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root_path: "data/uploads".to_string(),
            url_prefix: "/uploads".to_string(),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub model: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TranscribeConfig {
    pub bind: String,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub poll_interval_ms: u64,
    pub max_polls: u32,
}

impl Default for TranscribeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            base_url: "https://api.assemblyai.com/v2".to_string(),
            api_key: None,
            poll_interval_ms: 1000,
            max_polls: 60,
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub voting: VotingConfig,
    pub media: MediaConfig,
    pub assist: AssistConfig,
    pub transcribe: TranscribeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("CIVIC").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// The admin token, required at startup of the main binary.
    pub fn require_admin_token(&self) -> Result<SecretString, ConfigError> {
        self.admin
            .token
            .clone()
            .ok_or(ConfigError::Missing("admin.token (CIVIC__ADMIN__TOKEN)"))
    }
}
