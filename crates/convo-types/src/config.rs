//! Service configuration types.
//!
//! `ServiceConfig` represents the top-level `config.toml`: which history
//! backend to use and its window/expiry settings, the model collaborator's
//! settings, and the HTTP bind address. All fields have sensible defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// Top-level configuration for the chat service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

impl ServiceConfig {
    /// Reject settings that would break the store or model contracts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_messages == 0 {
            return Err(ConfigError::Invalid(
                "history.max_messages must be at least 1".to_string(),
            ));
        }
        if self.history.redis.ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "history.redis.ttl_secs must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::Invalid(format!(
                "model.temperature must be within 0.0..=2.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "model.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.history.memory.idle_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "history.memory.idle_timeout_secs must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which store backs session histories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    /// Process-local map; lost on restart.
    #[default]
    Memory,
    /// Networked key-value cache with per-session expiry.
    Redis,
}

impl fmt::Display for HistoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryBackend::Memory => write!(f, "memory"),
            HistoryBackend::Redis => write!(f, "redis"),
        }
    }
}

/// History store settings shared by both backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub backend: HistoryBackend,

    /// Maximum number of messages retained per session.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    #[serde(default)]
    pub redis: RedisConfig,

    #[serde(default)]
    pub memory: MemoryConfig,
}

fn default_max_messages() -> usize {
    10
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::default(),
            max_messages: default_max_messages(),
            redis: RedisConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

/// Settings for the networked cache backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Expiry applied to a session key on every write.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Prepended to the session id to form the cache key. Empty by default,
    /// so the raw session id is the key.
    #[serde(default)]
    pub key_prefix: String,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            ttl_secs: default_ttl_secs(),
            key_prefix: String::new(),
        }
    }
}

/// Settings for the in-process backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Evict sessions untouched for this long. `None` keeps them forever.
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,

    /// How often the idle sweeper runs.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: None,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Which OpenAI-compatible endpoint the model collaborator talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelProvider {
    #[default]
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelProvider::Gemini => write!(f, "gemini"),
            ModelProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Model collaborator settings, fixed per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: ModelProvider,

    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single model call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Override the provider's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_model_name() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f64 {
    0.5
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            name: default_model_name(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            system_prompt: None,
            base_url: None,
        }
    }
}
