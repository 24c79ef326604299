use std::time::Duration;

use thiserror::Error;

/// Errors from history store operations (used by trait definitions in convo-core).
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The stored encoding could not be read back as a message sequence.
    #[error("corrupt history: {0}")]
    Corrupt(String),

    /// The backing store could not be reached or rejected the command.
    #[error("history backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid session id")]
    InvalidSession,

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The provider is rate limiting or overloaded; a later retry may work.
    #[error("model busy: {0}")]
    ModelBusy(String),

    #[error("model did not answer within {0:?}")]
    ModelTimeout(Duration),

    #[error("corrupt history: {0}")]
    CorruptHistory(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<HistoryError> for ChatError {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::Corrupt(msg) => ChatError::CorruptHistory(msg),
            HistoryError::Backend(msg) => ChatError::Storage(msg),
        }
    }
}

/// Errors from loading or validating the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(String),

    #[error("failed to parse config file: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
