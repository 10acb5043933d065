//! Error types for the invite quiz bot.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Invalid interaction: {0}")]
    InvalidInteraction(String),
}

/// Errors talking to the remote invite store.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Request to backend failed: {0}")]
    Request(String),

    #[error("Backend request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend rejected {operation}: {message}")]
    Graphql { operation: String, message: String },

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("Failed to write {record} record {id}: {reason}")]
    WriteFailed {
        record: String,
        id: String,
        reason: String,
    },
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Quiz flow errors.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("No active quiz session for user {user_id}")]
    SessionExpired { user_id: String },

    #[error("Question {index} out of range ({count} questions)")]
    QuestionOutOfRange { index: usize, count: usize },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown interaction id: {0}")]
    UnknownInteraction(String),
}

/// Result type alias for the bot. Domain code may name a narrower error.
pub type Result<T, E = Error> = std::result::Result<T, E>;
