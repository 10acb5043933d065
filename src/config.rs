//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Channel that quiz commands and buttons are restricted to.
pub const DEFAULT_QUIZ_CHANNEL: &str = "invite-codes";

pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// Bot configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Remote invite store. `None` keeps invites in memory.
    pub backend: Option<BackendConfig>,
    pub quiz: QuizConfig,
    /// Identity used for interactions typed into the CLI channel.
    pub cli_user_id: String,
    pub cli_username: String,
}

/// Connection settings for the GraphQL invite store.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub endpoint: String,
    pub api_key: SecretString,
    pub timeout: Duration,
}

/// Settings consumed by the quiz state machine.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Only commands and buttons from this channel are accepted.
    /// `None` accepts interactions from any channel.
    pub channel_name: Option<String>,
    pub whitepaper_url: String,
    pub registration_url: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            channel_name: Some(DEFAULT_QUIZ_CHANNEL.to_string()),
            whitepaper_url: "https://www.nocena.com/assets/whitepaper-B2kZZbgT.pdf".to_string(),
            registration_url: "https://www.newapp.nocena.com".to_string(),
        }
    }
}

impl BotConfig {
    /// Build config from environment variables.
    ///
    /// The backend is enabled when `QUIZ_BACKEND_ENDPOINT` is set, in which
    /// case `QUIZ_BACKEND_API_KEY` becomes required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("QUIZ_BACKEND_ENDPOINT") {
            Some(endpoint) if !endpoint.trim().is_empty() => {
                let api_key = lookup("QUIZ_BACKEND_API_KEY")
                    .ok_or_else(|| ConfigError::MissingEnvVar("QUIZ_BACKEND_API_KEY".into()))?;
                let timeout_secs = match lookup("QUIZ_BACKEND_TIMEOUT_SECS") {
                    Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                        ConfigError::InvalidValue {
                            key: "QUIZ_BACKEND_TIMEOUT_SECS".into(),
                            message: e.to_string(),
                        }
                    })?,
                    None => DEFAULT_BACKEND_TIMEOUT_SECS,
                };
                Some(BackendConfig {
                    endpoint: endpoint.trim().to_string(),
                    api_key: SecretString::from(api_key),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            _ => None,
        };

        let mut quiz = QuizConfig::default();
        if let Some(name) = lookup("QUIZ_CHANNEL_NAME") {
            // "*" lifts the channel restriction.
            quiz.channel_name = match name.trim() {
                "" | "*" => None,
                other => Some(other.to_string()),
            };
        }
        if let Some(url) = lookup("QUIZ_WHITEPAPER_URL") {
            quiz.whitepaper_url = url;
        }
        if let Some(url) = lookup("QUIZ_REGISTRATION_URL") {
            quiz.registration_url = url;
        }

        let cli_user_id = lookup("QUIZ_CLI_USER_ID").unwrap_or_else(|| "local-user".to_string());
        let cli_username = lookup("QUIZ_CLI_USERNAME").unwrap_or_else(|| cli_user_id.clone());

        Ok(Self {
            backend,
            quiz,
            cli_user_id,
            cli_username,
        })
    }
}
