//! `InviteStore` trait — async interface to wherever invites are persisted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BackendError;

/// Summary of an invite a user already holds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingInvite {
    pub code: String,
    #[serde(default)]
    pub is_used: bool,
}

/// An issued invite, as written to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRecord {
    pub id: String,
    pub code: String,
    #[serde(rename = "discordUserId")]
    pub user_id: String,
    #[serde(rename = "discordUsername")]
    pub username: String,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    pub quiz_score: u32,
}

impl InviteRecord {
    /// Build a fresh, unused invite with a newly generated id.
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        code: impl Into<String>,
        quiz_score: u32,
    ) -> Self {
        Self {
            id: format!("discord-invite-{}", Uuid::new_v4()),
            code: code.into(),
            user_id: user_id.into(),
            username: username.into(),
            is_used: false,
            created_at: Utc::now(),
            quiz_score,
        }
    }
}

/// Which free-text prompt a response answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Initial,
    Challenge,
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Challenge => write!(f, "challenge"),
        }
    }
}

/// A free-text response attached to an invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub id: String,
    pub question_type: QuestionType,
    pub response: String,
    pub invite_id: String,
}

impl ResponseRecord {
    pub fn new(invite_id: &str, question_type: QuestionType, response: impl Into<String>) -> Self {
        Self {
            id: format!("quiz-response-{question_type}-{}", Uuid::new_v4()),
            question_type,
            response: response.into(),
            invite_id: invite_id.to_string(),
        }
    }
}

/// Backend-agnostic invite persistence.
#[async_trait]
pub trait InviteStore: Send + Sync {
    /// Look up the invite already issued to a user, if any.
    async fn find_invite_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<ExistingInvite>, BackendError>;

    /// Write an invite header, then each response, as independent writes.
    ///
    /// Stops at the first failing write and reports it. Writes that already
    /// succeeded are not rolled back, so an invite may exist with missing
    /// responses.
    async fn record_invite(
        &self,
        invite: &InviteRecord,
        responses: &[ResponseRecord; 2],
    ) -> Result<(), BackendError>;
}
