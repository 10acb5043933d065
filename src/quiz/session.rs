//! Per-user quiz sessions and the store that owns them.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// Longest free-text response kept, in characters.
pub const MAX_RESPONSE_CHARS: usize = 1000;

/// Shortest free-text response accepted, in characters.
pub const MIN_RESPONSE_CHARS: usize = 10;

/// Where a user is in the quiz conversation.
///
/// Progresses: AwaitingInitialResponse → InQuiz(0) → … → InQuiz(n-1) →
/// AwaitingFinalResponse → Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "question", rename_all = "snake_case")]
pub enum Stage {
    AwaitingInitialResponse,
    InQuiz(usize),
    AwaitingFinalResponse,
    Completed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingInitialResponse => write!(f, "awaiting_initial_response"),
            Self::InQuiz(i) => write!(f, "in_quiz({i})"),
            Self::AwaitingFinalResponse => write!(f, "awaiting_final_response"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// The two free-text answers collected outside the multiple-choice flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenResponses {
    pub initial: Option<String>,
    pub challenge: Option<String>,
}

/// In-progress quiz state for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub stage: Stage,
    pub correct_count: u32,
    pub open_responses: OpenResponses,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            stage: Stage::AwaitingInitialResponse,
            correct_count: 0,
            open_responses: OpenResponses::default(),
            started_at: Utc::now(),
        }
    }

    /// Store the initial response and move to the first question.
    pub fn begin_quiz(&mut self, initial: String) {
        debug_assert_eq!(self.stage, Stage::AwaitingInitialResponse);
        self.open_responses.initial = Some(clamp_response(initial));
        self.stage = Stage::InQuiz(0);
    }

    /// Record an answer to the current question and advance.
    ///
    /// `is_last` moves to `AwaitingFinalResponse` instead of the next question.
    pub fn record_answer(&mut self, correct: bool, is_last: bool) {
        let Stage::InQuiz(index) = self.stage else {
            debug_assert!(false, "record_answer outside InQuiz: {}", self.stage);
            return;
        };
        if correct {
            self.correct_count += 1;
        }
        self.stage = if is_last {
            Stage::AwaitingFinalResponse
        } else {
            Stage::InQuiz(index + 1)
        };
    }

    /// Store the challenge response and mark the session completed.
    pub fn complete(&mut self, challenge: String) {
        debug_assert_eq!(self.stage, Stage::AwaitingFinalResponse);
        self.open_responses.challenge = Some(clamp_response(challenge));
        self.stage = Stage::Completed;
    }
}

/// Trim and cut a free-text response to `MAX_RESPONSE_CHARS`.
pub fn clamp_response(text: String) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX_RESPONSE_CHARS) {
        Some((cut, _)) => trimmed[..cut].to_string(),
        None => trimmed.to_string(),
    }
}

/// Owner of all live sessions, keyed by user id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a fresh session, replacing any existing one for the user.
    async fn create(&self, user_id: &str) -> Session;

    async fn get(&self, user_id: &str) -> Option<Session>;

    /// Write back a mutated session.
    async fn save(&self, session: Session);

    /// Remove a session. Returns whether one existed.
    async fn delete(&self, user_id: &str) -> bool;

    async fn len(&self) -> usize;
}

/// Process-local session store. Sessions do not survive restarts.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user_id: &str) -> Session {
        let session = Session::new(user_id);
        let previous = self
            .sessions
            .write()
            .await
            .insert(user_id.to_string(), session.clone());
        if let Some(prev) = previous {
            debug!(user_id, stage = %prev.stage, "Discarded previous quiz session");
        }
        session
    }

    async fn get(&self, user_id: &str) -> Option<Session> {
        self.sessions.read().await.get(user_id).cloned()
    }

    async fn save(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.user_id.clone(), session);
    }

    async fn delete(&self, user_id: &str) -> bool {
        self.sessions.write().await.remove(user_id).is_some()
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
