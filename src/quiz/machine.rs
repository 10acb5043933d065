//! QuizMachine — drives a user through the quiz and issues the invite.
//!
//! Every inbound interaction is classified, matched against the user's
//! session stage, and answered with one initial response plus optional
//! follow-ups. The machine never talks to the chat platform directly.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::channels::{Interaction, InteractionKind, InteractionUser, Reply, Response};
use crate::config::QuizConfig;
use crate::error::{Error, QuizError, Result};
use crate::store::{ExistingInvite, InviteRecord, InviteStore, QuestionType, ResponseRecord};

use super::action::{ButtonAction, Command, ModalKind};
use super::invite_code::InviteCodeGenerator;
use super::messages;
use super::questions::QuestionBank;
use super::session::{MIN_RESPONSE_CHARS, Session, SessionStore, Stage};

/// Coordinates sessions, scoring, and invite issuance.
pub struct QuizMachine {
    bank: Arc<QuestionBank>,
    sessions: Arc<dyn SessionStore>,
    invites: Arc<dyn InviteStore>,
    codes: InviteCodeGenerator,
    config: QuizConfig,
}

impl QuizMachine {
    pub fn new(
        bank: Arc<QuestionBank>,
        sessions: Arc<dyn SessionStore>,
        invites: Arc<dyn InviteStore>,
        config: QuizConfig,
    ) -> Self {
        Self {
            bank,
            sessions,
            invites,
            codes: InviteCodeGenerator::new(),
            config,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Produce the reply for one interaction.
    ///
    /// Missing or mismatched sessions are answered with the session-expired
    /// message rather than an error. `Err` means the interaction could not
    /// be understood at all.
    pub async fn handle(&self, interaction: &Interaction) -> Result<Reply> {
        match self.route(interaction).await {
            Err(Error::Quiz(QuizError::SessionExpired { user_id })) => {
                debug!(%user_id, "Answering with session expired");
                Ok(messages::session_expired().into())
            }
            other => other,
        }
    }

    async fn route(&self, interaction: &Interaction) -> Result<Reply> {
        match &interaction.kind {
            InteractionKind::Command { name } => {
                let command: Command = name.parse()?;
                if let Some(refusal) = self.check_channel(interaction) {
                    return Ok(refusal.into());
                }
                match command {
                    Command::StartQuiz => Ok(self.start(&interaction.user).await),
                    Command::Help => Ok(messages::help(&self.config).into()),
                }
            }
            InteractionKind::Button { custom_id } => {
                let action: ButtonAction = custom_id.parse()?;
                if let Some(refusal) = self.check_channel(interaction) {
                    return Ok(refusal.into());
                }
                match action {
                    ButtonAction::Restart => Ok(self.start(&interaction.user).await),
                    ButtonAction::Answer { question, option } => {
                        self.answer(interaction.user_id(), question, option).await
                    }
                    ButtonAction::ShowInitialModal => {
                        self.reopen_modal(interaction.user_id(), ModalKind::Initial)
                            .await
                    }
                    ButtonAction::ShowFinalModal => {
                        self.reopen_modal(interaction.user_id(), ModalKind::Final).await
                    }
                }
            }
            InteractionKind::ModalSubmit { custom_id, value } => {
                match custom_id.parse::<ModalKind>()? {
                    ModalKind::Initial => self.submit_initial(interaction.user_id(), value).await,
                    ModalKind::Final => self.submit_final(&interaction.user, value).await,
                }
            }
        }
    }

    /// Refuse commands and buttons from outside the quiz channel.
    fn check_channel(&self, interaction: &Interaction) -> Option<Response> {
        let required = self.config.channel_name.as_deref()?;
        match interaction.channel_name.as_deref() {
            Some(actual) if actual == required => None,
            actual => {
                debug!(
                    user_id = %interaction.user.id,
                    channel = ?actual,
                    "Interaction outside quiz channel"
                );
                Some(messages::wrong_channel(required))
            }
        }
    }

    /// Begin (or restart) the quiz, unless the user already holds an invite.
    pub async fn start(&self, user: &InteractionUser) -> Reply {
        if let Some(existing) = self.lookup_existing(&user.id).await {
            info!(user_id = %user.id, "User already holds an invite");
            return messages::existing_invite(&existing.code, existing.is_used).into();
        }

        self.sessions.create(&user.id).await;
        info!(user_id = %user.id, "Quiz session started");
        messages::modal(ModalKind::Initial).into()
    }

    /// Existing-invite lookup. Backend failures read as "no invite" so the
    /// quiz stays available.
    async fn lookup_existing(&self, user_id: &str) -> Option<ExistingInvite> {
        match self.invites.find_invite_for_user(user_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(user_id, error = %e, "Invite lookup failed, assuming none exists");
                None
            }
        }
    }

    /// Load the session only if it is in `expected` stage.
    async fn session_in(&self, user_id: &str, expected: Stage) -> Result<Session, QuizError> {
        match self.sessions.get(user_id).await {
            Some(session) if session.stage == expected => Ok(session),
            Some(session) => {
                debug!(
                    user_id,
                    stage = %session.stage,
                    expected = %expected,
                    "Interaction does not match session stage"
                );
                Err(QuizError::SessionExpired {
                    user_id: user_id.to_string(),
                })
            }
            None => {
                debug!(user_id, "No active session");
                Err(QuizError::SessionExpired {
                    user_id: user_id.to_string(),
                })
            }
        }
    }

    async fn reopen_modal(&self, user_id: &str, kind: ModalKind) -> Result<Reply> {
        let expected = match kind {
            ModalKind::Initial => Stage::AwaitingInitialResponse,
            ModalKind::Final => Stage::AwaitingFinalResponse,
        };
        self.session_in(user_id, expected).await?;
        Ok(messages::modal(kind).into())
    }

    /// AwaitingInitialResponse → InQuiz(0).
    async fn submit_initial(&self, user_id: &str, text: &str) -> Result<Reply> {
        let mut session = self
            .session_in(user_id, Stage::AwaitingInitialResponse)
            .await?;
        if too_short(text) {
            return Ok(messages::response_too_short(ModalKind::Initial).into());
        }

        session.begin_quiz(text.to_string());
        self.sessions.save(session).await;
        debug!(user_id, "Initial response stored");

        Ok(Reply::new(messages::initial_acknowledged()).with_follow_up(self.question_prompt(0)))
    }

    /// InQuiz(i) → InQuiz(i + 1) | AwaitingFinalResponse.
    async fn answer(&self, user_id: &str, question: usize, option: usize) -> Result<Reply> {
        let mut session = self.session_in(user_id, Stage::InQuiz(question)).await?;

        let q = self.bank.get(question)?;
        let correct = q.is_correct(option);
        let is_last = self.bank.is_last(question);
        session.record_answer(correct, is_last);
        let score = session.correct_count;
        self.sessions.save(session).await;

        debug!(user_id, question, option, correct, score, "Answer recorded");

        let reply = Reply::new(messages::answer_feedback(correct, q));
        Ok(if is_last {
            reply.with_follow_up(messages::final_prompt())
        } else {
            reply.with_follow_up(self.question_prompt(question + 1))
        })
    }

    /// AwaitingFinalResponse → Completed. Issues the invite and drops the
    /// session.
    async fn submit_final(&self, user: &InteractionUser, text: &str) -> Result<Reply> {
        let mut session = self
            .session_in(&user.id, Stage::AwaitingFinalResponse)
            .await?;
        if too_short(text) {
            return Ok(messages::response_too_short(ModalKind::Final).into());
        }

        session.complete(text.to_string());

        let code = self.codes.generate();
        let invite = InviteRecord::new(&user.id, &user.tag, &code, session.correct_count);
        let responses = [
            ResponseRecord::new(
                &invite.id,
                QuestionType::Initial,
                session.open_responses.initial.clone().unwrap_or_default(),
            ),
            ResponseRecord::new(
                &invite.id,
                QuestionType::Challenge,
                session.open_responses.challenge.clone().unwrap_or_default(),
            ),
        ];

        // The code is shown even when the write fails.
        if let Err(e) = self.invites.record_invite(&invite, &responses).await {
            error!(
                user_id = %user.id,
                invite_id = %invite.id,
                error = %e,
                "Failed to persist invite"
            );
        }

        self.sessions.delete(&user.id).await;
        info!(
            user_id = %user.id,
            score = session.correct_count,
            total = self.bank.count(),
            "Quiz completed, invite issued"
        );

        Ok(messages::completion(session.correct_count, self.bank.count(), &code, &self.config).into())
    }

    fn question_prompt(&self, index: usize) -> Response {
        match self.bank.get(index) {
            Ok(q) => messages::question(index, self.bank.count(), q),
            // Indices come from the session, which never leaves the bank.
            Err(_) => messages::session_expired(),
        }
    }
}

fn too_short(text: &str) -> bool {
    text.trim().chars().count() < MIN_RESPONSE_CHARS
}
