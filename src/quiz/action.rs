//! Custom ids carried by buttons and modals.
//!
//! Answer buttons encode `answer-{question}-{option}`; every other control
//! uses a fixed literal.

use std::fmt;
use std::str::FromStr;

use crate::error::QuizError;

pub const START_COMMAND: &str = "startquiz";
pub const HELP_COMMAND: &str = "help";

const ANSWER_PREFIX: &str = "answer";
const RESTART_ID: &str = "restart";
const SHOW_INITIAL_MODAL_ID: &str = "show-initial-modal";
const SHOW_FINAL_MODAL_ID: &str = "show-final-modal";

const INITIAL_MODAL_ID: &str = "initialQuestionModal";
const FINAL_MODAL_ID: &str = "finalQuestionModal";

/// A slash command the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartQuiz,
    Help,
}

impl FromStr for Command {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('/') {
            START_COMMAND => Ok(Self::StartQuiz),
            HELP_COMMAND => Ok(Self::Help),
            other => Err(QuizError::UnknownCommand(other.to_string())),
        }
    }
}

/// What a button click asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Answer { question: usize, option: usize },
    Restart,
    ShowInitialModal,
    ShowFinalModal,
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer { question, option } => write!(f, "{ANSWER_PREFIX}-{question}-{option}"),
            Self::Restart => f.write_str(RESTART_ID),
            Self::ShowInitialModal => f.write_str(SHOW_INITIAL_MODAL_ID),
            Self::ShowFinalModal => f.write_str(SHOW_FINAL_MODAL_ID),
        }
    }
}

impl FromStr for ButtonAction {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            RESTART_ID => return Ok(Self::Restart),
            SHOW_INITIAL_MODAL_ID => return Ok(Self::ShowInitialModal),
            SHOW_FINAL_MODAL_ID => return Ok(Self::ShowFinalModal),
            _ => {}
        }

        let unknown = || QuizError::UnknownInteraction(s.to_string());
        let mut parts = s.split('-');
        if parts.next() != Some(ANSWER_PREFIX) {
            return Err(unknown());
        }
        let question = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(unknown)?;
        let option = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(unknown)?;
        if parts.next().is_some() {
            return Err(unknown());
        }
        Ok(Self::Answer { question, option })
    }
}

/// Which free-text form was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Initial,
    Final,
}

impl ModalKind {
    pub fn custom_id(&self) -> &'static str {
        match self {
            Self::Initial => INITIAL_MODAL_ID,
            Self::Final => FINAL_MODAL_ID,
        }
    }

    /// Button that reopens this modal.
    pub fn reopen_action(&self) -> ButtonAction {
        match self {
            Self::Initial => ButtonAction::ShowInitialModal,
            Self::Final => ButtonAction::ShowFinalModal,
        }
    }
}

impl FromStr for ModalKind {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            INITIAL_MODAL_ID => Ok(Self::Initial),
            FINAL_MODAL_ID => Ok(Self::Final),
            other => Err(QuizError::UnknownInteraction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answer_button() {
        let action: ButtonAction = "answer-3-2".parse().unwrap();
        assert_eq!(
            action,
            ButtonAction::Answer {
                question: 3,
                option: 2
            }
        );
        assert_eq!(action.to_string(), "answer-3-2");
    }

    #[test]
    fn parse_literal_buttons() {
        assert_eq!("restart".parse::<ButtonAction>().unwrap(), ButtonAction::Restart);
        assert_eq!(
            "show-final-modal".parse::<ButtonAction>().unwrap(),
            ButtonAction::ShowFinalModal
        );
        assert_eq!(
            "show-initial-modal".parse::<ButtonAction>().unwrap(),
            ButtonAction::ShowInitialModal
        );
    }

    #[test]
    fn reject_malformed_buttons() {
        for bad in ["answer", "answer-1", "answer-x-1", "answer-1-2-3", "answer--1", "vote-1-2", ""] {
            assert!(bad.parse::<ButtonAction>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn commands_accept_leading_slash() {
        assert_eq!("/startquiz".parse::<Command>().unwrap(), Command::StartQuiz);
        assert_eq!("help".parse::<Command>().unwrap(), Command::Help);
        assert!(matches!(
            "ban".parse::<Command>(),
            Err(QuizError::UnknownCommand(name)) if name == "ban"
        ));
    }

    #[test]
    fn modal_ids_round_trip() {
        for kind in [ModalKind::Initial, ModalKind::Final] {
            assert_eq!(kind.custom_id().parse::<ModalKind>().unwrap(), kind);
        }
        assert!("someModal".parse::<ModalKind>().is_err());
    }
}
