//! Quiz conversation — questions, per-user sessions, scoring, and invite
//! issuance.
//!
//! A user moves through a fixed flow: an opening free-text question, a run
//! of multiple-choice questions, and a closing free-text question. Finishing
//! the flow mints an invite code that is recorded in the invite store.

pub mod action;
pub mod invite_code;
pub mod machine;
pub mod messages;
pub mod questions;
pub mod session;

pub use action::{ButtonAction, Command, ModalKind};
pub use invite_code::InviteCodeGenerator;
pub use machine::QuizMachine;
pub use questions::{Question, QuestionBank};
pub use session::{InMemorySessionStore, OpenResponses, Session, SessionStore, Stage};
