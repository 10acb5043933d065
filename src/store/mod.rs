//! Persistence layer — where issued invites and their responses live.

pub mod graphql;
pub mod memory;
pub mod traits;

pub use graphql::GraphqlInviteStore;
pub use memory::MemoryInviteStore;
pub use traits::{ExistingInvite, InviteRecord, InviteStore, QuestionType, ResponseRecord};
