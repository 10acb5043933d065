//! In-process invite store, used when no backend endpoint is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::BackendError;

use super::traits::{ExistingInvite, InviteRecord, InviteStore, ResponseRecord};

#[derive(Default)]
struct Inner {
    /// Invites keyed by user id.
    invites: HashMap<String, InviteRecord>,
    responses: Vec<ResponseRecord>,
}

/// Keeps invites in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryInviteStore {
    inner: RwLock<Inner>,
}

impl MemoryInviteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn invite_for(&self, user_id: &str) -> Option<InviteRecord> {
        self.inner.read().await.invites.get(user_id).cloned()
    }

    pub async fn responses_for(&self, invite_id: &str) -> Vec<ResponseRecord> {
        self.inner
            .read()
            .await
            .responses
            .iter()
            .filter(|r| r.invite_id == invite_id)
            .cloned()
            .collect()
    }

    /// Mark an invite redeemed. Redemption happens on the registration
    /// site, outside this bot; this stands in for that external write.
    /// Returns whether a matching code was found.
    pub async fn mark_used(&self, code: &str) -> bool {
        let mut inner = self.inner.write().await;
        match inner.invites.values_mut().find(|i| i.code == code) {
            Some(invite) => {
                invite.is_used = true;
                true
            }
            None => false,
        }
    }

    /// Number of users holding an invite. Inspection only; the bot never
    /// needs it.
    pub async fn invite_count(&self) -> usize {
        self.inner.read().await.invites.len()
    }
}

#[async_trait]
impl InviteStore for MemoryInviteStore {
    async fn find_invite_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<ExistingInvite>, BackendError> {
        Ok(self
            .inner
            .read()
            .await
            .invites
            .get(user_id)
            .map(|i| ExistingInvite {
                code: i.code.clone(),
                is_used: i.is_used,
            }))
    }

    async fn record_invite(
        &self,
        invite: &InviteRecord,
        responses: &[ResponseRecord; 2],
    ) -> Result<(), BackendError> {
        let mut inner = self.inner.write().await;
        inner
            .invites
            .insert(invite.user_id.clone(), invite.clone());
        inner.responses.extend(responses.iter().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::traits::QuestionType;

    #[tokio::test]
    async fn record_then_find() {
        let store = MemoryInviteStore::new();
        assert!(store.find_invite_for_user("u1").await.unwrap().is_none());

        let invite = InviteRecord::new("u1", "alice", "ABCDEF", 3);
        let responses = [
            ResponseRecord::new(&invite.id, QuestionType::Initial, "first"),
            ResponseRecord::new(&invite.id, QuestionType::Challenge, "second"),
        ];
        store.record_invite(&invite, &responses).await.unwrap();

        let found = store.find_invite_for_user("u1").await.unwrap().unwrap();
        assert_eq!(found.code, "ABCDEF");
        assert!(!found.is_used);
        assert_eq!(store.responses_for(&invite.id).await.len(), 2);
    }

    #[tokio::test]
    async fn mark_used_flags_invite() {
        let store = MemoryInviteStore::new();
        let invite = InviteRecord::new("u1", "alice", "ABCDEF", 5);
        let responses = [
            ResponseRecord::new(&invite.id, QuestionType::Initial, "a"),
            ResponseRecord::new(&invite.id, QuestionType::Challenge, "b"),
        ];
        store.record_invite(&invite, &responses).await.unwrap();

        assert!(store.mark_used("ABCDEF").await);
        assert!(!store.mark_used("ZZZZZZ").await);
        assert!(store.find_invite_for_user("u1").await.unwrap().unwrap().is_used);
    }
}
