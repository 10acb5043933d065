//! GraphQL-over-HTTP invite store.
//!
//! Every user-supplied value travels as a GraphQL variable; query text is
//! constant.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::error::BackendError;

use super::traits::{ExistingInvite, InviteRecord, InviteStore, ResponseRecord};

const FIND_INVITE_QUERY: &str = "\
query FindInvite($userId: String!) {
  queryDiscordInvite(filter: { discordUserId: { eq: $userId } }) {
    id
    code
    isUsed
  }
}";

const ADD_INVITE_MUTATION: &str = "\
mutation AddInvite($invite: AddDiscordInviteInput!) {
  addDiscordInvite(input: [$invite]) {
    discordInvite {
      id
      code
    }
  }
}";

const ADD_RESPONSE_MUTATION: &str = "\
mutation AddResponse($response: AddQuizResponseInput!) {
  addQuizResponse(input: [$response]) {
    quizResponse {
      id
    }
  }
}";

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindInviteData {
    #[serde(default)]
    query_discord_invite: Option<Vec<ExistingInvite>>,
}

/// Invite store backed by a remote GraphQL endpoint.
pub struct GraphqlInviteStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    timeout: Duration,
}

impl GraphqlInviteStore {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Request(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one operation and unwrap its `data`, surfacing GraphQL errors.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, BackendError> {
        debug!(operation, "Sending GraphQL request");

        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", self.api_key.expose_secret())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout(self.timeout)
                } else {
                    BackendError::from(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GraphqlResponse<T> = resp.json().await?;
        if !parsed.errors.is_empty() {
            let message = parsed
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BackendError::Graphql {
                operation: operation.to_string(),
                message,
            });
        }

        parsed
            .data
            .ok_or_else(|| BackendError::InvalidResponse(format!("{operation}: missing data")))
    }
}

fn response_input(response: &ResponseRecord) -> Value {
    json!({
        "id": response.id,
        "questionType": response.question_type,
        "response": response.response,
        "discordInvite": { "id": response.invite_id },
    })
}

#[async_trait]
impl InviteStore for GraphqlInviteStore {
    async fn find_invite_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<ExistingInvite>, BackendError> {
        let data: FindInviteData = self
            .execute("FindInvite", FIND_INVITE_QUERY, json!({ "userId": user_id }))
            .await?;
        Ok(data
            .query_discord_invite
            .and_then(|invites| invites.into_iter().next()))
    }

    async fn record_invite(
        &self,
        invite: &InviteRecord,
        responses: &[ResponseRecord; 2],
    ) -> Result<(), BackendError> {
        info!(
            code = %invite.code,
            user_id = %invite.user_id,
            "Saving invite code"
        );

        self.execute::<Value>("AddInvite", ADD_INVITE_MUTATION, json!({ "invite": invite }))
            .await
            .map_err(|e| BackendError::WriteFailed {
                record: "invite".into(),
                id: invite.id.clone(),
                reason: e.to_string(),
            })?;

        for response in responses {
            self.execute::<Value>(
                "AddResponse",
                ADD_RESPONSE_MUTATION,
                json!({ "response": response_input(response) }),
            )
            .await
            .map_err(|e| BackendError::WriteFailed {
                record: format!("{} response", response.question_type),
                id: response.id.clone(),
                reason: e.to_string(),
            })?;
        }

        debug!(invite_id = %invite.id, "Invite and responses saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::traits::QuestionType;

    #[test]
    fn queries_take_variables_only() {
        for q in [FIND_INVITE_QUERY, ADD_INVITE_MUTATION, ADD_RESPONSE_MUTATION] {
            assert!(q.contains('$'));
            assert!(!q.contains("{}"));
        }
    }

    #[test]
    fn response_input_links_invite() {
        let r = ResponseRecord::new("discord-invite-1", QuestionType::Challenge, "say \"hi\"");
        let v = response_input(&r);
        assert_eq!(v["questionType"], "challenge");
        assert_eq!(v["response"], "say \"hi\"");
        assert_eq!(v["discordInvite"]["id"], "discord-invite-1");
    }
}
