//! Channel trait and the interaction types that flow through it.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChannelError;

/// The user that produced an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionUser {
    /// Platform-stable user id.
    pub id: String,
    /// Display tag, e.g. `name#1234`.
    pub tag: String,
}

/// What kind of interaction arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionKind {
    /// Slash command invocation.
    Command { name: String },
    /// Button activation.
    Button { custom_id: String },
    /// Modal submission carrying a single free-text field.
    ModalSubmit { custom_id: String, value: String },
}

/// An inbound interaction event from a chat platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub user: InteractionUser,
    /// Name of the channel the interaction came from. Modal submissions
    /// usually have none.
    pub channel_name: Option<String>,
    pub kind: InteractionKind,
    pub received_at: DateTime<Utc>,
}

impl Interaction {
    fn new(user: InteractionUser, channel_name: Option<String>, kind: InteractionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            channel_name,
            kind,
            received_at: Utc::now(),
        }
    }

    pub fn command(user: InteractionUser, channel: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            user,
            Some(channel.into()),
            InteractionKind::Command { name: name.into() },
        )
    }

    pub fn button(
        user: InteractionUser,
        channel: impl Into<String>,
        custom_id: impl Into<String>,
    ) -> Self {
        Self::new(
            user,
            Some(channel.into()),
            InteractionKind::Button {
                custom_id: custom_id.into(),
            },
        )
    }

    pub fn modal_submit(
        user: InteractionUser,
        custom_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            user,
            None,
            InteractionKind::ModalSubmit {
                custom_id: custom_id.into(),
                value: value.into(),
            },
        )
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Visual weight of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Success,
    Secondary,
}

/// A clickable control attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
}

/// A plain message with optional buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub content: String,
    pub buttons: Vec<Button>,
    /// Visible only to the user who triggered the interaction.
    pub ephemeral: bool,
}

/// A modal form with a single paragraph input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalPrompt {
    pub custom_id: String,
    pub title: String,
    pub label: String,
    pub placeholder: String,
    pub min_len: usize,
    pub max_len: usize,
}

/// One outbound response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Message(MessagePayload),
    Modal(ModalPrompt),
}

impl Response {
    /// Private text message.
    pub fn private(content: impl Into<String>) -> Self {
        Self::Message(MessagePayload {
            content: content.into(),
            buttons: Vec::new(),
            ephemeral: true,
        })
    }

    /// Private text message with buttons.
    pub fn private_with_buttons(content: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self::Message(MessagePayload {
            content: content.into(),
            buttons,
            ephemeral: true,
        })
    }

    /// Text content, if this is a message.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Message(m) => Some(&m.content),
            Self::Modal(_) => None,
        }
    }

    pub fn buttons(&self) -> &[Button] {
        match self {
            Self::Message(m) => &m.buttons,
            Self::Modal(_) => &[],
        }
    }
}

/// Everything produced for a single interaction: exactly one initial
/// response and any follow-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub initial: Response,
    pub follow_ups: Vec<Response>,
}

impl Reply {
    pub fn new(initial: Response) -> Self {
        Self {
            initial,
            follow_ups: Vec::new(),
        }
    }

    pub fn with_follow_up(mut self, response: Response) -> Self {
        self.follow_ups.push(response);
        self
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::new(response)
    }
}

/// Stream of inbound interactions.
pub type InteractionStream = Pin<Box<dyn Stream<Item = Interaction> + Send>>;

/// A chat platform connection: event source plus response sink.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &str;

    /// Start receiving interactions.
    async fn start(&self) -> Result<InteractionStream, ChannelError>;

    /// Send the initial response that acknowledges an interaction.
    async fn respond(
        &self,
        interaction: &Interaction,
        response: Response,
    ) -> Result<(), ChannelError>;

    /// Send a follow-up after the interaction has been acknowledged.
    async fn follow_up(
        &self,
        interaction: &Interaction,
        response: Response,
    ) -> Result<(), ChannelError>;

    /// Check the connection is healthy.
    async fn health_check(&self) -> Result<(), ChannelError>;

    /// Gracefully shut down.
    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> InteractionUser {
        InteractionUser {
            id: "42".into(),
            tag: "alice#0001".into(),
        }
    }

    #[test]
    fn modal_submit_has_no_channel() {
        let i = Interaction::modal_submit(user(), "initialQuestionModal", "hello there");
        assert!(i.channel_name.is_none());
        assert_eq!(i.user_id(), "42");
    }

    #[test]
    fn private_responses_are_ephemeral() {
        match Response::private("hi") {
            Response::Message(m) => {
                assert!(m.ephemeral);
                assert!(m.buttons.is_empty());
            }
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn interaction_kind_serializes_tagged() {
        let kind = InteractionKind::Button {
            custom_id: "restart".into(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "button");
        assert_eq!(json["custom_id"], "restart");
    }
}
