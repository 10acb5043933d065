//! CLI channel — play the quiz from a terminal.
//!
//! Input lines:
//! - `/startquiz`, `/help` — slash commands
//! - `click <custom_id>` — press a button
//! - `submit <modal_id> <text>` — submit a modal

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::channels::{
    Channel, Interaction, InteractionStream, InteractionUser, Response,
};
use crate::error::ChannelError;

/// A terminal channel acting as a single user in a fixed channel.
pub struct CliChannel {
    user: InteractionUser,
    channel_name: String,
}

impl CliChannel {
    pub fn new(user: InteractionUser, channel_name: impl Into<String>) -> Self {
        Self {
            user,
            channel_name: channel_name.into(),
        }
    }
}

/// Turn one input line into an interaction.
pub fn parse_line(
    line: &str,
    user: &InteractionUser,
    channel_name: &str,
) -> Result<Interaction, ChannelError> {
    let line = line.trim();
    if let Some(command) = line.strip_prefix('/') {
        return Ok(Interaction::command(user.clone(), channel_name, command.trim()));
    }

    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    match verb {
        "click" if !rest.trim().is_empty() => {
            Ok(Interaction::button(user.clone(), channel_name, rest.trim()))
        }
        "submit" => {
            let (modal_id, text) = rest.trim().split_once(' ').ok_or_else(|| {
                ChannelError::InvalidInteraction("usage: submit <modal_id> <text>".into())
            })?;
            Ok(Interaction::modal_submit(user.clone(), modal_id, text.trim()))
        }
        _ => Err(ChannelError::InvalidInteraction(format!(
            "unrecognized input: {line}"
        ))),
    }
}

/// Render a response for the terminal.
pub fn render(response: &Response) -> String {
    match response {
        Response::Message(message) => {
            let mut out = message.content.clone();
            for button in &message.buttons {
                out.push_str(&format!("\n  [{}] {}", button.custom_id, button.label));
            }
            out
        }
        Response::Modal(modal) => format!(
            "📝 {}\n{}\n  (reply with: submit {} <{}-{} characters>)",
            modal.title, modal.label, modal.custom_id, modal.min_len, modal.max_len
        ),
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<InteractionStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let user = self.user.clone();
        let channel_name = self.channel_name.clone();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            eprint!("> ");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        match parse_line(&line, &user, &channel_name) {
                            Ok(interaction) => {
                                if tx.send(interaction).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                eprintln!("⚠️  {e}");
                                eprint!("> ");
                            }
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    async fn respond(
        &self,
        _interaction: &Interaction,
        response: Response,
    ) -> Result<(), ChannelError> {
        println!("\n{}\n", render(&response));
        eprint!("> ");
        Ok(())
    }

    async fn follow_up(
        &self,
        _interaction: &Interaction,
        response: Response,
    ) -> Result<(), ChannelError> {
        println!("{}\n", render(&response));
        eprint!("> ");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{Button, ButtonStyle, InteractionKind};

    fn user() -> InteractionUser {
        InteractionUser {
            id: "local-user".into(),
            tag: "local-user".into(),
        }
    }

    #[test]
    fn parses_commands() {
        let i = parse_line("/startquiz", &user(), "invite-codes").unwrap();
        assert_eq!(
            i.kind,
            InteractionKind::Command {
                name: "startquiz".into()
            }
        );
        assert_eq!(i.channel_name.as_deref(), Some("invite-codes"));
    }

    #[test]
    fn parses_clicks_and_submits() {
        let i = parse_line("click answer-0-1", &user(), "invite-codes").unwrap();
        assert_eq!(
            i.kind,
            InteractionKind::Button {
                custom_id: "answer-0-1".into()
            }
        );

        let i = parse_line(
            "submit initialQuestionModal I rode a unicycle down a hill",
            &user(),
            "invite-codes",
        )
        .unwrap();
        assert_eq!(
            i.kind,
            InteractionKind::ModalSubmit {
                custom_id: "initialQuestionModal".into(),
                value: "I rode a unicycle down a hill".into(),
            }
        );
        assert!(i.channel_name.is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_line("hello", &user(), "c").is_err());
        assert!(parse_line("click", &user(), "c").is_err());
        assert!(parse_line("submit onlyid", &user(), "c").is_err());
    }

    #[test]
    fn render_lists_buttons() {
        let response = Response::private_with_buttons(
            "Pick one",
            vec![Button {
                custom_id: "answer-0-0".into(),
                label: "Hourly".into(),
                style: ButtonStyle::Primary,
            }],
        );
        assert_eq!(render(&response), "Pick one\n  [answer-0-0] Hourly");
    }
}
