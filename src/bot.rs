//! QuizBot — pulls interactions off a channel and answers each one in its
//! own task.
//!
//! This is the failure boundary: nothing that goes wrong while handling a
//! single interaction escapes to stop the bot.

use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::channels::{Channel, Interaction};
use crate::error::Result;
use crate::quiz::QuizMachine;
use crate::quiz::messages;

/// How a single interaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Initial response and `follow_ups` follow-ups were delivered.
    Delivered { follow_ups: usize },
    /// The handler failed; the apology was sent instead.
    Faulted,
    /// The initial response could not be delivered.
    Undelivered,
}

pub struct QuizBot {
    machine: Arc<QuizMachine>,
    channel: Arc<dyn Channel>,
}

impl QuizBot {
    pub fn new(machine: Arc<QuizMachine>, channel: Arc<dyn Channel>) -> Self {
        Self { machine, channel }
    }

    /// Run until the channel's interaction stream ends.
    pub async fn run(&self) -> Result<()> {
        self.channel.health_check().await?;
        let mut stream = self.channel.start().await?;
        info!(channel = self.channel.name(), "Quiz bot listening");

        let mut in_flight = JoinSet::new();
        while let Some(interaction) = stream.next().await {
            let machine = Arc::clone(&self.machine);
            let channel = Arc::clone(&self.channel);
            in_flight.spawn(async move { dispatch(&machine, channel.as_ref(), interaction).await });

            // Reap finished tasks so the set stays small.
            while in_flight.try_join_next().is_some() {}
        }

        info!(channel = self.channel.name(), "Interaction stream closed");
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Interaction task panicked");
            }
        }
        self.channel.shutdown().await?;
        Ok(())
    }
}

/// Handle one interaction end to end.
///
/// A handler error is answered with a generic apology, since nothing has
/// been sent yet. Delivery errors are logged only: once the interaction is
/// acknowledged, no second acknowledgement is possible.
pub async fn dispatch(
    machine: &QuizMachine,
    channel: &dyn Channel,
    interaction: Interaction,
) -> DispatchOutcome {
    debug!(
        interaction_id = %interaction.id,
        user_id = %interaction.user.id,
        kind = ?interaction.kind,
        "Dispatching interaction"
    );

    let reply = match machine.handle(&interaction).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(
                interaction_id = %interaction.id,
                user_id = %interaction.user.id,
                error = %e,
                "Error handling interaction"
            );
            if let Err(send_err) = channel.respond(&interaction, messages::apology()).await {
                warn!(error = %send_err, "Failed to send apology");
            }
            return DispatchOutcome::Faulted;
        }
    };

    if let Err(e) = channel.respond(&interaction, reply.initial).await {
        error!(
            interaction_id = %interaction.id,
            channel = channel.name(),
            error = %e,
            "Failed to send response"
        );
        return DispatchOutcome::Undelivered;
    }

    let mut sent = 0;
    for response in reply.follow_ups {
        if let Err(e) = channel.follow_up(&interaction, response).await {
            warn!(
                interaction_id = %interaction.id,
                channel = channel.name(),
                error = %e,
                "Failed to send follow-up"
            );
            break;
        }
        sent += 1;
    }

    DispatchOutcome::Delivered { follow_ups: sent }
}
