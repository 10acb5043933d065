use std::sync::Arc;

use invite_quiz::bot::QuizBot;
use invite_quiz::channels::{CliChannel, InteractionUser};
use invite_quiz::config::BotConfig;
use invite_quiz::quiz::{InMemorySessionStore, QuestionBank, QuizMachine};
use invite_quiz::store::{GraphqlInviteStore, InviteStore, MemoryInviteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = BotConfig::from_env()?;

    eprintln!("🧩 Invite Quiz v{}", env!("CARGO_PKG_VERSION"));

    // ── Invite store ────────────────────────────────────────────────────
    let invites: Arc<dyn InviteStore> = match &config.backend {
        Some(backend) => {
            let store = GraphqlInviteStore::new(backend)?;
            eprintln!("   Backend: {}", store.endpoint());
            Arc::new(store)
        }
        None => {
            eprintln!("   Backend: in-memory (QUIZ_BACKEND_ENDPOINT not set)");
            Arc::new(MemoryInviteStore::new())
        }
    };

    // ── Quiz ────────────────────────────────────────────────────────────
    let bank = Arc::new(QuestionBank::default());
    eprintln!("   Questions: {}", bank.count());

    let channel_name = config
        .quiz
        .channel_name
        .clone()
        .unwrap_or_else(|| "cli".to_string());
    eprintln!("   Channel: #{}", channel_name);

    let machine = Arc::new(QuizMachine::new(
        bank,
        Arc::new(InMemorySessionStore::new()),
        invites,
        config.quiz.clone(),
    ));

    let user = InteractionUser {
        id: config.cli_user_id.clone(),
        tag: config.cli_username.clone(),
    };
    eprintln!("   Playing as: {}", user.tag);
    eprintln!("   Type /startquiz to begin, /help for info. Ctrl-D to exit.\n");

    let channel = Arc::new(CliChannel::new(user, channel_name));
    QuizBot::new(machine, channel).run().await?;

    Ok(())
}
