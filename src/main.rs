//! `ragchat` - terminal front end for the chat session controller.

mod cli;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{parse_line, render_header, render_turn, CliArgs, ReplCommand};
use ragchat_client::adapters::{
    ConfiguredCredential, ConnectionConfig, HttpChatBackend, HttpChatbotRegistry, StaticCredential,
    TokenFileCredential,
};
use ragchat_client::application::{ChatSessionController, KeyOutcome, SubmitTurnOutcome};
use ragchat_client::config::{AppConfig, CredentialSource, LoggingConfig};
use ragchat_client::domain::chat::{Composer, IgnoredReason, Key, KeyPress, Modifiers};
use ragchat_client::domain::foundation::ChatbotId;

type Controller = ChatSessionController<HttpChatBackend, HttpChatbotRegistry, ConfiguredCredential>;

/// Logs go to stderr so they never interleave with the transcript.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn credential_provider(source: CredentialSource) -> ConfiguredCredential {
    match source {
        CredentialSource::Anonymous => ConfiguredCredential::Static(StaticCredential::anonymous()),
        CredentialSource::Token(token) => {
            ConfiguredCredential::Static(StaticCredential::from_token(token.expose_secret().clone()))
        }
        CredentialSource::TokenFile(path) => {
            ConfiguredCredential::TokenFile(TokenFileCredential::new(path))
        }
    }
}

fn prompt(continuation: bool) {
    print!("{}", if continuation { "... " } else { "> " });
    std::io::stdout().flush().ok();
}

async fn print_transcript(controller: &Controller) {
    let view = controller.view().await;
    println!("{}", render_header(&view));
    for (idx, turn) in view.turns.iter().enumerate() {
        println!("{}", render_turn(idx + 1, turn));
    }
    println!("{}", view.footer());
}

/// Prints assistant turns appended after the first `shown` turns.
async fn print_new_replies(controller: &Controller, shown: usize) -> usize {
    let view = controller.view().await;
    for (idx, turn) in view.turns.iter().enumerate().skip(shown) {
        if !turn.turn.is_user() {
            println!("{}", render_turn(idx + 1, turn));
        }
    }
    view.turns.len()
}

async fn toggle_sources(controller: &Controller, number: usize) -> Result<(), Box<dyn std::error::Error>> {
    let view = controller.view().await;
    let Some(turn) = view.turns.get(number - 1) else {
        println!("There is no turn {}.", number);
        return Ok(());
    };
    if !turn.turn.has_evidence() {
        println!("Turn {} has no sources.", number);
        return Ok(());
    }

    controller.toggle_evidence(turn.turn.id().clone()).await?;

    let view = controller.view().await;
    if let Some(turn) = view.turns.get(number - 1) {
        println!("{}", render_turn(number, turn));
    }
    Ok(())
}

async fn run(controller: &Controller, composer: &mut Composer) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = controller.view().await.turns.len();
    let mut continuation = false;

    prompt(continuation);
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Sources(number) => toggle_sources(controller, number).await?,
            ReplCommand::Switch(raw) => match ChatbotId::new(raw) {
                Ok(chatbot_id) => {
                    controller.open(chatbot_id).await;
                    composer.clear();
                    continuation = false;
                    print_transcript(controller).await;
                    shown = controller.view().await.turns.len();
                }
                Err(err) => println!("Invalid chatbot id: {}", err),
            },
            ReplCommand::Unknown(command) => {
                println!("Unknown command: {} (try /sources <n>, /switch <id>, /quit)", command)
            }
            ReplCommand::Text { text, continues } => {
                composer.type_str(&text);
                continuation = continues;
                if continues {
                    controller
                        .handle_key(composer, KeyPress::new(Key::Enter, Modifiers::SHIFT))
                        .await?;
                } else {
                    if controller.view().await.can_submit(composer.draft()) {
                        println!("Thinking...");
                    }
                    let outcome = controller
                        .handle_key(composer, KeyPress::plain(Key::Enter))
                        .await?;
                    if let KeyOutcome::Submitted(SubmitTurnOutcome::Ignored(IgnoredReason::Blank)) =
                        outcome
                    {
                        composer.clear();
                    }
                    shown = print_new_replies(controller, shown).await;
                }
            }
        }
        prompt(continuation);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = AppConfig::load()?;
    args.apply(&mut config);
    config.validate()?;

    init_tracing(&config.logging);
    tracing::info!("Starting ragchat v{}", env!("CARGO_PKG_VERSION"));

    let chatbot_id = ChatbotId::new(args.chatbot_id.as_str())?;
    let connection = ConnectionConfig::new(config.backend.base_url.as_str())
        .with_timeout(config.backend.timeout());
    tracing::info!(base_url = %connection.base_url, "Configuration loaded");

    let controller: Controller = ChatSessionController::new(
        chatbot_id.clone(),
        Arc::new(HttpChatBackend::new(connection.clone())?),
        Arc::new(HttpChatbotRegistry::new(connection)?),
        Arc::new(credential_provider(config.auth.source())),
    );

    controller.open(chatbot_id).await;
    print_transcript(&controller).await;

    let mut composer = Composer::new();
    let result = run(&controller, &mut composer).await;

    controller.close().await;
    result
}
