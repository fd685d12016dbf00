//! CLI argument definitions and terminal rendering for `ragchat`.
//!
//! Priority resolution: CLI args > env vars > `.env` > defaults.

use clap::Parser;
use std::path::PathBuf;

use ragchat_client::config::AppConfig;
use ragchat_client::domain::chat::{SessionView, TurnView};

/// Chat with a document-grounded chatbot from the terminal.
#[derive(Parser, Debug)]
#[command(name = "ragchat", version, about)]
pub struct CliArgs {
    /// Id of the chatbot to talk to.
    pub chatbot_id: String,

    /// API root of the chatbot service.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// File holding the bearer token, re-read before every request.
    #[arg(long = "token-file")]
    pub token_file: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error, or a full directive).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Overrides configuration values with the flags that were given.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.base_url {
            config.backend.base_url = url.clone();
        }
        if let Some(path) = &self.token_file {
            config.auth.token_file = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    /// Toggle the sources of the n-th displayed turn (1-based).
    Sources(usize),
    /// Re-open the session for another chatbot.
    Switch(String),
    /// Draft text. `continues` marks a trailing backslash (Shift+Enter).
    Text { text: String, continues: bool },
    Unknown(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix('/') {
        let mut parts = rest.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();
        return match (command, argument) {
            ("quit" | "exit", None) => ReplCommand::Quit,
            ("sources", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => ReplCommand::Sources(n),
                _ => ReplCommand::Unknown(trimmed.to_string()),
            },
            ("switch", Some(id)) => ReplCommand::Switch(id.to_string()),
            _ => ReplCommand::Unknown(trimmed.to_string()),
        };
    }

    match line.strip_suffix('\\') {
        Some(text) => ReplCommand::Text {
            text: text.to_string(),
            continues: true,
        },
        None => ReplCommand::Text {
            text: line.to_string(),
            continues: false,
        },
    }
}

pub fn render_header(view: &SessionView) -> String {
    let mut out = format!("=== {} ===", view.title);
    if let Some(description) = &view.description {
        out.push('\n');
        out.push_str(description);
    }
    out
}

/// Renders the n-th turn (1-based) with its sources if expanded.
pub fn render_turn(number: usize, view: &TurnView) -> String {
    let turn = &view.turn;
    let speaker = if turn.is_user() { "You" } else { "Assistant" };

    let mut out = format!(
        "[{}] {} ({}): {}",
        number,
        speaker,
        turn.created_at().clock(),
        turn.content()
    );
    if let Some(tokens) = turn.tokens_used() {
        out.push_str(&format!("\n    {} tokens", tokens));
    }
    if let Some(label) = &view.sources_label {
        out.push_str(&format!("\n    [{}] /sources {}", label, number));
    }
    if view.expanded {
        for evidence in turn.context() {
            out.push_str(&format!(
                "\n    - {} ({} relevant)\n      {}",
                evidence.document(),
                evidence.similarity().relevance_percent(),
                evidence.content_preview()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_client::domain::chat::{AssistantReply, Evidence, Similarity, Turn};
    use ragchat_client::domain::foundation::TurnId;

    mod args {
        use super::*;

        #[test]
        fn parses_chatbot_id_and_flags() {
            let args = CliArgs::try_parse_from([
                "ragchat",
                "3",
                "--base-url",
                "https://bots.example.com/api",
                "--token-file",
                "/tmp/token",
                "-l",
                "debug",
            ])
            .unwrap();

            assert_eq!(args.chatbot_id, "3");
            assert_eq!(args.base_url.as_deref(), Some("https://bots.example.com/api"));
            assert_eq!(args.token_file, Some(PathBuf::from("/tmp/token")));
            assert_eq!(args.log_level.as_deref(), Some("debug"));
        }

        #[test]
        fn chatbot_id_is_required() {
            assert!(CliArgs::try_parse_from(["ragchat"]).is_err());
        }

        #[test]
        fn flags_override_config() {
            let args =
                CliArgs::try_parse_from(["ragchat", "3", "--base-url", "http://other/api"]).unwrap();
            let mut config = AppConfig::default();

            args.apply(&mut config);

            assert_eq!(config.backend.base_url, "http://other/api");
            assert!(config.auth.token_file.is_none());
            assert_eq!(config.logging.level, "warn,ragchat_client=info");
        }
    }

    mod lines {
        use super::*;

        #[test]
        fn commands() {
            assert_eq!(parse_line("/quit"), ReplCommand::Quit);
            assert_eq!(parse_line("  /sources 3 "), ReplCommand::Sources(3));
            assert_eq!(parse_line("/switch 7"), ReplCommand::Switch("7".to_string()));
        }

        #[test]
        fn malformed_commands_are_unknown() {
            assert!(matches!(parse_line("/sources"), ReplCommand::Unknown(_)));
            assert!(matches!(parse_line("/sources 0"), ReplCommand::Unknown(_)));
            assert!(matches!(parse_line("/sources x"), ReplCommand::Unknown(_)));
            assert!(matches!(parse_line("/frobnicate"), ReplCommand::Unknown(_)));
        }

        #[test]
        fn trailing_backslash_continues_draft() {
            assert_eq!(
                parse_line("first line\\"),
                ReplCommand::Text {
                    text: "first line".to_string(),
                    continues: true
                }
            );
            assert_eq!(
                parse_line("  spaced  "),
                ReplCommand::Text {
                    text: "  spaced  ".to_string(),
                    continues: false
                }
            );
        }
    }

    mod rendering {
        use super::*;

        fn assistant_view(expanded: bool) -> TurnView {
            let reply = AssistantReply::new("Within 30 days.")
                .with_tokens_used(88)
                .with_evidence(Evidence::new(
                    "policy.pdf",
                    Similarity::new(0.5).unwrap(),
                    "Refunds are accepted...",
                ));
            TurnView {
                turn: Turn::assistant(TurnId::from("assistant-2"), reply),
                expanded,
                sources_label: Some(
                    if expanded { "Hide Sources (1)" } else { "Show Sources (1)" }.to_string(),
                ),
            }
        }

        #[test]
        fn collapsed_turn_shows_label_only() {
            let out = render_turn(3, &assistant_view(false));

            assert!(out.starts_with("[3] Assistant ("));
            assert!(out.contains("Within 30 days."));
            assert!(out.contains("88 tokens"));
            assert!(out.contains("[Show Sources (1)] /sources 3"));
            assert!(!out.contains("policy.pdf"));
        }

        #[test]
        fn expanded_turn_lists_sources() {
            let out = render_turn(3, &assistant_view(true));

            assert!(out.contains("policy.pdf (50.0% relevant)"));
            assert!(out.contains("Refunds are accepted..."));
        }

        #[test]
        fn header_includes_description() {
            let view = SessionView {
                title: "Support Bot".to_string(),
                description: Some("Policies".to_string()),
                turns: Vec::new(),
                awaiting_reply: false,
                conversation_id: None,
            };
            assert_eq!(render_header(&view), "=== Support Bot ===\nPolicies");
        }
    }
}
