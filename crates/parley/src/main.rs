// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parley - a terminal chat client that keeps its own history.
//!
//! This is the binary entry point.

mod account;
mod chat;
mod contacts;
mod history;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Parley - chat over a relay, with every message kept locally.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account, then log in (and chat if --to is given).
    Register {
        #[arg(long)]
        username: String,
        /// Start chatting with this user right away.
        #[arg(long)]
        to: Option<String>,
    },
    /// Log in and chat with another user.
    Chat {
        #[arg(long)]
        username: String,
        #[arg(long)]
        to: String,
    },
    /// Print a stored conversation without connecting.
    History {
        #[arg(long)]
        username: String,
        #[arg(long = "with")]
        with: String,
    },
    /// Show or add contacts.
    Contacts {
        #[arg(long)]
        username: String,
        #[command(subcommand)]
        action: ContactsAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ContactsAction {
    /// List contacts from the local store.
    List,
    /// Add a contact locally and on the contact service.
    Add { name: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match parley_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            parley_config::render_errors(&errors);
            std::process::exit(2);
        }
    };
    init_tracing(&config.client.log_level);

    let result = match cli.command {
        Commands::Register { username, to } => {
            account::run_register(&config, &username, to.as_deref()).await
        }
        Commands::Chat { username, to } => chat::run_chat(&config, &username, &to).await,
        Commands::History { username, with } => {
            history::run_history(&config, &username, &with).await
        }
        Commands::Contacts { username, action } => {
            contacts::run_contacts(&config, &username, action).await
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never interleave with the transcript on stdout.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parley={log_level},parley_agent={log_level},parley_relay={log_level},parley_storage={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config = parley_config::load_and_validate_str("").unwrap();
        assert_eq!(config.client.log_level, "info");
    }

    #[test]
    fn parses_chat_command() {
        let cli = Cli::try_parse_from(["parley", "chat", "--username", "alice", "--to", "bob"])
            .unwrap();
        match cli.command {
            Commands::Chat { username, to } => {
                assert_eq!(username, "alice");
                assert_eq!(to, "bob");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_contacts_add() {
        let cli = Cli::try_parse_from([
            "parley", "contacts", "--username", "alice", "add", "carol",
        ])
        .unwrap();
        match cli.command {
            Commands::Contacts { action, .. } => {
                assert_eq!(action, ContactsAction::Add { name: "carol".into() });
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn chat_requires_recipient() {
        assert!(Cli::try_parse_from(["parley", "chat", "--username", "alice"]).is_err());
    }
}
