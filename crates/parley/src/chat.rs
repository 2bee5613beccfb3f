// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley chat` command implementation.
//!
//! Prints the stored transcript, starts a session, and then runs two loops:
//! a readline thread feeding the outbound queue, and a printer task showing
//! messages that arrive in the active conversation. `/quit`, Ctrl+C, Ctrl+D,
//! SIGTERM, or the relay closing the connection ends the session.

use std::sync::Arc;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use parley_agent::shutdown::{install_signal_handler, link_session};
use parley_agent::{Session, SessionCoordinator};
use parley_config::model::ParleyConfig;
use parley_core::{ContactService, Identifier, ParleyError, StorageAdapter};
use parley_relay::{HttpAccountService, WsRelayConnector};

use crate::account::{authenticate, prompt_password};
use crate::contacts::{contact_service, remember};
use crate::history::{format_message, open_storage, transcript_lines};

/// Runs `parley chat`.
pub async fn run_chat(config: &ParleyConfig, username: &str, to: &str) -> Result<(), ParleyError> {
    let user = Identifier::parse(username)?;
    let recipient = Identifier::parse(to)?;

    let password = prompt_password("Password: ")?;
    let accounts = HttpAccountService::new(&config.relay)?;
    authenticate(&accounts, &user, &password).await?;

    chat_as(config, user, recipient).await
}

/// Chat as an already authenticated user.
pub(crate) async fn chat_as(
    config: &ParleyConfig,
    user: Identifier,
    recipient: Identifier,
) -> Result<(), ParleyError> {
    let storage: Arc<dyn StorageAdapter> = Arc::new(open_storage(config).await?);
    storage.ensure_user_log(user.as_str()).await?;

    let remote = contact_service(config);
    let remote = remote.as_ref().map(|r| r as &dyn ContactService);
    remember(storage.as_ref(), remote, &user, &recipient).await?;

    println!("{}", format!("chat with {recipient}").bold().green());
    for line in transcript_lines(storage.as_ref(), &user, &recipient).await? {
        println!("{line}");
    }
    println!("Type {} to exit.\n", "/quit".yellow());

    let connector = Arc::new(WsRelayConnector::new(&config.relay)?);
    let coordinator = SessionCoordinator::new(connector, Arc::clone(&storage), &config.session);
    // Subscribe before starting so backlog delivered on connect is shown.
    let active = coordinator.notifier().subscribe_active();
    let handle = coordinator.start(Session::new(user.clone(), recipient)).await?;

    link_session(install_signal_handler(), &handle);
    let printer = tokio::spawn(print_active(active, handle.shutdown_token(), user.to_string()));
    spawn_input(handle.outbox(), handle.shutdown_token(), format!("{}> ", user.as_str().green()));

    let result = handle.wait().await;
    printer.abort();
    println!("{}", "goodbye".dimmed());
    finish(result, storage.close().await)
}

/// The session's own error takes precedence over a failure to close the store.
fn finish(
    session: Result<(), ParleyError>,
    close: Result<(), ParleyError>,
) -> Result<(), ParleyError> {
    match (session, close) {
        (Err(e), close) => {
            if let Err(close_err) = close {
                warn!(error = %close_err, "failed to close local store");
            }
            Err(e)
        }
        (Ok(()), close) => close,
    }
}

async fn print_active(
    mut active: broadcast::Receiver<parley_core::Message>,
    shutdown: CancellationToken,
    me: String,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = active.recv() => match received {
                Ok(message) => println!("{}", format_message(&message, &me)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "display fell behind; run `parley history` for the full transcript");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}

/// Read lines on a dedicated thread; readline blocks and must not hold a
/// runtime worker. Ending input cancels the session.
fn spawn_input(outbox: mpsc::Sender<String>, shutdown: CancellationToken, prompt: String) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("{}: failed to initialize readline: {e}", "error".red());
                shutdown.cancel();
                return;
            }
        };

        while !shutdown.is_cancelled() {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == "/quit" || trimmed == "/exit" {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());
                    if outbox.blocking_send(line).is_err() {
                        break;
                    }
                }
                // Ctrl+C / Ctrl+D
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("{}: {e}", "error".red());
                    break;
                }
            }
        }
        shutdown.cancel();
    });
}
