// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley history` command and transcript rendering.

use colored::Colorize;

use parley_config::model::ParleyConfig;
use parley_core::{Identifier, Message, ParleyError, StorageAdapter};
use parley_storage::SqliteStorage;

/// Open the local store described by `config`.
pub(crate) async fn open_storage(config: &ParleyConfig) -> Result<SqliteStorage, ParleyError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(storage)
}

/// One transcript line: `[HH:MM:SS] sender: body`.
pub(crate) fn format_message(message: &Message, me: &str) -> String {
    let time = message.timestamp.get(11..19).unwrap_or(&message.timestamp);
    let sender = if message.sent_by == me {
        message.sent_by.green().bold()
    } else {
        message.sent_by.cyan().bold()
    };
    format!("{} {}: {}", format!("[{time}]").dimmed(), sender, message.message)
}

/// Rendered lines of `owner`'s conversation with `peer`.
pub(crate) async fn transcript_lines(
    storage: &dyn StorageAdapter,
    owner: &Identifier,
    peer: &Identifier,
) -> Result<Vec<String>, ParleyError> {
    let chat = parley_core::chat_id(owner.as_str(), peer.as_str());
    let messages = storage.query_conversation(owner.as_str(), &chat).await?;
    Ok(messages
        .iter()
        .map(|m| format_message(m, owner.as_str()))
        .collect())
}

/// Runs `parley history`: reads the local store only, never the network.
pub async fn run_history(
    config: &ParleyConfig,
    username: &str,
    with: &str,
) -> Result<(), ParleyError> {
    let owner = Identifier::parse(username)?;
    let peer = Identifier::parse(with)?;

    let storage = open_storage(config).await?;
    let lines = transcript_lines(&storage, &owner, &peer).await?;
    if lines.is_empty() {
        println!("{}", format!("no messages with {peer}").dimmed());
    }
    for line in lines {
        println!("{line}");
    }
    storage.close().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Frame;

    fn message(from: &str, to: &str, body: &str) -> Message {
        Message {
            id: 1,
            sent_by: from.into(),
            sent_to: to.into(),
            chat_id: parley_core::chat_id(from, to),
            message: body.into(),
            timestamp: "2026-03-04T05:06:07.000008Z".into(),
        }
    }

    #[test]
    fn format_shows_time_sender_and_body() {
        colored::control::set_override(false);
        assert_eq!(
            format_message(&message("bob", "alice", "hi"), "alice"),
            "[05:06:07] bob: hi"
        );
    }

    #[test]
    fn format_tolerates_short_timestamps() {
        colored::control::set_override(false);
        let mut m = message("bob", "alice", "hi");
        m.timestamp = "now".into();
        assert_eq!(format_message(&m, "alice"), "[now] bob: hi");
    }

    #[tokio::test]
    async fn transcript_lines_come_from_the_owner_log() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let mut config = ParleyConfig::default();
        config.storage.database_path = dir.path().join("history.db").to_string_lossy().into_owned();

        let storage = open_storage(&config).await.unwrap();
        storage.ensure_user_log("alice").await.unwrap();
        let m = message("alice", "bob", "stored");
        let frame: Frame = m.frame();
        storage.append_message("alice", &frame).await.unwrap();

        let alice = Identifier::parse("alice").unwrap();
        let bob = Identifier::parse("bob").unwrap();
        let lines = transcript_lines(&storage, &alice, &bob).await.unwrap();
        assert_eq!(lines, vec!["[05:06:07] alice: stored".to_string()]);
        // Bob has no local log at all: empty, not an error.
        assert!(transcript_lines(&storage, &bob, &alice).await.unwrap().is_empty());

        storage.close().await.unwrap();
    }
}
