// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message log operations.
//!
//! Every user's log lives in the shared `messages` table, partitioned by the
//! `owner` column. A conversation is the set of an owner's rows with a given
//! `chat_id`.

use parley_core::{Frame, Message, ParleyError};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Append one message to `owner`'s log and return its id.
///
/// Fails if `owner` was never registered with
/// [`ensure_user_log`](crate::queries::users::ensure_user_log).
pub async fn append_message(db: &Database, owner: &str, frame: &Frame) -> Result<i64, ParleyError> {
    let owner = owner.to_string();
    let frame = frame.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO messages (owner, sent_by, sent_to, chat_id, message, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    owner,
                    frame.sent_by,
                    frame.sent_to,
                    frame.chat_id,
                    frame.message,
                    frame.timestamp,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// `owner`'s messages in `chat_id`, oldest insertion first.
pub async fn query_conversation(
    db: &Database,
    owner: &str,
    chat_id: &str,
) -> Result<Vec<Message>, ParleyError> {
    let owner = owner.to_string();
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, sent_by, sent_to, chat_id, message, timestamp
                 FROM messages WHERE owner = ?1 AND chat_id = ?2
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![owner, chat_id], |row| {
                Ok(Message {
                    id: row.get(0)?,
                    sent_by: row.get(1)?,
                    sent_to: row.get(2)?,
                    chat_id: row.get(3)?,
                    message: row.get(4)?,
                    timestamp: row.get(5)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Number of rows in `owner`'s log.
pub async fn count_messages(db: &Database, owner: &str) -> Result<i64, ParleyError> {
    let owner = owner.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE owner = ?1",
                params![owner],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}
