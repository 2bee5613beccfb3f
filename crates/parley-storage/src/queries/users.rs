// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local user registry: a user "has a log" once registered here.

use parley_core::ParleyError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Register `owner` as a local user. Safe to call on every login.
pub async fn ensure_user_log(db: &Database, owner: &str) -> Result<(), ParleyError> {
    let owner = owner.to_string();
    let now = parley_core::types::timestamp_now();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO local_users (username, created_at) VALUES (?1, ?2)",
                params![owner, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All local users in registration order.
pub async fn list_local_users(db: &Database) -> Result<Vec<String>, ParleyError> {
    db.connection()
        .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt =
                conn.prepare("SELECT username FROM local_users ORDER BY created_at, username")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::temp_db;

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let (db, _dir) = temp_db().await;
        ensure_user_log(&db, "alice").await.unwrap();
        ensure_user_log(&db, "alice").await.unwrap();
        ensure_user_log(&db, "bob").await.unwrap();

        let users = list_local_users(&db).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.contains(&"alice".to_string()));
        assert!(users.contains(&"bob".to_string()));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn ensure_again_keeps_existing_messages() {
        use crate::queries::messages::{append_message, count_messages, query_conversation};
        use parley_core::Frame;

        let (db, _dir) = temp_db().await;
        ensure_user_log(&db, "alice").await.unwrap();
        let chat = parley_core::chat_id("alice", "bob");
        for body in ["one", "two"] {
            let frame = Frame {
                sent_by: "alice".to_string(),
                sent_to: "bob".to_string(),
                chat_id: chat.clone(),
                message: body.to_string(),
                timestamp: parley_core::types::timestamp_now(),
            };
            append_message(&db, "alice", &frame).await.unwrap();
        }
        let before = query_conversation(&db, "alice", &chat).await.unwrap();

        ensure_user_log(&db, "alice").await.unwrap();
        ensure_user_log(&db, "alice").await.unwrap();

        assert_eq!(count_messages(&db, "alice").await.unwrap(), 2);
        assert_eq!(query_conversation(&db, "alice", &chat).await.unwrap(), before);
        assert_eq!(list_local_users(&db).await.unwrap(), vec!["alice".to_string()]);
        db.close().await.unwrap();
    }
}
