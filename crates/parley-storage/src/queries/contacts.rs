// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact operations. Duplicate rows are allowed; listing collapses them.

use parley_core::ParleyError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Insert a contact row and return its id.
pub async fn add_contact(db: &Database, owner: &str, name: &str) -> Result<i64, ParleyError> {
    let owner = owner.to_string();
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO contacts (contact_of, contact_name) VALUES (?1, ?2)",
                params![owner, name],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct contact names of `owner`, ordered by first insertion.
pub async fn list_contacts(db: &Database, owner: &str) -> Result<Vec<String>, ParleyError> {
    let owner = owner.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT contact_name FROM contacts WHERE contact_of = ?1
                 GROUP BY contact_name ORDER BY MIN(id) ASC",
            )?;
            let rows = stmt.query_map(params![owner], |row| row.get(0))?;
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
    async fn duplicates_are_stored_but_listed_once() {
        let (db, _dir) = temp_db().await;
        let first = add_contact(&db, "alice", "bob").await.unwrap();
        add_contact(&db, "alice", "carol").await.unwrap();
        let dup = add_contact(&db, "alice", "bob").await.unwrap();
        assert_ne!(first, dup);

        let contacts = list_contacts(&db, "alice").await.unwrap();
        assert_eq!(contacts, vec!["bob".to_string(), "carol".to_string()]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn contacts_are_scoped_to_owner() {
        let (db, _dir) = temp_db().await;
        add_contact(&db, "alice", "bob").await.unwrap();
        add_contact(&db, "bob", "alice").await.unwrap();

        assert_eq!(list_contacts(&db, "alice").await.unwrap(), vec!["bob".to_string()]);
        assert_eq!(list_contacts(&db, "bob").await.unwrap(), vec!["alice".to_string()]);
        assert!(list_contacts(&db, "carol").await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
