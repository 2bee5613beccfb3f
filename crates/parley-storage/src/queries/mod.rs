// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the message log, contacts, and local users.

pub mod contacts;
pub mod messages;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::database::Database;

    /// Fresh database in a temp dir; keep the TempDir alive for the test.
    pub async fn temp_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }
}
