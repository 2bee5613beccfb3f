// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end session testing.
//!
//! `TestHarness` assembles a temp SQLite store, a [`MockRelay`], and a
//! configuration with short timeouts. Sessions are started by the caller
//! against [`connector`](TestHarness::connector) and
//! [`storage`](TestHarness::storage).

use std::sync::Arc;
use std::time::Duration;

use parley_config::model::{ParleyConfig, SessionConfig, StorageConfig};
use parley_core::{Message, ParleyError, RelayConnector, StorageAdapter};
use parley_storage::SqliteStorage;

use crate::mock_relay::MockRelay;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    drain_timeout: Duration,
    outbound_queue_capacity: usize,
    users: Vec<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            drain_timeout: Duration::from_secs(2),
            outbound_queue_capacity: 16,
            users: Vec::new(),
        }
    }

    /// Bound on how long a session waits for its pipelines to stop.
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn with_outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_queue_capacity = capacity;
        self
    }

    /// Register local users (their logs exist before any session starts).
    pub fn with_users(mut self, users: &[&str]) -> Self {
        self.users = users.iter().map(|u| u.to_string()).collect();
        self
    }

    pub async fn build(self) -> Result<TestHarness, ParleyError> {
        let temp_dir = tempfile::TempDir::new().map_err(ParleyError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = ParleyConfig::default();
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        config.session = SessionConfig {
            outbound_queue_capacity: self.outbound_queue_capacity,
            drain_timeout_secs: self.drain_timeout.as_secs().max(1),
            ..SessionConfig::default()
        };

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        for user in &self.users {
            storage.ensure_user_log(user).await?;
        }

        Ok(TestHarness {
            relay: Arc::new(MockRelay::new()),
            storage: Arc::new(storage),
            config,
            drain_timeout: self.drain_timeout,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment backed by a temp SQLite store.
pub struct TestHarness {
    pub relay: Arc<MockRelay>,
    pub storage: Arc<SqliteStorage>,
    pub config: ParleyConfig,
    drain_timeout: Duration,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn connector(&self) -> Arc<dyn RelayConnector> {
        self.relay.clone()
    }

    pub fn store(&self) -> Arc<dyn StorageAdapter> {
        self.storage.clone()
    }

    /// The configured drain bound, at sub-second precision.
    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    pub fn database_path(&self) -> &str {
        &self.config.storage.database_path
    }

    /// `owner`'s stored conversation with `other`.
    pub async fn transcript(&self, owner: &str, other: &str) -> Result<Vec<Message>, ParleyError> {
        let chat = parley_core::chat_id(owner, other);
        self.storage.query_conversation(owner, &chat).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = TestHarness::builder()
            .with_users(&["alice", "bob"])
            .build()
            .await
            .unwrap();

        let users = harness.storage.list_local_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(harness.transcript("alice", "bob").await.unwrap().is_empty());
        assert!(std::path::Path::new(harness.database_path()).exists());
    }

    #[tokio::test]
    async fn temp_db_is_unique_per_harness() {
        let a = TestHarness::builder().build().await.unwrap();
        let b = TestHarness::builder().build().await.unwrap();
        assert_ne!(a.database_path(), b.database_path());
    }
}
