// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the durable local message store.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Frame, Message};

/// Durable, per-user persistence of messages and contacts.
///
/// Every write is a self-contained transaction, so the outbound and inbound
/// pipelines may call into the same handle concurrently without any lock of
/// their own.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), ParleyError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), ParleyError>;

    /// Creates the message log for `owner` if it does not exist yet. Idempotent.
    async fn ensure_user_log(&self, owner: &str) -> Result<(), ParleyError>;

    /// Appends one message to `owner`'s log and returns its assigned id.
    async fn append_message(&self, owner: &str, frame: &Frame) -> Result<i64, ParleyError>;

    /// Returns `owner`'s messages for `chat_id` in increasing id order.
    ///
    /// An unknown conversation yields an empty vector, not an error.
    async fn query_conversation(
        &self,
        owner: &str,
        chat_id: &str,
    ) -> Result<Vec<Message>, ParleyError>;

    /// Records `name` as a contact of `owner`. Duplicates are permitted.
    async fn add_contact(&self, owner: &str, name: &str) -> Result<i64, ParleyError>;

    /// Returns `owner`'s contact names, first insertion of each name first.
    async fn list_contacts(&self, owner: &str) -> Result<Vec<String>, ParleyError>;

    /// Returns every user with a local log.
    async fn list_local_users(&self) -> Result<Vec<String>, ParleyError>;
}
