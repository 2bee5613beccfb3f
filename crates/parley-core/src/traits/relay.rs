// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay connection traits: one persistent full-duplex connection per session.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::ident::Identifier;
use crate::traits::adapter::PluginAdapter;

/// Opens authenticated connections to the relay.
#[async_trait]
pub trait RelayConnector: PluginAdapter {
    /// Completes the transport handshake for `username`.
    ///
    /// Messages that reached the relay while `username` was offline arrive
    /// afterwards as ordinary inbound frames.
    async fn open(&self, username: &Identifier) -> Result<Arc<dyn RelayConnection>, ParleyError>;
}

/// An open relay connection.
///
/// Reading and writing are independent directions: one task may block in
/// [`receive`](RelayConnection::receive) while another calls
/// [`send`](RelayConnection::send).
#[async_trait]
pub trait RelayConnection: Send + Sync + 'static {
    /// Transmits one serialized frame.
    async fn send(&self, frame: &str) -> Result<(), ParleyError>;

    /// Waits for the next serialized frame. `Ok(None)` means the relay
    /// closed the stream.
    async fn receive(&self) -> Result<Option<String>, ParleyError>;

    /// Releases the transport. Calling it more than once is a no-op.
    async fn close(&self) -> Result<(), ParleyError>;
}
