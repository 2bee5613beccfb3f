// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network adapters for the Parley chat client.
//!
//! - [`ws`]: the persistent WebSocket connection to the relay.
//! - [`http`]: request/response clients for the account and contact services.

pub mod http;
pub mod ws;

pub use http::{HttpAccountService, HttpContactService};
pub use ws::{WsRelayConnection, WsRelayConnector};
