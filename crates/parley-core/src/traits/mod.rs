// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Parley client.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod account;
pub mod adapter;
pub mod contacts;
pub mod relay;
pub mod storage;

pub use account::AccountService;
pub use adapter::PluginAdapter;
pub use contacts::ContactService;
pub use relay::{RelayConnection, RelayConnector};
pub use storage::StorageAdapter;
