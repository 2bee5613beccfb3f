// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message synchronization engine for the Parley chat client.
//!
//! The [`SessionCoordinator`] is the central piece that:
//! - Opens the relay connection for an authenticated user
//! - Runs the outbound and inbound pipelines as two concurrent tasks
//! - Publishes "store updated" and "active conversation" notifications
//! - Drains both pipelines before closing the connection on shutdown

pub mod coordinator;
pub mod inbound;
pub mod notify;
pub mod outbound;
pub mod session;
pub mod shutdown;

pub use coordinator::{SessionCoordinator, SessionHandle};
pub use notify::{Direction, Notifier, StoreEvent};
pub use session::{Session, SessionState};
