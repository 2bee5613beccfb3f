// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session identity and lifecycle states.

use parley_core::{Identifier, ParleyError};

/// The authenticated user and the peer they are talking to.
///
/// Fixed for the session's lifetime; both pipelines hold it behind an `Arc`
/// and never reassign it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Identifier,
    pub recipient: Identifier,
    chat_id: String,
}

impl Session {
    pub fn new(user: Identifier, recipient: Identifier) -> Self {
        let chat_id = parley_core::chat_id(user.as_str(), recipient.as_str());
        Self {
            user,
            recipient,
            chat_id,
        }
    }

    /// Validate raw names and build a session from them.
    pub fn parse(user: &str, recipient: &str) -> Result<Self, ParleyError> {
        Ok(Self::new(Identifier::parse(user)?, Identifier::parse(recipient)?))
    }

    /// The active conversation.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

/// Lifecycle of a session: `Idle -> Connecting -> Active -> Draining -> Closed`.
///
/// A failed handshake goes straight from `Connecting` to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, nothing opened yet.
    Idle,
    /// Relay handshake in progress.
    Connecting,
    /// Both pipelines running.
    Active,
    /// Pipelines cancelled; waiting for both to stop.
    Draining,
    /// Connection released.
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Active => write!(f, "active"),
            SessionState::Draining => write!(f, "draining"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}
