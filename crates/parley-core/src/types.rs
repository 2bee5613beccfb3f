// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Parley client.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ParleyError;

/// One chat entry as it travels over the relay connection.
///
/// A frame is the message minus its store-assigned `id`. The payload in
/// `message` is carried verbatim and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub sent_by: String,
    pub sent_to: String,
    pub chat_id: String,
    pub message: String,
    pub timestamp: String,
}

impl Frame {
    /// Serializes the frame as a single-line JSON record.
    pub fn encode(&self) -> Result<String, ParleyError> {
        serde_json::to_string(self)
            .map_err(|e| ParleyError::Internal(format!("failed to encode frame: {e}")))
    }

    /// Parses a frame received from the relay.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// A message persisted in a local user's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned, monotonically increasing within the owner's log.
    pub id: i64,
    pub sent_by: String,
    pub sent_to: String,
    pub chat_id: String,
    pub message: String,
    pub timestamp: String,
}

impl Message {
    /// Returns the wire representation of this message.
    pub fn frame(&self) -> Frame {
        Frame {
            sent_by: self.sent_by.clone(),
            sent_to: self.sent_to.clone(),
            chat_id: self.chat_id.clone(),
            message: self.message.clone(),
            timestamp: self.timestamp.clone(),
        }
    }
}

/// Current time in the fixed, lexicographically sortable wire format
/// (RFC 3339, UTC, microsecond precision).
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Relay,
    Account,
    Contacts,
}

/// Result of an account creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOutcome {
    Created,
    /// The username is already taken.
    Conflict,
}

/// Result of a login request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    NotFound,
    /// Any other non-success answer, with the service's status code.
    Rejected(u16),
}

/// Result of adding a contact through the contact service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Created,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        Frame {
            sent_by: "alice".to_string(),
            sent_to: "bob".to_string(),
            chat_id: crate::chat_id("alice", "bob"),
            message: "line one\nline two {\"json\": true}".to_string(),
            timestamp: "2026-01-01T00:00:00.000001Z".to_string(),
        }
    }

    #[test]
    fn encoded_frame_is_single_line() {
        let encoded = sample_frame().encode().unwrap();
        assert!(!encoded.contains('\n'));
        assert_eq!(Frame::decode(&encoded).unwrap(), sample_frame());
    }

    #[test]
    fn decode_rejects_missing_fields() {
        let raw = r#"{"sent_by":"alice","sent_to":"bob","message":"hi"}"#;
        assert!(Frame::decode(raw).is_err());
    }

    #[test]
    fn message_frame_drops_only_the_id() {
        let f = sample_frame();
        let m = Message {
            id: 7,
            sent_by: f.sent_by.clone(),
            sent_to: f.sent_to.clone(),
            chat_id: f.chat_id.clone(),
            message: f.message.clone(),
            timestamp: f.timestamp.clone(),
        };
        assert_eq!(m.frame(), f);
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let a = timestamp_now();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = timestamp_now();
        assert!(a < b, "{a} should sort before {b}");
        assert!(a.ends_with('Z'));
        // 2026-01-01T00:00:00.000000Z
        assert_eq!(a.len(), 27);
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;
        for variant in [
            AdapterType::Storage,
            AdapterType::Relay,
            AdapterType::Account,
            AdapterType::Contacts,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).unwrap();
            assert_eq!(parsed, variant);
        }
    }
}
