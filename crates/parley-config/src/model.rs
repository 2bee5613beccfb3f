// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Parley client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Parley configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// Client-wide settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Relay and HTTP service endpoints.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Local message store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session pipeline tuning.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Client-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Relay connection and account/contact service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Base WebSocket URL of the relay (`ws://` or `wss://`).
    #[serde(default = "default_relay_url")]
    pub url: String,

    /// Path of the relay's socket endpoint.
    #[serde(default = "default_socket_path")]
    pub socket_path: String,

    /// Base URL of the account and contact HTTP services.
    #[serde(default = "default_http_url")]
    pub http_url: String,

    /// Seconds to wait for the WebSocket handshake.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Seconds to wait for an HTTP service response.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl RelayConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
            socket_path: default_socket_path(),
            http_url: default_http_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_relay_url() -> String {
    "ws://localhost:8000".to_string()
}

fn default_socket_path() -> String {
    "/socket".to_string()
}

fn default_http_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("parley").join("parley.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("parley.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Session pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Bound on authored-but-not-yet-sent message bodies.
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,

    /// Per-subscriber buffer of each notification channel.
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// Seconds to wait for both pipelines to stop during shutdown.
    #[serde(default = "default_drain_timeout_secs")]
    pub drain_timeout_secs: u64,
}

impl SessionConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            outbound_queue_capacity: default_outbound_queue_capacity(),
            notification_capacity: default_notification_capacity(),
            drain_timeout_secs: default_drain_timeout_secs(),
        }
    }
}

fn default_outbound_queue_capacity() -> usize {
    64
}

fn default_notification_capacity() -> usize {
    256
}

fn default_drain_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost_relay() {
        let config = ParleyConfig::default();
        assert_eq!(config.relay.url, "ws://localhost:8000");
        assert_eq!(config.relay.http_url, "http://localhost:8000");
        assert_eq!(config.relay.socket_path, "/socket");
        assert_eq!(config.relay.connect_timeout(), Duration::from_secs(10));
        assert!(config.storage.wal_mode);
        assert!(config.storage.database_path.ends_with("parley.db"));
        assert_eq!(config.session.outbound_queue_capacity, 64);
        assert_eq!(config.session.drain_timeout(), Duration::from_secs(10));
        assert_eq!(config.client.log_level, "info");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: ParleyConfig = toml::from_str(
            r#"
[session]
drain_timeout_secs = 3
"#,
        )
        .unwrap();
        assert_eq!(config.session.drain_timeout_secs, 3);
        assert_eq!(config.session.notification_capacity, 256);
        assert_eq!(config.relay.url, "ws://localhost:8000");
    }

    #[test]
    fn unknown_relay_key_is_rejected() {
        let result = toml::from_str::<ParleyConfig>(
            r#"
[relay]
ulr = "ws://example.com"
"#,
        );
        assert!(result.is_err());
    }
}
