// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, non-empty paths, and positive capacities.

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.client.log_level.trim()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "client.log_level `{}` must be one of: {}",
                config.client.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let relay_url = config.relay.url.trim();
    if !(relay_url.starts_with("ws://") || relay_url.starts_with("wss://")) {
        errors.push(ConfigError::Validation {
            message: format!("relay.url `{relay_url}` must start with ws:// or wss://"),
        });
    }

    let http_url = config.relay.http_url.trim();
    if !(http_url.starts_with("http://") || http_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("relay.http_url `{http_url}` must start with http:// or https://"),
        });
    }

    if !config.relay.socket_path.starts_with('/') {
        errors.push(ConfigError::Validation {
            message: format!(
                "relay.socket_path `{}` must start with `/`",
                config.relay.socket_path
            ),
        });
    }

    if config.relay.connect_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.connect_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.relay.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.session.outbound_queue_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "session.outbound_queue_capacity must be at least 1".to_string(),
        });
    }

    if config.session.notification_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "session.notification_capacity must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
