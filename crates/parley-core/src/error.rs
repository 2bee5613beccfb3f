// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parley chat client.

use thiserror::Error;

/// The primary error type used across all Parley adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Bad credentials or unknown account. Fatal to session start.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Relay transport refused, broken, or closed mid-operation.
    #[error("connection error: {message}")]
    Connection {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Local persistence failure (I/O, constraint violation, closed database).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An identifier failed the safe-identifier check.
    #[error("invalid identifier `{value}`: {reason}")]
    Validation { value: String, reason: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Shorthand for a connection error without an underlying cause.
    pub fn connection(message: impl Into<String>) -> Self {
        ParleyError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a connection error wrapping a transport error.
    pub fn connection_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ParleyError::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps any error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ParleyError::Storage {
            source: Box::new(source),
        }
    }

    /// Returns true for transport failures.
    pub fn is_connection(&self) -> bool {
        matches!(self, ParleyError::Connection { .. })
    }
}
