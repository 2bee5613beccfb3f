// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley chat client.
//!
//! This crate provides the error taxonomy, the message and contact types,
//! safe identifier validation, deterministic conversation addressing, and
//! the adapter traits that the storage, relay, and service crates implement.

pub mod addressing;
pub mod error;
pub mod ident;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use addressing::chat_id;
pub use error::ParleyError;
pub use ident::{Identifier, validate_identifier};
pub use types::{
    AccountOutcome, AdapterType, ContactOutcome, Frame, HealthStatus, LoginOutcome, Message,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    AccountService, ContactService, PluginAdapter, RelayConnection, RelayConnector,
    StorageAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parley_error_has_all_variants() {
        let _config = ParleyError::Config("test".into());
        let _auth = ParleyError::Auth {
            message: "test".into(),
        };
        let _conn = ParleyError::connection("test");
        let _storage = ParleyError::storage(std::io::Error::other("test"));
        let _validation = ParleyError::Validation {
            value: "2bob".into(),
            reason: "test".into(),
        };
        let _timeout = ParleyError::Timeout {
            duration: std::time::Duration::from_secs(1),
        };
        let _internal = ParleyError::Internal("test".into());
    }

    #[test]
    fn connection_errors_are_classified() {
        assert!(ParleyError::connection("closed").is_connection());
        assert!(
            ParleyError::connection_with("broken", std::io::Error::other("reset")).is_connection()
        );
        assert!(!ParleyError::Internal("x".into()).is_connection());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_relay_connector<T: RelayConnector>() {}
        fn _assert_relay_connection<T: RelayConnection>() {}
        fn _assert_account_service<T: AccountService>() {}
        fn _assert_contact_service<T: ContactService>() {}
    }
}
