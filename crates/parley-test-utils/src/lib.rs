// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! Provides an in-memory relay and a harness with a throwaway SQLite store
//! for fast, deterministic tests without a network.
//!
//! # Components
//!
//! - [`MockRelay`] - In-process relay hub with offline backlog and fault injection
//! - [`TestHarness`] - Temp store, mock relay, and test-tuned configuration

pub mod harness;
pub mod mock_relay;

pub use harness::TestHarness;
pub use mock_relay::{MockConnection, MockRelay};
