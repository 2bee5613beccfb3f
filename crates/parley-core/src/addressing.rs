// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic conversation addressing.
//!
//! A conversation is identified by the SHA-256 hex digest of the two
//! participant names, sorted and joined with `-`. The store keeps no
//! conversation table; this digest is the only partitioning key.

use sha2::{Digest, Sha256};

/// Separator placed between the sorted participant names before hashing.
const PAIR_SEPARATOR: &str = "-";

/// Returns the conversation identifier for the unordered pair `{a, b}`.
///
/// `chat_id(a, b) == chat_id(b, a)` for all inputs, and `a == b` is allowed.
pub fn chat_id(a: &str, b: &str) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(first.as_bytes());
    hasher.update(PAIR_SEPARATOR.as_bytes());
    hasher.update(second.as_bytes());
    hex::encode(hasher.finalize())
}
