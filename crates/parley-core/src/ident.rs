// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safe participant identifiers.
//!
//! Usernames and recipients travel into storage rows, relay query strings,
//! and HTTP bodies. Anything that becomes an [`Identifier`] has been checked
//! against `^[A-Za-z][A-Za-z0-9_]*$` first.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParleyError;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

/// A validated participant identifier (username or recipient).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validates `raw` and wraps it.
    pub fn parse(raw: &str) -> Result<Self, ParleyError> {
        validate_identifier(raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Checks that `raw` starts with an ASCII letter followed only by ASCII
/// letters, digits, or underscores.
pub fn validate_identifier(raw: &str) -> Result<(), ParleyError> {
    if raw.is_empty() {
        return Err(ParleyError::Validation {
            value: raw.to_string(),
            reason: "identifier must not be empty".to_string(),
        });
    }
    if !IDENTIFIER_RE.is_match(raw) {
        return Err(ParleyError::Validation {
            value: raw.to_string(),
            reason: "must start with a letter followed by letters, digits, or underscores"
                .to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = ParleyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_identifier(&value)?;
        Ok(Self(value))
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_underscored_names() {
        assert!(Identifier::parse("bob").is_ok());
        assert!(Identifier::parse("Bob_2").is_ok());
        assert!(Identifier::parse("a").is_ok());
    }

    #[test]
    fn rejects_unsafe_names() {
        for bad in ["2bob", "bob;drop", "", "_bob", "bob smith", "bob-2", "böb"] {
            let err = Identifier::parse(bad).unwrap_err();
            assert!(
                matches!(err, ParleyError::Validation { ref value, .. } if value == bad),
                "expected validation error for {bad:?}, got {err}"
            );
        }
    }

    #[test]
    fn deserialization_validates() {
        let ok: Identifier = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");
        assert!(serde_json::from_str::<Identifier>("\"1alice\"").is_err());
    }

    #[test]
    fn from_str_round_trips_display() {
        let id: Identifier = "carol_9".parse().unwrap();
        assert_eq!(id.to_string(), "carol_9");
    }
}
