//! Account identifiers for participants, the administrator and the custody account.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque account identifier.
///
/// Ordered so that ledger iteration (and therefore snapshots) is deterministic.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identifier from a raw string without validation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse an identifier supplied from outside the process (CLI, config).
    ///
    /// Rejects empty strings and strings containing whitespace.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if is_well_formed(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypesError::InvalidAccount(raw.to_string()))
        }
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        is_well_formed(&self.0)
    }
}

pub(crate) fn is_well_formed(raw: &str) -> bool {
    !raw.is_empty() && !raw.chars().any(char::is_whitespace)
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
