//! Asset identifiers and the fixed reward category.

use crate::address::is_well_formed;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque identifier for a fungible asset type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse an asset identifier supplied from outside the process.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if is_well_formed(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypesError::InvalidAsset(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A category within a multi-category asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(u32);

impl CategoryId {
    /// The distinguished category every reward is paid in.
    pub const PLATINUM: Self = Self(1);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The asset and category that claims pay out in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RewardToken {
    pub asset: AssetId,
    pub category: CategoryId,
}

impl RewardToken {
    /// The platinum category of `asset`.
    pub fn platinum(asset: AssetId) -> Self {
        Self {
            asset,
            category: CategoryId::PLATINUM,
        }
    }
}

impl fmt::Display for RewardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.asset, self.category)
    }
}
