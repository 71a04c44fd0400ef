//! Assets accepted for staking.

use std::collections::BTreeSet;

use farm_types::AssetId;
use serde::{Deserialize, Serialize};

/// The set of approved assets. Entries are never removed.
///
/// Access control lives in [`crate::OwnershipGate`]; the registry itself only
/// records approvals.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssetRegistry {
    approved: BTreeSet<AssetId>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `asset` stakeable. Returns `false` if it was already approved.
    pub fn approve(&mut self, asset: AssetId) -> bool {
        self.approved.insert(asset)
    }

    pub fn is_approved(&self, asset: &AssetId) -> bool {
        self.approved.contains(asset)
    }

    /// Approved assets in ascending order.
    pub fn approved_assets(&self) -> impl Iterator<Item = &AssetId> {
        self.approved.iter()
    }

    pub fn len(&self) -> usize {
        self.approved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approved.is_empty()
    }
}
