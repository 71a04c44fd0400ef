//! Per-participant ledger row.

use std::collections::BTreeMap;

use crate::registry::AssetRegistry;
use farm_types::AssetId;
use serde::{Deserialize, Serialize};

/// A participant's staked balances and accrued-but-unclaimed reward.
///
/// Created on first deposit and never removed. A row with no staked balance
/// is inactive but keeps its `pending_reward`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantPosition {
    /// Non-zero staked balances only; a withdrawn asset is removed.
    stakes: BTreeMap<AssetId, u128>,

    /// Reward units owed, denominated in the platinum reward category.
    pub pending_reward: u128,
}

impl ParticipantPosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staked(&self, asset: &AssetId) -> u128 {
        self.stakes.get(asset).copied().unwrap_or(0)
    }

    /// Whether any asset has a positive balance.
    pub fn is_active(&self) -> bool {
        self.stakes.values().any(|amount| *amount > 0)
    }

    /// Staked balances in ascending asset order.
    pub fn stakes(&self) -> impl Iterator<Item = (&AssetId, u128)> {
        self.stakes.iter().map(|(asset, amount)| (asset, *amount))
    }

    /// One epoch's accrual: the sum of this row's balances over approved assets.
    ///
    /// `None` on overflow.
    pub fn accrual(&self, registry: &AssetRegistry) -> Option<u128> {
        self.stakes
            .iter()
            .filter(|(asset, _)| registry.is_approved(asset))
            .try_fold(0u128, |total, (_, amount)| total.checked_add(*amount))
    }

    pub(crate) fn set_staked(&mut self, asset: &AssetId, amount: u128) {
        if amount == 0 {
            self.stakes.remove(asset);
        } else {
            self.stakes.insert(asset.clone(), amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_position_is_inactive() {
        let pos = ParticipantPosition::new();
        assert!(!pos.is_active());
        assert_eq!(pos.staked(&AssetId::new("mdai")), 0);
    }

    #[test]
    fn zeroing_a_stake_removes_it() {
        let mut pos = ParticipantPosition::new();
        pos.set_staked(&AssetId::new("mdai"), 10);
        assert!(pos.is_active());
        pos.set_staked(&AssetId::new("mdai"), 0);
        assert!(!pos.is_active());
        assert_eq!(pos.stakes().count(), 0);
    }

    #[test]
    fn accrual_sums_approved_assets_only() {
        let mut registry = AssetRegistry::new();
        registry.approve(AssetId::new("a"));
        registry.approve(AssetId::new("b"));

        let mut pos = ParticipantPosition::new();
        pos.set_staked(&AssetId::new("a"), 10);
        pos.set_staked(&AssetId::new("b"), 5);
        pos.set_staked(&AssetId::new("c"), 100);
        assert_eq!(pos.accrual(&registry), Some(15));
    }

    #[test]
    fn accrual_overflow_is_reported() {
        let mut registry = AssetRegistry::new();
        registry.approve(AssetId::new("a"));
        registry.approve(AssetId::new("b"));

        let mut pos = ParticipantPosition::new();
        pos.set_staked(&AssetId::new("a"), u128::MAX);
        pos.set_staked(&AssetId::new("b"), 1);
        assert_eq!(pos.accrual(&registry), None);
    }
}
