//! Immutable construction parameters of a farm.

use crate::address::AccountId;
use crate::asset::{AssetId, RewardToken};
use serde::{Deserialize, Serialize};

/// Parameters fixed when a farm is created.
///
/// None of these change for the lifetime of the farm: there is no
/// ownership transfer and the reward category is not configurable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmParams {
    /// The single account allowed to approve assets and trigger distribution.
    pub administrator: AccountId,

    /// The farm's own account: staked assets and reward inventory live here.
    pub custody_account: AccountId,

    /// The multi-category asset rewards are paid in.
    pub reward_asset: AssetId,
}

impl FarmParams {
    pub fn new(administrator: AccountId, custody_account: AccountId, reward_asset: AssetId) -> Self {
        Self {
            administrator,
            custody_account,
            reward_asset,
        }
    }

    /// The token every claim pays in (always the platinum category).
    pub fn reward_token(&self) -> RewardToken {
        RewardToken::platinum(self.reward_asset.clone())
    }

    /// Defaults for local development and tests.
    pub fn dev_defaults() -> Self {
        Self {
            administrator: AccountId::new("owner"),
            custody_account: AccountId::new("farm"),
            reward_asset: AssetId::new("eq"),
        }
    }
}

impl Default for FarmParams {
    fn default() -> Self {
        Self::dev_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::CategoryId;

    #[test]
    fn reward_token_is_always_platinum() {
        let params = FarmParams::new(
            AccountId::new("admin"),
            AccountId::new("vault"),
            AssetId::new("eq"),
        );
        let token = params.reward_token();
        assert_eq!(token.asset, AssetId::new("eq"));
        assert_eq!(token.category, CategoryId::PLATINUM);
    }
}
