use crate::error::BankError;
use farm_types::{AccountId, AssetId, CategoryId, RewardToken};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Addresses one fungible balance column: a plain asset, or one category of a
/// multi-category asset.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetKey {
    pub asset: AssetId,
    pub category: Option<CategoryId>,
}

impl AssetKey {
    pub fn plain(asset: AssetId) -> Self {
        Self {
            asset,
            category: None,
        }
    }

    pub fn categorized(asset: AssetId, category: CategoryId) -> Self {
        Self {
            asset,
            category: Some(category),
        }
    }
}

impl From<RewardToken> for AssetKey {
    fn from(token: RewardToken) -> Self {
        Self::categorized(token.asset, token.category)
    }
}

impl From<&AssetId> for AssetKey {
    fn from(asset: &AssetId) -> Self {
        Self::plain(asset.clone())
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Some(category) => write!(f, "{}#{}", self.asset, category),
            None => write!(f, "{}", self.asset),
        }
    }
}

/// Capability to move fungible balances between accounts.
///
/// Implementations must be all-or-nothing: a transfer that returns an error
/// leaves every balance and allowance untouched.
pub trait AssetBank {
    /// Current balance of `holder` in `asset`.
    fn balance_of(&self, asset: &AssetKey, holder: &AccountId) -> u128;

    /// Move `amount` of `asset` from `holder` to `recipient` on behalf of
    /// `spender`.
    ///
    /// When `spender` is not the holder, the spender's allowance from the
    /// holder must cover `amount` and is reduced by it. A zero amount succeeds
    /// without touching any state.
    fn transfer_from(
        &mut self,
        spender: &AccountId,
        asset: &AssetKey,
        holder: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), BankError>;
}

impl<B: AssetBank + ?Sized> AssetBank for Box<B> {
    fn balance_of(&self, asset: &AssetKey, holder: &AccountId) -> u128 {
        (**self).balance_of(asset, holder)
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        asset: &AssetKey,
        holder: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), BankError> {
        (**self).transfer_from(spender, asset, holder, recipient, amount)
    }
}
