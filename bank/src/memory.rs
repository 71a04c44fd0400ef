//! In-process multi-asset balance book.

use std::collections::BTreeMap;

use crate::bank::{AssetBank, AssetKey};
use crate::error::BankError;
use farm_types::AccountId;
use serde::{Deserialize, Serialize};

/// Balances and allowances for any number of assets, held in memory.
///
/// Keyed with ordered maps so that a serialized bank is byte-for-byte
/// reproducible.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryBank {
    balances: BTreeMap<(AssetKey, AccountId), u128>,
    /// (asset, owner, spender) → remaining allowance.
    allowances: BTreeMap<(AssetKey, AccountId, AccountId), u128>,
    supply: BTreeMap<AssetKey, u128>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` new units of `asset` in `holder`'s balance.
    ///
    /// Only used to seed genesis balances; the farm itself never mints.
    pub fn mint(
        &mut self,
        asset: &AssetKey,
        holder: &AccountId,
        amount: u128,
    ) -> Result<(), BankError> {
        let supply = self
            .total_supply(asset)
            .checked_add(amount)
            .ok_or(BankError::Overflow)?;
        let balance = self
            .balance_of(asset, holder)
            .checked_add(amount)
            .ok_or(BankError::Overflow)?;
        self.supply.insert(asset.clone(), supply);
        self.balances.insert((asset.clone(), holder.clone()), balance);
        Ok(())
    }

    /// Set the amount `spender` may move out of `owner`'s balance.
    ///
    /// Overwrites any previous allowance, like an ERC-20 `approve`.
    pub fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        asset: &AssetKey,
        amount: u128,
    ) {
        let key = (asset.clone(), owner.clone(), spender.clone());
        if amount == 0 {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, amount);
        }
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId, asset: &AssetKey) -> u128 {
        self.allowances
            .get(&(asset.clone(), owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_supply(&self, asset: &AssetKey) -> u128 {
        self.supply.get(asset).copied().unwrap_or(0)
    }

    /// All non-zero balances of `holder`.
    pub fn holdings(&self, holder: &AccountId) -> Vec<(AssetKey, u128)> {
        self.balances
            .iter()
            .filter(|((_, owner), amount)| owner == holder && **amount > 0)
            .map(|((asset, _), amount)| (asset.clone(), *amount))
            .collect()
    }

    fn set_balance(&mut self, asset: &AssetKey, holder: &AccountId, amount: u128) {
        let key = (asset.clone(), holder.clone());
        if amount == 0 {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, amount);
        }
    }
}

impl AssetBank for MemoryBank {
    fn balance_of(&self, asset: &AssetKey, holder: &AccountId) -> u128 {
        self.balances
            .get(&(asset.clone(), holder.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        asset: &AssetKey,
        holder: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), BankError> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.balance_of(asset, holder);
        if available < amount {
            return Err(BankError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let remaining_allowance = if spender != holder {
            let allowed = self.allowance(holder, spender, asset);
            if allowed < amount {
                return Err(BankError::InsufficientAllowance {
                    needed: amount,
                    available: allowed,
                });
            }
            Some(allowed - amount)
        } else {
            None
        };
        if holder == recipient {
            if let Some(rest) = remaining_allowance {
                self.approve(holder, spender, asset, rest);
            }
            return Ok(());
        }
        let credited = self
            .balance_of(asset, recipient)
            .checked_add(amount)
            .ok_or(BankError::Overflow)?;

        self.set_balance(asset, holder, available - amount);
        self.set_balance(asset, recipient, credited);
        if let Some(rest) = remaining_allowance {
            self.approve(holder, spender, asset, rest);
        }
        Ok(())
    }
}
