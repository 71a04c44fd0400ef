//! Nullable bank: a `MemoryBank` that can be told to refuse transfers.

use std::collections::VecDeque;

use farm_bank::{AssetBank, AssetKey, BankError, MemoryBank};
use farm_types::AccountId;

/// One transfer the bank accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRecord {
    pub asset: AssetKey,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: u128,
}

/// A deterministic bank for testing.
///
/// Transfers succeed or fail exactly like [`MemoryBank`] unless a failure has
/// been scripted with [`NullBank::fail_next`].
#[derive(Default)]
pub struct NullBank {
    inner: MemoryBank,
    scripted_failures: VecDeque<BankError>,
    transfers: Vec<TransferRecord>,
}

impl NullBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `holder` a balance and let `spender` move all of it.
    pub fn fund(&mut self, asset: &AssetKey, holder: &AccountId, spender: &AccountId, amount: u128) {
        self.inner
            .mint(asset, holder, amount)
            .unwrap_or_else(|e| panic!("NullBank::fund overflowed: {e}"));
        let allowance = self.inner.allowance(holder, spender, asset).saturating_add(amount);
        self.inner.approve(holder, spender, asset, allowance);
    }

    /// Credit `holder` without granting any allowance.
    pub fn mint(&mut self, asset: &AssetKey, holder: &AccountId, amount: u128) {
        self.inner
            .mint(asset, holder, amount)
            .unwrap_or_else(|e| panic!("NullBank::mint overflowed: {e}"));
    }

    /// Make the next non-zero transfer fail with `error`.
    pub fn fail_next(&mut self, error: BankError) {
        self.scripted_failures.push_back(error);
    }

    /// Transfers accepted so far, oldest first.
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    /// Access the underlying bank.
    pub fn inner(&self) -> &MemoryBank {
        &self.inner
    }
}

impl AssetBank for NullBank {
    fn balance_of(&self, asset: &AssetKey, holder: &AccountId) -> u128 {
        self.inner.balance_of(asset, holder)
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        asset: &AssetKey,
        holder: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), BankError> {
        if amount > 0 {
            if let Some(error) = self.scripted_failures.pop_front() {
                return Err(error);
            }
        }
        self.inner
            .transfer_from(spender, asset, holder, recipient, amount)?;
        if amount > 0 {
            self.transfers.push(TransferRecord {
                asset: asset.clone(),
                from: holder.clone(),
                to: recipient.clone(),
                amount,
            });
        }
        Ok(())
    }
}
