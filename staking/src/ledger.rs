//! Per-participant, per-asset staked balances held in custody.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::StakingError;
use crate::position::ParticipantPosition;
use crate::registry::AssetRegistry;
use farm_bank::{AssetBank, AssetKey};
use farm_types::{AccountId, AssetId};

/// The staking ledger.
///
/// `active` is an index over `positions`, recomputed from the row after every
/// mutation that touches a participant, so it never disagrees with the
/// balances. `custody` holds the per-asset sum of all staked balances, which
/// equals what the custody account holds on behalf of stakers.
#[derive(Clone, Debug, Default)]
pub struct StakingLedger {
    positions: BTreeMap<AccountId, ParticipantPosition>,
    active: BTreeSet<AccountId>,
    custody: BTreeMap<AssetId, u128>,
}

impl StakingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored rows, deriving the active index and
    /// custody totals.
    pub fn from_positions(
        positions: impl IntoIterator<Item = (AccountId, ParticipantPosition)>,
    ) -> Result<Self, StakingError> {
        let mut ledger = Self::new();
        for (participant, position) in positions {
            for (asset, amount) in position.stakes() {
                let total = ledger.custody.entry(asset.clone()).or_insert(0);
                *total = total.checked_add(amount).ok_or(StakingError::Overflow)?;
            }
            ledger.positions.insert(participant.clone(), position);
            ledger.refresh_activity(&participant);
        }
        Ok(ledger)
    }

    /// Move `amount` of `asset` from `participant` into custody and credit it.
    ///
    /// The custody account spends the participant's allowance. All checks run
    /// before the transfer; the row is only updated once the transfer has
    /// succeeded. Returns the participant's new balance in `asset`.
    pub fn deposit(
        &mut self,
        bank: &mut dyn AssetBank,
        registry: &AssetRegistry,
        custody_account: &AccountId,
        participant: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<u128, StakingError> {
        if participant == custody_account {
            return Err(StakingError::CustodyAccount(participant.clone()));
        }
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        if !registry.is_approved(asset) {
            return Err(StakingError::AssetNotApproved(asset.clone()));
        }
        let new_balance = self
            .staked_balance(asset, participant)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let new_custody = self
            .total_staked(asset)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;

        bank.transfer_from(
            custody_account,
            &AssetKey::from(asset),
            participant,
            custody_account,
            amount,
        )?;

        self.positions
            .entry(participant.clone())
            .or_default()
            .set_staked(asset, new_balance);
        self.custody.insert(asset.clone(), new_custody);
        self.refresh_activity(participant);
        Ok(new_balance)
    }

    /// Return the participant's entire balance of `asset` from custody.
    ///
    /// Refused while any reward is pending. Returns the amount paid out.
    pub fn withdraw(
        &mut self,
        bank: &mut dyn AssetBank,
        custody_account: &AccountId,
        participant: &AccountId,
        asset: &AssetId,
    ) -> Result<u128, StakingError> {
        if participant == custody_account {
            return Err(StakingError::CustodyAccount(participant.clone()));
        }
        let balance = self.staked_balance(asset, participant);
        if balance == 0 {
            return Err(StakingError::NothingStaked {
                participant: participant.clone(),
                asset: asset.clone(),
            });
        }
        let pending = self.pending_reward(participant);
        if pending > 0 {
            return Err(StakingError::UnclaimedRewardsOutstanding {
                participant: participant.clone(),
                pending,
            });
        }
        let new_custody = self
            .total_staked(asset)
            .checked_sub(balance)
            .ok_or(StakingError::Overflow)?;

        bank.transfer_from(
            custody_account,
            &AssetKey::from(asset),
            custody_account,
            participant,
            balance,
        )?;

        if let Some(position) = self.positions.get_mut(participant) {
            position.set_staked(asset, 0);
        }
        if new_custody == 0 {
            self.custody.remove(asset);
        } else {
            self.custody.insert(asset.clone(), new_custody);
        }
        self.refresh_activity(participant);
        Ok(balance)
    }

    pub fn staked_balance(&self, asset: &AssetId, participant: &AccountId) -> u128 {
        self.positions
            .get(participant)
            .map(|p| p.staked(asset))
            .unwrap_or(0)
    }

    pub fn pending_reward(&self, participant: &AccountId) -> u128 {
        self.positions
            .get(participant)
            .map(|p| p.pending_reward)
            .unwrap_or(0)
    }

    pub fn is_active(&self, participant: &AccountId) -> bool {
        self.active.contains(participant)
    }

    /// Active participants in ascending order.
    pub fn active_participants(&self) -> impl Iterator<Item = &AccountId> {
        self.active.iter()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Sum of every participant's balance in `asset`.
    pub fn total_staked(&self, asset: &AssetId) -> u128 {
        self.custody.get(asset).copied().unwrap_or(0)
    }

    pub fn position(&self, participant: &AccountId) -> Option<&ParticipantPosition> {
        self.positions.get(participant)
    }

    /// All rows, including inactive ones, in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = (&AccountId, &ParticipantPosition)> {
        self.positions.iter()
    }

    /// Overwrite pending counters with precomputed values.
    ///
    /// Callers compute the whole plan first so that applying it cannot fail.
    pub(crate) fn set_pending_rewards(&mut self, plan: &[(AccountId, u128)]) {
        for (participant, pending) in plan {
            if let Some(position) = self.positions.get_mut(participant) {
                position.pending_reward = *pending;
            }
        }
    }

    pub(crate) fn clear_pending_reward(&mut self, participant: &AccountId) {
        if let Some(position) = self.positions.get_mut(participant) {
            position.pending_reward = 0;
        }
    }

    fn refresh_activity(&mut self, participant: &AccountId) {
        let active = self
            .positions
            .get(participant)
            .is_some_and(ParticipantPosition::is_active);
        if active {
            self.active.insert(participant.clone());
        } else {
            self.active.remove(participant);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_bank::{BankError, MemoryBank};

    fn acct(name: &str) -> AccountId {
        AccountId::new(name)
    }

    fn dai() -> AssetId {
        AssetId::new("mdai")
    }

    fn setup() -> (StakingLedger, AssetRegistry, MemoryBank) {
        let mut registry = AssetRegistry::new();
        registry.approve(dai());
        let mut bank = MemoryBank::new();
        for name in ["alice", "bob"] {
            bank.mint(&AssetKey::from(&dai()), &acct(name), 1_000).unwrap();
            bank.approve(&acct(name), &acct("farm"), &AssetKey::from(&dai()), 1_000);
        }
        (StakingLedger::new(), registry, bank)
    }

    #[test]
    fn deposit_moves_funds_into_custody() {
        let (mut ledger, registry, mut bank) = setup();
        let balance = ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &dai(), 10)
            .unwrap();

        assert_eq!(balance, 10);
        assert_eq!(ledger.staked_balance(&dai(), &acct("alice")), 10);
        assert!(ledger.is_active(&acct("alice")));
        assert_eq!(ledger.total_staked(&dai()), 10);
        assert_eq!(bank.balance_of(&AssetKey::from(&dai()), &acct("farm")), 10);
        assert_eq!(bank.balance_of(&AssetKey::from(&dai()), &acct("alice")), 990);
    }

    #[test]
    fn repeated_deposits_accumulate() {
        let (mut ledger, registry, mut bank) = setup();
        ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &dai(), 10)
            .unwrap();
        let balance = ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &dai(), 15)
            .unwrap();
        assert_eq!(balance, 25);
        assert_eq!(ledger.total_staked(&dai()), 25);
    }

    #[test]
    fn zero_deposit_is_rejected() {
        let (mut ledger, registry, mut bank) = setup();
        let err = ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &dai(), 0)
            .unwrap_err();
        assert!(matches!(err, StakingError::InvalidAmount));
        assert!(ledger.position(&acct("alice")).is_none());
    }

    #[test]
    fn unapproved_asset_is_rejected_without_transfer() {
        let (mut ledger, registry, mut bank) = setup();
        let usdc = AssetId::new("usdc");
        bank.mint(&AssetKey::from(&usdc), &acct("alice"), 50).unwrap();
        let err = ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &usdc, 50)
            .unwrap_err();
        assert!(matches!(err, StakingError::AssetNotApproved(a) if a == usdc));
        assert_eq!(bank.balance_of(&AssetKey::from(&usdc), &acct("alice")), 50);
        assert!(!ledger.is_active(&acct("alice")));
    }

    #[test]
    fn failed_transfer_leaves_ledger_untouched() {
        let (mut ledger, registry, mut bank) = setup();
        let err = ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("carol"), &dai(), 10)
            .unwrap_err();
        assert!(matches!(
            err,
            StakingError::TransferFailed(BankError::InsufficientBalance { .. })
        ));
        assert!(ledger.position(&acct("carol")).is_none());
        assert_eq!(ledger.total_staked(&dai()), 0);
    }

    #[test]
    fn withdraw_returns_full_balance_and_deactivates() {
        let (mut ledger, registry, mut bank) = setup();
        ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &dai(), 10)
            .unwrap();
        let paid = ledger
            .withdraw(&mut bank, &acct("farm"), &acct("alice"), &dai())
            .unwrap();

        assert_eq!(paid, 10);
        assert_eq!(ledger.staked_balance(&dai(), &acct("alice")), 0);
        assert!(!ledger.is_active(&acct("alice")));
        assert_eq!(ledger.total_staked(&dai()), 0);
        assert_eq!(bank.balance_of(&AssetKey::from(&dai()), &acct("alice")), 1_000);
        // The row survives deactivation.
        assert!(ledger.position(&acct("alice")).is_some());
    }

    #[test]
    fn withdraw_one_asset_keeps_other_active() {
        let (mut ledger, mut registry, mut bank) = setup();
        let bat = AssetId::new("bat");
        registry.approve(bat.clone());
        bank.mint(&AssetKey::from(&bat), &acct("alice"), 5).unwrap();
        bank.approve(&acct("alice"), &acct("farm"), &AssetKey::from(&bat), 5);

        ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &dai(), 10)
            .unwrap();
        ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &bat, 5)
            .unwrap();
        ledger
            .withdraw(&mut bank, &acct("farm"), &acct("alice"), &dai())
            .unwrap();
        assert!(ledger.is_active(&acct("alice")));

        ledger
            .withdraw(&mut bank, &acct("farm"), &acct("alice"), &bat)
            .unwrap();
        assert!(!ledger.is_active(&acct("alice")));
    }

    #[test]
    fn withdraw_with_nothing_staked_fails() {
        let (mut ledger, _registry, mut bank) = setup();
        let err = ledger
            .withdraw(&mut bank, &acct("farm"), &acct("alice"), &dai())
            .unwrap_err();
        assert!(matches!(err, StakingError::NothingStaked { .. }));
    }

    #[test]
    fn withdraw_blocked_by_pending_reward() {
        let (mut ledger, registry, mut bank) = setup();
        ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &dai(), 10)
            .unwrap();
        ledger.set_pending_rewards(&[(acct("alice"), 3)]);

        let err = ledger
            .withdraw(&mut bank, &acct("farm"), &acct("alice"), &dai())
            .unwrap_err();
        assert!(matches!(
            err,
            StakingError::UnclaimedRewardsOutstanding { pending: 3, .. }
        ));
        assert_eq!(ledger.staked_balance(&dai(), &acct("alice")), 10);
    }

    #[test]
    fn custody_account_cannot_stake_its_own_holdings() {
        let (mut ledger, registry, mut bank) = setup();
        ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("alice"), &dai(), 10)
            .unwrap();

        let err = ledger
            .deposit(&mut bank, &registry, &acct("farm"), &acct("farm"), &dai(), 10)
            .unwrap_err();
        assert!(matches!(err, StakingError::CustodyAccount(a) if a == acct("farm")));
        assert_eq!(ledger.total_staked(&dai()), 10);
        assert!(ledger.position(&acct("farm")).is_none());

        let err = ledger
            .withdraw(&mut bank, &acct("farm"), &acct("farm"), &dai())
            .unwrap_err();
        assert!(matches!(err, StakingError::CustodyAccount(_)));

        ledger
            .withdraw(&mut bank, &acct("farm"), &acct("alice"), &dai())
            .unwrap();
        assert_eq!(ledger.total_staked(&dai()), 0);
        assert_eq!(bank.balance_of(&AssetKey::from(&dai()), &acct("farm")), 0);
    }

    #[test]
    fn from_positions_derives_index_and_totals() {
        let mut busy = ParticipantPosition::new();
        busy.set_staked(&dai(), 7);
        let mut idle = ParticipantPosition::new();
        idle.pending_reward = 4;

        let ledger =
            StakingLedger::from_positions([(acct("alice"), busy), (acct("bob"), idle)]).unwrap();
        assert!(ledger.is_active(&acct("alice")));
        assert!(!ledger.is_active(&acct("bob")));
        assert_eq!(ledger.pending_reward(&acct("bob")), 4);
        assert_eq!(ledger.total_staked(&dai()), 7);
    }
}
