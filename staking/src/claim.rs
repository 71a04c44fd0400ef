//! Reward payouts.

use crate::error::StakingError;
use crate::ledger::StakingLedger;
use farm_bank::{AssetBank, AssetKey};
use farm_types::{AccountId, RewardToken};

/// Pays a participant's pending reward from the custody account.
#[derive(Clone, Debug)]
pub struct ClaimEngine {
    reward: RewardToken,
}

impl ClaimEngine {
    pub fn new(reward: RewardToken) -> Self {
        Self { reward }
    }

    pub fn reward_token(&self) -> &RewardToken {
        &self.reward
    }

    /// Transfer the whole pending counter to `participant`, then zero it.
    ///
    /// Only active participants may claim. A zero counter is a successful
    /// no-op claim. Returns the amount paid.
    pub fn claim(
        &self,
        ledger: &mut StakingLedger,
        bank: &mut dyn AssetBank,
        custody_account: &AccountId,
        participant: &AccountId,
    ) -> Result<u128, StakingError> {
        if participant == custody_account {
            return Err(StakingError::CustodyAccount(participant.clone()));
        }
        if !ledger.is_active(participant) {
            return Err(StakingError::AccountNotActive(participant.clone()));
        }
        let amount = ledger.pending_reward(participant);

        bank.transfer_from(
            custody_account,
            &AssetKey::from(self.reward.clone()),
            custody_account,
            participant,
            amount,
        )?;

        ledger.clear_pending_reward(participant);
        Ok(amount)
    }
}
