//! The staking farm: registry, ledger, accrual and claims behind one facade.

use std::collections::BTreeSet;

use crate::claim::ClaimEngine;
use crate::error::StakingError;
use crate::gate::OwnershipGate;
use crate::ledger::StakingLedger;
use crate::position::ParticipantPosition;
use crate::registry::AssetRegistry;
use crate::rewards::{DistributionReport, RewardAccrualEngine};
use crate::snapshot::{FarmSnapshot, PositionSnapshot, SNAPSHOT_VERSION};
use farm_bank::AssetBank;
use farm_types::{AccountId, AssetId, FarmParams, RewardToken};

/// A single farm: one administrator, one custody account, one reward token.
///
/// Every mutating method either completes or returns an error having changed
/// nothing, in the farm and in the bank. Serializing calls is the host's job
/// (see the service crate); the farm itself is a plain `&mut self` state
/// machine.
pub struct StakingFarm {
    params: FarmParams,
    gate: OwnershipGate,
    registry: AssetRegistry,
    ledger: StakingLedger,
    rewards: RewardAccrualEngine,
    claims: ClaimEngine,
}

impl StakingFarm {
    /// Create an empty farm administered by `params.administrator`.
    ///
    /// The administrator and the custody account must be different accounts.
    pub fn new(params: FarmParams) -> Result<Self, StakingError> {
        check_params(&params)?;
        Ok(Self::assemble(
            params,
            AssetRegistry::new(),
            StakingLedger::new(),
            0,
        ))
    }

    fn assemble(
        params: FarmParams,
        registry: AssetRegistry,
        ledger: StakingLedger,
        epoch: u64,
    ) -> Self {
        let claims = ClaimEngine::new(params.reward_token());
        let gate = OwnershipGate::single(params.administrator.clone());
        Self {
            params,
            gate,
            registry,
            ledger,
            rewards: RewardAccrualEngine::with_epoch(epoch),
            claims,
        }
    }

    /// Approve `asset` for staking. Administrator only; idempotent.
    ///
    /// Returns `true` if the asset was not approved before.
    pub fn approve(&mut self, caller: &AccountId, asset: AssetId) -> Result<bool, StakingError> {
        self.gate.ensure(caller)?;
        Ok(self.registry.approve(asset))
    }

    pub fn is_approved(&self, asset: &AssetId) -> bool {
        self.registry.is_approved(asset)
    }

    /// Stake `amount` of `asset` for `participant`.
    ///
    /// The participant must have granted the custody account an allowance in
    /// the bank. Returns the new staked balance.
    pub fn deposit(
        &mut self,
        bank: &mut dyn AssetBank,
        participant: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<u128, StakingError> {
        self.ledger.deposit(
            bank,
            &self.registry,
            &self.params.custody_account,
            participant,
            asset,
            amount,
        )
    }

    /// Unstake the participant's whole balance of `asset`.
    pub fn withdraw(
        &mut self,
        bank: &mut dyn AssetBank,
        participant: &AccountId,
        asset: &AssetId,
    ) -> Result<u128, StakingError> {
        self.ledger
            .withdraw(bank, &self.params.custody_account, participant, asset)
    }

    /// Run one accrual epoch. Administrator only.
    pub fn distribute(&mut self, caller: &AccountId) -> Result<DistributionReport, StakingError> {
        self.gate.ensure(caller)?;
        self.rewards.distribute(&mut self.ledger, &self.registry)
    }

    /// Pay out the participant's pending reward. Returns the amount paid.
    pub fn claim(
        &mut self,
        bank: &mut dyn AssetBank,
        participant: &AccountId,
    ) -> Result<u128, StakingError> {
        self.claims.claim(
            &mut self.ledger,
            bank,
            &self.params.custody_account,
            participant,
        )
    }

    pub fn staked_balance(&self, asset: &AssetId, participant: &AccountId) -> u128 {
        self.ledger.staked_balance(asset, participant)
    }

    pub fn pending_reward(&self, participant: &AccountId) -> u128 {
        self.ledger.pending_reward(participant)
    }

    pub fn is_active(&self, participant: &AccountId) -> bool {
        self.ledger.is_active(participant)
    }

    pub fn active_participants(&self) -> Vec<AccountId> {
        self.ledger.active_participants().cloned().collect()
    }

    pub fn total_staked(&self, asset: &AssetId) -> u128 {
        self.ledger.total_staked(asset)
    }

    pub fn approved_assets(&self) -> Vec<AssetId> {
        self.registry.approved_assets().cloned().collect()
    }

    /// Number of completed distributions.
    pub fn epoch(&self) -> u64 {
        self.rewards.epoch()
    }

    pub fn params(&self) -> &FarmParams {
        &self.params
    }

    pub fn reward_token(&self) -> &RewardToken {
        self.claims.reward_token()
    }

    pub fn ledger(&self) -> &StakingLedger {
        &self.ledger
    }

    /// Capture the full farm state.
    pub fn snapshot(&self) -> FarmSnapshot {
        let positions = self
            .ledger
            .positions()
            .map(|(participant, position)| PositionSnapshot {
                participant: participant.clone(),
                stakes: position
                    .stakes()
                    .map(|(asset, amount)| (asset.clone(), amount))
                    .collect(),
                pending_reward: position.pending_reward,
            })
            .collect();
        FarmSnapshot::create(
            self.params.clone(),
            self.epoch(),
            self.approved_assets(),
            positions,
        )
    }

    /// Rebuild a farm from a snapshot.
    ///
    /// Rejects snapshots whose hash does not verify, whose version is unknown,
    /// that list a participant twice, or that hold a balance in an asset the
    /// snapshot does not list as approved.
    pub fn restore(snapshot: FarmSnapshot) -> Result<Self, StakingError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StakingError::Snapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if !snapshot.verify() {
            return Err(StakingError::Snapshot("hash mismatch".into()));
        }
        check_params(&snapshot.params)?;

        let mut registry = AssetRegistry::new();
        for asset in snapshot.approved {
            registry.approve(asset);
        }

        let mut seen = BTreeSet::new();
        let mut rows = Vec::with_capacity(snapshot.positions.len());
        for entry in snapshot.positions {
            if !seen.insert(entry.participant.clone()) {
                return Err(StakingError::Snapshot(format!(
                    "participant {} listed twice",
                    entry.participant
                )));
            }
            let mut position = ParticipantPosition::new();
            for (asset, amount) in &entry.stakes {
                if !registry.is_approved(asset) {
                    return Err(StakingError::Snapshot(format!(
                        "{} holds a balance in unapproved asset {}",
                        entry.participant, asset
                    )));
                }
                position.set_staked(asset, *amount);
            }
            position.pending_reward = entry.pending_reward;
            rows.push((entry.participant, position));
        }
        let ledger = StakingLedger::from_positions(rows)?;

        Ok(Self::assemble(
            snapshot.params,
            registry,
            ledger,
            snapshot.epoch,
        ))
    }
}

fn check_params(params: &FarmParams) -> Result<(), StakingError> {
    if params.administrator == params.custody_account {
        return Err(StakingError::InvalidParams(format!(
            "{} cannot be both administrator and custody account",
            params.administrator
        )));
    }
    Ok(())
}
