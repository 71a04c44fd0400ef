//! The farm service: a single-writer wrapper around a farm and its bank.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use farm_bank::{AssetBank, AssetKey, MemoryBank};
use farm_staking::{DistributionReport, FarmSnapshot, StakingError, StakingFarm};
use farm_types::{AccountId, AssetId};

use crate::config::FarmConfig;
use crate::event::{EventBus, FarmEvent};
use crate::ServiceError;

struct FarmState<B> {
    farm: StakingFarm,
    bank: B,
}

/// Serializes every farm operation.
///
/// Mutations hold the write lock for their whole duration, including the
/// bank transfer and event fan-out. Queries take the read lock and never
/// observe a half-applied mutation.
pub struct FarmService<B: AssetBank> {
    state: RwLock<FarmState<B>>,
    events: EventBus,
}

impl FarmService<MemoryBank> {
    /// Create a fresh farm from configuration, seeding the bank with the
    /// configured genesis balances.
    pub fn from_config(config: &FarmConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let mut bank = MemoryBank::new();
        for entry in &config.genesis {
            bank.mint(&entry.asset_key(), &entry.account, u128::from(entry.amount))?;
        }
        tracing::info!(
            administrator = %config.administrator,
            custody = %config.custody_account,
            reward = %config.params().reward_token(),
            genesis_entries = config.genesis.len(),
            "farm created"
        );
        Ok(Self::new(StakingFarm::new(config.params())?, bank))
    }

    /// Set the allowance `owner` grants `spender` in the bank.
    pub fn allow(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        asset: &AssetKey,
        amount: u128,
    ) -> Result<(), ServiceError> {
        let mut state = self.write()?;
        state.bank.approve(owner, spender, asset, amount);
        tracing::info!(%owner, %spender, %asset, amount, "allowance set");
        Ok(())
    }
}

impl<B: AssetBank> FarmService<B> {
    pub fn new(farm: StakingFarm, bank: B) -> Self {
        Self {
            state: RwLock::new(FarmState { farm, bank }),
            events: EventBus::new(),
        }
    }

    /// Register a listener for farm events.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&FarmEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// Approve an asset for staking. Administrator only.
    pub fn approve(&self, caller: &AccountId, asset: &AssetId) -> Result<bool, ServiceError> {
        let mut state = self.write()?;
        let newly = log_outcome(
            "approve",
            caller,
            state.farm.approve(caller, asset.clone()),
        )?;
        if newly {
            tracing::info!(%caller, %asset, "asset approved");
            self.events.emit(&FarmEvent::AssetApproved {
                asset: asset.clone(),
            });
        } else {
            tracing::debug!(%caller, %asset, "asset already approved");
        }
        Ok(newly)
    }

    pub fn deposit(
        &self,
        participant: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<u128, ServiceError> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        let balance = log_outcome(
            "deposit",
            participant,
            state.farm.deposit(&mut state.bank, participant, asset, amount),
        )?;
        tracing::info!(%participant, %asset, amount, balance, "deposit accepted");
        self.events.emit(&FarmEvent::Deposited {
            participant: participant.clone(),
            asset: asset.clone(),
            amount,
            balance,
        });
        Ok(balance)
    }

    pub fn withdraw(&self, participant: &AccountId, asset: &AssetId) -> Result<u128, ServiceError> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        let amount = log_outcome(
            "withdraw",
            participant,
            state.farm.withdraw(&mut state.bank, participant, asset),
        )?;
        tracing::info!(%participant, %asset, amount, "withdrawal paid");
        self.events.emit(&FarmEvent::Withdrawn {
            participant: participant.clone(),
            asset: asset.clone(),
            amount,
        });
        Ok(amount)
    }

    /// Run one accrual epoch. Administrator only.
    pub fn distribute(&self, caller: &AccountId) -> Result<DistributionReport, ServiceError> {
        let mut state = self.write()?;
        let report = log_outcome("distribute", caller, state.farm.distribute(caller))?;
        tracing::info!(
            epoch = report.epoch,
            participants = report.participants,
            total_accrued = report.total_accrued,
            "rewards distributed"
        );
        self.events.emit(&FarmEvent::RewardsDistributed {
            epoch: report.epoch,
            participants: report.participants,
            total_accrued: report.total_accrued,
        });
        Ok(report)
    }

    pub fn claim(&self, participant: &AccountId) -> Result<u128, ServiceError> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        let amount = log_outcome(
            "claim",
            participant,
            state.farm.claim(&mut state.bank, participant),
        )?;
        tracing::info!(%participant, amount, "reward claimed");
        self.events.emit(&FarmEvent::RewardClaimed {
            participant: participant.clone(),
            amount,
        });
        Ok(amount)
    }

    pub fn is_approved(&self, asset: &AssetId) -> Result<bool, ServiceError> {
        Ok(self.read()?.farm.is_approved(asset))
    }

    pub fn staked_balance(
        &self,
        asset: &AssetId,
        participant: &AccountId,
    ) -> Result<u128, ServiceError> {
        Ok(self.read()?.farm.staked_balance(asset, participant))
    }

    pub fn pending_reward(&self, participant: &AccountId) -> Result<u128, ServiceError> {
        Ok(self.read()?.farm.pending_reward(participant))
    }

    pub fn is_active(&self, participant: &AccountId) -> Result<bool, ServiceError> {
        Ok(self.read()?.farm.is_active(participant))
    }

    pub fn balance_of(&self, asset: &AssetKey, holder: &AccountId) -> Result<u128, ServiceError> {
        Ok(self.read()?.bank.balance_of(asset, holder))
    }

    /// Run `f` against the farm under the read lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&StakingFarm, &B) -> R) -> Result<R, ServiceError> {
        let state = self.read()?;
        Ok(f(&state.farm, &state.bank))
    }

    pub fn snapshot(&self) -> Result<FarmSnapshot, ServiceError> {
        Ok(self.read()?.farm.snapshot())
    }

    /// Tear the service down, returning the farm and bank.
    pub fn into_parts(self) -> Result<(StakingFarm, B), ServiceError> {
        let state = self.state.into_inner().map_err(|_| ServiceError::Poisoned)?;
        Ok((state.farm, state.bank))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, FarmState<B>>, ServiceError> {
        self.state.read().map_err(|_| ServiceError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, FarmState<B>>, ServiceError> {
        self.state.write().map_err(|_| ServiceError::Poisoned)
    }
}

fn log_outcome<T>(
    operation: &'static str,
    caller: &AccountId,
    result: Result<T, StakingError>,
) -> Result<T, ServiceError> {
    result.map_err(|error| {
        tracing::warn!(operation, %caller, %error, "operation rejected");
        ServiceError::from(error)
    })
}
