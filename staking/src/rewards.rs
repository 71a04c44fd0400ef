//! Distribution epochs.

use crate::error::StakingError;
use crate::ledger::StakingLedger;
use crate::registry::AssetRegistry;
use farm_types::AccountId;
use serde::{Deserialize, Serialize};

/// Outcome of one distribution call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// 1-based index of this distribution.
    pub epoch: u64,
    /// Number of active participants credited.
    pub participants: usize,
    /// Sum of all accruals credited in this epoch.
    pub total_accrued: u128,
}

/// Credits every active participant with the sum of their own stakes.
///
/// The epoch counter is informational; accrual itself is purely additive on
/// each participant's pending counter.
#[derive(Clone, Debug, Default)]
pub struct RewardAccrualEngine {
    epoch: u64,
}

impl RewardAccrualEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epoch(epoch: u64) -> Self {
        Self { epoch }
    }

    /// Number of completed distributions.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Compute each active participant's new pending counter without
    /// touching the ledger.
    ///
    /// Returns `(participant, new_pending)` pairs and the epoch total.
    pub fn plan(
        &self,
        ledger: &StakingLedger,
        registry: &AssetRegistry,
    ) -> Result<(Vec<(AccountId, u128)>, u128), StakingError> {
        let mut plan = Vec::with_capacity(ledger.active_count());
        let mut total: u128 = 0;
        for participant in ledger.active_participants() {
            let Some(position) = ledger.position(participant) else {
                continue;
            };
            let accrual = position.accrual(registry).ok_or(StakingError::Overflow)?;
            let pending = position
                .pending_reward
                .checked_add(accrual)
                .ok_or(StakingError::Overflow)?;
            total = total.checked_add(accrual).ok_or(StakingError::Overflow)?;
            plan.push((participant.clone(), pending));
        }
        Ok((plan, total))
    }

    /// Run one epoch: every active participant is credited, or none is.
    ///
    /// Callers are responsible for the administrator check.
    pub fn distribute(
        &mut self,
        ledger: &mut StakingLedger,
        registry: &AssetRegistry,
    ) -> Result<DistributionReport, StakingError> {
        let (plan, total_accrued) = self.plan(ledger, registry)?;
        let epoch = self.epoch.checked_add(1).ok_or(StakingError::Overflow)?;

        ledger.set_pending_rewards(&plan);
        self.epoch = epoch;
        Ok(DistributionReport {
            epoch,
            participants: plan.len(),
            total_accrued,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::ParticipantPosition;
    use farm_types::AssetId;

    fn acct(name: &str) -> AccountId {
        AccountId::new(name)
    }

    fn staked(entries: &[(&str, u128)]) -> ParticipantPosition {
        let mut pos = ParticipantPosition::new();
        for (asset, amount) in entries {
            pos.set_staked(&AssetId::new(*asset), *amount);
        }
        pos
    }

    fn registry(assets: &[&str]) -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        for asset in assets {
            registry.approve(AssetId::new(*asset));
        }
        registry
    }

    #[test]
    fn accrual_is_own_balance_not_pool_share() {
        let registry = registry(&["mdai"]);
        let mut ledger = StakingLedger::from_positions([
            (acct("alice"), staked(&[("mdai", 10)])),
            (acct("bob"), staked(&[("mdai", 10)])),
            (acct("whale"), staked(&[("mdai", 1_000_000)])),
        ])
        .unwrap();
        let mut engine = RewardAccrualEngine::new();

        let report = engine.distribute(&mut ledger, &registry).unwrap();
        assert_eq!(report.epoch, 1);
        assert_eq!(report.participants, 3);
        assert_eq!(report.total_accrued, 1_000_020);
        assert_eq!(ledger.pending_reward(&acct("alice")), 10);
        assert_eq!(ledger.pending_reward(&acct("bob")), 10);
        assert_eq!(ledger.pending_reward(&acct("whale")), 1_000_000);
    }

    #[test]
    fn accrual_sums_across_assets() {
        let registry = registry(&["mdai", "bat"]);
        let mut ledger =
            StakingLedger::from_positions([(acct("alice"), staked(&[("mdai", 10), ("bat", 3)]))])
                .unwrap();
        RewardAccrualEngine::new()
            .distribute(&mut ledger, &registry)
            .unwrap();
        assert_eq!(ledger.pending_reward(&acct("alice")), 13);
    }

    #[test]
    fn repeated_epochs_add_up() {
        let registry = registry(&["mdai"]);
        let mut ledger =
            StakingLedger::from_positions([(acct("alice"), staked(&[("mdai", 10)]))]).unwrap();
        let mut engine = RewardAccrualEngine::new();
        for _ in 0..3 {
            engine.distribute(&mut ledger, &registry).unwrap();
        }
        assert_eq!(engine.epoch(), 3);
        assert_eq!(ledger.pending_reward(&acct("alice")), 30);
    }

    #[test]
    fn inactive_rows_are_skipped() {
        let registry = registry(&["mdai"]);
        let mut idle = ParticipantPosition::new();
        idle.pending_reward = 5;
        let mut ledger = StakingLedger::from_positions([(acct("idle"), idle)]).unwrap();

        let report = RewardAccrualEngine::new()
            .distribute(&mut ledger, &registry)
            .unwrap();
        assert_eq!(report.participants, 0);
        assert_eq!(report.total_accrued, 0);
        assert_eq!(ledger.pending_reward(&acct("idle")), 5);
    }

    #[test]
    fn overflow_aborts_whole_epoch() {
        let registry = registry(&["mdai"]);
        let mut near_max = staked(&[("mdai", 10)]);
        near_max.pending_reward = u128::MAX - 5;
        let mut ledger = StakingLedger::from_positions([
            (acct("alice"), staked(&[("mdai", 10)])),
            (acct("zed"), near_max),
        ])
        .unwrap();
        let mut engine = RewardAccrualEngine::new();

        let err = engine.distribute(&mut ledger, &registry).unwrap_err();
        assert!(matches!(err, StakingError::Overflow));
        // alice sorts first but must not have been credited.
        assert_eq!(ledger.pending_reward(&acct("alice")), 0);
        assert_eq!(engine.epoch(), 0);
    }
}
