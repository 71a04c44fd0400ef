//! Events emitted after each successful farm mutation.

use farm_types::{AccountId, AssetId};
use serde::Serialize;

/// Farm-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FarmEvent {
    /// An asset became stakeable. Not emitted for repeat approvals.
    AssetApproved { asset: AssetId },
    /// A participant staked into custody.
    Deposited {
        participant: AccountId,
        asset: AssetId,
        amount: u128,
        balance: u128,
    },
    /// A participant took back their whole balance of one asset.
    Withdrawn {
        participant: AccountId,
        asset: AssetId,
        amount: u128,
    },
    /// One accrual epoch completed.
    RewardsDistributed {
        epoch: u64,
        participants: usize,
        total_accrued: u128,
    },
    /// A participant's pending reward was paid out.
    RewardClaimed { participant: AccountId, amount: u128 },
}

/// Synchronous fan-out event bus for farm events.
///
/// Listeners run inline while the farm's write lock is held, so they see
/// events in commit order. They must not call back into the service.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&FarmEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&FarmEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &FarmEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
