//! Staking ledger and reward accrual for the token farm.
//!
//! Participants deposit approved assets into the farm's custody. On every
//! administrator-triggered distribution each active participant accrues
//! reward equal to the sum of their *own* staked balances:
//!
//! `pending(p) += Σ_{a ∈ approved} staked(a, p)`
//!
//! Accrual is not a pro-rata split of a pool; a participant's reward never
//! depends on what anyone else has staked.
//!
//! This crate handles:
//! - The administrator-maintained registry of stakeable assets
//! - Deposits and full-balance withdrawals against a custody account
//! - Distribution epochs and reward claims in the platinum category
//! - Integrity-checked snapshots of the whole farm state

pub mod claim;
pub mod engine;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod position;
pub mod registry;
pub mod rewards;
pub mod snapshot;

pub use claim::ClaimEngine;
pub use engine::StakingFarm;
pub use error::StakingError;
pub use gate::{AdminAuthority, OwnershipGate, SingleAdministrator};
pub use ledger::StakingLedger;
pub use position::ParticipantPosition;
pub use registry::AssetRegistry;
pub use rewards::{DistributionReport, RewardAccrualEngine};
pub use snapshot::{FarmSnapshot, PositionSnapshot};
