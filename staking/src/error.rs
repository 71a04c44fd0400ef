//! Staking errors.

use farm_bank::BankError;
use farm_types::{AccountId, AssetId};
use thiserror::Error;

/// Every failure aborts the whole operation; no ledger state is changed.
#[derive(Debug, Error)]
pub enum StakingError {
    #[error("{caller} is not the administrator")]
    Unauthorized { caller: AccountId },

    #[error("asset {0} is not approved for staking")]
    AssetNotApproved(AssetId),

    #[error("transfer failed: {0}")]
    TransferFailed(#[from] BankError),

    #[error("{participant} has nothing staked in {asset}")]
    NothingStaked {
        participant: AccountId,
        asset: AssetId,
    },

    #[error("{participant} has {pending} unclaimed reward units")]
    UnclaimedRewardsOutstanding { participant: AccountId, pending: u128 },

    #[error("account {0} is not active, no tokens are staked")]
    AccountNotActive(AccountId),

    #[error("the custody account {0} cannot stake, withdraw or claim")]
    CustodyAccount(AccountId),

    #[error("invalid farm parameters: {0}")]
    InvalidParams(String),

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("arithmetic overflow in staking computation")]
    Overflow,

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
