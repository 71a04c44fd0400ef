//! The transferable-asset capability consumed by the staking ledger.
//!
//! The farm never owns balances itself. Every movement of value (deposit into
//! custody, withdrawal, reward payout) goes through an [`AssetBank`], which
//! either completes a transfer fully or rejects it without side effects.
//!
//! [`MemoryBank`] is the in-process implementation used by the service and
//! the daemon.

pub mod bank;
pub mod error;
pub mod memory;

pub use bank::{AssetBank, AssetKey};
pub use error::BankError;
pub use memory::MemoryBank;
