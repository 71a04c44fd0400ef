//! Bank errors.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, available {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("arithmetic overflow in bank transfer")]
    Overflow,
}
