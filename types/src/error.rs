//! Validation errors for identifier parsing.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account identifier: {0:?}")]
    InvalidAccount(String),

    #[error("invalid asset identifier: {0:?}")]
    InvalidAsset(String),
}
