//! Fundamental types for the token farm.
//!
//! This crate defines the identifiers shared across every other crate in the
//! workspace: accounts, assets, reward categories, and the immutable
//! construction parameters of a farm.

pub mod address;
pub mod asset;
pub mod error;
pub mod params;

pub use address::AccountId;
pub use asset::{AssetId, CategoryId, RewardToken};
pub use error::TypesError;
pub use params::FarmParams;
