//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators of the farm are abstracted behind traits. This crate
//! provides test-friendly implementations that:
//! - Behave like the real thing by default
//! - Can be told to fail on demand
//! - Record what was asked of them
//!
//! Usage: swap real implementations for nullables in tests.

pub mod bank;

pub use bank::{NullBank, TransferRecord};
