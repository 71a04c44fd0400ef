//! Token farm service. Hosts one farm and its bank behind a single writer.
//!
//! Every mutation runs under an exclusive lock, so operations apply in a total
//! order and none observes another half-applied. Queries share a read lock.
//! Successful mutations are published on an [`EventBus`] and logged with
//! `tracing`.

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod persist;
pub mod service;

pub use config::{FarmConfig, GenesisBalance};
pub use error::ServiceError;
pub use event::{EventBus, FarmEvent};
pub use logging::{init_logging, LogFormat};
pub use persist::StateFiles;
pub use service::FarmService;
