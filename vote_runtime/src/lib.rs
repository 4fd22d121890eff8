#![forbid(unsafe_code)]

//! Vote Runtime
//!
//! Wraps the vote kernel with persistence, replay, bounded locking
//! and the service boundary used by a routing layer.
//!
//! No domain logic lives here; validation, tallies and aggregates
//! are delegated to the kernel.

pub mod config;
pub mod error;
pub mod proto_types;
pub mod proto_bridge;
pub mod ledger;
pub mod event_store;
pub mod replay;
pub mod store;
pub mod service;

pub use config::RuntimeConfig;
pub use error::{ConfigError, StoreError};
pub use event_store::FileLedger;
pub use ledger::{Ledger, MemoryLedger};
pub use service::{VoterContext, VotingService};
pub use store::VoteStore;
