#![forbid(unsafe_code)]

/// Kernel v1. Behavioral changes require kernel_v2.
pub const KERNEL_VERSION: u32 = 1;

pub mod arithmetic;
pub mod error;
pub mod domain;
pub mod registry;
pub mod events;
pub mod state;
pub mod transitions;
pub mod invariants;
pub mod aggregate;
pub mod hashing;
pub mod engine;

pub use domain::{AggregateRow, Summary, TrendRow, VoteEvent, VoteOption, VoteReceipt, VotingSession};
pub use engine::{ReplayError, VoteEngine};
pub use error::{EngineError, InvariantViolation, RegistryError};
pub use events::VoteCast;
pub use registry::OptionRegistry;
pub use state::VoteState;
