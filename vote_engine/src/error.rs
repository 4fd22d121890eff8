//! VoteEngine v1: Error Types

use thiserror::Error;

/// Rejections raised by the kernel. None of them leave a partial mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid vote option {key:?}; valid options: {valid_options:?}")]
    InvalidOption {
        key: String,
        valid_options: Vec<String>,
    },

    #[error("Schema version mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u32, got: u32 },

    #[error("Sequence violation: expected {expected}, got {got}")]
    SequenceViolation { expected: u64, got: u64 },

    #[error("Counter overflow at {0}")]
    CounterOverflow(u64),
}

/// Failures building an option registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Option registry must declare at least one option")]
    Empty,

    #[error("{0}")]
    MalformedKey(String),

    #[error("Duplicate option key {0:?}")]
    DuplicateKey(String),
}

/// A state that breaks one of the kernel's consistency rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invariant violation: [INVARIANT:{rule}] {detail}")]
pub struct InvariantViolation {
    pub rule: &'static str,
    pub detail: String,
}

impl InvariantViolation {
    pub(crate) fn new(rule: &'static str, detail: impl Into<String>) -> Self {
        Self {
            rule,
            detail: detail.into(),
        }
    }
}
