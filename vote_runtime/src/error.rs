use std::io;

use thiserror::Error;
use vote_engine::{EngineError, ReplayError};

/// Failures surfaced by the vote store. A failed write never leaves a
/// partial mutation behind.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid vote option {key:?}; valid options: {valid_options:?}")]
    InvalidOption {
        key: String,
        valid_options: Vec<String>,
    },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StoreError {
    pub fn is_invalid_option(&self) -> bool {
        matches!(self, StoreError::InvalidOption { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable(_))
    }
}

impl From<EngineError> for StoreError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidOption { key, valid_options } => {
                StoreError::InvalidOption { key, valid_options }
            }
            other => StoreError::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::StorageUnavailable(err.to_string())
    }
}

impl From<ReplayError> for StoreError {
    fn from(err: ReplayError) -> Self {
        StoreError::StorageUnavailable(format!("vote log replay failed: {}", err))
    }
}

/// Bad runtime configuration.
#[derive(Error, Debug)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}
