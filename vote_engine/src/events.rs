//! VoteEngine v1: Event Definitions
//!
//! Events are pure data. They carry intent and payload only.
//! They contain ZERO transition logic.
//!
//! Schema version is locked at 1. Events with any other
//! schema_version are rejected by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::VoteEvent;

/// Schema version for v1 kernel events. Hardcoded, never changes.
pub const SCHEMA_VERSION: u32 = 1;

/// A submitted vote, stamped with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCast {
    pub sequence: u64,
    pub schema_version: u32,
    pub option_key: String,
    pub voter_address: String,
    pub user_agent: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

impl VoteCast {
    pub fn new(
        sequence: u64,
        option_key: &str,
        voter_address: &str,
        user_agent: &str,
        session_id: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence,
            schema_version: SCHEMA_VERSION,
            option_key: option_key.to_string(),
            voter_address: voter_address.to_string(),
            user_agent: user_agent.to_string(),
            session_id: session_id.to_string(),
            created_at,
        }
    }

    /// The immutable record this submission becomes once committed.
    pub fn to_event(&self) -> VoteEvent {
        VoteEvent {
            id: self.sequence,
            option_key: self.option_key.clone(),
            voter_address: self.voter_address.clone(),
            user_agent: self.user_agent.clone(),
            session_id: self.session_id.clone(),
            created_at: self.created_at,
        }
    }
}
