//! VoteEngine v1: Core Domain Types
//!
//! Pure data. No behaviour, no transition logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Core Domain Types ──────────────────────────────────────────────

/// One votable option. Fixed for the lifetime of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoteOption {
    pub key: String,
    pub display_name: String,
    pub description: String,
    pub emoji: String,
}

impl VoteOption {
    pub fn new(key: &str, display_name: &str, description: &str, emoji: &str) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            emoji: emoji.to_string(),
        }
    }
}

/// One accepted vote. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoteEvent {
    /// Kernel sequence number; strictly increasing.
    pub id: u64,
    pub option_key: String,
    /// Best-effort network origin.
    pub voter_address: String,
    pub user_agent: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

/// Per-session bookkeeping, upserted alongside every vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VotingSession {
    pub session_id: String,
    pub voter_address: String,
    pub last_vote_at: DateTime<Utc>,
    pub vote_count: u64,
}

/// Derived per-option count and percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub option: String,
    pub display_name: String,
    pub emoji: String,
    pub count: u64,
    pub percentage: u32,
}

/// Votes cast within one UTC hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRow {
    pub hour: DateTime<Utc>,
    pub count: u64,
}

/// Headline statistics over the whole log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_votes: u64,
    pub unique_sessions: u64,
    pub unique_voters: u64,
    pub first_vote_at: Option<DateTime<Utc>>,
    pub last_vote_at: Option<DateTime<Utc>>,
    /// Option with the most votes; `None` while nobody has voted.
    pub leading_option: Option<String>,
}

/// Outcome of a committed vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub event: VoteEvent,
    /// The option's total including this vote.
    pub current_count: u64,
    pub session_vote_count: u64,
}
