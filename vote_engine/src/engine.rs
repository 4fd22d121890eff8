//! VoteEngine v1: Engine
//!
//! Top-level orchestrator. Owns the registry and the state, delegates
//! mutation to transitions and reads to the aggregator.

use chrono::{DateTime, Utc};

use crate::aggregate;
use crate::domain::{AggregateRow, Summary, TrendRow, VoteEvent, VoteReceipt, VotingSession};
use crate::error::{EngineError, InvariantViolation};
use crate::events::VoteCast;
use crate::invariants::try_validate_invariants;
use crate::registry::OptionRegistry;
use crate::state::VoteState;
use crate::transitions;

/// Stateful engine wrapping the pure transition layer.
#[derive(Debug, Clone)]
pub struct VoteEngine {
    registry: OptionRegistry,
    state: VoteState,
}

impl VoteEngine {
    pub fn new(registry: OptionRegistry) -> Self {
        let state = VoteState::new(&registry);
        Self { registry, state }
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn state(&self) -> &VoteState {
        &self.state
    }

    /// Sequence number the next accepted vote must carry.
    pub fn next_sequence(&self) -> u64 {
        self.state.last_sequence.saturating_add(1)
    }

    /// Validate a vote without applying it.
    pub fn check(&self, cast: &VoteCast) -> Result<(), EngineError> {
        transitions::check_vote(&self.state, &self.registry, cast)
    }

    /// Apply a vote that has already passed `check`.
    pub fn commit(&mut self, cast: &VoteCast) -> VoteReceipt {
        transitions::apply_vote(&mut self.state, cast)
    }

    /// Check then commit.
    pub fn apply(&mut self, cast: &VoteCast) -> Result<VoteReceipt, EngineError> {
        self.check(cast)?;
        Ok(self.commit(cast))
    }

    /// Drop all votes and sessions.
    pub fn reset(&mut self) {
        transitions::clear(&mut self.state, &self.registry);
    }

    /// Event-sourced reconstruction: reset, replay, then verify.
    ///
    /// On failure the engine is left empty.
    pub fn replay(&mut self, casts: &[VoteCast]) -> Result<&VoteState, ReplayError> {
        self.reset();
        for cast in casts {
            if let Err(e) = self.apply(cast) {
                self.reset();
                return Err(e.into());
            }
        }
        if let Err(e) = try_validate_invariants(&self.state, &self.registry) {
            self.reset();
            return Err(e.into());
        }
        Ok(&self.state)
    }

    // -- Reads ----------------------------------------------------------

    pub fn count_for(&self, option_key: &str) -> u64 {
        aggregate::count_for(&self.state, option_key)
    }

    pub fn total_count(&self) -> u64 {
        aggregate::total_count(&self.state)
    }

    pub fn recent(&self, limit: usize) -> Vec<VoteEvent> {
        aggregate::recent(&self.state, limit)
    }

    pub fn session(&self, session_id: &str) -> Option<&VotingSession> {
        self.state.sessions.get(session_id)
    }

    pub fn results(&self) -> Vec<AggregateRow> {
        aggregate::results(&self.state, &self.registry)
    }

    pub fn hourly_trend(&self, window_hours: u32, now: DateTime<Utc>) -> Vec<TrendRow> {
        aggregate::hourly_trend(&self.state, window_hours, now)
    }

    pub fn summary(&self) -> Summary {
        aggregate::summary(&self.state, &self.registry)
    }
}

/// Why a log could not be replayed into a consistent state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Rejected event during replay: {0}")]
    Rejected(#[from] EngineError),

    #[error(transparent)]
    Inconsistent(#[from] InvariantViolation),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cast(seq: u64, option: &str) -> VoteCast {
        let at = Utc.with_ymd_and_hms(2026, 4, 4, 4, seq as u32, 0).unwrap();
        VoteCast::new(seq, option, "ip", "ua", "s", at)
    }

    #[test]
    fn apply_returns_fresh_count() {
        let mut engine = VoteEngine::new(OptionRegistry::default());
        assert_eq!(engine.apply(&cast(1, "pizza")).unwrap().current_count, 1);
        assert_eq!(engine.apply(&cast(2, "pizza")).unwrap().current_count, 2);
        assert_eq!(engine.next_sequence(), 3);
    }

    #[test]
    fn replay_rebuilds_same_state() {
        let casts = vec![cast(1, "pizza"), cast(2, "ramen"), cast(3, "pizza")];
        let mut live = VoteEngine::new(OptionRegistry::default());
        for c in &casts {
            live.apply(c).unwrap();
        }

        let mut replayed = VoteEngine::new(OptionRegistry::default());
        replayed.replay(&casts).unwrap();
        assert_eq!(replayed.state(), live.state());
    }

    #[test]
    fn replay_rejects_unknown_option_and_leaves_engine_empty() {
        let mut engine = VoteEngine::new(OptionRegistry::default());
        let err = engine
            .replay(&[cast(1, "pizza"), cast(2, "sushi")])
            .unwrap_err();
        assert!(matches!(err, ReplayError::Rejected(EngineError::InvalidOption { .. })));
        assert_eq!(engine.total_count(), 0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut engine = VoteEngine::new(OptionRegistry::default());
        engine.reset();
        engine.apply(&cast(1, "burger")).unwrap();
        engine.reset();
        engine.reset();
        assert_eq!(engine.total_count(), 0);
        assert_eq!(engine.next_sequence(), 1);
    }
}
