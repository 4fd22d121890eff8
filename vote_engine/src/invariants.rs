//! VoteEngine v1: Invariant Checks
//!
//! Full-scan consistency checks between the event log and everything
//! derived from it. Run after replay and from tests; the write path
//! relies on `transitions` keeping these true incrementally.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::InvariantViolation;
use crate::registry::OptionRegistry;
use crate::state::VoteState;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every check. Returns the first failure.
pub fn try_validate_invariants(
    state: &VoteState,
    registry: &OptionRegistry,
) -> Result<(), InvariantViolation> {
    check_option_refs(state, registry)?;
    check_sequence_order(state)?;
    check_tallies(state, registry)?;
    check_sessions(state)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

/// Every event references a registered option.
fn check_option_refs(
    state: &VoteState,
    registry: &OptionRegistry,
) -> Result<(), InvariantViolation> {
    for event in &state.events {
        if !registry.is_valid(&event.option_key) {
            return Err(InvariantViolation::new(
                "option_refs",
                format!(
                    "Event {} references unknown option {:?}",
                    event.id, event.option_key
                ),
            ));
        }
    }
    Ok(())
}

/// Event ids strictly increase and end at `last_sequence`.
fn check_sequence_order(state: &VoteState) -> Result<(), InvariantViolation> {
    let mut prev = 0u64;
    for event in &state.events {
        if event.id <= prev {
            return Err(InvariantViolation::new(
                "sequence_order",
                format!("Event id {} follows {}", event.id, prev),
            ));
        }
        prev = event.id;
    }
    if prev != state.last_sequence {
        return Err(InvariantViolation::new(
            "sequence_order",
            format!(
                "Last event id {} does not match last_sequence {}",
                prev, state.last_sequence
            ),
        ));
    }
    Ok(())
}

/// Tallies equal per-option event counts and sum to the log length.
fn check_tallies(
    state: &VoteState,
    registry: &OptionRegistry,
) -> Result<(), InvariantViolation> {
    let mut counted: BTreeMap<&str, u64> = BTreeMap::new();
    for event in &state.events {
        *counted.entry(event.option_key.as_str()).or_insert(0) += 1;
    }

    for option in registry.list_options() {
        let tally = state.tallies.get(&option.key).copied().unwrap_or(0);
        let actual = counted.get(option.key.as_str()).copied().unwrap_or(0);
        if tally != actual {
            return Err(InvariantViolation::new(
                "tally_drift",
                format!(
                    "Option {:?} tally {} but {} events",
                    option.key, tally, actual
                ),
            ));
        }
    }

    let sum: u64 = state.tallies.values().sum();
    if sum != state.events.len() as u64 {
        return Err(InvariantViolation::new(
            "tally_total",
            format!("Tallies sum to {} but log holds {} events", sum, state.events.len()),
        ));
    }
    Ok(())
}

/// Each session's counter and last timestamp match its events, and no
/// session exists without events.
fn check_sessions(state: &VoteState) -> Result<(), InvariantViolation> {
    let mut seen: BTreeMap<&str, (u64, DateTime<Utc>)> = BTreeMap::new();
    for event in &state.events {
        seen.entry(event.session_id.as_str())
            .and_modify(|(count, last)| {
                *count += 1;
                *last = event.created_at;
            })
            .or_insert((1, event.created_at));
    }

    if seen.len() != state.sessions.len() {
        return Err(InvariantViolation::new(
            "session_set",
            format!(
                "{} sessions tracked but {} distinct sessions in log",
                state.sessions.len(),
                seen.len()
            ),
        ));
    }

    for (sid, session) in &state.sessions {
        let Some((count, last)) = seen.get(sid.as_str()) else {
            return Err(InvariantViolation::new(
                "session_set",
                format!("Session {:?} has no events", sid),
            ));
        };
        if session.vote_count != *count {
            return Err(InvariantViolation::new(
                "session_count",
                format!(
                    "Session {:?} vote_count {} but {} events",
                    sid, session.vote_count, count
                ),
            ));
        }
        if session.last_vote_at != *last {
            return Err(InvariantViolation::new(
                "session_last_vote",
                format!(
                    "Session {:?} last_vote_at {} but latest event at {}",
                    sid, session.last_vote_at, last
                ),
            ));
        }
    }
    Ok(())
}
