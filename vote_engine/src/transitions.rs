//! VoteEngine v1: Centralized Transition Logic
//!
//! ALL state-mutation logic lives here.
//!
//! A vote is split into `check_vote`, which may reject but never
//! mutates, and `apply_vote`, which cannot fail. Whatever sits
//! between the two (the runtime persists the event there) runs
//! against a state that has not been touched yet.

use crate::arithmetic::checked_inc;
use crate::domain::{VoteReceipt, VotingSession};
use crate::error::EngineError;
use crate::events::{VoteCast, SCHEMA_VERSION};
use crate::registry::OptionRegistry;
use crate::state::VoteState;

/// Validate *cast* against *state*. Read-only.
pub fn check_vote(
    state: &VoteState,
    registry: &OptionRegistry,
    cast: &VoteCast,
) -> Result<(), EngineError> {
    if cast.schema_version != SCHEMA_VERSION {
        return Err(EngineError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            got: cast.schema_version,
        });
    }

    let expected = checked_inc(state.last_sequence)?;
    if cast.sequence != expected {
        return Err(EngineError::SequenceViolation {
            expected,
            got: cast.sequence,
        });
    }

    if !registry.is_valid(&cast.option_key) {
        return Err(EngineError::InvalidOption {
            key: cast.option_key.clone(),
            valid_options: registry.keys(),
        });
    }

    checked_inc(state.tallies.get(&cast.option_key).copied().unwrap_or(0))?;
    if let Some(session) = state.sessions.get(&cast.session_id) {
        checked_inc(session.vote_count)?;
    }

    Ok(())
}

/// Append the event, bump its option's tally and upsert its session.
///
/// Callers must have passed *cast* through `check_vote` against the
/// same state.
pub fn apply_vote(state: &mut VoteState, cast: &VoteCast) -> VoteReceipt {
    let event = cast.to_event();

    let tally = state.tallies.entry(cast.option_key.clone()).or_insert(0);
    *tally += 1;
    let current_count = *tally;

    let session = state
        .sessions
        .entry(cast.session_id.clone())
        .and_modify(|s| {
            s.voter_address = cast.voter_address.clone();
            s.last_vote_at = cast.created_at;
            s.vote_count += 1;
        })
        .or_insert_with(|| VotingSession {
            session_id: cast.session_id.clone(),
            voter_address: cast.voter_address.clone(),
            last_vote_at: cast.created_at,
            vote_count: 1,
        });
    let session_vote_count = session.vote_count;

    state.events.push(event.clone());
    state.last_sequence = cast.sequence;

    VoteReceipt {
        event,
        current_count,
        session_vote_count,
    }
}

/// Drop every event and session. Tallies return to zero.
pub fn clear(state: &mut VoteState, registry: &OptionRegistry) {
    *state = VoteState::new(registry);
}
