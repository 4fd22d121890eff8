//! Replay orchestrator: rebuild state from a vote log.
//!
//! Delegates all domain logic to the kernel.
//! No shortcuts, no cached state logic.

use vote_engine::hashing::canonical_hash;
use vote_engine::{OptionRegistry, ReplayError, VoteCast, VoteEngine};

/// Rebuild a vote state from a sequence of persisted votes.
///
/// 1. Create a fresh engine for the registry
/// 2. Pass each vote sequentially to the kernel
/// 3. Verify invariants on the result
pub fn rebuild_engine(
    registry: &OptionRegistry,
    casts: &[VoteCast],
) -> Result<VoteEngine, ReplayError> {
    let mut engine = VoteEngine::new(registry.clone());
    engine.replay(casts)?;
    Ok(engine)
}

/// Rebuild state and return only the canonical hash.
pub fn rebuild_hash(registry: &OptionRegistry, casts: &[VoteCast]) -> Result<String, ReplayError> {
    let engine = rebuild_engine(registry, casts)?;
    Ok(canonical_hash(engine.state()))
}
