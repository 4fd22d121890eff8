//! Vote store: the kernel and its ledger behind one lock.
//!
//! Concurrency: a single `RwLock` serializes writers against each
//! other and against readers. Readers share the lock and each read
//! works from one consistent state. Lock waits are bounded; a timeout
//! is reported as `StorageUnavailable`.
//!
//! Write order, all under one write guard:
//!   1. engine.check(vote)   - may reject, mutates nothing
//!   2. ledger.append(vote)  - may fail, rolls itself back
//!   3. engine.commit(vote)  - cannot fail

use std::time::Duration;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use vote_engine::hashing::canonical_hash;
use vote_engine::{
    AggregateRow, OptionRegistry, Summary, TrendRow, VoteCast, VoteEngine, VoteEvent, VoteOption,
    VoteReceipt, VotingSession,
};

use crate::config::RuntimeConfig;
use crate::error::StoreError;
use crate::event_store::FileLedger;
use crate::ledger::Ledger;
use crate::replay;

struct Inner<L> {
    engine: VoteEngine,
    ledger: L,
}

/// Thread-safe vote store. Share it behind an `Arc`.
pub struct VoteStore<L: Ledger = FileLedger> {
    registry: OptionRegistry,
    inner: RwLock<Inner<L>>,
    lock_timeout: Duration,
}

impl VoteStore<FileLedger> {
    /// Open the file-backed store described by `config`, replaying any
    /// votes already on disk.
    pub fn open(registry: OptionRegistry, config: &RuntimeConfig) -> Result<Self, StoreError> {
        let ledger = FileLedger::open(&config.log_path())?;
        Self::with_ledger(registry, ledger, config.lock_timeout)
    }
}

impl<L: Ledger> VoteStore<L> {
    /// Build a store over an existing ledger, replaying its contents.
    pub fn with_ledger(
        registry: OptionRegistry,
        ledger: L,
        lock_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let casts = ledger.load_all()?;
        let engine = replay::rebuild_engine(&registry, &casts)?;
        info!(
            votes = engine.total_count(),
            sessions = engine.state().sessions.len(),
            "vote log replayed"
        );

        Ok(Self {
            registry,
            inner: RwLock::new(Inner { engine, ledger }),
            lock_timeout,
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner<L>>, StoreError> {
        self.inner.try_write_for(self.lock_timeout).ok_or_else(|| {
            warn!(timeout_ms = self.lock_timeout.as_millis() as u64, "write lock timed out");
            StoreError::StorageUnavailable("timed out waiting for the vote store".to_string())
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner<L>>, StoreError> {
        self.inner.try_read_for(self.lock_timeout).ok_or_else(|| {
            warn!(timeout_ms = self.lock_timeout.as_millis() as u64, "read lock timed out");
            StoreError::StorageUnavailable("timed out waiting for the vote store".to_string())
        })
    }

    /// Run `f` against one consistent view of the engine.
    pub fn read_with<R>(&self, f: impl FnOnce(&VoteEngine) -> R) -> Result<R, StoreError> {
        let guard = self.read()?;
        Ok(f(&guard.engine))
    }

    // -- Writes ---------------------------------------------------------

    /// Record one vote stamped with the current time.
    pub fn record_vote(
        &self,
        option_key: &str,
        voter_address: &str,
        user_agent: &str,
        session_id: &str,
    ) -> Result<VoteReceipt, StoreError> {
        self.record_vote_at(option_key, voter_address, user_agent, session_id, Utc::now())
    }

    /// Record one vote stamped with `at`, truncated to the millisecond.
    ///
    /// The event and its session upsert land together or not at all.
    /// The receipt's count includes this vote and nothing later.
    pub fn record_vote_at(
        &self,
        option_key: &str,
        voter_address: &str,
        user_agent: &str,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> Result<VoteReceipt, StoreError> {
        let at = at.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(at);

        let mut guard = self.write()?;
        let Inner { engine, ledger } = &mut *guard;

        let cast = VoteCast::new(
            engine.next_sequence(),
            option_key,
            voter_address,
            user_agent,
            session_id,
            at,
        );

        if let Err(e) = engine.check(&cast) {
            warn!(option = option_key, session = session_id, error = %e, "vote rejected");
            return Err(e.into());
        }

        if let Err(e) = ledger.append(&cast) {
            warn!(option = option_key, session = session_id, error = %e, "vote not persisted");
            return Err(StoreError::StorageUnavailable(e.to_string()));
        }

        let receipt = engine.commit(&cast);
        info!(
            id = receipt.event.id,
            option = option_key,
            session = session_id,
            total = receipt.current_count,
            "vote recorded"
        );
        Ok(receipt)
    }

    /// Clear every vote and session in one step. Idempotent.
    pub fn reset_all(&self) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        let Inner { engine, ledger } = &mut *guard;

        let cleared = engine.total_count();
        if let Err(e) = ledger.clear() {
            warn!(error = %e, "reset failed, votes kept");
            return Err(StoreError::StorageUnavailable(e.to_string()));
        }
        engine.reset();

        info!(cleared, "votes reset");
        Ok(())
    }

    // -- Reads ----------------------------------------------------------

    /// Fixed at startup, so no lock is taken.
    pub fn options(&self) -> &[VoteOption] {
        self.registry.list_options()
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn count_for(&self, option_key: &str) -> Result<u64, StoreError> {
        self.read_with(|e| e.count_for(option_key))
    }

    pub fn total_count(&self) -> Result<u64, StoreError> {
        self.read_with(|e| e.total_count())
    }

    /// Newest first, at most `limit` events.
    pub fn recent(&self, limit: usize) -> Result<Vec<VoteEvent>, StoreError> {
        debug!(limit, "reading recent votes");
        self.read_with(|e| e.recent(limit))
    }

    /// `Ok(None)` when the session has never voted.
    pub fn get_session(&self, session_id: &str) -> Result<Option<VotingSession>, StoreError> {
        self.read_with(|e| e.session(session_id).cloned())
    }

    pub fn results(&self) -> Result<Vec<AggregateRow>, StoreError> {
        debug!("reading results");
        self.read_with(|e| e.results())
    }

    pub fn hourly_trend(&self, window_hours: u32) -> Result<Vec<TrendRow>, StoreError> {
        self.hourly_trend_at(window_hours, Utc::now())
    }

    pub fn hourly_trend_at(
        &self,
        window_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendRow>, StoreError> {
        self.read_with(|e| e.hourly_trend(window_hours, now))
    }

    pub fn summary(&self) -> Result<Summary, StoreError> {
        self.read_with(|e| e.summary())
    }

    /// Canonical hash of the current state.
    pub fn state_hash(&self) -> Result<String, StoreError> {
        self.read_with(|e| canonical_hash(e.state()))
    }
}
