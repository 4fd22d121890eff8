//! Inbound boundary for a routing layer.
//!
//! Shapes requests and responses; owns no state of its own beyond
//! configuration. Transport, status codes and envelopes belong to
//! whoever calls this.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use vote_engine::{AggregateRow, Summary, TrendRow, VoteEvent, VoteOption};

use crate::config::RuntimeConfig;
use crate::error::StoreError;
use crate::event_store::FileLedger;
use crate::ledger::Ledger;
use crate::store::VoteStore;

/// Where a submission came from.
#[derive(Debug, Clone, Default)]
pub struct VoterContext {
    pub voter_address: String,
    pub user_agent: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub option: String,
    pub current_count: u64,
    pub session_vote_count: u64,
    pub event: VoteEvent,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsReport {
    pub total_votes: u64,
    pub results: Vec<AggregateRow>,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryReport {
    pub total_votes: u64,
    pub recent_votes: Vec<VoteEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
    pub total_votes: Option<u64>,
}

pub struct VotingService<L: Ledger = FileLedger> {
    store: VoteStore<L>,
    history_limit: usize,
    history_max: usize,
    trend_hours: u32,
    trend_max_hours: u32,
    started: Instant,
}

impl<L: Ledger> VotingService<L> {
    pub fn new(store: VoteStore<L>, config: &RuntimeConfig) -> Self {
        Self {
            store,
            history_limit: config.history_limit,
            history_max: config.history_max,
            trend_hours: config.trend_hours,
            trend_max_hours: config.trend_max_hours,
            started: Instant::now(),
        }
    }

    pub fn store(&self) -> &VoteStore<L> {
        &self.store
    }

    pub fn list_options(&self) -> &[VoteOption] {
        self.store.options()
    }

    pub fn submit_vote(
        &self,
        option_key: &str,
        voter: &VoterContext,
    ) -> Result<SubmitResponse, StoreError> {
        let receipt = self.store.record_vote(
            option_key,
            &voter.voter_address,
            &voter.user_agent,
            &voter.session_id,
        )?;
        Ok(SubmitResponse {
            message: "Vote recorded successfully",
            option: receipt.event.option_key.clone(),
            current_count: receipt.current_count,
            session_vote_count: receipt.session_vote_count,
            event: receipt.event,
        })
    }

    /// Totals and rows read from the same snapshot.
    pub fn get_results(&self) -> Result<ResultsReport, StoreError> {
        let (total_votes, results) = self
            .store
            .read_with(|e| (e.total_count(), e.results()))?;
        Ok(ResultsReport {
            total_votes,
            results,
            last_update: Utc::now(),
        })
    }

    /// `None` means the configured default; any limit is capped at the
    /// configured maximum.
    pub fn get_history(&self, limit: Option<usize>) -> Result<HistoryReport, StoreError> {
        let limit = limit.unwrap_or(self.history_limit).min(self.history_max);
        let (total_votes, recent_votes) = self
            .store
            .read_with(|e| (e.total_count(), e.recent(limit)))?;
        Ok(HistoryReport {
            total_votes,
            recent_votes,
        })
    }

    pub fn get_summary(&self) -> Result<Summary, StoreError> {
        self.store.summary()
    }

    /// Same defaulting and capping as `get_history`.
    pub fn get_trend(&self, window_hours: Option<u32>) -> Result<Vec<TrendRow>, StoreError> {
        let window_hours = window_hours
            .unwrap_or(self.trend_hours)
            .min(self.trend_max_hours);
        self.store.hourly_trend(window_hours)
    }

    pub fn admin_reset(&self) -> Result<(), StoreError> {
        info!("admin reset requested");
        self.store.reset_all()
    }

    /// Reports `degraded` rather than failing when the store is busy.
    pub fn health(&self) -> HealthReport {
        let total_votes = self.store.total_count().ok();
        HealthReport {
            status: if total_votes.is_some() { "healthy" } else { "degraded" },
            timestamp: Utc::now(),
            uptime_secs: self.started.elapsed().as_secs(),
            total_votes,
        }
    }
}
