//! VoteEngine v1: State Construction

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{VoteEvent, VotingSession};
use crate::registry::OptionRegistry;

/// Everything the kernel knows: the event log and what derives from it.
///
/// `tallies` is crate-private and written only by `transitions`, in the
/// same step that appends the event it counts. Outside the kernel,
/// counts are read through `aggregate::count_for`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteState {
    pub events: Vec<VoteEvent>,
    pub sessions: BTreeMap<String, VotingSession>,
    pub(crate) tallies: BTreeMap<String, u64>,
    pub last_sequence: u64,
}

impl VoteState {
    /// A fresh, empty state with a zero tally for every registered option.
    pub fn new(registry: &OptionRegistry) -> Self {
        Self {
            events: Vec::new(),
            sessions: BTreeMap::new(),
            tallies: registry
                .list_options()
                .iter()
                .map(|o| (o.key.clone(), 0))
                .collect(),
            last_sequence: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
