//! VoteEngine v1: Aggregator
//!
//! Pure reads over a `VoteState`. Every function here sees one state
//! value, so totals and percentages in a single result always agree.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeDelta, Utc};

use crate::arithmetic::{percentage, truncate_to_hour};
use crate::domain::{AggregateRow, Summary, TrendRow, VoteEvent};
use crate::registry::OptionRegistry;
use crate::state::VoteState;

/// Default number of events returned by `recent`.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Default trend window in hours.
pub const DEFAULT_TREND_HOURS: u32 = 24;

/// Longest trend window the kernel will build: one leap year of hours.
pub const MAX_TREND_HOURS: u32 = 24 * 366;

pub fn total_count(state: &VoteState) -> u64 {
    state.events.len() as u64
}

pub fn count_for(state: &VoteState, option_key: &str) -> u64 {
    state.tallies.get(option_key).copied().unwrap_or(0)
}

/// One row per registered option, highest count first. Equal counts
/// keep registry declaration order.
pub fn results(state: &VoteState, registry: &OptionRegistry) -> Vec<AggregateRow> {
    let total = total_count(state);
    let mut rows: Vec<AggregateRow> = registry
        .list_options()
        .iter()
        .map(|option| {
            let count = count_for(state, &option.key);
            AggregateRow {
                option: option.key.clone(),
                display_name: option.display_name.clone(),
                emoji: option.emoji.clone(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();
    // stable: ties stay in declaration order
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Most recent events first, at most `limit` of them.
pub fn recent(state: &VoteState, limit: usize) -> Vec<VoteEvent> {
    state.events.iter().rev().take(limit).cloned().collect()
}

/// Votes per UTC hour for the `window_hours` hours ending with the hour
/// that contains `now`. Oldest first, zero-filled.
///
/// Windows longer than `MAX_TREND_HOURS` are capped. A window reaching
/// past the earliest representable time yields no rows.
pub fn hourly_trend(state: &VoteState, window_hours: u32, now: DateTime<Utc>) -> Vec<TrendRow> {
    let window_hours = window_hours.min(MAX_TREND_HOURS);
    if window_hours == 0 {
        return Vec::new();
    }

    let current = truncate_to_hour(now);
    let Some(start) = TimeDelta::try_hours(i64::from(window_hours) - 1)
        .and_then(|span| current.checked_sub_signed(span))
    else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<DateTime<Utc>, u64> = (0..window_hours)
        .map(|i| (start + TimeDelta::hours(i64::from(i)), 0))
        .collect();

    for event in &state.events {
        let hour = truncate_to_hour(event.created_at);
        if let Some(count) = buckets.get_mut(&hour) {
            *count += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(hour, count)| TrendRow { hour, count })
        .collect()
}

pub fn summary(state: &VoteState, registry: &OptionRegistry) -> Summary {
    let total_votes = total_count(state);
    let unique_voters = state
        .events
        .iter()
        .map(|e| e.voter_address.as_str())
        .collect::<BTreeSet<_>>()
        .len() as u64;
    let leading_option = if total_votes > 0 {
        results(state, registry).into_iter().next().map(|r| r.option)
    } else {
        None
    };

    Summary {
        total_votes,
        unique_sessions: state.sessions.len() as u64,
        unique_voters,
        first_vote_at: state.events.iter().map(|e| e.created_at).min(),
        last_vote_at: state.events.iter().map(|e| e.created_at).max(),
        leading_option,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VoteOption;
    use crate::events::VoteCast;
    use crate::transitions::apply_vote;
    use chrono::TimeZone;

    fn ab_registry() -> OptionRegistry {
        OptionRegistry::new(vec![
            VoteOption::new("a", "A", "", ""),
            VoteOption::new("b", "B", "", ""),
        ])
        .unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, hour, minute, 0).unwrap()
    }

    fn vote_all(state: &mut VoteState, votes: &[(&str, &str, DateTime<Utc>)]) {
        for (opt, sid, ts) in votes {
            let seq = state.last_sequence + 1;
            apply_vote(state, &VoteCast::new(seq, opt, "ip", "ua", sid, *ts));
        }
    }

    #[test]
    fn results_scenario_two_to_one() {
        let reg = ab_registry();
        let mut state = VoteState::new(&reg);
        vote_all(
            &mut state,
            &[("a", "s1", at(1, 0)), ("a", "s2", at(1, 1)), ("b", "s3", at(1, 2))],
        );

        let rows = results(&state, &reg);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].option.as_str(), rows[0].count, rows[0].percentage), ("a", 2, 67));
        assert_eq!((rows[1].option.as_str(), rows[1].count, rows[1].percentage), ("b", 1, 33));
        assert_eq!(total_count(&state), 3);
    }

    #[test]
    fn results_ties_follow_declaration_order() {
        let reg = OptionRegistry::default();
        let mut state = VoteState::new(&reg);
        vote_all(&mut state, &[("ramen", "s", at(1, 0)), ("chicken", "s", at(1, 1))]);

        let keys: Vec<String> = results(&state, &reg).into_iter().map(|r| r.option).collect();
        assert_eq!(keys, vec!["chicken", "ramen", "pizza", "burger"]);
    }

    #[test]
    fn results_include_zero_vote_options() {
        let reg = OptionRegistry::default();
        let state = VoteState::new(&reg);
        let rows = results(&state, &reg);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.count == 0 && r.percentage == 0));
    }

    #[test]
    fn recent_is_newest_first_and_bounded() {
        let reg = ab_registry();
        let mut state = VoteState::new(&reg);
        vote_all(
            &mut state,
            &[
                ("a", "s", at(1, 0)),
                ("b", "s", at(1, 1)),
                ("a", "s", at(1, 2)),
                ("b", "s", at(1, 3)),
                ("a", "s", at(1, 4)),
            ],
        );

        let two = recent(&state, 2);
        assert_eq!(two.iter().map(|e| e.id).collect::<Vec<_>>(), vec![5, 4]);
        assert_eq!(two[0].option_key, "a");
        assert_eq!(two[1].option_key, "b");
        assert!(recent(&state, 0).is_empty());
        assert_eq!(recent(&state, usize::MAX).len(), 5);
    }

    #[test]
    fn hourly_trend_is_dense_and_windowed() {
        let reg = ab_registry();
        let mut state = VoteState::new(&reg);
        vote_all(
            &mut state,
            &[
                ("a", "s", at(2, 10)), // outside a 3h window ending at 6:xx
                ("a", "s", at(4, 5)),
                ("b", "s", at(4, 55)),
                ("a", "s", at(6, 0)),
            ],
        );

        let rows = hourly_trend(&state, 3, at(6, 30));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], TrendRow { hour: at(4, 0), count: 2 });
        assert_eq!(rows[1], TrendRow { hour: at(5, 0), count: 0 });
        assert_eq!(rows[2], TrendRow { hour: at(6, 0), count: 1 });
        assert!(hourly_trend(&state, 0, at(6, 30)).is_empty());
    }

    #[test]
    fn hourly_trend_caps_oversized_windows() {
        let reg = ab_registry();
        let mut state = VoteState::new(&reg);
        vote_all(&mut state, &[("a", "s", at(6, 0))]);

        let rows = hourly_trend(&state, u32::MAX, at(6, 30));
        assert_eq!(rows.len(), MAX_TREND_HOURS as usize);
        assert_eq!(rows.last(), Some(&TrendRow { hour: at(6, 0), count: 1 }));
    }

    #[test]
    fn hourly_trend_near_the_earliest_time_is_empty() {
        let state = VoteState::new(&ab_registry());
        assert!(hourly_trend(&state, MAX_TREND_HOURS, DateTime::<Utc>::MIN_UTC).is_empty());
    }

    #[test]
    fn summary_of_empty_state() {
        let reg = ab_registry();
        let s = summary(&VoteState::new(&reg), &reg);
        assert_eq!(s.total_votes, 0);
        assert_eq!(s.unique_sessions, 0);
        assert_eq!(s.first_vote_at, None);
        assert_eq!(s.leading_option, None);
    }

    #[test]
    fn summary_counts_sessions_and_first_vote() {
        let reg = ab_registry();
        let mut state = VoteState::new(&reg);
        vote_all(
            &mut state,
            &[("b", "s1", at(3, 0)), ("a", "s2", at(3, 5)), ("b", "s1", at(3, 9))],
        );

        let s = summary(&state, &reg);
        assert_eq!(s.total_votes, 3);
        assert_eq!(s.unique_sessions, 2);
        assert_eq!(s.unique_voters, 1);
        assert_eq!(s.first_vote_at, Some(at(3, 0)));
        assert_eq!(s.last_vote_at, Some(at(3, 9)));
        assert_eq!(s.leading_option.as_deref(), Some("b"));
    }
}
