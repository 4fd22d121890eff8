//! VoteEngine v1: Arithmetic Primitives
//!
//! Counters are u64. Percentages are integer-rounded.
//! No float. No f64. No f32.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::error::EngineError;

/// Longest accepted option key.
pub const MAX_OPTION_KEY_LEN: usize = 32;

/// Increment a counter by one. Fails instead of wrapping.
pub fn checked_inc(value: u64) -> Result<u64, EngineError> {
    value.checked_add(1).ok_or(EngineError::CounterOverflow(value))
}

/// `round(count / total * 100)`, half-up, integer only.
///
/// Returns 0 when `total` is 0. Each row is rounded on its own, so a
/// set of percentages need not add up to exactly 100.
pub fn percentage(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    // (count * 100 + total / 2) / total, kept exact for odd totals
    let numerator = (count as u128) * 200 + total as u128;
    let denominator = (total as u128) * 2;
    (numerator / denominator) as u32
}

/// Truncate a timestamp to the start of its containing UTC hour.
pub fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::hours(1)).unwrap_or(ts)
}

/// Validate that an option key matches `[a-z0-9_-]{1,32}`.
pub fn validate_option_key(key: &str) -> Result<(), String> {
    if key.is_empty() || key.len() > MAX_OPTION_KEY_LEN {
        return Err(format!(
            "Invalid option key {:?}: length must be 1..={}",
            key, MAX_OPTION_KEY_LEN
        ));
    }
    for ch in key.chars() {
        if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '_' && ch != '-' {
            return Err(format!(
                "Invalid option key {:?}: must match [a-z0-9_-]+",
                key
            ));
        }
    }
    Ok(())
}
