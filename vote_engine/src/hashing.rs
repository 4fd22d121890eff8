//! VoteEngine v1: Canonical Hashing
//!
//! Deterministic canonical serialization + SHA-256 hashing.
//!
//! Rules:
//!   - Events in sequence order
//!   - Sessions and tallies sorted by key (UTF-8 byte order)
//!   - Timestamps as RFC 3339 UTC with millisecond precision
//!   - UTF-8 JSON, no whitespace

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::state::VoteState;
use crate::KERNEL_VERSION;

/// Canonical serialization of VoteState to UTF-8 JSON bytes.
pub fn canonical_serialize(state: &VoteState) -> Vec<u8> {
    // A Value tree of strings and integers always serializes.
    serde_json::to_vec(&build_canonical_value(state)).unwrap_or_default()
}

/// SHA-256 of canonical serialization. Lowercase hex string.
pub fn canonical_hash(state: &VoteState) -> String {
    let digest = Sha256::digest(canonical_serialize(state));
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn ts(t: &DateTime<Utc>) -> Value {
    Value::String(t.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Field order: kernel_version, last_sequence, tallies, events, sessions
fn build_canonical_value(state: &VoteState) -> Value {
    let mut tallies = Map::new();
    for (key, count) in &state.tallies {
        tallies.insert(key.clone(), Value::from(*count));
    }

    let events: Vec<Value> = state
        .events
        .iter()
        .map(|e| {
            let mut m = Map::new();
            m.insert("id".to_string(), Value::from(e.id));
            m.insert("option_key".to_string(), Value::String(e.option_key.clone()));
            m.insert("voter_address".to_string(), Value::String(e.voter_address.clone()));
            m.insert("user_agent".to_string(), Value::String(e.user_agent.clone()));
            m.insert("session_id".to_string(), Value::String(e.session_id.clone()));
            m.insert("created_at".to_string(), ts(&e.created_at));
            Value::Object(m)
        })
        .collect();

    let sessions: Vec<Value> = state
        .sessions
        .values()
        .map(|s| {
            let mut m = Map::new();
            m.insert("session_id".to_string(), Value::String(s.session_id.clone()));
            m.insert("voter_address".to_string(), Value::String(s.voter_address.clone()));
            m.insert("last_vote_at".to_string(), ts(&s.last_vote_at));
            m.insert("vote_count".to_string(), Value::from(s.vote_count));
            Value::Object(m)
        })
        .collect();

    let mut root = Map::new();
    root.insert("kernel_version".to_string(), Value::from(KERNEL_VERSION));
    root.insert("last_sequence".to_string(), Value::from(state.last_sequence));
    root.insert("tallies".to_string(), Value::Object(tallies));
    root.insert("events".to_string(), Value::Array(events));
    root.insert("sessions".to_string(), Value::Array(sessions));
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VoteCast;
    use crate::registry::OptionRegistry;
    use crate::transitions::apply_vote;
    use chrono::TimeZone;

    #[test]
    fn hash_is_lowercase_hex_sha256() {
        let reg = OptionRegistry::default();
        let h = canonical_hash(&VoteState::new(&reg));
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn hash_changes_with_votes() {
        let reg = OptionRegistry::default();
        let mut state = VoteState::new(&reg);
        let empty = canonical_hash(&state);
        let at = Utc.with_ymd_and_hms(2026, 2, 2, 2, 2, 2).unwrap();
        apply_vote(&mut state, &VoteCast::new(1, "pizza", "ip", "ua", "s", at));
        assert_ne!(canonical_hash(&state), empty);
    }

    #[test]
    fn serialization_starts_with_kernel_version() {
        let reg = OptionRegistry::default();
        let json = String::from_utf8(canonical_serialize(&VoteState::new(&reg))).unwrap();
        assert!(json.starts_with("{\"kernel_version\":1,"));
    }
}
