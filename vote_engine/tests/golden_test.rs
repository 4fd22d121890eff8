/// Golden determinism test: replays the frozen vote stream
/// and asserts the canonical hash matches the permanent v1 value.
///
/// This test must NEVER be modified to match new behavior.
/// If it fails, the kernel has been broken.

use std::fs;

use vote_engine::hashing::canonical_hash;
use vote_engine::invariants::try_validate_invariants;
use vote_engine::{OptionRegistry, VoteCast, VoteEngine, KERNEL_VERSION};

fn load_votes(path: &str) -> Vec<VoteCast> {
    let data = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    serde_json::from_str(&data).expect("Failed to parse votes JSON")
}

fn load_expected_hash(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
        .trim()
        .to_string()
}

fn replay(votes: &[VoteCast]) -> VoteEngine {
    let mut engine = VoteEngine::new(OptionRegistry::default());
    for vote in votes {
        engine.apply(vote).expect("golden vote rejected");
    }
    engine
}

#[test]
fn golden_replay_hash_matches() {
    let votes = load_votes("tests/golden/votes.json");
    let engine = replay(&votes);
    let hash = canonical_hash(engine.state());

    let expected = load_expected_hash("tests/golden/expected_hash.txt");
    assert_eq!(
        hash, expected,
        "GOLDEN TEST FAILED: Kernel v1 replay produced a different hash.\n\
         Got:      {}\n\
         Expected: {}",
        hash, expected
    );
}

#[test]
fn golden_replay_is_deterministic() {
    let votes = load_votes("tests/golden/votes.json");
    let h1 = canonical_hash(replay(&votes).state());
    let h2 = canonical_hash(replay(&votes).state());
    assert_eq!(h1, h2, "DETERMINISM FAILURE: {} != {}", h1, h2);
}

#[test]
fn golden_replay_aggregates() {
    let votes = load_votes("tests/golden/votes.json");
    let engine = replay(&votes);
    try_validate_invariants(engine.state(), engine.registry()).expect("golden state inconsistent");

    let rows: Vec<(String, u64, u32)> = engine
        .results()
        .into_iter()
        .map(|r| (r.option, r.count, r.percentage))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("pizza".to_string(), 5, 42),
            ("chicken".to_string(), 3, 25),
            ("burger".to_string(), 2, 17),
            ("ramen".to_string(), 2, 17),
        ]
    );

    let summary = engine.summary();
    assert_eq!(summary.total_votes, 12);
    assert_eq!(summary.unique_sessions, 7);
    assert_eq!(summary.leading_option.as_deref(), Some("pizza"));
    assert_eq!(engine.session("s-01").map(|s| s.vote_count), Some(3));
}

#[test]
fn kernel_version_is_one() {
    assert_eq!(KERNEL_VERSION, 1, "KERNEL_VERSION must be 1 and never change");
}
