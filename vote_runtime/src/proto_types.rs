//! Hand-written protobuf types for the vote log.
//!
//! Uses prost derive macros for encode/decode without prost-build.
//! Field numbers are part of the on-disk format; never renumber.

use prost::Message;

// ── Vote Record ────────────────────────────────────────────────

#[derive(Clone, PartialEq, Message)]
pub struct ProtoVoteCast {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(uint32, tag = "2")]
    pub schema_version: u32,
    #[prost(string, tag = "3")]
    pub option_key: String,
    #[prost(string, tag = "4")]
    pub voter_address: String,
    #[prost(string, tag = "5")]
    pub user_agent: String,
    #[prost(string, tag = "6")]
    pub session_id: String,
    /// Unix epoch milliseconds, UTC.
    #[prost(int64, tag = "7")]
    pub created_at_ms: i64,
}
