//! Proto ↔ Kernel conversion bridge.
//!
//! Timestamps travel as Unix milliseconds, so anything finer than a
//! millisecond is dropped on the way to disk. The store stamps votes
//! at millisecond precision for that reason.

use std::io;

use chrono::{DateTime, Utc};
use vote_engine::VoteCast;

use crate::proto_types::ProtoVoteCast;

/// Convert a persisted record back into a kernel vote.
pub fn proto_to_kernel(proto: &ProtoVoteCast) -> io::Result<VoteCast> {
    let created_at = DateTime::<Utc>::from_timestamp_millis(proto.created_at_ms).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Vote {} has out-of-range timestamp {}",
                proto.sequence, proto.created_at_ms
            ),
        )
    })?;

    Ok(VoteCast {
        sequence: proto.sequence,
        schema_version: proto.schema_version,
        option_key: proto.option_key.clone(),
        voter_address: proto.voter_address.clone(),
        user_agent: proto.user_agent.clone(),
        session_id: proto.session_id.clone(),
        created_at,
    })
}

/// Convert a kernel vote to its persisted record.
pub fn kernel_to_proto(cast: &VoteCast) -> ProtoVoteCast {
    ProtoVoteCast {
        sequence: cast.sequence,
        schema_version: cast.schema_version,
        option_key: cast.option_key.clone(),
        voter_address: cast.voter_address.clone(),
        user_agent: cast.user_agent.clone(),
        session_id: cast.session_id.clone(),
        created_at_ms: cast.created_at.timestamp_millis(),
    }
}
