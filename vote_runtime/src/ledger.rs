//! Storage seam for the vote log.
//!
//! A ledger is durable, append-only and all-or-nothing per call: when
//! `append` or `clear` returns an error, the ledger's contents are
//! exactly what they were before the call.

use std::io;

use vote_engine::VoteCast;

pub trait Ledger: Send + Sync {
    /// Durably append one vote.
    fn append(&mut self, cast: &VoteCast) -> io::Result<()>;

    /// All votes in append order.
    fn load_all(&self) -> io::Result<Vec<VoteCast>>;

    /// Remove every vote.
    fn clear(&mut self) -> io::Result<()>;
}

/// Volatile ledger for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    casts: Vec<VoteCast>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ledger for MemoryLedger {
    fn append(&mut self, cast: &VoteCast) -> io::Result<()> {
        self.casts.push(cast.clone());
        Ok(())
    }

    fn load_all(&self) -> io::Result<Vec<VoteCast>> {
        Ok(self.casts.clone())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.casts.clear();
        Ok(())
    }
}

impl<L: Ledger + ?Sized> Ledger for Box<L> {
    fn append(&mut self, cast: &VoteCast) -> io::Result<()> {
        (**self).append(cast)
    }

    fn load_all(&self) -> io::Result<Vec<VoteCast>> {
        (**self).load_all()
    }

    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }
}
