//! Append-only vote log: binary protobuf frames on disk.
//!
//! Storage format: length-prefixed protobuf frames.
//!   [4-byte LE length][protobuf bytes][4-byte LE length][protobuf bytes]...
//!
//! Rules:
//!   - Strict append only; the only other write is a full clear
//!   - fsync after every write
//!   - Sequence strictly increasing (validated on append)
//!   - A failed append is rolled back to the previous file length;
//!     if that rollback fails the ledger refuses appends until cleared
//!   - Clear writes an empty file beside the log and renames it over

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use prost::Message;
use tracing::{debug, warn};
use vote_engine::VoteCast;

use crate::ledger::Ledger;
use crate::proto_bridge::{kernel_to_proto, proto_to_kernel};
use crate::proto_types::ProtoVoteCast;

/// Largest frame accepted on load.
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Append-only vote log backed by a binary file.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    last_sequence: u64,
    /// Set when a torn frame could not be rolled back.
    poisoned: bool,
}

impl FileLedger {
    /// Open or create a vote log at the given path.
    /// Reads existing frames to determine the last sequence number.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let last_sequence = if path.exists() {
            let frames = Self::read_all_from_file(path)?;
            frames.last().map(|f| f.sequence).unwrap_or(0)
        } else {
            0
        };

        debug!(path = %path.display(), last_sequence, "opened vote log");
        Ok(Self {
            path: path.to_path_buf(),
            last_sequence,
            poisoned: false,
        })
    }

    /// Get the last sequence number in the log.
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    fn scratch_path(&self) -> PathBuf {
        self.path.with_extension("log.tmp")
    }

    /// Cut a torn frame off the end of the log. On failure the log
    /// holds bytes we did not mean to keep, so appends stop.
    fn roll_back(&mut self, file: &File, prev_len: u64) -> io::Result<()> {
        let result = file.set_len(prev_len).and_then(|()| file.sync_all());
        if let Err(e) = &result {
            warn!(path = %self.path.display(), error = %e, "rollback failed, vote log poisoned");
            self.poisoned = true;
        }
        result
    }

    fn write_frame(file: &mut File, buf: &[u8]) -> io::Result<()> {
        let len = u32::try_from(buf.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "frame exceeds u32 length")
        })?;
        {
            let mut writer = BufWriter::new(&mut *file);
            writer.write_all(&len.to_le_bytes())?;
            writer.write_all(buf)?;
            writer.flush()?;
        }
        file.sync_all()
    }

    /// Read all frames from a file, validating frame integrity.
    fn read_all_from_file(path: &Path) -> io::Result<Vec<ProtoVoteCast>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut frames = Vec::new();
        let mut len_buf = [0u8; 4];

        loop {
            match reader.read_exact(&mut len_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }

            let len = u32::from_le_bytes(len_buf) as usize;
            if len == 0 || len > MAX_FRAME_LEN {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid frame length: {}", len),
                ));
            }

            let mut frame = vec![0u8; len];
            reader.read_exact(&mut frame).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Truncated frame at offset: {}", e),
                )
            })?;

            let record = ProtoVoteCast::decode(frame.as_slice()).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Protobuf decode error: {}", e),
                )
            })?;

            frames.push(record);
        }

        Ok(frames)
    }
}

impl Ledger for FileLedger {
    /// Validates strict sequence ordering, writes one frame and fsyncs.
    fn append(&mut self, cast: &VoteCast) -> io::Result<()> {
        if self.poisoned {
            return Err(io::Error::other(
                "vote log holds a torn frame; clear it before appending",
            ));
        }

        let expected = self.last_sequence + 1;
        if cast.sequence != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Sequence violation in vote log: expected {}, got {}",
                    expected, cast.sequence
                ),
            ));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let prev_len = file.metadata()?.len();

        let buf = kernel_to_proto(cast).encode_to_vec();
        if let Err(e) = Self::write_frame(&mut file, &buf) {
            warn!(path = %self.path.display(), error = %e, "append failed, rolling back");
            self.roll_back(&file, prev_len)?;
            return Err(e);
        }

        self.last_sequence = cast.sequence;
        Ok(())
    }

    fn load_all(&self) -> io::Result<Vec<VoteCast>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        Self::read_all_from_file(&self.path)?
            .iter()
            .map(proto_to_kernel)
            .collect()
    }

    /// Replaces the log with an empty file. The rename is the commit
    /// point: any earlier failure leaves the old log in place.
    fn clear(&mut self) -> io::Result<()> {
        let scratch = self.scratch_path();
        let file = File::create(&scratch)?;
        if let Err(e) = file.sync_all() {
            fs::remove_file(&scratch).ok();
            return Err(e);
        }
        drop(file);
        if let Err(e) = fs::rename(&scratch, &self.path) {
            fs::remove_file(&scratch).ok();
            return Err(e);
        }

        self.last_sequence = 0;
        self.poisoned = false;

        // The new log is already in place; a failed directory sync only
        // weakens durability of the rename.
        if let Some(parent) = self.path.parent() {
            if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
                warn!(path = %self.path.display(), error = %e, "could not sync log directory");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn temp_log(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("vote_event_store_tests").join(name);
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).expect("create temp dir");
        dir.join("votes.log")
    }

    fn cast(seq: u64) -> VoteCast {
        let at = Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap();
        VoteCast::new(seq, "pizza", "ip", "ua", "s", at)
    }

    #[test]
    fn failed_rollback_poisons_until_clear() {
        let path = temp_log("poisoned");
        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.append(&cast(1)).unwrap();

        // set_len on a read-only handle always fails
        let read_only = File::open(&path).unwrap();
        assert!(ledger.roll_back(&read_only, 0).is_err());

        assert!(ledger.append(&cast(2)).is_err());
        assert_eq!(ledger.load_all().unwrap().len(), 1);

        ledger.clear().unwrap();
        ledger.append(&cast(1)).unwrap();
        assert_eq!(ledger.load_all().unwrap().len(), 1);
    }

    #[test]
    fn successful_rollback_keeps_ledger_usable() {
        let path = temp_log("rolled_back");
        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.append(&cast(1)).unwrap();
        let prev_len = fs::metadata(&path).unwrap().len();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        FileLedger::write_frame(&mut file, &[1, 2, 3]).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > prev_len);
        ledger.roll_back(&file, prev_len).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), prev_len);
        ledger.append(&cast(2)).unwrap();
        assert_eq!(ledger.load_all().unwrap().len(), 2);
    }

    #[test]
    fn failed_clear_keeps_every_vote() {
        let path = temp_log("failed_clear");
        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.append(&cast(1)).unwrap();
        ledger.append(&cast(2)).unwrap();

        // a directory in the scratch file's place makes the clear fail early
        fs::create_dir_all(ledger.scratch_path()).unwrap();
        assert!(ledger.clear().is_err());

        assert_eq!(ledger.last_sequence(), 2);
        assert_eq!(ledger.load_all().unwrap().len(), 2);
        ledger.append(&cast(3)).unwrap();

        fs::remove_dir_all(ledger.scratch_path()).unwrap();
        ledger.clear().unwrap();
        assert_eq!(ledger.last_sequence(), 0);
        assert!(ledger.load_all().unwrap().is_empty());
        assert!(!ledger.scratch_path().exists());
    }
}
