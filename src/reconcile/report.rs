//! Run statistics and per-entry error records

use crate::types::{SyncError, SyncMode};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Counters aggregated across the whole walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub files_copied: usize,
    pub dirs_copied: usize,
    pub files_deleted: usize,
    pub dirs_deleted: usize,
    pub files_replaced: usize,
    pub dirs_replaced: usize,
    pub skipped: usize,
    /// Destination-only entries left alone in merge mode
    pub kept: usize,
    pub dirs_traversed: usize,
    /// Bytes written by COPY and REPLACE of regular files
    pub bytes_copied: u64,
}

impl SyncStats {
    pub fn copied(&self) -> usize {
        self.files_copied + self.dirs_copied
    }

    pub fn deleted(&self) -> usize {
        self.files_deleted + self.dirs_deleted
    }

    pub fn replaced(&self) -> usize {
        self.files_replaced + self.dirs_replaced
    }

    /// Total COPY + DELETE + REPLACE operations
    pub fn changes(&self) -> usize {
        self.copied() + self.deleted() + self.replaced()
    }
}

/// Which operation an entry failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Stat,
    Copy,
    Delete,
    Replace,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::List => "list",
            Operation::Stat => "stat",
            Operation::Copy => "copy",
            Operation::Delete => "delete",
            Operation::Replace => "replace",
        };
        f.write_str(label)
    }
}

/// A recoverable failure on a single entry
#[derive(Debug)]
pub struct EntryError {
    /// Absolute path of the offending entry
    pub path: PathBuf,
    pub operation: Operation,
    pub error: SyncError,
}

/// Outcome of one reconciliation run
#[derive(Debug)]
pub struct SyncReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: SyncMode,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
    pub stats: SyncStats,
    pub errors: Vec<EntryError>,
}

impl SyncReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
