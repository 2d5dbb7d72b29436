//! Core type definitions for dirsync

mod action;
mod entry;
mod error;

pub use action::{Decision, ReplaceReason, SkipReason, SyncMode};
pub use entry::{DirEntry, EntryKind};
pub use error::{map_io_error, SyncError};
