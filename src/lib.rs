//! # dirsync - One-way directory synchronization
//!
//! Brings a destination directory tree in line with a source tree. In
//! mirror mode the destination ends up an exact copy of the source; in merge
//! mode entries found only in the destination are left alone.
//!
//! Files are compared by size and modification time. Every decision and
//! every failure is appended to `directory_sync.log` in the working
//! directory.

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod filesystem;
pub mod logging;
pub mod reconcile;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use reconcile::{reconcile, Reconciler, SyncReport};
pub use types::{Decision, DirEntry, SyncError, SyncMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
