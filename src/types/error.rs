//! Error types for dirsync

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for dirsync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific path
    #[error("IO error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Invalid configuration; always fatal
    #[error("Configuration error: {0}")]
    Config(String),

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Destination filesystem ran out of space
    #[error("Disk full while writing {path}")]
    DiskFull { path: PathBuf },
}

impl SyncError {
    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        match self {
            SyncError::PermissionDenied { .. } => true,
            SyncError::Io(e) | SyncError::IoAt { source: e, .. } => {
                e.kind() == ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }

    /// Check if this error is related to disk space
    pub fn is_disk_space_error(&self) -> bool {
        matches!(self, SyncError::DiskFull { .. })
    }
}

/// Attach `path` to an io error, classifying permission and disk-space failures.
pub fn map_io_error(path: &Path, error: IoError) -> SyncError {
    if matches!(error.kind(), ErrorKind::PermissionDenied) {
        SyncError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else if matches!(error.kind(), ErrorKind::StorageFull)
        || matches!(error.raw_os_error(), Some(28 | 122))
    {
        SyncError::DiskFull {
            path: path.to_path_buf(),
        }
    } else {
        SyncError::IoAt {
            path: path.to_path_buf(),
            source: error,
        }
    }
}
