//! DirEntry - A single named entry in a directory listing

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// What kind of filesystem object an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Never followed; compared and copied as a link
    Symlink,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::File => "file",
            EntryKind::Dir => "directory",
            EntryKind::Symlink => "symlink",
        };
        f.write_str(label)
    }
}

/// Represents one entry of a directory, read fresh on every traversal
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    /// File name within its parent directory
    pub name: OsString,

    pub kind: EntryKind,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Last modification time
    pub mtime: SystemTime,

    /// Link target, for symlinks only
    pub symlink_target: Option<PathBuf>,
}

impl DirEntry {
    /// Create a regular file entry
    pub fn file(name: impl Into<OsString>, size: u64, mtime: SystemTime) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size,
            mtime,
            symlink_target: None,
        }
    }

    /// Create a directory entry
    pub fn dir(name: impl Into<OsString>, mtime: SystemTime) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
            size: 0,
            mtime,
            symlink_target: None,
        }
    }

    /// Create a symlink entry
    pub fn symlink(name: impl Into<OsString>, mtime: SystemTime, target: PathBuf) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Symlink,
            size: 0,
            mtime,
            symlink_target: Some(target),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}
