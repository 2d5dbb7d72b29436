//! Filesystem access used by the reconciler
//!
//! The reconciler only touches the disk through [`FileSystem`], which keeps
//! the traversal logic independent of `std::fs` and lets tests inject
//! failures on individual entries.

pub mod copy;

use crate::types::DirEntry;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

pub use copy::copy_file_atomic;

/// Primitive operations the reconciler needs.
///
/// All methods operate on absolute or caller-relative paths and never follow
/// symbolic links at the final path component.
pub trait FileSystem {
    /// Names of the entries directly inside `dir`.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<OsString>>;

    /// Metadata of `path` without following a final symlink.
    fn stat(&self, path: &Path) -> io::Result<DirEntry>;

    fn create_dir(&self, path: &Path) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy file bytes, permissions and modification time; returns bytes copied.
    fn copy_file(&self, src: &Path, dest: &Path) -> io::Result<u64>;

    /// Recreate the symlink at `src` as `dest` pointing to the same target.
    fn copy_symlink(&self, src: &Path, dest: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn stat(&self, path: &Path) -> io::Result<DirEntry> {
        let metadata = fs::symlink_metadata(path)?;
        let name = path.file_name().map(OsString::from).unwrap_or_default();
        let mtime = metadata.modified()?;
        let file_type = metadata.file_type();

        let entry = if file_type.is_symlink() {
            DirEntry::symlink(name, mtime, fs::read_link(path)?)
        } else if file_type.is_dir() {
            DirEntry::dir(name, mtime)
        } else {
            DirEntry::file(name, metadata.len(), mtime)
        };
        Ok(entry)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> io::Result<u64> {
        copy_file_atomic(src, dest)
    }

    fn copy_symlink(&self, src: &Path, dest: &Path) -> io::Result<()> {
        let target = fs::read_link(src)?;
        create_symlink(&target, dest)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link_path: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link_path)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link_path: &Path) -> io::Result<()> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    match symlink_file(target, link_path) {
        Ok(()) => Ok(()),
        Err(file_err) => match symlink_dir(target, link_path) {
            Ok(()) => Ok(()),
            Err(_) => Err(file_err),
        },
    }
}
