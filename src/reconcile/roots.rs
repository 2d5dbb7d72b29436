//! Source/destination root resolution and overlap checks

use crate::types::SyncError;
use std::ffi::OsString;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Absolute, symlink-free source and destination roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Resolve both roots and reject configurations that would race reads
/// against writes.
///
/// The source must exist. The destination may not exist yet; it is resolved
/// through its closest existing ancestor. Identical roots, and roots nested
/// inside one another, are configuration errors.
pub fn resolve_roots(source: &Path, destination: &Path) -> Result<Roots, SyncError> {
    let source = source.canonicalize().map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            SyncError::Config(format!("Source path does not exist: {}", source.display()))
        }
        _ => SyncError::Config(format!(
            "Cannot access source path {}: {}",
            source.display(),
            e
        )),
    })?;

    let destination = resolve_lenient(destination).map_err(|e| {
        SyncError::Config(format!(
            "Cannot resolve destination path {}: {}",
            destination.display(),
            e
        ))
    })?;

    if source == destination {
        return Err(SyncError::Config(format!(
            "Source and destination are the same directory: {}",
            source.display()
        )));
    }
    if destination.starts_with(&source) {
        return Err(SyncError::Config(format!(
            "Destination {} is inside source {}",
            destination.display(),
            source.display()
        )));
    }
    if source.starts_with(&destination) {
        return Err(SyncError::Config(format!(
            "Source {} is inside destination {}",
            source.display(),
            destination.display()
        )));
    }

    Ok(Roots {
        source,
        destination,
    })
}

/// Canonicalize the longest existing prefix of `path` and re-append the rest.
fn resolve_lenient(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing: Vec<OsString> = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(mut resolved) => {
                for component in missing.iter().rev() {
                    resolved.push(component);
                }
                return Ok(resolved);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name.to_os_string());
                        existing = parent;
                    }
                    _ => return Ok(absolute),
                }
            }
            Err(e) => return Err(e),
        }
    }
}
