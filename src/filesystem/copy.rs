//! Atomic file copy implementation

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

const COPY_BUFFER_SIZE: usize = 128 * 1024;
const TEMP_PREFIX: &str = ".dirsync-";
const TEMP_SUFFIX: &str = ".tmp";

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Write to a uniquely named hidden temp file next to `dest`
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename over the final destination
///
/// The temp file is created exclusively, so it never replaces an existing
/// entry, and it is removed if any step fails. Nothing in the destination
/// directory other than `dest` itself is ever touched.
///
/// # Returns
/// Number of bytes copied
///
/// # Example
/// ```no_run
/// use dirsync::filesystem::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> io::Result<u64> {
    let mut src_file = File::open(src)?;
    let src_metadata = src_file.metadata()?;

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;

    // Dropping `temp` on any early return deletes it.
    let total_bytes = write_contents(&mut src_file, &mut temp)?;

    fs::set_permissions(temp.path(), src_metadata.permissions())?;
    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_mtime(temp.path(), mtime)?;

    temp.persist(dest).map_err(|e| e.error)?;
    Ok(total_bytes)
}

fn write_contents(src_file: &mut File, temp: &mut NamedTempFile) -> io::Result<u64> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        temp.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    temp.as_file().sync_all()?;
    Ok(total_bytes)
}
