//! Tests for atomic file copy operations

use dirsync::filesystem::copy_file_atomic;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn create_test_file(path: &Path, content: &[u8]) {
    let mut file = fs::File::create(path).expect("Failed to create test file");
    file.write_all(content).expect("Failed to write test content");
    file.flush().expect("Failed to flush");
}

fn set_file_mtime(path: &Path, mtime: SystemTime) {
    let filetime_mtime = filetime::FileTime::from_system_time(mtime);
    filetime::set_file_mtime(path, filetime_mtime).expect("Failed to set mtime");
}

fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| {
            e.expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

#[test]
fn test_copy_basic_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    let content = b"Hello, dirsync! This is a test file.";
    create_test_file(&src_path, content);

    let dest_path = root.join("dest.txt");
    let bytes_copied =
        copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    assert_eq!(bytes_copied, content.len() as u64);
    assert_eq!(fs::read(&dest_path).expect("Failed to read dest file"), content);
}

#[test]
fn test_copy_overwrites_existing_destination() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"new");
    let dest_path = root.join("dest.txt");
    create_test_file(&dest_path, b"much older and longer content");

    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    assert_eq!(fs::read(&dest_path).expect("Failed to read dest file"), b"new");
}

#[test]
fn test_copy_preserves_mtime_exactly() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");
    set_file_mtime(&src_path, SystemTime::now() - Duration::from_secs(3600));

    let dest_path = root.join("dest.txt");
    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    let src_mtime = fs::metadata(&src_path)
        .and_then(|m| m.modified())
        .expect("Failed to get src mtime");
    let dest_mtime = fs::metadata(&dest_path)
        .and_then(|m| m.modified())
        .expect("Failed to get dest mtime");

    // Equal mtimes are what make a second run a no-op.
    assert_eq!(src_mtime, dest_mtime);
}

#[test]
fn test_copy_leaves_only_destination_behind() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");

    let dest_path = root.join("dest.txt");
    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    assert_eq!(
        list_names(root),
        vec!["dest.txt".to_string(), "source.txt".to_string()],
        "temp file should be renamed away after successful copy"
    );
}

#[test]
fn test_copy_does_not_clobber_similarly_named_siblings() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");
    create_test_file(&root.join("dest.txt.part"), b"user file");
    create_test_file(&root.join("dest.txt.tmp"), b"another user file");

    copy_file_atomic(&src_path, &root.join("dest.txt")).expect("copy_file_atomic should succeed");

    assert_eq!(fs::read(root.join("dest.txt.part")).expect("read sibling"), b"user file");
    assert_eq!(
        fs::read(root.join("dest.txt.tmp")).expect("read sibling"),
        b"another user file"
    );
}

#[test]
fn test_copy_missing_source_leaves_destination_untouched() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let dest_path = root.join("dest.txt");
    create_test_file(&dest_path, b"keep me");

    let result = copy_file_atomic(&root.join("missing.txt"), &dest_path);

    assert!(result.is_err());
    assert_eq!(fs::read(&dest_path).expect("Failed to read dest file"), b"keep me");
    assert_eq!(list_names(root), vec!["dest.txt".to_string()]);
}

#[test]
fn test_copy_large_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("large.bin");
    let size = 1024 * 1024 + 17;
    let content: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
    create_test_file(&src_path, &content);

    let dest_path = root.join("large_copy.bin");
    let bytes_copied =
        copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should handle large files");

    assert_eq!(bytes_copied, size as u64);
    assert_eq!(fs::read(&dest_path).expect("Failed to read dest file"), content);
}

#[cfg(unix)]
#[test]
fn test_copy_preserves_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");
    fs::set_permissions(&src_path, fs::Permissions::from_mode(0o640))
        .expect("Failed to set permissions");

    let dest_path = root.join("dest.txt");
    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    let dest_mode = fs::metadata(&dest_path)
        .expect("Failed to get dest metadata")
        .permissions()
        .mode();
    assert_eq!(dest_mode & 0o777, 0o640, "Permissions should be preserved");
}
