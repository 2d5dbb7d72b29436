//! Reconciler - brings a destination tree in line with a source tree
//!
//! The walk is depth-first over an explicit worklist of directory pairs, so
//! very deep trees never grow the call stack. Each pair is listed, planned
//! with [`plan_level`], and the plan is carried out entry by entry. A failure
//! on one entry is recorded and the walk moves on to its siblings; only
//! problems with the roots themselves abort the run.

mod report;
mod roots;

pub use report::{EntryError, Operation, SyncReport, SyncStats};
pub use roots::{resolve_roots, Roots};

use crate::diff::{plan_level, Listing, PlannedAction};
use crate::filesystem::{FileSystem, LocalFs};
use crate::types::{map_io_error, Decision, DirEntry, EntryKind, SyncError, SyncMode};
use chrono::Local;
use std::collections::HashSet;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Called with each source directory as the walk enters it.
pub type ProgressCallback<'a> = dyn Fn(&Path) + 'a;

/// Synchronize `destination` with `source` on the local disk.
///
/// Returns `Err` only for fatal problems (missing or unreadable source root,
/// uncreatable destination root, overlapping roots). Per-entry failures are
/// collected in [`SyncReport::errors`].
///
/// # Example
/// ```no_run
/// use dirsync::reconcile::reconcile;
/// use dirsync::types::SyncMode;
/// use std::path::Path;
///
/// let report = reconcile(Path::new("photos"), Path::new("/mnt/backup/photos"), SyncMode::Mirror)?;
/// println!("{} changes", report.stats.changes());
/// # Ok::<(), dirsync::types::SyncError>(())
/// ```
pub fn reconcile(
    source: &Path,
    destination: &Path,
    mode: SyncMode,
) -> Result<SyncReport, SyncError> {
    Reconciler::new(LocalFs, mode).run(source, destination)
}

/// Tree reconciler over any [`FileSystem`]
#[derive(Debug, Clone)]
pub struct Reconciler<F: FileSystem> {
    fs: F,
    mode: SyncMode,
}

#[derive(Debug)]
struct PendingDir {
    source: PathBuf,
    destination: PathBuf,
    /// Path relative to both roots, used in log lines
    relative: PathBuf,
    /// Destination was just created by this run and is known to be empty
    fresh: bool,
}

impl<F: FileSystem> Reconciler<F> {
    pub fn new(fs: F, mode: SyncMode) -> Self {
        Self { fs, mode }
    }

    pub fn run(&self, source: &Path, destination: &Path) -> Result<SyncReport, SyncError> {
        self.run_with_progress(source, destination, None)
    }

    /// Run the reconciliation, reporting each directory entered to `on_dir`.
    pub fn run_with_progress(
        &self,
        source: &Path,
        destination: &Path,
        on_dir: Option<&ProgressCallback<'_>>,
    ) -> Result<SyncReport, SyncError> {
        let started_at = Local::now();
        let clock = Instant::now();

        let roots = resolve_roots(source, destination)?;
        self.prepare_roots(&roots)?;

        info!(
            from = %roots.source.display(),
            to = %roots.destination.display(),
            mode = %self.mode,
            "directory sync started"
        );

        let mut walk = Walk {
            fs: &self.fs,
            mode: self.mode,
            stats: SyncStats::default(),
            errors: Vec::new(),
            pending: vec![PendingDir {
                source: roots.source.clone(),
                destination: roots.destination.clone(),
                relative: PathBuf::new(),
                fresh: false,
            }],
        };

        while let Some(dir) = walk.pending.pop() {
            if let Some(callback) = on_dir {
                callback(&dir.source);
            }
            walk.visit(dir);
        }

        let Walk { stats, errors, .. } = walk;
        info!(
            copied = stats.copied(),
            deleted = stats.deleted(),
            replaced = stats.replaced(),
            skipped = stats.skipped,
            kept = stats.kept,
            errors = errors.len(),
            "directory sync finished"
        );

        Ok(SyncReport {
            source: roots.source,
            destination: roots.destination,
            mode: self.mode,
            started_at,
            duration: clock.elapsed(),
            stats,
            errors,
        })
    }

    /// Fatal checks; nothing is mutated unless all of them pass.
    fn prepare_roots(&self, roots: &Roots) -> Result<(), SyncError> {
        let source_root = self.fs.stat(&roots.source).map_err(|e| {
            SyncError::Config(format!(
                "Cannot read source directory {}: {}",
                roots.source.display(),
                e
            ))
        })?;
        if !source_root.is_dir() {
            return Err(SyncError::Config(format!(
                "Source path is not a directory: {}",
                roots.source.display()
            )));
        }
        self.fs.read_dir(&roots.source).map_err(|e| {
            SyncError::Config(format!(
                "Cannot read source directory {}: {}",
                roots.source.display(),
                e
            ))
        })?;

        match self.fs.stat(&roots.destination) {
            Ok(entry) if entry.is_dir() => Ok(()),
            Ok(_) => Err(SyncError::Config(format!(
                "Destination path is not a directory: {}",
                roots.destination.display()
            ))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.fs.create_dir_all(&roots.destination).map_err(|e| {
                    SyncError::Config(format!(
                        "Cannot create destination directory {}: {}",
                        roots.destination.display(),
                        e
                    ))
                })?;
                info!(path = %roots.destination.display(), "created destination directory");
                Ok(())
            }
            Err(e) => Err(SyncError::Config(format!(
                "Cannot access destination directory {}: {}",
                roots.destination.display(),
                e
            ))),
        }
    }
}

/// Mutable state of a single run
struct Walk<'a, F: FileSystem> {
    fs: &'a F,
    mode: SyncMode,
    stats: SyncStats,
    errors: Vec<EntryError>,
    pending: Vec<PendingDir>,
}

impl<F: FileSystem> Walk<'_, F> {
    fn visit(&mut self, dir: PendingDir) {
        debug!(dir = %dir.source.display(), "traversing");
        self.stats.dirs_traversed += 1;

        let Some((mut source, source_failed)) = self.list(&dir.source) else {
            return;
        };
        let (mut destination, destination_failed) = if dir.fresh {
            (Listing::new(), HashSet::new())
        } else {
            match self.list(&dir.destination) {
                Some(listing) => listing,
                None => return,
            }
        };

        // A name that could not be stat'ed on either side is left alone on both.
        for name in source_failed.iter().chain(destination_failed.iter()) {
            source.remove(name);
            destination.remove(name);
        }

        let plan = plan_level(&source, &destination, self.mode);
        if plan.is_noop() {
            debug!(dir = %dir.relative.display(), subdirs = plan.stats.recurse_count, "level in sync");
        } else {
            debug!(
                dir = %dir.relative.display(),
                copy = plan.stats.copy_count,
                delete = plan.stats.delete_count,
                replace = plan.stats.replace_count,
                subdirs = plan.stats.recurse_count,
                "level planned"
            );
        }
        let mut subdirs = Vec::new();

        for action in &plan.actions {
            let src_path = dir.source.join(&action.name);
            let dest_path = dir.destination.join(&action.name);
            let relative = dir.relative.join(&action.name);

            match self.apply(action, &src_path, &dest_path) {
                Ok(descend) => {
                    log_decision(&relative, &action.decision);
                    if let Some(fresh) = descend {
                        subdirs.push(PendingDir {
                            source: src_path,
                            destination: dest_path,
                            relative,
                            fresh,
                        });
                    }
                }
                Err((operation, path, err)) => self.record_error(path, operation, err),
            }
        }

        // Reversed so the alphabetically first subdirectory is popped first.
        self.pending.extend(subdirs.into_iter().rev());
    }

    /// Read a directory into a listing. Names whose stat failed are returned
    /// separately; `None` means the directory itself could not be read.
    fn list(&mut self, dir: &Path) -> Option<(Listing, HashSet<OsString>)> {
        let names = match self.fs.read_dir(dir) {
            Ok(names) => names,
            Err(e) => {
                self.record_error(dir.to_path_buf(), Operation::List, map_io_error(dir, e));
                return None;
            }
        };

        let mut listing = Listing::new();
        let mut failed = HashSet::new();
        for name in names {
            let path = dir.join(&name);
            match self.fs.stat(&path) {
                Ok(mut entry) => {
                    entry.name = name.clone();
                    listing.insert(name, entry);
                }
                Err(e) => {
                    self.record_error(path.clone(), Operation::Stat, map_io_error(&path, e));
                    failed.insert(name);
                }
            }
        }
        Some((listing, failed))
    }

    /// Carry out one planned action.
    ///
    /// On success returns `Some(fresh)` when the walk must descend into this
    /// entry next, `None` otherwise.
    fn apply(
        &mut self,
        action: &PlannedAction,
        src_path: &Path,
        dest_path: &Path,
    ) -> Result<Option<bool>, (Operation, PathBuf, SyncError)> {
        match (&action.decision, &action.source, &action.destination) {
            (Decision::Copy, Some(src), _) => self
                .copy_entry(src, src_path, dest_path)
                .map_err(|(path, err)| (Operation::Copy, path, err)),
            (Decision::Delete, _, Some(dest)) => {
                self.remove_entry(dest, dest_path)
                    .map_err(|(path, err)| (Operation::Delete, path, err))?;
                Ok(None)
            }
            (Decision::Replace(_), Some(src), Some(dest)) => self
                .replace_entry(src, dest, src_path, dest_path)
                .map_err(|(path, err)| (Operation::Replace, path, err)),
            (Decision::Keep, _, _) => {
                self.stats.kept += 1;
                Ok(None)
            }
            (Decision::Skip(_), _, _) => {
                self.stats.skipped += 1;
                Ok(None)
            }
            (Decision::Recurse, _, _) => Ok(Some(false)),
            _ => Ok(None),
        }
    }

    fn copy_entry(
        &mut self,
        src: &DirEntry,
        src_path: &Path,
        dest_path: &Path,
    ) -> Result<Option<bool>, (PathBuf, SyncError)> {
        match src.kind {
            EntryKind::Dir => {
                self.fs
                    .create_dir(dest_path)
                    .map_err(|e| (dest_path.to_path_buf(), map_io_error(dest_path, e)))?;
                self.stats.dirs_copied += 1;
                Ok(Some(true))
            }
            EntryKind::File => {
                let bytes = self.copy_file(src_path, dest_path)?;
                self.stats.files_copied += 1;
                self.stats.bytes_copied += bytes;
                Ok(None)
            }
            EntryKind::Symlink => {
                self.fs
                    .copy_symlink(src_path, dest_path)
                    .map_err(|e| (src_path.to_path_buf(), map_io_error(src_path, e)))?;
                self.stats.files_copied += 1;
                Ok(None)
            }
        }
    }

    fn replace_entry(
        &mut self,
        src: &DirEntry,
        dest: &DirEntry,
        src_path: &Path,
        dest_path: &Path,
    ) -> Result<Option<bool>, (PathBuf, SyncError)> {
        if src.is_file() && dest.is_file() {
            // The atomic copy renames over the old file.
            let bytes = self.copy_file(src_path, dest_path)?;
            self.stats.files_replaced += 1;
            self.stats.bytes_copied += bytes;
            return Ok(None);
        }

        self.delete_path(dest, dest_path)?;
        let descend = match src.kind {
            EntryKind::Dir => {
                self.fs
                    .create_dir(dest_path)
                    .map_err(|e| (dest_path.to_path_buf(), map_io_error(dest_path, e)))?;
                self.stats.dirs_replaced += 1;
                Some(true)
            }
            EntryKind::File => {
                let bytes = self.copy_file(src_path, dest_path)?;
                self.stats.files_replaced += 1;
                self.stats.bytes_copied += bytes;
                None
            }
            EntryKind::Symlink => {
                self.fs
                    .copy_symlink(src_path, dest_path)
                    .map_err(|e| (src_path.to_path_buf(), map_io_error(src_path, e)))?;
                self.stats.files_replaced += 1;
                None
            }
        };
        Ok(descend)
    }

    fn remove_entry(&mut self, dest: &DirEntry, dest_path: &Path) -> Result<(), (PathBuf, SyncError)> {
        self.delete_path(dest, dest_path)?;
        if dest.is_dir() {
            self.stats.dirs_deleted += 1;
        } else {
            self.stats.files_deleted += 1;
        }
        Ok(())
    }

    fn delete_path(&self, dest: &DirEntry, dest_path: &Path) -> Result<(), (PathBuf, SyncError)> {
        let result = if dest.is_dir() {
            self.fs.remove_dir_all(dest_path)
        } else {
            self.fs.remove_file(dest_path)
        };
        result.map_err(|e| (dest_path.to_path_buf(), map_io_error(dest_path, e)))
    }

    fn copy_file(&self, src_path: &Path, dest_path: &Path) -> Result<u64, (PathBuf, SyncError)> {
        self.fs.copy_file(src_path, dest_path).map_err(|e| {
            // Blame the side that actually failed.
            let path = if self.fs.stat(src_path).is_err() {
                src_path
            } else {
                dest_path
            };
            (path.to_path_buf(), map_io_error(path, e))
        })
    }

    fn record_error(&mut self, path: PathBuf, operation: Operation, err: SyncError) {
        error!(path = %path.display(), operation = %operation, error = %err, "entry failed");
        self.errors.push(EntryError {
            path,
            operation,
            error: err,
        });
    }
}

fn log_decision(relative: &Path, decision: &Decision) {
    match decision.reason() {
        Some(reason) => info!(path = %relative.display(), reason = %reason, "{}", decision.label()),
        None => info!(path = %relative.display(), "{}", decision.label()),
    }
}
