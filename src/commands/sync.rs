//! Main sync command

use crate::filesystem::LocalFs;
use crate::reconcile::{EntryError, Reconciler, SyncReport};
use crate::types::SyncError;
use crate::ui::{confirm_direction, ProgressReporter};
use crate::Config;
use indicatif::HumanBytes;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// How a sync command ended (fatal errors are returned as `Err`)
#[derive(Debug)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// The user declined the direction prompt; nothing was touched
    Cancelled,
}

/// Run the sync operation
///
/// Fatal errors are logged at FATAL before being returned.
pub fn run(config: &Config) -> Result<SyncOutcome, SyncError> {
    run_inner(config).inspect_err(log_fatal)
}

fn run_inner(config: &Config) -> Result<SyncOutcome, SyncError> {
    let roots = config.validate()?;

    if !config.skip_confirmation && !confirm_direction(&roots.source, &roots.destination)? {
        println!("Exiting Program.");
        info!(from = %roots.source.display(), to = %roots.destination.display(), "sync cancelled by user");
        return Ok(SyncOutcome::Cancelled);
    }

    let reporter = ProgressReporter::new();
    let on_dir = |dir: &Path| reporter.traversing(dir);
    let reconciler = Reconciler::new(LocalFs, config.mode());

    let report = match reconciler.run_with_progress(&roots.source, &roots.destination, Some(&on_dir))
    {
        Ok(report) => report,
        Err(err) => {
            reporter.abandon();
            return Err(err);
        }
    };
    reporter.finish(&report);

    println!("{}", format_summary(&report));
    if report.has_errors() {
        println!("{}", format_error_summary(&report.errors));
    }

    Ok(SyncOutcome::Completed(report))
}

/// Record a fatal error in the log file.
pub fn log_fatal(err: &SyncError) {
    error!(severity = "FATAL", error = %err, "synchronization aborted");
}

fn format_summary(report: &SyncReport) -> String {
    let stats = &report.stats;
    format!(
        "Summary ({} mode, started {}):\n  Copied: {} file(s), {} dir(s)  Deleted: {} file(s), {} dir(s)  \
         Replaced: {} file(s), {} dir(s)\n  Skipped: {}  Kept: {}  Errors: {}\n  Bytes copied: {}",
        report.mode,
        report.started_at.format("%d-%m-%Y %H:%M:%S"),
        stats.files_copied,
        stats.dirs_copied,
        stats.files_deleted,
        stats.dirs_deleted,
        stats.files_replaced,
        stats.dirs_replaced,
        stats.skipped,
        stats.kept,
        report.errors.len(),
        HumanBytes(stats.bytes_copied)
    )
}

#[derive(Debug)]
struct ErrorRecord {
    kind: &'static str,
    path: PathBuf,
    message: String,
    suggestion: Option<String>,
}

impl ErrorRecord {
    fn new(entry: &EntryError) -> Self {
        let (message, suggestion) = humanize_error(&entry.error);
        Self {
            kind: error_kind_label(&entry.error),
            path: entry.path.clone(),
            message: format!("Could not {} entry: {}", entry.operation, message),
            suggestion,
        }
    }
}

fn humanize_error(error: &SyncError) -> (String, Option<String>) {
    if error.is_permission_error() {
        return (
            "permission denied".to_string(),
            Some("Check file permissions or run with a user that has access.".to_string()),
        );
    }
    if error.is_disk_space_error() {
        return (
            "not enough disk space".to_string(),
            Some("Free disk space on destination and retry.".to_string()),
        );
    }

    match error {
        SyncError::Io(io) | SyncError::IoAt { source: io, .. } => match io.kind() {
            ErrorKind::NotFound => (
                "file or directory was not found".to_string(),
                Some("It may have been removed during the sync; run again.".to_string()),
            ),
            ErrorKind::AlreadyExists => (
                "the destination path already exists".to_string(),
                Some("Remove or rename the conflicting path, then retry.".to_string()),
            ),
            _ => (
                format!("I/O operation failed: {}", io),
                Some("Retry the sync. If this keeps happening, check disk health.".to_string()),
            ),
        },
        other => (other.to_string(), None),
    }
}

fn error_kind_label(error: &SyncError) -> &'static str {
    if error.is_permission_error() {
        "Permission denied"
    } else if error.is_disk_space_error() {
        "Disk full"
    } else if error.is_config_error() {
        "Configuration error"
    } else {
        "I/O error"
    }
}

fn format_error_summary(errors: &[EntryError]) -> String {
    let records: Vec<ErrorRecord> = errors.iter().map(ErrorRecord::new).collect();
    format_records(&records)
}

fn format_records(records: &[ErrorRecord]) -> String {
    let mut groups: BTreeMap<&'static str, Vec<&ErrorRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.kind).or_default().push(record);
    }

    let mut lines = Vec::new();
    lines.push("Some errors occurred during synchronization. Check the log file.".to_string());
    for (kind, items) in groups {
        lines.push(format!("  {} ({}):", kind, items.len()));
        for record in items.iter().take(3) {
            lines.push(format!("    - {}", record.message));
            lines.push(format!("      Path: {}", record.path.display()));
            if let Some(suggestion) = &record.suggestion {
                lines.push(format!("      Try: {}", suggestion));
            }
        }
        if items.len() > 3 {
            lines.push(format!("    - ... {} more", items.len() - 3));
        }
    }
    lines.join("\n")
}
