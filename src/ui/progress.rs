//! Progress reporting

use crate::reconcile::SyncReport;
use indicatif::{HumanBytes, HumanDuration, ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Spinner shown while the reconciler walks the tree
pub struct ProgressReporter {
    walk_bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let walk_bar = ProgressBar::new_spinner();
        walk_bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{pos} dirs] {msg}") {
            walk_bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        Self { walk_bar }
    }

    /// Reporter that draws nothing (non-interactive use and tests)
    pub fn hidden() -> Self {
        Self {
            walk_bar: ProgressBar::hidden(),
        }
    }

    /// Note that the walk entered `dir`.
    pub fn traversing(&self, dir: &Path) {
        self.walk_bar.inc(1);
        self.walk_bar
            .set_message(format!("Traversing: \"{}\"", dir.display()));
    }

    /// Finish the spinner with a one-line outcome.
    pub fn finish(&self, report: &SyncReport) {
        self.walk_bar.finish_with_message(format!(
            "Synchronization complete: {} change(s), {} copied in {}",
            report.stats.changes(),
            HumanBytes(report.stats.bytes_copied),
            HumanDuration(report.duration)
        ));
    }

    /// Stop the spinner after a fatal error.
    pub fn abandon(&self) {
        self.walk_bar
            .abandon_with_message("Synchronization aborted".to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
