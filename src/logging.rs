//! Append-only log file
//!
//! Every run appends to `directory_sync.log` in the working directory; the
//! file is never truncated or rotated. Writes go through a non-blocking
//! worker whose [`WorkerGuard`] must be held until the program exits so the
//! last lines are flushed.

use crate::types::SyncError;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;

/// Name of the log file created in the working directory
pub const LOG_FILE_NAME: &str = "directory_sync.log";

const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Verbosity of the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[serde(alias = "debug")]
    Debug,
    #[default]
    #[serde(alias = "info")]
    Info,
    #[serde(alias = "warn")]
    Warn,
    #[serde(alias = "error")]
    Error,
    /// Only fatal errors; tracing has no level above ERROR, so this filters
    /// like `Error`
    #[serde(alias = "fatal")]
    Fatal,
}

impl LogLevel {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Fatal => LevelFilter::ERROR,
        }
    }
}

/// Open (or create) the log file in `dir` for appending.
pub fn open_log(dir: &Path) -> Result<(NonBlocking, WorkerGuard), SyncError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
        .map_err(|e| {
            SyncError::Config(format!(
                "Cannot open log file in {}: {}",
                dir.display(),
                e
            ))
        })?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Build the plain-text subscriber used for the log file.
pub fn build_subscriber<W>(level: LogLevel, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(level.level_filter())
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .finish()
}

/// Install the global subscriber writing to `dir/directory_sync.log`.
///
/// Keep the returned guard alive for the whole run.
pub fn init(dir: &Path, level: LogLevel) -> Result<WorkerGuard, SyncError> {
    let (writer, guard) = open_log(dir)?;
    tracing::subscriber::set_global_default(build_subscriber(level, writer))
        .map_err(|e| SyncError::Config(format!("Logging already initialized: {}", e)))?;
    Ok(guard)
}
