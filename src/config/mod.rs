//! Configuration management

use crate::logging::LogLevel;
use crate::reconcile::{resolve_roots, Roots};
use crate::types::{map_io_error, SyncError, SyncMode};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "dirsync",
    version,
    about = "Synchronize a destination directory with a source directory"
)]
pub struct Cli {
    /// The source path from which files will be copied
    pub source: PathBuf,

    /// The destination path; the folder that will be updated
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    /// Keep files and folders that exist only in the destination
    #[arg(short, long)]
    pub merge: bool,

    /// Run without FROM-TO directional confirmation
    #[arg(short = 'y', long)]
    pub skip_confirmation: bool,

    /// Set the log file output level
    #[arg(long, alias = "ll", value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Read defaults from a TOML file (command-line flags win)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Optional settings file
///
/// ```toml
/// merge = true
/// skip_confirmation = false
/// log_level = "DEBUG"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub merge: Option<bool>,
    pub skip_confirmation: Option<bool>,
    pub log_level: Option<LogLevel>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path).map_err(|e| map_io_error(path, e))?;
        Self::parse(&content).map_err(|e| {
            SyncError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Global configuration for dirsync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory
    pub destination: PathBuf,

    /// Keep destination-only entries instead of deleting them
    pub merge: bool,

    /// Skip the FROM/TO confirmation prompt
    pub skip_confirmation: bool,

    /// Log file verbosity
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            merge: false,
            skip_confirmation: false,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    pub fn mode(&self) -> SyncMode {
        SyncMode::from_merge_flag(self.merge)
    }

    /// Validate configuration
    ///
    /// The source must be an existing directory, and the two roots must not
    /// be the same directory or nested inside each other.
    pub fn validate(&self) -> Result<Roots, SyncError> {
        if self.source.as_os_str().is_empty() || self.destination.as_os_str().is_empty() {
            return Err(SyncError::Config(
                "Source and destination paths are required".to_string(),
            ));
        }

        let roots = resolve_roots(&self.source, &self.destination)?;
        if !roots.source.is_dir() {
            return Err(SyncError::Config(format!(
                "Source folder {} is not a valid directory",
                roots.source.display()
            )));
        }
        Ok(roots)
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        Ok(Self {
            source: cli.source,
            destination: cli.destination,
            merge: cli.merge || file.merge.unwrap_or(false),
            skip_confirmation: cli.skip_confirmation || file.skip_confirmation.unwrap_or(false),
            log_level: cli.log_level.or(file.log_level).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("parse args")
    }

    #[test]
    fn test_cli_defaults() {
        let config = Config::try_from(parse(&["dirsync", "src", "dst"])).expect("config");

        assert_eq!(config.source, PathBuf::from("src"));
        assert_eq!(config.destination, PathBuf::from("dst"));
        assert!(!config.merge);
        assert!(!config.skip_confirmation);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.mode(), SyncMode::Mirror);
    }

    #[test]
    fn test_cli_flags() {
        let cli = parse(&["dirsync", "-y", "--merge", "--log-level", "DEBUG", "a", "b"]);
        let config = Config::try_from(cli).expect("config");

        assert!(config.merge);
        assert!(config.skip_confirmation);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.mode(), SyncMode::Merge);
    }

    #[test]
    fn test_cli_log_level_alias_and_case() {
        let cli = parse(&["dirsync", "--ll", "fatal", "a", "b"]);
        assert_eq!(cli.log_level, Some(LogLevel::Fatal));

        let cli = parse(&["dirsync", "--log-level", "Warn", "a", "b"]);
        assert_eq!(cli.log_level, Some(LogLevel::Warn));
    }

    #[test]
    fn test_cli_rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["dirsync", "--log-level", "TRACE", "a", "b"]).is_err());
    }

    #[test]
    fn test_cli_requires_both_paths() {
        assert!(Cli::try_parse_from(["dirsync", "only-one"]).is_err());
    }

    #[test]
    fn test_file_config_parse() {
        let file = FileConfig::parse("merge = true\nlog_level = \"warn\"\n").expect("parse toml");
        assert_eq!(file.merge, Some(true));
        assert_eq!(file.skip_confirmation, None);
        assert_eq!(file.log_level, Some(LogLevel::Warn));
    }

    #[test]
    fn test_file_config_rejects_unknown_keys() {
        assert!(FileConfig::parse("delete = true\n").is_err());
    }

    #[test]
    fn test_cli_overrides_file_config() {
        let temp = tempfile::tempdir().expect("create tempdir");
        let path = temp.path().join("dirsync.toml");
        fs::write(&path, "merge = true\nlog_level = \"ERROR\"\n").expect("write config");

        let cli = parse(&[
            "dirsync",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--log-level",
            "DEBUG",
            "a",
            "b",
        ]);
        let config = Config::try_from(cli).expect("config");

        assert!(config.merge);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = parse(&["dirsync", "--config", "/nonexistent/dirsync.toml", "a", "b"]);
        assert!(Config::try_from(cli).is_err());
    }

    #[test]
    fn test_validate_missing_source() {
        let temp = tempfile::tempdir().expect("create tempdir");
        let config = Config {
            source: temp.path().join("missing"),
            destination: temp.path().join("dst"),
            ..Config::default()
        };

        let err = config.validate().expect_err("missing source");
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_same_paths() {
        let temp = tempfile::tempdir().expect("create tempdir");
        let config = Config {
            source: temp.path().to_path_buf(),
            destination: temp.path().to_path_buf(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_paths() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn test_validate_ok_returns_resolved_roots() {
        let temp = tempfile::tempdir().expect("create tempdir");
        fs::create_dir(temp.path().join("src")).expect("create src");
        let config = Config {
            source: temp.path().join("src"),
            destination: temp.path().join("dst"),
            ..Config::default()
        };

        let roots = config.validate().expect("valid config");
        assert!(roots.source.is_absolute());
        assert!(roots.destination.ends_with("dst"));
    }
}
