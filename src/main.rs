use anyhow::Context;
use clap::Parser;
use dirsync::commands::sync::{self, SyncOutcome};
use dirsync::config::Cli;
use dirsync::logging::{self, LOG_FILE_NAME};
use dirsync::Config;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let log_dir = env::current_dir().context("Cannot determine working directory")?;
    let cli_log_level = cli.log_level;

    // Convert CLI args to Config - bad config files fail here
    let config = match Config::try_from(cli) {
        Ok(config) => config,
        Err(err) => {
            // The file's own log level is unknown, so fall back to the flag.
            let _guard = logging::init(&log_dir, cli_log_level.unwrap_or_default())?;
            sync::log_fatal(&err);
            return Err(err.into());
        }
    };

    // Dropped at the end of this function so buffered log lines are flushed
    let _guard = logging::init(&log_dir, config.log_level)?;

    println!("dirsync v{}", dirsync::VERSION);
    println!("Log file: {}", log_dir.join(LOG_FILE_NAME).display());

    match sync::run(&config)? {
        SyncOutcome::Completed(_) | SyncOutcome::Cancelled => Ok(ExitCode::SUCCESS),
    }
}
