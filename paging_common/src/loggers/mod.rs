//! # Logging Setup
//!
//! One place where binaries install their `tracing` subscriber.
//!
//! ## Key Features:
//! - **Env override**: the configured level is the default, `RUST_LOG` wins.
//! - **JSON file log**: every run writes `{app}_{timestamp}.log` under the log
//!   directory through a non-blocking writer.
//! - **Optional console**: full-screen terminal programs turn the console layer off
//!   so log lines do not tear the display.
//! - **Pruning**: older log files of the same app are removed at startup.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use std::cmp::Reverse;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log files kept per app, not counting the one about to be created.
pub const KEEP_LOG_FILES: usize = 1;

/// # Setup Logging
///
/// Installs the global subscriber. The returned guard flushes the file writer
/// when dropped and must be held until the process exits.
pub fn setup_logging(app: &str, log_dir: &Path, log_level: &str, console: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let removed = cleanup_old_logs(log_dir, app, KEEP_LOG_FILES)?;

    let file_name = format!("{}_{}.log", app, chrono::Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let file_appender = tracing_appender::rolling::never(log_dir, &file_name);
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .json();

    let console_layer = console.then(|| fmt::layer().with_target(true).with_ansi(true));

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .with_context(|| format!("invalid log level {log_level:?}"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    info!(app, log_file = %file_name, pruned = removed, "Logging initialized with level: {}", log_level);
    Ok(guard)
}

/// Deletes `{app}_*.log` files in `log_dir`, keeping the `keep` newest.
/// Returns how many files were removed. Files that cannot be removed are skipped.
pub fn cleanup_old_logs(log_dir: &Path, app: &str, keep: usize) -> Result<usize> {
    let prefix = format!("{app}_");
    let mut logs: Vec<(SystemTime, std::path::PathBuf)> = fs::read_dir(log_dir)?
        .filter_map(|res| res.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.starts_with(&prefix) && name.ends_with(".log")
        })
        .map(|e| {
            let modified = e
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, e.path())
        })
        .collect();

    // Newest first.
    logs.sort_by_key(|(modified, _)| Reverse(*modified));

    let mut removed = 0;
    for (_, path) in logs.iter().skip(keep) {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("Failed to delete old log file {:?}: {}", path, e),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    #[test]
    fn test_cleanup_keeps_newest_of_same_app() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::now() - Duration::from_secs(600);
        for (i, name) in ["belt_a.log", "belt_b.log", "belt_c.log"].iter().enumerate() {
            let file = File::create(dir.path().join(name)).unwrap();
            file.set_modified(base + Duration::from_secs(60 * i as u64)).unwrap();
        }
        File::create(dir.path().join("server_x.log")).unwrap();
        File::create(dir.path().join("belt_notes.txt")).unwrap();

        let removed = cleanup_old_logs(dir.path(), "belt", 1).unwrap();
        assert_eq!(removed, 2);
        assert!(dir.path().join("belt_c.log").exists());
        assert!(!dir.path().join("belt_a.log").exists());
        assert!(dir.path().join("server_x.log").exists());
        assert!(dir.path().join("belt_notes.txt").exists());
    }

    #[test]
    fn test_cleanup_on_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path(), "belt", 1).unwrap(), 0);
    }
}
