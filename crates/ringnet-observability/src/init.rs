// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output is always installed. With the `file-logging` feature a
//! timestamped run folder receives a combined JSON log:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── ringnet.log
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Logging options, usually filled from the `[logging]` config section
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Default level for crates without a debug flag
    pub level: String,
    /// Base directory for run folders
    pub log_dir: PathBuf,
    /// Write JSON logs to a run folder (`file-logging` feature)
    pub file_logging: bool,
    /// Keep N most recent run folders
    pub retention_runs: usize,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("./logs"),
            file_logging: false,
            retention_runs: 10,
        }
    }
}

/// Keeps file writers alive; logs are flushed on drop
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving file logs, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize the global subscriber
///
/// Returns an error if a global subscriber is already installed or the run
/// folder cannot be created.
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&options.level.to_lowercase());
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers = Vec::new();

    // Console layer (human-readable)
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter)
        .boxed();
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let mut file_guards = Vec::new();
    #[cfg_attr(not(feature = "file-logging"), allow(unused_mut))]
    let mut run_folder = None;

    if options.file_logging {
        #[cfg(feature = "file-logging")]
        {
            let folder = create_run_folder(&options.log_dir, options.retention_runs)?;
            let appender = tracing_appender::rolling::never(&folder, "ringnet.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            file_guards.push(guard);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(EnvFilter::try_new(&filter)?)
                .boxed();
            layers.push(file_layer);
            run_folder = Some(folder);
        }
        #[cfg(not(feature = "file-logging"))]
        eprintln!("File logging requested but the `file-logging` feature is disabled");
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("Global tracing subscriber already installed")?;
    tracing::debug!("Log filter: {}", filter);

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

/// Create `<base>/run_<timestamp>` and prune old run folders
pub fn create_run_folder(base_log_dir: &Path, retention_runs: usize) -> Result<PathBuf> {
    let timestamp = Utc::now().format(RUN_TIMESTAMP_FORMAT);
    let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_logs(base_log_dir, retention_runs)?;
    Ok(run_folder)
}

/// Keep only the `retention_runs` most recent run folders
pub fn cleanup_old_logs(base_log_dir: &Path, retention_runs: usize) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }

    let mut runs: Vec<(PathBuf, NaiveDateTime)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(RUN_PREFIX))
            .and_then(|s| NaiveDateTime::parse_from_str(s, RUN_TIMESTAMP_FORMAT).ok());
        if let Some(stamp) = stamp {
            runs.push((path, stamp));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, stamp)| *stamp);

    if runs.len() > retention_runs {
        let to_remove = runs.len() - retention_runs;
        for (path, _) in runs.iter().take(to_remove) {
            if let Err(e) = std::fs::remove_dir_all(path) {
                eprintln!(
                    "Warning: Failed to remove old log directory {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cleanup_keeps_most_recent_runs() {
        let dir = tempdir().unwrap();
        for stamp in ["20240101_000000", "20240102_000000", "20240103_000000"] {
            std::fs::create_dir(dir.path().join(format!("run_{}", stamp))).unwrap();
        }
        std::fs::create_dir(dir.path().join("unrelated")).unwrap();

        cleanup_old_logs(dir.path(), 2).unwrap();

        assert!(!dir.path().join("run_20240101_000000").exists());
        assert!(dir.path().join("run_20240102_000000").exists());
        assert!(dir.path().join("run_20240103_000000").exists());
        assert!(dir.path().join("unrelated").exists());
    }

    #[test]
    fn test_cleanup_missing_dir_is_ok() {
        let dir = tempdir().unwrap();
        assert!(cleanup_old_logs(&dir.path().join("absent"), 3).is_ok());
    }

    #[test]
    fn test_create_run_folder() {
        let dir = tempdir().unwrap();
        let folder = create_run_folder(dir.path(), 5).unwrap();
        assert!(folder.is_dir());
        assert!(folder
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("run_"));
    }
}
