//! Tracing setup for binaries built on the toolkit.
//!
//! The terminal belongs to the UI, so logs go to a daily rolling file.
//! The library itself only emits events; installing a subscriber is the
//! binary's call.

use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log file name prefix inside the log directory.
pub const LOG_FILE_PREFIX: &str = "console-menu.log";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "console_menu=info";

/// Keeps the background log writer alive. Drop it last.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Platform cache directory, falling back to the temp dir.
pub fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("console-menu")
        .join("logs")
}

/// Install the global subscriber writing under `log_dir`.
///
/// # Errors
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn init(log_dir: &Path) -> io::Result<LoggingGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| io::Error::other(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Ok(LoggingGuard {
        _guard: guard,
        log_dir: log_dir.to_path_buf(),
    })
}
