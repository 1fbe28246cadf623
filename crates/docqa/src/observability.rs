//! Logging setup for the CLI.
//!
//! Human-readable events go to stderr so stdout stays clean for `--json`.
//! When a log location is configured, a JSONL file layer is added through a
//! non-blocking `tracing-appender` writer.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Explicit log file path; disables rolling.
const LOG_PATH_ENV: &str = "DOCQA_LOG_PATH";
/// Log directory for daily rolling files.
const LOG_DIR_ENV: &str = "DOCQA_LOG_DIR";
/// File name prefix used inside a log directory.
const LOG_FILE_NAME: &str = "docqa.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// One fixed file.
    File(PathBuf),
    /// Daily rolling files inside a directory.
    Directory(PathBuf),
}

/// Resolved observability settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// File log destination. `None` means stderr only.
    pub target: Option<LogTarget>,
}

impl ObservabilityConfig {
    /// Resolve from `DOCQA_LOG_PATH`, then `DOCQA_LOG_DIR`, then the
    /// configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
        let target = env_path
            .filter(non_empty)
            .map(LogTarget::File)
            .or_else(|| {
                env_dir
                    .filter(non_empty)
                    .or(config_dir)
                    .map(LogTarget::Directory)
            });
        Self { target }
    }
}

/// Build the event filter.
///
/// `RUST_LOG` wins when set. Otherwise `--quiet` means errors only, `-v`
/// means debug, `-vv` and beyond mean trace, and no flag falls back to the
/// configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(quiet, verbose, default_level)))
}

fn level_for(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the
/// life of the process.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match &config.target {
        Some(target) => {
            let appender = appender_for(target)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_current_span(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

fn appender_for(target: &LogTarget) -> anyhow::Result<tracing_appender::rolling::RollingFileAppender> {
    match target {
        LogTarget::File(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("log path has no file name: {}", path.display()))?;
            ensure_dir(dir)?;
            Ok(tracing_appender::rolling::never(dir, name))
        }
        LogTarget::Directory(dir) => {
            ensure_dir(dir)?;
            Ok(tracing_appender::rolling::daily(dir, LOG_FILE_NAME))
        }
    }
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))
}
