//! Logging infrastructure for Geobeacon
//!
//! Provides flexible logging with:
//! - stdout output by default (journalctl-friendly)
//! - Optional file output with daily rotation
//! - Feature-gated JSON structured logging
//! - Environment-based log level configuration

use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
pub use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the non-blocking file writer alive for the process lifetime
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Optional log directory for file output
    pub log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            level: "info".to_string(),
            json_format: cfg!(feature = "json"),
        }
    }
}

/// Initialize logging subsystem
///
/// # Examples
///
/// ```no_run
/// use geobeacon_common::logging::{init_logging, LogConfig};
///
/// // Default: stdout with info level
/// init_logging(LogConfig::default()).unwrap();
///
/// // With custom log directory
/// let config = LogConfig {
///     log_dir: Some("/var/log/geobeacon".into()),
///     level: "debug".to_string(),
///     json_format: false,
/// };
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> anyhow::Result<()> {
    // RUST_LOG takes priority over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.log_dir {
        None => init_stdout_logging(filter, config.json_format),
        Some(dir) => init_file_logging(dir, filter, config.json_format),
    }
}

/// Initialize stdout logging (default)
#[allow(unused_variables)]
fn init_stdout_logging(filter: EnvFilter, json_format: bool) -> anyhow::Result<()> {
    #[cfg(feature = "json")]
    {
        if json_format {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_current_span(true)
                        .with_span_list(false),
                )
                .init();
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    Ok(())
}

/// Initialize file-based logging with daily rotation
#[allow(unused_variables)]
fn init_file_logging(log_dir: PathBuf, filter: EnvFilter, json_format: bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "agent.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = FILE_GUARD.set(guard);

    #[cfg(feature = "json")]
    {
        if json_format {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_current_span(true)
                        .with_span_list(false)
                        .with_writer(non_blocking),
                )
                .init();
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false) // No ANSI colors in log files
                .with_writer(non_blocking),
        )
        .init();

    Ok(())
}
