//! Logging setup for the datamap CLI
//!
//! This module provides:
//! - Run ID generation and tracking
//! - Performance timing spans
//! - Structured logging setup (compact, full or JSON)
//! - Optional file output through a non-blocking appender

use crate::config;
use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Identifier of the current CLI run
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    pub format: LogFormat,
    /// Write log lines to stderr
    pub console: bool,
    /// Write log lines to this file instead of stderr
    pub file: Option<PathBuf>,
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LogFormat {
    Compact,
    Full,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "full" => Ok(LogFormat::Full),
            "json" => Ok(LogFormat::Json),
            _ => Err(Error::config(format!("Invalid log format: {}", s))),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            file: None,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => config.level = "info".to_string(),
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply the `logging` section of the configuration file
    pub fn merge_with_file(&mut self, file: &config::LoggingConfig) {
        if let Some(format) = &file.format {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Warning: {}, using {:?}", e, self.format),
            }
        }
        if file.file.is_some() {
            self.file = file.file.clone();
        }
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("DATAMAP_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Warning: {}, using {:?}", e, self.format),
            }
        }

        if let Ok(file) = std::env::var("DATAMAP_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }

        if let Ok(console) = std::env::var("DATAMAP_LOG_CONSOLE") {
            self.console = console.to_lowercase() == "true" || console == "1";
        }
    }
}

/// Initialize the global logging system
///
/// The returned guard flushes the file appender when dropped and must be
/// held until the run finishes.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = create_env_filter(&config)?;

    let (writer, guard, ansi) = match &config.file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .ok_or_else(|| Error::config(format!("Invalid log file path: {}", path.display())))?;
            let appender = tracing_appender::rolling::never(
                directory.unwrap_or_else(|| std::path::Path::new(".")),
                file_name,
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard), false)
        }
        None if config.console => (
            BoxMakeWriter::new(std::io::stderr),
            None,
            std::io::stderr().is_terminal(),
        ),
        None => (BoxMakeWriter::new(std::io::sink), None, false),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(config.thread_ids)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Compact => {
            tracing::subscriber::set_global_default(builder.with_ansi(ansi).compact().finish())
        }
        LogFormat::Full => tracing::subscriber::set_global_default(builder.with_ansi(ansi).finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish()),
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let run_id = generate_run_id();
    RUN_ID
        .set(run_id.clone())
        .map_err(|_| Error::other("Run ID already set"))?;

    tracing::debug!(run_id = %run_id, config = ?config, "Logging system initialized");

    Ok(guard)
}

fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", config.level, e)))
}

/// Generate a unique identifier for this run
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

pub fn current_run_id() -> Option<&'static str> {
    RUN_ID.get().map(|s| s.as_str())
}

/// Create a span carrying the run ID and an empty duration field
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        run_id = current_run_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

pub mod timing {
    use std::time::{Duration, Instant};
    use tracing::Span;

    /// A timer that logs its duration when finished or dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
        finished: bool,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self::start(operation, None)
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self::start(operation, Some(details))
        }

        fn start(operation: &str, details: Option<&str>) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, details),
                operation: operation.to_string(),
                finished: false,
            }
        }

        /// Finish the timer and log the duration at info level
        pub fn finish(mut self) {
            let duration = self.record();
            tracing::info!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
            self.finished = true;
        }

        fn record(&self) -> Duration {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);
            duration
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            if self.finished {
                return;
            }
            let duration = self.record();
            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed (auto-timed)"
            );
        }
    }
}
