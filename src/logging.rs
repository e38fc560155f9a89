/// Structured logging for the AUXIO collector
///
/// Provides context-rich logging with source tags, optional context ids
/// (municipality, archive member, feed URL), timestamps and severity levels.
/// Supports both console output and file-based logging for scheduled runs.
///
/// Only the collector and the binary log; the parsers return values and
/// leave reporting to their callers.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses a config value (`debug`, `info`, `warn`/`warning`, `error`).
    pub fn parse(value: &str) -> Option<LogLevel> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Aemet,
    Ign,
    Config,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Aemet => write!(f, "AEMET"),
            DataSource::Ign => write!(f, "IGN"),
            DataSource::Config => write!(f, "CFG"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - rate limiting, nothing published right now
    Expected,
    /// Unexpected failure - indicates service degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *global() = Some(logger);
    }

    /// One formatted line, as written to the log file.
    fn format_entry(level: LogLevel, source: &DataSource, context: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let context_part = context.map(|c| format!(" [{}]", c)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, source, context_part, message)
    }

    fn log(&self, level: LogLevel, source: &DataSource, context: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, source, context, message);
        let context_part = context.map(|c| format!(" [{}]", c)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => eprintln!("   {}", log_entry),
                LogLevel::Debug => eprintln!("   [DEBUG] {}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, context_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, context_part, message),
                LogLevel::Info => eprintln!("   {}{}: {}", source, context_part, message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// The global slot; a panic while holding the lock does not disable logging.
fn global() -> MutexGuard<'static, Option<Logger>> {
    match LOGGER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn emit(level: LogLevel, source: DataSource, context: Option<&str>, message: &str) {
    if let Some(logger) = global().as_ref() {
        logger.log(level, &source, context, message);
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(source: DataSource, context: Option<&str>, message: &str) {
    emit(LogLevel::Info, source, context, message);
}

/// Log a warning message
pub fn warn(source: DataSource, context: Option<&str>, message: &str) {
    emit(LogLevel::Warning, source, context, message);
}

/// Log an error message
pub fn error(source: DataSource, context: Option<&str>, message: &str) {
    emit(LogLevel::Error, source, context, message);
}

/// Log a debug message
pub fn debug(source: DataSource, context: Option<&str>, message: &str) {
    emit(LogLevel::Debug, source, context, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an AEMET failure based on the error message
pub fn classify_aemet_failure(error_message: &str) -> FailureType {
    // AEMET throttles aggressively; a 429 clears up on the next run
    if error_message.contains("HTTP error: 429") {
        FailureType::Expected
    }
    // "No hay datos que satisfagan esos criterios" and empty bundles
    else if error_message.contains("No data") || error_message.contains("Upstream error") {
        FailureType::Unknown
    }
    // Bad key, server errors, timeouts
    else if error_message.contains("HTTP error") || error_message.contains("Request failed") {
        FailureType::Unexpected
    }
    // Parse errors suggest API changes
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Classify an IGN feed failure
pub fn classify_ign_failure(error_message: &str) -> FailureType {
    if error_message.contains("HTTP") || error_message.contains("Request failed") {
        FailureType::Unexpected
    } else if error_message.contains("Parse error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log an AEMET failure with automatic classification
pub fn log_aemet_failure(context: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_aemet_failure(&error_msg);
    log_classified(DataSource::Aemet, context, operation, &failure_type, &error_msg);
}

/// Log an IGN failure with classification
pub fn log_ign_failure(context: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_ign_failure(&error_msg);
    log_classified(DataSource::Ign, context, operation, &failure_type, &error_msg);
}

fn log_classified(source: DataSource, context: &str, operation: &str, failure_type: &FailureType, error_msg: &str) {
    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(source, Some(context), &message),
        FailureType::Unexpected => error(source, Some(context), &message),
        FailureType::Unknown => warn(source, Some(context), &message),
    }
}

// ---------------------------------------------------------------------------
// Collection Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of one collection run
pub fn log_collection_summary(source: DataSource, total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Collection complete: {}/{} sources ok, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(source, None, &message);
    } else if successful == 0 {
        error(source, None, &message);
    } else {
        warn(source, None, &message);
    }
}
