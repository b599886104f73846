//! Vetted Logging
//!
//! Small structured logger shared by the vetted crates, controlled through
//! environment variables so that library users can see why a value was
//! rejected without wiring up a subscriber.
//!
//! # Features
//!
//! - **Environment-controlled**: `VETTED_DEBUG=1` enables debug logging
//! - **Structured fields**: key-value pairs rendered in every output format
//! - **Multiple backends**: stderr by default, optionally `tracing`
//!
//! # Usage
//!
//! ```rust
//! use vetted_log::{debug, info, trace, warn};
//!
//! debug!("Loading message catalog");
//! info!("Locale switched to {}", "en");
//! warn!(target: "vetted::postal_code", "5-digit postal codes are deprecated");
//!
//! // With structured fields
//! trace!(target: "vetted::rules", { scope = "email", key = "businessOnly" }, "Predicate failed");
//! ```
//!
//! # Environment Variables
//!
//! - `VETTED_DEBUG=1` - Enable debug logging
//! - `VETTED_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `VETTED_LOG_FORMAT=pretty|json|compact` - Set output format
//! - `VETTED_LOG_COLOR=1|0` - Enable/disable colors
//! - `VETTED_LOG_TIMESTAMPS=1|0` - Include timestamps
//! - `VETTED_LOG_MODULE=1|0` - Include the log target

use once_cell::sync::Lazy;
use std::env;
use std::fmt::Display;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicU8, Ordering};

// ============================================================================
// Log Levels
// ============================================================================

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    Warn = 3,
    /// Error level (least verbose)
    Error = 4,
    /// Off (no logging)
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Upper-case level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }

    #[cfg(feature = "color")]
    fn colored(&self) -> colored::ColoredString {
        use colored::Colorize;
        match self {
            Level::Trace => "TRACE".magenta(),
            Level::Debug => "DEBUG".blue(),
            Level::Info => "INFO".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERROR".red().bold(),
            Level::Off => "OFF".white(),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human readable, one record per line with aligned level
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON lines for log shippers
    Json,
}

impl Format {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Global Configuration
// ============================================================================

/// Warnings are visible by default: the postal-code deprecation notice relies on it.
static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration.
#[derive(Debug)]
pub struct LogConfig {
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether colors are enabled
    pub color: bool,
    /// Whether to include timestamps
    pub timestamps: bool,
    /// Whether to include the target
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Warn,
            format: Format::Pretty,
            color: false,
            timestamps: true,
            module_path: true,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LogConfig {
    /// Build the configuration from `VETTED_*` environment variables and
    /// publish the level to the global atomic.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = env_flag("VETTED_DEBUG").unwrap_or(false);

        let level = env::var("VETTED_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("VETTED_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(defaults.format);

        let color = env_flag("VETTED_LOG_COLOR").unwrap_or_else(|| {
            env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
        });

        LOG_LEVEL.store(level as u8, Ordering::SeqCst);

        Self {
            level,
            format,
            color,
            timestamps: env_flag("VETTED_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps),
            module_path: env_flag("VETTED_LOG_MODULE").unwrap_or(defaults.module_path),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Initialize the logging system eagerly.
///
/// Called implicitly by the first emitted record.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// Check if a log level is enabled.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Get current log level.
pub fn current_level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set log level at runtime.
pub fn set_level(level: Level) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Get the global configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Log Output
// ============================================================================

/// A structured key-value pair attached to a record.
pub type Field<'a> = (&'a str, &'a dyn Display);

/// Emit a record without fields.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    log_fields(level, target, message, &[]);
}

/// Emit a record with structured fields.
#[doc(hidden)]
pub fn log_fields(level: Level, target: &str, message: &str, fields: &[Field<'_>]) {
    let config = config();
    if !is_level_enabled(level) {
        return;
    }

    let rendered: Vec<(&str, String)> = fields
        .iter()
        .map(|(key, value)| (*key, value.to_string()))
        .collect();

    match config.format {
        Format::Pretty => write_pretty(level, target, message, &rendered, config),
        Format::Compact => write_compact(level, target, message, &rendered, config),
        Format::Json => write_json(level, target, message, &rendered),
    }
}

fn write_pretty(
    level: Level,
    target: &str,
    message: &str,
    fields: &[(&str, String)],
    config: &LogConfig,
) {
    let mut stderr = std::io::stderr().lock();

    if config.timestamps {
        let now = chrono::Local::now();
        let _ = write!(stderr, "{} ", now.format("%Y-%m-%d %H:%M:%S%.3f"));
    }

    #[cfg(feature = "color")]
    if config.color {
        let _ = write!(stderr, "{:5} ", level.colored());
    } else {
        let _ = write!(stderr, "{:5} ", level.as_str());
    }

    #[cfg(not(feature = "color"))]
    let _ = write!(stderr, "{:5} ", level.as_str());

    if config.module_path && !target.is_empty() {
        let _ = write!(stderr, "[{}] ", target);
    }

    let _ = write!(stderr, "{}", message);
    for (key, value) in fields {
        let _ = write!(stderr, " {}={}", key, value);
    }
    let _ = writeln!(stderr);
}

fn write_compact(
    level: Level,
    target: &str,
    message: &str,
    fields: &[(&str, String)],
    config: &LogConfig,
) {
    let mut stderr = std::io::stderr().lock();

    if config.timestamps {
        let now = chrono::Local::now();
        let _ = write!(stderr, "{} ", now.format("%H:%M:%S"));
    }

    let _ = write!(stderr, "{} ", level.as_str().chars().next().unwrap_or('?'));

    if config.module_path && !target.is_empty() {
        let _ = write!(stderr, "{}: ", target);
    }

    let _ = write!(stderr, "{}", message);
    for (key, value) in fields {
        let _ = write!(stderr, " {}={}", key, value);
    }
    let _ = writeln!(stderr);
}

/// One JSON object per record; `fields` is omitted when empty.
fn json_record(level: Level, target: &str, message: &str, fields: &[(&str, String)]) -> String {
    let mut entry = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "level": level.as_str(),
        "target": target,
        "message": message,
    });
    if !fields.is_empty() {
        let fields: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone().into()))
            .collect();
        entry["fields"] = fields.into();
    }
    entry.to_string()
}

fn write_json(level: Level, target: &str, message: &str, fields: &[(&str, String)]) {
    eprintln!("{}", json_record(level, target, message, fields));
}

// ============================================================================
// Macros
// ============================================================================

/// Shared expansion for the level macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    ($level:expr, target: $target:expr, { $($key:ident = $value:expr),* $(,)? }, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::log_fields(
                $level,
                $target,
                &format!($($arg)+),
                &[$((stringify!($key), &$value as &dyn ::std::fmt::Display)),*],
            );
        }
    };
    ($level:expr, target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::log($level, $target, &format!($($arg)+));
        }
    };
    ($level:expr, { $($key:ident = $value:expr),* $(,)? }, $($arg:tt)+) => {
        $crate::__emit!($level, target: module_path!(), { $($key = $value),* }, $($arg)+)
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::__emit!($level, target: module_path!(), $($arg)+)
    };
}

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Trace, $($arg)+) };
}

/// Log a debug message.
///
/// Emitted when `VETTED_DEBUG=1` or `VETTED_LOG_LEVEL` is `debug`/`trace`.
///
/// # Example
///
/// ```rust
/// use vetted_log::debug;
///
/// let locale = "zh-TW";
/// debug!("Current locale: {}", locale);
/// debug!(target: "vetted::i18n", { locale = locale }, "Locale switched");
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Debug, $($arg)+) };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Info, $($arg)+) };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Warn, $($arg)+) };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Error, $($arg)+) };
}

// ============================================================================
// Tracing Integration
// ============================================================================

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! Tracing compatibility layer.
    //!
    //! Builds a subscriber whose default filter follows `VETTED_LOG_LEVEL`.

    use super::*;

    /// Create a tracing subscriber that respects the vetted configuration.
    pub fn subscriber() -> impl tracing::Subscriber {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        let config = config();
        let level = config.level.as_str().to_ascii_lowercase();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(config.color))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse(" DEBUG "), Some(Level::Debug));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("none"), Some(Level::Off));
        assert_eq!(Level::parse("loud"), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("Compact"), Some(Format::Compact));
        assert_eq!(Format::parse("json"), Some(Format::Json));
        assert_eq!(Format::parse("xml"), None);
    }

    #[test]
    fn test_json_record() {
        let line = json_record(
            Level::Warn,
            "vetted::postal_code",
            "5-digit \"code\"",
            &[("code", "10601".to_string())],
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "vetted::postal_code");
        assert_eq!(value["message"], "5-digit \"code\"");
        assert_eq!(value["fields"]["code"], "10601");

        let bare: serde_json::Value =
            serde_json::from_str(&json_record(Level::Info, "t", "m", &[])).unwrap();
        assert!(bare.get("fields").is_none());
    }

    #[test]
    fn test_off_is_never_enabled() {
        assert!(!is_level_enabled(Level::Off));
    }

    #[test]
    fn test_set_level() {
        let original = current_level();

        set_level(Level::Error);
        assert_eq!(current_level(), Level::Error);
        assert!(!is_level_enabled(Level::Warn));
        assert!(is_level_enabled(Level::Error));

        set_level(Level::Trace);
        assert!(is_level_enabled(Level::Debug));

        set_level(original);
    }

    #[test]
    fn test_macros_compile() {
        trace!("trace message");
        debug!("debug message");
        info!("info message");
        warn!("warn message");
        error!("error message");

        warn!(target: "test", "with target");
        trace!(target: "test", { scope = "email", key = "invalid" }, "with fields");
        debug!({ attempt = 3 }, "fields without target {}", 1);
    }
}
