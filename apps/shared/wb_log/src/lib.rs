//! Centralized logging for workbench bridge applications
//!
//! Provides a custom formatter for tracing that:
//! - Formats thread IDs as #N instead of ThreadId(N)
//! - Extracts `action` and `request_id` fields to display as `setProperty#12`
//! - Strips the application prefix from targets for cleaner output
//! - Filters external dependency logs based on `WB_LOGDEPS` environment variable
//!
//! # Environment Variables
//!
//! - `WB_LOGDEPS`: Set to `1` to enable logging from external dependencies (tokio, etc.).
//!   Default is `0` which only shows logs from bridge crates.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wb_log::{init_logging, LogConfig};
//! use tracing::Level;
//!
//! let config = LogConfig::new("wb_server::").with_level(Level::DEBUG);
//! init_logging(config)?;
//!
//! // Inside a request handler
//! tracing::info!(action = "setProperty", request_id = 12u64, "Property 'Radius' set");
//! // 2025/01/01 10:00:00.0000  INFO #002 setProperty#12: Property 'Radius' set
//! ```

use std::fmt as std_fmt;
use std::io::Write;
use tracing::Level;
use tracing::field::Field;
use tracing_subscriber::field::Visit;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields, format::Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Crates whose events are shown when dependency logging is off
const BRIDGE_TARGETS: &[&str] = &["wb_server", "wb_client", "wb_bridge", "wb_protocol", "wb_log"];

/// Field extractor for action, request_id and message fields
///
/// Used by the custom formatter to detect request-scoped log messages
/// and format them as `action#request_id: message`.
#[derive(Default)]
pub struct FieldExtractor {
    pub action: Option<String>,
    pub request_id: Option<u64>,
    pub message: Option<String>,
}

impl FieldExtractor {
    /// Prefix for request-scoped events, `None` when the event carries no action
    pub fn request_prefix(&self) -> Option<String> {
        let action = self.action.as_deref()?;
        Some(match self.request_id {
            Some(id) => format!("{}#{}", action, id),
            None => action.to_string(),
        })
    }
}

impl Visit for FieldExtractor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "request_id" {
            self.request_id = Some(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "request_id" && value >= 0 {
            self.request_id = Some(value as u64);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "action" => self.action = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std_fmt::Debug) {
        match field.name() {
            "action" => self.action = Some(format!("{:?}", value).trim_matches('"').to_string()),
            "message" => self.message = Some(format!("{:?}", value).trim_matches('"').to_string()),
            _ => {}
        }
    }
}

/// Custom event formatter for bridge applications
///
/// Features:
/// - Thread IDs displayed as #N instead of ThreadId(N)
/// - Request logs formatted as `action#id: message`
/// - Configurable ANSI color support
/// - Configurable target prefix stripping
pub struct CustomFormatter<T> {
    timer: T,
    ansi: bool,
    /// Prefix to strip from log targets (e.g., "wb_server::")
    strip_prefix: Option<String>,
}

impl<T> CustomFormatter<T> {
    pub fn new(timer: T, ansi: bool) -> Self {
        Self {
            timer,
            ansi,
            strip_prefix: None,
        }
    }

    /// Set the prefix to strip from log targets
    pub fn with_strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefix = Some(prefix.into());
        self
    }

    /// Target as displayed: our own prefix stripped, the bare app name hidden
    fn display_target<'a>(&self, target: &'a str) -> Option<&'a str> {
        let Some(prefix) = self.strip_prefix.as_deref() else {
            return Some(target).filter(|t| !t.is_empty());
        };

        let app_name = prefix.trim_end_matches("::");
        if target == app_name || target.is_empty() {
            return None;
        }
        Some(target.strip_prefix(prefix).unwrap_or(target))
    }
}

impl<T: Clone> Clone for CustomFormatter<T> {
    fn clone(&self) -> Self {
        Self {
            timer: self.timer.clone(),
            ansi: self.ansi,
            strip_prefix: self.strip_prefix.clone(),
        }
    }
}

impl<S, N, T> FormatEvent<S, N> for CustomFormatter<T>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: fmt::time::FormatTime,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std_fmt::Result {
        let metadata = event.metadata();

        let (dim_start, dim_end) = if self.ansi {
            ("\x1b[2m", "\x1b[0m")
        } else {
            ("", "")
        };
        let (level_color, level_str) = match *metadata.level() {
            Level::ERROR => (if self.ansi { "\x1b[31m" } else { "" }, "ERROR"),
            Level::WARN => (if self.ansi { "\x1b[33m" } else { "" }, " WARN"),
            Level::INFO => (if self.ansi { "\x1b[32m" } else { "" }, " INFO"),
            Level::DEBUG => (if self.ansi { "\x1b[34m" } else { "" }, "DEBUG"),
            Level::TRACE => (if self.ansi { "\x1b[35m" } else { "" }, "TRACE"),
        };
        let color_end = if self.ansi { "\x1b[0m" } else { "" };

        write!(writer, "{}", dim_start)?;
        self.timer.format_time(&mut writer)?;
        write!(writer, "{} ", dim_end)?;

        write!(writer, "{}{}{} ", level_color, level_str, color_end)?;

        let thread_id = format!("{:?}", std::thread::current().id());
        if let Some(num) = thread_id
            .strip_prefix("ThreadId(")
            .and_then(|s| s.strip_suffix(")"))
            .and_then(|s| s.parse::<u64>().ok())
        {
            write!(writer, "#{:03} ", num)?;
        }

        let mut extractor = FieldExtractor::default();
        event.record(&mut extractor);

        if let Some(prefix) = extractor.request_prefix() {
            write!(writer, "{}{}{}: ", dim_start, prefix, dim_end)?;
            if let Some(msg) = &extractor.message {
                write!(writer, "{}", msg)?;
            }
        } else {
            if let Some(target) = self.display_target(metadata.target()) {
                write!(writer, "{}{}{}: ", dim_start, target, dim_end)?;
            }
            ctx.field_format().format_fields(writer.by_ref(), event)?;
        }

        writeln!(writer)
    }
}

/// Create a timer with format `[year]/[month]/[day] [hour]:[minute]:[second].[subsecond digits:4]`
///
/// Falls back to UTC if the local offset cannot be determined.
pub fn create_custom_timer()
-> OffsetTime<&'static [time::format_description::BorrowedFormatItem<'static>]> {
    use time::macros::format_description;

    let format =
        format_description!("[year]/[month]/[day] [hour]:[minute]:[second].[subsecond digits:4]");
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    OffsetTime::new(offset, format)
}

/// Check if dependency logging is enabled via WB_LOGDEPS environment variable
pub fn is_dependency_logging_enabled() -> bool {
    std::env::var("WB_LOGDEPS")
        .map(|v| v == "1")
        .unwrap_or(false)
}

/// Parse a configured level name, `None` for anything unknown
pub fn parse_level(name: &str) -> Option<Level> {
    match name.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Build the filter directive for dependency logging
///
/// With `log_deps` off only bridge crates log, everything else is `off`.
pub fn build_filter_directives(level: Level, log_deps: bool) -> String {
    let level_str = match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    };

    if log_deps {
        return level_str.to_string();
    }

    let mut directives = String::from("off");
    for target in BRIDGE_TARGETS {
        directives.push_str(&format!(",{}={}", target, level_str));
    }
    directives
}

/// Detect if ANSI colors should be used based on environment
///
/// Disabled when stdout is not a TTY, `NO_COLOR` is set, or `TERM=dumb`.
pub fn should_use_ansi() -> bool {
    atty::is(atty::Stream::Stdout)
        && std::env::var("NO_COLOR").is_err()
        && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true)
}

/// Logging configuration
pub struct LogConfig<W: Write + Send + 'static = std::fs::File> {
    /// Prefix to strip from log targets (e.g., "wb_server::")
    pub strip_prefix: String,
    /// Whether to use ANSI color codes (auto-detected if None)
    pub use_ansi: Option<bool>,
    /// Minimum log level
    pub level: Level,
    /// Optional file to write logs to
    pub log_file: Option<W>,
}

impl<W: Write + Send + 'static> LogConfig<W> {
    pub fn new(strip_prefix: impl Into<String>) -> Self {
        Self {
            strip_prefix: strip_prefix.into(),
            use_ansi: None,
            level: Level::INFO,
            log_file: None,
        }
    }

    pub fn with_ansi(mut self, use_ansi: bool) -> Self {
        self.use_ansi = Some(use_ansi);
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_log_file(mut self, file: W) -> Self {
        self.log_file = Some(file);
        self
    }
}

/// Initialize logging with the given configuration
///
/// `RUST_LOG` overrides the default filter directives.
pub fn init_logging<W: Write + Send + 'static>(
    config: LogConfig<W>,
) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::EnvFilter;

    let timer = create_custom_timer();
    let use_ansi = config.use_ansi.unwrap_or_else(should_use_ansi);
    let filter_directives = build_filter_directives(config.level, is_dependency_logging_enabled());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&filter_directives));

    let formatter = CustomFormatter::new(timer.clone(), use_ansi)
        .with_strip_prefix(&config.strip_prefix);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(formatter)
        .with_ansi(use_ansi)
        .with_writer(std::io::stdout);

    if let Some(file) = config.log_file {
        let formatter_file = CustomFormatter::new(timer, false)
            .with_strip_prefix(&config.strip_prefix);

        tracing_subscriber::registry()
            .with(stdout_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .event_format(formatter_file)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .with(env_filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(stdout_layer)
            .with(env_filter)
            .try_init()?;
    }

    Ok(())
}

/// Initialize logging without a log file
pub fn init_logging_simple(
    strip_prefix: impl Into<String>,
    level: Level,
) -> Result<(), Box<dyn std::error::Error>> {
    let config: LogConfig<std::fs::File> = LogConfig::new(strip_prefix).with_level(level);
    init_logging(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_without_deps() {
        let directives = build_filter_directives(Level::DEBUG, false);
        assert!(directives.starts_with("off,"));
        assert!(directives.contains("wb_bridge=debug"));
        assert!(directives.contains("wb_server=debug"));
        assert!(!directives.contains("tokio"));
    }

    #[test]
    fn test_filter_directives_with_deps() {
        assert_eq!(build_filter_directives(Level::WARN, true), "warn");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("INFO"), Some(Level::INFO));
        assert_eq!(parse_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_request_prefix() {
        let mut extractor = FieldExtractor::default();
        assert_eq!(extractor.request_prefix(), None);

        extractor.action = Some("setProperty".into());
        assert_eq!(extractor.request_prefix().as_deref(), Some("setProperty"));

        extractor.request_id = Some(12);
        assert_eq!(extractor.request_prefix().as_deref(), Some("setProperty#12"));
    }

    #[test]
    fn test_display_target_strips_own_prefix() {
        let formatter = CustomFormatter::new((), false).with_strip_prefix("wb_server::");
        assert_eq!(formatter.display_target("wb_server::editor_worker"), Some("editor_worker"));
        assert_eq!(formatter.display_target("wb_server"), None);
        assert_eq!(formatter.display_target("wb_bridge::dispatcher"), Some("wb_bridge::dispatcher"));
    }
}
