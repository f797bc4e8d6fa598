//! Severity level model.
//!
//! Defines the total order `trace < debug < info < warn < err < critical`
//! used to gate and label log records.

/// Log severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Err,
    Critical,
}

impl Level {
    /// Parse a level name, case-insensitive. Unknown names return `None`.
    pub fn parse(name: &str) -> Option<Level> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "err" | "error" => Some(Level::Err),
            "critical" | "fatal" => Some(Level::Critical),
            _ => None,
        }
    }

    /// Upper-case display name for line formatting.
    pub fn display_name(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Err => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// SGR color escape for this level. Always paired with
    /// `COLOR_RESET` by the caller.
    pub fn color_escape(self) -> &'static str {
        match self {
            Level::Trace => "\x1b[90m",
            Level::Debug => "\x1b[36m",
            Level::Info => "\x1b[32m",
            Level::Warn => "\x1b[33m",
            Level::Err => "\x1b[31m",
            Level::Critical => "\x1b[35m",
        }
    }
}

/// SGR reset escape, paired with any [`Level::color_escape`].
pub const COLOR_RESET: &str = "\x1b[0m";
