//! Error taxonomy.
//!
//! A flat enum rather than wrapping a foreign error type — this crate
//! has no host-language boundary to convert into, so `Display` carries
//! the full message.

use std::fmt;

/// Errors raised by the dispatcher, sinks, buffer, pool, and analyzer.
#[derive(Debug)]
pub enum LogError {
    /// Circular write asked to accept more than capacity.
    BufferOverflow,
    /// Circular read from an empty buffer.
    BufferUnderflow,
    /// Pool has no free slot and growth is disallowed.
    BufferFull,
    /// Formatted record exceeds the format scratch buffer.
    MessageTooLarge,
    /// Contradictory configuration (e.g. file logging with no path).
    InvalidConfiguration(String),
    /// Global default-logger double init.
    AlreadyInitialized,
    /// Any step 2-4 of the rotation protocol failed.
    FileRotationFailed(String),
    /// OS refused exclusive access when required.
    FileLockFailed(String),
    /// Format arguments do not match the template.
    FormattingError(String),
    /// Reserved for a future filter subsystem.
    FilterError(String),
    /// Allocation failure.
    OutOfMemory,
    /// One or more sinks failed during a fan-out write or flush; delivery
    /// to the remaining sinks still proceeded.
    SinkErrors(Vec<LogError>),
    /// Underlying I/O failure not covered by a more specific kind.
    Io(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::BufferOverflow => write!(f, "circular buffer write exceeds capacity"),
            LogError::BufferUnderflow => write!(f, "circular buffer read from empty buffer"),
            LogError::BufferFull => write!(f, "pool has no free slot and growth is disallowed"),
            LogError::MessageTooLarge => {
                write!(f, "formatted record exceeds the format scratch buffer")
            }
            LogError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            LogError::AlreadyInitialized => write!(f, "default logger is already initialized"),
            LogError::FileRotationFailed(msg) => write!(f, "file rotation failed: {msg}"),
            LogError::FileLockFailed(msg) => write!(f, "failed to lock log file: {msg}"),
            LogError::FormattingError(msg) => write!(f, "formatting error: {msg}"),
            LogError::FilterError(msg) => write!(f, "filter error: {msg}"),
            LogError::OutOfMemory => write!(f, "allocation failure"),
            LogError::SinkErrors(errs) => {
                write!(f, "{} sink(s) failed: ", errs.len())?;
                for (i, e) in errs.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{e}")?;
                }
                Ok(())
            }
            LogError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for LogError {}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::Io(err.to_string())
    }
}

/// Convenient result alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = LogError::InvalidConfiguration("file logging enabled with no path".into());
        assert!(err.to_string().contains("file logging enabled"));
    }

    #[test]
    fn sink_errors_join_messages() {
        let err = LogError::SinkErrors(vec![LogError::BufferOverflow, LogError::OutOfMemory]);
        let msg = err.to_string();
        assert!(msg.contains("2 sink(s) failed"));
        assert!(msg.contains("capacity"));
        assert!(!msg.contains("Allocation")); // lowercase message, not title case
    }
}
