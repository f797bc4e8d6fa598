//! Internal diagnostic stream.
//!
//! When a sink errors during dispatch, the error is captured and
//! reported here rather than aborting delivery to the other sinks. This
//! crate can't depend on itself for its own error reporting, so this is
//! a plain stderr writer underneath any higher-level formatting.

use chrono::Utc;

use crate::error::LogError;

/// Reports a sink failure that the dispatcher already decided not to
/// propagate as a hard error.
pub fn report_sink_error(err: &LogError) {
    eprintln!(
        "[cratebox] {} sink error: {err}",
        Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_does_not_panic() {
        report_sink_error(&LogError::BufferOverflow);
    }
}
