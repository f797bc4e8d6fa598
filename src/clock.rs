//! Epoch-seconds clock helper shared by the dispatcher, sinks, and analyzer.

/// Current time as epoch seconds.
pub fn now_epoch_seconds() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
