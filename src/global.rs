//! Optional process-wide default logger handle.
//!
//! Not depended on by [`crate::logger::Logger`] or the analyzer — purely
//! an opt-in convenience layer, guarded by a single lock behind a lazy
//! static.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::config::LogConfig;
use crate::error::{LogError, Result};
use crate::logger::Logger;

static DEFAULT_LOGGER: Lazy<Mutex<Option<Arc<Logger>>>> = Lazy::new(|| Mutex::new(None));

/// Initializes the default logger with [`LogConfig::default`]. Fails
/// with `AlreadyInitialized` if a default logger is already set.
pub fn init() -> Result<()> {
    init_with_config(LogConfig::default())
}

/// Initializes the default logger with the given config.
pub fn init_with_config(config: LogConfig) -> Result<()> {
    let mut slot = DEFAULT_LOGGER.lock();
    if slot.is_some() {
        return Err(LogError::AlreadyInitialized);
    }
    *slot = Some(Arc::new(Logger::init(config)?));
    Ok(())
}

/// Closes and clears the default logger, if any. A no-op if uninitialized.
pub fn deinit() {
    let mut slot = DEFAULT_LOGGER.lock();
    if let Some(logger) = slot.take() {
        logger.close();
    }
}

/// `true` iff a default logger is currently set.
pub fn is_initialized() -> bool {
    DEFAULT_LOGGER.lock().is_some()
}

/// Returns the default logger, if one is initialized.
pub fn get_default_logger() -> Option<Arc<Logger>> {
    DEFAULT_LOGGER.lock().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test_free::lock;

    // The default logger is process-global state; serialize these tests
    // with a crate-local mutex so they don't race each other under
    // parallel test execution within this binary.
    mod serial_test_free {
        use parking_lot::{Mutex, MutexGuard};

        static GUARD: Mutex<()> = Mutex::new(());

        pub fn lock() -> MutexGuard<'static, ()> {
            GUARD.lock()
        }
    }

    #[test]
    fn double_init_fails() {
        let _g = lock();
        deinit();
        init().unwrap();
        assert!(is_initialized());
        let err = init().unwrap_err();
        assert!(matches!(err, LogError::AlreadyInitialized));
        deinit();
    }

    #[test]
    fn deinit_allows_reinit() {
        let _g = lock();
        deinit();
        init().unwrap();
        deinit();
        assert!(!is_initialized());
        init().unwrap();
        deinit();
    }

    #[test]
    fn get_default_logger_reflects_state() {
        let _g = lock();
        deinit();
        assert!(get_default_logger().is_none());
        init().unwrap();
        assert!(get_default_logger().is_some());
        deinit();
    }
}
