//! Sink (handler) interface.
//!
//! A small closed set of sinks exist in practice, but the contract is
//! polymorphic: a capability record of `{write, flush, close}` satisfied
//! here by a trait object.

use crate::error::Result;
use crate::levels::Level;
use crate::types::LogMetadata;

/// Uniform write/flush/close contract every sink implements.
///
/// `close` must be safe to call more than once.
pub trait Sink: Send + Sync {
    /// Writes one formatted record.
    fn write(&self, level: Level, message: &str, metadata: Option<&LogMetadata>) -> Result<()>;

    /// Flushes any buffered bytes to their destination.
    fn flush(&self) -> Result<()>;

    /// Releases resources held by this sink. Idempotent.
    fn close(&self);
}
