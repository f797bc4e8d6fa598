//! A structured logging dispatcher with an embedded log-pattern
//! analysis engine.
//!
//! Two subsystems carry the design:
//! - the [`logger`] dispatcher: a thread-safe, multi-sink pipeline with
//!   buffered/asynchronous delivery, a circular-buffer staging area, a
//!   generic buffer pool, and size-based log-file rotation.
//! - the [`analyzer`] pattern engine: a concurrent, bounded map of
//!   message templates keyed by hash, with approximate-match fallback,
//!   variable extraction, rule-based auto-categorization, and
//!   age/size-based eviction.

pub mod analyzer;
pub mod backend;
pub mod buffer;
pub mod clock;
pub mod config;
pub mod diag;
pub mod error;
pub mod format;
pub mod global;
pub mod levels;
pub mod logger;
pub mod pool;
pub mod sink;
pub mod types;

pub use analyzer::{AnalyzerConfig, PatternAnalyzer};
pub use backend::{ConsoleSink, FileSink, Stream};
pub use buffer::CircularBuffer;
pub use config::{LogBuilder, LogConfig};
pub use error::{LogError, Result};
pub use levels::Level;
pub use logger::{Logger, SinkHandle};
pub use pool::{Pool, PoolStats};
pub use sink::Sink;
pub use types::{
    CategoryRule, LogMetadata, Pattern, PatternMetadata, PatternType, RegexKey, Variable,
    VariableRule, VariableType,
};
