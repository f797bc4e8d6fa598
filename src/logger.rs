//! Logger / dispatcher.
//!
//! Gates by level, fans a record out to every registered sink in
//! registration order, and — in async mode — stages formatted records
//! through a circular buffer drained by a background thread instead of
//! writing to sinks on the caller's thread.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::analyzer::PatternAnalyzer;
use crate::backend::async_writer::crosses_drain_threshold;
use crate::backend::codec;
use crate::backend::AsyncWriter;
use crate::buffer::CircularBuffer;
use crate::config::LogConfig;
use crate::error::{LogError, Result};
use crate::levels::Level;
use crate::pool::Pool;
use crate::sink::Sink;
use crate::types::LogMetadata;

struct AsyncState {
    // Kept alive for its bookkeeping even though this logger only ever
    // acquires the one slot it needs.
    pool: Pool<Arc<CircularBuffer>>,
    buffer_index: usize,
    buffer: Arc<CircularBuffer>,
    writer: Mutex<Option<AsyncWriter>>,
}

/// Thread-safe, multi-sink log dispatcher.
pub struct Logger {
    min_level: Level,
    enable_metadata: bool,
    async_mode: bool,
    sinks: Arc<RwLock<Vec<Box<dyn Sink>>>>,
    async_state: Option<AsyncState>,
    analyzer: Option<Arc<PatternAnalyzer>>,
}

/// Opaque handle returned by [`Logger::add_sink`], the address of the
/// sink's trait object — stable for the sink's lifetime in the registry
/// since it lives behind a `Box`.
pub type SinkHandle = usize;

fn handle_of(sink: &dyn Sink) -> SinkHandle {
    sink as *const dyn Sink as *const () as usize
}

impl Logger {
    /// Builds a logger from a validated [`LogConfig`], constructing its
    /// console/file sinks and, in async mode, its staging buffer and
    /// background drain thread.
    pub fn init(config: LogConfig) -> Result<Logger> {
        let sinks = config.build_sinks()?;
        let sinks = Arc::new(RwLock::new(sinks));

        let async_state = if config.async_mode {
            let buffer_size = config.buffer_size;
            let pool: Pool<Arc<CircularBuffer>> = Pool::new(
                1,
                move || Arc::new(CircularBuffer::new(buffer_size)),
                |_| {},
            );
            let buffer_index = pool.acquire();
            let buffer = pool.with(buffer_index, Arc::clone);
            let writer = AsyncWriter::spawn(buffer.clone(), sinks.clone());
            Some(AsyncState {
                pool,
                buffer_index,
                buffer,
                writer: Mutex::new(Some(writer)),
            })
        } else {
            None
        };

        Ok(Logger {
            min_level: config.min_level,
            enable_metadata: config.enable_metadata,
            async_mode: config.async_mode,
            sinks,
            async_state,
            analyzer: config
                .analyzer_config
                .map(|c| Arc::new(PatternAnalyzer::new(c))),
        })
    }

    /// Dispatches one record. Returns `Ok(())` without doing any work if
    /// `level` is below the configured minimum.
    pub fn log(&self, level: Level, message: &str, metadata: Option<LogMetadata>) -> Result<()> {
        if level < self.min_level {
            return Ok(());
        }
        let metadata = if self.enable_metadata { metadata } else { None };

        if self.async_mode {
            let state = self
                .async_state
                .as_ref()
                .expect("async_mode implies async_state is populated");
            let mut bytes = codec::encode(level, message, metadata.as_ref());
            loop {
                let written = state.buffer.write(&bytes)?;
                if written == bytes.len() {
                    break;
                }
                bytes.drain(..written);
                if bytes.is_empty() {
                    break;
                }
                std::thread::yield_now();
            }
            if crosses_drain_threshold(state.buffer.len(), state.buffer.capacity()) {
                if let Some(writer) = state.writer.lock().as_ref() {
                    writer.wake();
                }
            }
            return Ok(());
        }

        self.dispatch_sync(level, message, metadata.as_ref())
    }

    fn dispatch_sync(
        &self,
        level: Level,
        message: &str,
        metadata: Option<&LogMetadata>,
    ) -> Result<()> {
        let guard = self.sinks.read();
        let mut errors = Vec::new();
        for sink in guard.iter() {
            if let Err(e) = sink.write(level, message, metadata) {
                crate::diag::report_sink_error(&e);
                errors.push(e);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LogError::SinkErrors(errors))
        }
    }

    /// Registers a sink, transferring ownership to the logger. Returns a
    /// handle usable with [`Logger::remove_sink`].
    pub fn add_sink(&self, sink: Box<dyn Sink>) -> SinkHandle {
        let handle = handle_of(sink.as_ref());
        self.sinks.write().push(sink);
        handle
    }

    /// Removes and closes a previously registered sink. A handle that no
    /// longer refers to a registered sink is a no-op.
    pub fn remove_sink(&self, handle: SinkHandle) {
        let mut guard = self.sinks.write();
        if let Some(pos) = guard.iter().position(|s| handle_of(s.as_ref()) == handle) {
            let sink = guard.remove(pos);
            sink.close();
        }
    }

    /// Flushes the async staging buffer (if any) and every sink, in
    /// registration order. Errors from individual sinks are aggregated.
    pub fn flush(&self) -> Result<()> {
        if let Some(state) = &self.async_state {
            let mut chunk = [0u8; 4096];
            let mut pending = Vec::new();
            loop {
                match state.buffer.read(&mut chunk) {
                    Ok(n) if n > 0 => pending.extend_from_slice(&chunk[..n]),
                    Ok(_) => break,
                    Err(LogError::BufferUnderflow) => break,
                    Err(e) => return Err(e),
                }
            }
            let mut offset = 0;
            let guard = self.sinks.read();
            while let Some((level, message, metadata, consumed)) = codec::decode(&pending[offset..])
            {
                for sink in guard.iter() {
                    let _ = sink.write(level, &message, metadata.as_ref());
                }
                offset += consumed;
            }
            if offset < pending.len() {
                let _ = state.buffer.write(&pending[offset..]);
            }
        }

        let guard = self.sinks.read();
        let mut errors = Vec::new();
        for sink in guard.iter() {
            if let Err(e) = sink.flush() {
                crate::diag::report_sink_error(&e);
                errors.push(e);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LogError::SinkErrors(errors))
        }
    }

    /// Returns the logger's pattern analyzer, if one was configured.
    pub fn analyzer(&self) -> Option<&Arc<PatternAnalyzer>> {
        self.analyzer.as_ref()
    }

    /// Deterministic shutdown: stops the background drain thread (which
    /// performs one last drain), flushes, then closes every sink.
    /// Idempotent.
    pub fn close(&self) {
        if let Some(state) = &self.async_state {
            if let Some(mut writer) = state.writer.lock().take() {
                writer.stop();
            }
            state.pool.release(state.buffer_index);
        }
        let _ = self.flush();
        let guard = self.sinks.read();
        for sink in guard.iter() {
            sink.close();
        }
    }
}
