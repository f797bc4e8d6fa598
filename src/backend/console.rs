//! Console sink: synchronous writes to stderr or stdout.

use std::io::Write;

use parking_lot::Mutex;

use crate::error::Result;
use crate::format::format_line;
use crate::levels::Level;
use crate::sink::Sink;
use crate::types::LogMetadata;

/// Which standard stream a [`ConsoleSink`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stderr,
    Stdout,
}

/// Synchronous console sink. `flush` is a no-op: the standard streams
/// are unbuffered from this sink's perspective.
pub struct ConsoleSink {
    stream: Stream,
    colors: bool,
    // Serializes interleaved writes from concurrent callers so bytes of
    // different records never interleave on the stream.
    lock: Mutex<()>,
}

impl ConsoleSink {
    pub fn new(stream: Stream, colors: bool) -> Self {
        ConsoleSink {
            stream,
            colors,
            lock: Mutex::new(()),
        }
    }
}

impl Sink for ConsoleSink {
    fn write(&self, level: Level, message: &str, metadata: Option<&LogMetadata>) -> Result<()> {
        let line = format_line(level, message, metadata, self.colors);
        let _guard = self.lock.lock();
        match self.stream {
            Stream::Stderr => {
                let mut out = std::io::stderr();
                out.write_all(line.as_bytes())?;
            }
            Stream::Stdout => {
                let mut out = std::io::stdout();
                out.write_all(line.as_bytes())?;
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) {}
}
