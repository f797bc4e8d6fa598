//! File sink with buffered writes and size-triggered numbered rotation.

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use parking_lot::Mutex;

use crate::buffer::CircularBuffer;
use crate::error::{LogError, Result};
use crate::format::format_line;
use crate::levels::Level;
use crate::sink::Sink;
use crate::types::LogMetadata;

struct State {
    file: Option<File>,
    current_size: u64,
    last_flush: Instant,
    /// Set once the rotation protocol fails partway through; writes are
    /// refused until the sink is reinitialized.
    degraded: bool,
}

/// Buffered file sink. Owns a staging [`CircularBuffer`] and a counter of
/// bytes written to the active file since open or last rotation.
pub struct FileSink {
    path: PathBuf,
    max_file_size: u64,
    enable_rotation: bool,
    max_rotated_files: usize,
    flush_interval_ms: u64,
    staging: CircularBuffer,
    state: Mutex<State>,
}

impl FileSink {
    pub fn new(
        path: impl AsRef<Path>,
        buffer_size: usize,
        max_file_size: u64,
        enable_rotation: bool,
        max_rotated_files: usize,
        flush_interval_ms: u64,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let current_size = file.metadata()?.len();

        Ok(FileSink {
            path,
            max_file_size,
            enable_rotation,
            max_rotated_files,
            flush_interval_ms,
            staging: CircularBuffer::new(buffer_size),
            state: Mutex::new(State {
                file: Some(file),
                current_size,
                last_flush: Instant::now(),
                degraded: false,
            }),
        })
    }

    fn should_flush(&self) -> bool {
        let len = self.staging.len();
        let cap = self.staging.capacity().max(1);
        if len * 2 >= cap {
            return true;
        }
        let state = self.state.lock();
        state.last_flush.elapsed().as_millis() as u64 >= self.flush_interval_ms
    }

    /// Renames `path.<i-1>` to `path.<i>` for `i` from `max_rotated_files`
    /// down to 1, then promotes the just-closed active file to `path.1`,
    /// and opens a fresh active file. Entered with the active file handle
    /// already closed.
    fn rotate(&self, state: &mut State) -> Result<()> {
        let rotated = |i: usize| -> PathBuf {
            let mut name = self.path.as_os_str().to_os_string();
            name.push(format!(".{i}"));
            PathBuf::from(name)
        };

        for i in (1..=self.max_rotated_files).rev() {
            let src = if i == 1 {
                // Conceptually "path.0", i.e. the active file — never
                // present on disk under that name, so this is always a
                // not-found that step 3 below handles explicitly.
                None
            } else {
                Some(rotated(i - 1))
            };
            if let Some(src) = src {
                match std::fs::rename(&src, rotated(i)) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        state.degraded = true;
                        return Err(LogError::FileRotationFailed(e.to_string()));
                    }
                }
            }
        }

        if self.max_rotated_files >= 1 {
            if let Err(e) = std::fs::rename(&self.path, rotated(1)) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    state.degraded = true;
                    return Err(LogError::FileRotationFailed(e.to_string()));
                }
            }
        }

        let fresh = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| {
                state.degraded = true;
                LogError::FileRotationFailed(e.to_string())
            })?;
        state.file = Some(fresh);
        state.current_size = 0;
        Ok(())
    }

    fn drain_to_file(&self, state: &mut State) -> Result<()> {
        let mut chunk = [0u8; 4096];
        loop {
            match self.staging.read(&mut chunk) {
                Ok(n) if n > 0 => {
                    if let Some(file) = state.file.as_mut() {
                        file.write_all(&chunk[..n])?;
                        state.current_size += n as u64;
                    }
                }
                Ok(_) => break,
                Err(LogError::BufferUnderflow) => break,
                Err(e) => return Err(e),
            }
        }
        if let Some(file) = state.file.as_ref() {
            file.sync_all()?;
        }
        state.last_flush = Instant::now();
        Ok(())
    }
}

impl Sink for FileSink {
    fn write(&self, level: Level, message: &str, metadata: Option<&LogMetadata>) -> Result<()> {
        {
            let state = self.state.lock();
            if state.degraded {
                return Err(LogError::FileRotationFailed(
                    "sink is degraded after a failed rotation".into(),
                ));
            }
        }

        let line = format_line(level, message, metadata, false);
        let mut bytes = line.as_bytes();

        if bytes.len() > self.staging.capacity() {
            // Larger than the staging buffer can ever hold: flush what's
            // pending, then write this record straight through.
            self.flush()?;
            let mut state = self.state.lock();
            if let Some(file) = state.file.as_mut() {
                file.write_all(bytes)?;
                state.current_size += bytes.len() as u64;
            }
            bytes = &[];
        }

        while !bytes.is_empty() {
            let written = self.staging.write(bytes)?;
            if written == 0 {
                self.flush()?;
                continue;
            }
            bytes = &bytes[written..];
        }

        if self.should_flush() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.degraded {
            return Err(LogError::FileRotationFailed(
                "sink is degraded after a failed rotation".into(),
            ));
        }
        self.drain_to_file(&mut state)?;

        if self.enable_rotation && state.current_size >= self.max_file_size {
            state.file = None; // step 1: close current handle
            self.rotate(&mut state)?;
        }
        Ok(())
    }

    fn close(&self) {
        let _ = self.flush();
        let mut state = self.state.lock();
        state.file = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_accumulate_and_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path, 4096, u64::MAX, false, 0, 100).unwrap();
        sink.write(Level::Info, "hello", None).unwrap();
        sink.flush().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello"));
    }

    #[test]
    fn flush_is_idempotent_with_no_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path, 4096, u64::MAX, false, 0, 100).unwrap();
        sink.flush().unwrap();
        sink.flush().unwrap();
    }

    #[test]
    fn rotation_moves_content_to_numbered_sibling() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path, 4096, 100, true, 3, 100).unwrap();

        // Write enough to exceed 100 bytes, then flush to trigger rotation.
        for _ in 0..20 {
            sink.write(Level::Info, "0123456789", None).unwrap();
        }
        sink.flush().unwrap();

        let rotated = dir.path().join("app.log.1");
        assert!(rotated.exists());
        let rotated_content = std::fs::read_to_string(&rotated).unwrap();
        assert!(rotated_content.len() >= 100);
    }

    #[test]
    fn fourth_rotation_discards_oldest_sibling() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path, 4096, 50, true, 3, 100).unwrap();

        for round in 0..4 {
            for _ in 0..10 {
                sink.write(Level::Info, "0123456789", None).unwrap();
            }
            sink.flush().unwrap();
            let _ = round;
        }

        assert!(dir.path().join("app.log").exists());
        assert!(dir.path().join("app.log.1").exists());
        assert!(dir.path().join("app.log.2").exists());
        assert!(dir.path().join("app.log.3").exists());
    }

    #[test]
    fn close_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path, 4096, u64::MAX, false, 0, 100).unwrap();
        sink.close();
        sink.close();
    }
}
