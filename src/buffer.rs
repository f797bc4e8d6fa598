//! Fixed-capacity circular byte buffer.
//!
//! Used as the dispatcher's async staging area and as the file sink's
//! write-coalescing buffer. A single lock serialises all mutation.

use parking_lot::Mutex;

use crate::error::{LogError, Result};

struct Inner {
    data: Vec<u8>,
    read_pos: usize,
    write_pos: usize,
    full: bool,
}

impl Inner {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn len(&self) -> usize {
        if self.full {
            self.capacity()
        } else if self.write_pos >= self.read_pos {
            self.write_pos - self.read_pos
        } else {
            self.capacity() - self.read_pos + self.write_pos
        }
    }

    fn is_empty(&self) -> bool {
        !self.full && self.read_pos == self.write_pos
    }

    fn free(&self) -> usize {
        self.capacity() - self.len()
    }
}

/// Fixed-capacity FIFO byte buffer with bounded, lock-protected access.
///
/// Invariants: `read_pos, write_pos` stay within `[0, capacity)`; empty
/// iff `read_pos == write_pos && !full`; full iff `read_pos ==
/// write_pos && full`; `len() + free_capacity() == capacity()` always.
pub struct CircularBuffer {
    inner: Mutex<Inner>,
}

impl CircularBuffer {
    /// Creates a buffer with the given fixed capacity in bytes.
    pub fn new(capacity: usize) -> Self {
        CircularBuffer {
            inner: Mutex::new(Inner {
                data: vec![0u8; capacity],
                read_pos: 0,
                write_pos: 0,
                full: false,
            }),
        }
    }

    /// Total byte capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Number of unread bytes currently stored.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// `true` iff no unread bytes remain.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Bytes of free space remaining.
    pub fn free_capacity(&self) -> usize {
        self.inner.lock().free()
    }

    /// Discards all buffered content, returning the buffer to empty.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.read_pos = 0;
        inner.write_pos = 0;
        inner.full = false;
    }

    /// Writes as much of `data` as fits, returning the number of bytes
    /// written. Fails with `BufferOverflow` if `data` is longer than the
    /// buffer's total capacity — no bytes are written in that case.
    /// Otherwise a short count is returned if the buffer fills mid-write.
    pub fn write(&self, data: &[u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        if data.len() > inner.capacity() {
            return Err(LogError::BufferOverflow);
        }

        let to_write = data.len().min(inner.free());
        let cap = inner.capacity();
        for (i, byte) in data.iter().take(to_write).enumerate() {
            let pos = (inner.write_pos + i) % cap;
            inner.data[pos] = *byte;
        }
        inner.write_pos = (inner.write_pos + to_write) % cap.max(1);
        if to_write > 0 && inner.write_pos == inner.read_pos {
            inner.full = true;
        }
        Ok(to_write)
    }

    /// Copies up to `dst.len()` bytes into `dst`, returning the number of
    /// bytes read. Fails with `BufferUnderflow` if the buffer is empty on
    /// entry.
    pub fn read(&self, dst: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        if inner.is_empty() {
            return Err(LogError::BufferUnderflow);
        }

        let available = inner.len();
        let to_read = dst.len().min(available);
        let cap = inner.capacity();
        for (i, slot) in dst.iter_mut().take(to_read).enumerate() {
            let pos = (inner.read_pos + i) % cap;
            *slot = inner.data[pos];
        }
        inner.read_pos = (inner.read_pos + to_read) % cap.max(1);
        if to_read > 0 {
            inner.full = false;
        }
        Ok(to_read)
    }
}
