//! Background drain thread for the dispatcher's async delivery mode.
//! Wakes on a fixed 100 ms tick and whenever the staging buffer crosses
//! its fill threshold, draining a shared [`CircularBuffer`] of encoded
//! records into the dispatcher's sinks.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, Sender};
use parking_lot::RwLock;

use crate::buffer::CircularBuffer;
use crate::error::LogError;
use crate::sink::Sink;

use super::codec;

/// Periodic leg of the drain loop, independent of any per-sink flush
/// interval.
const TICK: Duration = Duration::from_millis(100);

/// Buffer is considered full enough to drain early once at least 3/4
/// of its capacity holds unread bytes.
pub(crate) fn crosses_drain_threshold(len: usize, capacity: usize) -> bool {
    capacity > 0 && len * 4 >= capacity * 3
}

fn drain_available(buffer: &CircularBuffer, sinks: &RwLock<Vec<Box<dyn Sink>>>) {
    let mut pending = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match buffer.read(&mut chunk) {
            Ok(n) if n > 0 => pending.extend_from_slice(&chunk[..n]),
            Ok(_) => break,
            Err(LogError::BufferUnderflow) => break,
            Err(_) => break,
        }
    }
    if pending.is_empty() {
        return;
    }

    let mut offset = 0;
    while let Some((level, message, metadata, consumed)) = codec::decode(&pending[offset..]) {
        let guard = sinks.read();
        for sink in guard.iter() {
            if let Err(e) = sink.write(level, &message, metadata.as_ref()) {
                crate::diag::report_sink_error(&e);
            }
        }
        offset += consumed;
    }

    if offset < pending.len() {
        // Trailing partial frame: the producer's write raced with this
        // drain. Push it back so the next pass completes it in order.
        let _ = buffer.write(&pending[offset..]);
    }
}

/// Owns the background thread that drains a dispatcher's staging buffer
/// into its sinks. Stopping joins the thread after one final drain, so
/// nothing staged before `stop()` is lost.
pub struct AsyncWriter {
    stop_tx: Sender<()>,
    wake_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl AsyncWriter {
    pub fn spawn(buffer: Arc<CircularBuffer>, sinks: Arc<RwLock<Vec<Box<dyn Sink>>>>) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (wake_tx, wake_rx) = bounded::<()>(1);

        let handle = thread::spawn(move || loop {
            select! {
                recv(stop_rx) -> _ => {
                    drain_available(&buffer, &sinks);
                    break;
                }
                recv(wake_rx) -> _ => {
                    drain_available(&buffer, &sinks);
                }
                default(TICK) => {
                    drain_available(&buffer, &sinks);
                }
            }
        });

        AsyncWriter {
            stop_tx,
            wake_tx,
            handle: Some(handle),
        }
    }

    /// Nudges the drain thread to run immediately rather than waiting for
    /// the next tick. Non-blocking: a wake already pending is enough, so
    /// a full channel is not an error.
    pub fn wake(&self) {
        let _ = self.wake_tx.try_send(());
    }

    /// Signals the drain thread to perform one last drain and exit, then
    /// waits for it. Safe to call more than once.
    pub fn stop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AsyncWriter {
    fn drop(&mut self) {
        self.stop();
    }
}
