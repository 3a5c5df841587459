//! Shared pipeline state: the live buffer, the chunk queue, and the sink.

use crate::config::ShipperConfig;
use crate::constants;
use crate::queue::ChunkQueue;
use bytes::Bytes;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// The live byte accumulator, plus the timestamp of its last rotation.
struct BufferState {
    bytes: Vec<u8>,
    last_rotation: Instant,
}

/// State shared between writer handles (sync) and the flusher (async).
///
/// Two distinct locks on purpose: the buffer lock is held only for the short
/// copy-and-threshold-check section of a write (including an inline rotation
/// when the threshold trips), so writers are never blocked by an in-flight
/// drain. The chunk queue has its own lock, and drain passes serialize
/// through the flusher's pass guard rather than by holding either of these.
pub(crate) struct Pipeline {
    pub(crate) config: ShipperConfig,
    sink: Mutex<Box<dyn Write + Send>>,
    buffer: Mutex<BufferState>,
    pub(crate) queue: ChunkQueue,
    /// Set while writes are being excluded at the backpressure ceiling, so
    /// the drop diagnostic fires once per episode instead of per write.
    dropping: AtomicBool,
}

impl Pipeline {
    pub(crate) fn new(config: ShipperConfig, sink: Box<dyn Write + Send>) -> Self {
        Pipeline {
            config,
            sink: Mutex::new(sink),
            buffer: Mutex::new(BufferState {
                bytes: Vec::new(),
                last_rotation: Instant::now(),
            }),
            queue: ChunkQueue::default(),
            dropping: AtomicBool::new(false),
        }
    }

    /// The writer contract: the sink always receives the bytes and its
    /// result is the caller's result. Shipping state only decides whether
    /// the bytes are additionally buffered for upload; it can never fail the
    /// write. Zero-length writes are forwarded but otherwise a no-op.
    pub(crate) fn write_bytes(&self, p: &[u8]) -> io::Result<usize> {
        if !p.is_empty() {
            if let Some(msg) = self.buffer_for_shipping(p) {
                self.diag(&msg);
            }
        }
        let mut sink = self.sink.lock().expect("lock poisoned");
        sink.write_all(p)?;
        Ok(p.len())
    }

    /// Copies a write into the live buffer, rotating inline when the buffer
    /// reaches the threshold. Returns a diagnostic to emit after the lock is
    /// released, if any.
    fn buffer_for_shipping(&self, p: &[u8]) -> Option<String> {
        let mut state = self.buffer.lock().expect("lock poisoned");
        // Pending bytes are measured before this write. One write may
        // overshoot the ceiling because the check and the copy are not
        // globally atomic; that transient overshoot is bounded by a single
        // write and accepted.
        let pending = state.bytes.len() + self.queue.pending_bytes();
        if pending >= self.config.max_pending_bytes {
            if !self.dropping.swap(true, Ordering::Relaxed) {
                return Some(format!(
                    "pending bytes at ceiling ({pending}), excluding further writes from shipment"
                ));
            }
            return None;
        }
        let resumed = self.dropping.swap(false, Ordering::Relaxed);
        state.bytes.extend_from_slice(p);
        if state.bytes.len() >= self.config.rotate_threshold_bytes {
            Self::rotate_locked(&mut state, &self.queue);
        }
        resumed.then(|| "pending bytes back under ceiling, shipment buffering resumed".to_string())
    }

    /// Seals the buffer into an immutable chunk on the queue tail and resets
    /// it. A genuinely empty buffer produces no chunk. Callers must hold the
    /// buffer lock; the passed state is the proof.
    fn rotate_locked(state: &mut BufferState, queue: &ChunkQueue) {
        if !state.bytes.is_empty() {
            queue.push_tail(Bytes::from(std::mem::take(&mut state.bytes)));
        }
        state.last_rotation = Instant::now();
    }

    /// Scheduled-rotation condition: rotate only when the buffer is
    /// non-empty, the flush interval has elapsed since the last rotation,
    /// and pending bytes have not already reached the ceiling.
    pub(crate) fn rotate_if_due(&self) {
        let mut state = self.buffer.lock().expect("lock poisoned");
        if state.bytes.is_empty() {
            return;
        }
        if state.last_rotation.elapsed() < self.config.flush_interval() {
            return;
        }
        if state.bytes.len() + self.queue.pending_bytes() >= self.config.max_pending_bytes {
            return;
        }
        Self::rotate_locked(&mut state, &self.queue);
    }

    /// Unconditional rotation for a manual flush. The ceiling does not apply
    /// here: rotation moves bytes the write path already admitted, so it
    /// never increases pending bytes.
    pub(crate) fn force_rotate(&self) {
        let mut state = self.buffer.lock().expect("lock poisoned");
        Self::rotate_locked(&mut state, &self.queue);
    }

    /// Bytes currently held for shipping: live buffer plus queued chunks,
    /// recomputed on demand.
    pub(crate) fn pending_bytes(&self) -> usize {
        let buffered = self.buffer.lock().expect("lock poisoned").bytes.len();
        buffered + self.queue.pending_bytes()
    }

    /// Length of the live buffer alone.
    #[cfg(test)]
    pub(crate) fn buffered_bytes(&self) -> usize {
        self.buffer.lock().expect("lock poisoned").bytes.len()
    }

    /// Writes one of the pipeline's own operational messages straight to the
    /// sink. Diagnostics are excluded from the buffer and queue so that
    /// diagnosing a shipping failure cannot generate more data to ship.
    /// Sink errors on this path are swallowed.
    pub(crate) fn diag(&self, msg: &str) {
        let mut sink = self.sink.lock().expect("lock poisoned");
        let _ = writeln!(sink, "{} | {msg}", constants::DIAG_PREFIX);
    }

    pub(crate) fn flush_sink(&self) -> io::Result<()> {
        self.sink.lock().expect("lock poisoned").flush()
    }

    #[cfg(test)]
    fn backdate_last_rotation(&self, by: std::time::Duration) {
        let mut state = self.buffer.lock().expect("lock poisoned");
        state.last_rotation = Instant::now() - by;
    }
}
