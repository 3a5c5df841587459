//! FIFO queue of sealed chunks awaiting upload.

use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Ordered collection of immutable chunks pending delivery.
///
/// Chunks enter at the tail when the live buffer is rotated and leave from
/// the head only after the ingest endpoint confirms delivery. A chunk is
/// never reordered, mutated, or re-queued anywhere but the head, so queue
/// order always equals chunk creation order.
///
/// The deque lock guards individual operations only; drain passes serialize
/// through their own guard so this lock is never held across a network call.
#[derive(Debug, Default)]
pub(crate) struct ChunkQueue {
    chunks: Mutex<VecDeque<Bytes>>,
}

impl ChunkQueue {
    pub(crate) fn push_tail(&self, chunk: Bytes) {
        self.chunks.lock().expect("lock poisoned").push_back(chunk);
    }

    /// Returns the head chunk without removing it. `Bytes` clones are
    /// refcounted, so this does not copy the payload.
    pub(crate) fn peek_head(&self) -> Option<Bytes> {
        self.chunks.lock().expect("lock poisoned").front().cloned()
    }

    /// Removes and returns the head chunk. Called only after the endpoint
    /// has confirmed delivery of that chunk.
    pub(crate) fn pop_head(&self) -> Option<Bytes> {
        self.chunks.lock().expect("lock poisoned").pop_front()
    }

    /// Total bytes across queued chunks. Recomputed on demand rather than
    /// cached, preferring correctness over staleness.
    pub(crate) fn pending_bytes(&self) -> usize {
        self.chunks
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(Bytes::len)
            .sum()
    }

    pub(crate) fn len(&self) -> usize {
        self.chunks.lock().expect("lock poisoned").len()
    }
}
