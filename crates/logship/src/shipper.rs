//! The public façade tying writer, queue, and flusher together.

use crate::config::ShipperConfig;
use crate::error::ShipperError;
use crate::flusher::Flusher;
use crate::pipeline::Pipeline;
use crate::writer::TeeWriter;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// A batched, bounded, backpressured log shipper.
///
/// The shipper tees every write between a local sink and an in-memory
/// buffer, seals the buffer into immutable chunks, and uploads those chunks
/// in order to an ingest endpoint. Local output is never blocked or failed
/// by shipping state. Under a permanently unreachable endpoint the head
/// chunk is retried indefinitely while the backpressure ceiling bounds
/// memory growth and sink output continues unaffected.
///
/// Per-chunk lifecycle: buffered, then queued, then either delivered
/// (removed on confirmation) or left at the queue head for the next pass.
/// There is no separate in-flight state because drain passes are serialized.
#[allow(clippy::module_name_repetitions)]
pub struct Shipper {
    pipeline: Arc<Pipeline>,
    flusher: Arc<Flusher>,
}

impl Shipper {
    /// Creates a shipper whose local sink is stdout.
    ///
    /// # Errors
    ///
    /// Returns [`ShipperError::InvalidConfig`] for a rejected configuration,
    /// or [`ShipperError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: ShipperConfig) -> Result<Self, ShipperError> {
        Self::with_sink(config, Box::new(io::stdout()))
    }

    /// Creates a shipper with a custom local sink.
    ///
    /// The sink receives every write unconditionally, plus the pipeline's
    /// own diagnostic messages.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_sink(
        config: ShipperConfig,
        sink: Box<dyn Write + Send>,
    ) -> Result<Self, ShipperError> {
        config.validate()?;
        let pipeline = Arc::new(Pipeline::new(config, sink));
        let flusher = Arc::new(Flusher::new(Arc::clone(&pipeline))?);
        debug!("shipper created for {}", pipeline.config.ingest_url);
        Ok(Shipper { pipeline, flusher })
    }

    /// Returns a cloneable writer handle. Hand this to the host's logging
    /// setup; any number of threads may write through clones concurrently.
    #[must_use]
    pub fn writer(&self) -> TeeWriter {
        TeeWriter::new(Arc::clone(&self.pipeline))
    }

    /// Spawns the periodic flush loop on the current tokio runtime.
    ///
    /// The loop runs for the process lifetime; there is no stop or cancel.
    /// Call [`flush_now`](Self::flush_now) before exiting to ship whatever
    /// is still buffered.
    pub fn start(&self) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(&self.flusher).run())
    }

    /// Rotates whatever is buffered and runs one drain pass immediately.
    ///
    /// Callable from any task. A manual flush and a scheduled pass never
    /// interleave; whichever acquires the pass guard first runs to
    /// completion before the other proceeds. An empty buffer produces no
    /// chunk, so flushing with only queued chunks drains them without
    /// shipping a spurious empty payload.
    ///
    /// The backpressure ceiling does not apply here: rotation only moves
    /// bytes the write path already admitted, so it cannot grow pending
    /// bytes. Writes the ceiling excluded stay excluded.
    pub async fn flush_now(&self) {
        self.pipeline.force_rotate();
        self.flusher.drain().await;
    }

    /// Total bytes currently held for shipping (live buffer plus queued
    /// chunks), recomputed on demand.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.pipeline.pending_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_url() {
        let result = Shipper::new(ShipperConfig::default());
        assert!(matches!(result, Err(ShipperError::InvalidConfig(_))));
    }

    #[test]
    fn test_with_sink_accepts_valid_config() {
        let config = ShipperConfig {
            ingest_url: "https://ingest.example.com/upload".to_string(),
            ..ShipperConfig::default()
        };
        let shipper = Shipper::with_sink(config, Box::new(io::sink()));
        assert!(shipper.is_ok());
    }

    #[test]
    fn test_writer_handles_share_one_pipeline() {
        let config = ShipperConfig {
            ingest_url: "https://ingest.example.com/upload".to_string(),
            ..ShipperConfig::default()
        };
        let shipper = Shipper::with_sink(config, Box::new(io::sink())).expect("valid config");

        let mut a = shipper.writer();
        let mut b = shipper.writer();
        a.write_all(b"from a\n").expect("write should succeed");
        b.write_all(b"from b\n").expect("write should succeed");

        assert_eq!(shipper.pending_bytes(), 14);
    }
}
