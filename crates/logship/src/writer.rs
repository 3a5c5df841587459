//! The `io::Write` handle that tees writes between the sink and the shipper.

use crate::pipeline::Pipeline;
use std::io::{self, Write};
use std::sync::Arc;

/// Cloneable writer handle for a [`Shipper`](crate::Shipper).
///
/// Every write is forwarded synchronously to the configured sink, and the
/// caller sees the sink's own result; shipping state never fails a write.
/// While pending bytes stay under the backpressure ceiling, the written
/// bytes are also copied into the shipping buffer. Any number of threads may
/// write through clones of this handle concurrently; writes only contend on
/// the short buffer and sink critical sections.
///
/// Hand this to the host's logging setup wherever it expects an
/// `io::Write`, e.g. as the target of a log formatter.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone)]
pub struct TeeWriter {
    pipeline: Arc<Pipeline>,
}

impl TeeWriter {
    pub(crate) fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pipeline.write_bytes(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.pipeline.flush_sink()
    }
}
