//! Drains queued chunks to the ingest endpoint and owns the flush schedule.

use crate::error::ShipperError;
use crate::pipeline::Pipeline;
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::debug;

/// Acknowledgement body returned by the ingest endpoint. Any HTTP status is
/// accepted; only the literal status value `"success"` in the body confirms
/// delivery.
#[derive(Debug, Deserialize)]
struct IngestAck {
    status: String,
}

/// Uploads queued chunks in order and retires them on confirmed delivery.
pub(crate) struct Flusher {
    client: reqwest::Client,
    pipeline: Arc<Pipeline>,
    /// Held for the full duration of a drain pass so passes never
    /// interleave: chunks are attempted strictly head-first, a scheduled
    /// tick and a manual flush cannot race, and no chunk is ever in flight
    /// twice at once. This is the only point in the pipeline where one
    /// caller may wait on another.
    drain_pass: Mutex<()>,
}

impl Flusher {
    pub(crate) fn new(pipeline: Arc<Pipeline>) -> Result<Self, ShipperError> {
        let client = reqwest::Client::builder()
            .timeout(pipeline.config.request_timeout())
            .build()?;
        Ok(Flusher {
            client,
            pipeline,
            drain_pass: Mutex::new(()),
        })
    }

    /// One drain pass: upload queued chunks head-first, popping each only
    /// after the endpoint confirms it, and aborting at the first failure.
    ///
    /// A failed chunk stays at the head unchanged for the next pass. A send
    /// whose confirmation was lost may therefore be delivered twice; the
    /// design accepts duplicates over loss.
    pub(crate) async fn drain(&self) {
        let _pass = self.drain_pass.lock().await;
        while let Some(chunk) = self.pipeline.queue.peek_head() {
            match self.send_chunk(chunk).await {
                Ok(()) => {
                    // Confirmed delivery is the only thing that removes a chunk.
                    self.pipeline.queue.pop_head();
                }
                Err(err) => {
                    self.pipeline.diag(&format!(
                        "upload failed, leaving {} chunk(s) queued for retry: {err}",
                        self.pipeline.queue.len()
                    ));
                    break;
                }
            }
        }
    }

    async fn send_chunk(&self, chunk: Bytes) -> Result<(), ShipperError> {
        let url = &self.pipeline.config.ingest_url;
        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .header("Content-Type", "text/plain")
            .body(chunk)
            .send()
            .await?;
        self.pipeline.diag(&format!(
            "ingest post time: {:?} url: {url}",
            started.elapsed()
        ));

        let body = response.text().await?;
        match serde_json::from_str::<IngestAck>(&body) {
            Ok(ack) if ack.status == "success" => Ok(()),
            Ok(ack) => Err(ShipperError::Protocol(format!(
                "ingest status: {}",
                ack.status
            ))),
            Err(_) => Err(ShipperError::Protocol(format!(
                "unparseable ingest response: {body}"
            ))),
        }
    }

    /// The flush schedule: every interval, rotate the buffer if it is due
    /// and run one drain pass. Runs for the process lifetime; there is no
    /// cancel. Shutdown flushing happens through the manual flush entry
    /// point instead.
    pub(crate) async fn run(self: Arc<Self>) {
        let interval = self.pipeline.config.flush_interval();
        debug!("flush loop started, interval {interval:?}");
        loop {
            tokio::time::sleep(interval).await;
            self.pipeline.rotate_if_due();
            self.drain().await;
        }
    }
}
