//! # logship
//!
//! A batched, bounded, backpressured log-shipping pipeline.
//!
//! The shipper sits inside a host process's logging setup as an
//! [`std::io::Write`] tee: every write goes synchronously to a local sink
//! (stdout, a file) and, while memory allows, is also accumulated into an
//! in-memory buffer. The buffer is periodically sealed into immutable chunks
//! that are uploaded in order to a remote ingest endpoint.
//!
//! ## Architecture
//!
//! ```text
//!   caller write
//!       │
//!       ├──────────────────> Sink   (always, synchronously)
//!       │
//!       v  (while under the backpressure ceiling)
//!   ┌──────────┐  threshold   ┌─────────────┐
//!   │  Buffer  │ ───────────> │ Chunk queue │ (FIFO)
//!   └──────────┘   rotation   └──────┬──────┘
//!                                    │ timer tick / manual flush
//!                                    v
//!                             ┌─────────────┐
//!                             │   Flusher   │ HTTP POST, in order,
//!                             └─────────────┘ stop at first failure
//! ```
//!
//! ## Delivery guarantees
//!
//! - Local sink output is unconditional: shipping failures, backpressure, and
//!   a slow or dead endpoint never fail or indefinitely block a write.
//! - Chunks are delivered at least once, in creation order. A chunk leaves
//!   the queue only after the endpoint's acknowledgement body confirms it;
//!   anything else leaves it at the head for the next pass. A confirmation
//!   lost in transit can therefore produce a duplicate delivery, which is
//!   preferred over a loss.
//! - Memory is bounded: once buffered plus queued bytes reach the configured
//!   ceiling, further writes still reach the sink but are excluded from
//!   shipment until a drain makes room.
//!
//! ## Example
//!
//! ```rust,no_run
//! use logship::{Shipper, ShipperConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let shipper = Shipper::new(ShipperConfig {
//!     ingest_url: "https://ingest.example.com/upload?token=...".to_string(),
//!     ..ShipperConfig::default()
//! })?;
//! shipper.start();
//!
//! let mut writer = shipper.writer();
//! std::io::Write::write_all(&mut writer, b"hello\n")?;
//!
//! // Before process exit: ship whatever is still buffered.
//! shipper.flush_now().await;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub(crate) mod constants;
pub mod error;
mod flusher;
mod pipeline;
mod queue;
pub mod shipper;
pub mod writer;

pub use config::ShipperConfig;
pub use error::ShipperError;
pub use shipper::Shipper;
pub use writer::TeeWriter;
