//! Defaults and limits for the shipping pipeline.

/// Buffer size that forces an eager rotation during a write.
///
/// # Value: ~5 MB
///
/// Keeps individual upload payloads at a size most ingest endpoints accept
/// in a single request while amortizing HTTP overhead across many writes.
pub(crate) const DEFAULT_ROTATE_THRESHOLD_BYTES: usize = 5_000_000;

/// Ceiling on total bytes (live buffer plus queued chunks) retained for
/// shipping.
///
/// # Value: ~50 MB
///
/// Once pending bytes reach this ceiling, writes keep flowing to the local
/// sink but are excluded from shipment until a drain pass makes room. This
/// bounds memory growth under a permanently unreachable endpoint.
pub(crate) const DEFAULT_MAX_PENDING_BYTES: usize = 50_000_000;

/// Default interval between scheduled flush passes.
pub(crate) const DEFAULT_FLUSH_INTERVAL_MS: u64 = 2_000;

/// Floor for the flush interval. Configured values below it are silently
/// raised to protect both the ingest endpoint and the local process from
/// excessive request rates.
pub(crate) const MIN_FLUSH_INTERVAL_MS: u64 = 1_000;

/// Default timeout for a single chunk upload request. The drain pass is only
/// as bounded as this timeout.
pub(crate) const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2_000;

/// Prefix for the pipeline's own operational messages on the sink.
pub(crate) const DIAG_PREFIX: &str = "LOGSHIP";
