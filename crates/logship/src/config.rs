//! Shipper configuration.

use crate::constants;
use crate::error::ShipperError;
use std::env;
use std::time::Duration;
use tracing::debug;

/// Configuration for a [`Shipper`](crate::Shipper).
///
/// An explicit struct passed at construction, so a process can run several
/// independent shippers with different endpoints or limits.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct ShipperConfig {
    /// Ingest endpoint receiving chunk POSTs. Host, routing parameters, and
    /// any access token are expected to be embedded in the URL by the
    /// caller, e.g.
    /// `https://ingest.example.com/upload?host=my-service&token=...`.
    pub ingest_url: String,
    /// Buffer size that forces an eager rotation during a write.
    pub rotate_threshold_bytes: usize,
    /// Ceiling on total bytes (live buffer plus queued chunks) retained for
    /// shipping. Writes past the ceiling still reach the sink but are
    /// excluded from shipment.
    pub max_pending_bytes: usize,
    /// Interval between scheduled flush passes, in milliseconds. Values
    /// below the 1000 ms floor are silently raised.
    pub flush_interval_ms: u64,
    /// Timeout for a single chunk upload request, in milliseconds. It is not
    /// recommended to set the flush interval below this.
    pub request_timeout_ms: u64,
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            ingest_url: String::new(),
            rotate_threshold_bytes: constants::DEFAULT_ROTATE_THRESHOLD_BYTES,
            max_pending_bytes: constants::DEFAULT_MAX_PENDING_BYTES,
            flush_interval_ms: constants::DEFAULT_FLUSH_INTERVAL_MS,
            request_timeout_ms: constants::DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ShipperConfig {
    /// Creates a configuration from environment variables.
    ///
    /// Recognized variables: `LOGSHIP_URL`, `LOGSHIP_ROTATE_THRESHOLD_BYTES`,
    /// `LOGSHIP_MAX_PENDING_BYTES`, `LOGSHIP_FLUSH_INTERVAL_MS`,
    /// `LOGSHIP_REQUEST_TIMEOUT_MS`. Malformed numeric values fall back to
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ShipperError::InvalidConfig`] if the resulting
    /// configuration fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, ShipperError> {
        let ingest_url = env::var("LOGSHIP_URL").unwrap_or_default();
        let rotate_threshold_bytes = env::var("LOGSHIP_ROTATE_THRESHOLD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_ROTATE_THRESHOLD_BYTES);
        let max_pending_bytes = env::var("LOGSHIP_MAX_PENDING_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_MAX_PENDING_BYTES);
        let flush_interval_ms = env::var("LOGSHIP_FLUSH_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_FLUSH_INTERVAL_MS);
        let request_timeout_ms = env::var("LOGSHIP_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_REQUEST_TIMEOUT_MS);

        let config = Self {
            ingest_url,
            rotate_threshold_bytes,
            max_pending_bytes,
            flush_interval_ms,
            request_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ShipperError::InvalidConfig`] if the ingest URL is empty or
    /// any of the byte/timeout limits is zero. A flush interval below the
    /// floor is not an error; it is raised silently.
    pub fn validate(&self) -> Result<(), ShipperError> {
        if self.ingest_url.is_empty() {
            return Err(ShipperError::InvalidConfig(
                "ingest_url must not be empty".to_string(),
            ));
        }
        if self.rotate_threshold_bytes == 0 {
            return Err(ShipperError::InvalidConfig(
                "rotate_threshold_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_pending_bytes == 0 {
            return Err(ShipperError::InvalidConfig(
                "max_pending_bytes must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ShipperError::InvalidConfig(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.flush_interval_ms < constants::MIN_FLUSH_INTERVAL_MS {
            debug!(
                "flush interval {}ms below the {}ms floor, raising it",
                self.flush_interval_ms,
                constants::MIN_FLUSH_INTERVAL_MS
            );
        }
        Ok(())
    }

    /// The effective flush interval, with the floor applied.
    #[must_use]
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms.max(constants::MIN_FLUSH_INTERVAL_MS))
    }

    /// The effective upload request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
