//! Error taxonomy for the shipping pipeline.

/// Errors produced by the shipping pipeline.
///
/// None of these are fatal to the host process, and none are ever surfaced
/// to a `Write` caller: transport and protocol failures leave the affected
/// chunk at the queue head for the next drain pass, and configuration
/// errors can only occur at construction time.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, thiserror::Error)]
pub enum ShipperError {
    /// Construction-time validation failure.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Network-level failure reaching the ingest endpoint (connect, TLS,
    /// timeout). The chunk being sent stays queued and is retried on the
    /// next pass.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived but did not confirm delivery: its `status` field
    /// was absent, not `"success"`, or the body was unparseable. Treated
    /// exactly like a transport failure.
    #[error("ingest did not confirm delivery: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let error = ShipperError::InvalidConfig("ingest_url must not be empty".to_string());
        assert_eq!(
            error.to_string(),
            "invalid configuration: ingest_url must not be empty"
        );
    }

    #[test]
    fn test_protocol_display() {
        let error = ShipperError::Protocol("ingest status: error".to_string());
        assert_eq!(
            error.to_string(),
            "ingest did not confirm delivery: ingest status: error"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = ShipperError::InvalidConfig("test".to_string());
        let debug_str = format!("{error:?}");
        assert!(debug_str.contains("InvalidConfig"));
    }
}
