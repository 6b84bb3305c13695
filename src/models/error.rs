//! Error types for shipquote.
//!
//! Taxonomy:
//! - Caller input rejected: malformed postal codes, invalid requests
//! - External dependency failed: network, timeout, unexpected service payloads
//! - Local environment: configuration and filesystem

use thiserror::Error;

/// Top-level error type for shipquote.
#[derive(Debug, Error)]
pub enum ShipquoteError {
    // ═══════════════════════════════════════════════════════════════════
    // CALLER INPUT: fail loud, close to the boundary
    // ═══════════════════════════════════════════════════════════════════
    #[error("Invalid postal code: '{0}' (expected 8 digits)")]
    InvalidPostalCode(String),

    #[error("Postal code not found: {0}")]
    PostalCodeNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ═══════════════════════════════════════════════════════════════════
    // EXTERNAL: absorbed by the resolver or the quote engine
    // ═══════════════════════════════════════════════════════════════════
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("{service} responded with status {status}: {message}")]
    Service {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    // ═══════════════════════════════════════════════════════════════════
    // LOCAL ENVIRONMENT
    // ═══════════════════════════════════════════════════════════════════
    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ShipquoteError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Map a transport error, keeping timeouts distinct.
    pub fn from_transport(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err)
        }
    }

    /// Whether this error comes from a third-party service rather than the caller.
    ///
    /// The quote engine falls back on both kinds; only external ones are logged
    /// at `warn`.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::PostalCodeNotFound(_)
                | Self::Network(_)
                | Self::Timeout(_)
                | Self::Service { .. }
                | Self::ParseError(_)
        )
    }
}

/// Result type alias for shipquote.
pub type Result<T> = std::result::Result<T, ShipquoteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_external_classification() {
        assert!(ShipquoteError::PostalCodeNotFound("01310100".into()).is_external());
        assert!(ShipquoteError::Timeout(Duration::from_secs(5)).is_external());
        assert!(
            ShipquoteError::Service {
                service: "viacep",
                status: 502,
                message: "bad gateway".into(),
            }
            .is_external()
        );
        assert!(!ShipquoteError::InvalidPostalCode("123".into()).is_external());
        assert!(!ShipquoteError::InvalidInput("empty cart".into()).is_external());
    }

    #[test]
    fn test_display_messages() {
        let err = ShipquoteError::InvalidPostalCode("123".into());
        assert_eq!(err.to_string(), "Invalid postal code: '123' (expected 8 digits)");

        let err = ShipquoteError::Service {
            service: "nominatim",
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "nominatim responded with status 503: unavailable");
    }
}
