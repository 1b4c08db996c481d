//! Error types for the catalog client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status code reported when no HTTP response was received
pub const NO_RESPONSE_STATUS: u16 = 500;

/// Errors that can occur while fetching a catalog page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Transport failure: no usable response (timeout, DNS, connection reset)
    #[error("Network error: {message}")]
    Network {
        /// Transport error description
        message: String,
        /// Whether the request hit the configured timeout
        timed_out: bool,
    },

    /// The server responded but signaled failure
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable message from the server
        message: String,
    },

    /// The server responded with a body that is not a catalog envelope
    #[error("Malformed catalog response (status {status}): {message}")]
    Decode {
        /// HTTP status code
        status: u16,
        /// Parser error description
        message: String,
    },
}

impl CatalogError {
    /// Status code carried into the normalized payload
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Network { .. } => NO_RESPONSE_STATUS,
            Self::Api { status, .. } | Self::Decode { status, .. } => *status,
        }
    }

    /// Human-readable message carried into the normalized payload
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message, .. }
            | Self::Api { message, .. }
            | Self::Decode { message, .. } => message,
        }
    }

    /// Label used for logs and metrics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network_error",
            Self::Api { .. } => "api_error",
            Self::Decode { .. } => "decode_error",
        }
    }

    /// Collapse into the single error shape the store and view consume
    #[must_use]
    pub fn normalize(&self) -> ErrorPayload {
        ErrorPayload::failed(self.message(), self.status_code())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network {
            timed_out: error.is_timeout(),
            message: error.to_string(),
        }
    }
}

/// Outcome marker of a normalized error; always `"failed"` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStatus {
    /// The request failed
    #[default]
    Failed,
}

/// Normalized error shape: `{ message, status: "failed", statusCode }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Message suitable for a transient notification
    pub message: String,
    /// Always [`FailureStatus::Failed`]
    pub status: FailureStatus,
    /// HTTP status, or 500 when no response was received
    pub status_code: u16,
}

impl ErrorPayload {
    /// Creates a failed payload
    #[must_use]
    pub fn failed(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status: FailureStatus::Failed,
            status_code,
        }
    }
}

impl std::fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (status {})", self.message, self.status_code)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    #[test]
    fn test_network_error_normalizes_to_500() {
        let error = CatalogError::Network {
            message: "connection reset".to_string(),
            timed_out: false,
        };

        let payload = error.normalize();

        assert_eq!(payload, ErrorPayload::failed("connection reset", 500));
        assert_eq!(error.kind(), "network_error");
    }

    #[test]
    fn test_api_error_keeps_status() {
        let error = CatalogError::Api {
            status: 404,
            message: "Product not found".to_string(),
        };

        assert_eq!(error.normalize().status_code, 404);
        assert_eq!(error.to_string(), "API error (status 404): Product not found");
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = ErrorPayload::failed("Unknown error", 200);

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "message": "Unknown error",
                "status": "failed",
                "statusCode": 200
            })
        );
    }
}
