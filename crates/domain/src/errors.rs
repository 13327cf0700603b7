//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for invoicepatch
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum InvoicePatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx response from the accounting platform, surfaced verbatim.
    #[error("Remote rejected request (HTTP {status}): {body}")]
    RemoteRejected { status: u16, body: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for invoicepatch operations
pub type Result<T> = std::result::Result<T, InvoicePatchError>;

impl From<std::io::Error> for InvoicePatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_rejected_carries_status_and_body() {
        let err = InvoicePatchError::RemoteRejected {
            status: 409,
            body: "Stale Object Error".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("409"));
        assert!(msg.contains("Stale Object Error"));
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = InvoicePatchError::NotFound("invoice 9999".to_string());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["message"], "invoice 9999");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: InvoicePatchError = io.into();
        assert!(matches!(err, InvoicePatchError::Io(_)));
    }
}
