//! Transport error for the movie API client.
//!
//! # Design
//! The synchronization layer recognizes a single error kind. It does not
//! distinguish 4xx from 5xx or parse server error bodies; the status and raw
//! body are kept only so the failure can be logged for diagnostics. What the
//! user sees is always one of the fixed messages from `Messages`.

use thiserror::Error;

/// Any failure between issuing a request and decoding its response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, refused, reset, timeout).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(String),
}

impl TransportError {
    /// The HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
