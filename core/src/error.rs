//! Error types for the fleet API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently
//! distinguish "the unit does not exist" from "the server returned an
//! unexpected status." Its display message is the stable string
//! `unit not found`. All other non-accepted responses land in
//! `UnexpectedStatus` with the raw status code and reason phrase for
//! debugging; the body is never consumed on that path.

use std::fmt;

use crate::http::TransportError;

/// Errors returned by `FleetClient` operations.
#[derive(Debug)]
pub enum ApiError {
    /// The base URL or a derived request URL could not be parsed. Raised
    /// before any network activity.
    InvalidUrl(String),

    /// The injected sender failed to complete the round-trip. Propagated
    /// as-is; no status or body was available to inspect.
    Transport(TransportError),

    /// The server returned 404 — the requested unit does not exist.
    NotFound,

    /// The server returned a status outside the operation's accepted set,
    /// other than 404.
    UnexpectedStatus { status: u16, status_text: String },

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            ApiError::Transport(err) => write!(f, "transport failed: {err}"),
            ApiError::NotFound => write!(f, "unit not found"),
            ApiError::UnexpectedStatus {
                status,
                status_text,
            } => {
                write!(f, "wrong status code: {status} {status_text}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err)
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}
