//! HTTP transport types and the injected sender capability.
//!
//! # Design
//! Requests and responses are described as plain data. The core builds
//! `HttpRequest` values and interprets `HttpResponse` values without ever
//! touching the network — the actual round-trip is delegated to whatever
//! [`RequestSender`] was injected at construction time. This keeps the core
//! deterministic and lets tests substitute a scripted sender for the real
//! transport.
//!
//! A sender returns the response with its body already read to completion,
//! so the underlying connection is released before the core sees the
//! response on any path, success or failure.

use std::fmt;

use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `FleetClient` operations with a fully-resolved URL and a
/// `Content-Type: application/json` header, then handed to the injected
/// [`RequestSender`] for execution.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by a [`RequestSender`] after executing an `HttpRequest`. The
/// body is fully read by the sender; `status_text` carries the reason
/// phrase for diagnostics on unexpected statuses.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Failure to complete the HTTP round-trip: connection refused, timeout,
/// broken stream. Carries only a message; the core never inspects it.
#[derive(Debug, Clone)]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// The injected transport capability: execute one prepared request and
/// return the response, or fail with a transport error.
///
/// This is the single seam between the core and the network. Implement it
/// with any HTTP library; the integration tests use ureq, the unit tests a
/// scripted stand-in.
pub trait RequestSender: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<S: RequestSender + ?Sized> RequestSender for &S {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
