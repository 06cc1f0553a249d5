//! Synchronous client core for the fleet cluster scheduler's HTTP API.
//!
//! # Overview
//! Maps logical operations (list units, destroy a unit, query unit states,
//! list machines) onto HTTP requests under the `fleet/v1` prefix, and maps
//! responses back into typed results or typed errors. The round-trip itself
//! is performed by an injected [`RequestSender`], so the core never opens a
//! socket and is fully exercisable with a scripted sender.
//!
//! # Design
//! - `FleetClient` is stateless — it holds only the resolved API root and
//!   the sender, and is safe for concurrent use.
//! - Each operation declares its accepted success statuses; on
//!   single-resource operations 404 maps to the dedicated
//!   [`ApiError::NotFound`] variant, anything else unexpected to
//!   [`ApiError::UnexpectedStatus`] with code and reason phrase.
//! - List endpoints arrive wrapped in a single-key envelope object; the
//!   envelope is unwrapped at decode time and never leaks into the public
//!   types.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::FleetClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestSender, TransportError};
pub use types::{Machine, Unit, UnitOption, UnitState, UnitStateFilter};
