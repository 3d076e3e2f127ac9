//! Uniform error responses for the HTTP surface.
//!
//! Every failure that reaches a client goes through this crate: handlers map
//! their domain errors into [`ApiError`], the ingress maps authorization
//! failures into it, and [`layer::fill_error_body`] catches the bare status
//! codes produced by the framework itself (unknown route, wrong method,
//! timeouts). The result is always an [`ErrorPayload`] rendered as JSON.

pub mod context;
pub mod error;
pub mod layer;
pub mod payload;

pub use context::ErrorContext;
pub use error::{ApiError, ErrorKind};
pub use layer::fill_error_body;
pub use payload::{ErrorPayload, ErrorResponse, APPLICATION_JSON};
