use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::error::ApiError;
use crate::payload::{ErrorPayload, ErrorResponse};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request details echoed into error payloads.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub path: String,
    pub request_id: Option<String>,
}

impl ErrorContext {
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            path: parts.uri.path().to_string(),
            request_id: parts
                .headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        }
    }

    pub fn respond(&self, err: impl Into<ApiError>) -> ErrorResponse {
        err.into().to_response(&self.path, self.request_id.clone())
    }

    /// For framework rejections that already carry their own status
    /// (415 for a missing content type, 413 for an oversized body, ...).
    pub fn respond_with_status(&self, status: StatusCode, message: impl Into<String>) -> ErrorResponse {
        let message = message.into();
        tracing::warn!(status = status.as_u16(), path = %self.path, "{message}");
        ErrorResponse(
            ErrorPayload::new(Some(status.as_u16()), message, self.path.clone())
                .with_request_id(self.request_id.clone()),
        )
    }
}

impl<S> FromRequestParts<S> for ErrorContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
