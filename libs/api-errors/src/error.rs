use axum::http::StatusCode;
use thiserror::Error;

use crate::payload::{ErrorPayload, ErrorResponse};

/// Failure classes visible to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Unauthenticated,
    Forbidden,
    Internal,
}

impl ErrorKind {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.kind().status()
    }

    /// Format this error for the request at `path`.
    ///
    /// Internal errors are logged with their full chain; the client only
    /// sees a generic message.
    pub fn to_response(&self, path: &str, request_id: Option<String>) -> ErrorResponse {
        let status = self.status();
        let message = match self {
            Self::Internal(err) => {
                tracing::error!(
                    error = ?err,
                    path = %path,
                    status = status.as_u16(),
                    "request failed"
                );
                "An internal error occurred".to_string()
            }
            other => {
                tracing::warn!(
                    error = %other,
                    path = %path,
                    status = status.as_u16(),
                    "request failed"
                );
                other.to_string()
            }
        };

        ErrorResponse(
            ErrorPayload::new(Some(status.as_u16()), message, path).with_request_id(request_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::InvalidInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorKind::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn to_response_echoes_path_and_message() {
        let resp = ApiError::not_found("Anime 7 not found")
            .to_response("/animes/7", Some("rid-7".to_string()));

        assert_eq!(resp.0.status, 404);
        assert_eq!(resp.0.error, "Not Found");
        assert_eq!(resp.0.message, "Anime 7 not found");
        assert_eq!(resp.0.path, "/animes/7");
        assert_eq!(resp.0.request_id.as_deref(), Some("rid-7"));
    }

    #[test]
    fn internal_errors_hide_details() {
        let resp = ApiError::internal(anyhow::anyhow!("connection refused"))
            .to_response("/animes", None);

        assert_eq!(resp.0.status, 500);
        assert_eq!(resp.0.message, "An internal error occurred");
        assert!(!resp.0.message.contains("connection refused"));
    }
}
