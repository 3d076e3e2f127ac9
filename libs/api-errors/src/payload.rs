use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const APPLICATION_JSON: &str = "application/json";

/// Body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(title = "ErrorPayload", description = "Structured error response")]
pub struct ErrorPayload {
    /// RFC 3339 timestamp taken when the payload was formatted.
    pub timestamp: String,
    /// HTTP status code of the response.
    pub status: u16,
    /// Reason phrase of `status` (e.g. "Not Found").
    pub error: String,
    /// Human-readable explanation specific to this failure.
    pub message: String,
    /// Path of the request that failed.
    pub path: String,
    /// Request id useful for correlating with server logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorPayload {
    /// Build a payload. A missing or unparseable status becomes 500.
    pub fn new(status: Option<u16>, message: impl Into<String>, path: impl Into<String>) -> Self {
        let status = status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.into(),
            path: path.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: Option<String>) -> Self {
        self.request_id = id;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Axum response wrapper that renders an [`ErrorPayload`] with its status.
#[derive(Debug, Clone)]
pub struct ErrorResponse(pub ErrorPayload);

impl From<ErrorPayload> for ErrorResponse {
    fn from(p: ErrorPayload) -> Self {
        Self(p)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JSON),
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_status_defaults_to_500() {
        let p = ErrorPayload::new(None, "boom", "/animes");
        assert_eq!(p.status, 500);
        assert_eq!(p.error, "Internal Server Error");
        assert_eq!(p.path, "/animes");
        assert_eq!(p.message, "boom");
    }

    #[test]
    fn invalid_status_defaults_to_500() {
        let p = ErrorPayload::new(Some(42), "weird", "/x");
        assert_eq!(p.status, 500);
    }

    #[test]
    fn reason_phrase_follows_status() {
        assert_eq!(ErrorPayload::new(Some(404), "", "/").error, "Not Found");
        assert_eq!(ErrorPayload::new(Some(400), "", "/").error, "Bad Request");
        assert_eq!(ErrorPayload::new(Some(401), "", "/").error, "Unauthorized");
        assert_eq!(ErrorPayload::new(Some(403), "", "/").error, "Forbidden");
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let p = ErrorPayload::new(Some(404), "gone", "/animes/1");
        assert!(chrono::DateTime::parse_from_rfc3339(&p.timestamp).is_ok());
    }

    #[test]
    fn response_sets_status_and_content_type() {
        let resp = ErrorResponse(ErrorPayload::new(Some(404), "gone", "/animes/1")).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let ct = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_JSON);
    }

    #[test]
    fn request_id_is_omitted_when_absent() {
        let p = ErrorPayload::new(Some(400), "bad", "/animes");
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("request_id").is_none());

        let v = serde_json::to_value(p.with_request_id(Some("req-1".into()))).unwrap();
        assert_eq!(v["request_id"], "req-1");
    }
}
