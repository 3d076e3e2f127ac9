//! Middleware turning bare framework error responses into [`ErrorPayload`]s.
//!
//! Handlers already answer with JSON payloads. What is left are responses
//! produced below them: 404 for unknown routes, 405 for wrong methods, 408
//! from the timeout layer, 413 from the body limit. Those carry an empty or
//! plain-text body, which is replaced here.

use axum::{
    extract::Request,
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::context::ErrorContext;
use crate::payload::{ErrorPayload, ErrorResponse, APPLICATION_JSON};

const MAX_MESSAGE_BYTES: usize = 4 * 1024;

pub async fn fill_error_body(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let ctx = ErrorContext::from_parts(&parts);

    let response = next.run(Request::from_parts(parts, body)).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let text = match axum::body::to_bytes(body, MAX_MESSAGE_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };
    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or("Error").to_string()
    } else {
        text
    };

    let payload =
        ErrorPayload::new(Some(status.as_u16()), message, ctx.path).with_request_id(ctx.request_id);
    let mut out = ErrorResponse(payload).into_response();

    // Keep headers such as `Allow` or `WWW-Authenticate`.
    for (name, value) in parts.headers.iter() {
        if name != CONTENT_TYPE && name != CONTENT_LENGTH {
            out.headers_mut().append(name.clone(), value.clone());
        }
    }
    out
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with(APPLICATION_JSON))
        .unwrap_or(false)
}
