use std::sync::Arc;

use api_errors::{ApiError, ErrorContext};
use axum::{
    extract::{Request, State},
    http::{header::WWW_AUTHENTICATE, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{basic, AccessDenied, AccessPolicy, CredentialStore, Principal};

/// Shared state for [`authorize`].
pub struct AuthState {
    pub credentials: Arc<dyn CredentialStore>,
    pub policy: AccessPolicy,
    pub realm: String,
}

impl AuthState {
    async fn principal(
        &self,
        creds: Option<basic::BasicCredentials>,
    ) -> Result<Option<Principal>, ApiError> {
        let Some(creds) = creds else {
            return Ok(None);
        };

        let principal = self
            .credentials
            .authenticate(&creds.username, &creds.password)
            .await
            .map_err(ApiError::internal)?;

        if principal.is_none() {
            tracing::debug!(username = %creds.username, "bad credentials");
        }
        Ok(principal)
    }

    fn challenge(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Basic realm=\"{}\"", self.realm))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic"))
    }
}

/// Authenticates the caller and applies the access policy before the
/// request reaches any handler. On success the [`Principal`] is placed in
/// request extensions.
pub async fn authorize(
    State(auth): State<Arc<AuthState>>,
    ctx: ErrorContext,
    mut req: Request,
    next: Next,
) -> Response {
    // Headers are read up front; the request body is not `Sync` and must not
    // be borrowed across the await below.
    let creds = basic::from_headers(req.headers());
    let principal = match auth.principal(creds).await {
        Ok(p) => p,
        Err(e) => return ctx.respond(e).into_response(),
    };

    if let Err(denied) = auth
        .policy
        .decide(req.method(), req.uri().path(), principal.as_ref())
    {
        tracing::info!(
            method = %req.method(),
            path = %req.uri().path(),
            user = principal.as_ref().map(|p| p.username.as_str()).unwrap_or("-"),
            reason = %denied,
            "access denied"
        );
        let challenge = matches!(denied, AccessDenied::Unauthenticated);
        let mut response = ctx.respond(denied).into_response();
        if challenge {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, auth.challenge());
        }
        return response;
    }

    if let Some(principal) = principal {
        req.extensions_mut().insert(principal);
    }
    next.run(req).await
}
