//! HTTP ingress: owns the listening socket and every cross-cutting layer
//! that sits in front of module routes (request ids, tracing, uniform error
//! bodies, authentication and authorization, timeouts, body limits).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

pub mod auth;
mod config;
pub mod request_id;
mod web;

pub use auth::{AccessPolicy, AccessRule, CredentialStore, InMemoryCredentialStore, Principal, Role};
pub use config::ApiIngressConfig;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wraps module routes with the shared middleware stack and serves them.
pub struct ApiIngress {
    config: ApiIngressConfig,
    credentials: Arc<dyn CredentialStore>,
    policy: AccessPolicy,
    openapi: Option<utoipa::openapi::OpenApi>,
    timeout: Duration,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            config,
            credentials,
            policy: AccessPolicy::default(),
            openapi: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds the ingress with the accounts listed in `config.users`.
    pub fn from_config(config: ApiIngressConfig) -> Result<Self> {
        let store = InMemoryCredentialStore::from_config(&config.users)?;
        if store.is_empty() {
            tracing::warn!("no users configured; every request will be rejected with 401");
        } else {
            tracing::info!(users = store.len(), "credential store loaded");
        }
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Appends rules to the access policy; earlier rules take precedence.
    pub fn with_access_rules(mut self, rules: impl IntoIterator<Item = AccessRule>) -> Self {
        self.policy.extend(rules);
        self
    }

    pub fn with_openapi(mut self, doc: utoipa::openapi::OpenApi) -> Self {
        self.openapi = Some(doc);
        self
    }

    /// Zero falls back to [`DEFAULT_TIMEOUT`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Adds `/health`, the OpenAPI document and the 404 fallback to `routes`,
    /// then applies the middleware stack.
    pub fn build_router(&self, routes: Router) -> Result<Router> {
        let mut router = routes.route("/health", get(web::health_check));

        if self.config.enable_docs {
            if let Some(doc) = &self.openapi {
                let doc = Arc::new(serde_json::to_value(doc)?);
                router = router.route(
                    "/openapi.json",
                    get(move || web::openapi_json(doc.clone())),
                );
            }
        }

        // Unknown paths still go through authentication before the 404.
        router = router.fallback(|| async { StatusCode::NOT_FOUND });

        let auth_state = Arc::new(auth::middleware::AuthState {
            credentials: self.credentials.clone(),
            policy: self.policy.clone(),
            realm: self.config.realm.clone(),
        });

        // Layers listed innermost first; the last one added runs first:
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id ->
        // CORS -> fill_error_body -> authorize -> Timeout -> BodyLimit
        router = router
            .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.timeout,
            ))
            .layer(from_fn_with_state(auth_state, auth::middleware::authorize))
            .layer(from_fn(api_errors::fill_error_body));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        let x_request_id = request_id::header();
        router = router
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }

    /// Binds `addr` and serves until `cancel` fires.
    pub async fn serve(
        &self,
        router: Router,
        addr: SocketAddr,
        cancel: CancellationToken,
    ) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
