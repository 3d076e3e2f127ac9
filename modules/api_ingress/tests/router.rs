//! End-to-end behaviour of the assembled ingress router.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tower::util::ServiceExt;

use api_ingress::{AccessRule, ApiIngress, ApiIngressConfig, Role};

fn config() -> ApiIngressConfig {
    serde_json::from_value(serde_json::json!({
        "realm": "test-realm",
        "users": [
            {"username": "user", "password": "user", "roles": ["USER"]},
            {"username": "admin", "password": "admin", "roles": ["ADMIN"]}
        ]
    }))
    .unwrap()
}

fn app() -> Router {
    let routes = Router::new().route("/items", get(|| async { "items" }));
    let doc = utoipa::openapi::OpenApiBuilder::new()
        .info(utoipa::openapi::InfoBuilder::new().title("t").version("1").build())
        .build();

    ApiIngress::from_config(config())
        .unwrap()
        .with_access_rules([AccessRule::new(&[Method::GET], "/items", &[Role::User])])
        .with_openapi(doc)
        .build_router(routes)
        .unwrap()
}

fn req(method: Method, uri: &str, who: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(who) = who {
        b = b.header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode(format!("{who}:{who}"))),
        );
    }
    b.body(Body::empty()).unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_requires_authentication() {
    let resp = app().oneshot(req(Method::GET, "/health", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"test-realm\""
    );

    let resp = app()
        .oneshot(req(Method::GET, "/health", Some("admin")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "healthy");
}

#[tokio::test]
async fn openapi_is_served_to_any_principal() {
    let resp = app()
        .oneshot(req(Method::GET, "/openapi.json", Some("user")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["info"]["title"], "t");
}

#[tokio::test]
async fn policy_rules_apply() {
    let resp = app()
        .oneshot(req(Method::GET, "/items", Some("admin")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let json = json_body(resp).await;
    assert_eq!(json["error"], "Forbidden");
    assert_eq!(json["path"], "/items");

    let resp = app()
        .oneshot(req(Method::GET, "/items", Some("user")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_gets_json_404_after_authentication() {
    let resp = app().oneshot(req(Method::GET, "/nope", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app()
        .oneshot(req(Method::GET, "/nope", Some("user")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = json_body(resp).await;
    assert_eq!(json["status"], 404);
    assert_eq!(json["error"], "Not Found");
    assert_eq!(json["path"], "/nope");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn wrong_method_gets_json_405() {
    let resp = app()
        .oneshot(req(Method::DELETE, "/items", Some("user")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(json_body(resp).await["status"], 405);
}

/// Slow and body-reading routes behind a short timeout and a tiny body limit.
fn limited_app() -> Router {
    let mut cfg = config();
    cfg.body_limit_bytes = 16;

    let routes = Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        )
        .route("/upload", post(|body: String| async move { body }));

    ApiIngress::from_config(cfg)
        .unwrap()
        .with_timeout(Duration::from_millis(10))
        .build_router(routes)
        .unwrap()
}

#[tokio::test]
async fn slow_handler_times_out_with_structured_body() {
    let resp = limited_app()
        .oneshot(req(Method::GET, "/slow", Some("user")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let json = json_body(resp).await;
    assert_eq!(json["status"], 408);
    assert_eq!(json["error"], "Request Timeout");
    assert_eq!(json["path"], "/slow");
}

#[tokio::test]
async fn oversized_body_is_rejected_with_structured_body() {
    let payload = "x".repeat(64);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("admin:admin")),
        )
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::CONTENT_LENGTH, payload.len())
        .header("x-request-id", "big-1")
        .body(Body::from(payload))
        .unwrap();

    let resp = limited_app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "big-1");

    let json = json_body(resp).await;
    assert_eq!(json["status"], 413);
    assert_eq!(json["error"], "Payload Too Large");
    assert_eq!(json["path"], "/upload");
    assert_eq!(json["request_id"], "big-1");
}

#[tokio::test]
async fn body_within_limit_is_accepted() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("admin:admin")),
        )
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("small"))
        .unwrap();

    let resp = limited_app().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
