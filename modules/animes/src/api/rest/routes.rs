use std::sync::Arc;

use api_ingress::{AccessRule, Role};
use axum::{
    http::Method,
    routing::{get, post},
    Extension, Router,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let animes = Router::new()
        .route(
            "/animes",
            get(handlers::list_animes).post(handlers::create_anime),
        )
        .route("/animes/batch", post(handlers::create_batch))
        .route(
            "/animes/{id}",
            get(handlers::get_anime)
                .put(handlers::update_anime)
                .delete(handlers::delete_anime),
        )
        .layer(Extension(service));

    router.merge(animes)
}

/// Who may call what under `/animes`. Order matters: the collection
/// listing rule must precede the generic `GET /animes/**` rule.
pub fn access_rules() -> Vec<AccessRule> {
    vec![
        AccessRule::new(
            &[Method::POST, Method::PUT, Method::DELETE],
            "/animes/**",
            &[Role::Admin],
        ),
        AccessRule::new(&[Method::GET, Method::HEAD], "/animes", &[Role::User, Role::Admin]),
        AccessRule::new(&[Method::GET, Method::HEAD], "/animes/**", &[Role::User]),
    ]
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Anime catalogue API", description = "CRUD over anime records"),
    paths(
        handlers::list_animes,
        handlers::get_anime,
        handlers::create_anime,
        handlers::create_batch,
        handlers::update_anime,
        handlers::delete_anime,
    ),
    components(schemas(dto::AnimeDto, dto::AnimeReq, api_errors::ErrorPayload)),
    modifiers(&BasicAuth),
    tags((name = "animes", description = "Anime records"))
)]
pub struct ApiDoc;

struct BasicAuth;

impl Modify for BasicAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_ingress::{AccessPolicy, Principal};

    fn policy() -> AccessPolicy {
        AccessPolicy::new(access_rules())
    }

    #[test]
    fn listing_requires_both_roles() {
        let policy = policy();
        let user = Principal::new("u", [Role::User]);
        let admin = Principal::new("a", [Role::Admin]);
        let both = Principal::new("b", [Role::User, Role::Admin]);

        assert!(policy.decide(&Method::GET, "/animes", Some(&user)).is_err());
        assert!(policy.decide(&Method::GET, "/animes", Some(&admin)).is_err());
        assert!(policy.decide(&Method::GET, "/animes", Some(&both)).is_ok());
    }

    #[test]
    fn single_reads_require_user() {
        let policy = policy();
        let user = Principal::new("u", [Role::User]);
        let admin = Principal::new("a", [Role::Admin]);

        assert!(policy.decide(&Method::GET, "/animes/1", Some(&user)).is_ok());
        assert!(policy.decide(&Method::GET, "/animes/1", Some(&admin)).is_err());
    }

    #[test]
    fn writes_require_admin() {
        let policy = policy();
        let user = Principal::new("u", [Role::User]);
        let admin = Principal::new("a", [Role::Admin]);

        for (method, path) in [
            (Method::POST, "/animes"),
            (Method::POST, "/animes/batch"),
            (Method::PUT, "/animes/1"),
            (Method::DELETE, "/animes/1"),
        ] {
            assert!(policy.decide(&method, path, Some(&user)).is_err(), "{method} {path}");
            assert!(policy.decide(&method, path, Some(&admin)).is_ok(), "{method} {path}");
        }
    }

    #[test]
    fn openapi_declares_paths_and_basic_scheme() {
        let doc = serde_json::to_value(openapi()).unwrap();
        assert!(doc["paths"]["/animes"]["get"].is_object());
        assert!(doc["paths"]["/animes/batch"]["post"].is_object());
        assert!(doc["paths"]["/animes/{id}"]["delete"].is_object());
        assert_eq!(
            doc["components"]["securitySchemes"]["basic_auth"]["scheme"],
            "basic"
        );
    }
}
