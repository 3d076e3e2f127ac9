//! Extractors whose rejections are rendered as error payloads instead of
//! axum's plain-text bodies.

use api_errors::{ApiError, ErrorContext, ErrorResponse};
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON body, deserialized but not validated.
pub struct JsonBody<T>(pub T);

/// JSON body that must also pass `Validate`.
pub struct ValidJson<T>(pub T);

/// The `{id}` path segment of `/animes/{id}`.
pub struct AnimeId(pub i32);

async fn read_json<T, S>(req: Request, state: &S) -> Result<(T, ErrorContext), ErrorResponse>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    let (parts, body) = req.into_parts();
    let ctx = ErrorContext::from_parts(&parts);

    match Json::<T>::from_request(Request::from_parts(parts, body), state).await {
        Ok(Json(value)) => Ok((value, ctx)),
        Err(rejection) => Err(ctx.respond_with_status(rejection.status(), rejection.body_text())),
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (value, _) = read_json(req, state).await?;
        Ok(Self(value))
    }
}

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (value, ctx) = read_json::<T, S>(req, state).await?;
        value
            .validate()
            .map_err(|errs| ctx.respond(ApiError::invalid_input(describe(&errs))))?;
        Ok(Self(value))
    }
}

impl<S> FromRequestParts<S> for AnimeId
where
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => Err(ErrorContext::from_parts(parts)
                .respond_with_status(rejection.status(), rejection.body_text())),
        }
    }
}

/// `"name: must not be blank"`, fields sorted, one entry per failure.
fn describe(errs: &ValidationErrors) -> String {
    let mut lines: Vec<String> = errs
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    lines.sort();
    lines.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rest::dto::AnimeReq;

    #[test]
    fn describe_lists_field_and_message() {
        let errs = AnimeReq { name: " ".into() }.validate().unwrap_err();
        assert_eq!(describe(&errs), "name: must not be blank");
    }
}
