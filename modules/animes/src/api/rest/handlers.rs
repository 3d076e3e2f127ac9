use std::sync::Arc;

use api_errors::{ErrorContext, ErrorPayload, ErrorResponse};
use axum::{http::StatusCode, response::Json, Extension};
use tracing::info;

use crate::api::rest::dto::{AnimeDto, AnimeReq};
use crate::api::rest::extract::{AnimeId, JsonBody, ValidJson};
use crate::contract::model::{Anime, NewAnime};
use crate::domain::service::Service;

/// List all animes
#[utoipa::path(
    get,
    path = "/animes",
    tag = "animes",
    operation_id = "animes.list",
    responses(
        (status = 200, description = "All animes", body = [AnimeDto]),
        (status = 401, description = "Unauthenticated", body = ErrorPayload),
        (status = 403, description = "Requires USER and ADMIN", body = ErrorPayload),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_animes(
    Extension(svc): Extension<Arc<Service>>,
    ctx: ErrorContext,
) -> Result<Json<Vec<AnimeDto>>, ErrorResponse> {
    info!("Listing animes");

    let animes = svc
        .find_all()
        .await
        .map_err(|e| ctx.respond(e))?;
    Ok(Json(animes.into_iter().map(AnimeDto::from).collect()))
}

/// Get an anime by id
#[utoipa::path(
    get,
    path = "/animes/{id}",
    tag = "animes",
    operation_id = "animes.get",
    params(("id" = i32, Path, description = "Anime id")),
    responses(
        (status = 200, description = "Anime found", body = AnimeDto),
        (status = 400, description = "Id is not an integer", body = ErrorPayload),
        (status = 404, description = "No anime with this id", body = ErrorPayload),
    ),
    security(("basic_auth" = []))
)]
pub async fn get_anime(
    Extension(svc): Extension<Arc<Service>>,
    ctx: ErrorContext,
    AnimeId(id): AnimeId,
) -> Result<Json<AnimeDto>, ErrorResponse> {
    info!("Getting anime with id: {}", id);

    let anime = svc
        .find_by_id(id)
        .await
        .map_err(|e| ctx.respond(e))?;
    Ok(Json(anime.into()))
}

/// Create an anime
#[utoipa::path(
    post,
    path = "/animes",
    tag = "animes",
    operation_id = "animes.create",
    request_body = AnimeReq,
    responses(
        (status = 201, description = "Created anime", body = AnimeDto),
        (status = 400, description = "Blank name or malformed body", body = ErrorPayload),
        (status = 403, description = "Requires ADMIN", body = ErrorPayload),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_anime(
    Extension(svc): Extension<Arc<Service>>,
    ctx: ErrorContext,
    ValidJson(req): ValidJson<AnimeReq>,
) -> Result<(StatusCode, Json<AnimeDto>), ErrorResponse> {
    info!("Creating anime: {:?}", req);

    let anime = svc
        .create(req.into())
        .await
        .map_err(|e| ctx.respond(e))?;
    Ok((StatusCode::CREATED, Json(anime.into())))
}

/// Create several animes at once.
///
/// Every element is saved before names are checked. A blank name fails the
/// request with 400 but the records already written stay in storage.
#[utoipa::path(
    post,
    path = "/animes/batch",
    tag = "animes",
    operation_id = "animes.create_batch",
    request_body = [AnimeReq],
    responses(
        (status = 201, description = "Created animes, in request order", body = [AnimeDto]),
        (status = 400, description = "A saved record has a blank name", body = ErrorPayload),
        (status = 403, description = "Requires ADMIN", body = ErrorPayload),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_batch(
    Extension(svc): Extension<Arc<Service>>,
    ctx: ErrorContext,
    JsonBody(reqs): JsonBody<Vec<AnimeReq>>,
) -> Result<(StatusCode, Json<Vec<AnimeDto>>), ErrorResponse> {
    info!("Creating batch of {} animes", reqs.len());

    let batch: Vec<NewAnime> = reqs.into_iter().map(NewAnime::from).collect();
    let saved = svc
        .save_batch(batch)
        .await
        .map_err(|e| ctx.respond(e))?;
    Ok((
        StatusCode::CREATED,
        Json(saved.into_iter().map(AnimeDto::from).collect()),
    ))
}

/// Replace an anime
#[utoipa::path(
    put,
    path = "/animes/{id}",
    tag = "animes",
    operation_id = "animes.update",
    params(("id" = i32, Path, description = "Anime id")),
    request_body = AnimeReq,
    responses(
        (status = 204, description = "Replaced"),
        (status = 400, description = "Blank name or malformed body", body = ErrorPayload),
        (status = 404, description = "No anime with this id", body = ErrorPayload),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_anime(
    Extension(svc): Extension<Arc<Service>>,
    ctx: ErrorContext,
    AnimeId(id): AnimeId,
    ValidJson(req): ValidJson<AnimeReq>,
) -> Result<StatusCode, ErrorResponse> {
    info!("Updating anime {} with: {:?}", id, req);

    svc.update(Anime::new(req.name).with_id(id))
        .await
        .map_err(|e| ctx.respond(e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an anime
#[utoipa::path(
    delete,
    path = "/animes/{id}",
    tag = "animes",
    operation_id = "animes.delete",
    params(("id" = i32, Path, description = "Anime id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No anime with this id", body = ErrorPayload),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_anime(
    Extension(svc): Extension<Arc<Service>>,
    ctx: ErrorContext,
    AnimeId(id): AnimeId,
) -> Result<StatusCode, ErrorResponse> {
    info!("Deleting anime: {}", id);

    svc.delete(id)
        .await
        .map_err(|e| ctx.respond(e))?;
    Ok(StatusCode::NO_CONTENT)
}
