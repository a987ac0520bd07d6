// src/handlers/olympics.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::{AppError, ErrorBody},
    models::{
        olympics::{
            OlympicDetail, OlympicItem, OlympicPostInput, OlympicSubjectListItem,
            OlympicUpdateInput,
        },
        user::Actor,
    },
    services::olympics,
    utils::json::AppJson,
};

/// Lists every Olympics event with its subjects and terse results.
#[utoipa::path(
    get,
    path = "/api/olympics",
    tag = "Olympics",
    responses((status = 200, description = "All events", body = Vec<OlympicItem>))
)]
pub async fn list_olympics(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(olympics::list_olympics(&pool).await?))
}

/// Creates an event and its subject slots, attributed to the caller.
/// Staff only.
#[utoipa::path(
    post,
    path = "/api/olympics",
    tag = "Olympics",
    request_body = OlympicPostInput,
    responses(
        (status = 201, description = "Event created", body = OlympicItem),
        (status = 400, description = "Validation error or unknown subject", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Staff role required", body = ErrorBody),
    ),
    security(("jwt" = []))
)]
pub async fn create_olympic(
    State(pool): State<PgPool>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<OlympicPostInput>,
) -> Result<impl IntoResponse, AppError> {
    let created = olympics::create_olympic(&pool, &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/olympics/{id}",
    tag = "Olympics",
    params(("id" = i64, Path, description = "Olympics id")),
    responses(
        (status = 200, description = "Event with expanded results", body = OlympicDetail),
        (status = 404, description = "Not found", body = ErrorBody),
    )
)]
pub async fn get_olympic(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(olympics::get_olympic(&pool, id).await?))
}

/// Partial update of title, image, text and the time window.
/// Omitted fields keep their value. Staff only; PUT behaves the same.
#[utoipa::path(
    patch,
    path = "/api/olympics/{id}",
    tag = "Olympics",
    params(("id" = i64, Path, description = "Olympics id")),
    request_body = OlympicUpdateInput,
    responses(
        (status = 200, description = "Updated event", body = OlympicDetail),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Staff role required", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    security(("jwt" = []))
)]
pub async fn update_olympic(
    State(pool): State<PgPool>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<OlympicUpdateInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(olympics::update_olympic(&pool, &actor, id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/olympics/{id}/subjects",
    tag = "Olympics",
    params(("id" = i64, Path, description = "Olympics id")),
    responses(
        (status = 200, description = "Subject slots", body = Vec<OlympicSubjectListItem>),
        (status = 404, description = "Not found", body = ErrorBody),
    )
)]
pub async fn list_olympic_subjects(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(olympics::list_olympic_subjects(&pool, id).await?))
}
