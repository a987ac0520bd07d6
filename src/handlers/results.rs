// src/handlers/results.rs

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
        olympic_result::{OlympicResultDetail, OlympicResultInput, OlympicResultListItem},
        olympic_student_test::{OlympicStudentTestInput, OlympicStudentTestItem},
        user::Actor,
    },
    services::{olympic_student_tests, results},
    utils::json::AppJson,
};

#[utoipa::path(
    get,
    path = "/api/olympics/{id}/results",
    tag = "Results",
    params(("id" = i64, Path, description = "Olympics id")),
    responses(
        (status = 200, description = "Results, best first", body = Vec<OlympicResultListItem>),
        (status = 404, description = "Not found", body = ErrorBody),
    )
)]
pub async fn list_results(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(results::list_results(&pool, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/olympics/{id}/results",
    tag = "Results",
    params(("id" = i64, Path, description = "Olympics id")),
    request_body = OlympicResultInput,
    responses(
        (status = 201, description = "Result stored", body = OlympicResultDetail),
        (status = 400, description = "Validation error or unknown question", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    security(("jwt" = []))
)]
pub async fn create_result(
    State(pool): State<PgPool>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<OlympicResultInput>,
) -> Result<impl IntoResponse, AppError> {
    let created = results::create_result(&pool, &actor, id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/olympic-results/{id}",
    tag = "Results",
    params(("id" = i64, Path, description = "Result id")),
    responses(
        (status = 200, description = "Result with nested questions", body = OlympicResultDetail),
        (status = 404, description = "Not found", body = ErrorBody),
    )
)]
pub async fn get_result(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(results::get_result(&pool, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/olympics/{id}/student-tests",
    tag = "Results",
    params(("id" = i64, Path, description = "Olympics id")),
    responses(
        (status = 200, description = "Linked attempts", body = Vec<OlympicStudentTestItem>),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    security(("jwt" = []))
)]
pub async fn list_student_tests(
    State(pool): State<PgPool>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        olympic_student_tests::list_student_tests(&pool, &actor, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/olympics/{id}/student-tests",
    tag = "Results",
    params(("id" = i64, Path, description = "Olympics id")),
    request_body = OlympicStudentTestInput,
    responses(
        (status = 201, description = "Attempt linked", body = OlympicStudentTestItem),
        (status = 403, description = "Attempt belongs to someone else", body = ErrorBody),
        (status = 404, description = "Event or attempt not found", body = ErrorBody),
    ),
    security(("jwt" = []))
)]
pub async fn link_student_test(
    State(pool): State<PgPool>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<OlympicStudentTestInput>,
) -> Result<impl IntoResponse, AppError> {
    let linked = olympic_student_tests::link_student_test(&pool, &actor, id, payload).await?;
    Ok((StatusCode::CREATED, Json(linked)))
}
