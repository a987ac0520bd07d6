// src/handlers/catalogue.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    error::{AppError, ErrorBody},
    models::{
        question::CreateQuestionRequest,
        subject::{CreateSubjectRequest, Subject},
        user::Actor,
    },
    services::catalogue,
    utils::json::AppJson,
};

#[utoipa::path(
    get,
    path = "/api/subjects",
    tag = "Catalogue",
    responses((status = 200, description = "All subjects", body = Vec<Subject>))
)]
pub async fn list_subjects(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(catalogue::list_subjects(&pool).await?))
}

/// Admin only.
#[utoipa::path(
    post,
    path = "/api/admin/subjects",
    tag = "Catalogue",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Name taken", body = ErrorBody),
    ),
    security(("jwt" = []))
)]
pub async fn create_subject(
    State(pool): State<PgPool>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<CreateSubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let subject = catalogue::create_subject(&pool, &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// Admin only.
#[utoipa::path(
    post,
    path = "/api/admin/questions",
    tag = "Catalogue",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created"),
        (status = 400, description = "Validation error or unknown subject", body = ErrorBody),
    ),
    security(("jwt" = []))
)]
pub async fn create_question(
    State(pool): State<PgPool>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = catalogue::create_question(&pool, &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}
