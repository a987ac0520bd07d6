// src/services/catalogue.rs

//! Subjects and questions. Owned by the tests catalogue; Olympics only
//! reference them.

use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        question::CreateQuestionRequest,
        subject::{CreateSubjectRequest, Subject},
        user::Actor,
    },
};

pub async fn list_subjects(pool: &PgPool) -> Result<Vec<Subject>, AppError> {
    let subjects = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(subjects)
}

pub async fn create_subject(
    pool: &PgPool,
    actor: &Actor,
    input: CreateSubjectRequest,
) -> Result<Subject, AppError> {
    input.validate()?;

    let subject = sqlx::query_as::<_, Subject>(
        "INSERT INTO subjects (name) VALUES ($1) RETURNING id, name",
    )
    .bind(input.name.trim())
    .fetch_one(pool)
    .await?;

    tracing::info!(subject_id = subject.id, actor = actor.id, "Subject created");
    Ok(subject)
}

/// Returns the new question's id.
pub async fn create_question(
    pool: &PgPool,
    actor: &Actor,
    input: CreateQuestionRequest,
) -> Result<i64, AppError> {
    input.validate()?;

    let id: i64 = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO questions (subject_id, question, options, answer)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(input.subject)
    .bind(&input.question)
    .bind(sqlx::types::Json(&input.options))
    .bind(&input.answer)
    .fetch_one(pool)
    .await?;

    tracing::info!(question_id = id, subject_id = input.subject, actor = actor.id, "Question created");
    Ok(id)
}
