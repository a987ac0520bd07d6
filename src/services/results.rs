// src/services/results.rs

use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        olympic_result::{OlympicResult, OlympicResultDetail, OlympicResultInput, OlympicResultListItem},
        question::QuestionListItem,
        user::{Actor, UserListItem},
    },
    services::{lookup, olympics},
};

pub(crate) async fn results_for(
    pool: &PgPool,
    olympics_ids: &[i64],
) -> Result<Vec<OlympicResult>, AppError> {
    let rows = sqlx::query_as::<_, OlympicResult>(
        r#"
        SELECT id, olympics_id, ball, created_by, modified_by, date_created, date_modified
        FROM olympic_results
        WHERE olympics_id = ANY($1)
        ORDER BY ball DESC, id
        "#,
    )
    .bind(olympics_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Expands results into their detail form: author and questions nested.
pub(crate) async fn result_details(
    pool: &PgPool,
    rows: &[OlympicResult],
) -> Result<Vec<OlympicResultDetail>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let result_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let links = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT result_id, question_id
        FROM olympic_result_questions
        WHERE result_id = ANY($1)
        ORDER BY result_id, question_id
        "#,
    )
    .bind(&result_ids)
    .fetch_all(pool)
    .await?;

    let questions =
        lookup::questions_by_id(pool, &lookup::ids(links.iter().map(|(_, q)| Some(*q)))).await?;
    let authors =
        lookup::users_by_id(pool, &lookup::ids(rows.iter().map(|r| Some(r.created_by)))).await?;
    let mut linked = lookup::group_by(links, |(result_id, _)| *result_id);

    rows.iter()
        .map(|row| -> Result<OlympicResultDetail, AppError> {
            let author = lookup::pick(&authors, row.created_by, "user")?;
            let nested = linked
                .remove(&row.id)
                .unwrap_or_default()
                .into_iter()
                .map(|(_, question_id)| {
                    lookup::pick(&questions, question_id, "question").map(QuestionListItem::from)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(OlympicResultDetail::project(
                row,
                UserListItem::from(author),
                nested,
            ))
        })
        .collect()
}

/// Results of one event in their terse form.
pub async fn list_results(
    pool: &PgPool,
    olympics_id: i64,
) -> Result<Vec<OlympicResultListItem>, AppError> {
    olympics::fetch_olympic(pool, olympics_id).await?;
    let rows = results_for(pool, &[olympics_id]).await?;
    Ok(rows.iter().map(OlympicResultListItem::from).collect())
}

pub async fn get_result(pool: &PgPool, id: i64) -> Result<OlympicResultDetail, AppError> {
    let row = sqlx::query_as::<_, OlympicResult>(
        r#"
        SELECT id, olympics_id, ball, created_by, modified_by, date_created, date_modified
        FROM olympic_results
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Result not found".to_string()))?;

    single_detail(pool, row).await
}

/// Stores a scored submission and its question links in one transaction.
pub async fn create_result(
    pool: &PgPool,
    actor: &Actor,
    olympics_id: i64,
    input: OlympicResultInput,
) -> Result<OlympicResultDetail, AppError> {
    input.validate()?;
    olympics::fetch_olympic(pool, olympics_id).await?;

    let question_ids = lookup::ids(input.questions.iter().copied().map(Some));

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, OlympicResult>(
        r#"
        INSERT INTO olympic_results (olympics_id, ball, created_by, modified_by)
        VALUES ($1, $2, $3, $3)
        RETURNING id, olympics_id, ball, created_by, modified_by, date_created, date_modified
        "#,
    )
    .bind(olympics_id)
    .bind(input.ball)
    .bind(actor.id)
    .fetch_one(&mut *tx)
    .await?;

    if !question_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO olympic_result_questions (result_id, question_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(row.id)
        .bind(&question_ids)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        result_id = row.id,
        olympics_id,
        questions = question_ids.len(),
        actor = actor.id,
        "Olympics result stored"
    );

    single_detail(pool, row).await
}

async fn single_detail(pool: &PgPool, row: OlympicResult) -> Result<OlympicResultDetail, AppError> {
    result_details(pool, std::slice::from_ref(&row))
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalServerError(format!("result {} vanished", row.id)))
}
