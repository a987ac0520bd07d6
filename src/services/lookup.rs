// src/services/lookup.rs

//! Batched loaders for the objects nested inside read shapes.

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{question::Question, subject::Subject, user::User},
};

pub async fn users_by_id(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, User>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role, created_at
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn subjects_by_id(
    pool: &PgPool,
    ids: &[i64],
) -> Result<HashMap<i64, Subject>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let subjects = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(subjects.into_iter().map(|s| (s.id, s)).collect())
}

pub async fn questions_by_id(
    pool: &PgPool,
    ids: &[i64],
) -> Result<HashMap<i64, Question>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, subject_id, question, options, answer, created_at
        FROM questions
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(questions.into_iter().map(|q| (q.id, q)).collect())
}

/// Looks up an object that a foreign key guarantees to exist.
pub fn pick<'a, T>(map: &'a HashMap<i64, T>, id: i64, what: &str) -> Result<&'a T, AppError> {
    map.get(&id).ok_or_else(|| {
        AppError::InternalServerError(format!("{} {} is referenced but missing", what, id))
    })
}

/// Buckets rows by a parent id, keeping their order.
pub fn group_by<T>(rows: Vec<T>, key: impl Fn(&T) -> i64) -> HashMap<i64, Vec<T>> {
    let mut groups: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

/// Sorted, de-duplicated ids, skipping `None`.
pub fn ids<I>(values: I) -> Vec<i64>
where
    I: IntoIterator<Item = Option<i64>>,
{
    let mut ids: Vec<i64> = values.into_iter().flatten().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
