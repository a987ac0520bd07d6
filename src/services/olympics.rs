// src/services/olympics.rs

use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        olympics::{
            Olympic, OlympicDetail, OlympicItem, OlympicPostInput, OlympicSubjectListItem,
            OlympicUpdateInput, OlympicsSubject,
        },
        user::{Actor, UserListItem},
    },
    services::{lookup, results},
    utils::html::clean_rich_text,
};

pub(crate) async fn fetch_olympic(pool: &PgPool, id: i64) -> Result<Olympic, AppError> {
    sqlx::query_as::<_, Olympic>(
        r#"
        SELECT id, title, image, text, time_start, time_end,
               created_by, modified_by, date_created, date_modified
        FROM olympics
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Olympics not found".to_string()))
}

async fn subjects_for(pool: &PgPool, olympics_ids: &[i64]) -> Result<Vec<OlympicsSubject>, AppError> {
    let subjects = sqlx::query_as::<_, OlympicsSubject>(
        r#"
        SELECT id, olympics_id, subject_id, questions_count, ball,
               created_by, modified_by, date_created, date_modified
        FROM olympics_subjects
        WHERE olympics_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(olympics_ids)
    .fetch_all(pool)
    .await?;

    Ok(subjects)
}

/// Lists every event, newest start first, with subjects and terse results.
pub async fn list_olympics(pool: &PgPool) -> Result<Vec<OlympicItem>, AppError> {
    let olympics = sqlx::query_as::<_, Olympic>(
        r#"
        SELECT id, title, image, text, time_start, time_end,
               created_by, modified_by, date_created, date_modified
        FROM olympics
        ORDER BY time_start DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = olympics.iter().map(|o| o.id).collect();
    let mut subjects = lookup::group_by(subjects_for(pool, &ids).await?, |s| s.olympics_id);
    let mut scored = lookup::group_by(results::results_for(pool, &ids).await?, |r| r.olympics_id);
    let creators =
        lookup::users_by_id(pool, &lookup::ids(olympics.iter().map(|o| Some(o.created_by)))).await?;

    olympics
        .iter()
        .map(|olympic| -> Result<OlympicItem, AppError> {
            let creator = lookup::pick(&creators, olympic.created_by, "user")?;
            let slots = subjects.remove(&olympic.id).unwrap_or_default();
            let rows = scored.remove(&olympic.id).unwrap_or_default();
            Ok(OlympicItem::project(
                olympic,
                UserListItem::from(creator),
                &slots,
                &rows,
            ))
        })
        .collect()
}

/// One event with its subjects and fully expanded results.
pub async fn get_olympic(pool: &PgPool, id: i64) -> Result<OlympicDetail, AppError> {
    let olympic = fetch_olympic(pool, id).await?;
    let subjects = subjects_for(pool, &[id]).await?;
    let rows = results::results_for(pool, &[id]).await?;
    let details = results::result_details(pool, &rows).await?;

    Ok(OlympicDetail::project(&olympic, &subjects, details))
}

/// Subject slots of one event with the subject expanded.
pub async fn list_olympic_subjects(
    pool: &PgPool,
    id: i64,
) -> Result<Vec<OlympicSubjectListItem>, AppError> {
    fetch_olympic(pool, id).await?;
    let slots = subjects_for(pool, &[id]).await?;
    let subjects =
        lookup::subjects_by_id(pool, &lookup::ids(slots.iter().map(|s| Some(s.subject_id)))).await?;

    slots
        .iter()
        .map(|slot| -> Result<OlympicSubjectListItem, AppError> {
            let subject = lookup::pick(&subjects, slot.subject_id, "subject")?;
            Ok(OlympicSubjectListItem::project(slot, subject.clone()))
        })
        .collect()
}

/// Creates an event together with its subject slots.
///
/// The event row and every slot are written in one transaction; if any slot
/// fails (e.g. an unknown subject) nothing is stored. Both the event and its
/// slots are attributed to `actor`.
pub async fn create_olympic(
    pool: &PgPool,
    actor: &Actor,
    input: OlympicPostInput,
) -> Result<OlympicItem, AppError> {
    input.validate()?;

    let OlympicPostInput {
        title,
        image,
        text,
        time_start,
        time_end,
        subjects,
    } = input;

    let mut tx = pool.begin().await?;

    let olympic = sqlx::query_as::<_, Olympic>(
        r#"
        INSERT INTO olympics (title, image, text, time_start, time_end, created_by, modified_by)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, title, image, text, time_start, time_end,
                  created_by, modified_by, date_created, date_modified
        "#,
    )
    .bind(title)
    .bind(image)
    .bind(clean_rich_text(&text))
    .bind(time_start)
    .bind(time_end)
    .bind(actor.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert olympics: {:?}", e);
        AppError::from(e)
    })?;

    let mut slots = Vec::with_capacity(subjects.len());
    for subject in subjects {
        let slot = sqlx::query_as::<_, OlympicsSubject>(
            r#"
            INSERT INTO olympics_subjects
                (olympics_id, subject_id, questions_count, ball, created_by, modified_by)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, olympics_id, subject_id, questions_count, ball,
                      created_by, modified_by, date_created, date_modified
            "#,
        )
        .bind(olympic.id)
        .bind(subject.subject)
        .bind(subject.questions_count)
        .bind(subject.ball)
        .bind(actor.id)
        .fetch_one(&mut *tx)
        .await?;
        slots.push(slot);
    }

    tx.commit().await?;

    tracing::info!(
        olympics_id = olympic.id,
        subjects = slots.len(),
        actor = actor.id,
        "Olympics created"
    );

    let creators = lookup::users_by_id(pool, &[actor.id]).await?;
    let creator = lookup::pick(&creators, actor.id, "user")?;

    Ok(OlympicItem::project(
        &olympic,
        UserListItem::from(creator),
        &slots,
        &[],
    ))
}

/// Merges the supplied scalar fields into an event and saves it once.
///
/// The row is locked for the read-merge-write, so concurrent partial updates
/// of different fields do not overwrite each other.
pub async fn update_olympic(
    pool: &PgPool,
    actor: &Actor,
    id: i64,
    input: OlympicUpdateInput,
) -> Result<OlympicDetail, AppError> {
    input.check()?;
    let input = OlympicUpdateInput {
        text: input.text.map(|text| clean_rich_text(&text)),
        ..input
    };

    let mut tx = pool.begin().await?;

    let mut olympic = sqlx::query_as::<_, Olympic>(
        r#"
        SELECT id, title, image, text, time_start, time_end,
               created_by, modified_by, date_created, date_modified
        FROM olympics
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Olympics not found".to_string()))?;

    input.apply(&mut olympic);

    sqlx::query(
        r#"
        UPDATE olympics
        SET title = $1, image = $2, text = $3, time_start = $4, time_end = $5,
            modified_by = $6, date_modified = CURRENT_TIMESTAMP
        WHERE id = $7
        "#,
    )
    .bind(&olympic.title)
    .bind(&olympic.image)
    .bind(&olympic.text)
    .bind(olympic.time_start)
    .bind(olympic.time_end)
    .bind(actor.id)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(olympics_id = id, actor = actor.id, "Olympics updated");

    get_olympic(pool, id).await
}
