use anyhow::bail;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cli::{NewSubject, SubjectChanges};
use crate::models::Subject;

pub(crate) fn from_row(row: &PgRow) -> Subject {
    Subject {
        id: row.get("id"),
        name: row.get("name"),
        code: row.get("code"),
    }
}

pub async fn insert(pool: &PgPool, new: &NewSubject) -> anyhow::Result<Subject> {
    let existing = sqlx::query("SELECT id FROM report_card.subjects WHERE name = $1")
        .bind(&new.name)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        bail!("subject {} already exists", new.name);
    }

    let row = sqlx::query(
        r#"
        INSERT INTO report_card.subjects (id, name, code)
        VALUES ($1, $2, $3)
        RETURNING id, name, code
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(&new.code)
    .fetch_one(pool)
    .await?;

    Ok(from_row(&row))
}

pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<Subject>> {
    let rows = sqlx::query("SELECT id, name, code FROM report_card.subjects ORDER BY name")
        .fetch_all(pool)
        .await?;

    let mut subjects = Vec::new();
    for row in rows {
        subjects.push(from_row(&row));
    }
    Ok(subjects)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Subject>> {
    let row = sqlx::query("SELECT id, name, code FROM report_card.subjects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &SubjectChanges,
) -> anyhow::Result<Option<Subject>> {
    if let Some(name) = &changes.name {
        let taken = sqlx::query("SELECT id FROM report_card.subjects WHERE name = $1 AND id <> $2")
            .bind(name)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if taken.is_some() {
            bail!("subject {name} already exists");
        }
    }

    let row = sqlx::query(
        r#"
        UPDATE report_card.subjects
        SET name = COALESCE($2, name),
            code = COALESCE($3, code)
        WHERE id = $1
        RETURNING id, name, code
        "#,
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.code)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM report_card.subjects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
