use anyhow::Context;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cli::{NewObservedValue, ObservedValueChanges};
use crate::models::ObservedValue;

const COLUMNS: &str = "id, student_id, core_value, behavior_statement, q1, q2, q3, q4";

pub(crate) fn from_row(row: &PgRow) -> ObservedValue {
    ObservedValue {
        id: row.get("id"),
        student_id: row.get("student_id"),
        core_value: row.get("core_value"),
        behavior_statement: row.get("behavior_statement"),
        q1: row.get("q1"),
        q2: row.get("q2"),
        q3: row.get("q3"),
        q4: row.get("q4"),
    }
}

pub async fn insert(pool: &PgPool, new: &NewObservedValue) -> anyhow::Result<ObservedValue> {
    super::students::find_by_id(pool, new.student_id)
        .await?
        .with_context(|| format!("student {} not found", new.student_id))?;

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO report_card.observed_values
        (id, student_id, core_value, behavior_statement, q1, q2, q3, q4)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.student_id)
    .bind(&new.core_value)
    .bind(&new.behavior_statement)
    .bind(&new.q1)
    .bind(&new.q2)
    .bind(&new.q3)
    .bind(&new.q4)
    .fetch_one(pool)
    .await?;

    Ok(from_row(&row))
}

pub async fn list_by_student(
    pool: &PgPool,
    student_id: Uuid,
) -> anyhow::Result<Vec<ObservedValue>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.observed_values WHERE student_id = $1"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    let mut values = Vec::new();
    for row in rows {
        values.push(from_row(&row));
    }
    Ok(values)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &ObservedValueChanges,
) -> anyhow::Result<Option<ObservedValue>> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE report_card.observed_values
        SET core_value = COALESCE($2, core_value),
            behavior_statement = COALESCE($3, behavior_statement),
            q1 = COALESCE($4, q1),
            q2 = COALESCE($5, q2),
            q3 = COALESCE($6, q3),
            q4 = COALESCE($7, q4)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.core_value)
    .bind(&changes.behavior_statement)
    .bind(&changes.q1)
    .bind(&changes.q2)
    .bind(&changes.q3)
    .bind(&changes.q4)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM report_card.observed_values WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
