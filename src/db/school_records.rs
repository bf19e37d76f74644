use anyhow::Context;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cli::{NewSchoolRecord, SchoolRecordChanges};
use crate::models::SchoolRecord;

const COLUMNS: &str = "id, student_id, grade_level, school_name, school_id, district, \
     division, region, school_year, adviser, general_average, action_taken";

pub(crate) fn from_row(row: &PgRow) -> SchoolRecord {
    SchoolRecord {
        id: row.get("id"),
        student_id: row.get("student_id"),
        grade_level: row.get("grade_level"),
        school_name: row.get("school_name"),
        school_id: row.get("school_id"),
        district: row.get("district"),
        division: row.get("division"),
        region: row.get("region"),
        school_year: row.get("school_year"),
        adviser: row.get("adviser"),
        general_average: row.get("general_average"),
        action_taken: row.get("action_taken"),
    }
}

pub async fn insert(pool: &PgPool, new: &NewSchoolRecord) -> anyhow::Result<SchoolRecord> {
    super::students::find_by_id(pool, new.student_id)
        .await?
        .with_context(|| format!("student {} not found", new.student_id))?;

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO report_card.school_records
        (id, student_id, grade_level, school_name, school_id, district,
         division, region, school_year, adviser, general_average, action_taken)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.student_id)
    .bind(new.grade_level)
    .bind(&new.school_name)
    .bind(&new.school_id)
    .bind(&new.district)
    .bind(&new.division)
    .bind(&new.region)
    .bind(&new.school_year)
    .bind(&new.adviser)
    .bind(new.general_average)
    .bind(&new.action_taken)
    .fetch_one(pool)
    .await?;

    Ok(from_row(&row))
}

/// A learner's permanent-record entries, earliest grade level first.
pub async fn list_by_student(pool: &PgPool, student_id: Uuid) -> anyhow::Result<Vec<SchoolRecord>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.school_records \
         WHERE student_id = $1 ORDER BY grade_level"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(from_row(&row));
    }
    Ok(records)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &SchoolRecordChanges,
) -> anyhow::Result<Option<SchoolRecord>> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE report_card.school_records
        SET grade_level = COALESCE($2, grade_level),
            school_name = COALESCE($3, school_name),
            school_id = COALESCE($4, school_id),
            district = COALESCE($5, district),
            division = COALESCE($6, division),
            region = COALESCE($7, region),
            school_year = COALESCE($8, school_year),
            adviser = COALESCE($9, adviser),
            general_average = COALESCE($10, general_average),
            action_taken = COALESCE($11, action_taken)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(changes.grade_level)
    .bind(&changes.school_name)
    .bind(&changes.school_id)
    .bind(&changes.district)
    .bind(&changes.division)
    .bind(&changes.region)
    .bind(&changes.school_year)
    .bind(&changes.adviser)
    .bind(changes.general_average)
    .bind(&changes.action_taken)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}
