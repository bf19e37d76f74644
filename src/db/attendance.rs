use anyhow::Context;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cli::{AttendanceChanges, NewAttendance};
use crate::models::{Attendance, AttendanceWithStudent};

const COLUMNS: &str =
    "id, student_id, month, days_of_school, days_present, days_absent, times_tardy";

pub(crate) fn from_row(row: &PgRow) -> Attendance {
    Attendance {
        id: row.get("id"),
        student_id: row.get("student_id"),
        month: row.get("month"),
        days_of_school: row.get("days_of_school"),
        days_present: row.get("days_present"),
        days_absent: row.get("days_absent"),
        times_tardy: row.get("times_tardy"),
    }
}

pub async fn insert(pool: &PgPool, new: &NewAttendance) -> anyhow::Result<Attendance> {
    super::students::find_by_id(pool, new.student_id)
        .await?
        .with_context(|| format!("student {} not found", new.student_id))?;

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO report_card.attendance
        (id, student_id, month, days_of_school, days_present, days_absent, times_tardy)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.student_id)
    .bind(&new.month)
    .bind(new.days_of_school)
    .bind(new.days_present)
    .bind(new.days_absent)
    .bind(new.times_tardy)
    .fetch_one(pool)
    .await?;

    Ok(from_row(&row))
}

pub async fn list_by_student(pool: &PgPool, student_id: Uuid) -> anyhow::Result<Vec<Attendance>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.attendance WHERE student_id = $1"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(from_row(&row));
    }
    Ok(entries)
}

pub async fn list_all(pool: &PgPool) -> anyhow::Result<Vec<Attendance>> {
    let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM report_card.attendance"))
        .fetch_all(pool)
        .await?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(from_row(&row));
    }
    Ok(entries)
}

/// Every attendance row joined with the learner it belongs to.
pub async fn list_with_students(pool: &PgPool) -> anyhow::Result<Vec<AttendanceWithStudent>> {
    let rows = sqlx::query(
        "SELECT a.student_id, s.first_name, s.last_name, a.month, a.days_of_school, \
         a.days_present, a.days_absent, a.times_tardy \
         FROM report_card.attendance a \
         JOIN report_card.students s ON s.id = a.student_id",
    )
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::new();
    for row in rows {
        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");
        entries.push(AttendanceWithStudent {
            student_id: row.get("student_id"),
            student_name: format!("{first_name} {last_name}"),
            month: row.get("month"),
            days_of_school: row.get("days_of_school"),
            days_present: row.get("days_present"),
            days_absent: row.get("days_absent"),
            times_tardy: row.get("times_tardy"),
        });
    }
    Ok(entries)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &AttendanceChanges,
) -> anyhow::Result<Option<Attendance>> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE report_card.attendance
        SET month = COALESCE($2, month),
            days_of_school = COALESCE($3, days_of_school),
            days_present = COALESCE($4, days_present),
            days_absent = COALESCE($5, days_absent),
            times_tardy = COALESCE($6, times_tardy)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.month)
    .bind(changes.days_of_school)
    .bind(changes.days_present)
    .bind(changes.days_absent)
    .bind(changes.times_tardy)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}
