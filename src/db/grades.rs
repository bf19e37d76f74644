use anyhow::Context;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cli::{GradeChanges, NewGrade};
use crate::models::Grade;

const COLUMNS: &str = "id, student_id, subject_name, q1, q2, q3, q4, final_rating, remarks, \
     semester, subject_type, sem_final_grade";

pub(crate) fn from_row(row: &PgRow) -> Grade {
    Grade {
        id: row.get("id"),
        student_id: row.get("student_id"),
        subject_name: row.get("subject_name"),
        q1: row.get("q1"),
        q2: row.get("q2"),
        q3: row.get("q3"),
        q4: row.get("q4"),
        final_rating: row.get("final_rating"),
        remarks: row.get("remarks"),
        semester: row.get("semester"),
        subject_type: row.get("subject_type"),
        sem_final_grade: row.get("sem_final_grade"),
    }
}

pub async fn insert(pool: &PgPool, new: &NewGrade) -> anyhow::Result<Grade> {
    super::students::find_by_id(pool, new.student_id)
        .await?
        .with_context(|| format!("student {} not found", new.student_id))?;

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO report_card.grades
        (id, student_id, subject_name, q1, q2, q3, q4, final_rating, remarks,
         semester, subject_type, sem_final_grade)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.student_id)
    .bind(&new.subject_name)
    .bind(new.q1)
    .bind(new.q2)
    .bind(new.q3)
    .bind(new.q4)
    .bind(new.final_rating)
    .bind(&new.remarks)
    .bind(&new.semester)
    .bind(&new.subject_type)
    .bind(new.sem_final_grade)
    .fetch_one(pool)
    .await?;

    Ok(from_row(&row))
}

pub async fn list_by_student(pool: &PgPool, student_id: Uuid) -> anyhow::Result<Vec<Grade>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.grades WHERE student_id = $1 ORDER BY subject_name"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    let mut grades = Vec::new();
    for row in rows {
        grades.push(from_row(&row));
    }
    Ok(grades)
}

/// All grade rows, optionally restricted to students of one grade level.
pub async fn list_for_grade_level(
    pool: &PgPool,
    grade_level: Option<i32>,
) -> anyhow::Result<Vec<Grade>> {
    let mut query = String::from(
        "SELECT g.id, g.student_id, g.subject_name, g.q1, g.q2, g.q3, g.q4, \
         g.final_rating, g.remarks, g.semester, g.subject_type, g.sem_final_grade \
         FROM report_card.grades g \
         JOIN report_card.students s ON s.id = g.student_id",
    );
    if grade_level.is_some() {
        query.push_str(" WHERE s.grade_level = $1");
    }

    let mut rows = sqlx::query(&query);
    if let Some(level) = grade_level {
        rows = rows.bind(level);
    }

    let records = rows.fetch_all(pool).await?;
    let mut grades = Vec::new();
    for row in records {
        grades.push(from_row(&row));
    }
    Ok(grades)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &GradeChanges,
) -> anyhow::Result<Option<Grade>> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE report_card.grades
        SET subject_name = COALESCE($2, subject_name),
            q1 = COALESCE($3, q1),
            q2 = COALESCE($4, q2),
            q3 = COALESCE($5, q3),
            q4 = COALESCE($6, q4),
            final_rating = COALESCE($7, final_rating),
            remarks = COALESCE($8, remarks),
            semester = COALESCE($9, semester),
            subject_type = COALESCE($10, subject_type),
            sem_final_grade = COALESCE($11, sem_final_grade)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.subject_name)
    .bind(changes.q1)
    .bind(changes.q2)
    .bind(changes.q3)
    .bind(changes.q4)
    .bind(changes.final_rating)
    .bind(&changes.remarks)
    .bind(&changes.semester)
    .bind(&changes.subject_type)
    .bind(changes.sem_final_grade)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM report_card.grades WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
