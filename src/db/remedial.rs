use anyhow::Context;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cli::{NewRemedial, RemedialChanges};
use crate::models::RemedialClass;

const COLUMNS: &str = "id, student_id, subject_name, final_rating, remedial_class_mark, \
     recomputed_final_grade, remarks, conducted_from, conducted_to, school";

pub(crate) fn from_row(row: &PgRow) -> RemedialClass {
    RemedialClass {
        id: row.get("id"),
        student_id: row.get("student_id"),
        subject_name: row.get("subject_name"),
        final_rating: row.get("final_rating"),
        remedial_class_mark: row.get("remedial_class_mark"),
        recomputed_final_grade: row.get("recomputed_final_grade"),
        remarks: row.get("remarks"),
        conducted_from: row.get("conducted_from"),
        conducted_to: row.get("conducted_to"),
        school: row.get("school"),
    }
}

pub async fn insert(pool: &PgPool, new: &NewRemedial) -> anyhow::Result<RemedialClass> {
    super::students::find_by_id(pool, new.student_id)
        .await?
        .with_context(|| format!("student {} not found", new.student_id))?;

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO report_card.remedial_classes
        (id, student_id, subject_name, final_rating, remedial_class_mark,
         recomputed_final_grade, remarks, conducted_from, conducted_to, school)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.student_id)
    .bind(&new.subject_name)
    .bind(new.final_rating)
    .bind(&new.remedial_class_mark)
    .bind(new.recomputed_final_grade)
    .bind(&new.remarks)
    .bind(new.conducted_from)
    .bind(new.conducted_to)
    .bind(&new.school)
    .fetch_one(pool)
    .await?;

    Ok(from_row(&row))
}

pub async fn list_by_student(
    pool: &PgPool,
    student_id: Uuid,
) -> anyhow::Result<Vec<RemedialClass>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.remedial_classes WHERE student_id = $1"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    let mut classes = Vec::new();
    for row in rows {
        classes.push(from_row(&row));
    }
    Ok(classes)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &RemedialChanges,
) -> anyhow::Result<Option<RemedialClass>> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE report_card.remedial_classes
        SET subject_name = COALESCE($2, subject_name),
            final_rating = COALESCE($3, final_rating),
            remedial_class_mark = COALESCE($4, remedial_class_mark),
            recomputed_final_grade = COALESCE($5, recomputed_final_grade),
            remarks = COALESCE($6, remarks),
            conducted_from = COALESCE($7, conducted_from),
            conducted_to = COALESCE($8, conducted_to),
            school = COALESCE($9, school)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.subject_name)
    .bind(changes.final_rating)
    .bind(&changes.remedial_class_mark)
    .bind(changes.recomputed_final_grade)
    .bind(&changes.remarks)
    .bind(changes.conducted_from)
    .bind(changes.conducted_to)
    .bind(&changes.school)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}
