use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cli::{NewStudent, StudentChanges};
use crate::models::{Attendance, Grade, ReportCard, Student, StudentWithRecords};

const COLUMNS: &str = "id, lrn, first_name, last_name, middle_name, birthdate, sex, age, \
     grade_level, section, school_year, track, education_level, strand";

pub(crate) fn from_row(row: &PgRow) -> Student {
    Student {
        id: row.get("id"),
        lrn: row.get("lrn"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        middle_name: row.get("middle_name"),
        birthdate: row.get("birthdate"),
        sex: row.get("sex"),
        age: row.get("age"),
        grade_level: row.get("grade_level"),
        section: row.get("section"),
        school_year: row.get("school_year"),
        track: row.get("track"),
        education_level: row.get("education_level"),
        strand: row.get("strand"),
    }
}

pub async fn insert(pool: &PgPool, new: &NewStudent) -> anyhow::Result<Student> {
    let existing = sqlx::query("SELECT id FROM report_card.students WHERE lrn = $1")
        .bind(&new.lrn)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        anyhow::bail!("a learner with LRN {} is already enrolled", new.lrn);
    }

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO report_card.students
        (id, lrn, first_name, last_name, middle_name, birthdate, sex, age,
         grade_level, section, school_year, track, education_level, strand)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.lrn)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.middle_name)
    .bind(new.birthdate)
    .bind(&new.sex)
    .bind(new.age)
    .bind(new.grade_level)
    .bind(&new.section)
    .bind(&new.school_year)
    .bind(&new.track)
    .bind(&new.education_level)
    .bind(&new.strand)
    .fetch_one(pool)
    .await?;

    Ok(from_row(&row))
}

pub async fn list(
    pool: &PgPool,
    grade_level: Option<i32>,
    section: Option<&str>,
) -> anyhow::Result<Vec<Student>> {
    let mut query = format!("SELECT {COLUMNS} FROM report_card.students");
    let mut clauses = Vec::new();
    let mut param = 0;

    if grade_level.is_some() {
        param += 1;
        clauses.push(format!("grade_level = ${param}"));
    }
    if section.is_some() {
        param += 1;
        clauses.push(format!("section = ${param}"));
    }
    if !clauses.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&clauses.join(" AND "));
    }
    query.push_str(" ORDER BY last_name, first_name");

    let mut rows = sqlx::query(&query);
    if let Some(level) = grade_level {
        rows = rows.bind(level);
    }
    if let Some(value) = section {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut students = Vec::new();
    for row in records {
        students.push(from_row(&row));
    }
    Ok(students)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Student>> {
    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.students WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn find_by_lrn(pool: &PgPool, lrn: &str) -> anyhow::Result<Option<Student>> {
    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.students WHERE lrn = $1"
    ))
    .bind(lrn)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &StudentChanges,
) -> anyhow::Result<Option<Student>> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE report_card.students
        SET lrn = COALESCE($2, lrn),
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            middle_name = COALESCE($5, middle_name),
            birthdate = COALESCE($6, birthdate),
            sex = COALESCE($7, sex),
            age = COALESCE($8, age),
            grade_level = COALESCE($9, grade_level),
            section = COALESCE($10, section),
            school_year = COALESCE($11, school_year),
            track = COALESCE($12, track),
            education_level = COALESCE($13, education_level),
            strand = COALESCE($14, strand)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.lrn)
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .bind(&changes.middle_name)
    .bind(changes.birthdate)
    .bind(&changes.sex)
    .bind(changes.age)
    .bind(changes.grade_level)
    .bind(&changes.section)
    .bind(&changes.school_year)
    .bind(&changes.track)
    .bind(&changes.education_level)
    .bind(&changes.strand)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    // Grades, attendance and the rest follow through the FK cascade.
    let result = sqlx::query("DELETE FROM report_card.students WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_with_records(
    pool: &PgPool,
    grade_level: Option<i32>,
    section: Option<&str>,
) -> anyhow::Result<Vec<StudentWithRecords>> {
    let students = list(pool, grade_level, section).await?;
    let ids: Vec<Uuid> = students.iter().map(|s| s.id).collect();

    let grade_rows = sqlx::query(
        "SELECT id, student_id, subject_name, q1, q2, q3, q4, final_rating, remarks, \
         semester, subject_type, sem_final_grade \
         FROM report_card.grades WHERE student_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let attendance_rows = sqlx::query(
        "SELECT id, student_id, month, days_of_school, days_present, days_absent, times_tardy \
         FROM report_card.attendance WHERE student_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut grades_by_student: HashMap<Uuid, Vec<Grade>> = HashMap::new();
    for row in grade_rows {
        let grade = super::grades::from_row(&row);
        grades_by_student.entry(grade.student_id).or_default().push(grade);
    }

    let mut attendance_by_student: HashMap<Uuid, Vec<Attendance>> = HashMap::new();
    for row in attendance_rows {
        let entry = super::attendance::from_row(&row);
        attendance_by_student
            .entry(entry.student_id)
            .or_default()
            .push(entry);
    }

    let mut records = Vec::new();
    for student in students {
        let grades = grades_by_student.remove(&student.id).unwrap_or_default();
        let attendance = attendance_by_student
            .remove(&student.id)
            .unwrap_or_default();
        records.push(StudentWithRecords {
            student,
            grades,
            attendance,
        });
    }
    Ok(records)
}

pub async fn fetch_report_card(pool: &PgPool, student: Student) -> anyhow::Result<ReportCard> {
    let grades = super::grades::list_by_student(pool, student.id).await?;
    let attendance = super::attendance::list_by_student(pool, student.id).await?;
    let observed_values = super::observed_values::list_by_student(pool, student.id).await?;

    Ok(ReportCard {
        student,
        grades,
        attendance,
        observed_values,
    })
}

pub async fn import_csv(pool: &PgPool, csv_path: &Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        lrn: String,
        first_name: String,
        last_name: String,
        middle_name: Option<String>,
        birthdate: Option<NaiveDate>,
        sex: Option<String>,
        age: Option<i32>,
        grade_level: Option<i32>,
        section: Option<String>,
        school_year: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut imported = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        sqlx::query(
            r#"
            INSERT INTO report_card.students
            (id, lrn, first_name, last_name, middle_name, birthdate, sex, age,
             grade_level, section, school_year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (lrn) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                middle_name = EXCLUDED.middle_name,
                birthdate = EXCLUDED.birthdate,
                sex = EXCLUDED.sex,
                age = EXCLUDED.age,
                grade_level = EXCLUDED.grade_level,
                section = EXCLUDED.section,
                school_year = EXCLUDED.school_year
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.lrn)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.middle_name)
        .bind(row.birthdate)
        .bind(&row.sex)
        .bind(row.age)
        .bind(row.grade_level)
        .bind(&row.section)
        .bind(&row.school_year)
        .execute(pool)
        .await?;
        imported += 1;
    }

    Ok(imported)
}
