use anyhow::Context;
use sqlx::PgPool;

pub mod accounts;
pub mod attendance;
pub mod grades;
pub mod observed_values;
pub mod remedial;
pub mod school_records;
pub mod seed;
pub mod students;
pub mod subjects;

// All tables sit under the report_card schema.
const SCHEMA_DDL: &[&str] = &[
    "CREATE SCHEMA IF NOT EXISTS report_card",
    r#"
    CREATE TABLE IF NOT EXISTS report_card.students (
        id UUID PRIMARY KEY,
        lrn TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        middle_name TEXT,
        birthdate DATE,
        sex TEXT,
        age INTEGER,
        grade_level INTEGER,
        section TEXT,
        school_year TEXT,
        track TEXT NOT NULL DEFAULT 'N/A',
        education_level TEXT NOT NULL DEFAULT 'elementary',
        strand TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_card.grades (
        id UUID PRIMARY KEY,
        student_id UUID NOT NULL REFERENCES report_card.students (id) ON DELETE CASCADE,
        subject_name TEXT NOT NULL,
        q1 DOUBLE PRECISION,
        q2 DOUBLE PRECISION,
        q3 DOUBLE PRECISION,
        q4 DOUBLE PRECISION,
        final_rating DOUBLE PRECISION,
        remarks TEXT,
        semester TEXT NOT NULL DEFAULT 'N/A',
        subject_type TEXT NOT NULL DEFAULT 'standard',
        sem_final_grade DOUBLE PRECISION
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_card.attendance (
        id UUID PRIMARY KEY,
        student_id UUID NOT NULL REFERENCES report_card.students (id) ON DELETE CASCADE,
        month TEXT NOT NULL,
        days_of_school INTEGER NOT NULL DEFAULT 0,
        days_present INTEGER NOT NULL DEFAULT 0,
        days_absent INTEGER NOT NULL DEFAULT 0,
        times_tardy INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_card.observed_values (
        id UUID PRIMARY KEY,
        student_id UUID NOT NULL REFERENCES report_card.students (id) ON DELETE CASCADE,
        core_value TEXT NOT NULL,
        behavior_statement TEXT NOT NULL,
        q1 TEXT,
        q2 TEXT,
        q3 TEXT,
        q4 TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_card.remedial_classes (
        id UUID PRIMARY KEY,
        student_id UUID NOT NULL REFERENCES report_card.students (id) ON DELETE CASCADE,
        subject_name TEXT NOT NULL,
        final_rating DOUBLE PRECISION,
        remedial_class_mark TEXT,
        recomputed_final_grade DOUBLE PRECISION,
        remarks TEXT,
        conducted_from DATE,
        conducted_to DATE,
        school TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_card.school_records (
        id UUID PRIMARY KEY,
        student_id UUID NOT NULL REFERENCES report_card.students (id) ON DELETE CASCADE,
        grade_level INTEGER NOT NULL,
        school_name TEXT,
        school_id TEXT,
        district TEXT,
        division TEXT,
        region TEXT,
        school_year TEXT,
        adviser TEXT,
        general_average DOUBLE PRECISION,
        action_taken TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_card.subjects (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        code TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_card.accounts (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS grades_student_idx ON report_card.grades (student_id)",
    "CREATE INDEX IF NOT EXISTS attendance_student_idx ON report_card.attendance (student_id)",
    "CREATE INDEX IF NOT EXISTS observed_values_student_idx ON report_card.observed_values (student_id)",
    "CREATE INDEX IF NOT EXISTS remedial_classes_student_idx ON report_card.remedial_classes (student_id)",
    "CREATE INDEX IF NOT EXISTS school_records_student_idx ON report_card.school_records (student_id)",
];

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    for statement in SCHEMA_DDL {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("failed to apply schema DDL")?;
    }
    Ok(())
}
