use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Role;

// DepEd elementary and junior-high catalog.
const SUBJECT_CATALOG: &[(&str, &str)] = &[
    ("Mother Tongue", "MTB"),
    ("Filipino", "FIL"),
    ("English", "ENG"),
    ("Mathematics", "MATH"),
    ("Science", "SCI"),
    ("Araling Panlipunan", "AP"),
    ("Edukasyon sa Pagpapakatao", "ESP"),
    ("Music", "MUS"),
    ("Arts", "ARTS"),
    ("Physical Education", "PE"),
    ("Health", "HLTH"),
    ("MAPEH", "MAPEH"),
    ("EPP / TLE", "EPP"),
    ("Technology and Livelihood Education", "TLE"),
    ("Computer Education", "COMP"),
];

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    for (name, code) in SUBJECT_CATALOG {
        sqlx::query(
            r#"
            INSERT INTO report_card.subjects (id, name, code)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(code)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO report_card.accounts (id, username, email, password, role, is_active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("superadmin")
    .bind("superadmin@school.com")
    .bind("SuperAdmin@123")
    .bind(Role::Superadmin.as_str())
    .execute(pool)
    .await?;

    Ok(())
}
