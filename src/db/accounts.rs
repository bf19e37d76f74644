use anyhow::bail;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cli::{AccountChanges, NewAccount};
use crate::models::{Account, Role};

const COLUMNS: &str = "id, username, email, password, role, is_active";

pub(crate) fn from_row(row: &PgRow) -> Account {
    let role: String = row.get("role");
    Account {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password: row.get("password"),
        role: Role::parse(&role),
        is_active: row.get("is_active"),
    }
}

pub async fn insert(pool: &PgPool, new: &NewAccount) -> anyhow::Result<Account> {
    let taken = sqlx::query("SELECT id FROM report_card.accounts WHERE username = $1 OR email = $2")
        .bind(&new.username)
        .bind(&new.email)
        .fetch_optional(pool)
        .await?;
    if taken.is_some() {
        bail!("username or email already in use");
    }

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO report_card.accounts (id, username, email, password, role, is_active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.password)
    .bind(new.role.as_str())
    .fetch_one(pool)
    .await?;

    Ok(from_row(&row))
}

pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<Account>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.accounts ORDER BY username"
    ))
    .fetch_all(pool)
    .await?;

    let mut accounts = Vec::new();
    for row in rows {
        accounts.push(from_row(&row));
    }
    Ok(accounts)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Account>> {
    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.accounts WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> anyhow::Result<Option<Account>> {
    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM report_card.accounts WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &AccountChanges,
) -> anyhow::Result<Option<Account>> {
    if let Some(username) = &changes.username {
        let taken =
            sqlx::query("SELECT id FROM report_card.accounts WHERE username = $1 AND id <> $2")
                .bind(username)
                .bind(id)
                .fetch_optional(pool)
                .await?;
        if taken.is_some() {
            bail!("username {username} already in use");
        }
    }
    if let Some(email) = &changes.email {
        let taken = sqlx::query("SELECT id FROM report_card.accounts WHERE email = $1 AND id <> $2")
            .bind(email)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if taken.is_some() {
            bail!("email {email} already in use");
        }
    }

    let row = sqlx::query(&format!(
        r#"
        UPDATE report_card.accounts
        SET username = COALESCE($2, username),
            email = COALESCE($3, email),
            password = COALESCE($4, password),
            role = COALESCE($5, role),
            is_active = COALESCE($6, is_active)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.username)
    .bind(&changes.email)
    .bind(&changes.password)
    .bind(changes.role.map(Role::as_str))
    .bind(changes.is_active)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM report_card.accounts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn promote(
    pool: &PgPool,
    username: &str,
    role: Role,
) -> anyhow::Result<Option<Account>> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE report_card.accounts
        SET role = $2
        WHERE username = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(username)
    .bind(role.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}
