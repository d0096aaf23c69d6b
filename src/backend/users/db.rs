//! Database operations for users

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};
use uuid::Uuid;

use crate::shared::inventory::User;
use crate::shared::timestamp;

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

/// Get all users ordered by name
pub async fn list_users<'e>(executor: impl SqliteExecutor<'e>) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, name FROM users ORDER BY name COLLATE NOCASE")
        .fetch_all(executor)
        .await?;

    rows.iter().map(user_from_row).collect()
}

pub async fn get_user_by_name<'e>(
    executor: impl SqliteExecutor<'e>,
    name: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name FROM users WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Insert a user unless one with the same name exists.
///
/// Returns whether a row was inserted.
pub async fn insert_user_if_absent<'e>(
    executor: impl SqliteExecutor<'e>,
    name: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (id, name, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(timestamp::now())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Remove every license assignment of a user
pub async fn delete_user_assignments<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM license_users WHERE user_id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_user<'e>(executor: impl SqliteExecutor<'e>, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
