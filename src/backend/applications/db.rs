//! Database operations for applications

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};
use uuid::Uuid;

use crate::shared::inventory::{Application, NewApplication, UpdateApplication};
use crate::shared::timestamp;

const APPLICATION_COLUMNS: &str =
    "id, name, link, license_associations, created_at, updated_at";

/// Map a row selected with [`APPLICATION_COLUMNS`]
pub(crate) fn application_from_row(row: &SqliteRow) -> Result<Application, sqlx::Error> {
    Ok(Application {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        link: row.try_get("link")?,
        license_associations: row.try_get("license_associations")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Get all applications, newest first
pub async fn list_applications<'e>(
    executor: impl SqliteExecutor<'e>,
) -> Result<Vec<Application>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM applications ORDER BY created_at DESC",
        APPLICATION_COLUMNS
    ))
    .fetch_all(executor)
    .await?;

    rows.iter().map(application_from_row).collect()
}

/// Get an application by ID
pub async fn get_application<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
) -> Result<Option<Application>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM applications WHERE id = ?",
        APPLICATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(application_from_row).transpose()
}

/// Insert a new application with no associated licenses
pub async fn insert_application<'e>(
    executor: impl SqliteExecutor<'e>,
    application: &NewApplication,
) -> Result<Application, sqlx::Error> {
    let id = application.id.unwrap_or_else(Uuid::new_v4);
    let now = timestamp::now();

    sqlx::query(
        r#"
        INSERT INTO applications (id, name, link, license_associations, created_at, updated_at)
        VALUES (?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(id)
    .bind(application.name.trim())
    .bind(&application.link)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(Application {
        id,
        name: application.name.trim().to_string(),
        link: application.link.clone(),
        license_associations: 0,
        created_at: now,
        updated_at: now,
    })
}

/// Update name and link if the stored token still matches.
///
/// Returns the number of affected rows; zero means the record is missing
/// or was modified since `update.updated_at` was read.
pub async fn update_application<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
    update: &UpdateApplication,
) -> Result<u64, sqlx::Error> {
    let next: DateTime<Utc> = timestamp::next_revision(update.updated_at);

    let result = sqlx::query(
        r#"
        UPDATE applications
        SET name = ?, link = ?, updated_at = ?
        WHERE id = ? AND updated_at = ?
        "#,
    )
    .bind(update.name.trim())
    .bind(&update.link)
    .bind(next)
    .bind(id)
    .bind(update.updated_at)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Delete an application that no license references.
///
/// Returns the number of deleted rows; zero when the application is missing
/// or still referenced.
pub async fn delete_unreferenced_application<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM applications WHERE id = ? AND license_associations = 0",
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
