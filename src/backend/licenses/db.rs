//! Database operations for licenses
//!
//! Licenses are always read together with their application and their
//! assigned users. Functions issuing more than one statement take a
//! connection so they can run inside the caller's transaction.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqliteExecutor};
use uuid::Uuid;

use super::query::{build_license_query, near_expiration_horizon};
use crate::shared::inventory::{Application, License, LicenseCounts, LicenseFields, User};
use crate::shared::query::LicenseQuery;
use crate::shared::timestamp;

/// Columns of a license joined with its application (`l` and `a`)
pub(crate) const LICENSE_SELECT: &str = "l.id, l.application_id, l.renewal_date, l.auto_renewal, \
     l.cost, l.renewal_interval, l.category, l.status, l.contact_person, \
     l.additional_contact_info, l.comment, l.created_at, l.updated_at, \
     a.id AS app_id, a.name AS app_name, a.link AS app_link, \
     a.license_associations AS app_license_associations, \
     a.created_at AS app_created_at, a.updated_at AS app_updated_at";

fn license_from_row(row: &SqliteRow) -> Result<License, sqlx::Error> {
    let application = Application {
        id: row.try_get("app_id")?,
        name: row.try_get("app_name")?,
        link: row.try_get("app_link")?,
        license_associations: row.try_get("app_license_associations")?,
        created_at: row.try_get("app_created_at")?,
        updated_at: row.try_get("app_updated_at")?,
    };

    Ok(License {
        id: row.try_get("id")?,
        application_id: row.try_get("application_id")?,
        renewal_date: row.try_get("renewal_date")?,
        auto_renewal: row.try_get("auto_renewal")?,
        cost: row.try_get("cost")?,
        renewal_interval: row.try_get("renewal_interval")?,
        category: row.try_get("category")?,
        status: row.try_get("status")?,
        contact_person: row.try_get("contact_person")?,
        additional_contact_info: row.try_get("additional_contact_info")?,
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        application: Some(application),
        users: Vec::new(),
    })
}

/// Fill in `users` for every license in one round trip
async fn attach_users(
    conn: &mut SqliteConnection,
    licenses: &mut [License],
) -> Result<(), sqlx::Error> {
    if licenses.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        "SELECT lu.license_id, u.id, u.name FROM license_users lu \
         INNER JOIN users u ON u.id = lu.user_id WHERE lu.license_id IN (",
    );
    let mut separated = builder.separated(", ");
    for license in licenses.iter() {
        separated.push_bind(license.id);
    }
    builder.push(") ORDER BY u.name COLLATE NOCASE");

    let rows = builder.build().fetch_all(&mut *conn).await?;

    let mut by_license: HashMap<Uuid, Vec<User>> = HashMap::new();
    for row in rows {
        let license_id: Uuid = row.try_get("license_id")?;
        by_license.entry(license_id).or_default().push(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        });
    }

    for license in licenses.iter_mut() {
        license.users = by_license.remove(&license.id).unwrap_or_default();
    }
    Ok(())
}

/// Get all licenses, newest first
pub async fn list_licenses(conn: &mut SqliteConnection) -> Result<Vec<License>, sqlx::Error> {
    query_licenses(conn, &LicenseQuery::default(), timestamp::now().date_naive()).await
}

/// Get the licenses matching `query`
pub async fn query_licenses(
    conn: &mut SqliteConnection,
    query: &LicenseQuery,
    today: NaiveDate,
) -> Result<Vec<License>, sqlx::Error> {
    let mut builder = build_license_query(query, today);
    let rows = builder.build().fetch_all(&mut *conn).await?;

    let mut licenses = rows
        .iter()
        .map(license_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    attach_users(conn, &mut licenses).await?;

    Ok(licenses)
}

/// Get a license by ID, with its application and users
pub async fn get_license(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<License>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM licenses l INNER JOIN applications a ON a.id = l.application_id \
         WHERE l.id = ?",
        LICENSE_SELECT
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut licenses = vec![license_from_row(&row)?];
    attach_users(conn, &mut licenses).await?;
    Ok(licenses.pop())
}

/// Application a stored license currently belongs to
pub async fn get_license_application_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT application_id FROM licenses WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Insert the license row only; associations are the caller's job
pub async fn insert_license<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
    fields: &LicenseFields,
) -> Result<(), sqlx::Error> {
    let now = timestamp::now();

    sqlx::query(
        r#"
        INSERT INTO licenses (
            id, application_id, renewal_date, auto_renewal, cost, renewal_interval,
            category, status, contact_person, additional_contact_info, comment,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(fields.application_id)
    .bind(fields.renewal_date)
    .bind(fields.auto_renewal)
    .bind(fields.cost)
    .bind(&fields.renewal_interval)
    .bind(&fields.category)
    .bind(&fields.status)
    .bind(&fields.contact_person)
    .bind(&fields.additional_contact_info)
    .bind(&fields.comment)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Overwrite the license row if `expected` is still its token.
///
/// Returns the number of affected rows.
pub async fn update_license<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
    fields: &LicenseFields,
    expected: chrono::DateTime<chrono::Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE licenses
        SET application_id = ?, renewal_date = ?, auto_renewal = ?, cost = ?,
            renewal_interval = ?, category = ?, status = ?, contact_person = ?,
            additional_contact_info = ?, comment = ?, updated_at = ?
        WHERE id = ? AND updated_at = ?
        "#,
    )
    .bind(fields.application_id)
    .bind(fields.renewal_date)
    .bind(fields.auto_renewal)
    .bind(fields.cost)
    .bind(&fields.renewal_interval)
    .bind(&fields.category)
    .bind(&fields.status)
    .bind(&fields.contact_person)
    .bind(&fields.additional_contact_info)
    .bind(&fields.comment)
    .bind(timestamp::next_revision(expected))
    .bind(id)
    .bind(expected)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_license<'e>(
    executor: impl SqliteExecutor<'e>,
    id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM licenses WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Number of licenses in every filter bucket
pub async fn count_licenses<'e>(
    executor: impl SqliteExecutor<'e>,
    today: NaiveDate,
) -> Result<LicenseCounts, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN EXISTS (
                SELECT 1 FROM license_users lu WHERE lu.license_id = l.id
            ) THEN 1 ELSE 0 END), 0) AS assigned,
            COALESCE(SUM(CASE WHEN l.renewal_date >= ? AND l.renewal_date <= ?
                THEN 1 ELSE 0 END), 0) AS near_expiration,
            COALESCE(SUM(CASE WHEN l.renewal_date < ? THEN 1 ELSE 0 END), 0) AS expired
        FROM licenses l
        "#,
    )
    .bind(today)
    .bind(near_expiration_horizon(today))
    .bind(today)
    .fetch_one(executor)
    .await?;

    let all: i64 = row.try_get("total")?;
    let assigned: i64 = row.try_get("assigned")?;

    Ok(LicenseCounts {
        all,
        assigned,
        unassigned: all - assigned,
        near_expiration: row.try_get("near_expiration")?,
        expired: row.try_get("expired")?,
    })
}
