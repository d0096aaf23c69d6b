/**
 * Association Reconciliation
 *
 * Keeps the denormalized `license_associations` count of every application
 * and the `license_users` join table in agreement with the licenses
 * themselves.
 *
 * Every function here takes the connection of an open transaction. They
 * never commit: the calling handler commits once all bookkeeping for a
 * request has succeeded, and a failure anywhere drops the transaction,
 * which rolls back every step taken so far.
 */

use std::collections::BTreeSet;

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult, Entity};
use crate::shared::timestamp;

/// Direction of a count adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountChange {
    Increment,
    Decrement,
}

/// Users to attach to and detach from a license
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDiff {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

impl UserDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Symmetric difference between the stored and the submitted user sets
pub fn diff_users(current: &[Uuid], submitted: &[Uuid]) -> UserDiff {
    let current: BTreeSet<Uuid> = current.iter().copied().collect();
    let submitted: BTreeSet<Uuid> = submitted.iter().copied().collect();

    UserDiff {
        added: submitted.difference(&current).copied().collect(),
        removed: current.difference(&submitted).copied().collect(),
    }
}

/// Adjust an application's license count by one.
///
/// Decrements never take the count below zero.
pub async fn adjust_license_count(
    conn: &mut SqliteConnection,
    application_id: Uuid,
    change: CountChange,
) -> BackendResult<()> {
    let sql = match change {
        CountChange::Increment => {
            "UPDATE applications SET license_associations = license_associations + 1 WHERE id = ?"
        }
        CountChange::Decrement => {
            "UPDATE applications SET license_associations = license_associations - 1 \
             WHERE id = ? AND license_associations > 0"
        }
    };

    let result = sqlx::query(sql).bind(application_id).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        match change {
            CountChange::Increment => return Err(BackendError::not_found(Entity::Application)),
            CountChange::Decrement => {
                tracing::warn!(
                    %application_id,
                    "License count already zero or application missing, decrement skipped"
                );
            }
        }
    }

    Ok(())
}

/// Move a license from `previous` to `next`.
///
/// A license being created has no previous application. Nothing happens
/// when the application does not change.
pub async fn reassign_application(
    conn: &mut SqliteConnection,
    previous: Option<Uuid>,
    next: Uuid,
) -> BackendResult<()> {
    if previous == Some(next) {
        return Ok(());
    }

    if let Some(previous) = previous {
        adjust_license_count(conn, previous, CountChange::Decrement).await?;
    }
    adjust_license_count(conn, next, CountChange::Increment).await?;

    tracing::debug!(?previous, %next, "License reassigned");
    Ok(())
}

/// Undo all bookkeeping of a license that is about to be deleted
pub async fn release_license(
    conn: &mut SqliteConnection,
    license_id: Uuid,
    application_id: Uuid,
) -> BackendResult<()> {
    adjust_license_count(conn, application_id, CountChange::Decrement).await?;

    let removed = sqlx::query("DELETE FROM license_users WHERE license_id = ?")
        .bind(license_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    tracing::debug!(%license_id, removed, "License associations released");
    Ok(())
}

/// User ids currently assigned to a license
pub async fn assigned_user_ids(
    conn: &mut SqliteConnection,
    license_id: Uuid,
) -> BackendResult<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT user_id FROM license_users WHERE license_id = ?",
    )
    .bind(license_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids)
}

/// Bring the join rows of a license in line with `submitted`.
///
/// Only the difference is written: rows for users that stay assigned are
/// left untouched.
pub async fn reconcile_users(
    conn: &mut SqliteConnection,
    license_id: Uuid,
    submitted: &[Uuid],
) -> BackendResult<UserDiff> {
    let current = assigned_user_ids(conn, license_id).await?;
    let diff = diff_users(&current, submitted);
    if diff.is_empty() {
        return Ok(diff);
    }

    let now = timestamp::now();
    for user_id in &diff.added {
        let inserted = sqlx::query(
            r#"
            INSERT INTO license_users (license_id, user_id, created_at)
            SELECT ?, id, ? FROM users WHERE id = ?
            "#,
        )
        .bind(license_id)
        .bind(now)
        .bind(user_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(BackendError::not_found(Entity::User));
        }
    }

    for user_id in &diff.removed {
        sqlx::query("DELETE FROM license_users WHERE license_id = ? AND user_id = ?")
            .bind(license_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
    }

    tracing::debug!(
        %license_id,
        added = diff.added.len(),
        removed = diff.removed.len(),
        "User associations reconciled"
    );
    Ok(diff)
}
