//! License HTTP Handlers
//!
//! Every write runs in one transaction together with the association
//! bookkeeping it implies, so counts and join rows never drift from the
//! licenses themselves.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db;
use crate::backend::applications::db as application_db;
use crate::backend::associations::{reassign_application, reconcile_users, release_license};
use crate::backend::error::{BackendError, BackendResult, Entity};
use crate::shared::inventory::{License, LicenseCounts, NewLicense, UpdateLicenseRequest};
use crate::shared::query::LicenseQuery;
use crate::shared::timestamp;

/// List every license with its application and users
pub async fn list_licenses(State(pool): State<SqlitePool>) -> BackendResult<Json<Vec<License>>> {
    let mut conn = pool.acquire().await?;
    let licenses = db::list_licenses(&mut conn).await?;
    Ok(Json(licenses))
}

pub async fn get_license(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> BackendResult<Json<License>> {
    let mut conn = pool.acquire().await?;
    let license = db::get_license(&mut conn, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::License))?;
    Ok(Json(license))
}

/// Create a license, count it against its application and assign its users
pub async fn create_license(
    State(pool): State<SqlitePool>,
    Json(request): Json<NewLicense>,
) -> BackendResult<(StatusCode, Json<License>)> {
    request.fields.validate()?;

    let id = request.id.unwrap_or_else(Uuid::new_v4);
    let user_ids: Vec<Uuid> = request.users.iter().map(|user| user.id).collect();

    let mut tx = pool.begin().await?;

    if application_db::get_application(&mut *tx, request.fields.application_id)
        .await?
        .is_none()
    {
        return Err(BackendError::not_found(Entity::Application));
    }

    db::insert_license(&mut *tx, id, &request.fields).await?;
    reassign_application(&mut tx, None, request.fields.application_id).await?;
    reconcile_users(&mut tx, id, &user_ids).await?;

    let license = db::get_license(&mut tx, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::License))?;

    tx.commit().await?;
    tracing::info!(%id, application_id = %license.application_id, "License created");

    Ok((StatusCode::CREATED, Json(license)))
}

/// Update a license guarded by its `updatedAt` token.
///
/// The stored application is treated as the previous one; the
/// `currentLicense` snapshot sent by the client is only compared for
/// diagnostics.
pub async fn update_license(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLicenseRequest>,
) -> BackendResult<StatusCode> {
    let updated = &request.updated_license;
    updated.fields.validate()?;

    let mut tx = pool.begin().await?;

    let previous = db::get_license_application_id(&mut *tx, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::License))?;

    if previous != request.current_license.application_id {
        tracing::debug!(
            %id,
            stored = %previous,
            reported = %request.current_license.application_id,
            "Client snapshot of the license application is stale"
        );
    }

    let next = updated.fields.application_id;
    if next != previous
        && application_db::get_application(&mut *tx, next).await?.is_none()
    {
        return Err(BackendError::not_found(Entity::Application));
    }

    if db::update_license(&mut *tx, id, &updated.fields, updated.updated_at).await? == 0 {
        return Err(BackendError::conflict(Entity::License));
    }

    if let Some(users) = &updated.users {
        let user_ids: Vec<Uuid> = users.iter().map(|user| user.id).collect();
        reconcile_users(&mut tx, id, &user_ids).await?;
    }

    reassign_application(&mut tx, Some(previous), next).await?;

    tx.commit().await?;
    tracing::info!(%id, "License updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a license and release its associations
pub async fn delete_license(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    let mut tx = pool.begin().await?;

    let application_id = db::get_license_application_id(&mut *tx, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::License))?;

    release_license(&mut tx, id, application_id).await?;
    db::delete_license(&mut *tx, id).await?;

    tx.commit().await?;
    tracing::info!(%id, %application_id, "License deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Filtered and sorted listing.
///
/// Accepts `filter`, `search`, `sortBy` and `sortDirection`.
pub async fn query_licenses(
    State(pool): State<SqlitePool>,
    Query(params): Query<HashMap<String, String>>,
) -> BackendResult<Json<Vec<License>>> {
    let query = LicenseQuery::from_params(
        params.get("filter").map(String::as_str),
        params.get("search").map(String::as_str),
        params.get("sortBy").map(String::as_str),
        params.get("sortDirection").map(String::as_str),
    )?;
    tracing::debug!(?query, "Querying licenses");

    let mut conn = pool.acquire().await?;
    let licenses = db::query_licenses(&mut conn, &query, timestamp::now().date_naive()).await?;
    Ok(Json(licenses))
}

pub async fn license_counts(State(pool): State<SqlitePool>) -> BackendResult<Json<LicenseCounts>> {
    let counts = db::count_licenses(&pool, timestamp::now().date_naive()).await?;
    Ok(Json(counts))
}
