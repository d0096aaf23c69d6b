//! Application HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db;
use crate::backend::error::{BackendError, BackendResult, Entity};
use crate::shared::inventory::{Application, NewApplication, UpdateApplication};

const LICENSES_REMAIN: &str = "There are licenses associated with this application. \
     Please delete the licenses first before trying to delete the application.";

/// List every application
pub async fn list_applications(
    State(pool): State<SqlitePool>,
) -> BackendResult<Json<Vec<Application>>> {
    let applications = db::list_applications(&pool).await?;
    Ok(Json(applications))
}

/// Create an application
pub async fn create_application(
    State(pool): State<SqlitePool>,
    Json(request): Json<NewApplication>,
) -> BackendResult<(StatusCode, Json<Application>)> {
    request.validate()?;

    let application = db::insert_application(&pool, &request).await?;
    tracing::info!(id = %application.id, name = %application.name, "Application created");

    Ok((StatusCode::CREATED, Json(application)))
}

/// Update name and link of an application.
///
/// The request carries the `updatedAt` the client last read. A mismatch is
/// reported as a conflict; an unknown id as not found.
pub async fn update_application(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateApplication>,
) -> BackendResult<StatusCode> {
    request.validate()?;

    let mut tx = pool.begin().await?;

    if db::update_application(&mut *tx, id, &request).await? == 0 {
        let exists = db::get_application(&mut *tx, id).await?.is_some();
        return Err(if exists {
            BackendError::conflict(Entity::Application)
        } else {
            BackendError::not_found(Entity::Application)
        });
    }

    tx.commit().await?;
    tracing::info!(%id, "Application updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an application that has no licenses
pub async fn delete_application(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    let mut tx = pool.begin().await?;

    let application = db::get_application(&mut *tx, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Application))?;

    if application.license_associations > 0 {
        return Err(BackendError::data_deletion(Entity::Application, LICENSES_REMAIN));
    }

    if db::delete_unreferenced_application(&mut *tx, id).await? == 0 {
        return Err(BackendError::data_deletion(Entity::Application, LICENSES_REMAIN));
    }

    tx.commit().await?;
    tracing::info!(%id, "Application deleted");
    Ok(StatusCode::NO_CONTENT)
}
