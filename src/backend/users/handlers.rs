//! User HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db;
use crate::backend::error::{BackendError, BackendResult, Entity};
use crate::shared::inventory::{FindOrCreateUser, FindOrCreateUserResponse, User};

pub async fn list_users(State(pool): State<SqlitePool>) -> BackendResult<Json<Vec<User>>> {
    let users = db::list_users(&pool).await?;
    Ok(Json(users))
}

/// Return the user with the given name, creating it first if needed.
///
/// Responds 201 when the user was created and 200 when it already existed.
pub async fn find_or_create_user(
    State(pool): State<SqlitePool>,
    Json(request): Json<FindOrCreateUser>,
) -> BackendResult<(StatusCode, Json<FindOrCreateUserResponse>)> {
    let name = request.normalized_name()?;

    let mut tx = pool.begin().await?;
    let created = db::insert_user_if_absent(&mut *tx, name).await?;
    let user = db::get_user_by_name(&mut *tx, name)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::User))?;
    tx.commit().await?;

    let status = if created {
        tracing::info!(id = %user.id, name = %user.name, "User created");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(FindOrCreateUserResponse { user, created })))
}

/// Delete a user together with its license assignments
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> BackendResult<StatusCode> {
    let mut tx = pool.begin().await?;

    let released = db::delete_user_assignments(&mut *tx, id).await?;
    if db::delete_user(&mut *tx, id).await? == 0 {
        return Err(BackendError::not_found(Entity::User));
    }

    tx.commit().await?;
    tracing::info!(%id, released, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
