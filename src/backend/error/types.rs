/**
 * Backend Error Types
 *
 * This module defines the error type returned by every inventory handler.
 * Each variant maps onto one kind of the structured API error body, so a
 * handler can simply `?` its way out and the client receives a body it can
 * match on.
 *
 * # Error Categories
 *
 * - `NotFound` - the addressed record does not exist (404)
 * - `UpdateConflict` - the optimistic-concurrency token was stale (409)
 * - `DataDeletion` - a referential precondition blocked a delete (409)
 * - `SharedError` - the request failed validation (400)
 * - `Database` - anything the store reported (500)
 */

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::{ApiError, ErrorDetails, SharedError};

/// Kind of record an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Application,
    License,
    User,
}

impl Entity {
    /// Capitalised name, used at the start of messages
    pub fn title(&self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::License => "License",
            Self::User => "User",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => f.write_str("application"),
            Self::License => f.write_str("license"),
            Self::User => f.write_str("user"),
        }
    }
}

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use license_inventory::backend::error::{BackendError, Entity};
///
/// let err = BackendError::not_found(Entity::License);
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// The addressed record does not exist
    #[error("{} could not be found", .entity.title())]
    NotFound { entity: Entity },

    /// The record changed since the client last read it
    #[error("Failed to update {entity} because of data conflict")]
    UpdateConflict { entity: Entity },

    /// Deleting the record would leave dangling references
    #[error("Cannot delete {entity}: {details}")]
    DataDeletion { entity: Entity, details: String },

    /// Validation error from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Database failure; the surrounding transaction is rolled back
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BackendError {
    pub fn not_found(entity: Entity) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(entity: Entity) -> Self {
        Self::UpdateConflict { entity }
    }

    pub fn data_deletion(entity: Entity, details: impl Into<String>) -> Self {
        Self::DataDeletion {
            entity,
            details: details.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::UpdateConflict { .. } | Self::DataDeletion { .. } => StatusCode::CONFLICT,
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the structured body sent to the client
    pub fn to_api_error(&self) -> ApiError {
        let status = self.status_code().as_u16();
        match self {
            Self::NotFound { entity } => ApiError::NotFound(ErrorDetails::new(
                status,
                format!("{} could not be found.", entity.title()),
                format!(
                    "Please verify the provided ID is correct. If correct, the {} might have been deleted or does not exist.",
                    entity
                ),
            )),
            Self::UpdateConflict { entity } => ApiError::UpdateConflict(ErrorDetails::new(
                status,
                format!("Failed to update {} because of data conflict.", entity),
                format!(
                    "{} data may have been modified since it was last retrieved. Please retrieve the latest version and try again.",
                    entity.title()
                ),
            )),
            Self::DataDeletion { entity, details } => ApiError::DataDeletionError(
                ErrorDetails::new(status, format!("Cannot delete {}.", entity), details.clone()),
            ),
            Self::SharedError(SharedError::ValidationError { field, message }) => {
                ApiError::ValidationError(ErrorDetails::new(
                    status,
                    message.clone(),
                    format!("The field '{}' is invalid.", field),
                ))
            }
            Self::Database(_) => {
                ApiError::internal(
                    status,
                    "An unexpected server error occurred.",
                    "Please try again. If the problem persists, contact support.",
                )
            }
        }
    }
}
