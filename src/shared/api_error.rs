//! Structured API error bodies
//!
//! Every non-2xx response of the inventory API carries a JSON body of the
//! shape `{ status, type, message, details }`. The `type` field selects the
//! variant, so both sides can match exhaustively on the kind of failure
//! instead of inspecting loosely typed JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload shared by every error variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// HTTP status code
    pub status: u16,
    /// Short, user-facing message
    pub message: String,
    /// Longer explanation with a suggested next step
    pub details: String,
}

impl ErrorDetails {
    pub fn new(status: u16, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: details.into(),
        }
    }
}

/// Error body of the inventory API, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "type")]
pub enum ApiError {
    /// The addressed record does not exist
    #[error("{}", .0.message)]
    NotFound(ErrorDetails),

    /// The optimistic-concurrency token was stale
    #[error("{}", .0.message)]
    UpdateConflict(ErrorDetails),

    /// A referential precondition blocked a delete
    #[error("{}", .0.message)]
    DataDeletionError(ErrorDetails),

    /// The submitted record or query failed validation
    #[error("{}", .0.message)]
    ValidationError(ErrorDetails),

    /// Anything else
    #[error("{}", .0.message)]
    InternalServerError(ErrorDetails),
}

impl ApiError {
    /// Build an internal server error
    pub fn internal(status: u16, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InternalServerError(ErrorDetails::new(status, message, details))
    }

    /// Parse a response body, validating it against the error schema.
    ///
    /// Bodies that do not match any variant become an `InternalServerError`
    /// carrying the HTTP status of the response.
    pub fn from_response_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiError>(body) {
            Ok(error) => error,
            Err(err) => {
                tracing::debug!("Error body did not match schema: {}", err);
                Self::internal(
                    status,
                    "The server returned an unexpected response.",
                    String::from_utf8_lossy(body).into_owned(),
                )
            }
        }
    }

    pub fn details(&self) -> &ErrorDetails {
        match self {
            Self::NotFound(details)
            | Self::UpdateConflict(details)
            | Self::DataDeletionError(details)
            | Self::ValidationError(details)
            | Self::InternalServerError(details) => details,
        }
    }

    pub fn status(&self) -> u16 {
        self.details().status
    }

    pub fn message(&self) -> &str {
        &self.details().message
    }

    /// Wire name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::UpdateConflict(_) => "UpdateConflict",
            Self::DataDeletionError(_) => "DataDeletionError",
            Self::ValidationError(_) => "ValidationError",
            Self::InternalServerError(_) => "InternalServerError",
        }
    }
}
