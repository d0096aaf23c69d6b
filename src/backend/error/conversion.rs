/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, allowing them to be
 * returned directly from handlers. The response body is the structured
 * API error:
 *
 * ```json
 * {
 *   "status": 409,
 *   "type": "UpdateConflict",
 *   "message": "Failed to update license because of data conflict.",
 *   "details": "..."
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(self.to_api_error())).into_response()
    }
}
