/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes (applications, licenses, users)
 * 2. Fallback handler (404 with a structured body)
 *
 * Every request passes through a `TraceLayer`, so request spans carry the
 * method and path of the call that produced a log line.
 */

use axum::{http::StatusCode, Json, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use crate::shared::{ApiError, ErrorDetails};

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new());

    let router = router.fallback(route_not_found);

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

async fn route_not_found() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::NotFound(ErrorDetails::new(
            404,
            "Route could not be found.",
            "Please verify the request path.",
        ))),
    )
}
