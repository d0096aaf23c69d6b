/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Applications
 * - `GET /api/applications` - List applications
 * - `POST /api/applications` - Create an application
 * - `PUT /api/applications/{id}` - Update name and link (optimistic)
 * - `DELETE /api/applications/{id}` - Delete an unreferenced application
 *
 * ## Licenses
 * - `GET /api/licenses` - List licenses with application and users
 * - `POST /api/licenses` - Create a license
 * - `GET /api/licenses/counts` - Number of licenses per filter
 * - `GET /api/licenses/query` - Filtered, searched and sorted listing
 * - `GET /api/licenses/{id}` - Read one license
 * - `PUT /api/licenses/{id}` - Update a license (optimistic)
 * - `DELETE /api/licenses/{id}` - Delete a license
 *
 * ## Users
 * - `GET /api/user` - List users
 * - `POST /api/user/find-or-create` - Get or create a user by name
 * - `DELETE /api/user/delete/{id}` - Delete a user
 */

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::backend::applications::handlers::{
    create_application, delete_application, list_applications, update_application,
};
use crate::backend::licenses::handlers::{
    create_license, delete_license, get_license, license_counts, list_licenses, query_licenses,
    update_license,
};
use crate::backend::server::state::AppState;
use crate::backend::users::handlers::{delete_user, find_or_create_user, list_users};

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Applications
        .route(
            "/api/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/api/applications/{id}",
            put(update_application).delete(delete_application),
        )
        // Licenses; the literal segments must not be shadowed by `{id}`
        .route("/api/licenses", get(list_licenses).post(create_license))
        .route("/api/licenses/counts", get(license_counts))
        .route("/api/licenses/query", get(query_licenses))
        .route(
            "/api/licenses/{id}",
            get(get_license).put(update_license).delete(delete_license),
        )
        // Users
        .route("/api/user", get(list_users))
        .route("/api/user/find-or-create", post(find_or_create_user))
        .route("/api/user/delete/{id}", delete(delete_user))
}
