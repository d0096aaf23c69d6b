/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including database loading and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite database and run migrations
 * 2. Create the application state around the pool
 * 3. Create and configure the router
 */

use axum::Router;
use sqlx::SqlitePool;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Build the router around an already opened pool.
///
/// Tests use this with an in-memory database.
pub fn create_app_with_pool(db_pool: SqlitePool) -> Router<()> {
    create_router(AppState::new(db_pool))
}

/// Create and configure the Axum application from `config`
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated.
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing license inventory server");

    let db_pool = load_database(&config.database_url).await?;
    let app = create_app_with_pool(db_pool);

    tracing::info!("Router configured");
    Ok(app)
}
