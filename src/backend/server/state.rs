/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # State Extraction
 *
 * Handlers only ever need the database pool, so they extract
 * `State<SqlitePool>` directly through the `FromRef` implementation below.
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use sqlx::SqlitePool;
 *
 * async fn handler(State(pool): State<SqlitePool>) {
 *     let _ = pool.acquire().await;
 * }
 * ```
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;

/// Main application state container
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool; cloning shares the same pool
    pub db_pool: SqlitePool,
}

impl AppState {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.db_pool.clone()
    }
}
