//! Database test fixtures and utilities
//!
//! Every fixture gets its own in-memory SQLite database with migrations
//! applied, so tests never share state.

#[cfg(feature = "ssr")]
use axum_test::TestServer;
#[cfg(feature = "ssr")]
use sqlx::SqlitePool;
#[cfg(feature = "ssr")]
use uuid::Uuid;

#[cfg(feature = "ssr")]
use license_inventory::backend::server::{connect_in_memory, create_app_with_pool};

/// Test database fixture
#[cfg(feature = "ssr")]
pub struct TestDatabase {
    pool: SqlitePool,
}

#[cfg(feature = "ssr")]
impl TestDatabase {
    /// Create a fresh in-memory database
    pub async fn new() -> Self {
        let pool = connect_in_memory()
            .await
            .expect("Failed to create in-memory database");
        Self { pool }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Stored license count of an application
    pub async fn license_associations(&self, application_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT license_associations FROM applications WHERE id = ?")
            .bind(application_id)
            .fetch_one(&self.pool)
            .await
            .expect("application row")
    }

    /// Number of join rows of a license
    pub async fn license_user_rows(&self, license_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM license_users WHERE license_id = ?")
            .bind(license_id)
            .fetch_one(&self.pool)
            .await
            .expect("count query")
    }

    /// `created_at` of one join row, as stored
    pub async fn assignment_created_at(&self, license_id: Uuid, user_id: Uuid) -> Option<String> {
        sqlx::query_scalar(
            "SELECT created_at FROM license_users WHERE license_id = ? AND user_id = ?",
        )
        .bind(license_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .expect("join row query")
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("count query")
    }
}

/// Test server backed by a fresh database
#[cfg(feature = "ssr")]
pub async fn create_test_server() -> (TestServer, TestDatabase) {
    let db = TestDatabase::new().await;
    let app = create_app_with_pool(db.pool().clone());
    let server = TestServer::new(app).expect("Failed to start test server");
    (server, db)
}
