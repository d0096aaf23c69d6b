//! Backend Module
//!
//! This module contains all server-side code of the license inventory. It
//! provides an Axum HTTP server over a SQLite database accessed through
//! `sqlx`.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`applications`** - Application persistence and handlers
//! - **`licenses`** - License persistence, query building and handlers
//! - **`users`** - User persistence and handlers
//! - **`associations`** - License counts and license-user join rows
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── applications/   - Application db + handlers
//! ├── licenses/       - License db + query + handlers
//! ├── users/          - User db + handlers
//! ├── associations/   - Association reconciliation
//! └── error/          - Error types
//! ```
//!
//! # Concurrency
//!
//! Every update carries the `updatedAt` value the client last read. The
//! update statement matches on it, so of two concurrent writers only the
//! first succeeds and the second receives `409 UpdateConflict`. Writes that
//! touch more than one table run in a single transaction which rolls back
//! when dropped without a commit.
//!
//! # Error Handling
//!
//! Handlers return [`error::BackendResult`]; `BackendError` implements
//! `IntoResponse` and renders the structured `{status, type, message,
//! details}` body.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Applications
pub mod applications;

/// Licenses
pub mod licenses;

/// Users
pub mod users;

/// Association reconciliation
pub mod associations;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, create_app_with_pool};
