//! License Inventory - Main Library
//!
//! Inventory manager for software licenses: which application each license
//! belongs to, who it is assigned to, when it renews and what it costs.
//!
//! # Module Structure
//!
//! The library is organized into three main modules:
//!
//! - **`shared`** - Types shared between client and backend
//!   - Applications, licenses, users and request bodies
//!   - License query vocabulary, structured API errors
//!   - Revision timestamps used for optimistic concurrency
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server over SQLite (`sqlx`)
//!   - Conditional updates keyed on `updatedAt`
//!   - Transactional maintenance of license counts and user assignments
//!
//! - **`client`** - Client-side state layer
//!   - Observable stores for every resource
//!   - Request-state tracking with minimum loading duration
//!   - Table query and modal routing controllers
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the
//!   `license-server` binary
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use license_inventory::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(&ServerConfig::load()?).await?;
//! // Use app with axum::serve
//! # let _ = app;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client-Side
//!
//! ```rust,no_run
//! use license_inventory::client::{ApiClient, Config, Inventory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inventory = Inventory::new(ApiClient::new(Config::new()));
//! inventory.load_all().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::ApiError` is the wire format of every failure
//! - `backend::BackendError` renders it from handlers
//! - `client::ClientError` wraps transport, API and decoding failures

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Client-side state layer
pub mod client;
