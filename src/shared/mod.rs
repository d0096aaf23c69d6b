//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client state layer and the backend. Everything here is plain data
//! designed for JSON transmission over the inventory HTTP API.
//!
//! # Overview
//!
//! - **`inventory`** - Applications, licenses, users and their request bodies
//! - **`query`** - Filter and sort vocabulary of the license query endpoint
//! - **`api_error`** - Structured error body returned by every endpoint
//! - **`error`** - Validation errors detected on either side
//! - **`config`** - Client-facing application configuration
//! - **`timestamp`** - Revision tokens used for optimistic concurrency

/// Inventory records and request/response bodies
pub mod inventory;

/// License query vocabulary
pub mod query;

/// Structured API error bodies
pub mod api_error;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Revision timestamps
pub mod timestamp;

/// Re-export commonly used types for convenience
pub use api_error::{ApiError, ErrorDetails};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use inventory::{Application, License, LicenseCounts, User};
pub use query::{LicenseFilter, LicenseQuery, SortColumn, SortDirection};
