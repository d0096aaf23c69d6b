//! Shared Error Types
//!
//! This module defines error types that are shared between the client state
//! layer and the backend. These errors represent failures that can be
//! detected on either side of the wire, before any database is involved.
//!
//! # Error Categories
//!
//! - `ValidationError` - A field of a submitted record failed validation
//!
//! # Usage
//!
//! ```rust
//! use license_inventory::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "Application name cannot be empty");
//! ```
use thiserror::Error;

/// Shared error types that can occur in both client and backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
