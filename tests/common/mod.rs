//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Database test fixtures
//! - Record fixtures
//! - Mock server helpers
//! - Custom assertion macros

pub mod database;
pub mod fixtures;

// Re-export commonly used utilities
pub use database::*;
pub use fixtures::*;
pub use mock_server::*;
