//! Licenses
//!
//! CRUD over licenses plus the filtered query and the per-filter counts.

pub mod db;
pub mod handlers;
pub mod query;
