//! Applications
//!
//! Software products that licenses belong to. Each application carries a
//! denormalized count of its licenses, maintained by
//! [`crate::backend::associations`].

pub mod db;
pub mod handlers;
