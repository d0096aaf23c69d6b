//! Users that licenses can be assigned to

pub mod db;
pub mod handlers;
