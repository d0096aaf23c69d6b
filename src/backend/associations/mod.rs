//! Association reconciliation service
//!
//! Maintains application license counts and license-user join rows inside
//! the caller's transaction.

pub mod service;

pub use service::{
    adjust_license_count, assigned_user_ids, diff_users, reassign_application, reconcile_users,
    release_license, CountChange, UserDiff,
};
