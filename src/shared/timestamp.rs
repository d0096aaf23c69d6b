//! Revision timestamps
//!
//! `updatedAt` doubles as the optimistic-concurrency token of every record.
//! Tokens are kept at millisecond precision so they survive a JSON round
//! trip unchanged and can be compared for equality in SQL.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Current time truncated to milliseconds.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Token to store after a successful write that replaced `previous`.
///
/// The result is always strictly later than `previous`, even when two
/// writes land within the same millisecond.
pub fn next_revision(previous: DateTime<Utc>) -> DateTime<Utc> {
    let candidate = now();
    if candidate > previous {
        candidate
    } else {
        previous.trunc_subsecs(3) + Duration::milliseconds(1)
    }
}
