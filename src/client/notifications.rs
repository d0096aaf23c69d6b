//! User-visible notifications
//!
//! A queue of messages the UI renders as toasts. Alerts stay until
//! dismissed when sticky; everything else carries a display timeout the UI
//! honours. Expired entries are dropped whenever a new one arrives.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::store::Store;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    /// `None` keeps the notification until dismissed
    pub timeout: Option<Duration>,
    pub created_at: Instant,
}

impl Notification {
    fn is_expired(&self, now: Instant) -> bool {
        self.timeout
            .is_some_and(|timeout| self.created_at + timeout <= now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Notifications {
    items: Store<Vec<Notification>>,
    next_id: Arc<AtomicU64>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(message.into(), NotificationKind::Success, Some(DEFAULT_TIMEOUT))
    }

    pub fn alert(&self, message: impl Into<String>) -> u64 {
        self.push(message.into(), NotificationKind::Alert, Some(DEFAULT_TIMEOUT))
    }

    pub fn sticky_alert(&self, message: impl Into<String>) -> u64 {
        self.push(message.into(), NotificationKind::Alert, None)
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|item| item.id != id));
    }

    pub fn items(&self) -> Vec<Notification> {
        self.items.get()
    }

    pub fn store(&self) -> &Store<Vec<Notification>> {
        &self.items
    }

    fn push(&self, message: String, kind: NotificationKind, timeout: Option<Duration>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Instant::now();
        self.items.update(|items| {
            items.retain(|item| !item.is_expired(now));
            items.push(Notification {
                id,
                message,
                kind,
                timeout,
                created_at: now,
            })
        });
        id
    }
}
