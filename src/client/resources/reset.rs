//! Deferred reset of a "current record" holder
//!
//! Closing a modal first plays an animation; the edited record must stay
//! visible until it finishes. Stores therefore hand out a [`PendingReset`]
//! that the caller completes once the modal is gone.

use std::future::Future;
use std::time::Duration;

/// Length of the modal close animation
pub const CLOSE_ANIMATION: Duration = Duration::from_millis(120);

type ResetAction = Box<dyn FnOnce() + Send + 'static>;

/// Reset that has been requested but not applied yet.
///
/// Dropping it without completing leaves the holder untouched.
#[must_use = "a pending reset does nothing until completed"]
pub struct PendingReset {
    actions: Vec<ResetAction>,
}

impl std::fmt::Debug for PendingReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReset")
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl PendingReset {
    pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            actions: vec![Box::new(action)],
        }
    }

    /// A reset with nothing to do
    pub fn noop() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Combine two resets into one completed together
    pub fn and(mut self, other: PendingReset) -> Self {
        self.actions.extend(other.actions);
        self
    }

    /// Apply the reset now
    pub fn complete(self) {
        for action in self.actions {
            action();
        }
    }

    /// Apply the reset once `animation` has finished
    pub async fn complete_after<F: Future>(self, animation: F) {
        animation.await;
        self.complete();
    }

    /// Apply the reset after the standard close animation
    pub async fn complete_after_animation(self) {
        self.complete_after(tokio::time::sleep(CLOSE_ANIMATION)).await;
    }
}
