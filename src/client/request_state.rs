//! Request-state tracker
//!
//! Records, per named operation, whether a request is in flight and the
//! most recent failure. A minimum loading duration keeps spinners from
//! flickering when the server answers quickly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::shared::ApiError;

use super::store::Store;

/// Operations whose state is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKey {
    ApplicationFetch,
    ApplicationPost,
    ApplicationDelete,
    LicenseFetch,
    LicensePost,
    LicenseDelete,
    TableFetch,
    UserFetch,
    UserPost,
    UserDelete,
    InitialLoad,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub status: RequestStatus,
    pub error: Option<ApiError>,
}

/// Requests in flight under one key, timed from the first of them
#[derive(Debug, Clone, Copy)]
struct Timing {
    started: Instant,
    min_duration: Option<Duration>,
    in_flight: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    states: Store<HashMap<RequestKey, RequestState>>,
    timings: Arc<Mutex<HashMap<RequestKey, Timing>>>,
    buttons_disabled: Store<bool>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as loading.
    ///
    /// Requests sharing a key are counted; the key stays loading until the
    /// last of them ends.
    pub fn start_loading(&self, key: RequestKey, min_duration: Option<Duration>) {
        {
            let mut timings = self.timings();
            let timing = timings.entry(key).or_insert(Timing {
                started: Instant::now(),
                min_duration,
                in_flight: 0,
            });
            timing.min_duration = timing.min_duration.max(min_duration);
            timing.in_flight += 1;
        }
        self.states
            .update(|states| states.entry(key).or_default().status = RequestStatus::Loading);
    }

    /// Mark one request under `key` as finished.
    ///
    /// Waits until at least the larger of both minimum durations has passed
    /// since loading started. Once no request under `key` is left in
    /// flight, the status becomes `Error` when a failure was recorded
    /// meanwhile and `Success` otherwise.
    pub async fn end_loading(&self, key: RequestKey, min_duration: Option<Duration>) {
        let deadline = self.timings().get(&key).and_then(|timing| {
            timing
                .min_duration
                .max(min_duration)
                .map(|min| timing.started + min)
        });
        if let Some(deadline) = deadline {
            tokio::time::sleep_until(deadline).await;
        }

        let finished = {
            let mut timings = self.timings();
            match timings.get_mut(&key) {
                Some(timing) if timing.in_flight > 1 => {
                    timing.in_flight -= 1;
                    false
                }
                _ => {
                    timings.remove(&key);
                    true
                }
            }
        };
        if !finished {
            return;
        }

        self.states.update(|states| {
            let state = states.entry(key).or_default();
            state.status = if state.error.is_some() {
                RequestStatus::Error
            } else {
                RequestStatus::Success
            };
        });
    }

    /// Record the failure of `key`, or clear it with `None`
    pub fn set_error(&self, key: RequestKey, error: Option<ApiError>) {
        self.states.update(|states| {
            let state = states.entry(key).or_default();
            if error.is_some() && state.status != RequestStatus::Loading {
                state.status = RequestStatus::Error;
            }
            state.error = error;
        });
    }

    pub fn is_loading(&self, key: RequestKey) -> bool {
        self.states.with(|states| {
            states
                .get(&key)
                .is_some_and(|state| state.status == RequestStatus::Loading)
        })
    }

    pub fn state(&self, key: RequestKey) -> RequestState {
        self.states
            .with(|states| states.get(&key).cloned().unwrap_or_default())
    }

    pub fn error(&self, key: RequestKey) -> Option<ApiError> {
        self.state(key).error
    }

    pub fn states(&self) -> &Store<HashMap<RequestKey, RequestState>> {
        &self.states
    }

    /// Shared flag set while a mutation is in flight
    pub fn buttons_disabled(&self) -> &Store<bool> {
        &self.buttons_disabled
    }

    fn timings(&self) -> MutexGuard<'_, HashMap<RequestKey, Timing>> {
        self.timings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
