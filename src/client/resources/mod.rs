//! Resource stores
//!
//! One store per entity. Each keeps the client's snapshot of its collection
//! in a [`Store`](super::store::Store) and talks to the API through a shared
//! [`ResourceContext`], which reports every failure to the user and to the
//! request-state tracker.

pub mod application_store;
pub mod license_store;
pub mod reset;
pub mod user_store;

use std::future::Future;
use std::time::Duration;

pub use application_store::ApplicationStore;
pub use license_store::LicenseStore;
pub use reset::{PendingReset, CLOSE_ANIMATION};
pub use user_store::UserStore;

use super::api::{ApiClient, ClientError};
use super::notifications::Notifications;
use super::request_state::{RequestKey, RequestTracker};

/// Minimum time a loading indicator stays visible
pub const DEFAULT_MIN_LOADING: Duration = Duration::from_millis(300);

/// Services shared by every store
#[derive(Debug, Clone)]
pub struct ResourceContext {
    pub api: ApiClient,
    pub tracker: RequestTracker,
    pub notifications: Notifications,
    min_loading: Option<Duration>,
}

impl ResourceContext {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tracker: RequestTracker::new(),
            notifications: Notifications::new(),
            min_loading: Some(DEFAULT_MIN_LOADING),
        }
    }

    /// Override the minimum loading duration; `None` disables it
    pub fn with_min_loading(mut self, min_loading: Option<Duration>) -> Self {
        self.min_loading = min_loading;
        self
    }

    /// Run a read request under `key`
    pub async fn track<T>(
        &self,
        key: RequestKey,
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        self.run(key, false, request).await
    }

    /// Run a mutation under `key`, disabling buttons while it is in flight
    pub async fn track_mutation<T>(
        &self,
        key: RequestKey,
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        self.run(key, true, request).await
    }

    async fn run<T>(
        &self,
        key: RequestKey,
        mutation: bool,
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        self.tracker.set_error(key, None);
        self.tracker.start_loading(key, self.min_loading);
        if mutation {
            self.tracker.buttons_disabled().set(true);
        }

        let result = request.await;
        if let Err(e) = &result {
            tracing::warn!(?key, "Request failed: {}", e);
            self.tracker.set_error(key, Some(e.to_api_error()));
            self.notifications.alert(e.user_message());
        }

        self.tracker.end_loading(key, None).await;
        if mutation {
            self.tracker.buttons_disabled().set(false);
        }
        result
    }
}
