//! Initial load of every resource

use super::api::ClientError;
use super::request_state::RequestKey;
use super::resources::{ApplicationStore, LicenseStore, ResourceContext, UserStore};

/// Fetch licenses, applications, users and counts concurrently.
///
/// Every fetch runs to completion and reports its own failure, so none of
/// them is left loading. The first failure also fails the whole load and
/// is recorded under [`RequestKey::InitialLoad`].
pub async fn load_all(
    ctx: &ResourceContext,
    applications: &ApplicationStore,
    licenses: &LicenseStore,
    users: &UserStore,
) -> Result<(), ClientError> {
    ctx.tracker.set_error(RequestKey::InitialLoad, None);
    ctx.tracker.start_loading(RequestKey::InitialLoad, None);

    let (licenses_result, applications_result, users_result, counts_result) = tokio::join!(
        licenses.fetch_all(),
        applications.fetch_all(),
        users.fetch_all(),
        licenses.fetch_counts(),
    );

    let result = licenses_result
        .and(applications_result)
        .and(users_result)
        .and(counts_result.map(|_| ()));

    if let Err(e) = &result {
        tracing::error!("Initial load failed: {}", e);
        ctx.tracker.set_error(RequestKey::InitialLoad, Some(e.to_api_error()));
    }
    ctx.tracker.end_loading(RequestKey::InitialLoad, None).await;

    result
}
