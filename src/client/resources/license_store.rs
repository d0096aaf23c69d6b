//! License store
//!
//! Besides the collection this store holds the license shown in the
//! add/view modal and the per-filter counts.

use uuid::Uuid;

use super::{PendingReset, ResourceContext};
use crate::client::api::ClientError;
use crate::client::request_state::RequestKey;
use crate::client::store::Store;
use crate::shared::inventory::{License, LicenseCounts, UpdateLicenseRequest};
use crate::shared::{ApiError, ErrorDetails};

#[derive(Debug, Clone)]
pub struct LicenseStore {
    ctx: ResourceContext,
    items: Store<Vec<License>>,
    current: Store<License>,
    counts: Store<LicenseCounts>,
}

impl LicenseStore {
    pub fn new(ctx: ResourceContext) -> Self {
        Self {
            ctx,
            items: Store::default(),
            current: Store::new(License::blank()),
            counts: Store::default(),
        }
    }

    pub fn items(&self) -> &Store<Vec<License>> {
        &self.items
    }

    pub fn current(&self) -> &Store<License> {
        &self.current
    }

    pub fn counts(&self) -> &Store<LicenseCounts> {
        &self.counts
    }

    pub(crate) fn context(&self) -> &ResourceContext {
        &self.ctx
    }

    pub async fn fetch_all(&self) -> Result<(), ClientError> {
        let licenses: Vec<License> = self
            .ctx
            .track(RequestKey::LicenseFetch, self.ctx.api.get("/api/licenses"))
            .await?;
        self.items.set(licenses);
        Ok(())
    }

    /// Re-read one license and patch it into the collection
    pub async fn fetch_one(&self, id: Uuid) -> Result<License, ClientError> {
        let path = format!("/api/licenses/{}", id);
        let license: License = self
            .ctx
            .track(RequestKey::LicenseFetch, self.ctx.api.get(&path))
            .await?;

        self.items.update(|items| {
            match items.iter_mut().find(|item| item.id == id) {
                Some(item) => *item = license.clone(),
                None => items.insert(0, license.clone()),
            }
        });
        Ok(license)
    }

    /// Copy a license from the collection into `current`.
    ///
    /// Edits to `current` never touch the collection. A missing id records
    /// a `NotFound` error for the license fetch.
    pub fn load_current(&self, id: Uuid) -> Option<License> {
        let found = self
            .items
            .with(|items| items.iter().find(|item| item.id == id).cloned());

        match &found {
            Some(license) => {
                self.ctx.tracker.set_error(RequestKey::LicenseFetch, None);
                self.current.set(license.clone());
            }
            None => {
                tracing::warn!(%id, "License is not in the loaded collection");
                self.ctx.tracker.set_error(
                    RequestKey::LicenseFetch,
                    Some(ApiError::NotFound(ErrorDetails::new(
                        404,
                        "License could not be found.",
                        "The license might have been deleted or does not exist.",
                    ))),
                );
            }
        }
        found
    }

    pub async fn add(&self, license: &License) -> Result<License, ClientError> {
        let created: License = self
            .ctx
            .track_mutation(
                RequestKey::LicensePost,
                self.ctx.api.post("/api/licenses", &license.to_new()),
            )
            .await?;

        self.items.update(|items| items.insert(0, created.clone()));
        self.ctx.notifications.success("License added successfully.");
        Ok(created)
    }

    /// Save `updated` using the token of `current`, the version last read.
    ///
    /// After a successful save the license is re-read so the next save
    /// carries the new token; the open modal's copy is replaced too. A
    /// failed re-read does not fail the save and yields `None`.
    pub async fn update(
        &self,
        current: &License,
        updated: &License,
    ) -> Result<Option<License>, ClientError> {
        let id = current.id;
        let path = format!("/api/licenses/{}", id);
        self.ctx
            .track_mutation(
                RequestKey::LicensePost,
                self.ctx.api.put(&path, &UpdateLicenseRequest::new(current, updated)),
            )
            .await?;

        self.ctx.notifications.success("License updated successfully.");

        match self.fetch_one(id).await {
            Ok(license) => {
                if self.current.with(|current| current.id == id) {
                    self.current.set(license.clone());
                }
                Ok(Some(license))
            }
            Err(e) => {
                tracing::warn!(%id, "Saved license could not be re-read: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let path = format!("/api/licenses/{}", id);
        self.ctx
            .track_mutation(RequestKey::LicenseDelete, self.ctx.api.delete(&path))
            .await?;

        self.items.update(|items| items.retain(|item| item.id != id));
        self.ctx.notifications.success("License deleted successfully.");
        Ok(())
    }

    pub async fn fetch_counts(&self) -> Result<LicenseCounts, ClientError> {
        let counts: LicenseCounts = self
            .ctx
            .track(RequestKey::LicenseFetch, self.ctx.api.get("/api/licenses/counts"))
            .await?;
        self.counts.set(counts);
        Ok(counts)
    }

    /// Replace the collection with the result of a table query
    pub fn replace_all(&self, licenses: Vec<License>) {
        self.items.set(licenses);
    }

    pub fn begin_reset(&self) -> PendingReset {
        let current = self.current.clone();
        PendingReset::new(move || current.set(License::blank()))
    }
}
