//! Application store

use uuid::Uuid;

use super::{PendingReset, ResourceContext};
use crate::client::api::ClientError;
use crate::client::request_state::RequestKey;
use crate::client::store::Store;
use crate::shared::inventory::Application;

#[derive(Debug, Clone)]
pub struct ApplicationStore {
    ctx: ResourceContext,
    items: Store<Vec<Application>>,
    current: Store<Application>,
}

impl ApplicationStore {
    pub fn new(ctx: ResourceContext) -> Self {
        Self {
            ctx,
            items: Store::default(),
            current: Store::new(Application::blank()),
        }
    }

    pub fn items(&self) -> &Store<Vec<Application>> {
        &self.items
    }

    /// Record being added or edited
    pub fn current(&self) -> &Store<Application> {
        &self.current
    }

    /// Replace the collection with the server's view
    pub async fn fetch_all(&self) -> Result<(), ClientError> {
        let applications: Vec<Application> = self
            .ctx
            .track(RequestKey::ApplicationFetch, self.ctx.api.get("/api/applications"))
            .await?;
        self.items.set(applications);
        Ok(())
    }

    /// Create `application` and prepend the server's copy
    pub async fn add(&self, application: &Application) -> Result<Application, ClientError> {
        let created: Application = self
            .ctx
            .track_mutation(
                RequestKey::ApplicationPost,
                self.ctx.api.post("/api/applications", &application.to_new()),
            )
            .await?;

        self.items.update(|items| items.insert(0, created.clone()));
        self.ctx.notifications.success("Application added successfully.");
        Ok(created)
    }

    /// Save `application` and reload the whole collection
    pub async fn update(&self, application: &Application) -> Result<(), ClientError> {
        let path = format!("/api/applications/{}", application.id);
        self.ctx
            .track_mutation(
                RequestKey::ApplicationPost,
                self.ctx.api.put(&path, &application.to_update()),
            )
            .await?;

        self.ctx.notifications.success("Application updated successfully.");
        self.fetch_all().await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let path = format!("/api/applications/{}", id);
        self.ctx
            .track_mutation(RequestKey::ApplicationDelete, self.ctx.api.delete(&path))
            .await?;

        self.items.update(|items| items.retain(|item| item.id != id));
        self.ctx.notifications.success("Application deleted successfully.");
        Ok(())
    }

    /// Reset `current` to a fresh blank record once the returned value is
    /// completed
    pub fn begin_reset(&self) -> PendingReset {
        let current = self.current.clone();
        PendingReset::new(move || current.set(Application::blank()))
    }
}
