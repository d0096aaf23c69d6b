//! User store

use uuid::Uuid;

use super::ResourceContext;
use crate::client::api::ClientError;
use crate::client::request_state::RequestKey;
use crate::client::store::Store;
use crate::shared::inventory::{FindOrCreateUser, FindOrCreateUserResponse, User};

#[derive(Debug, Clone)]
pub struct UserStore {
    ctx: ResourceContext,
    items: Store<Vec<User>>,
}

impl UserStore {
    pub fn new(ctx: ResourceContext) -> Self {
        Self {
            ctx,
            items: Store::default(),
        }
    }

    pub fn items(&self) -> &Store<Vec<User>> {
        &self.items
    }

    pub async fn fetch_all(&self) -> Result<(), ClientError> {
        let users: Vec<User> = self
            .ctx
            .track(RequestKey::UserFetch, self.ctx.api.get("/api/user"))
            .await?;
        self.items.set(users);
        Ok(())
    }

    /// Look a user up by name, creating it when missing.
    ///
    /// Only a newly created user is added to the collection.
    pub async fn find_or_create(&self, name: &str) -> Result<User, ClientError> {
        let body = FindOrCreateUser {
            name: name.to_string(),
        };
        let response: FindOrCreateUserResponse = self
            .ctx
            .track_mutation(
                RequestKey::UserPost,
                self.ctx.api.post("/api/user/find-or-create", &body),
            )
            .await?;

        if response.created {
            self.items.update(|items| items.insert(0, response.user.clone()));
        }
        Ok(response.user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let path = format!("/api/user/delete/{}", id);
        self.ctx
            .track_mutation(RequestKey::UserDelete, self.ctx.api.delete(&path))
            .await?;

        self.items.update(|items| items.retain(|item| item.id != id));
        self.ctx.notifications.success("User deleted successfully.");
        Ok(())
    }
}
