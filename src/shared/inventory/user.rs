//! User Data Structure

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// A person licenses can be assigned to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// Request body for `POST /api/user/find-or-create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindOrCreateUser {
    pub name: String,
}

impl FindOrCreateUser {
    /// The trimmed name, rejecting blank input
    pub fn normalized_name(&self) -> Result<&str, SharedError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SharedError::validation("name", "User name cannot be empty"));
        }
        Ok(name)
    }
}

/// Response of `POST /api/user/find-or-create`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindOrCreateUserResponse {
    pub user: User,
    /// Whether the user did not exist before the call
    pub created: bool,
}
