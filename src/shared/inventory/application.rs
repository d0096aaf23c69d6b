//! Application Data Structure
//!
//! An application is the software a license is bought for. It carries a
//! denormalized count of the licenses currently pointing at it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::timestamp;

/// Represents an application in the inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Unique application ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// External link (vendor page, admin console, ...)
    pub link: String,
    /// Number of licenses referencing this application
    pub license_associations: i64,
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency token
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// A fresh, unsaved application with a new identifier
    pub fn blank() -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            link: String::new(),
            license_associations: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Body for creating this application on the server
    pub fn to_new(&self) -> NewApplication {
        NewApplication {
            id: Some(self.id),
            name: self.name.clone(),
            link: self.link.clone(),
        }
    }

    /// Body for a conditional update of this application
    pub fn to_update(&self) -> UpdateApplication {
        UpdateApplication {
            name: self.name.clone(),
            link: self.link.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Request body for `POST /api/applications`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    /// Client-generated identifier; the server generates one when absent
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub link: String,
}

impl NewApplication {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_fields(&self.name, &self.link)
    }
}

/// Request body for `PUT /api/applications/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplication {
    pub name: String,
    pub link: String,
    /// The token the client last read
    pub updated_at: DateTime<Utc>,
}

impl UpdateApplication {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_fields(&self.name, &self.link)
    }
}

fn validate_fields(name: &str, link: &str) -> Result<(), SharedError> {
    if name.trim().is_empty() {
        return Err(SharedError::validation("name", "Application name cannot be empty"));
    }
    if !link.is_empty() && !(link.starts_with("http://") || link.starts_with("https://")) {
        return Err(SharedError::validation(
            "link",
            "Link must start with http:// or https://",
        ));
    }
    Ok(())
}
