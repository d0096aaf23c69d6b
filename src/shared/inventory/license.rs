//! License Data Structure
//!
//! A license belongs to exactly one application and may be assigned to any
//! number of users. `updated_at` is the optimistic-concurrency token: a
//! write must echo the value it last read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Application, User};
use crate::shared::error::SharedError;
use crate::shared::timestamp;

/// Represents a license as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// Unique license ID
    pub id: Uuid,
    /// Owning application
    pub application_id: Uuid,
    pub renewal_date: NaiveDate,
    pub auto_renewal: bool,
    pub cost: f64,
    pub renewal_interval: String,
    pub category: String,
    pub status: String,
    pub contact_person: String,
    pub additional_contact_info: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency token
    pub updated_at: DateTime<Utc>,
    /// The owning application, joined on reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    /// Users the license is assigned to, joined on reads
    #[serde(default)]
    pub users: Vec<User>,
}

impl License {
    /// A fresh, unsaved license with a new identifier
    pub fn blank() -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4(),
            application_id: Uuid::nil(),
            renewal_date: now.date_naive(),
            auto_renewal: false,
            cost: 0.0,
            renewal_interval: String::new(),
            category: String::new(),
            status: String::new(),
            contact_person: String::new(),
            additional_contact_info: String::new(),
            comment: String::new(),
            created_at: now,
            updated_at: now,
            application: None,
            users: Vec::new(),
        }
    }

    /// Editable fields of this license
    pub fn fields(&self) -> LicenseFields {
        LicenseFields {
            application_id: self.application_id,
            renewal_date: self.renewal_date,
            auto_renewal: self.auto_renewal,
            cost: self.cost,
            renewal_interval: self.renewal_interval.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            contact_person: self.contact_person.clone(),
            additional_contact_info: self.additional_contact_info.clone(),
            comment: self.comment.clone(),
        }
    }

    pub fn user_ids(&self) -> Vec<Uuid> {
        self.users.iter().map(|user| user.id).collect()
    }

    /// Body for creating this license on the server
    pub fn to_new(&self) -> NewLicense {
        NewLicense {
            id: Some(self.id),
            fields: self.fields(),
            users: self.users.clone(),
        }
    }
}

/// Fields a client may write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LicenseFields {
    pub application_id: Uuid,
    pub renewal_date: NaiveDate,
    #[serde(default)]
    pub auto_renewal: bool,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub renewal_interval: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub additional_contact_info: String,
    #[serde(default)]
    pub comment: String,
}

impl LicenseFields {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.application_id.is_nil() {
            return Err(SharedError::validation(
                "applicationId",
                "A license must belong to an application",
            ));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(SharedError::validation("cost", "Cost must be a non-negative number"));
        }
        Ok(())
    }
}

/// Request body for `POST /api/licenses`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewLicense {
    /// Client-generated identifier; the server generates one when absent
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub fields: LicenseFields,
    #[serde(default)]
    pub users: Vec<User>,
}

/// The part of the previously-read license the server needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSnapshot {
    pub application_id: Uuid,
}

/// Edited license plus the token it was read with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedLicense {
    #[serde(flatten)]
    pub fields: LicenseFields,
    /// Replacement user list; `None` leaves assignments untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `PUT /api/licenses/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLicenseRequest {
    pub current_license: LicenseSnapshot,
    pub updated_license: UpdatedLicense,
}

impl UpdateLicenseRequest {
    /// Build the request for saving `updated`, which was read as `current`
    pub fn new(current: &License, updated: &License) -> Self {
        Self {
            current_license: LicenseSnapshot {
                application_id: current.application_id,
            },
            updated_license: UpdatedLicense {
                fields: updated.fields(),
                users: Some(updated.users.clone()),
                updated_at: current.updated_at,
            },
        }
    }
}

/// Number of licenses per table filter
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LicenseCounts {
    pub all: i64,
    pub assigned: i64,
    pub unassigned: i64,
    pub near_expiration: i64,
    pub expired: i64,
}
