//! Inventory Module
//!
//! Data structures for the license inventory:
//!
//! - `Application` - A piece of software licenses are bought for
//! - `License` - A license with renewal, cost and contact information
//! - `User` - A person a license is assigned to
//!
//! # Usage
//!
//! ```rust
//! use license_inventory::shared::inventory::{Application, License, User};
//! ```

pub mod application;
pub mod license;
pub mod user;

pub use application::{Application, NewApplication, UpdateApplication};
pub use license::{
    License, LicenseCounts, LicenseFields, LicenseSnapshot, NewLicense, UpdateLicenseRequest,
    UpdatedLicense,
};
pub use user::{FindOrCreateUser, FindOrCreateUserResponse, User};
