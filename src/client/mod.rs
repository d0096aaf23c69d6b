//! Client Module
//!
//! Client-side state layer of the license inventory. It holds the client's
//! snapshot of the server data in observable stores and keeps it in sync
//! through the HTTP API. A UI renders from the stores and calls the
//! controllers.
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs            - Module exports and documentation
//! ├── config.rs         - API base URL
//! ├── store.rs          - Observable state container
//! ├── api.rs            - reqwest API client and ClientError
//! ├── notifications.rs  - User-visible notifications
//! ├── request_state.rs  - Per-operation loading and error state
//! ├── resources/        - Application, license and user stores
//! ├── loader.rs         - Initial parallel load
//! ├── table.rs          - Filter, search and sort controller
//! └── modal.rs          - Modal and routing controller
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use license_inventory::client::{ApiClient, Config, Inventory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inventory = Inventory::new(ApiClient::new(Config::new()));
//! inventory.load_all().await?;
//! inventory.table.filter_by_label("Near expiration").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod loader;
pub mod modal;
pub mod notifications;
pub mod request_state;
pub mod resources;
pub mod store;
pub mod table;

pub use api::{ApiClient, ClientError};
pub use config::Config;
pub use modal::{MemoryNavigator, ModalController, Navigator};
pub use notifications::{Notification, NotificationKind, Notifications};
pub use request_state::{RequestKey, RequestState, RequestStatus, RequestTracker};
pub use resources::{ApplicationStore, LicenseStore, PendingReset, ResourceContext, UserStore};
pub use store::Store;
pub use table::{TableController, TableFilter};

/// Every store and controller wired to one context
#[derive(Debug, Clone)]
pub struct Inventory {
    pub context: ResourceContext,
    pub applications: ApplicationStore,
    pub licenses: LicenseStore,
    pub users: UserStore,
    pub table: TableController,
}

impl Inventory {
    pub fn new(api: ApiClient) -> Self {
        Self::with_context(ResourceContext::new(api))
    }

    pub fn with_context(context: ResourceContext) -> Self {
        let applications = ApplicationStore::new(context.clone());
        let licenses = LicenseStore::new(context.clone());
        let users = UserStore::new(context.clone());
        let table = TableController::new(licenses.clone());
        Self {
            context,
            applications,
            licenses,
            users,
            table,
        }
    }

    pub async fn load_all(&self) -> Result<(), ClientError> {
        loader::load_all(&self.context, &self.applications, &self.licenses, &self.users).await
    }

    /// Modal controller bound to `navigator`
    pub fn modals(&self, navigator: std::sync::Arc<dyn Navigator>) -> ModalController {
        ModalController::new(navigator, self.licenses.clone(), self.applications.clone())
    }
}
