//! Modal and routing controller
//!
//! Keeps the open modals in step with the address bar. The license modal
//! is addressable: `?modal=add` opens it empty and
//! `?modal=view&id=<uuid>` opens it on an existing license. Anything else
//! in the query string redirects to `/`.

use std::sync::{Arc, Mutex};

use reqwest::Url;
use uuid::{Uuid, Variant, Version};

use super::request_state::RequestKey;
use super::resources::{ApplicationStore, LicenseStore, PendingReset};
use super::store::Store;
use crate::shared::Application;

/// Access to the address bar
pub trait Navigator: Send + Sync {
    /// Current path and query, e.g. `/?modal=add`
    fn location(&self) -> String;

    fn goto(&self, path: &str);
}

/// Navigator that keeps its history in memory
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![initial.into()]),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> String {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn goto(&self, path: &str) {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path.to_string());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LicenseModal {
    #[default]
    Closed,
    Add,
    View(Uuid),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplicationModalMode {
    #[default]
    Closed,
    Add,
    Edit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    pub license: LicenseModal,
    pub application: ApplicationModalMode,
    pub assigned_users: bool,
}

/// Meaning of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No parameters
    Root,
    AddLicense,
    ViewLicense(Uuid),
    /// Parameters that do not describe a modal
    Invalid,
}

/// Whether `id` is a v4 UUID in lowercase hyphenated form
pub fn is_valid_license_id(id: &str) -> bool {
    match Uuid::parse_str(id) {
        Ok(uuid) => {
            uuid.get_version() == Some(Version::Random)
                && uuid.get_variant() == Variant::RFC4122
                && uuid.hyphenated().to_string() == id
        }
        Err(_) => false,
    }
}

pub fn parse_route(location: &str) -> Route {
    let url = match Url::parse("http://localhost/").and_then(|base| base.join(location)) {
        Ok(url) => url,
        Err(_) => return Route::Invalid,
    };

    let mut modal = None;
    let mut id = None;
    let mut others = false;
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        match &*key {
            "modal" => modal = Some(value.into_owned()),
            "id" => id = Some(value.into_owned()),
            _ => others = true,
        }
    }

    match (modal.as_deref(), id.as_deref(), others) {
        (None, None, false) if url.query().map_or(true, str::is_empty) => Route::Root,
        (Some("add"), None, false) => Route::AddLicense,
        (Some("view"), Some(id), false) if is_valid_license_id(id) => {
            Uuid::parse_str(id).map_or(Route::Invalid, Route::ViewLicense)
        }
        _ => Route::Invalid,
    }
}

pub struct ModalController {
    navigator: Arc<dyn Navigator>,
    licenses: LicenseStore,
    applications: ApplicationStore,
    state: Store<ModalState>,
}

impl ModalController {
    pub fn new(
        navigator: Arc<dyn Navigator>,
        licenses: LicenseStore,
        applications: ApplicationStore,
    ) -> Self {
        Self {
            navigator,
            licenses,
            applications,
            state: Store::default(),
        }
    }

    pub fn state(&self) -> &Store<ModalState> {
        &self.state
    }

    /// Bring the modals in line with the current location.
    ///
    /// Every navigation closes whatever was open before the route applies.
    /// Returns the reset to complete after the closing animation when the
    /// location closed the modals.
    pub fn handle_navigation(&self) -> Option<PendingReset> {
        let location = self.navigator.location();
        let license = match parse_route(&location) {
            Route::Root => return Some(self.close_all()),
            Route::AddLicense => {
                self.licenses.context().tracker.set_error(RequestKey::LicenseFetch, None);
                LicenseModal::Add
            }
            Route::ViewLicense(id) => {
                self.licenses.load_current(id);
                LicenseModal::View(id)
            }
            Route::Invalid => {
                tracing::warn!("Redirecting invalid location {}", location);
                self.navigator.goto("/");
                LicenseModal::Closed
            }
        };
        self.state.set(ModalState {
            license,
            ..ModalState::default()
        });
        None
    }

    pub fn open_view_license(&self, id: Uuid) {
        self.navigator.goto(&format!("/?modal=view&id={}", id));
        self.handle_navigation();
    }

    pub fn open_add_license(&self) {
        self.navigator.goto("/?modal=add");
        self.handle_navigation();
    }

    pub fn close_license(&self) -> PendingReset {
        self.navigator.goto("/");
        self.state.update(|state| state.license = LicenseModal::Closed);
        self.licenses.begin_reset()
    }

    pub fn open_add_application(&self) {
        self.applications.current().set(Application::blank());
        self.state.update(|state| state.application = ApplicationModalMode::Add);
    }

    /// Edit a copy of `application`
    pub fn open_edit_application(&self, application: &Application) {
        self.applications.current().set(application.clone());
        self.state.update(|state| state.application = ApplicationModalMode::Edit);
    }

    pub fn close_application(&self) -> PendingReset {
        self.state.update(|state| state.application = ApplicationModalMode::Closed);
        self.applications.begin_reset()
    }

    pub fn open_assigned_users(&self) {
        self.state.update(|state| state.assigned_users = true);
    }

    pub fn close_assigned_users(&self) {
        self.state.update(|state| state.assigned_users = false);
    }

    /// Close every modal
    pub fn close_all(&self) -> PendingReset {
        self.state.set(ModalState::default());
        self.licenses.begin_reset().and(self.applications.begin_reset())
    }
}
