//! License table controller
//!
//! Owns the table's filter, search text and sort, turns them into a query
//! string and replaces the license store's contents with the result.
//!
//! Queries are not serialized. Every query takes a sequence number and its
//! response is applied only while no newer query has been issued, so a slow
//! response can never overwrite a faster, later one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::api::ClientError;
use super::request_state::RequestKey;
use super::resources::LicenseStore;
use super::store::Store;
use crate::shared::inventory::License;
use crate::shared::query::{LicenseFilter, SortColumn, SortDirection};

/// Filters offered by the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TableFilter {
    #[default]
    All,
    InUse,
    Unassigned,
    NearExpiration,
    Expired,
    Search,
}

impl TableFilter {
    pub const ALL: [TableFilter; 6] = [
        TableFilter::All,
        TableFilter::InUse,
        TableFilter::Unassigned,
        TableFilter::NearExpiration,
        TableFilter::Expired,
        TableFilter::Search,
    ];

    /// Label shown in the filter menu
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::InUse => "In use",
            Self::Unassigned => "Unassigned",
            Self::NearExpiration => "Near expiration",
            Self::Expired => "Expired",
            Self::Search => "Search",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.label() == label)
    }

    /// Server filter, `None` for free-text search
    pub fn server_filter(&self) -> Option<LicenseFilter> {
        match self {
            Self::All => Some(LicenseFilter::All),
            Self::InUse => Some(LicenseFilter::Assigned),
            Self::Unassigned => Some(LicenseFilter::Unassigned),
            Self::NearExpiration => Some(LicenseFilter::NearExpiration),
            Self::Expired => Some(LicenseFilter::Expired),
            Self::Search => None,
        }
    }
}

impl fmt::Display for TableFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort order of a single column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Default,
    Asc,
    Desc,
}

impl SortOrder {
    /// Default → Asc → Desc → Default
    pub fn next(self) -> Self {
        match self {
            Self::Default => Self::Asc,
            Self::Asc => Self::Desc,
            Self::Desc => Self::Default,
        }
    }

    pub fn direction(self) -> Option<SortDirection> {
        match self {
            Self::Default => None,
            Self::Asc => Some(SortDirection::Asc),
            Self::Desc => Some(SortDirection::Desc),
        }
    }
}

/// Sort order of every column; at most one is not `Default`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    orders: [SortOrder; 4],
}

impl SortState {
    /// Advance `column` one step and reset every other column
    pub fn cycle(&mut self, column: SortColumn) {
        let next = self.orders[column.index()].next();
        self.orders = [SortOrder::Default; 4];
        self.orders[column.index()] = next;
    }

    pub fn order(&self, column: SortColumn) -> SortOrder {
        self.orders[column.index()]
    }

    pub fn active(&self) -> Option<(SortColumn, SortDirection)> {
        SortColumn::ALL.into_iter().find_map(|column| {
            self.order(column)
                .direction()
                .map(|direction| (column, direction))
        })
    }
}

/// Query string for the license query endpoint, including the leading `?`
pub fn build_query(
    filter: TableFilter,
    search: &str,
    sort: Option<(SortColumn, SortDirection)>,
) -> String {
    let mut query = match filter.server_filter() {
        Some(server_filter) => format!("?filter={}", server_filter),
        None if search.is_empty() => String::new(),
        None => format!("?search={}", urlencoding::encode(search)),
    };

    if let Some((column, direction)) = sort {
        query.push(if query.is_empty() { '?' } else { '&' });
        query.push_str(&format!("sortBy={}&sortDirection={}", column, direction.as_str()));
    }

    query
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    pub filter: TableFilter,
    pub search: String,
    pub sort: SortState,
}

impl TableState {
    pub fn query_string(&self) -> String {
        build_query(self.filter, &self.search, self.sort.active())
    }
}

#[derive(Debug, Clone)]
pub struct TableController {
    licenses: LicenseStore,
    state: Store<TableState>,
    generation: Arc<AtomicU64>,
}

impl TableController {
    pub fn new(licenses: LicenseStore) -> Self {
        Self {
            licenses,
            state: Store::default(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> &Store<TableState> {
        &self.state
    }

    pub fn query_string(&self) -> String {
        self.state.with(TableState::query_string)
    }

    pub async fn filter_by(&self, filter: TableFilter) -> Result<(), ClientError> {
        self.state.update(|state| state.filter = filter);
        self.refresh().await
    }

    /// Select a filter by its menu label; unknown labels select `All`
    pub async fn filter_by_label(&self, label: &str) -> Result<(), ClientError> {
        let filter = TableFilter::from_label(label).unwrap_or_else(|| {
            tracing::error!("Unknown license filter '{}', showing all licenses", label);
            TableFilter::All
        });
        self.filter_by(filter).await
    }

    /// Set the search text; this switches the filter to `Search`
    pub async fn search(&self, text: &str) -> Result<(), ClientError> {
        self.state.update(|state| {
            state.search = text.to_string();
            state.filter = TableFilter::Search;
        });
        self.refresh().await
    }

    pub async fn sort_by(&self, column: SortColumn) -> Result<(), ClientError> {
        self.state.update(|state| state.sort.cycle(column));
        self.refresh().await
    }

    /// Run the query for the current state.
    ///
    /// On failure the filter and sort fall back to `All` and no sort; the
    /// search text is kept.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let path = format!("/api/licenses/query{}", self.query_string());

        let ctx = self.licenses.context();
        let result: Result<Vec<License>, ClientError> =
            ctx.track(RequestKey::TableFetch, ctx.api.get(&path)).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding superseded license query");
            return result.map(|_| ());
        }

        match result {
            Ok(licenses) => {
                self.licenses.replace_all(licenses);
                Ok(())
            }
            Err(e) => {
                self.state.update(|state| {
                    state.filter = TableFilter::All;
                    state.sort = SortState::default();
                });
                Err(e)
            }
        }
    }
}
