//! License query vocabulary
//!
//! Values understood by `GET /api/licenses/query`. The client builds query
//! strings from these and the server parses them back, so both sides agree
//! on the exact spelling of every filter and sort column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Server-side license filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LicenseFilter {
    All,
    /// At least one user assigned
    Assigned,
    /// No user assigned
    Unassigned,
    /// Renewal date within the next [`NEAR_EXPIRATION_DAYS`] days
    NearExpiration,
    /// Renewal date in the past
    Expired,
}

/// Width of the near-expiration window, in days
pub const NEAR_EXPIRATION_DAYS: i64 = 30;

impl LicenseFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
            Self::NearExpiration => "near-expiration",
            Self::Expired => "expired",
        }
    }
}

impl FromStr for LicenseFilter {
    type Err = SharedError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "assigned" => Ok(Self::Assigned),
            "unassigned" => Ok(Self::Unassigned),
            "near-expiration" => Ok(Self::NearExpiration),
            "expired" => Ok(Self::Expired),
            other => Err(SharedError::validation("filter", format!("Unknown filter '{}'", other))),
        }
    }
}

impl fmt::Display for LicenseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sortable columns of the license table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Application,
    ContactPerson,
    Users,
    ExpirationDate,
}

impl SortColumn {
    /// Every column, in table order
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Application,
        SortColumn::ContactPerson,
        SortColumn::Users,
        SortColumn::ExpirationDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::ContactPerson => "contactPerson",
            Self::Users => "users",
            Self::ExpirationDate => "expirationDate",
        }
    }

    /// Position in [`SortColumn::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Self::Application => 0,
            Self::ContactPerson => 1,
            Self::Users => 2,
            Self::ExpirationDate => 3,
        }
    }
}

impl FromStr for SortColumn {
    type Err = SharedError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == value)
            .ok_or_else(|| {
                SharedError::validation("sortBy", format!("Cannot sort by '{}'", value))
            })
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = SharedError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(SharedError::validation(
                "sortDirection",
                format!("Sort direction must be ASC or DESC, got '{}'", value),
            )),
        }
    }
}

/// Parsed parameters of a license query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseQuery {
    pub filter: Option<LicenseFilter>,
    /// Free text, already trimmed; never empty
    pub search: Option<String>,
    pub sort: Option<(SortColumn, SortDirection)>,
}

impl LicenseQuery {
    /// Parse raw query-string values.
    ///
    /// A blank search is treated as no search. `sortDirection` defaults to
    /// ascending and is ignored without `sortBy`.
    pub fn from_params(
        filter: Option<&str>,
        search: Option<&str>,
        sort_by: Option<&str>,
        sort_direction: Option<&str>,
    ) -> Result<Self, SharedError> {
        let filter: Option<LicenseFilter> = filter.map(str::parse).transpose()?;
        let search = search
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        let sort = match sort_by {
            Some(column) => {
                let direction: SortDirection = sort_direction
                    .map(str::parse)
                    .transpose()?
                    .unwrap_or(SortDirection::Asc);
                let column: SortColumn = column.parse()?;
                Some((column, direction))
            }
            None => None,
        };
        Ok(Self { filter, search, sort })
    }
}
