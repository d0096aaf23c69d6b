//! SQL for filtered, searched and sorted license listings

use chrono::{Duration, NaiveDate};
use sqlx::{QueryBuilder, Sqlite};

use crate::shared::query::{
    LicenseFilter, LicenseQuery, SortColumn, SortDirection, NEAR_EXPIRATION_DAYS,
};

use super::db::LICENSE_SELECT;

const HAS_USERS: &str = "EXISTS (SELECT 1 FROM license_users lu WHERE lu.license_id = l.id)";
const USER_COUNT: &str = "(SELECT COUNT(*) FROM license_users lu WHERE lu.license_id = l.id)";

/// Last renewal date that still counts as near expiration
pub fn near_expiration_horizon(today: NaiveDate) -> NaiveDate {
    today + Duration::days(NEAR_EXPIRATION_DAYS)
}

/// Build the complete listing statement for `query`.
///
/// Dates are compared against `today`, which the caller supplies so the
/// statement stays deterministic.
pub fn build_license_query<'args>(
    query: &LicenseQuery,
    today: NaiveDate,
) -> QueryBuilder<'args, Sqlite> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM licenses l INNER JOIN applications a ON a.id = l.application_id WHERE 1 = 1",
        LICENSE_SELECT
    ));

    if let Some(filter) = query.filter {
        push_filter(&mut builder, filter, today);
    }
    if let Some(search) = &query.search {
        push_search(&mut builder, search);
    }

    builder.push(" ORDER BY ");
    match query.sort {
        Some((column, direction)) => {
            builder.push(order_expression(column));
            builder.push(" ");
            builder.push(direction.as_str());
            builder.push(", l.created_at DESC");
        }
        None => {
            builder.push("l.created_at DESC");
        }
    }

    builder
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: LicenseFilter, today: NaiveDate) {
    match filter {
        LicenseFilter::All => {}
        LicenseFilter::Assigned => {
            builder.push(" AND ").push(HAS_USERS);
        }
        LicenseFilter::Unassigned => {
            builder.push(" AND NOT ").push(HAS_USERS);
        }
        LicenseFilter::NearExpiration => {
            builder
                .push(" AND l.renewal_date >= ")
                .push_bind(today)
                .push(" AND l.renewal_date <= ")
                .push_bind(near_expiration_horizon(today));
        }
        LicenseFilter::Expired => {
            builder.push(" AND l.renewal_date < ").push_bind(today);
        }
    }
}

/// Case-insensitive substring match over the text columns and user names
fn push_search(builder: &mut QueryBuilder<'_, Sqlite>, text: &str) {
    let pattern = format!("%{}%", escape_like(&text.to_lowercase()));

    builder.push(" AND (");
    for (index, column) in ["a.name", "l.contact_person", "l.category", "l.comment"]
        .into_iter()
        .enumerate()
    {
        if index > 0 {
            builder.push(" OR ");
        }
        builder
            .push("LOWER(")
            .push(column)
            .push(") LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\'");
    }
    builder
        .push(" OR EXISTS (SELECT 1 FROM license_users lu INNER JOIN users u ON u.id = lu.user_id")
        .push(" WHERE lu.license_id = l.id AND LOWER(u.name) LIKE ")
        .push_bind(pattern)
        .push(" ESCAPE '\\'))");
}

fn order_expression(column: SortColumn) -> &'static str {
    match column {
        SortColumn::Application => "a.name COLLATE NOCASE",
        SortColumn::ContactPerson => "l.contact_person COLLATE NOCASE",
        SortColumn::Users => USER_COUNT,
        SortColumn::ExpirationDate => "l.renewal_date",
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
