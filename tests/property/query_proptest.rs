//! Property-based tests for table query strings
//!
//! Whatever the table builds, the server must parse back to the same
//! filter, search and sort.

use proptest::prelude::*;
use reqwest::Url;

use license_inventory::client::table::build_query;
use license_inventory::client::TableFilter;
use license_inventory::shared::query::{LicenseQuery, SortColumn, SortDirection};

fn filter() -> impl Strategy<Value = TableFilter> {
    prop::sample::select(TableFilter::ALL.to_vec())
}

fn sort() -> impl Strategy<Value = Option<(SortColumn, SortDirection)>> {
    prop::option::of((
        prop::sample::select(SortColumn::ALL.to_vec()),
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
    ))
}

fn parse(query: &str) -> LicenseQuery {
    let url = Url::parse(&format!("http://localhost/api/licenses/query{}", query)).unwrap();
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };
    LicenseQuery::from_params(
        param("filter").as_deref(),
        param("search").as_deref(),
        param("sortBy").as_deref(),
        param("sortDirection").as_deref(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_query_survives_the_round_trip(
        filter in filter(),
        search in "[ a-zA-Z0-9%&=+#?/_-]{0,24}",
        sort in sort(),
    ) {
        let parsed = parse(&build_query(filter, &search, sort));

        prop_assert_eq!(parsed.filter, filter.server_filter());
        prop_assert_eq!(parsed.sort, sort);

        let expected_search = match filter {
            TableFilter::Search => Some(search.trim().to_string()).filter(|text| !text.is_empty()),
            _ => None,
        };
        prop_assert_eq!(parsed.search, expected_search);
    }
}
