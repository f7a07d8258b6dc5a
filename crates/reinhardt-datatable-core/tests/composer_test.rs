//! Composed queries evaluated against the in-memory source

mod fixtures;

use fixtures::{users, users_table};
use proptest::prelude::*;
use reinhardt_datatable_core::{
	FilterValue, FilterValues, QueryParams, QuerySource, Record, SortDirection, Table,
};
use reinhardt_datatable_query::MemorySource;
use rstest::*;
use serde_json::json;

fn names(rows: &[Record]) -> Vec<String> {
	rows.iter()
		.map(|row| row["name"].as_str().unwrap_or_default().to_string())
		.collect()
}

async fn matching(table: &Table, source: &MemorySource, params: QueryParams<'_>) -> Vec<String> {
	let query = table.build_query(&params);
	names(&source.fetch(&query, 0, None).await.unwrap())
}

fn filters(name: &str, value: impl Into<FilterValue>) -> FilterValues {
	let mut values = FilterValues::new();
	values.insert(name.to_string(), value.into());
	values
}

#[rstest]
#[case(SortDirection::Asc, vec!["Apple", "Mango", "Zebra"])]
#[case(SortDirection::Desc, vec!["Zebra", "Mango", "Apple"])]
#[tokio::test]
async fn test_sort_by_name(
	users: MemorySource,
	users_table: Table,
	#[case] direction: SortDirection,
	#[case] expected: Vec<&str>,
) {
	let params = QueryParams::new().sort("name", direction);
	let page = users_table.paginate(&users, &params, 1, 10).await.unwrap();

	assert_eq!(page.total, 3);
	assert_eq!(names(&page.items), expected);
}

#[rstest]
#[tokio::test]
async fn test_unsortable_column_keeps_insertion_order(users: MemorySource, users_table: Table) {
	let params = QueryParams::new().sort("team.name", SortDirection::Desc);
	assert_eq!(
		matching(&users_table, &users, params).await,
		vec!["Zebra", "Apple", "Mango"]
	);
}

#[rstest]
#[case("example.org", vec!["Mango"])]
#[case("SALES", vec!["Apple"])]
#[case("an", vec!["Mango"])]
#[case("nobody", vec![])]
#[tokio::test]
async fn test_search_across_columns_and_relations(
	users: MemorySource,
	users_table: Table,
	#[case] term: &str,
	#[case] expected: Vec<&str>,
) {
	let params = QueryParams::new().search(term);
	assert_eq!(matching(&users_table, &users, params).await, expected);
}

#[rstest]
#[tokio::test]
async fn test_option_predicates_receive_selected_value(users: MemorySource, users_table: Table) {
	let values = filters("status", FilterValue::list(["inactive"]));
	let params = QueryParams::new().filters(&values);
	assert_eq!(matching(&users_table, &users, params).await, vec!["Apple"]);

	let values = filters("status", FilterValue::list(["active", "inactive"]));
	let params = QueryParams::new().filters(&values);
	assert_eq!(matching(&users_table, &users, params).await.len(), 3);
}

#[rstest]
#[tokio::test]
async fn test_search_and_filters_combine(users: MemorySource, users_table: Table) {
	let mut values = filters("status", FilterValue::list(["active"]));
	values.insert("role".into(), FilterValue::list(["member"]));

	let params = QueryParams::new().search("example").filters(&values);
	assert_eq!(matching(&users_table, &users, params).await, vec!["Mango"]);
}

#[rstest]
#[tokio::test]
async fn test_date_filter_matches_day(users: MemorySource, users_table: Table) {
	let values = filters("created_on", "2024-01-16");
	let params = QueryParams::new().filters(&values);
	assert_eq!(matching(&users_table, &users, params).await, vec!["Zebra"]);
}

#[rstest]
#[case(json!({"start": "2024-01-15", "end": "2024-01-17"}), vec!["Zebra", "Mango"])]
#[case(json!("2024-01-16/2024-01-18"), vec!["Zebra", "Apple"])]
#[case(json!([{"start": "2024-01-18", "end": "2024-01-18"}]), vec!["Apple"])]
#[case(json!(["invalid"]), vec!["Zebra", "Apple", "Mango"])]
#[case(json!({"start": "not a date", "end": "2024-01-17"}), vec!["Zebra", "Apple", "Mango"])]
#[tokio::test]
async fn test_range_filter_shapes(
	users: MemorySource,
	users_table: Table,
	#[case] value: serde_json::Value,
	#[case] expected: Vec<&str>,
) {
	let values = filters("created_at", value);
	let params = QueryParams::new().filters(&values);
	assert_eq!(matching(&users_table, &users, params).await, expected);
}

#[rstest]
#[tokio::test]
async fn test_forged_filter_names_are_ignored(users: MemorySource, users_table: Table) {
	let values = filters("is_admin", FilterValue::list(["1"]));
	let params = QueryParams::new().filters(&values);
	assert_eq!(matching(&users_table, &users, params).await.len(), 3);
}

proptest! {
	#[test]
	fn prop_search_never_expands_results(term in "[a-zA-Z@. ]{0,8}") {
		let runtime = tokio::runtime::Runtime::new().unwrap();
		let source = users();
		let table = users_table();

		let (all, narrowed) = runtime.block_on(async {
			let base = table.build_query(&QueryParams::new());
			let searched = table.build_query(&QueryParams::new().search(&term));
			(
				source.count(&base).await.unwrap(),
				source.count(&searched).await.unwrap(),
			)
		});
		prop_assert!(narrowed <= all);
	}

	#[test]
	fn prop_composition_is_deterministic(
		term in "[a-z]{0,4}",
		column in prop::sample::select(vec!["name", "email", "team.name", "missing"]),
		desc in any::<bool>(),
	) {
		let table = users_table();
		let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
		let params = QueryParams::new().search(&term).sort(column, direction);

		prop_assert_eq!(table.build_query(&params), table.build_query(&params));
	}
}
