//! Query plans evaluated by the in-memory source

mod fixtures;

use fixtures::users;
use proptest::prelude::*;
use reinhardt_datatable_query::{Condition, MemorySource, Query, QuerySource, SortDirection};
use rstest::*;
use serde_json::{Value, json};

fn names(rows: &[reinhardt_datatable_query::Record]) -> Vec<String> {
	rows.iter()
		.map(|row| row["name"].as_str().unwrap_or_default().to_string())
		.collect()
}

#[rstest]
#[case(SortDirection::Asc, vec!["Apple", "Mango", "Zebra"])]
#[case(SortDirection::Desc, vec!["Zebra", "Mango", "Apple"])]
#[tokio::test]
async fn test_order_by_name(
	users: MemorySource,
	#[case] direction: SortDirection,
	#[case] expected: Vec<&str>,
) {
	let mut query = Query::table("users");
	query.order_by("name", direction);

	let rows = users.fetch(&query, 0, None).await.unwrap();
	assert_eq!(names(&rows), expected);
}

#[tokio::test]
async fn test_order_by_mixed_codes_groups_equal_values() {
	let rows = MemorySource::from_values(
		(0..300usize).map(|id| json!({"id": id, "code": (["10", "9", "1x"][id % 3])})),
	);
	let mut query = Query::table("codes");
	query.order_by("code", SortDirection::Asc);

	let codes: Vec<Value> = rows
		.fetch(&query, 0, None)
		.await
		.unwrap()
		.into_iter()
		.map(|row| row["code"].clone())
		.collect();

	let mut groups = codes.clone();
	groups.dedup();
	assert_eq!(groups, vec![json!("9"), json!("10"), json!("1x")]);
	assert_eq!(codes.len(), 300);
}

#[tokio::test]
async fn test_paginate_far_past_the_end() {
	let rows = MemorySource::from_values(vec![json!({"id": 1})]);

	let page = rows
		.paginate(&Query::table("rows"), u64::MAX, 25)
		.await
		.unwrap();

	assert!(page.items.is_empty());
	assert_eq!(page.total, 1);
}

#[rstest]
#[tokio::test]
async fn test_grouped_search_with_and_filter(users: MemorySource) {
	let mut query = Query::table("users");
	query
		.and_where_group(|group| {
			group
				.or_where(Condition::contains("name", "an"))
				.or_where(Condition::contains("email", ".org"));
		})
		.and_where(Condition::eq("status", "active"));

	let rows = users.fetch(&query, 0, None).await.unwrap();
	assert_eq!(names(&rows), vec!["Mango"]);
}

#[rstest]
#[tokio::test]
async fn test_relation_condition(users: MemorySource) {
	let mut query = Query::table("users");
	query.and_where(Condition::relation("team", Condition::contains("name", "sal")));

	let rows = users.fetch(&query, 0, None).await.unwrap();
	assert_eq!(names(&rows), vec!["Apple"]);
}

#[rstest]
#[tokio::test]
async fn test_paginate(users: MemorySource) {
	let mut query = Query::table("users");
	query.order_by("id", SortDirection::Asc);

	let page = users.paginate(&query, 2, 2).await.unwrap();
	assert_eq!(page.total, 3);
	assert_eq!(page.last_page(), 2);
	assert_eq!(names(&page.items), vec!["Mango"]);
}

#[rstest]
#[tokio::test]
async fn test_find_and_matching_ids(users: MemorySource) {
	let mut active = Query::table("users");
	active.and_where(Condition::eq("status", "active"));

	let found = users.find(&active, "id", &json!(3)).await.unwrap();
	assert_eq!(found.map(|row| row["name"].clone()), Some(json!("Mango")));
	assert!(users.find(&active, "id", &json!(2)).await.unwrap().is_none());

	let ids = users
		.matching_ids(&active, "id", &[json!(3), json!(2), json!(99), json!(1)])
		.await
		.unwrap();
	assert_eq!(ids, vec![json!(3), json!(1)]);
}

#[rstest]
#[tokio::test]
async fn test_mutations(users: MemorySource) {
	assert_eq!(users.update("id", &[json!(2)], "status", json!("active")), 1);
	assert_eq!(users.delete("id", &[json!(1), json!(3)]), 2);

	let rows = users.rows();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["status"], Value::from("active"));
}

proptest! {
	#[test]
	fn prop_search_never_expands_results(term in "[a-zA-Z@.]{0,6}") {
		let runtime = tokio::runtime::Runtime::new().unwrap();
		let source = users();
		let base = Query::table("users");
		let mut searched = base.clone();
		searched.and_where_group(|group| {
			group
				.or_where(Condition::contains("name", term.clone()))
				.or_where(Condition::contains("email", term.clone()));
		});

		let (all, narrowed) = runtime.block_on(async {
			(
				source.count(&base).await.unwrap(),
				source.count(&searched).await.unwrap(),
			)
		});
		prop_assert!(narrowed <= all);
	}
}
