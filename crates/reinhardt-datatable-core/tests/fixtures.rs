//! Shared fixtures for table integration tests

use reinhardt_datatable_core::{
	Column, Condition, DateFilter, Filter, FilterOption, Query, RangeFilter, Table,
};
use reinhardt_datatable_query::MemorySource;
use rstest::fixture;
use serde_json::json;

#[fixture]
pub fn users() -> MemorySource {
	MemorySource::from_values(vec![
		json!({"id": 1, "name": "Zebra", "email": "zebra@example.com", "status": "active", "role": "admin", "created_at": "2024-01-16 09:30:00", "team": {"name": "Ops"}}),
		json!({"id": 2, "name": "Apple", "email": "apple@example.com", "status": "inactive", "role": "member", "created_at": "2024-01-18 12:00:00", "team": {"name": "Sales"}}),
		json!({"id": 3, "name": "Mango", "email": "mango@example.org", "status": "active", "role": "member", "created_at": "2024-01-15 00:00:00", "team": null}),
	])
}

#[fixture]
pub fn users_table() -> Table {
	Table::new(Query::table("users"))
		.with_columns(vec![
			Column::checkbox(),
			Column::make("name"),
			Column::make("email"),
			Column::make("team.name").sortable(false),
			Column::make("role").filter(|query, value| {
				query.and_where(Condition::is_in("role", value.values()));
			}),
			Column::actions(),
		])
		.with_filter(
			Filter::make("status")
				.multiple(true)
				.with_options(vec![
					FilterOption::make("active").query(|query, value| {
						query.and_where(Condition::eq("status", value));
					}),
					FilterOption::make("inactive").query(|query, value| {
						query.and_where(Condition::eq("status", value));
					}),
				]),
		)
		.with_filter(DateFilter::make("created_on").column("created_at"))
		.with_filter(RangeFilter::make("created_at"))
}
