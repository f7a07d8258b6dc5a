//! Shared fixtures for query integration tests

use reinhardt_datatable_query::MemorySource;
use rstest::fixture;
use serde_json::json;

#[fixture]
pub fn users() -> MemorySource {
	MemorySource::from_values(vec![
		json!({"id": 1, "name": "Zebra", "email": "zebra@example.com", "status": "active", "created_at": "2024-01-16 09:30:00", "team": {"name": "Ops"}}),
		json!({"id": 2, "name": "Apple", "email": "apple@example.com", "status": "inactive", "created_at": "2024-01-18 12:00:00", "team": {"name": "Sales"}}),
		json!({"id": 3, "name": "Mango", "email": "mango@example.org", "status": "active", "created_at": "2024-01-15 00:00:00", "team": null}),
	])
}
