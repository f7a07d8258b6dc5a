//! In-memory [`QuerySource`] over JSON records.

use crate::builder::{Query, SortDirection};
use crate::error::QueryResult;
use crate::source::QuerySource;
use crate::value::{Record, RowId, compare_values, lookup, values_equal};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;

/// Rows held in memory and queried by evaluating the plan's condition tree
///
/// Useful for fixtures, small lookup tables and tests. Rows can be mutated
/// after construction so action handlers have something to act on.
#[derive(Debug, Default)]
pub struct MemorySource {
	rows: RwLock<Vec<Record>>,
}

impl MemorySource {
	pub fn new(rows: Vec<Record>) -> Self {
		Self {
			rows: RwLock::new(rows),
		}
	}

	/// Build from JSON values; anything that is not an object is skipped
	pub fn from_values<I>(values: I) -> Self
	where
		I: IntoIterator<Item = Value>,
	{
		Self::new(
			values
				.into_iter()
				.filter_map(|value| match value {
					Value::Object(map) => Some(map),
					_ => None,
				})
				.collect(),
		)
	}

	pub fn len(&self) -> usize {
		self.rows.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.read().is_empty()
	}

	/// Snapshot of all rows in insertion order
	pub fn rows(&self) -> Vec<Record> {
		self.rows.read().clone()
	}

	pub fn insert(&self, row: Record) {
		self.rows.write().push(row);
	}

	/// Remove rows whose `key` is one of `ids`; returns how many were removed
	pub fn delete(&self, key: &str, ids: &[RowId]) -> usize {
		let mut rows = self.rows.write();
		let before = rows.len();
		rows.retain(|row| {
			!row.get(key)
				.is_some_and(|value| ids.iter().any(|id| values_equal(value, id)))
		});
		before - rows.len()
	}

	/// Set `field` to `value` on rows whose `key` is one of `ids`; returns how many changed
	pub fn update(&self, key: &str, ids: &[RowId], field: &str, value: Value) -> usize {
		let mut updated = 0;
		for row in self.rows.write().iter_mut() {
			if row
				.get(key)
				.is_some_and(|current| ids.iter().any(|id| values_equal(current, id)))
			{
				row.insert(field.to_string(), value.clone());
				updated += 1;
			}
		}
		updated
	}

	fn select(&self, query: &Query) -> Vec<Record> {
		let condition = query.condition();
		let mut rows: Vec<Record> = self
			.rows
			.read()
			.iter()
			.filter(|row| condition.as_ref().is_none_or(|c| c.matches(row)))
			.cloned()
			.collect();

		if !query.orders().is_empty() {
			// Stable sort keeps insertion order among ties
			rows.sort_by(|a, b| {
				query
					.orders()
					.iter()
					.map(|order| {
						let ordering = compare_values(
							lookup(a, &order.column).unwrap_or(&Value::Null),
							lookup(b, &order.column).unwrap_or(&Value::Null),
						);
						match order.direction {
							SortDirection::Asc => ordering,
							SortDirection::Desc => ordering.reverse(),
						}
					})
					.find(|ordering| *ordering != Ordering::Equal)
					.unwrap_or(Ordering::Equal)
			});
		}

		rows
	}
}

#[async_trait]
impl QuerySource for MemorySource {
	async fn fetch(
		&self,
		query: &Query,
		offset: u64,
		limit: Option<u64>,
	) -> QueryResult<Vec<Record>> {
		let offset = usize::try_from(offset).unwrap_or(usize::MAX);
		let rows = self.select(query).into_iter().skip(offset);
		Ok(match limit {
			Some(limit) => rows
				.take(usize::try_from(limit).unwrap_or(usize::MAX))
				.collect(),
			None => rows.collect(),
		})
	}

	async fn count(&self, query: &Query) -> QueryResult<u64> {
		Ok(self.select(query).len() as u64)
	}
}
