//! Query composition: search, filters, column filters and sort on top of
//! the base query

use super::Table;
use crate::filter::FilterValues;
use reinhardt_datatable_query::{Condition, Query, SortDirection};

/// User inputs a query is composed from
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<'a> {
	pub search: Option<&'a str>,
	pub filters: Option<&'a FilterValues>,
	pub sort_column: Option<&'a str>,
	pub sort_direction: SortDirection,
}

impl<'a> QueryParams<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn search(mut self, term: &'a str) -> Self {
		self.search = Some(term);
		self
	}

	pub fn filters(mut self, filters: &'a FilterValues) -> Self {
		self.filters = Some(filters);
		self
	}

	pub fn sort(mut self, column: &'a str, direction: SortDirection) -> Self {
		self.sort_column = Some(column);
		self.sort_direction = direction;
		self
	}
}

/// Match `term` against `column`, reaching through a relation for `relation.field`
fn search_condition(column: &str, term: &str) -> Condition {
	match column.rsplit_once('.') {
		Some((relation, field)) => Condition::relation(relation, Condition::contains(field, term)),
		None => Condition::contains(column, term),
	}
}

impl Table {
	/// Compose the query for `params`
	///
	/// Starts from a copy of the base query, then narrows it by the
	/// search term (OR across the searchable columns, as one group), by
	/// each active filter and column filter, and finally orders it.
	/// Unknown filters and unknown or unsortable sort columns are ignored.
	pub fn build_query(&self, params: &QueryParams<'_>) -> Query {
		let mut query = self.query();

		if let Some(term) = params.search.map(str::trim)
			&& !term.is_empty()
			&& self.search.is_enabled()
		{
			let columns = self.resolved_search_columns();
			if !columns.is_empty() {
				query.and_where_group(|group| {
					for column in &columns {
						group.or_where(search_condition(column, term));
					}
				});
			}
		}

		if let Some(values) = params.filters {
			for (name, value) in values {
				match self.filter(name) {
					Some(filter) if !value.is_empty() => filter.apply(&mut query, value),
					Some(_) => {}
					None if self.column(name).is_some_and(|c| c.has_filter()) => {}
					None => tracing::debug!(filter = %name, "ignoring unknown filter"),
				}
			}

			for column in self.columns.all().iter().filter(|c| c.has_filter()) {
				if let Some(value) = values.get(column.name())
					&& !value.is_empty()
				{
					column.apply_filter(&mut query, value);
				}
			}
		}

		if let Some(name) = params.sort_column {
			match self.column(name) {
				Some(column) if column.is_sortable() => {
					query.order_by(column.sort_column(), params.sort_direction);
				}
				_ => tracing::debug!(column = %name, "ignoring sort on unknown or unsortable column"),
			}
		}

		query
	}
}
