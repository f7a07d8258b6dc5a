//! The table facade
//!
//! A [`Table`] is assembled once per mount from independent registries
//! and configs, then stays immutable. It composes queries for a given set
//! of user inputs (see [`Table::build_query`]) and serializes itself for
//! the presentation layer.

mod compose;
mod config;
mod registry;

pub use compose::QueryParams;
pub use config::{
	DEFAULT_SEARCH_PLACEHOLDER, ExportConfig, ExportFormat, PaginationConfig, SearchConfig,
};
pub use registry::{ActionRegistry, ColumnRegistry, FilterRegistry};

use crate::action::{ActionResult, BulkActionEntry, BulkExecutable, RowAction};
use crate::column::Column;
use crate::error::{DatatableError, DatatableResult};
use crate::filter::{FilterValues, TableFilter};
use reinhardt_datatable_query::{Page, Query, QuerySource, Record, RowId};
use serde_json::{Value, json};
use std::sync::Arc;

/// Default primary key of table rows
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Declarative definition of one data table
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_core::{Column, Filter, FilterOption, Query, Table};
///
/// let table = Table::new(Query::table("users"))
///     .with_columns(vec![Column::checkbox(), Column::make("name"), Column::make("email")])
///     .with_filter(Filter::make("status").with_options(vec![FilterOption::make("active")]))
///     .with_per_page(25);
///
/// assert!(table.is_searchable());
/// assert_eq!(table.resolved_search_columns(), vec!["name", "email"]);
/// assert!(table.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Table {
	base: Query,
	primary_key: String,
	columns: ColumnRegistry,
	filters: FilterRegistry,
	actions: ActionRegistry,
	search: SearchConfig,
	pagination: PaginationConfig,
	export: ExportConfig,
}

impl Table {
	pub fn new(base: Query) -> Self {
		Self {
			base,
			primary_key: DEFAULT_PRIMARY_KEY.to_string(),
			columns: ColumnRegistry::default(),
			filters: FilterRegistry::default(),
			actions: ActionRegistry::default(),
			search: SearchConfig::default(),
			pagination: PaginationConfig::default(),
			export: ExportConfig::default(),
		}
	}

	pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
		self.primary_key = key.into();
		self
	}

	pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
		self.columns.set(columns);
		self
	}

	pub fn with_column(mut self, column: Column) -> Self {
		self.columns.push(column);
		self
	}

	pub fn with_filters(mut self, filters: Vec<Arc<dyn TableFilter>>) -> Self {
		self.filters.set(filters);
		self
	}

	pub fn with_filter(mut self, filter: impl TableFilter + 'static) -> Self {
		self.filters.push(Arc::new(filter));
		self
	}

	pub fn with_actions(mut self, actions: Vec<BulkActionEntry>) -> Self {
		self.actions.set(actions);
		self
	}

	pub fn with_action(mut self, action: impl Into<BulkActionEntry>) -> Self {
		self.actions.push(action.into());
		self
	}

	/// Search only these columns instead of deriving them from the table
	pub fn searchable<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.search = self.search.with_columns(columns).from_columns(false);
		self
	}

	pub fn search_from_columns(mut self, from_columns: bool) -> Self {
		self.search = self.search.from_columns(from_columns);
		self
	}

	pub fn search_enabled(mut self, enabled: bool) -> Self {
		self.search = self.search.enabled(enabled);
		self
	}

	pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.search = self.search.with_placeholder(placeholder);
		self
	}

	pub fn with_per_page(mut self, per_page: u64) -> Self {
		self.pagination = self.pagination.with_per_page(per_page);
		self
	}

	pub fn with_per_page_options(mut self, options: Vec<u64>) -> Self {
		self.pagination = self.pagination.with_per_page_options(options);
		self
	}

	pub fn exportable(mut self, enabled: bool) -> Self {
		self.export = self.export.enabled(enabled);
		self
	}

	pub fn with_export_formats(mut self, formats: Vec<ExportFormat>) -> Self {
		self.export = self.export.with_formats(formats);
		self
	}

	pub fn with_export_name(mut self, name: impl Into<String>) -> Self {
		self.export = self.export.with_name(name);
		self
	}

	/// A fresh copy of the base query
	pub fn query(&self) -> Query {
		self.base.clone()
	}

	pub fn base_query(&self) -> &Query {
		&self.base
	}

	pub fn primary_key(&self) -> &str {
		&self.primary_key
	}

	pub fn columns(&self) -> &ColumnRegistry {
		&self.columns
	}

	pub fn column(&self, name: &str) -> Option<&Column> {
		self.columns.get(name)
	}

	pub fn filters(&self) -> &FilterRegistry {
		&self.filters
	}

	pub fn filter(&self, name: &str) -> Option<&dyn TableFilter> {
		self.filters.get(name)
	}

	pub fn actions(&self) -> &ActionRegistry {
		&self.actions
	}

	pub fn action(&self, name: &str) -> Option<&dyn BulkExecutable> {
		self.actions.get(name)
	}

	pub fn find_row_action(&self, name: &str) -> Option<&RowAction> {
		self.columns.row_action(name)
	}

	pub fn search(&self) -> &SearchConfig {
		&self.search
	}

	pub fn pagination(&self) -> &PaginationConfig {
		&self.pagination
	}

	pub fn export(&self) -> &ExportConfig {
		&self.export
	}

	pub fn resolved_search_columns(&self) -> Vec<String> {
		self.search.resolved_columns(&self.columns)
	}

	/// Search is enabled and resolves to at least one column
	pub fn is_searchable(&self) -> bool {
		self.search.is_enabled() && !self.resolved_search_columns().is_empty()
	}

	pub fn active_filters_count(&self, values: &FilterValues) -> usize {
		self.filters.active_count(values)
	}

	pub fn default_filter_values(&self) -> FilterValues {
		self.filters.defaults()
	}

	/// Reject duplicate column, filter, option or bulk action names
	pub fn validate(&self) -> DatatableResult<()> {
		if let Some(name) = self.columns.duplicate() {
			return Err(DatatableError::Configuration(format!(
				"duplicate column name '{}'",
				name
			)));
		}
		if let Some(name) = self.filters.duplicate() {
			return Err(DatatableError::Configuration(format!(
				"duplicate filter or option name '{}'",
				name
			)));
		}
		if let Some(name) = self.actions.duplicate() {
			return Err(DatatableError::Configuration(format!(
				"duplicate action name '{}'",
				name
			)));
		}
		Ok(())
	}

	/// Compose the query for `params` and fetch one page of it
	pub async fn paginate<S>(
		&self,
		source: &S,
		params: &QueryParams<'_>,
		page: u64,
		per_page: u64,
	) -> DatatableResult<Page<Record>>
	where
		S: QuerySource + ?Sized,
	{
		let query = self.build_query(params);
		Ok(source.paginate(&query, page, per_page).await?)
	}

	/// Run a bulk action by name against `ids`
	pub async fn execute_action(&self, name: &str, ids: Vec<RowId>) -> ActionResult {
		self.actions.execute(name, ids).await
	}

	/// Descriptor consumed by the presentation layer
	pub fn to_json(&self) -> Value {
		json!({
			"columns": self.columns.all().iter().map(Column::to_json).collect::<Vec<_>>(),
			"filters": self.filters.all().iter().map(|f| f.to_json()).collect::<Vec<_>>(),
			"actions": self.actions.all().iter().map(BulkActionEntry::to_json).collect::<Vec<_>>(),
			"exportName": self.export.name(),
			"searchable": self.is_searchable(),
			"searchPlaceholder": self.search.placeholder(),
			"perPage": self.pagination.per_page(),
			"perPageOptions": self.pagination.per_page_options(),
			"exportable": self.export.is_enabled(),
			"exportFormats": self.export.formats(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::action::{BulkAction, RowActionGroup};
	use crate::filter::{Filter, FilterOption};

	fn table() -> Table {
		Table::new(Query::table("users"))
			.with_columns(vec![
				Column::checkbox(),
				Column::make("name"),
				Column::make("team.name"),
				Column::actions().with_action(
					RowActionGroup::make().with_actions(vec![RowAction::make("edit")]),
				),
			])
			.with_filter(Filter::make("status").with_options(vec![
				FilterOption::make("active").as_default(),
				FilterOption::make("inactive"),
			]))
			.with_action(BulkAction::make("delete"))
	}

	#[test]
	fn test_lookups() {
		let table = table();
		assert!(table.column("name").is_some());
		assert!(table.filter("status").is_some());
		assert!(table.action("delete").is_some());
		assert!(table.find_row_action("edit").is_some());
		assert!(table.find_row_action("delete").is_none());
		assert_eq!(table.primary_key(), "id");
	}

	#[test]
	fn test_search_resolution() {
		assert_eq!(table().resolved_search_columns(), vec!["name", "team.name"]);
		assert!(!table().search_enabled(false).is_searchable());
		assert!(!table().search_from_columns(false).is_searchable());
		assert_eq!(table().searchable(["email"]).resolved_search_columns(), vec!["email"]);
	}

	#[test]
	fn test_default_filter_values() {
		let defaults = table().default_filter_values();
		assert!(defaults["status"].contains("active"));
	}

	#[test]
	fn test_validate_rejects_duplicates() {
		let duplicate_column = table().with_column(Column::make("name"));
		let err = duplicate_column.validate().unwrap_err();
		assert!(matches!(err, DatatableError::Configuration(ref msg) if msg.contains("name")));

		let duplicate_action = table().with_action(BulkAction::make("delete"));
		assert!(duplicate_action.validate().is_err());
	}

	#[test]
	fn test_to_json() {
		let json = table()
			.with_export_name("users")
			.with_export_formats(vec![ExportFormat::Csv])
			.to_json();

		assert_eq!(json["columns"].as_array().map(Vec::len), Some(4));
		assert_eq!(json["filters"][0]["name"], "status");
		assert_eq!(json["actions"][0]["name"], "delete");
		assert_eq!(json["exportName"], "users");
		assert_eq!(json["searchable"], true);
		assert_eq!(json["searchPlaceholder"], "Search...");
		assert_eq!(json["perPage"], Value::Null);
		assert_eq!(json["perPageOptions"], json!([10, 25, 50, 100]));
		assert_eq!(json["exportable"], true);
		assert_eq!(json["exportFormats"], json!(["csv"]));
	}
}
