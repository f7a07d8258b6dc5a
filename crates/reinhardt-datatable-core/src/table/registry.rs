//! Ordered registries of columns, filters and bulk actions.
//!
//! Lookups are linear scans; tables hold a handful of entries.

use crate::action::{ActionResult, BulkActionEntry, BulkExecutable, RowAction};
use crate::column::{Column, ColumnKind};
use crate::filter::{FilterValues, TableFilter};
use reinhardt_datatable_query::RowId;
use std::collections::HashSet;
use std::sync::Arc;

fn first_duplicate<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
	let mut seen = HashSet::new();
	names.into_iter().find(|name| !seen.insert(*name))
}

#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
	columns: Vec<Column>,
}

impl ColumnRegistry {
	pub fn new(columns: Vec<Column>) -> Self {
		Self { columns }
	}

	pub fn set(&mut self, columns: Vec<Column>) {
		self.columns = columns;
	}

	pub fn push(&mut self, column: Column) {
		self.columns.push(column);
	}

	pub fn all(&self) -> &[Column] {
		&self.columns
	}

	pub fn get(&self, name: &str) -> Option<&Column> {
		self.columns.iter().find(|column| column.name() == name)
	}

	/// Columns not hidden by the table definition
	pub fn visible(&self) -> Vec<&Column> {
		self.columns.iter().filter(|c| !c.is_hidden()).collect()
	}

	pub fn sortable(&self) -> Vec<&Column> {
		self.columns.iter().filter(|c| c.is_sortable()).collect()
	}

	pub fn toggable(&self) -> Vec<&Column> {
		self.columns.iter().filter(|c| c.is_toggable()).collect()
	}

	/// Columns holding data, i.e. everything but checkbox and action columns
	pub fn data(&self) -> impl Iterator<Item = &Column> {
		self.columns.iter().filter(|c| !c.is_special())
	}

	/// Row action of that name in any action column
	pub fn row_action(&self, name: &str) -> Option<&RowAction> {
		self.columns
			.iter()
			.filter(|c| c.kind() == ColumnKind::Action)
			.filter_map(Column::action)
			.find_map(|entry| entry.find(name))
	}

	pub(crate) fn duplicate(&self) -> Option<&str> {
		first_duplicate(self.columns.iter().map(Column::name))
	}
}

#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
	filters: Vec<Arc<dyn TableFilter>>,
}

impl FilterRegistry {
	pub fn new(filters: Vec<Arc<dyn TableFilter>>) -> Self {
		Self { filters }
	}

	pub fn set(&mut self, filters: Vec<Arc<dyn TableFilter>>) {
		self.filters = filters;
	}

	pub fn push(&mut self, filter: Arc<dyn TableFilter>) {
		self.filters.push(filter);
	}

	pub fn all(&self) -> &[Arc<dyn TableFilter>] {
		&self.filters
	}

	pub fn get(&self, name: &str) -> Option<&dyn TableFilter> {
		self.filters
			.iter()
			.find(|filter| filter.name() == name)
			.map(|filter| filter.as_ref())
	}

	/// Number of entries in `values` that are non-empty
	pub fn active_count(&self, values: &FilterValues) -> usize {
		values.values().filter(|value| !value.is_empty()).count()
	}

	/// Values pre-selected through default options
	pub fn defaults(&self) -> FilterValues {
		self.filters
			.iter()
			.filter_map(|filter| {
				filter
					.default_value()
					.map(|value| (filter.name().to_string(), value))
			})
			.collect()
	}

	pub(crate) fn duplicate(&self) -> Option<String> {
		if let Some(name) = first_duplicate(self.filters.iter().map(|f| f.name())) {
			return Some(name.to_string());
		}
		self.filters.iter().find_map(|filter| {
			first_duplicate(filter.options().iter().map(|o| o.name()))
				.map(|option| format!("{}.{}", filter.name(), option))
		})
	}
}

#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
	actions: Vec<BulkActionEntry>,
}

impl ActionRegistry {
	pub fn new(actions: Vec<BulkActionEntry>) -> Self {
		Self { actions }
	}

	pub fn set(&mut self, actions: Vec<BulkActionEntry>) {
		self.actions = actions;
	}

	pub fn push(&mut self, action: BulkActionEntry) {
		self.actions.push(action);
	}

	pub fn all(&self) -> &[BulkActionEntry] {
		&self.actions
	}

	/// Top-level entry of that name, else an action nested in a group
	pub fn get(&self, name: &str) -> Option<&dyn BulkExecutable> {
		self.actions.iter().find_map(|entry| entry.find(name))
	}

	/// Run the named action; unknown names yield an "Action not found" failure
	pub async fn execute(&self, name: &str, ids: Vec<RowId>) -> ActionResult {
		match self.get(name) {
			Some(action) => action.execute(ids).await,
			None => {
				tracing::debug!(action = %name, "bulk action not found");
				ActionResult::failure().with_message("Action not found")
			}
		}
	}

	pub(crate) fn duplicate(&self) -> Option<&str> {
		first_duplicate(self.actions.iter().map(BulkActionEntry::name))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::action::{BulkAction, BulkActionGroup, RowActionGroup};
	use crate::filter::{Filter, FilterOption, FilterValue};
	use serde_json::json;

	#[test]
	fn test_column_views() {
		let registry = ColumnRegistry::new(vec![
			Column::checkbox(),
			Column::make("name"),
			Column::make("secret").hidden(true),
			Column::make("created_at").sortable(false),
			Column::actions().with_action(
				RowActionGroup::make().with_actions(vec![RowAction::make("edit")]),
			),
		]);

		assert_eq!(registry.visible().len(), 4);
		assert_eq!(registry.sortable().len(), 2);
		assert_eq!(registry.toggable().len(), 3);
		assert_eq!(
			registry.data().map(Column::name).collect::<Vec<_>>(),
			vec!["name", "secret", "created_at"]
		);
		assert!(registry.get("name").is_some());
		assert!(registry.get("nope").is_none());
		assert!(registry.row_action("edit").is_some());
		assert!(registry.row_action("delete").is_none());
		assert!(registry.duplicate().is_none());
	}

	#[test]
	fn test_filter_registry() {
		let registry = FilterRegistry::new(vec![
			Arc::new(Filter::make("status").with_options(vec![
				FilterOption::make("active").as_default(),
				FilterOption::make("inactive"),
			])),
			Arc::new(Filter::make("role")),
		]);

		assert!(registry.get("role").is_some());
		assert!(registry.get("team").is_none());

		let defaults = registry.defaults();
		assert_eq!(defaults.len(), 1);
		assert_eq!(defaults["status"], FilterValue::list(["active"]));

		let mut values = FilterValues::new();
		values.insert("status".into(), FilterValue::list(["active"]));
		values.insert("role".into(), FilterValue::List(Vec::new()));
		assert_eq!(registry.active_count(&values), 1);
	}

	#[test]
	fn test_duplicate_option_names() {
		let registry = FilterRegistry::new(vec![Arc::new(Filter::make("status").with_options(
			vec![FilterOption::make("active"), FilterOption::make("active")],
		))]);
		assert_eq!(registry.duplicate().as_deref(), Some("status.active"));
	}

	#[tokio::test]
	async fn test_action_lookup_and_execute() {
		let registry = ActionRegistry::new(vec![
			BulkAction::make("delete").into(),
			BulkActionGroup::make("more")
				.with_actions(vec![BulkAction::make("archive").handle(|ids| async move {
					ActionResult::success().with_extra("archived", ids.len())
				})])
				.into(),
		]);

		assert!(registry.get("archive").is_some());
		assert!(registry.get("more").is_some());

		let archived = registry.execute("archive", vec![json!(1), json!(2)]).await;
		assert!(archived.success);
		assert_eq!(archived.extra["archived"], 2);

		let missing = registry.execute("purge", vec![json!(1)]).await;
		assert!(!missing.success);
		assert_eq!(missing.message.as_deref(), Some("Action not found"));

		let group = registry.execute("more", vec![json!(1)]).await;
		assert_eq!(
			group.message.as_deref(),
			Some("Cannot execute action group directly")
		);
	}
}
