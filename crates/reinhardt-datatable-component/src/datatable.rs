//! The controller translating UI events into state transitions, queries
//! and action runs

use crate::event::{ComponentEvent, Notification};
use crate::selection::{SelectionModel, ServerTrackedSelection};
use crate::state::{ActionTarget, InteractionState, PendingAction};
use reinhardt_datatable_core::{
	ActionResult, BulkExecutable, Column, DatatableResult, DatatableSettings, ExportFormat,
	FilterValue, QueryParams, Table,
};
use reinhardt_datatable_export::{DatatableExporter, ExportResult};
use reinhardt_datatable_query::{Page, Query, QuerySource, Record, RowId, values_equal};
use std::fmt;
use std::sync::Arc;

/// Source of a table definition, invoked once per mount
pub trait DatatableDefinition {
	fn setup(&self) -> Table;
}

impl<F> DatatableDefinition for F
where
	F: Fn() -> Table,
{
	fn setup(&self) -> Table {
		self()
	}
}

/// Next state plus whatever the presentation layer should react to
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
	pub state: InteractionState,
	pub events: Vec<ComponentEvent>,
	/// Outcome of the action that ran during this transition, if any
	pub result: Option<ActionResult>,
}

impl Transition {
	fn unchanged(state: InteractionState) -> Self {
		Self {
			state,
			events: Vec::new(),
			result: None,
		}
	}

	pub fn executed(&self) -> bool {
		self.result.is_some()
	}
}

/// One mounted table
///
/// Holds the immutable [`Table`] and the data source; all per-user state
/// travels in the [`InteractionState`] passed to and returned from each
/// operation.
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_component::Datatable;
/// use reinhardt_datatable_core::{Column, Query, Table};
/// use reinhardt_datatable_query::MemorySource;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let source = MemorySource::from_values(vec![
///     json!({"id": 1, "name": "Zebra"}),
///     json!({"id": 2, "name": "Apple"}),
/// ]);
/// let datatable = Datatable::mount(
///     || Table::new(Query::table("animals")).with_columns(vec![Column::make("name")]),
///     source,
/// )
/// .unwrap();
///
/// let state = datatable.sort_by(datatable.initial_state(), "name");
/// let page = datatable.data(&state).await.unwrap();
/// assert_eq!(page.items[0]["name"], "Apple");
/// # }
/// ```
pub struct Datatable {
	table: Table,
	settings: DatatableSettings,
	source: Arc<dyn QuerySource>,
	selection: Box<dyn SelectionModel>,
}

impl Datatable {
	pub fn new(table: Table, source: impl QuerySource + 'static) -> Self {
		Self::from_arc(table, Arc::new(source))
	}

	pub fn from_arc(table: Table, source: Arc<dyn QuerySource>) -> Self {
		Self {
			table,
			settings: DatatableSettings::default(),
			source,
			selection: Box::new(ServerTrackedSelection),
		}
	}

	/// Build the table from `definition` and check it for duplicate names
	pub fn mount<D>(definition: D, source: impl QuerySource + 'static) -> DatatableResult<Self>
	where
		D: DatatableDefinition,
	{
		let table = definition.setup();
		table.validate()?;
		Ok(Self::new(table, source))
	}

	pub fn with_settings(mut self, settings: DatatableSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn with_selection(mut self, selection: impl SelectionModel + 'static) -> Self {
		self.selection = Box::new(selection);
		self
	}

	pub fn table(&self) -> &Table {
		&self.table
	}

	pub fn settings(&self) -> &DatatableSettings {
		&self.settings
	}

	pub fn selection(&self) -> &dyn SelectionModel {
		self.selection.as_ref()
	}

	/// State of a freshly mounted instance, default filter options applied
	pub fn initial_state(&self) -> InteractionState {
		InteractionState::new(
			self.table
				.pagination()
				.per_page_or(self.settings.per_page),
			self.settings.default_sort_direction,
		)
		.with_filters(self.table.default_filter_values())
	}

	fn params<'a>(&self, state: &'a InteractionState) -> QueryParams<'a> {
		QueryParams {
			search: state.search.as_deref(),
			filters: Some(&state.filters),
			sort_column: state.sort_column.as_deref(),
			sort_direction: state.sort_direction,
		}
	}

	/// The composed query for `state`
	pub fn query(&self, state: &InteractionState) -> Query {
		self.table.build_query(&self.params(state))
	}

	/// Current page of rows
	pub async fn data(&self, state: &InteractionState) -> DatatableResult<Page<Record>> {
		self.table
			.paginate(
				self.source.as_ref(),
				&self.params(state),
				state.page,
				state.per_page,
			)
			.await
	}

	pub fn visible_columns(&self, state: &InteractionState) -> Vec<&Column> {
		self.table
			.columns()
			.visible()
			.into_iter()
			.filter(|column| !state.is_column_hidden(column.name()))
			.collect()
	}

	pub fn active_filters_count(&self, state: &InteractionState) -> usize {
		self.table.active_filters_count(&state.filters)
	}

	/// Sort by `column`; unknown and unsortable columns leave the state as is
	pub fn sort_by(&self, state: InteractionState, column: &str) -> InteractionState {
		match self.table.column(column) {
			Some(c) if c.is_sortable() => {
				state.sort_by(column, self.settings.default_sort_direction)
			}
			_ => {
				tracing::debug!(column = %column, "ignoring sort request");
				state
			}
		}
	}

	pub fn search(&self, state: InteractionState, term: &str) -> InteractionState {
		state.search(term)
	}

	pub fn go_to_page(&self, state: InteractionState, page: u64) -> InteractionState {
		state.go_to_page(page)
	}

	pub fn set_per_page(&self, state: InteractionState, per_page: u64) -> InteractionState {
		state.set_per_page(per_page)
	}

	/// Click on a filter option
	pub fn toggle_filter(&self, state: InteractionState, name: &str, value: &str) -> InteractionState {
		match self.table.filter(name) {
			Some(filter) => state.toggle_filter_value(name, value, filter.is_multiple()),
			None => {
				tracing::debug!(filter = %name, "ignoring toggle of unknown filter");
				state
			}
		}
	}

	/// Replace the value of filter `name`, after the filter normalized it
	pub fn update_filter(
		&self,
		state: InteractionState,
		name: &str,
		value: FilterValue,
	) -> InteractionState {
		let normalized = match self.table.filter(name) {
			Some(filter) => filter.normalize(value),
			None if self.table.column(name).is_some_and(Column::has_filter) => {
				(!value.is_empty()).then_some(value)
			}
			None => {
				tracing::debug!(filter = %name, "ignoring update of unknown filter");
				return state;
			}
		};

		match normalized {
			Some(value) => state.apply_filter(name, value),
			None => state.remove_filter(name),
		}
	}

	pub fn remove_filter(&self, state: InteractionState, name: &str) -> InteractionState {
		state.remove_filter(name)
	}

	pub fn reset_filters(&self, state: InteractionState) -> InteractionState {
		state.reset_filters()
	}

	/// Show or hide a toggable column
	pub fn toggle_column(&self, state: InteractionState, name: &str) -> InteractionState {
		match self.table.column(name) {
			Some(column) if column.is_toggable() => state.toggle_column(name),
			_ => state,
		}
	}

	/// Flip the selection of one row, if it is shown on the current page
	///
	/// Deselecting always succeeds, so rows selected on another page can
	/// still be dropped.
	pub async fn toggle_selected(
		&self,
		state: InteractionState,
		id: RowId,
	) -> DatatableResult<InteractionState> {
		if !state.is_selected(&id)
			&& !self
				.page_ids(&state)
				.await?
				.iter()
				.any(|shown| values_equal(shown, &id))
		{
			tracing::debug!(id = %id, "ignoring selection of row outside the current page");
			return Ok(state);
		}
		Ok(state.toggle_selected(id))
	}

	/// Select every row of the current page
	pub async fn select_page(&self, state: InteractionState) -> DatatableResult<InteractionState> {
		let ids = self.page_ids(&state).await?;
		Ok(state.select(ids))
	}

	async fn page_ids(&self, state: &InteractionState) -> DatatableResult<Vec<RowId>> {
		let key = self.table.primary_key();
		Ok(self
			.data(state)
			.await?
			.items
			.iter()
			.filter_map(|row| row.get(key).cloned())
			.collect())
	}

	pub fn clear_selection(&self, state: InteractionState) -> InteractionState {
		state.clear_selection()
	}

	/// Subset of `ids` matching the current search and filters
	async fn in_scope(&self, state: &InteractionState, ids: &[RowId]) -> DatatableResult<Vec<RowId>> {
		Ok(self
			.source
			.matching_ids(&self.query(state), self.table.primary_key(), ids)
			.await?)
	}

	async fn bulk_targets(
		&self,
		state: &InteractionState,
		ids: Vec<RowId>,
	) -> DatatableResult<Vec<RowId>> {
		if !self.selection.revalidates() {
			return Ok(ids);
		}

		let allowed = self.in_scope(state, &ids).await?;
		if allowed.len() < ids.len() {
			tracing::warn!(
				submitted = ids.len(),
				allowed = allowed.len(),
				"dropping bulk ids outside the current results"
			);
		}
		Ok(allowed)
	}

	/// Bulk action button pressed
	///
	/// Runs the action right away, or opens the confirmation dialog when
	/// the action asks for one. `submitted` is only read by client-side
	/// selection models.
	pub async fn request_bulk_action(
		&self,
		state: InteractionState,
		name: &str,
		submitted: &[RowId],
	) -> DatatableResult<Transition> {
		let Some(action) = self.table.action(name) else {
			tracing::debug!(action = %name, "ignoring unknown bulk action");
			return Ok(Transition::unchanged(state));
		};

		let resolved = self.selection.resolve(&state, submitted);
		let ids = self.bulk_targets(&state, resolved).await?;
		if ids.is_empty() {
			tracing::debug!(action = %name, "bulk action requested without selected rows");
			return Ok(Transition::unchanged(state));
		}

		if let Some(confirmation) = action.confirmation(&ids) {
			let state = state.await_confirmation(PendingAction::bulk(name, ids), confirmation);
			return Ok(Transition::unchanged(state));
		}

		let result = action.execute(ids.clone()).await;
		Ok(self.finish(state, name, ids, result))
	}

	/// Row action clicked
	pub async fn request_row_action(
		&self,
		state: InteractionState,
		name: &str,
		id: RowId,
	) -> DatatableResult<Transition> {
		let Some(action) = self.table.find_row_action(name) else {
			tracing::debug!(action = %name, "ignoring unknown row action");
			return Ok(Transition::unchanged(state));
		};
		let Some(record) = self.find_row(&state, &id).await? else {
			return Ok(Transition::unchanged(state));
		};

		if let Some(confirmation) = action.confirmation(&record) {
			let state = state.await_confirmation(PendingAction::row(name, id), confirmation);
			return Ok(Transition::unchanged(state));
		}

		let result = action.execute(record).await;
		Ok(self.finish(state, name, vec![id], result))
	}

	/// Confirm the pending action and run it
	///
	/// The pending action is cleared before it runs, so a repeated confirm
	/// finds nothing to do.
	pub async fn confirm(&self, state: InteractionState) -> DatatableResult<Transition> {
		let pending = state.pending_action.clone();
		let state = state.clear_pending();
		let Some(PendingAction { name, target }) = pending else {
			return Ok(Transition::unchanged(state));
		};

		match target {
			ActionTarget::Row(id) => {
				let Some(action) = self.table.find_row_action(&name) else {
					return Ok(Transition::unchanged(state));
				};
				let Some(record) = self.find_row(&state, &id).await? else {
					return Ok(Transition::unchanged(state));
				};
				let result = action.execute(record).await;
				Ok(self.finish(state, &name, vec![id], result))
			}
			ActionTarget::Bulk(ids) => {
				let Some(action) = self.table.action(&name) else {
					return Ok(Transition::unchanged(state));
				};
				let ids = self.bulk_targets(&state, ids).await?;
				if ids.is_empty() {
					return Ok(Transition::unchanged(state));
				}
				let result = action.execute(ids.clone()).await;
				Ok(self.finish(state, &name, ids, result))
			}
		}
	}

	/// Dismiss the confirmation dialog without running anything
	pub fn cancel(&self, state: InteractionState) -> InteractionState {
		state.clear_pending()
	}

	/// Export what the user currently sees, ignoring pagination
	pub async fn export(
		&self,
		state: &InteractionState,
		format: &str,
	) -> reinhardt_datatable_export::Result<ExportResult> {
		DatatableExporter::new(&self.settings)
			.export(
				&self.table,
				self.source.as_ref(),
				&self.params(state),
				ExportFormat::from_param(format),
			)
			.await
	}

	async fn find_row(&self, state: &InteractionState, id: &RowId) -> DatatableResult<Option<Record>> {
		let record = self
			.source
			.find(&self.query(state), self.table.primary_key(), id)
			.await?;
		if record.is_none() {
			tracing::debug!(id = %id, "row not found in the current results");
		}
		Ok(record)
	}

	fn finish(
		&self,
		mut state: InteractionState,
		name: &str,
		ids: Vec<RowId>,
		result: ActionResult,
	) -> Transition {
		tracing::info!(action = %name, rows = ids.len(), success = result.success, "action executed");

		let mut events = Vec::new();
		if let Some(notification) = Notification::from_result(&result) {
			events.push(ComponentEvent::Notify(notification));
		}
		if result.success {
			if self.selection.tracks_state() {
				state = state.clear_selection();
			}
			events.push(ComponentEvent::ActionExecuted {
				action: name.to_string(),
				ids,
			});
		}

		Transition {
			state,
			events,
			result: Some(result),
		}
	}
}

impl fmt::Debug for Datatable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Datatable")
			.field("table", &self.table)
			.field("settings", &self.settings)
			.field("selection", &self.selection)
			.finish_non_exhaustive()
	}
}
