//! Per-instance interaction state and its pure transitions
//!
//! Every transition consumes the state and returns the next one; nothing
//! here touches the table definition or the data source.

use reinhardt_datatable_core::{Confirmation, FilterValue, FilterValues};
use reinhardt_datatable_query::{RowId, SortDirection, values_equal};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// What a pending action runs against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "lowercase")]
pub enum ActionTarget {
	/// One row, by primary key
	Row(RowId),
	/// Selected rows, by primary key
	Bulk(Vec<RowId>),
}

/// An action waiting for the user to confirm it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
	pub name: String,
	#[serde(flatten)]
	pub target: ActionTarget,
}

impl PendingAction {
	pub fn row(name: impl Into<String>, id: RowId) -> Self {
		Self {
			name: name.into(),
			target: ActionTarget::Row(id),
		}
	}

	pub fn bulk(name: impl Into<String>, ids: Vec<RowId>) -> Self {
		Self {
			name: name.into(),
			target: ActionTarget::Bulk(ids),
		}
	}
}

/// Everything the user changed on one table instance
///
/// `pending_action` is set exactly when `show_confirm_modal` is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionState {
	pub search: Option<String>,
	pub filters: FilterValues,
	pub sort_column: Option<String>,
	pub sort_direction: SortDirection,
	pub page: u64,
	pub per_page: u64,
	pub hidden_columns: BTreeSet<String>,
	pub selected: Vec<RowId>,
	pub pending_action: Option<PendingAction>,
	pub show_confirm_modal: bool,
	pub confirm_data: Option<Confirmation>,
}

impl Default for InteractionState {
	fn default() -> Self {
		Self {
			search: None,
			filters: FilterValues::new(),
			sort_column: None,
			sort_direction: SortDirection::Asc,
			page: 1,
			per_page: 10,
			hidden_columns: BTreeSet::new(),
			selected: Vec::new(),
			pending_action: None,
			show_confirm_modal: false,
			confirm_data: None,
		}
	}
}

impl InteractionState {
	pub fn new(per_page: u64, sort_direction: SortDirection) -> Self {
		Self {
			per_page: per_page.max(1),
			sort_direction,
			..Self::default()
		}
	}

	pub fn with_filters(mut self, filters: FilterValues) -> Self {
		self.filters = filters;
		self
	}

	fn first_page(mut self) -> Self {
		self.page = 1;
		self
	}

	/// Set the search term; blank terms clear it
	pub fn search(mut self, term: impl Into<String>) -> Self {
		let term = term.into();
		self.search = (!term.trim().is_empty()).then_some(term);
		self.first_page()
	}

	pub fn go_to_page(mut self, page: u64) -> Self {
		self.page = page.max(1);
		self
	}

	pub fn set_per_page(mut self, per_page: u64) -> Self {
		self.per_page = per_page.max(1);
		self.first_page()
	}

	/// Flip the direction of the current sort column, or sort a new column
	/// in `default_direction`
	pub fn sort_by(mut self, column: impl Into<String>, default_direction: SortDirection) -> Self {
		let column = column.into();
		if self.sort_column.as_deref() == Some(column.as_str()) {
			self.sort_direction = self.sort_direction.toggled();
		} else {
			self.sort_column = Some(column);
			self.sort_direction = default_direction;
		}
		self.first_page()
	}

	pub fn apply_filter(mut self, name: impl Into<String>, value: FilterValue) -> Self {
		self.filters.insert(name.into(), value);
		self.first_page()
	}

	pub fn remove_filter(mut self, name: &str) -> Self {
		self.filters.remove(name);
		self.first_page()
	}

	pub fn reset_filters(mut self) -> Self {
		self.filters.clear();
		self.first_page()
	}

	/// Select `value` in filter `name`
	///
	/// Single-select filters replace their value, multi-select filters
	/// add or remove it. A filter left without values is removed.
	pub fn toggle_filter_value(mut self, name: &str, value: &str, multiple: bool) -> Self {
		let next = if multiple {
			let mut values = self
				.filters
				.get(name)
				.map(FilterValue::values)
				.unwrap_or_default();
			match values.iter().position(|v| v == value) {
				Some(index) => {
					values.remove(index);
				}
				None => values.push(value.to_string()),
			}
			values
		} else {
			vec![value.to_string()]
		};

		if next.is_empty() {
			self.filters.remove(name);
		} else {
			self.filters.insert(name.to_string(), FilterValue::list(next));
		}
		self.first_page()
	}

	/// Hide a visible column or show a hidden one
	pub fn toggle_column(mut self, name: &str) -> Self {
		if !self.hidden_columns.remove(name) {
			self.hidden_columns.insert(name.to_string());
		}
		self
	}

	pub fn is_column_hidden(&self, name: &str) -> bool {
		self.hidden_columns.contains(name)
	}

	pub fn is_selected(&self, id: &Value) -> bool {
		self.selected.iter().any(|s| values_equal(s, id))
	}

	pub fn toggle_selected(mut self, id: RowId) -> Self {
		match self.selected.iter().position(|s| values_equal(s, &id)) {
			Some(index) => {
				self.selected.remove(index);
			}
			None => self.selected.push(id),
		}
		self
	}

	/// Add `ids` to the selection, skipping ones already selected
	pub fn select(mut self, ids: impl IntoIterator<Item = RowId>) -> Self {
		for id in ids {
			if !self.is_selected(&id) {
				self.selected.push(id);
			}
		}
		self
	}

	pub fn clear_selection(mut self) -> Self {
		self.selected.clear();
		self
	}

	/// Open the confirmation dialog for `action`
	pub fn await_confirmation(mut self, action: PendingAction, confirmation: Confirmation) -> Self {
		self.pending_action = Some(action);
		self.show_confirm_modal = true;
		self.confirm_data = Some(confirmation);
		self
	}

	/// Close the dialog and forget the pending action
	pub fn clear_pending(mut self) -> Self {
		self.pending_action = None;
		self.show_confirm_modal = false;
		self.confirm_data = None;
		self
	}

	pub fn is_awaiting_confirmation(&self) -> bool {
		self.pending_action.is_some()
	}
}
