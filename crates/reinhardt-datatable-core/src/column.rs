//! Table column definitions

use crate::action::RowActionEntry;
use crate::filter::FilterValue;
use crate::text::{escape_html, humanize};
use reinhardt_datatable_query::{Query, Record, display_value, lookup};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// Name of the row selection column
pub const CHECKBOX_COLUMN: &str = "__checkbox";

/// Default name of the row action column
pub const ACTIONS_COLUMN: &str = "__actions";

/// Prefix marking columns that hold no data
pub const SPECIAL_PREFIX: &str = "__";

type CellFn<T> = Arc<dyn Fn(&Record) -> T + Send + Sync>;
type ColumnFilterFn = Arc<dyn Fn(&mut Query, &FilterValue) + Send + Sync>;

/// Role of a column in the rendered table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
	#[serde(rename = "column")]
	Data,
	Checkbox,
	Action,
}

/// One column of a table
///
/// Data columns read the field named after them; a dotted name such as
/// `author.name` reads through one relation.
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_core::Column;
/// use serde_json::json;
///
/// let column = Column::make("first_name").with_width("200px");
/// let row = json!({"first_name": "<Ada>"}).as_object().cloned().unwrap();
///
/// assert_eq!(column.label(), "First name");
/// assert_eq!(column.render(&row), "&lt;Ada&gt;");
/// ```
#[derive(Clone)]
pub struct Column {
	name: String,
	kind: ColumnKind,
	label: Option<String>,
	width: Option<String>,
	sortable: bool,
	toggable: bool,
	hidden: bool,
	sort_column: Option<String>,
	html: Option<CellFn<String>>,
	icon: Option<CellFn<Option<String>>>,
	filter: Option<ColumnFilterFn>,
	export: Option<CellFn<Value>>,
	action: Option<RowActionEntry>,
}

impl Column {
	pub fn make(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: ColumnKind::Data,
			label: None,
			width: None,
			sortable: true,
			toggable: true,
			hidden: false,
			sort_column: None,
			html: None,
			icon: None,
			filter: None,
			export: None,
			action: None,
		}
	}

	/// Row selection column: unsortable, untoggable, no label
	pub fn checkbox() -> Self {
		let mut column = Self::make(CHECKBOX_COLUMN)
			.sortable(false)
			.toggable(false)
			.with_label("");
		column.kind = ColumnKind::Checkbox;
		column
	}

	/// Row action column named [`ACTIONS_COLUMN`]
	pub fn actions() -> Self {
		Self::actions_named(ACTIONS_COLUMN)
	}

	pub fn actions_named(name: impl Into<String>) -> Self {
		let mut column = Self::make(name)
			.sortable(false)
			.toggable(false)
			.with_label("");
		column.kind = ColumnKind::Action;
		column
	}

	/// Attach the row action (or group) shown in this action column
	pub fn with_action(mut self, action: impl Into<RowActionEntry>) -> Self {
		self.action = Some(action.into());
		self
	}

	pub fn action(&self) -> Option<&RowActionEntry> {
		self.action.as_ref()
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> ColumnKind {
		self.kind
	}

	/// Checkbox and action columns, plus any column named with the `__` prefix
	pub fn is_special(&self) -> bool {
		self.kind != ColumnKind::Data || self.name.starts_with(SPECIAL_PREFIX)
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn label(&self) -> String {
		self.label.clone().unwrap_or_else(|| humanize(&self.name))
	}

	/// CSS width, e.g. `120px` or `20%`
	pub fn with_width(mut self, width: impl Into<String>) -> Self {
		self.width = Some(width.into());
		self
	}

	pub fn width(&self) -> Option<&str> {
		self.width.as_deref()
	}

	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = sortable;
		self
	}

	pub fn is_sortable(&self) -> bool {
		self.sortable
	}

	/// Sort on another field than the column's own
	pub fn sort_by(mut self, column: impl Into<String>) -> Self {
		self.sort_column = Some(column.into());
		self
	}

	pub fn sort_column(&self) -> &str {
		self.sort_column.as_deref().unwrap_or(&self.name)
	}

	/// Whether the user may hide and show this column
	pub fn toggable(mut self, toggable: bool) -> Self {
		self.toggable = toggable;
		self
	}

	pub fn is_toggable(&self) -> bool {
		self.toggable
	}

	pub fn hidden(mut self, hidden: bool) -> Self {
		self.hidden = hidden;
		self
	}

	pub fn is_hidden(&self) -> bool {
		self.hidden
	}

	/// Render cells with `html` instead of the escaped field value
	pub fn html<F>(mut self, html: F) -> Self
	where
		F: Fn(&Record) -> String + Send + Sync + 'static,
	{
		self.html = Some(Arc::new(html));
		self
	}

	pub fn icon<F>(mut self, icon: F) -> Self
	where
		F: Fn(&Record) -> Option<String> + Send + Sync + 'static,
	{
		self.icon = Some(Arc::new(icon));
		self
	}

	pub fn has_icon(&self) -> bool {
		self.icon.is_some()
	}

	pub fn icon_for(&self, record: &Record) -> Option<String> {
		self.icon.as_ref().and_then(|icon| icon(record))
	}

	/// Predicate applied when a filter value is submitted under this column's name
	pub fn filter<F>(mut self, filter: F) -> Self
	where
		F: Fn(&mut Query, &FilterValue) + Send + Sync + 'static,
	{
		self.filter = Some(Arc::new(filter));
		self
	}

	pub fn has_filter(&self) -> bool {
		self.filter.is_some()
	}

	pub fn apply_filter(&self, query: &mut Query, value: &FilterValue) {
		if let Some(filter) = &self.filter {
			filter(query, value);
		}
	}

	/// Value written to exports instead of the raw field
	pub fn export_as<F>(mut self, export: F) -> Self
	where
		F: Fn(&Record) -> Value + Send + Sync + 'static,
	{
		self.export = Some(Arc::new(export));
		self
	}

	/// Raw field value; `Null` when missing
	pub fn value(&self, record: &Record) -> Value {
		lookup(record, &self.name).cloned().unwrap_or(Value::Null)
	}

	/// Cell HTML
	pub fn render(&self, record: &Record) -> String {
		match &self.html {
			Some(html) => html(record),
			None => escape_html(&display_value(&self.value(record))),
		}
	}

	pub fn export_value(&self, record: &Record) -> Value {
		match &self.export {
			Some(export) => export(record),
			None => self.value(record),
		}
	}

	pub fn to_json(&self) -> Value {
		let mut descriptor = json!({
			"name": self.name,
			"label": self.label(),
			"width": self.width,
			"sortable": self.sortable,
			"toggable": self.toggable,
			"hidden": self.hidden,
			"hasIcon": self.has_icon(),
			"hasFilter": self.has_filter(),
			"type": self.kind,
		});
		if self.kind == ColumnKind::Action
			&& let Some(map) = descriptor.as_object_mut()
		{
			map.insert(
				"action".to_string(),
				self.action
					.as_ref()
					.map(RowActionEntry::to_json)
					.unwrap_or(Value::Null),
			);
		}
		descriptor
	}
}

impl fmt::Debug for Column {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Column")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("label", &self.label)
			.field("width", &self.width)
			.field("sortable", &self.sortable)
			.field("toggable", &self.toggable)
			.field("hidden", &self.hidden)
			.field("sort_column", &self.sort_column)
			.field("action", &self.action)
			.finish_non_exhaustive()
	}
}
