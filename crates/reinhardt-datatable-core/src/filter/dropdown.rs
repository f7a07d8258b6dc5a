use super::{FilterKind, FilterOption, FilterValue, TableFilter};
use crate::text::humanize;
use reinhardt_datatable_query::Query;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

type GlobalQuery = Arc<dyn Fn(&mut Query, &[String]) + Send + Sync>;

/// Dropdown filter over a fixed list of options
///
/// Selected options are OR-ed together inside one group. A filter-level
/// query, if set, is AND-ed next to that group and receives every
/// selected value.
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_core::{Condition, Filter, FilterOption, TableFilter};
///
/// let status = Filter::make("status").multiple(true).with_options(vec![
///     FilterOption::make("active").query(|query, value| {
///         query.and_where(Condition::eq("status", value));
///     }),
///     FilterOption::make("inactive").query(|query, value| {
///         query.and_where(Condition::eq("status", value));
///     }),
/// ]);
///
/// assert_eq!(status.label(), "Status");
/// assert!(status.option("inactive").is_some());
/// ```
#[derive(Clone)]
pub struct Filter {
	name: String,
	label: Option<String>,
	multiple: bool,
	options: Vec<FilterOption>,
	query: Option<GlobalQuery>,
}

impl Filter {
	pub fn make(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			multiple: false,
			options: Vec::new(),
			query: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn multiple(mut self, multiple: bool) -> Self {
		self.multiple = multiple;
		self
	}

	pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
		self.options = options;
		self
	}

	/// Filter-level predicate receiving all selected values
	pub fn query<F>(mut self, query: F) -> Self
	where
		F: Fn(&mut Query, &[String]) + Send + Sync + 'static,
	{
		self.query = Some(Arc::new(query));
		self
	}
}

impl TableFilter for Filter {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> String {
		self.label.clone().unwrap_or_else(|| humanize(&self.name))
	}

	fn kind(&self) -> FilterKind {
		FilterKind::Dropdown
	}

	fn is_multiple(&self) -> bool {
		self.multiple
	}

	fn options(&self) -> &[FilterOption] {
		&self.options
	}

	fn apply(&self, query: &mut Query, value: &FilterValue) {
		let values = value.values();
		if values.is_empty() {
			return;
		}

		query.and_where_group(|group| {
			for selected in &values {
				match self.option(selected) {
					Some(option) => option.apply(group, selected),
					None => tracing::debug!(
						filter = %self.name,
						option = %selected,
						"ignoring unknown filter option"
					),
				}
			}
		});

		if let Some(global) = &self.query {
			global(query, &values);
		}
	}

	fn to_json(&self) -> Value {
		json!({
			"name": self.name,
			"label": self.label(),
			"type": self.kind(),
			"multiple": self.multiple,
			"options": self.options.iter().map(FilterOption::to_json).collect::<Vec<_>>(),
		})
	}
}

impl fmt::Debug for Filter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Filter")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("multiple", &self.multiple)
			.field("options", &self.options)
			.field("has_query", &self.query.is_some())
			.finish()
	}
}
