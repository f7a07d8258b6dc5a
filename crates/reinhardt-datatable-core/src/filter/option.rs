//! Selectable options of a dropdown filter.

use crate::text::humanize;
use reinhardt_datatable_query::Query;
use serde_json::{Value, json};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Predicate contributed by one selected option; receives the selected value
pub type OptionQuery = Arc<dyn Fn(&mut Query, &str) + Send + Sync>;

#[derive(Clone)]
enum OptionCount {
	None,
	Fixed(u64),
	Lazy {
		compute: Arc<dyn Fn() -> u64 + Send + Sync>,
		cached: Arc<OnceLock<u64>>,
	},
}

/// One entry of a [`Filter`](super::Filter)
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_core::{Condition, FilterOption};
///
/// let option = FilterOption::make("active")
///     .with_icon("check")
///     .with_count(12)
///     .query(|query, value| {
///         query.and_where(Condition::eq("status", value));
///     });
///
/// assert_eq!(option.label(), "Active");
/// assert_eq!(option.count(), Some(12));
/// ```
#[derive(Clone)]
pub struct FilterOption {
	name: String,
	label: Option<String>,
	icon: Option<String>,
	count: OptionCount,
	query: Option<OptionQuery>,
	is_default: bool,
}

impl FilterOption {
	pub fn make(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			icon: None,
			count: OptionCount::None,
			query: None,
			is_default: false,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Explicit label, or the humanized name
	pub fn label(&self) -> String {
		self.label.clone().unwrap_or_else(|| humanize(&self.name))
	}

	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	pub fn icon(&self) -> Option<&str> {
		self.icon.as_deref()
	}

	/// Fixed badge count
	pub fn with_count(mut self, count: u64) -> Self {
		self.count = OptionCount::Fixed(count);
		self
	}

	/// Badge count computed on first use and remembered afterwards
	pub fn count_using<F>(mut self, compute: F) -> Self
	where
		F: Fn() -> u64 + Send + Sync + 'static,
	{
		self.count = OptionCount::Lazy {
			compute: Arc::new(compute),
			cached: Arc::new(OnceLock::new()),
		};
		self
	}

	pub fn count(&self) -> Option<u64> {
		match &self.count {
			OptionCount::None => None,
			OptionCount::Fixed(count) => Some(*count),
			OptionCount::Lazy { compute, cached } => Some(*cached.get_or_init(|| compute())),
		}
	}

	pub fn query<F>(mut self, query: F) -> Self
	where
		F: Fn(&mut Query, &str) + Send + Sync + 'static,
	{
		self.query = Some(Arc::new(query));
		self
	}

	pub fn has_query(&self) -> bool {
		self.query.is_some()
	}

	/// Pre-select this option when a table is first mounted
	pub fn as_default(mut self) -> Self {
		self.is_default = true;
		self
	}

	pub fn is_default(&self) -> bool {
		self.is_default
	}

	/// Add this option's predicate to `query` as an OR branch.
	///
	/// Options without a predicate contribute nothing.
	pub fn apply(&self, query: &mut Query, value: &str) {
		if let Some(apply) = &self.query {
			query.or_where_group(|group| apply(group, value));
		}
	}

	pub fn to_json(&self) -> Value {
		json!({
			"name": self.name,
			"label": self.label(),
			"icon": self.icon,
			"count": self.count(),
			"isDefault": self.is_default,
		})
	}
}

impl fmt::Debug for FilterOption {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FilterOption")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("icon", &self.icon)
			.field("has_query", &self.query.is_some())
			.field("is_default", &self.is_default)
			.finish_non_exhaustive()
	}
}
