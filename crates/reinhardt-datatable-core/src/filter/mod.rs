//! Table filters
//!
//! Three filter flavours share the [`TableFilter`] interface:
//!
//! - [`Filter`]: dropdown of [`FilterOption`]s, single or multi-select
//! - [`DateFilter`]: one calendar day
//! - [`RangeFilter`]: an inclusive span of days
//!
//! Filters never fail. Values that cannot be interpreted leave the query
//! untouched.

mod date;
mod dropdown;
mod option;
mod range;
mod value;

pub use date::{DateFilter, DatePickerOptions};
pub use dropdown::Filter;
pub use option::{FilterOption, OptionQuery};
pub use range::RangeFilter;
pub use value::{DateRange, FilterValue, FilterValues};

use reinhardt_datatable_query::Query;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Presentation type of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
	Dropdown,
	Date,
	Range,
}

impl FilterKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Dropdown => "dropdown",
			Self::Date => "date",
			Self::Range => "range",
		}
	}
}

impl fmt::Display for FilterKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Common interface of every filter attached to a table
pub trait TableFilter: Send + Sync + fmt::Debug {
	/// Unique key of the filter within its table
	fn name(&self) -> &str;

	/// Header shown above the filter control
	fn label(&self) -> String;

	fn kind(&self) -> FilterKind;

	/// Whether several options can be selected at once
	fn is_multiple(&self) -> bool {
		false
	}

	fn options(&self) -> &[FilterOption] {
		&[]
	}

	fn option(&self, name: &str) -> Option<&FilterOption> {
		self.options().iter().find(|option| option.name() == name)
	}

	/// Narrow `query` by `value`; empty or unusable values are a no-op
	fn apply(&self, query: &mut Query, value: &FilterValue);

	/// Canonical form of a freshly submitted value, `None` to drop the filter
	fn normalize(&self, value: FilterValue) -> Option<FilterValue> {
		(!value.is_empty()).then_some(value)
	}

	/// Value pre-selected on a fresh component: the options flagged as default
	fn default_value(&self) -> Option<FilterValue> {
		let mut defaults = self
			.options()
			.iter()
			.filter(|option| option.is_default())
			.map(|option| option.name().to_string());

		if self.is_multiple() {
			let all: Vec<String> = defaults.collect();
			(!all.is_empty()).then(|| FilterValue::list(all))
		} else {
			defaults.next().map(|name| FilterValue::list([name]))
		}
	}

	/// Number of selected entries, for badge display
	fn selected_count(&self, value: &FilterValue) -> usize {
		value.values().len()
	}

	fn to_json(&self) -> Value;
}
