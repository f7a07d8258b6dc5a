use super::{FilterKind, FilterValue, TableFilter};
use crate::text::humanize;
use chrono::NaiveDate;
use reinhardt_datatable_query::{Condition, Query, parse_datetime};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

type DateQuery = Arc<dyn Fn(&mut Query, NaiveDate) + Send + Sync>;

/// Presentation settings of the calendar control shared by date and range filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePickerOptions {
	pub min: Option<String>,
	pub max: Option<String>,
	pub with_today: bool,
	pub selectable_header: bool,
	pub clearable: bool,
	pub disabled: bool,
	pub invalid: bool,
	pub locale: Option<String>,
	pub placeholder: Option<String>,
	pub open_to: Option<String>,
	pub force_open_to: bool,
	pub months: Option<u32>,
	pub start_day: Option<String>,
	pub week_numbers: bool,
	pub with_inputs: bool,
	pub with_confirmation: bool,
	pub unavailable: Option<String>,
	pub fixed_weeks: bool,
}

impl DatePickerOptions {
	/// Merge the serialized options into a filter descriptor
	pub(crate) fn extend_json(&self, descriptor: &mut Value) {
		if let (Some(target), Ok(Value::Object(options))) =
			(descriptor.as_object_mut(), serde_json::to_value(self))
		{
			target.extend(options);
		}
	}
}

/// Builder methods for the calendar options, shared by [`DateFilter`] and
/// [`RangeFilter`](super::RangeFilter)
macro_rules! date_picker_builders {
	($ty:ty) => {
		impl $ty {
			/// Column compared against; defaults to the filter name
			pub fn column(mut self, column: impl Into<String>) -> Self {
				self.column = Some(column.into());
				self
			}

			pub fn get_column(&self) -> &str {
				self.column.as_deref().unwrap_or(&self.name)
			}

			pub fn picker(&self) -> &$crate::filter::DatePickerOptions {
				&self.picker
			}

			pub fn min(mut self, min: impl Into<String>) -> Self {
				self.picker.min = Some(min.into());
				self
			}

			pub fn max(mut self, max: impl Into<String>) -> Self {
				self.picker.max = Some(max.into());
				self
			}

			pub fn with_today(mut self, enabled: bool) -> Self {
				self.picker.with_today = enabled;
				self
			}

			pub fn selectable_header(mut self, enabled: bool) -> Self {
				self.picker.selectable_header = enabled;
				self
			}

			pub fn clearable(mut self, enabled: bool) -> Self {
				self.picker.clearable = enabled;
				self
			}

			pub fn disabled(mut self, enabled: bool) -> Self {
				self.picker.disabled = enabled;
				self
			}

			pub fn invalid(mut self, enabled: bool) -> Self {
				self.picker.invalid = enabled;
				self
			}

			pub fn locale(mut self, locale: impl Into<String>) -> Self {
				self.picker.locale = Some(locale.into());
				self
			}

			pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
				self.picker.placeholder = Some(placeholder.into());
				self
			}

			pub fn open_to(mut self, date: impl Into<String>) -> Self {
				self.picker.open_to = Some(date.into());
				self
			}

			pub fn force_open_to(mut self, enabled: bool) -> Self {
				self.picker.force_open_to = enabled;
				self
			}

			pub fn months(mut self, months: u32) -> Self {
				self.picker.months = Some(months);
				self
			}

			/// First day of the week, 0 for Sunday
			pub fn start_day(mut self, day: u8) -> Self {
				self.picker.start_day = Some(day.to_string());
				self
			}

			pub fn week_numbers(mut self, enabled: bool) -> Self {
				self.picker.week_numbers = enabled;
				self
			}

			pub fn with_inputs(mut self, enabled: bool) -> Self {
				self.picker.with_inputs = enabled;
				self
			}

			pub fn with_confirmation(mut self, enabled: bool) -> Self {
				self.picker.with_confirmation = enabled;
				self
			}

			/// Comma separated dates that cannot be picked
			pub fn unavailable(mut self, dates: impl Into<String>) -> Self {
				self.picker.unavailable = Some(dates.into());
				self
			}

			pub fn fixed_weeks(mut self, enabled: bool) -> Self {
				self.picker.fixed_weeks = enabled;
				self
			}
		}
	};
}

pub(crate) use date_picker_builders;

/// Filter matching one calendar day
///
/// Without a custom query the configured column is compared with
/// `DATE(column) = day`.
#[derive(Clone)]
pub struct DateFilter {
	name: String,
	label: Option<String>,
	column: Option<String>,
	picker: DatePickerOptions,
	query: Option<DateQuery>,
}

impl DateFilter {
	pub fn make(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			column: None,
			picker: DatePickerOptions::default(),
			query: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Replace the default day comparison
	pub fn query<F>(mut self, query: F) -> Self
	where
		F: Fn(&mut Query, NaiveDate) + Send + Sync + 'static,
	{
		self.query = Some(Arc::new(query));
		self
	}

	pub fn mode(&self) -> &'static str {
		"single"
	}

	/// Resolve the picked day from any accepted value shape
	pub fn parse_value(value: &FilterValue) -> Option<NaiveDate> {
		let raw = match value {
			FilterValue::Date(date) => return Some(*date),
			FilterValue::Text(text) => Value::String(text.clone()),
			FilterValue::List(items) => items.first()?.clone(),
			_ => return None,
		};
		parse_datetime(&raw).map(|datetime| datetime.date())
	}
}

date_picker_builders!(DateFilter);

impl TableFilter for DateFilter {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> String {
		self.label.clone().unwrap_or_else(|| humanize(&self.name))
	}

	fn kind(&self) -> FilterKind {
		FilterKind::Date
	}

	fn apply(&self, query: &mut Query, value: &FilterValue) {
		if value.is_empty() {
			return;
		}

		let Some(date) = Self::parse_value(value) else {
			tracing::warn!(filter = %self.name, value = ?value, "ignoring malformed date filter value");
			return;
		};

		match &self.query {
			Some(custom) => custom(query, date),
			None => {
				query.and_where(Condition::date_equals(self.get_column(), date));
			}
		}
	}

	fn selected_count(&self, value: &FilterValue) -> usize {
		usize::from(!value.is_empty())
	}

	fn to_json(&self) -> Value {
		let mut descriptor = json!({
			"name": self.name,
			"label": self.label(),
			"type": self.kind(),
			"multiple": false,
			"options": [],
			"mode": self.mode(),
			"column": self.get_column(),
		});
		self.picker.extend_json(&mut descriptor);
		descriptor
	}
}

impl fmt::Debug for DateFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DateFilter")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("column", &self.column)
			.field("picker", &self.picker)
			.field("has_query", &self.query.is_some())
			.finish()
	}
}
