use super::date::date_picker_builders;
use super::{DatePickerOptions, FilterKind, FilterValue, TableFilter};
use crate::text::humanize;
use chrono::{NaiveDate, NaiveDateTime};
use reinhardt_datatable_query::{Condition, Query, parse_datetime};
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;

type RangeQuery = Arc<dyn Fn(&mut Query, NaiveDateTime, NaiveDateTime) + Send + Sync>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filter matching an inclusive span of days
///
/// Accepted value shapes:
///
/// - a typed [`DateRange`](super::DateRange)
/// - `"2024-01-15/2024-01-17"`
/// - `{"start": "2024-01-15", "end": "2024-01-17"}`
/// - a one-element list wrapping either of the two previous shapes
///
/// The start is widened to 00:00:00 and the end to 23:59:59.
#[derive(Clone)]
pub struct RangeFilter {
	name: String,
	label: Option<String>,
	column: Option<String>,
	picker: DatePickerOptions,
	with_presets: bool,
	presets: Option<String>,
	min_range: Option<u32>,
	max_range: Option<u32>,
	query: Option<RangeQuery>,
}

impl RangeFilter {
	pub fn make(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			column: None,
			picker: DatePickerOptions::default(),
			with_presets: false,
			presets: None,
			min_range: None,
			max_range: None,
			query: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_presets(mut self, enabled: bool) -> Self {
		self.with_presets = enabled;
		self
	}

	/// Space separated preset names offered next to the calendar
	pub fn presets(mut self, presets: impl Into<String>) -> Self {
		self.presets = Some(presets.into());
		self
	}

	/// Minimum number of days a range must span
	pub fn min_range(mut self, days: u32) -> Self {
		self.min_range = Some(days);
		self
	}

	/// Maximum number of days a range may span
	pub fn max_range(mut self, days: u32) -> Self {
		self.max_range = Some(days);
		self
	}

	/// Replace the default `BETWEEN` predicate
	pub fn query<F>(mut self, query: F) -> Self
	where
		F: Fn(&mut Query, NaiveDateTime, NaiveDateTime) + Send + Sync + 'static,
	{
		self.query = Some(Arc::new(query));
		self
	}

	pub fn mode(&self) -> &'static str {
		"range"
	}

	/// Resolve the day-boundary timestamps of a range value
	pub fn parse_value(value: &FilterValue) -> Option<(NaiveDateTime, NaiveDateTime)> {
		let (start, end) = match value {
			FilterValue::Range(range) => (range.start(), range.end()),
			FilterValue::Text(text) => parse_slashed(text)?,
			FilterValue::Map(map) => parse_map(map)?,
			FilterValue::List(items) if items.len() == 1 => match &items[0] {
				Value::String(text) => parse_slashed(text)?,
				Value::Object(map) => parse_map(map)?,
				_ => return None,
			},
			_ => return None,
		};

		Some((start.and_hms_opt(0, 0, 0)?, end.and_hms_opt(23, 59, 59)?))
	}
}

date_picker_builders!(RangeFilter);

fn parse_day(value: &Value) -> Option<NaiveDate> {
	parse_datetime(value).map(|datetime| datetime.date())
}

fn parse_slashed(text: &str) -> Option<(NaiveDate, NaiveDate)> {
	let (start, end) = text.split_once('/')?;
	Some((
		parse_day(&Value::String(start.to_string()))?,
		parse_day(&Value::String(end.to_string()))?,
	))
}

fn parse_map(map: &Map<String, Value>) -> Option<(NaiveDate, NaiveDate)> {
	Some((parse_day(map.get("start")?)?, parse_day(map.get("end")?)?))
}

impl TableFilter for RangeFilter {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> String {
		self.label.clone().unwrap_or_else(|| humanize(&self.name))
	}

	fn kind(&self) -> FilterKind {
		FilterKind::Range
	}

	fn apply(&self, query: &mut Query, value: &FilterValue) {
		if value.is_empty() {
			return;
		}

		let Some((start, end)) = Self::parse_value(value) else {
			tracing::warn!(filter = %self.name, value = ?value, "ignoring malformed range filter value");
			return;
		};

		match &self.query {
			Some(custom) => custom(query, start, end),
			None => {
				query.where_between(
					self.get_column(),
					start.format(TIMESTAMP_FORMAT).to_string(),
					end.format(TIMESTAMP_FORMAT).to_string(),
				);
			}
		}
	}

	/// Unwrap a one-element list around a start/end map; drop empty values
	fn normalize(&self, value: FilterValue) -> Option<FilterValue> {
		if value.is_empty() {
			return None;
		}

		match value {
			FilterValue::List(mut items)
				if items.len() == 1
					&& items[0]
						.as_object()
						.is_some_and(|map| map.contains_key("start") && map.contains_key("end")) =>
			{
				Some(FilterValue::from(items.remove(0)))
			}
			FilterValue::Range(range) => Some(FilterValue::start_end(
				range.start().format("%Y-%m-%d").to_string(),
				range.end().format("%Y-%m-%d").to_string(),
			)),
			other => Some(other),
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
			"withPresets": self.with_presets,
			"presets": self.presets,
			"minRange": self.min_range,
			"maxRange": self.max_range,
		});
		self.picker.extend_json(&mut descriptor);
		descriptor
	}
}

impl fmt::Debug for RangeFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RangeFilter")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("column", &self.column)
			.field("picker", &self.picker)
			.field("with_presets", &self.with_presets)
			.field("presets", &self.presets)
			.field("min_range", &self.min_range)
			.field("max_range", &self.max_range)
			.field("has_query", &self.query.is_some())
			.finish()
	}
}
