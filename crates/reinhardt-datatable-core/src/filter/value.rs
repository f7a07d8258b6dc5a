//! Filter values as submitted by the client.

use chrono::NaiveDate;
use reinhardt_datatable_query::display_value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Active filter values keyed by filter (or column) name
pub type FilterValues = BTreeMap<String, FilterValue>;

/// An inclusive pair of dates picked in a range control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
	start: NaiveDate,
	end: NaiveDate,
}

impl DateRange {
	pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
		Self { start, end }
	}

	pub fn start(&self) -> NaiveDate {
		self.start
	}

	pub fn end(&self) -> NaiveDate {
		self.end
	}
}

/// The value of one filter
///
/// Client payloads arrive as JSON and map onto `List`, `Text`, `Map` or
/// `Empty`. `Date` and `Range` carry already-typed values handed over by
/// server-side code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FilterValue {
	Empty,
	List(Vec<Value>),
	Text(String),
	Map(Map<String, Value>),
	Date(NaiveDate),
	Range(DateRange),
}

impl FilterValue {
	/// A list of option names
	pub fn list<I, S>(values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::List(
			values
				.into_iter()
				.map(|v| Value::String(v.into()))
				.collect(),
		)
	}

	/// `{"start": .., "end": ..}`
	pub fn start_end(start: impl Into<String>, end: impl Into<String>) -> Self {
		let mut map = Map::new();
		map.insert("start".to_string(), Value::String(start.into()));
		map.insert("end".to_string(), Value::String(end.into()));
		Self::Map(map)
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Empty => true,
			Self::List(items) => items.iter().all(|item| match item {
				Value::Null => true,
				Value::String(s) => s.trim().is_empty(),
				_ => false,
			}),
			Self::Text(text) => text.trim().is_empty(),
			Self::Map(map) => map.is_empty(),
			Self::Date(_) | Self::Range(_) => false,
		}
	}

	/// The selected values as strings, in submission order
	pub fn values(&self) -> Vec<String> {
		match self {
			Self::Empty | Self::Range(_) => Vec::new(),
			Self::List(items) => items
				.iter()
				.filter(|item| !item.is_null())
				.map(display_value)
				.filter(|s| !s.is_empty())
				.collect(),
			Self::Text(text) if text.is_empty() => Vec::new(),
			Self::Text(text) => vec![text.clone()],
			Self::Map(map) => map.values().map(display_value).collect(),
			Self::Date(date) => vec![date.format("%Y-%m-%d").to_string()],
		}
	}

	pub fn contains(&self, value: &str) -> bool {
		self.values().iter().any(|v| v == value)
	}
}

impl From<Value> for FilterValue {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Self::Empty,
			Value::Array(items) => Self::List(items),
			Value::String(text) => Self::Text(text),
			Value::Object(map) => Self::Map(map),
			other => Self::Text(other.to_string()),
		}
	}
}

impl From<FilterValue> for Value {
	fn from(value: FilterValue) -> Self {
		match value {
			FilterValue::Empty => Value::Null,
			FilterValue::List(items) => Value::Array(items),
			FilterValue::Text(text) => Value::String(text),
			FilterValue::Map(map) => Value::Object(map),
			FilterValue::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
			FilterValue::Range(range) => {
				let mut map = Map::new();
				map.insert(
					"start".to_string(),
					Value::String(range.start().format("%Y-%m-%d").to_string()),
				);
				map.insert(
					"end".to_string(),
					Value::String(range.end().format("%Y-%m-%d").to_string()),
				);
				Value::Object(map)
			}
		}
	}
}

impl From<&str> for FilterValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<NaiveDate> for FilterValue {
	fn from(value: NaiveDate) -> Self {
		Self::Date(value)
	}
}

impl From<DateRange> for FilterValue {
	fn from(value: DateRange) -> Self {
		Self::Range(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), true)]
	#[case(json!([]), true)]
	#[case(json!([""]), true)]
	#[case(json!(""), true)]
	#[case(json!({}), true)]
	#[case(json!(["active"]), false)]
	#[case(json!("2024-01-15"), false)]
	#[case(json!({"start": "2024-01-15", "end": "2024-01-17"}), false)]
	fn test_is_empty(#[case] raw: Value, #[case] expected: bool) {
		assert_eq!(FilterValue::from(raw).is_empty(), expected);
	}

	#[test]
	fn test_serde_is_transparent_json() {
		let value: FilterValue = serde_json::from_value(json!(["a", "b"])).unwrap();
		assert_eq!(value, FilterValue::list(["a", "b"]));
		assert_eq!(value.values(), vec!["a", "b"]);

		let range = FilterValue::Range(DateRange::new(
			NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
			NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
		));
		assert_eq!(
			serde_json::to_value(&range).unwrap(),
			json!({"start": "2024-01-15", "end": "2024-01-17"})
		);
	}
}
