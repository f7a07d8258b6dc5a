//! Record values and the comparisons used to evaluate query plans in memory.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::cmp::Ordering;

/// A single row, keyed by field name
pub type Record = serde_json::Map<String, Value>;

/// Primary key value of a row
pub type RowId = Value;

const DATETIME_FORMATS: &[&str] = &[
	"%Y-%m-%d %H:%M:%S",
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%dT%H:%M:%S",
	"%Y-%m-%dT%H:%M:%S%.f",
];

/// Resolve a field on a record, following one level of dotted relation path.
///
/// `author.name` reads the `name` key of the object stored under `author`.
/// When the relation holds a list, the first element carrying the field wins.
pub fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
	if let Some(value) = record.get(path) {
		return Some(value);
	}

	let (relation, field) = path.split_once('.')?;
	match record.get(relation)? {
		Value::Object(related) => related.get(field),
		Value::Array(items) => items
			.iter()
			.find_map(|item| item.as_object().and_then(|o| o.get(field))),
		_ => None,
	}
}

/// Plain-text rendering of a value, as shown in a table cell or export row
pub fn display_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		other => other.to_string(),
	}
}

/// Parse a date or timestamp carried in a JSON value.
///
/// Date-only strings resolve to midnight.
pub fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
	let text = value.as_str()?.trim();

	for format in DATETIME_FORMATS {
		if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
			return Some(parsed);
		}
	}

	if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(text) {
		return Some(parsed.naive_utc());
	}

	NaiveDate::parse_from_str(text, "%Y-%m-%d")
		.ok()
		.and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn as_f64(value: &Value) -> Option<f64> {
	let number: f64 = match value {
		Value::Number(n) => n.as_f64()?,
		Value::String(s) => s.trim().parse().ok()?,
		_ => return None,
	};
	number.is_finite().then_some(number)
}

/// Sort key of a value; classes rank in declaration order
#[derive(Debug)]
enum SortKey {
	Null,
	Bool(bool),
	Number(f64),
	Timestamp(NaiveDateTime),
	Text(String),
}

impl SortKey {
	fn of(value: &Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(b) => Self::Bool(*b),
			Value::Number(_) => as_f64(value)
				.map_or_else(|| Self::Text(value.to_string()), Self::Number),
			Value::String(_) => parse_datetime(value)
				.map(Self::Timestamp)
				.or_else(|| as_f64(value).map(Self::Number))
				.unwrap_or_else(|| Self::Text(display_value(value))),
			other => Self::Text(other.to_string()),
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Self::Null => 0,
			Self::Bool(_) => 1,
			Self::Number(_) => 2,
			Self::Timestamp(_) => 3,
			Self::Text(_) => 4,
		}
	}
}

/// Total order over JSON values used for sorting and range comparison.
///
/// Each value is classified once: null, boolean, number, timestamp or text.
/// Strings that parse as a timestamp or a number join that class. Classes
/// rank in that order and values compare natively within their class, so a
/// column mixing `"9"`, `"10"` and `"1x"` sorts as `9, 10, 1x`.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
	let (left, right) = (SortKey::of(left), SortKey::of(right));
	match (&left, &right) {
		(SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
		(SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
		(SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
		(SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
		_ => left.rank().cmp(&right.rank()),
	}
}

/// Loose equality: equal JSON, or equal under [`compare_values`]
pub fn values_equal(left: &Value, right: &Value) -> bool {
	left == right || compare_values(left, right) == Ordering::Equal
}
