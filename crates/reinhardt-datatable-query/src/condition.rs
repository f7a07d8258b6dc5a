//! Predicate trees attached to a [`Query`](crate::Query).
//!
//! Conditions are storage-agnostic: [`Condition::matches`] evaluates them
//! against an in-memory [`Record`], and the `sql` module compiles them to
//! `sea_query` expressions.

use crate::value::{Record, compare_values, display_value, lookup, parse_datetime, values_equal};
use chrono::NaiveDate;
use serde_json::Value;
use std::cmp::Ordering;

/// Comparison operator for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	Eq,
	Ne,
	Gt,
	Gte,
	Lt,
	Lte,
	/// Case-insensitive substring match
	Contains,
	/// Case-insensitive prefix match
	StartsWith,
	/// Case-insensitive suffix match
	EndsWith,
}

/// A predicate over one record
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
	/// `field <op> value`
	Compare {
		field: String,
		op: Operator,
		value: Value,
	},
	/// `field IN (values)`
	In { field: String, values: Vec<Value> },
	/// Closed interval `low <= field <= high`
	Between {
		field: String,
		low: Value,
		high: Value,
	},
	/// The calendar day of a date/timestamp field equals `date`
	DateEquals { field: String, date: NaiveDate },
	IsNull(String),
	NotNull(String),
	/// The related entity (or any of a related list) satisfies the inner condition
	Relation {
		relation: String,
		condition: Box<Condition>,
	},
	/// Conjunction; empty is always true
	All(Vec<Condition>),
	/// Disjunction; empty is always false
	Any(Vec<Condition>),
	Not(Box<Condition>),
}

impl Condition {
	pub fn compare(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
		Self::Compare {
			field: field.into(),
			op,
			value: value.into(),
		}
	}

	pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::compare(field, Operator::Eq, value)
	}

	pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::compare(field, Operator::Ne, value)
	}

	pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::compare(field, Operator::Gt, value)
	}

	pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::compare(field, Operator::Gte, value)
	}

	pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::compare(field, Operator::Lt, value)
	}

	pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::compare(field, Operator::Lte, value)
	}

	/// Case-insensitive `%term%` match
	pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
		Self::compare(field, Operator::Contains, Value::String(term.into()))
	}

	pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		Self::In {
			field: field.into(),
			values: values.into_iter().map(Into::into).collect(),
		}
	}

	pub fn between(
		field: impl Into<String>,
		low: impl Into<Value>,
		high: impl Into<Value>,
	) -> Self {
		Self::Between {
			field: field.into(),
			low: low.into(),
			high: high.into(),
		}
	}

	pub fn date_equals(field: impl Into<String>, date: NaiveDate) -> Self {
		Self::DateEquals {
			field: field.into(),
			date,
		}
	}

	pub fn is_null(field: impl Into<String>) -> Self {
		Self::IsNull(field.into())
	}

	pub fn not_null(field: impl Into<String>) -> Self {
		Self::NotNull(field.into())
	}

	/// Scope `condition` to the entity (or entities) under `relation`
	pub fn relation(relation: impl Into<String>, condition: Condition) -> Self {
		Self::Relation {
			relation: relation.into(),
			condition: Box::new(condition),
		}
	}

	#[allow(clippy::should_implement_trait)]
	pub fn not(condition: Condition) -> Self {
		Self::Not(Box::new(condition))
	}

	/// Evaluate the condition against one record
	pub fn matches(&self, record: &Record) -> bool {
		match self {
			Self::Compare { field, op, value } => match lookup(record, field) {
				Some(actual) => compare(actual, *op, value),
				None => *op == Operator::Ne && !value.is_null(),
			},
			Self::In { field, values } => lookup(record, field)
				.is_some_and(|actual| values.iter().any(|v| values_equal(actual, v))),
			Self::Between { field, low, high } => lookup(record, field).is_some_and(|actual| {
				!actual.is_null()
					&& compare_values(actual, low) != Ordering::Less
					&& compare_values(actual, high) != Ordering::Greater
			}),
			Self::DateEquals { field, date } => lookup(record, field)
				.and_then(parse_datetime)
				.is_some_and(|actual| actual.date() == *date),
			Self::IsNull(field) => lookup(record, field).is_none_or(Value::is_null),
			Self::NotNull(field) => lookup(record, field).is_some_and(|v| !v.is_null()),
			Self::Relation {
				relation,
				condition,
			} => match record.get(relation) {
				Some(Value::Object(related)) => condition.matches(related),
				Some(Value::Array(items)) => items
					.iter()
					.filter_map(Value::as_object)
					.any(|related| condition.matches(related)),
				_ => false,
			},
			Self::All(conditions) => conditions.iter().all(|c| c.matches(record)),
			Self::Any(conditions) => conditions.iter().any(|c| c.matches(record)),
			Self::Not(inner) => !inner.matches(record),
		}
	}
}

fn compare(actual: &Value, op: Operator, expected: &Value) -> bool {
	match op {
		Operator::Eq => values_equal(actual, expected),
		Operator::Ne => !values_equal(actual, expected),
		Operator::Gt => !actual.is_null() && compare_values(actual, expected) == Ordering::Greater,
		Operator::Gte => !actual.is_null() && compare_values(actual, expected) != Ordering::Less,
		Operator::Lt => !actual.is_null() && compare_values(actual, expected) == Ordering::Less,
		Operator::Lte => !actual.is_null() && compare_values(actual, expected) != Ordering::Greater,
		Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
			if actual.is_null() {
				return false;
			}
			let haystack = display_value(actual).to_lowercase();
			let needle = display_value(expected).to_lowercase();
			match op {
				Operator::Contains => haystack.contains(&needle),
				Operator::StartsWith => haystack.starts_with(&needle),
				_ => haystack.ends_with(&needle),
			}
		}
	}
}
