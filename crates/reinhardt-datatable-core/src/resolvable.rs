//! Values that are either fixed or computed from a row.

use reinhardt_datatable_query::Record;
use std::fmt;
use std::sync::Arc;

/// A literal value, or a function of the row it is shown for
///
/// Serialization without a row only ever exposes the literal form; see
/// [`Resolvable::as_static`].
pub enum Resolvable<T> {
	Static(T),
	Computed(Arc<dyn Fn(&Record) -> T + Send + Sync>),
}

impl<T> Resolvable<T> {
	pub fn computed<F>(f: F) -> Self
	where
		F: Fn(&Record) -> T + Send + Sync + 'static,
	{
		Self::Computed(Arc::new(f))
	}

	/// The literal value, `None` for computed values
	pub fn as_static(&self) -> Option<&T> {
		match self {
			Self::Static(value) => Some(value),
			Self::Computed(_) => None,
		}
	}

	pub fn is_computed(&self) -> bool {
		matches!(self, Self::Computed(_))
	}
}

impl<T: Clone> Resolvable<T> {
	/// Resolve against a row
	pub fn resolve(&self, record: &Record) -> T {
		match self {
			Self::Static(value) => value.clone(),
			Self::Computed(f) => f(record),
		}
	}
}

impl<T: Clone> Clone for Resolvable<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Static(value) => Self::Static(value.clone()),
			Self::Computed(f) => Self::Computed(Arc::clone(f)),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Resolvable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
			Self::Computed(_) => f.write_str("Computed(..)"),
		}
	}
}

impl From<&str> for Resolvable<String> {
	fn from(value: &str) -> Self {
		Self::Static(value.to_string())
	}
}

impl From<String> for Resolvable<String> {
	fn from(value: String) -> Self {
		Self::Static(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_static_and_computed() {
		let row = json!({"id": 7}).as_object().cloned().unwrap();
		let fixed: Resolvable<String> = "Edit".into();
		let computed = Resolvable::computed(|row: &Record| format!("/users/{}", row["id"]));

		assert_eq!(fixed.resolve(&row), "Edit");
		assert_eq!(fixed.as_static().map(String::as_str), Some("Edit"));
		assert_eq!(computed.resolve(&row), "/users/7");
		assert!(computed.as_static().is_none());
		assert!(computed.is_computed());
	}
}
