//! Row and bulk actions
//!
//! Row actions live in an action column and run against one record. Bulk
//! actions live on the table toolbar and run against a list of row ids.
//! Either kind may ask for confirmation before running; groups only
//! organize actions and can never run themselves.

mod bulk;
mod row;

pub use bulk::{BulkAction, BulkActionEntry, BulkActionGroup, BulkExecutable, IconPosition};
pub use row::{RowAction, RowActionEntry, RowActionGroup};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome reported by an action handler
///
/// Serializes to `{"success": bool, "message"?: .., "title"?: .., ...}` with
/// any extra fields flattened alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl ActionResult {
	pub fn success() -> Self {
		Self {
			success: true,
			..Self::default()
		}
	}

	pub fn failure() -> Self {
		Self::default()
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}

	pub(crate) fn no_handler() -> Self {
		Self::failure().with_message("No handler defined")
	}
}

/// Texts of the confirmation dialog shown before a guarded action runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cancel: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub confirm: Option<String>,
	/// Visual style of the confirm button, e.g. `danger`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub variant: Option<String>,
}

impl Confirmation {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn cancel(mut self, cancel: impl Into<String>) -> Self {
		self.cancel = Some(cancel.into());
		self
	}

	pub fn confirm(mut self, confirm: impl Into<String>) -> Self {
		self.confirm = Some(confirm.into());
		self
	}

	pub fn variant(mut self, variant: impl Into<String>) -> Self {
		self.variant = Some(variant.into());
		self
	}
}
