//! Events a table instance emits toward the presentation layer

use reinhardt_datatable_core::ActionResult;
use reinhardt_datatable_query::RowId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
	Success,
	Error,
}

/// Toast shown after an action ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	#[serde(rename = "type")]
	pub kind: NotificationKind,
	pub title: String,
	pub message: String,
}

impl Notification {
	/// Notification for an action outcome; `None` when it carries no message
	pub fn from_result(result: &ActionResult) -> Option<Self> {
		let message = result.message.clone()?;
		let (kind, default_title) = if result.success {
			(NotificationKind::Success, "Success")
		} else {
			(NotificationKind::Error, "Error")
		};

		Some(Self {
			kind,
			title: result
				.title
				.clone()
				.unwrap_or_else(|| default_title.to_string()),
			message,
		})
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ComponentEvent {
	Notify(Notification),
	/// An action succeeded; clients drop their local selection
	ActionExecuted { action: String, ids: Vec<RowId> },
}
