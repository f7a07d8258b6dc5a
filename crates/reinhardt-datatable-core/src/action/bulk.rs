use super::{ActionResult, Confirmation};
use crate::text::humanize;
use async_trait::async_trait;
use futures::future::BoxFuture;
use reinhardt_datatable_query::RowId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type BulkHandler = Arc<dyn Fn(Vec<RowId>) -> BoxFuture<'static, ActionResult> + Send + Sync>;
type BulkConfirm = Arc<dyn Fn(&[RowId]) -> Confirmation + Send + Sync>;

/// Side of the label the icon is drawn on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPosition {
	#[default]
	Left,
	Right,
}

/// Anything the toolbar can be asked to run by name
#[async_trait]
pub trait BulkExecutable: Send + Sync + fmt::Debug {
	fn name(&self) -> &str;

	fn requires_confirmation(&self) -> bool;

	fn confirmation(&self, ids: &[RowId]) -> Option<Confirmation>;

	async fn execute(&self, ids: Vec<RowId>) -> ActionResult;
}

/// Toolbar action run against the selected row ids
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_core::{ActionResult, BulkAction, IconPosition};
///
/// let archive = BulkAction::make("archive")
///     .with_icon("archive", IconPosition::Right)
///     .handle(|ids| async move {
///         ActionResult::success().with_message(format!("{} archived", ids.len()))
///     });
///
/// assert_eq!(archive.label(), "Archive");
/// ```
#[derive(Clone)]
pub struct BulkAction {
	name: String,
	label: Option<String>,
	icon: Option<String>,
	icon_position: IconPosition,
	props: Map<String, Value>,
	styles: Option<String>,
	handler: Option<BulkHandler>,
	confirm: Option<BulkConfirm>,
}

impl BulkAction {
	pub fn make(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			icon: None,
			icon_position: IconPosition::Left,
			props: Map::new(),
			styles: None,
			handler: None,
			confirm: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn label(&self) -> String {
		self.label.clone().unwrap_or_else(|| humanize(&self.name))
	}

	pub fn with_icon(mut self, icon: impl Into<String>, position: IconPosition) -> Self {
		self.icon = Some(icon.into());
		self.icon_position = position;
		self
	}

	pub fn icon(&self) -> Option<&str> {
		self.icon.as_deref()
	}

	pub fn icon_position(&self) -> IconPosition {
		self.icon_position
	}

	pub fn with_props(mut self, props: Map<String, Value>) -> Self {
		self.props = props;
		self
	}

	pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.props.insert(key.into(), value.into());
		self
	}

	pub fn props(&self) -> &Map<String, Value> {
		&self.props
	}

	/// Extra CSS classes for the button
	pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
		self.styles = Some(styles.into());
		self
	}

	pub fn styles(&self) -> Option<&str> {
		self.styles.as_deref()
	}

	pub fn handle<F, Fut>(mut self, handler: F) -> Self
	where
		F: Fn(Vec<RowId>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = ActionResult> + Send + 'static,
	{
		self.handler = Some(Arc::new(move |ids| Box::pin(handler(ids))));
		self
	}

	pub fn has_handler(&self) -> bool {
		self.handler.is_some()
	}

	pub fn confirm<F>(mut self, confirm: F) -> Self
	where
		F: Fn(&[RowId]) -> Confirmation + Send + Sync + 'static,
	{
		self.confirm = Some(Arc::new(confirm));
		self
	}

	pub fn to_json(&self) -> Value {
		json!({
			"name": self.name,
			"label": self.label(),
			"icon": self.icon,
			"iconPosition": self.icon_position,
			"props": self.props,
			"styles": self.styles,
			"requiresConfirmation": self.confirm.is_some(),
			"type": "action",
		})
	}
}

#[async_trait]
impl BulkExecutable for BulkAction {
	fn name(&self) -> &str {
		&self.name
	}

	fn requires_confirmation(&self) -> bool {
		self.confirm.is_some()
	}

	fn confirmation(&self, ids: &[RowId]) -> Option<Confirmation> {
		self.confirm.as_ref().map(|confirm| confirm(ids))
	}

	async fn execute(&self, ids: Vec<RowId>) -> ActionResult {
		match &self.handler {
			Some(handler) => handler(ids).await,
			None => ActionResult::no_handler(),
		}
	}
}

impl fmt::Debug for BulkAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BulkAction")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("icon", &self.icon)
			.field("icon_position", &self.icon_position)
			.field("styles", &self.styles)
			.field("has_handler", &self.handler.is_some())
			.field("requires_confirmation", &self.confirm.is_some())
			.finish_non_exhaustive()
	}
}

/// Named dropdown of bulk actions
#[derive(Debug, Clone)]
pub struct BulkActionGroup {
	name: String,
	label: Option<String>,
	icon: Option<String>,
	props: Map<String, Value>,
	styles: Option<String>,
	actions: Vec<BulkAction>,
}

impl BulkActionGroup {
	pub fn make(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			icon: None,
			props: Map::new(),
			styles: None,
			actions: Vec::new(),
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn label(&self) -> String {
		self.label.clone().unwrap_or_else(|| humanize(&self.name))
	}

	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	pub fn with_props(mut self, props: Map<String, Value>) -> Self {
		self.props = props;
		self
	}

	pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
		self.styles = Some(styles.into());
		self
	}

	pub fn with_actions(mut self, actions: Vec<BulkAction>) -> Self {
		self.actions = actions;
		self
	}

	pub fn actions(&self) -> &[BulkAction] {
		&self.actions
	}

	pub fn action(&self, name: &str) -> Option<&BulkAction> {
		self.actions
			.iter()
			.find(|action| BulkExecutable::name(*action) == name)
	}

	pub fn to_json(&self) -> Value {
		json!({
			"name": self.name,
			"label": self.label(),
			"icon": self.icon,
			"props": self.props,
			"styles": self.styles,
			"actions": self.actions.iter().map(BulkAction::to_json).collect::<Vec<_>>(),
			"type": "group",
		})
	}
}

#[async_trait]
impl BulkExecutable for BulkActionGroup {
	fn name(&self) -> &str {
		&self.name
	}

	fn requires_confirmation(&self) -> bool {
		false
	}

	fn confirmation(&self, _ids: &[RowId]) -> Option<Confirmation> {
		None
	}

	async fn execute(&self, _ids: Vec<RowId>) -> ActionResult {
		ActionResult::failure().with_message("Cannot execute action group directly")
	}
}

/// Top-level toolbar entry
#[derive(Debug, Clone)]
pub enum BulkActionEntry {
	Action(BulkAction),
	Group(BulkActionGroup),
}

impl BulkActionEntry {
	pub fn name(&self) -> &str {
		match self {
			Self::Action(action) => BulkExecutable::name(action),
			Self::Group(group) => BulkExecutable::name(group),
		}
	}

	/// This entry if it is called `name`, else a nested action of that name
	pub fn find(&self, name: &str) -> Option<&dyn BulkExecutable> {
		match self {
			Self::Action(action) if self.name() == name => Some(action as &dyn BulkExecutable),
			Self::Group(group) if self.name() == name => Some(group as &dyn BulkExecutable),
			Self::Group(group) => group.action(name).map(|action| action as &dyn BulkExecutable),
			Self::Action(_) => None,
		}
	}

	pub fn to_json(&self) -> Value {
		match self {
			Self::Action(action) => action.to_json(),
			Self::Group(group) => group.to_json(),
		}
	}
}

impl From<BulkAction> for BulkActionEntry {
	fn from(action: BulkAction) -> Self {
		Self::Action(action)
	}
}

impl From<BulkActionGroup> for BulkActionEntry {
	fn from(group: BulkActionGroup) -> Self {
		Self::Group(group)
	}
}
