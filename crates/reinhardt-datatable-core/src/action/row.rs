use super::{ActionResult, Confirmation};
use crate::resolvable::Resolvable;
use crate::text::humanize;
use futures::future::BoxFuture;
use reinhardt_datatable_query::Record;
use serde_json::{Map, Value, json};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type RowHandler = Arc<dyn Fn(Record) -> BoxFuture<'static, ActionResult> + Send + Sync>;
type RowConfirm = Arc<dyn Fn(&Record) -> Confirmation + Send + Sync>;

/// Action shown on each row of an action column
///
/// Label, icon and url may be literal or computed from the row.
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_core::{ActionResult, Confirmation, RowAction};
///
/// let delete = RowAction::make("delete")
///     .with_icon("trash")
///     .confirm(|row| Confirmation::new().message(format!("Delete {}?", row["name"])))
///     .handle(|row| async move {
///         ActionResult::success().with_message(format!("Deleted {}", row["name"]))
///     });
///
/// assert!(delete.requires_confirmation());
/// assert!(delete.has_handler());
/// ```
#[derive(Clone)]
pub struct RowAction {
	name: String,
	label: Option<Resolvable<String>>,
	icon: Option<Resolvable<String>>,
	url: Option<Resolvable<String>>,
	props: Map<String, Value>,
	separator: bool,
	handler: Option<RowHandler>,
	confirm: Option<RowConfirm>,
}

impl RowAction {
	pub fn make(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			icon: None,
			url: None,
			props: Map::new(),
			separator: false,
			handler: None,
			confirm: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(Resolvable::Static(label.into()));
		self
	}

	pub fn label_using<F>(mut self, label: F) -> Self
	where
		F: Fn(&Record) -> String + Send + Sync + 'static,
	{
		self.label = Some(Resolvable::computed(label));
		self
	}

	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(Resolvable::Static(icon.into()));
		self
	}

	pub fn icon_using<F>(mut self, icon: F) -> Self
	where
		F: Fn(&Record) -> String + Send + Sync + 'static,
	{
		self.icon = Some(Resolvable::computed(icon));
		self
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(Resolvable::Static(url.into()));
		self
	}

	pub fn url_using<F>(mut self, url: F) -> Self
	where
		F: Fn(&Record) -> String + Send + Sync + 'static,
	{
		self.url = Some(Resolvable::computed(url));
		self
	}

	/// Opaque styling attributes passed through to the presentation layer
	pub fn with_props(mut self, props: Map<String, Value>) -> Self {
		self.props = props;
		self
	}

	pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.props.insert(key.into(), value.into());
		self
	}

	/// Draw a divider above this action in menus
	pub fn separator(mut self, separator: bool) -> Self {
		self.separator = separator;
		self
	}

	pub fn handle<F, Fut>(mut self, handler: F) -> Self
	where
		F: Fn(Record) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = ActionResult> + Send + 'static,
	{
		self.handler = Some(Arc::new(move |record| Box::pin(handler(record))));
		self
	}

	/// Require confirmation; `confirm` builds the dialog texts for the row
	pub fn confirm<F>(mut self, confirm: F) -> Self
	where
		F: Fn(&Record) -> Confirmation + Send + Sync + 'static,
	{
		self.confirm = Some(Arc::new(confirm));
		self
	}

	/// Label for `record`, or the humanized name when none was set
	pub fn label_for(&self, record: &Record) -> String {
		self.label
			.as_ref()
			.map(|label| label.resolve(record))
			.unwrap_or_else(|| humanize(&self.name))
	}

	pub fn icon_for(&self, record: &Record) -> Option<String> {
		self.icon.as_ref().map(|icon| icon.resolve(record))
	}

	pub fn url_for(&self, record: &Record) -> Option<String> {
		self.url.as_ref().map(|url| url.resolve(record))
	}

	pub fn has_url(&self) -> bool {
		self.url.is_some()
	}

	pub fn props(&self) -> &Map<String, Value> {
		&self.props
	}

	pub fn has_separator(&self) -> bool {
		self.separator
	}

	pub fn has_handler(&self) -> bool {
		self.handler.is_some()
	}

	pub fn requires_confirmation(&self) -> bool {
		self.confirm.is_some()
	}

	pub fn confirmation(&self, record: &Record) -> Option<Confirmation> {
		self.confirm.as_ref().map(|confirm| confirm(record))
	}

	/// Run the handler; without one the result is a "No handler defined" failure
	pub async fn execute(&self, record: Record) -> ActionResult {
		match &self.handler {
			Some(handler) => handler(record).await,
			None => ActionResult::no_handler(),
		}
	}

	/// Descriptor without a row: computed values are omitted
	pub fn to_json(&self) -> Value {
		let label = self
			.label
			.as_ref()
			.and_then(Resolvable::as_static)
			.cloned()
			.unwrap_or_else(|| self.name.clone());

		json!({
			"name": self.name,
			"label": label,
			"icon": self.icon.as_ref().and_then(Resolvable::as_static),
			"url": self.url.as_ref().and_then(Resolvable::as_static),
			"props": self.props,
			"separator": self.separator,
			"hasHandler": self.has_handler(),
			"requiresConfirmation": self.requires_confirmation(),
			"type": "action",
		})
	}

	/// Descriptor with every computed value resolved against `record`
	pub fn to_json_for(&self, record: &Record) -> Value {
		json!({
			"name": self.name,
			"label": self.label_for(record),
			"icon": self.icon_for(record),
			"url": self.url_for(record),
			"props": self.props,
			"separator": self.separator,
			"hasHandler": self.has_handler(),
			"requiresConfirmation": self.requires_confirmation(),
			"type": "action",
		})
	}
}

impl fmt::Debug for RowAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RowAction")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("icon", &self.icon)
			.field("url", &self.url)
			.field("separator", &self.separator)
			.field("has_handler", &self.has_handler())
			.field("requires_confirmation", &self.requires_confirmation())
			.finish_non_exhaustive()
	}
}

/// Dropdown of row actions behind one icon
#[derive(Debug, Clone, Default)]
pub struct RowActionGroup {
	icon: Option<String>,
	actions: Vec<RowAction>,
}

impl RowActionGroup {
	pub fn make() -> Self {
		Self::default()
	}

	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	pub fn icon(&self) -> Option<&str> {
		self.icon.as_deref()
	}

	pub fn with_actions(mut self, actions: Vec<RowAction>) -> Self {
		self.actions = actions;
		self
	}

	pub fn actions(&self) -> &[RowAction] {
		&self.actions
	}

	pub fn action(&self, name: &str) -> Option<&RowAction> {
		self.actions.iter().find(|action| action.name() == name)
	}

	pub fn to_json(&self) -> Value {
		json!({
			"icon": self.icon,
			"actions": self.actions.iter().map(RowAction::to_json).collect::<Vec<_>>(),
			"type": "group",
		})
	}

	pub fn to_json_for(&self, record: &Record) -> Value {
		json!({
			"icon": self.icon,
			"actions": self
				.actions
				.iter()
				.map(|action| action.to_json_for(record))
				.collect::<Vec<_>>(),
			"type": "group",
		})
	}
}

/// What an action column holds: one action or a group of them
#[derive(Debug, Clone)]
pub enum RowActionEntry {
	Action(RowAction),
	Group(RowActionGroup),
}

impl RowActionEntry {
	/// Find a leaf action by name
	pub fn find(&self, name: &str) -> Option<&RowAction> {
		match self {
			Self::Action(action) => (action.name() == name).then_some(action),
			Self::Group(group) => group.action(name),
		}
	}

	pub fn to_json(&self) -> Value {
		match self {
			Self::Action(action) => action.to_json(),
			Self::Group(group) => group.to_json(),
		}
	}

	pub fn to_json_for(&self, record: &Record) -> Value {
		match self {
			Self::Action(action) => action.to_json_for(record),
			Self::Group(group) => group.to_json_for(record),
		}
	}
}

impl From<RowAction> for RowActionEntry {
	fn from(action: RowAction) -> Self {
		Self::Action(action)
	}
}

impl From<RowActionGroup> for RowActionEntry {
	fn from(group: RowActionGroup) -> Self {
		Self::Group(group)
	}
}
