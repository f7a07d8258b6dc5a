//! # Reinhardt Datatable Component
//!
//! The interactive side of a data table: search, filters, sort,
//! pagination, column visibility, row selection and confirmable actions.
//!
//! ## Overview
//!
//! [`InteractionState`] is a plain value holding everything one user
//! changed on one table instance. The [`Datatable`] controller takes a
//! state and a UI event and returns the next state, running queries and
//! actions against its [`QuerySource`](reinhardt_datatable_query::QuerySource)
//! as needed. Actions that ask for confirmation park themselves in the
//! state until [`Datatable::confirm`] or [`Datatable::cancel`].
//!
//! Bulk action targets come from a [`SelectionModel`]. The default,
//! [`ServerTrackedSelection`], keeps the selection in the state; both
//! models re-check ids against the current search and filters before an
//! action runs.

pub mod datatable;
pub mod event;
pub mod selection;
pub mod state;

pub use datatable::{Datatable, DatatableDefinition, Transition};
pub use event::{ComponentEvent, Notification, NotificationKind};
pub use selection::{ClientSubmittedSelection, SelectionModel, ServerTrackedSelection};
pub use state::{ActionTarget, InteractionState, PendingAction};
