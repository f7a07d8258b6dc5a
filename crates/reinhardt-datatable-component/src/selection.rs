//! Where the ids of a bulk action come from

use crate::state::InteractionState;
use reinhardt_datatable_query::RowId;
use std::fmt;

/// Strategy resolving the target ids of a bulk action
///
/// Whatever the strategy returns is intersected with the rows matching
/// the current search and filters when [`revalidates`](Self::revalidates)
/// holds, both when the action is requested and when it runs.
pub trait SelectionModel: Send + Sync + fmt::Debug {
	/// Ids a bulk request targets, given the ids the client submitted
	fn resolve(&self, state: &InteractionState, submitted: &[RowId]) -> Vec<RowId>;

	/// Whether the selection lives in [`InteractionState::selected`]
	fn tracks_state(&self) -> bool;

	fn revalidates(&self) -> bool {
		true
	}
}

/// Selection kept on the server through explicit toggles
///
/// Submitted ids are ignored; the state's selection is used instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerTrackedSelection;

impl SelectionModel for ServerTrackedSelection {
	fn resolve(&self, state: &InteractionState, _submitted: &[RowId]) -> Vec<RowId> {
		state.selected.clone()
	}

	fn tracks_state(&self) -> bool {
		true
	}
}

/// Selection owned by the client and sent along with the bulk request
#[derive(Debug, Clone, Copy)]
pub struct ClientSubmittedSelection {
	revalidate: bool,
}

impl Default for ClientSubmittedSelection {
	fn default() -> Self {
		Self { revalidate: true }
	}
}

impl ClientSubmittedSelection {
	/// Trust submitted ids as-is instead of re-checking them against the query
	pub fn trusted() -> Self {
		Self { revalidate: false }
	}
}

impl SelectionModel for ClientSubmittedSelection {
	fn resolve(&self, _state: &InteractionState, submitted: &[RowId]) -> Vec<RowId> {
		submitted.to_vec()
	}

	fn tracks_state(&self) -> bool {
		false
	}

	fn revalidates(&self) -> bool {
		self.revalidate
	}
}
