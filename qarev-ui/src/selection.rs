//! Selection controller
//!
//! Owns [`UiState`] and decides which responses still belong to the active
//! item. Network work is driven by the session; this module only performs
//! the synchronous state changes around it.

use qarev_common::api::{DatasetId, QaId};
use tracing::debug;

use crate::state::UiState;

/// Ticket for one item selection
///
/// Handed out by [`SelectionController::select_item`]; responses fetched on
/// its behalf are applied only while it is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLoad {
    pub qa_id: QaId,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: UiState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut UiState {
        &mut self.state
    }

    /// Switch datasets: the active item and edit mode are cleared
    pub fn select_dataset(&mut self, dataset_id: DatasetId) {
        debug!(dataset_id, "Dataset selected");
        self.state.active_dataset_id = Some(dataset_id);
        self.state.active_qa_id = None;
        self.state.edit_mode = false;
    }

    /// Make `qa_id` the active item and close the editor
    pub fn select_item(&mut self, qa_id: QaId) -> ItemLoad {
        if let Some(previous) = self.state.active_qa_id.filter(|id| *id != qa_id) {
            debug!(previous, qa_id, "Active item changed");
        }
        self.state.active_qa_id = Some(qa_id);
        self.state.edit_mode = false;
        ItemLoad { qa_id }
    }

    pub fn clear_selection(&mut self) {
        self.state.active_qa_id = None;
        self.state.edit_mode = false;
    }

    /// Whether a response for `qa_id` may still be applied
    pub fn is_current(&self, qa_id: QaId) -> bool {
        self.state.active_qa_id == Some(qa_id)
    }
}
