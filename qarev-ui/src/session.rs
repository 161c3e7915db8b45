//! Review session
//!
//! Composition root for one reviewer: owns the API client, the selection
//! controller (and with it [`UiState`]), the Q&A list, the detail panel and
//! the feedback form. Every operation takes `&mut self`, so flows never
//! interleave; state is only touched in the synchronous stretches between
//! awaits.
//!
//! Item selection is split in two phases so a caller can drive the fetches
//! itself: [`ReviewSession::begin_item_selection`] switches the active item,
//! then [`ReviewSession::apply_detail`] and
//! [`ReviewSession::apply_previous_feedback`] accept the responses in any
//! order and discard the ones that no longer belong to the active item.

use qarev_common::api::{DatasetId, DatasetInfo, FeedbackRecord, QaDetail, QaId};
use tracing::{debug, info, warn};

use crate::client::ReviewApi;
use crate::detail::DetailPanel;
use crate::error::{ApiError, ReviewError};
use crate::events::{EventBus, NotificationLevel, ReviewEvent};
use crate::feedback_form::FeedbackForm;
use crate::qa_list::{QaListModel, Transition};
use crate::selection::{ItemLoad, SelectionController};
use crate::state::UiState;

const MSG_DATASETS_FAILED: &str = "Error loading datasets";
const MSG_QA_LIST_FAILED: &str = "Error loading Q&A pairs for dataset";
const MSG_DETAIL_FAILED: &str = "Error loading Q&A data";

pub struct ReviewSession<A: ReviewApi> {
    pub(crate) api: A,
    pub(crate) events: EventBus,
    pub(crate) datasets: Vec<DatasetInfo>,
    pub(crate) selection: SelectionController,
    pub(crate) list: QaListModel,
    pub(crate) panel: DetailPanel,
    pub(crate) form: FeedbackForm,
}

impl<A: ReviewApi> ReviewSession<A> {
    pub fn new(api: A, events: EventBus) -> Self {
        Self {
            api,
            events,
            datasets: Vec::new(),
            selection: SelectionController::new(),
            list: QaListModel::new(),
            panel: DetailPanel::new(),
            form: FeedbackForm::new(),
        }
    }

    // ========================================
    // Accessors
    // ========================================

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn state(&self) -> &UiState {
        self.selection.state()
    }

    pub fn datasets(&self) -> &[DatasetInfo] {
        &self.datasets
    }

    pub fn qa_list(&self) -> &QaListModel {
        &self.list
    }

    pub fn panel(&self) -> &DetailPanel {
        &self.panel
    }

    pub fn form(&self) -> &FeedbackForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FeedbackForm {
        &mut self.form
    }

    // ========================================
    // Datasets
    // ========================================

    /// Load the dataset directory and open the first dataset
    ///
    /// An empty directory leaves the session with no dataset and no item.
    pub async fn load_datasets(&mut self) -> Result<(), ReviewError> {
        self.refresh_datasets().await?;

        match self.datasets.first().map(|dataset| dataset.id) {
            Some(first) => self.select_dataset(first).await,
            None => {
                self.clear_item();
                Ok(())
            }
        }
    }

    /// Fetch the dataset directory without changing the selection
    pub async fn refresh_datasets(&mut self) -> Result<&[DatasetInfo], ReviewError> {
        let datasets = match self.api.datasets().await {
            Ok(datasets) => datasets,
            Err(e) => {
                warn!("Loading datasets failed: {}", e);
                self.notify(NotificationLevel::Error, MSG_DATASETS_FAILED);
                return Err(e.into());
            }
        };

        info!(count = datasets.len(), "Datasets loaded");
        self.datasets = datasets;
        self.events.emit_lossy(ReviewEvent::DatasetsLoaded {
            datasets: self.datasets.clone(),
        });
        Ok(&self.datasets)
    }

    /// Switch to `dataset_id`, reload its list and select the first item
    ///
    /// A failed list load keeps the previous list and counters.
    pub async fn select_dataset(&mut self, dataset_id: DatasetId) -> Result<(), ReviewError> {
        let was_editing = self.selection.state().edit_mode();
        self.selection.select_dataset(dataset_id);
        self.panel.reset_for(None);
        self.events
            .emit_lossy(ReviewEvent::DatasetSelected { dataset_id });
        if was_editing {
            self.emit_editor_closed();
        }

        let loaded = self
            .list
            .load(&self.api, dataset_id, &mut self.selection.state_mut().counters)
            .await;
        if let Err(e) = loaded {
            warn!(dataset_id, "Loading Q&A list failed: {}", e);
            self.notify(NotificationLevel::Error, MSG_QA_LIST_FAILED);
            return Err(e.into());
        }

        info!(dataset_id, items = self.list.len(), "Q&A list loaded");
        self.events.emit_lossy(ReviewEvent::QaListReplaced {
            dataset_id,
            rows: self.list.rows(),
            counters: self.selection.state().counters(),
        });

        match self.list.first_id() {
            Some(first) => {
                self.select_item(first).await;
            }
            None => self.clear_item(),
        }
        Ok(())
    }

    // ========================================
    // Item selection
    // ========================================

    /// Select an item and load its detail and previous feedback together
    ///
    /// Returns whether the panel ended up consistent (both loads applied).
    pub async fn select_item(&mut self, qa_id: QaId) -> bool {
        let load = self.begin_item_selection(qa_id);
        let (detail, previous) = futures::join!(
            self.api.qa_detail(load.qa_id),
            self.api.previous_feedback(load.qa_id)
        );
        self.apply_detail(load.qa_id, detail);
        self.apply_previous_feedback(load.qa_id, previous);
        self.panel.is_consistent()
    }

    /// Synchronous half of item selection
    ///
    /// Makes `qa_id` active, closes the editor and empties the panel and
    /// form. The caller fetches and hands the responses back through the
    /// `apply_*` methods.
    pub fn begin_item_selection(&mut self, qa_id: QaId) -> ItemLoad {
        let was_editing = self.selection.state().edit_mode();
        let load = self.selection.select_item(qa_id);
        self.panel.reset_for(Some(qa_id));
        self.form.clear();

        self.events.emit_lossy(ReviewEvent::ItemSelected { qa_id });
        if was_editing {
            self.emit_editor_closed();
        }
        load
    }

    /// Apply a detail response; returns `false` if it was stale or failed
    pub fn apply_detail(&mut self, qa_id: QaId, result: Result<QaDetail, ApiError>) -> bool {
        if !self.accepts(qa_id) {
            debug!(qa_id, active = ?self.state().active_qa_id(), "Discarding stale detail");
            return false;
        }

        match result {
            Ok(detail) => {
                let gold_standard = self.panel.show_detail(detail).clone();
                if let Some(detail) = self.panel.detail() {
                    self.events.emit_lossy(ReviewEvent::DetailUpdated {
                        qa_id,
                        question_text: detail.question_text.clone(),
                        system_answer_text: detail.system_answer_text.clone(),
                        gold_standard,
                    });
                }
                true
            }
            Err(e) => {
                warn!(qa_id, "Loading Q&A detail failed: {}", e);
                self.notify(NotificationLevel::Error, MSG_DETAIL_FAILED);
                false
            }
        }
    }

    /// Apply a previous-feedback response; returns `false` if it was stale or failed
    ///
    /// The newest record re-populates the feedback form. Failures are only
    /// logged.
    pub fn apply_previous_feedback(
        &mut self,
        qa_id: QaId,
        result: Result<Vec<FeedbackRecord>, ApiError>,
    ) -> bool {
        if !self.accepts(qa_id) {
            debug!(qa_id, active = ?self.state().active_qa_id(), "Discarding stale previous feedback");
            return false;
        }

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                warn!(qa_id, "Loading previous feedback failed: {}", e);
                return false;
            }
        };

        let latest = self.panel.show_previous_feedback(records).cloned();
        self.form.populate(latest.as_ref());

        self.events.emit_lossy(ReviewEvent::PreviousFeedbackUpdated {
            qa_id,
            entries: self.panel.previous_feedback().to_vec(),
        });
        self.events.emit_lossy(ReviewEvent::GoldStandardUpdated {
            qa_id,
            gold_standard: self.panel.gold().clone(),
        });
        true
    }

    // ========================================
    // Gold standard editor
    // ========================================

    /// Open the editor; returns the seeded draft
    pub fn open_gold_editor(&mut self) -> Result<String, ReviewError> {
        let draft = self
            .panel
            .open_editor(self.selection.state_mut())?
            .to_string();
        self.events.emit_lossy(ReviewEvent::EditModeChanged {
            editing: true,
            draft: Some(draft.clone()),
        });
        Ok(draft)
    }

    pub fn set_gold_draft(&mut self, text: impl Into<String>) -> Result<(), ReviewError> {
        Ok(self.panel.set_draft(text)?)
    }

    /// Close the editor without saving
    pub fn cancel_gold_editor(&mut self) {
        self.close_editor();
    }

    // ========================================
    // Internals shared with the submission flows
    // ========================================

    pub(crate) fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.events
            .emit_lossy(ReviewEvent::notification(level, message));
    }

    pub(crate) fn close_editor(&mut self) {
        let was_editing = self.selection.state().edit_mode();
        self.panel.close_editor(self.selection.state_mut());
        if was_editing {
            self.emit_editor_closed();
        }
    }

    pub(crate) fn emit_transition(&self, transition: Option<Transition>) {
        let Some(transition) = transition else {
            return;
        };
        self.events.emit_lossy(ReviewEvent::ItemStatusChanged {
            qa_id: transition.qa_id,
            old_status: transition.from,
            new_status: transition.to,
            feedback_count: transition.feedback_count,
        });
        self.events.emit_lossy(ReviewEvent::CountersChanged {
            counters: self.selection.state().counters(),
        });
    }

    fn emit_editor_closed(&self) {
        self.events.emit_lossy(ReviewEvent::EditModeChanged {
            editing: false,
            draft: None,
        });
    }

    fn clear_item(&mut self) {
        self.selection.clear_selection();
        self.panel.reset_for(None);
        self.form.clear();
        self.events.emit_lossy(ReviewEvent::SelectionCleared);
    }

    fn accepts(&self, qa_id: QaId) -> bool {
        self.selection.is_current(qa_id) && self.panel.qa_id() == Some(qa_id)
    }
}

impl<A: ReviewApi> std::fmt::Debug for ReviewSession<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewSession")
            .field("state", self.selection.state())
            .field("items", &self.list.len())
            .field("events", &self.events)
            .finish()
    }
}
