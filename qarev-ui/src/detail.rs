//! Detail panel
//!
//! Question, system answer, gold standard and the reviewer's previous
//! feedback for the active item, plus the gold standard editor draft.
//!
//! The panel is "consistent" only once both the detail and the previous
//! feedback for its item have arrived; they may arrive in either order.

use qarev_common::api::{FeedbackRecord, QaDetail, QaId};
use tracing::debug;

use crate::error::ValidationError;
use crate::events::GoldStandardDisplay;
use crate::state::UiState;

/// Shown when no feedback record carries a gold standard
pub const GOLD_PLACEHOLDER: &str =
    "No gold standard response provided yet. Click the edit button to create one.";

/// Sort by `submitted_at`, newest first; records without a timestamp go last
pub fn sort_newest_first(records: &mut [FeedbackRecord]) {
    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

/// Gold standard text of the newest record that has one
pub fn latest_gold_standard(records: &[FeedbackRecord]) -> Option<&str> {
    let mut with_gold: Vec<&FeedbackRecord> = records
        .iter()
        .filter(|record| record.gold_standard().is_some())
        .collect();
    with_gold.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    with_gold.first().and_then(|record| record.gold_standard())
}

fn gold_display(records: &[FeedbackRecord]) -> GoldStandardDisplay {
    match latest_gold_standard(records) {
        Some(text) => GoldStandardDisplay::Answer(text.to_string()),
        None => GoldStandardDisplay::Placeholder,
    }
}

#[derive(Debug)]
pub struct DetailPanel {
    qa_id: Option<QaId>,
    detail: Option<QaDetail>,
    previous_feedback: Option<Vec<FeedbackRecord>>,
    gold: GoldStandardDisplay,
    draft: Option<String>,
}

impl Default for DetailPanel {
    fn default() -> Self {
        Self {
            qa_id: None,
            detail: None,
            previous_feedback: None,
            gold: GoldStandardDisplay::Placeholder,
            draft: None,
        }
    }
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything shown for the previous item
    pub fn reset_for(&mut self, qa_id: Option<QaId>) {
        *self = Self {
            qa_id,
            ..Self::default()
        };
    }

    /// Replace panel data with a fetched detail
    pub fn show_detail(&mut self, mut detail: QaDetail) -> &GoldStandardDisplay {
        sort_newest_first(&mut detail.feedback);
        self.gold = gold_display(&detail.feedback);
        self.detail = Some(detail);
        &self.gold
    }

    /// Replace the previous feedback list; returns the newest record
    ///
    /// The gold standard display follows the same list.
    pub fn show_previous_feedback(
        &mut self,
        mut records: Vec<FeedbackRecord>,
    ) -> Option<&FeedbackRecord> {
        sort_newest_first(&mut records);
        self.gold = gold_display(&records);
        self.previous_feedback = Some(records);
        self.previous_feedback.as_ref().and_then(|records| records.first())
    }

    /// Show a just-saved gold standard before the refetch confirms it
    pub fn show_saved_gold(&mut self, text: &str) {
        self.gold = GoldStandardDisplay::Answer(text.to_string());
    }

    /// Open the gold standard editor
    ///
    /// The draft starts from the current gold standard, or from the system
    /// answer when there is none.
    pub fn open_editor(&mut self, state: &mut UiState) -> Result<&str, ValidationError> {
        if state.active_qa_id.is_none() || state.active_qa_id != self.qa_id {
            return Err(ValidationError::NoActiveItem);
        }

        let seed = match &self.gold {
            GoldStandardDisplay::Answer(text) => text.clone(),
            GoldStandardDisplay::Placeholder => self
                .detail
                .as_ref()
                .map(|detail| detail.system_answer_text.clone())
                .unwrap_or_default(),
        };
        state.edit_mode = true;
        Ok(self.draft.insert(seed).as_str())
    }

    /// Close the editor and discard the draft
    pub fn close_editor(&mut self, state: &mut UiState) {
        if self.draft.take().is_some() {
            debug!(qa_id = ?self.qa_id, "Gold standard editor closed");
        }
        state.edit_mode = false;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), ValidationError> {
        match self.draft.as_mut() {
            Some(draft) => {
                *draft = text.into();
                Ok(())
            }
            None => Err(ValidationError::EditorClosed),
        }
    }

    /// Trimmed draft, ready to save
    pub fn validated_draft(&self) -> Result<String, ValidationError> {
        let draft = self.draft.as_deref().ok_or(ValidationError::EditorClosed)?;
        let trimmed = draft.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyGoldStandard);
        }
        Ok(trimmed.to_string())
    }

    pub fn qa_id(&self) -> Option<QaId> {
        self.qa_id
    }

    pub fn detail(&self) -> Option<&QaDetail> {
        self.detail.as_ref()
    }

    /// Newest first; empty until loaded
    pub fn previous_feedback(&self) -> &[FeedbackRecord] {
        self.previous_feedback.as_deref().unwrap_or_default()
    }

    pub fn gold(&self) -> &GoldStandardDisplay {
        &self.gold
    }

    /// Gold standard text, if one is shown
    pub fn gold_text(&self) -> Option<&str> {
        match &self.gold {
            GoldStandardDisplay::Answer(text) => Some(text),
            GoldStandardDisplay::Placeholder => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn is_consistent(&self) -> bool {
        self.detail.is_some() && self.previous_feedback.is_some()
    }
}
