//! Q&A list model
//!
//! Holds the active dataset's Q&A summaries with a derived status per item.
//! The list is replaced wholesale on load and afterwards only mutated in
//! place, one item at a time, through [`QaListModel::apply_transition`].

use qarev_common::api::{DatasetId, QaId, QaSummary};
use qarev_common::{ReviewAction, ReviewStatus, StatusCounters};
use tracing::debug;

use crate::client::ReviewApi;
use crate::error::ApiError;
use crate::events::QaRow;

/// One list entry: the server summary plus its current status
#[derive(Debug, Clone, PartialEq)]
pub struct QaListItem {
    pub summary: QaSummary,
    pub status: ReviewStatus,
}

impl QaListItem {
    fn new(summary: QaSummary) -> Self {
        let status = summary.status();
        Self { summary, status }
    }

    pub fn qa_id(&self) -> QaId {
        self.summary.id
    }

    /// Row as handed to rendering adapters
    pub fn row(&self) -> QaRow {
        QaRow {
            qa_id: self.summary.id,
            question_text: self.summary.question_text.clone(),
            feedback_count: self.summary.feedback_count,
            status: self.status,
        }
    }
}

/// A status change applied to one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub qa_id: QaId,
    pub from: ReviewStatus,
    pub to: ReviewStatus,
    pub feedback_count: u32,
}

/// Ordered Q&A summaries of the active dataset
#[derive(Debug, Default)]
pub struct QaListModel {
    dataset_id: Option<DatasetId>,
    items: Vec<QaListItem>,
}

impl QaListModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a dataset's summaries and replace the list
    ///
    /// Counters are recomputed from scratch. On error nothing is touched:
    /// neither the previous list nor the counters.
    pub async fn load<A>(
        &mut self,
        api: &A,
        dataset_id: DatasetId,
        counters: &mut StatusCounters,
    ) -> Result<(), ApiError>
    where
        A: ReviewApi + ?Sized,
    {
        let summaries = api.dataset_qa(dataset_id).await?;
        self.replace(dataset_id, summaries, counters);
        Ok(())
    }

    /// Replace the list and recompute all counters
    pub fn replace(
        &mut self,
        dataset_id: DatasetId,
        summaries: Vec<QaSummary>,
        counters: &mut StatusCounters,
    ) {
        self.items = summaries.into_iter().map(QaListItem::new).collect();
        self.dataset_id = Some(dataset_id);
        *counters = StatusCounters::from_statuses(self.items.iter().map(|item| item.status));
        debug!(
            dataset_id,
            items = self.items.len(),
            "Q&A list replaced"
        );
    }

    /// Advance one item's status after a successful mutation
    ///
    /// Uses the transition table of [`ReviewStatus::after`]. Moves exactly
    /// one count between buckets and, for feedback, bumps the item's
    /// feedback count. Returns `None` (and changes nothing) when the table
    /// has no rule or the item is not in the list.
    pub fn apply_transition(
        &mut self,
        qa_id: QaId,
        action: ReviewAction,
        counters: &mut StatusCounters,
    ) -> Option<Transition> {
        let item = self.items.iter_mut().find(|item| item.qa_id() == qa_id)?;
        let from = item.status;
        let Some(to) = from.after(action) else {
            debug!(qa_id, %action, status = %from, "No transition");
            return None;
        };

        match action {
            ReviewAction::Feedback => item.summary.feedback_count += 1,
            ReviewAction::Gold => item.summary.has_gold_standard = true,
        }
        item.status = to;
        counters.shift(from, to);

        debug!(qa_id, %action, from = %from, to = %to, "Status transition");
        Some(Transition {
            qa_id,
            from,
            to,
            feedback_count: item.summary.feedback_count,
        })
    }

    pub fn dataset_id(&self) -> Option<DatasetId> {
        self.dataset_id
    }

    pub fn items(&self) -> &[QaListItem] {
        &self.items
    }

    pub fn get(&self, qa_id: QaId) -> Option<&QaListItem> {
        self.items.iter().find(|item| item.qa_id() == qa_id)
    }

    /// Item selected automatically after a load
    pub fn first_id(&self) -> Option<QaId> {
        self.items.first().map(QaListItem::qa_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn rows(&self) -> Vec<QaRow> {
        self.items.iter().map(QaListItem::row).collect()
    }
}
