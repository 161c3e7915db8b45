//! Process-wide review UI state
//!
//! Owned by the selection controller and lent to the other components by
//! reference. Reset on every dataset switch.

use qarev_common::api::{DatasetId, QaId};
use qarev_common::StatusCounters;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::events::{Control, EventBus, ReviewEvent};

/// Active selection, edit mode, counters and control busy flags
#[derive(Debug, Default)]
pub struct UiState {
    pub(crate) active_dataset_id: Option<DatasetId>,
    pub(crate) active_qa_id: Option<QaId>,
    pub(crate) edit_mode: bool,
    pub(crate) counters: StatusCounters,
    pub(crate) controls: ControlFlags,
}

impl UiState {
    pub fn active_dataset_id(&self) -> Option<DatasetId> {
        self.active_dataset_id
    }

    pub fn active_qa_id(&self) -> Option<QaId> {
        self.active_qa_id
    }

    /// True only while an item is active and its gold standard editor is open
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn counters(&self) -> StatusCounters {
        self.counters
    }

    pub fn controls(&self) -> &ControlFlags {
        &self.controls
    }
}

/// Busy flags of the mutating controls
#[derive(Debug, Default)]
pub struct ControlFlags {
    submit_feedback: Arc<AtomicBool>,
    save_gold_standard: Arc<AtomicBool>,
}

impl ControlFlags {
    pub fn is_busy(&self, control: Control) -> bool {
        self.flag(control).load(Ordering::SeqCst)
    }

    /// Mark `control` busy until the returned guard is dropped
    pub fn engage(&self, control: Control, events: &EventBus) -> ControlGuard {
        let flag = Arc::clone(self.flag(control));
        flag.store(true, Ordering::SeqCst);
        events.emit_lossy(ReviewEvent::ControlStateChanged {
            control,
            busy: true,
        });
        ControlGuard {
            control,
            flag,
            events: events.clone(),
        }
    }

    fn flag(&self, control: Control) -> &Arc<AtomicBool> {
        match control {
            Control::SubmitFeedback => &self.submit_feedback,
            Control::SaveGoldStandard => &self.save_gold_standard,
        }
    }
}

/// Restores a control to idle when dropped
///
/// Runs on success, failure, and when the owning future is dropped mid-flight.
#[must_use = "the control is released as soon as the guard is dropped"]
pub struct ControlGuard {
    control: Control,
    flag: Arc<AtomicBool>,
    events: EventBus,
}

impl Drop for ControlGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        self.events.emit_lossy(ReviewEvent::ControlStateChanged {
            control: self.control,
            busy: false,
        });
    }
}
