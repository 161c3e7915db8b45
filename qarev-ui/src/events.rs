//! Review events and EventBus
//!
//! The review state modules never render anything. Every view-relevant
//! change is published as a [`ReviewEvent`] on the [`EventBus`]; rendering
//! adapters subscribe and map events to output.

use qarev_common::api::{DatasetId, DatasetInfo, FeedbackRecord, QaId};
use qarev_common::{ReviewStatus, StatusCounters};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;

/// How long a notification stays visible before dismissing itself
pub const NOTIFICATION_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Severity of a user notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// Mutating control that shows a busy state while its request is in flight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    SubmitFeedback,
    SaveGoldStandard,
}

/// One row of the Q&A list as rendered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaRow {
    pub qa_id: QaId,
    pub question_text: String,
    pub feedback_count: u32,
    pub status: ReviewStatus,
}

/// What the gold standard block shows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum GoldStandardDisplay {
    /// Verbatim gold standard text
    Answer(String),
    /// Nothing authored yet
    Placeholder,
}

/// View-level events emitted by the review session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReviewEvent {
    /// Dataset directory loaded (may be empty)
    DatasetsLoaded { datasets: Vec<DatasetInfo> },

    /// Active dataset changed; list reload follows
    DatasetSelected { dataset_id: DatasetId },

    /// Q&A list replaced wholesale
    QaListReplaced {
        dataset_id: DatasetId,
        rows: Vec<QaRow>,
        counters: StatusCounters,
    },

    /// Active Q&A pair changed; panel data for the previous item is gone
    ItemSelected { qa_id: QaId },

    /// Selection cleared (empty dataset)
    SelectionCleared,

    /// One item's status advanced in place
    ItemStatusChanged {
        qa_id: QaId,
        old_status: ReviewStatus,
        new_status: ReviewStatus,
        feedback_count: u32,
    },

    /// Per-status counters changed
    CountersChanged { counters: StatusCounters },

    /// Question, system answer and gold standard for the active item
    DetailUpdated {
        qa_id: QaId,
        question_text: String,
        system_answer_text: String,
        gold_standard: GoldStandardDisplay,
    },

    /// Gold standard block changed without a full detail refresh
    GoldStandardUpdated {
        qa_id: QaId,
        gold_standard: GoldStandardDisplay,
    },

    /// Reviewer's own previous feedback, newest first
    PreviousFeedbackUpdated {
        qa_id: QaId,
        entries: Vec<FeedbackRecord>,
    },

    /// Gold standard editor opened (with seeded draft) or closed
    EditModeChanged {
        editing: bool,
        draft: Option<String>,
    },

    /// Control entered or left its busy state
    ControlStateChanged { control: Control, busy: bool },

    /// Transient user message
    Notification {
        level: NotificationLevel,
        message: String,
        dismiss_after_ms: u64,
    },
}

impl ReviewEvent {
    /// Variant name, for filtering and logging
    pub fn event_type(&self) -> &str {
        match self {
            ReviewEvent::DatasetsLoaded { .. } => "DatasetsLoaded",
            ReviewEvent::DatasetSelected { .. } => "DatasetSelected",
            ReviewEvent::QaListReplaced { .. } => "QaListReplaced",
            ReviewEvent::ItemSelected { .. } => "ItemSelected",
            ReviewEvent::SelectionCleared => "SelectionCleared",
            ReviewEvent::ItemStatusChanged { .. } => "ItemStatusChanged",
            ReviewEvent::CountersChanged { .. } => "CountersChanged",
            ReviewEvent::DetailUpdated { .. } => "DetailUpdated",
            ReviewEvent::GoldStandardUpdated { .. } => "GoldStandardUpdated",
            ReviewEvent::PreviousFeedbackUpdated { .. } => "PreviousFeedbackUpdated",
            ReviewEvent::EditModeChanged { .. } => "EditModeChanged",
            ReviewEvent::ControlStateChanged { .. } => "ControlStateChanged",
            ReviewEvent::Notification { .. } => "Notification",
        }
    }

    /// Build a notification event with the standard dismiss delay
    pub fn notification(level: NotificationLevel, message: impl Into<String>) -> Self {
        ReviewEvent::Notification {
            level,
            message: message.into(),
            dismiss_after_ms: NOTIFICATION_DISMISS_AFTER.as_millis() as u64,
        }
    }
}

/// Broadcast channel carrying [`ReviewEvent`]s from a session to renderers
///
/// Publishing never waits on subscribers. A subscriber that falls more than
/// `capacity` events behind sees `RecvError::Lagged` and skips ahead.
///
/// # Examples
///
/// ```
/// use qarev_ui::events::{EventBus, ReviewEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(ReviewEvent::SelectionCleared);
///
/// let event = rx.try_recv().unwrap();
/// assert_eq!(event.event_type(), "SelectionCleared");
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ReviewEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ReviewEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ReviewEvent,
    ) -> Result<usize, broadcast::error::SendError<ReviewEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// A session without a renderer attached is still fully functional.
    pub fn emit_lossy(&self, event: ReviewEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
