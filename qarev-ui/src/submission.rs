//! Feedback and gold standard submission
//!
//! Both flows follow the same two phases:
//!
//! 1. On a successful response the list transition is applied locally and
//!    the counters move by one.
//! 2. The affected panel data is refetched from the server and replaces what
//!    is shown. Counters are not recomputed from the refetch.
//!
//! A failed mutation changes nothing locally. A failed refetch after a
//! successful mutation keeps the local transition.

use qarev_common::api::SaveGoldStandardRequest;
use qarev_common::ReviewAction;
use tracing::{info, warn};

use crate::client::ReviewApi;
use crate::error::{ReviewError, ValidationError};
use crate::events::{Control, NotificationLevel, ReviewEvent};
use crate::session::ReviewSession;

const MSG_GOLD_SAVED: &str = "Gold standard response saved successfully!";
const MSG_GOLD_FAILED: &str = "Error saving gold standard response";
const MSG_FEEDBACK_SAVED: &str = "Feedback submitted successfully!";
const MSG_FEEDBACK_FAILED: &str = "Error submitting feedback";

impl<A: ReviewApi> ReviewSession<A> {
    /// Save the editor draft as the active item's gold standard
    ///
    /// Blank drafts are rejected without a request. On failure the editor
    /// stays open with the draft intact.
    pub async fn save_gold_standard(&mut self) -> Result<(), ReviewError> {
        let request = match self.gold_request() {
            Ok(request) => request,
            Err(e) => {
                self.notify(NotificationLevel::Error, e.to_string());
                return Err(e.into());
            }
        };
        let qa_id = request.qa_id;

        let guard = self
            .selection
            .state()
            .controls()
            .engage(Control::SaveGoldStandard, &self.events);

        if let Err(e) = self.api.save_gold_standard(&request).await {
            warn!(qa_id, "Saving gold standard failed: {}", e);
            self.notify(NotificationLevel::Error, e.user_message(MSG_GOLD_FAILED));
            return Err(e.into());
        }

        info!(qa_id, "Gold standard saved");
        self.close_editor();
        self.panel.show_saved_gold(&request.gold_standard_answer);
        self.events.emit_lossy(ReviewEvent::GoldStandardUpdated {
            qa_id,
            gold_standard: self.panel.gold().clone(),
        });
        let transition = self.list.apply_transition(
            qa_id,
            ReviewAction::Gold,
            &mut self.selection.state_mut().counters,
        );
        self.emit_transition(transition);
        self.notify(NotificationLevel::Success, MSG_GOLD_SAVED);
        drop(guard);

        let detail = self.api.qa_detail(qa_id).await;
        self.apply_detail(qa_id, detail);
        Ok(())
    }

    /// Submit the feedback form for the active item
    ///
    /// On success the form is cleared, then re-populated from the refetched
    /// previous feedback. On failure the form is left as typed.
    pub async fn submit_feedback(&mut self) -> Result<(), ReviewError> {
        let request = match self
            .state()
            .active_qa_id()
            .ok_or(ValidationError::NoActiveItem)
            .and_then(|qa_id| self.form.to_request(qa_id))
        {
            Ok(request) => request,
            Err(e) => {
                self.notify(NotificationLevel::Error, e.to_string());
                return Err(e.into());
            }
        };
        let qa_id = request.qa_id;

        let guard = self
            .selection
            .state()
            .controls()
            .engage(Control::SubmitFeedback, &self.events);

        let response = match self.api.submit_feedback(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(qa_id, "Submitting feedback failed: {}", e);
                self.notify(NotificationLevel::Error, e.user_message(MSG_FEEDBACK_FAILED));
                return Err(e.into());
            }
        };

        info!(qa_id, feedback_id = ?response.feedback_id, "Feedback submitted");
        self.notify(NotificationLevel::Success, MSG_FEEDBACK_SAVED);
        self.form.clear();
        let transition = self.list.apply_transition(
            qa_id,
            ReviewAction::Feedback,
            &mut self.selection.state_mut().counters,
        );
        self.emit_transition(transition);
        self.close_editor();
        drop(guard);

        let (previous, detail) = futures::join!(
            self.api.previous_feedback(qa_id),
            self.api.qa_detail(qa_id)
        );
        self.apply_previous_feedback(qa_id, previous);
        self.apply_detail(qa_id, detail);
        Ok(())
    }

    fn gold_request(&self) -> Result<SaveGoldStandardRequest, ValidationError> {
        let qa_id = self
            .state()
            .active_qa_id()
            .ok_or(ValidationError::NoActiveItem)?;
        Ok(SaveGoldStandardRequest {
            qa_id,
            gold_standard_answer: self.panel.validated_draft()?,
        })
    }
}
