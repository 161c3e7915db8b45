//! Feedback form contents

use std::str::FromStr;

use qarev_common::api::{FeedbackRecord, QaId, ScoreSet, SubmitFeedbackRequest};

use crate::error::ValidationError;

/// Score every slider starts at
pub const DEFAULT_SCORE: u8 = 3;

/// Free text plus the four scores, as edited by the reviewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackForm {
    pub text: String,
    pub scores: ScoreSet,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            scores: ScoreSet::uniform(Some(DEFAULT_SCORE)),
        }
    }
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to empty text and default scores
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Clear, then copy the text and every non-null score of `latest`
    pub fn populate(&mut self, latest: Option<&FeedbackRecord>) {
        self.clear();
        let Some(record) = latest else {
            return;
        };

        if let Some(text) = record.text() {
            self.text = text.to_string();
        }
        let scores = &record.scores;
        if scores.accuracy_score.is_some() {
            self.scores.accuracy_score = scores.accuracy_score;
        }
        if scores.completeness_score.is_some() {
            self.scores.completeness_score = scores.completeness_score;
        }
        if scores.clarity_score.is_some() {
            self.scores.clarity_score = scores.clarity_score;
        }
        if scores.clinical_relevance_score.is_some() {
            self.scores.clinical_relevance_score = scores.clinical_relevance_score;
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Build the submit body; blank text is sent as `null`
    pub fn to_request(&self, qa_id: QaId) -> Result<SubmitFeedbackRequest, ValidationError> {
        if let Some((field, value)) = self.scores.out_of_range() {
            return Err(ValidationError::ScoreOutOfRange { field, value });
        }
        Ok(SubmitFeedbackRequest {
            qa_id,
            text_feedback: (!self.text.trim().is_empty()).then(|| self.text.clone()),
            scores: self.scores,
        })
    }
}

/// Change to one score field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEdit {
    Set(u8),
    /// Send the score as `null`
    Clear,
}

impl ScoreEdit {
    fn apply(self, slot: &mut Option<u8>) {
        *slot = match self {
            ScoreEdit::Set(value) => Some(value),
            ScoreEdit::Clear => None,
        };
    }
}

impl FromStr for ScoreEdit {
    type Err = String;

    /// A number, or `none`/`null` to clear the score
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("null") {
            return Ok(ScoreEdit::Clear);
        }
        raw.parse::<u8>()
            .map(ScoreEdit::Set)
            .map_err(|_| format!("expected a score or \"none\", got {:?}", raw))
    }
}

/// Edits layered over a populated form
///
/// Fields left as `None` keep the form's current value. `clear_scores`
/// nulls all four scores before the per-field edits apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackEdit {
    pub text: Option<String>,
    pub clear_scores: bool,
    pub accuracy: Option<ScoreEdit>,
    pub completeness: Option<ScoreEdit>,
    pub clarity: Option<ScoreEdit>,
    pub relevance: Option<ScoreEdit>,
}

impl FeedbackEdit {
    pub fn apply(&self, form: &mut FeedbackForm) {
        if let Some(text) = &self.text {
            form.text = text.clone();
        }

        let scores = &mut form.scores;
        if self.clear_scores {
            *scores = ScoreSet::default();
        }
        let edits = [
            (self.accuracy, &mut scores.accuracy_score),
            (self.completeness, &mut scores.completeness_score),
            (self.clarity, &mut scores.clarity_score),
            (self.relevance, &mut scores.clinical_relevance_score),
        ];
        for (edit, slot) in edits {
            if let Some(edit) = edit {
                edit.apply(slot);
            }
        }
    }
}
