//! Review server request/response types
//!
//! Field names follow the server's JSON exactly. Fields the server may omit
//! are `#[serde(default)]` so older or leaner responses still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::status::{classify, ReviewStatus};
use crate::time::deserialize_optional_timestamp;

/// Q&A pair identifier
pub type QaId = i64;

/// Dataset identifier
pub type DatasetId = i64;

/// Valid range for every feedback score
pub const SCORE_RANGE: RangeInclusive<u8> = 1..=5;

// ========================================
// Read Types
// ========================================

/// Entry of `GET /api/datasets`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DatasetInfo {
    pub id: DatasetId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Entry of `GET /api/dataset/{id}/qa`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QaSummary {
    pub id: QaId,
    pub question_text: String,
    /// Feedback submissions visible to the current reviewer
    #[serde(default)]
    pub feedback_count: u32,
    /// True iff some feedback record carries a non-empty gold standard
    #[serde(default)]
    pub has_gold_standard: bool,
    #[serde(default)]
    pub system_answer_text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl QaSummary {
    /// Status derived from this summary's two facts
    pub fn status(&self) -> ReviewStatus {
        classify(self.feedback_count, self.has_gold_standard)
    }
}

/// The four structured scores of a feedback record
///
/// Each score is optional. `None` serializes as `null` and is never replaced
/// by a default on the wire.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScoreSet {
    #[serde(default)]
    pub accuracy_score: Option<u8>,
    #[serde(default)]
    pub completeness_score: Option<u8>,
    #[serde(default)]
    pub clarity_score: Option<u8>,
    #[serde(default)]
    pub clinical_relevance_score: Option<u8>,
}

impl ScoreSet {
    /// Same value in all four scores
    pub fn uniform(value: Option<u8>) -> Self {
        Self {
            accuracy_score: value,
            completeness_score: value,
            clarity_score: value,
            clinical_relevance_score: value,
        }
    }

    /// Scores paired with their wire field names
    pub fn fields(&self) -> [(&'static str, Option<u8>); 4] {
        [
            ("accuracy_score", self.accuracy_score),
            ("completeness_score", self.completeness_score),
            ("clarity_score", self.clarity_score),
            ("clinical_relevance_score", self.clinical_relevance_score),
        ]
    }

    /// First score outside [`SCORE_RANGE`], if any
    pub fn out_of_range(&self) -> Option<(&'static str, u8)> {
        self.fields()
            .into_iter()
            .find_map(|(name, score)| score.filter(|s| !SCORE_RANGE.contains(s)).map(|s| (name, s)))
    }

    /// True when no score is set
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, score)| score.is_none())
    }
}

/// One reviewer's feedback for a Q&A pair, optionally carrying a gold standard
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FeedbackRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default, alias = "qa_pair_id")]
    pub qa_id: Option<QaId>,
    /// `None` when the server sent `null`; sorts as oldest
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub text_feedback: Option<String>,
    #[serde(flatten)]
    pub scores: ScoreSet,
    #[serde(default)]
    pub gold_standard_answer: Option<String>,
}

impl FeedbackRecord {
    /// Gold standard text, if present and non-empty
    pub fn gold_standard(&self) -> Option<&str> {
        self.gold_standard_answer
            .as_deref()
            .filter(|answer| !answer.is_empty())
    }

    /// Text feedback, if present and non-empty
    pub fn text(&self) -> Option<&str> {
        self.text_feedback.as_deref().filter(|text| !text.is_empty())
    }
}

/// Response of `GET /api/qa/{id}`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QaDetail {
    #[serde(default)]
    pub id: Option<QaId>,
    pub question_text: String,
    pub system_answer_text: String,
    /// Current reviewer's feedback records, in no guaranteed order
    #[serde(default)]
    pub feedback: Vec<FeedbackRecord>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

// ========================================
// Mutation Types
// ========================================

/// Body of `POST /api/submit_feedback`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SubmitFeedbackRequest {
    pub qa_id: QaId,
    pub text_feedback: Option<String>,
    #[serde(flatten)]
    pub scores: ScoreSet,
}

/// Body of `POST /api/save_gold_standard`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SaveGoldStandardRequest {
    pub qa_id: QaId,
    pub gold_standard_answer: String,
}

/// Response of both mutation endpoints
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub feedback_id: Option<i64>,
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qa_summary_deserialization() {
        let json = r#"{
            "id": 7,
            "question_text": "What is the first-line treatment?",
            "system_answer_text": "Metformin.",
            "feedback_count": 2,
            "has_gold_standard": false,
            "created_at": "2024-05-01T09:30:00.000001"
        }"#;
        let summary: QaSummary = serde_json::from_str(json).unwrap();

        assert_eq!(summary.id, 7);
        assert_eq!(summary.feedback_count, 2);
        assert_eq!(summary.status(), ReviewStatus::Feedback);
        assert!(summary.created_at.is_some());
    }

    #[test]
    fn test_qa_summary_minimal_fields() {
        let json = r#"{"id": 1, "question_text": "Q"}"#;
        let summary: QaSummary = serde_json::from_str(json).unwrap();

        assert_eq!(summary.feedback_count, 0);
        assert!(!summary.has_gold_standard);
        assert_eq!(summary.status(), ReviewStatus::Pending);
    }

    #[test]
    fn test_feedback_record_with_nulls() {
        let json = r#"{
            "id": 3,
            "user_id": 1,
            "text_feedback": null,
            "accuracy_score": 4,
            "completeness_score": null,
            "clarity_score": 5,
            "clinical_relevance_score": null,
            "gold_standard_answer": "Reference answer",
            "submitted_at": null
        }"#;
        let record: FeedbackRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.scores.accuracy_score, Some(4));
        assert_eq!(record.scores.completeness_score, None);
        assert_eq!(record.scores.clarity_score, Some(5));
        assert!(record.submitted_at.is_none());
        assert_eq!(record.gold_standard(), Some("Reference answer"));
        assert_eq!(record.text(), None);
    }

    #[test]
    fn test_empty_gold_standard_is_absent() {
        let json = r#"{"gold_standard_answer": "", "submitted_at": "2024-01-01T00:00:00"}"#;
        let record: FeedbackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gold_standard(), None);
    }

    #[test]
    fn test_submit_request_sends_null_scores() {
        let request = SubmitFeedbackRequest {
            qa_id: 12,
            text_feedback: Some("Clear and accurate".to_string()),
            scores: ScoreSet::default(),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["qa_id"], 12);
        assert_eq!(value["text_feedback"], "Clear and accurate");
        assert!(value["accuracy_score"].is_null());
        assert!(value["clinical_relevance_score"].is_null());
        assert!(value.as_object().unwrap().contains_key("clarity_score"));
    }

    #[test]
    fn test_score_set_range_check() {
        let mut scores = ScoreSet::uniform(Some(3));
        assert!(scores.out_of_range().is_none());
        assert!(!scores.is_empty());

        scores.clarity_score = Some(6);
        assert_eq!(scores.out_of_range(), Some(("clarity_score", 6)));

        scores.clarity_score = Some(0);
        assert_eq!(scores.out_of_range(), Some(("clarity_score", 0)));

        assert!(ScoreSet::default().is_empty());
    }

    #[test]
    fn test_mutation_response_failure_message() {
        let json = r#"{"success": false, "message": "Q&A pair not found"}"#;
        let response: MutationResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Q&A pair not found"));

        let bare: MutationResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(bare.success);
        assert!(bare.message.is_none());
    }

    #[test]
    fn test_qa_detail_feedback_defaults_to_empty() {
        let json = r#"{"question_text": "Q", "system_answer_text": "A"}"#;
        let detail: QaDetail = serde_json::from_str(json).unwrap();
        assert!(detail.feedback.is_empty());
    }
}
