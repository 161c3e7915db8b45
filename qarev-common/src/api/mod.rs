//! API module for the review server's HTTP contract
//!
//! Contains ONLY serde types and route helpers (no HTTP client). The client
//! in `qarev-ui` wraps these with `reqwest`.

pub mod types;

pub use types::{
    DatasetId, DatasetInfo, FeedbackRecord, MutationResponse, QaDetail, QaId, QaSummary,
    SaveGoldStandardRequest, ScoreSet, SubmitFeedbackRequest,
};

/// Route builders for the review server
pub mod routes {
    use super::{DatasetId, QaId};

    pub const DATASETS: &str = "/api/datasets";
    pub const SUBMIT_FEEDBACK: &str = "/api/submit_feedback";
    pub const SAVE_GOLD_STANDARD: &str = "/api/save_gold_standard";

    /// `GET /api/dataset/{id}/qa`
    pub fn dataset_qa(dataset_id: DatasetId) -> String {
        format!("/api/dataset/{}/qa", dataset_id)
    }

    /// `GET /api/qa/{id}`
    pub fn qa_detail(qa_id: QaId) -> String {
        format!("/api/qa/{}", qa_id)
    }

    /// `GET /api/feedback/{qaId}`
    pub fn previous_feedback(qa_id: QaId) -> String {
        format!("/api/feedback/{}", qa_id)
    }
}
