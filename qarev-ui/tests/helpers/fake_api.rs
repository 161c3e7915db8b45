//! In-memory review server
//!
//! Mirrors the server's rules closely enough for session tests: one
//! feedback record per reviewer and Q&A pair, upserted by both mutation
//! endpoints, and summaries derived from that record. A record holding only
//! a gold standard does not count as feedback.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qarev_common::api::{
    DatasetId, DatasetInfo, FeedbackRecord, MutationResponse, QaDetail, QaId, QaSummary,
    SaveGoldStandardRequest, ScoreSet, SubmitFeedbackRequest,
};
use qarev_ui::{ApiError, ReviewApi};
use std::sync::Mutex;

/// How a mutation endpoint misbehaves
#[derive(Debug, Clone)]
pub enum Misbehavior {
    /// Transport failure
    Network,
    /// `success: false` with an optional message
    Reject(Option<String>),
    /// Never answers
    Hang,
}

/// Read endpoints that fail with a 500
#[derive(Debug, Clone, Default)]
pub struct Failures {
    pub datasets: bool,
    pub dataset_qa: bool,
    pub qa_detail: bool,
    pub previous_feedback: bool,
    pub submit_feedback: Option<Misbehavior>,
    pub save_gold_standard: Option<Misbehavior>,
}

#[derive(Debug, Clone)]
pub struct StoredQa {
    pub id: QaId,
    pub dataset_id: DatasetId,
    pub question_text: String,
    pub system_answer_text: String,
    pub records: Vec<FeedbackRecord>,
}

impl StoredQa {
    fn summary(&self) -> QaSummary {
        QaSummary {
            id: self.id,
            question_text: self.question_text.clone(),
            // Unlike the real server, gold-only records are not counted as feedback
            feedback_count: self
                .records
                .iter()
                .filter(|r| r.text().is_some() || !r.scores.is_empty())
                .count() as u32,
            has_gold_standard: self.records.iter().any(|r| r.gold_standard().is_some()),
            system_answer_text: Some(self.system_answer_text.clone()),
            created_at: None,
        }
    }
}

#[derive(Debug, Default)]
struct ServerState {
    datasets: Vec<DatasetInfo>,
    qa: Vec<StoredQa>,
    next_feedback_id: i64,
    failures: Failures,
    submit_requests: Vec<SubmitFeedbackRequest>,
    gold_requests: Vec<SaveGoldStandardRequest>,
}

impl ServerState {
    fn qa_mut(&mut self, qa_id: QaId) -> Option<&mut StoredQa> {
        self.qa.iter_mut().find(|qa| qa.id == qa_id)
    }

    fn next_id(&mut self) -> i64 {
        self.next_feedback_id += 1;
        self.next_feedback_id
    }
}

pub const REVIEWER_ID: i64 = 1;

#[derive(Debug, Default)]
pub struct FakeReviewApi {
    state: Mutex<ServerState>,
}

impl FakeReviewApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(self, id: DatasetId, name: &str) -> Self {
        self.state.lock().unwrap().datasets.push(DatasetInfo {
            id,
            name: name.to_string(),
            description: None,
        });
        self
    }

    pub fn with_qa(self, dataset_id: DatasetId, id: QaId, question: &str, answer: &str) -> Self {
        self.state.lock().unwrap().qa.push(StoredQa {
            id,
            dataset_id,
            question_text: question.to_string(),
            system_answer_text: answer.to_string(),
            records: Vec::new(),
        });
        self
    }

    /// Seed an existing feedback record
    pub fn with_record(self, qa_id: QaId, record: FeedbackRecord) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_id();
            let qa = state.qa_mut(qa_id).expect("seeded record for unknown Q&A pair");
            qa.records.push(FeedbackRecord {
                id: Some(id),
                ..record
            });
        }
        self
    }

    pub fn set_failures(&self, update: impl FnOnce(&mut Failures)) {
        update(&mut self.state.lock().unwrap().failures);
    }

    pub fn stored(&self, qa_id: QaId) -> StoredQa {
        self.state
            .lock()
            .unwrap()
            .qa
            .iter()
            .find(|qa| qa.id == qa_id)
            .cloned()
            .expect("unknown Q&A pair")
    }

    pub fn submit_requests(&self) -> Vec<SubmitFeedbackRequest> {
        self.state.lock().unwrap().submit_requests.clone()
    }

    pub fn gold_requests(&self) -> Vec<SaveGoldStandardRequest> {
        self.state.lock().unwrap().gold_requests.clone()
    }

    fn read_failure(&self, failing: impl FnOnce(&Failures) -> bool) -> Result<(), ApiError> {
        if failing(&self.state.lock().unwrap().failures) {
            return Err(ApiError::Status {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}

/// Feedback record as seeded by tests
pub fn record_at(
    submitted_at: Option<DateTime<Utc>>,
    text: Option<&str>,
    scores: ScoreSet,
    gold: Option<&str>,
) -> FeedbackRecord {
    FeedbackRecord {
        id: None,
        user_id: Some(REVIEWER_ID),
        qa_id: None,
        submitted_at,
        text_feedback: text.map(str::to_string),
        scores,
        gold_standard_answer: gold.map(str::to_string),
    }
}

async fn misbehave(behavior: Option<Misbehavior>) -> Result<(), ApiError> {
    match behavior {
        None => Ok(()),
        Some(Misbehavior::Network) => Err(ApiError::Network("connection refused".to_string())),
        Some(Misbehavior::Reject(message)) => Err(ApiError::Application(message)),
        Some(Misbehavior::Hang) => std::future::pending().await,
    }
}

fn not_found() -> ApiError {
    ApiError::Application(Some("Q&A pair not found".to_string()))
}

#[async_trait]
impl ReviewApi for FakeReviewApi {
    async fn datasets(&self) -> Result<Vec<DatasetInfo>, ApiError> {
        self.read_failure(|f| f.datasets)?;
        Ok(self.state.lock().unwrap().datasets.clone())
    }

    async fn dataset_qa(&self, dataset_id: DatasetId) -> Result<Vec<QaSummary>, ApiError> {
        self.read_failure(|f| f.dataset_qa)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .qa
            .iter()
            .filter(|qa| qa.dataset_id == dataset_id)
            .map(StoredQa::summary)
            .collect())
    }

    async fn qa_detail(&self, qa_id: QaId) -> Result<QaDetail, ApiError> {
        self.read_failure(|f| f.qa_detail)?;
        let state = self.state.lock().unwrap();
        let qa = state
            .qa
            .iter()
            .find(|qa| qa.id == qa_id)
            .ok_or(ApiError::Status {
                status: 404,
                body: "Not Found".to_string(),
            })?;
        Ok(QaDetail {
            id: Some(qa.id),
            question_text: qa.question_text.clone(),
            system_answer_text: qa.system_answer_text.clone(),
            feedback: qa.records.clone(),
            created_at: None,
        })
    }

    async fn previous_feedback(&self, qa_id: QaId) -> Result<Vec<FeedbackRecord>, ApiError> {
        self.read_failure(|f| f.previous_feedback)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .qa
            .iter()
            .find(|qa| qa.id == qa_id)
            .map(|qa| qa.records.clone())
            .unwrap_or_default())
    }

    async fn submit_feedback(
        &self,
        request: &SubmitFeedbackRequest,
    ) -> Result<MutationResponse, ApiError> {
        let behavior = {
            let mut state = self.state.lock().unwrap();
            state.submit_requests.push(request.clone());
            state.failures.submit_feedback.clone()
        };
        misbehave(behavior).await?;

        let mut state = self.state.lock().unwrap();
        let new_id = state.next_id();
        let qa = state.qa_mut(request.qa_id).ok_or_else(not_found)?;
        let feedback_id = match qa.records.first_mut() {
            Some(record) => {
                record.text_feedback = request.text_feedback.clone();
                record.scores = request.scores;
                record.submitted_at = Some(Utc::now());
                record.id.unwrap_or(new_id)
            }
            None => {
                qa.records.push(FeedbackRecord {
                    id: Some(new_id),
                    user_id: Some(REVIEWER_ID),
                    qa_id: Some(request.qa_id),
                    submitted_at: Some(Utc::now()),
                    text_feedback: request.text_feedback.clone(),
                    scores: request.scores,
                    gold_standard_answer: None,
                });
                new_id
            }
        };

        Ok(MutationResponse {
            success: true,
            message: Some("Feedback submitted successfully".to_string()),
            feedback_id: Some(feedback_id),
        })
    }

    async fn save_gold_standard(
        &self,
        request: &SaveGoldStandardRequest,
    ) -> Result<MutationResponse, ApiError> {
        let behavior = {
            let mut state = self.state.lock().unwrap();
            state.gold_requests.push(request.clone());
            state.failures.save_gold_standard.clone()
        };
        misbehave(behavior).await?;

        let mut state = self.state.lock().unwrap();
        let new_id = state.next_id();
        let qa = state.qa_mut(request.qa_id).ok_or_else(not_found)?;
        match qa.records.first_mut() {
            Some(record) => {
                record.gold_standard_answer = Some(request.gold_standard_answer.clone());
            }
            None => qa.records.push(FeedbackRecord {
                id: Some(new_id),
                user_id: Some(REVIEWER_ID),
                qa_id: Some(request.qa_id),
                submitted_at: Some(Utc::now()),
                text_feedback: None,
                scores: ScoreSet::default(),
                gold_standard_answer: Some(request.gold_standard_answer.clone()),
            }),
        }

        Ok(MutationResponse {
            success: true,
            message: Some("Gold standard response saved successfully".to_string()),
            feedback_id: None,
        })
    }
}
