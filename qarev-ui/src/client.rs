//! Review server API client
//!
//! [`ReviewApi`] is the seam between the review state logic and the network.
//! [`HttpReviewClient`] implements it over `reqwest`; tests substitute an
//! in-memory implementation.

use async_trait::async_trait;
use qarev_common::Error;
use qarev_common::api::{
    routes, DatasetId, DatasetInfo, FeedbackRecord, MutationResponse, QaDetail, QaId, QaSummary,
    SaveGoldStandardRequest, SubmitFeedbackRequest,
};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::ApiError;

const USER_AGENT: &str = concat!("qarev-ui/", env!("CARGO_PKG_VERSION"));

/// Operations the review client needs from the server
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Datasets the current reviewer may access
    async fn datasets(&self) -> Result<Vec<DatasetInfo>, ApiError>;

    /// Q&A summaries of one dataset
    async fn dataset_qa(&self, dataset_id: DatasetId) -> Result<Vec<QaSummary>, ApiError>;

    /// Full Q&A pair with the reviewer's feedback records
    async fn qa_detail(&self, qa_id: QaId) -> Result<QaDetail, ApiError>;

    /// The reviewer's own feedback records for one Q&A pair
    async fn previous_feedback(&self, qa_id: QaId) -> Result<Vec<FeedbackRecord>, ApiError>;

    /// Submit scores and text feedback
    ///
    /// `success: false` is returned as [`ApiError::Application`].
    async fn submit_feedback(
        &self,
        request: &SubmitFeedbackRequest,
    ) -> Result<MutationResponse, ApiError>;

    /// Save a gold standard answer
    ///
    /// `success: false` is returned as [`ApiError::Application`].
    async fn save_gold_standard(
        &self,
        request: &SaveGoldStandardRequest,
    ) -> Result<MutationResponse, ApiError>;
}

/// Connection settings for [`HttpReviewClient`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL without trailing slash
    pub server_url: String,
    /// Raw `Cookie` header value carrying the authenticated session
    pub session_cookie: Option<String>,
    /// No timeout when `None`
    pub request_timeout: Option<Duration>,
}

/// `reqwest`-backed review server client
#[derive(Debug, Clone)]
pub struct HttpReviewClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpReviewClient {
    pub fn new(config: &ClientConfig) -> qarev_common::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| Error::Config(format!("Invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| log_transport_error(&url, e))?;

        decode_response(&url, response).await
    }

    async fn post_mutation<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<MutationResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| log_transport_error(&url, e))?;

        let outcome: MutationResponse = decode_response(&url, response).await?;
        if !outcome.success {
            warn!(
                url = %url,
                message = outcome.message.as_deref().unwrap_or(""),
                "Server rejected mutation"
            );
            return Err(ApiError::Application(outcome.message));
        }
        Ok(outcome)
    }
}

fn log_transport_error(url: &str, err: reqwest::Error) -> ApiError {
    error!(url = %url, "Request failed: {}", err);
    ApiError::from(err)
}

async fn decode_response<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(url = %url, status = status.as_u16(), "Non-success HTTP status");
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().await.map_err(|e| {
        error!(url = %url, "Undecodable response: {}", e);
        ApiError::Parse(e.to_string())
    })
}

#[async_trait]
impl ReviewApi for HttpReviewClient {
    async fn datasets(&self) -> Result<Vec<DatasetInfo>, ApiError> {
        self.get_json(routes::DATASETS).await
    }

    async fn dataset_qa(&self, dataset_id: DatasetId) -> Result<Vec<QaSummary>, ApiError> {
        self.get_json(&routes::dataset_qa(dataset_id)).await
    }

    async fn qa_detail(&self, qa_id: QaId) -> Result<QaDetail, ApiError> {
        self.get_json(&routes::qa_detail(qa_id)).await
    }

    async fn previous_feedback(&self, qa_id: QaId) -> Result<Vec<FeedbackRecord>, ApiError> {
        self.get_json(&routes::previous_feedback(qa_id)).await
    }

    async fn submit_feedback(
        &self,
        request: &SubmitFeedbackRequest,
    ) -> Result<MutationResponse, ApiError> {
        self.post_mutation(routes::SUBMIT_FEEDBACK, request).await
    }

    async fn save_gold_standard(
        &self,
        request: &SaveGoldStandardRequest,
    ) -> Result<MutationResponse, ApiError> {
        self.post_mutation(routes::SAVE_GOLD_STANDARD, request).await
    }
}
