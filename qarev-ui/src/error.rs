//! Error types for qarev-ui
//!
//! Every error here is recoverable: flows catch them at the call site, show
//! a transient notification and leave the session usable.

use thiserror::Error;

/// Failure of a single round trip to the review server
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never reached the server or no response came back
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Server answered `success: false`
    #[error("Application error: {}", .0.as_deref().unwrap_or("no message"))]
    Application(Option<String>),
}

/// Coarse classification shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport-level problem or an unusable response
    NetworkFailure,
    /// The server processed the request and rejected it
    ApplicationError,
}

impl ApiError {
    /// Classify for user-facing handling
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Application(_) => ErrorKind::ApplicationError,
            ApiError::Network(_) | ApiError::Status { .. } | ApiError::Parse(_) => {
                ErrorKind::NetworkFailure
            }
        }
    }

    /// Message to show the reviewer
    ///
    /// Only an application error carries a server message worth showing;
    /// everything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Application(Some(message)) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Input rejected before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Gold standard answer cannot be empty")]
    EmptyGoldStandard,

    #[error("{field} must be between 1 and 5 (got {value})")]
    ScoreOutOfRange { field: &'static str, value: u8 },

    #[error("No Q&A pair selected")]
    NoActiveItem,

    #[error("Gold standard editor is not open")]
    EditorClosed,
}

/// Error returned by session operations
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
