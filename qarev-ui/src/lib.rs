//! qarev-ui - Q&A review client
//!
//! Client-side state for reviewing a dataset of medical question/answer
//! pairs: the Q&A list with per-item review status, the selected item's
//! detail panel, the feedback form and the submission flows that keep them
//! in sync with the review server.
//!
//! State modules never render. They publish [`events::ReviewEvent`]s on an
//! [`events::EventBus`]; [`render`] turns those into terminal output.

pub mod client;
pub mod detail;
pub mod error;
pub mod events;
pub mod feedback_form;
pub mod qa_list;
pub mod render;
pub mod selection;
pub mod session;
pub mod state;
mod submission;

pub use client::{ClientConfig, HttpReviewClient, ReviewApi};
pub use error::{ApiError, ErrorKind, ReviewError, ValidationError};
pub use events::{EventBus, ReviewEvent};
pub use session::ReviewSession;
pub use state::UiState;
