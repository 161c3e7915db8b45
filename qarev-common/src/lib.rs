//! # qarev Common Library
//!
//! Shared code for the Q&A review client:
//! - API request/response types for the review server
//! - Review status classification and per-status counters
//! - Configuration loading
//! - Timestamp utilities

pub mod api;
pub mod config;
pub mod error;
pub mod status;
pub mod time;

pub use error::{Error, Result};
pub use status::{ReviewAction, ReviewStatus, StatusCounters};
