//! Shared helpers for qarev-ui integration tests

#![allow(dead_code)]

pub mod fake_api;

use qarev_ui::{EventBus, ReviewEvent, ReviewSession};
use tokio::sync::broadcast::Receiver;

use fake_api::FakeReviewApi;

/// Session over `api` with a subscribed receiver
pub fn session_with(api: FakeReviewApi) -> (ReviewSession<FakeReviewApi>, Receiver<ReviewEvent>) {
    let events = EventBus::new(1024);
    let rx = events.subscribe();
    (ReviewSession::new(api, events), rx)
}

/// Everything emitted so far
pub fn drain(rx: &mut Receiver<ReviewEvent>) -> Vec<ReviewEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

/// Messages of all notifications emitted so far
pub fn notifications(rx: &mut Receiver<ReviewEvent>) -> Vec<String> {
    drain(rx)
        .into_iter()
        .filter_map(|event| match event {
            ReviewEvent::Notification { message, .. } => Some(message),
            _ => None,
        })
        .collect()
}
