//! Review status classification
//!
//! A Q&A pair's review status is derived from two independent facts: whether
//! any feedback has been submitted, and whether a gold standard answer
//! exists. [`classify`] is the only place that mapping lives; the
//! post-submission transition table in [`ReviewStatus::after`] is expressed in
//! terms of it.

use serde::{Deserialize, Serialize};

/// Derived review state of a Q&A pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// No feedback and no gold standard
    Pending,
    /// Gold standard authored, no feedback yet
    GoldStandard,
    /// Feedback submitted, no gold standard yet
    Feedback,
    /// Both feedback and gold standard present
    Completed,
}

/// Mutation a reviewer can apply to a Q&A pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    /// Scores and/or text feedback submitted
    Feedback,
    /// Gold standard answer saved
    Gold,
}

/// Derive a review status from feedback count and gold standard presence
///
/// Total over all inputs.
///
/// # Examples
/// ```
/// use qarev_common::status::{classify, ReviewStatus};
///
/// assert_eq!(classify(0, false), ReviewStatus::Pending);
/// assert_eq!(classify(0, true), ReviewStatus::GoldStandard);
/// assert_eq!(classify(3, false), ReviewStatus::Feedback);
/// assert_eq!(classify(2, true), ReviewStatus::Completed);
/// ```
pub fn classify(feedback_count: u32, has_gold_standard: bool) -> ReviewStatus {
    match (feedback_count > 0, has_gold_standard) {
        (false, false) => ReviewStatus::Pending,
        (false, true) => ReviewStatus::GoldStandard,
        (true, false) => ReviewStatus::Feedback,
        (true, true) => ReviewStatus::Completed,
    }
}

impl ReviewStatus {
    /// All statuses, in counter display order
    pub const ALL: [ReviewStatus; 4] = [
        ReviewStatus::Pending,
        ReviewStatus::GoldStandard,
        ReviewStatus::Feedback,
        ReviewStatus::Completed,
    ];

    /// Whether the status implies at least one feedback submission
    pub fn has_feedback(self) -> bool {
        matches!(self, ReviewStatus::Feedback | ReviewStatus::Completed)
    }

    /// Whether the status implies a gold standard answer
    pub fn has_gold_standard(self) -> bool {
        matches!(self, ReviewStatus::GoldStandard | ReviewStatus::Completed)
    }

    /// Status after applying `action`, or `None` when the action changes nothing
    ///
    /// | current      | feedback  | gold         |
    /// |--------------|-----------|--------------|
    /// | Pending      | Feedback  | GoldStandard |
    /// | GoldStandard | Completed | -            |
    /// | Feedback     | -         | Completed    |
    /// | Completed    | -         | -            |
    ///
    /// Resubmission by the same reviewer never produces a transition, so
    /// counters are not double-counted.
    pub fn after(self, action: ReviewAction) -> Option<ReviewStatus> {
        let (feedback, gold) = match action {
            ReviewAction::Feedback if self.has_feedback() => return None,
            ReviewAction::Gold if self.has_gold_standard() => return None,
            ReviewAction::Feedback => (true, self.has_gold_standard()),
            ReviewAction::Gold => (self.has_feedback(), true),
        };
        Some(classify(u32::from(feedback), gold))
    }

    /// Badge label shown in the Q&A list
    pub fn label(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::GoldStandard => "Gold Standard",
            ReviewStatus::Feedback => "Feedback",
            ReviewStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewAction::Feedback => write!(f, "feedback"),
            ReviewAction::Gold => write!(f, "gold"),
        }
    }
}

/// Number of Q&A pairs in each status bucket
///
/// Recomputed from scratch when a list is loaded, then adjusted
/// incrementally by [`StatusCounters::shift`]. Every item is in exactly one
/// bucket, so [`StatusCounters::total`] equals the list length.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounters {
    pub pending: usize,
    pub gold: usize,
    pub feedback: usize,
    pub completed: usize,
}

impl StatusCounters {
    /// Count statuses from scratch
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ReviewStatus>,
    {
        let mut counters = Self::default();
        for status in statuses {
            *counters.bucket_mut(status) += 1;
        }
        counters
    }

    /// Count for a single status
    pub fn get(&self, status: ReviewStatus) -> usize {
        match status {
            ReviewStatus::Pending => self.pending,
            ReviewStatus::GoldStandard => self.gold,
            ReviewStatus::Feedback => self.feedback,
            ReviewStatus::Completed => self.completed,
        }
    }

    /// Sum of all four buckets
    pub fn total(&self) -> usize {
        self.pending + self.gold + self.feedback + self.completed
    }

    /// Move one item from `from` to `to`
    ///
    /// Both sides change in the same call. The source never drops below zero.
    pub fn shift(&mut self, from: ReviewStatus, to: ReviewStatus) {
        let source = self.bucket_mut(from);
        *source = source.saturating_sub(1);
        *self.bucket_mut(to) += 1;
    }

    fn bucket_mut(&mut self, status: ReviewStatus) -> &mut usize {
        match status {
            ReviewStatus::Pending => &mut self.pending,
            ReviewStatus::GoldStandard => &mut self.gold,
            ReviewStatus::Feedback => &mut self.feedback,
            ReviewStatus::Completed => &mut self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_table() {
        assert_eq!(classify(0, false), ReviewStatus::Pending);
        assert_eq!(classify(0, true), ReviewStatus::GoldStandard);
        assert_eq!(classify(3, false), ReviewStatus::Feedback);
        assert_eq!(classify(2, true), ReviewStatus::Completed);
        assert_eq!(classify(1, false), ReviewStatus::Feedback);
        assert_eq!(classify(u32::MAX, true), ReviewStatus::Completed);
    }

    #[test]
    fn test_classify_agrees_with_status_facts() {
        for count in [0u32, 1, 7] {
            for gold in [false, true] {
                let status = classify(count, gold);
                assert_eq!(status.has_feedback(), count > 0);
                assert_eq!(status.has_gold_standard(), gold);
            }
        }
    }

    #[test]
    fn test_transition_table() {
        use ReviewAction as A;
        use ReviewStatus as S;

        assert_eq!(S::Pending.after(A::Feedback), Some(S::Feedback));
        assert_eq!(S::Pending.after(A::Gold), Some(S::GoldStandard));
        assert_eq!(S::GoldStandard.after(A::Feedback), Some(S::Completed));
        assert_eq!(S::GoldStandard.after(A::Gold), None);
        assert_eq!(S::Feedback.after(A::Feedback), None);
        assert_eq!(S::Feedback.after(A::Gold), Some(S::Completed));
        assert_eq!(S::Completed.after(A::Feedback), None);
        assert_eq!(S::Completed.after(A::Gold), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ReviewStatus::Pending.label(), "Pending");
        assert_eq!(ReviewStatus::GoldStandard.to_string(), "Gold Standard");
        assert_eq!(ReviewStatus::Feedback.label(), "Feedback");
        assert_eq!(ReviewStatus::Completed.label(), "Completed");
    }

    #[test]
    fn test_counters_from_statuses() {
        let counters = StatusCounters::from_statuses([
            ReviewStatus::Pending,
            ReviewStatus::Pending,
            ReviewStatus::Completed,
            ReviewStatus::Feedback,
        ]);
        assert_eq!(counters.pending, 2);
        assert_eq!(counters.gold, 0);
        assert_eq!(counters.feedback, 1);
        assert_eq!(counters.completed, 1);
        assert_eq!(counters.total(), 4);
    }

    #[test]
    fn test_counters_shift_preserves_total() {
        let mut counters = StatusCounters {
            pending: 1,
            gold: 0,
            feedback: 2,
            completed: 0,
        };
        counters.shift(ReviewStatus::Feedback, ReviewStatus::Completed);
        assert_eq!(counters.feedback, 1);
        assert_eq!(counters.completed, 1);
        assert_eq!(counters.get(ReviewStatus::Completed), 1);
        assert_eq!(counters.total(), 3);
    }

    #[test]
    fn test_counters_shift_never_underflows() {
        let mut counters = StatusCounters::default();
        counters.shift(ReviewStatus::Pending, ReviewStatus::Feedback);
        assert_eq!(counters.pending, 0);
        assert_eq!(counters.feedback, 1);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ReviewStatus::GoldStandard).unwrap();
        assert_eq!(json, "\"gold_standard\"");
        let action: ReviewAction = serde_json::from_str("\"gold\"").unwrap();
        assert_eq!(action, ReviewAction::Gold);
    }
}
