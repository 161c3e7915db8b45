//! Terminal rendering adapter
//!
//! Maps [`ReviewEvent`]s to plain text lines. Holds no review state of its
//! own; everything it prints comes from the event.

use qarev_common::api::{FeedbackRecord, ScoreSet};
use qarev_common::{ReviewStatus, StatusCounters};

use crate::detail::GOLD_PLACEHOLDER;
use crate::events::{Control, GoldStandardDisplay, NotificationLevel, QaRow, ReviewEvent};

/// Characters of a question shown in the list
pub const QUESTION_PREVIEW_CHARS: usize = 100;

/// First `max_chars` characters of `text`, with "..." when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// List label of a Q&A pair
pub fn qa_label(qa_id: i64) -> String {
    format!("Q{}", qa_id)
}

pub fn status_badge(status: ReviewStatus) -> String {
    format!("[{}]", status.label())
}

/// Short badges for the scores that are set
pub fn score_badges(scores: &ScoreSet) -> Vec<String> {
    [
        ("Acc", scores.accuracy_score),
        ("Comp", scores.completeness_score),
        ("Clarity", scores.clarity_score),
        ("Relevance", scores.clinical_relevance_score),
    ]
    .into_iter()
    .filter_map(|(label, score)| score.map(|s| format!("{}: {}", label, s)))
    .collect()
}

pub fn counters_line(counters: &StatusCounters) -> String {
    ReviewStatus::ALL
        .iter()
        .map(|status| format!("{}: {}", status.label(), counters.get(*status)))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn row_line(row: &QaRow) -> String {
    format!(
        "  {:<6} {:<15} ({} feedback) {}",
        qa_label(row.qa_id),
        status_badge(row.status),
        row.feedback_count,
        preview(&row.question_text, QUESTION_PREVIEW_CHARS)
    )
}

fn gold_text(gold: &GoldStandardDisplay) -> &str {
    match gold {
        GoldStandardDisplay::Answer(text) => text,
        GoldStandardDisplay::Placeholder => GOLD_PLACEHOLDER,
    }
}

fn feedback_lines(record: &FeedbackRecord) -> Vec<String> {
    let submitted = record
        .submitted_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown date".to_string());

    let mut lines = vec![format!("  - {}", submitted)];
    if let Some(text) = record.text() {
        lines.push(format!("    {}", text));
    }
    let badges = score_badges(&record.scores);
    if !badges.is_empty() {
        lines.push(format!("    {}", badges.join("  ")));
    }
    lines
}

fn control_name(control: Control) -> &'static str {
    match control {
        Control::SubmitFeedback => "Submit feedback",
        Control::SaveGoldStandard => "Save gold standard",
    }
}

/// Text lines for one event; empty for events with nothing to show
pub fn render_event(event: &ReviewEvent) -> Vec<String> {
    match event {
        ReviewEvent::DatasetsLoaded { datasets } if datasets.is_empty() => {
            vec!["No datasets available".to_string()]
        }
        ReviewEvent::DatasetsLoaded { datasets } => {
            let mut lines = vec![format!("Datasets ({}):", datasets.len())];
            lines.extend(datasets.iter().map(|dataset| match &dataset.description {
                Some(description) if !description.is_empty() => {
                    format!("  #{} {} - {}", dataset.id, dataset.name, description)
                }
                _ => format!("  #{} {}", dataset.id, dataset.name),
            }));
            lines
        }
        ReviewEvent::DatasetSelected { dataset_id } => {
            vec![format!("Dataset #{}", dataset_id)]
        }
        ReviewEvent::QaListReplaced { rows, counters, .. } => {
            if rows.is_empty() {
                return vec!["No Q&A pairs in this dataset".to_string()];
            }
            let mut lines = vec![counters_line(counters)];
            lines.extend(rows.iter().map(row_line));
            lines
        }
        ReviewEvent::ItemSelected { qa_id } => vec![format!("> {}", qa_label(*qa_id))],
        ReviewEvent::SelectionCleared => vec!["No Q&A pair selected".to_string()],
        ReviewEvent::ItemStatusChanged {
            qa_id,
            old_status,
            new_status,
            feedback_count,
        } => vec![format!(
            "{}: {} -> {} ({} feedback)",
            qa_label(*qa_id),
            old_status.label(),
            new_status.label(),
            feedback_count
        )],
        ReviewEvent::CountersChanged { counters } => vec![counters_line(counters)],
        ReviewEvent::DetailUpdated {
            qa_id,
            question_text,
            system_answer_text,
            gold_standard,
        } => vec![
            format!("{} Question:", qa_label(*qa_id)),
            format!("  {}", question_text),
            "System answer:".to_string(),
            format!("  {}", system_answer_text),
            "Gold standard:".to_string(),
            format!("  {}", gold_text(gold_standard)),
        ],
        ReviewEvent::GoldStandardUpdated { gold_standard, .. } => {
            vec![format!("Gold standard: {}", gold_text(gold_standard))]
        }
        ReviewEvent::PreviousFeedbackUpdated { entries, .. } if entries.is_empty() => {
            vec!["No previous feedback".to_string()]
        }
        ReviewEvent::PreviousFeedbackUpdated { entries, .. } => {
            let mut lines = vec!["Your previous feedback:".to_string()];
            lines.extend(entries.iter().flat_map(feedback_lines));
            lines
        }
        ReviewEvent::EditModeChanged { editing: true, draft } => vec![format!(
            "Editing gold standard: {}",
            draft.as_deref().unwrap_or("")
        )],
        ReviewEvent::EditModeChanged { editing: false, .. } => Vec::new(),
        ReviewEvent::ControlStateChanged { control, busy } => {
            vec![control_line(*control, *busy)]
        }
        ReviewEvent::Notification { level, message, .. } => {
            let tag = match level {
                NotificationLevel::Success => "OK",
                NotificationLevel::Info => "INFO",
                NotificationLevel::Error => "ERROR",
            };
            vec![format!("[{}] {}", tag, message)]
        }
    }
}

/// Busy indicator line, for adapters that show control state
pub fn control_line(control: Control, busy: bool) -> String {
    if busy {
        format!("{}: working...", control_name(control))
    } else {
        format!("{}: ready", control_name(control))
    }
}
