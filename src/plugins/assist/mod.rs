//! AI assist: asks a model to fill in a task draft.

pub mod client;
pub mod types;

use crate::plugins::board::forms::TaskDraft;
use thiserror::Error;
use types::TaskSuggestion;

pub use client::GeminiClient;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("Task title is required")]
    TitleRequired,
    #[error("Request failed: {0}")]
    Request(reqwest::Error),
    #[error("Model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Model returned no content")]
    EmptyResponse,
    #[error("Failed to decode suggestion: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Merges a suggestion into a draft. Blank text fields are ignored, priority
/// always replaces, suggested sub-tasks are appended.
pub fn apply_suggestion(draft: &mut TaskDraft, suggestion: TaskSuggestion) {
    if !suggestion.description.trim().is_empty() {
        draft.description = suggestion.description;
    }
    if !suggestion.category.trim().is_empty() {
        draft.category = suggestion.category;
    }
    draft.priority = suggestion.priority;

    for title in &suggestion.sub_tasks {
        // blank titles are skipped
        let _ = draft.add_subtask(title);
    }
}
