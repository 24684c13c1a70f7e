//! Editor drafts and the checks applied before they become board records.

use super::helpers::new_id;
use super::seed::DEFAULT_COLUMN_COLOR;
use super::types::{Column, Priority, SubTask, Task};
use chrono::NaiveDate;
use thiserror::Error;

/// Largest decoded payload accepted for an inline (data URL) image.
pub const MAX_INLINE_MEDIA_BYTES: usize = 2 * 1024 * 1024;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_PROJECT_LABEL: &str = "Main Project";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Name is required")]
    NameRequired,
    #[error("Task needs a column")]
    StatusRequired,
    #[error("Invalid due date: {0}")]
    InvalidDueDate(String),
    #[error("Image is too large for local storage ({size} bytes, max {limit})")]
    MediaTooLarge { size: usize, limit: usize },
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parses a `YYYY-MM-DD` date input into UTC-midnight epoch millis.
pub fn parse_due_date(input: &str) -> Result<Option<i64>, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDueDate(input.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| FormError::InvalidDueDate(input.to_string()))?;
    Ok(Some(midnight.and_utc().timestamp_millis()))
}

/// Inverse of [`parse_due_date`], for pre-filling the editor.
pub fn format_due_date(due_date: Option<i64>) -> String {
    due_date
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Approximate decoded size of an inline `data:` URL. Plain links are free.
fn inline_media_size(media: &str) -> Option<usize> {
    let rest = media.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(',')?;
    Some(payload.len() / 4 * 3)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    /// Set when editing an existing task.
    pub id: Option<String>,
    pub created_at: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Priority,
    pub category: String,
    pub project: String,
    pub assignee: String,
    pub is_completed: bool,
    /// `YYYY-MM-DD` or empty.
    pub due_date: String,
    pub media: String,
    pub sub_tasks: Vec<SubTask>,
}

impl TaskDraft {
    /// Blank draft. Status is `default_status` when given, else the first column.
    pub fn new(columns: &[Column], default_status: Option<&str>) -> Self {
        let status = default_status
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| columns.first().map(|c| c.id.clone()))
            .unwrap_or_default();

        Self {
            id: None,
            created_at: None,
            title: String::new(),
            description: String::new(),
            status,
            priority: Priority::Medium,
            category: DEFAULT_CATEGORY.to_string(),
            project: DEFAULT_PROJECT_LABEL.to_string(),
            assignee: String::new(),
            is_completed: false,
            due_date: String::new(),
            media: String::new(),
            sub_tasks: Vec::new(),
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id.clone()),
            created_at: Some(task.created_at),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.clone(),
            priority: task.priority,
            category: task.category.clone(),
            project: task.project.clone(),
            assignee: task.assignee.clone().unwrap_or_default(),
            is_completed: task.is_completed,
            due_date: format_due_date(task.due_date),
            media: task.media.clone().unwrap_or_default(),
            sub_tasks: task.sub_tasks.clone(),
        }
    }

    pub fn add_subtask(&mut self, title: &str) -> Result<(), FormError> {
        let title = non_blank(title).ok_or(FormError::TitleRequired)?;
        self.sub_tasks.push(SubTask {
            id: new_id(),
            title,
            is_completed: false,
        });
        Ok(())
    }

    /// Validates and builds the task. New drafts get a fresh id and `now`.
    pub fn into_task(self, now: i64) -> Result<Task, FormError> {
        let title = non_blank(&self.title).ok_or(FormError::TitleRequired)?;
        if self.status.trim().is_empty() {
            return Err(FormError::StatusRequired);
        }
        let due_date = parse_due_date(&self.due_date)?;

        if let Some(size) = inline_media_size(&self.media) {
            if size > MAX_INLINE_MEDIA_BYTES {
                return Err(FormError::MediaTooLarge {
                    size,
                    limit: MAX_INLINE_MEDIA_BYTES,
                });
            }
        }

        Ok(Task {
            id: self.id.unwrap_or_else(new_id),
            title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            category: self.category.trim().to_string(),
            project: self.project.trim().to_string(),
            is_completed: self.is_completed,
            created_at: self.created_at.unwrap_or(now),
            due_date,
            media: non_blank(&self.media),
            assignee: non_blank(&self.assignee),
            sub_tasks: self.sub_tasks,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDraft {
    pub id: Option<String>,
    pub title: String,
    pub color: String,
}

impl Default for ColumnDraft {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            color: DEFAULT_COLUMN_COLOR.to_string(),
        }
    }
}

impl ColumnDraft {
    pub fn from_column(column: &Column) -> Self {
        Self {
            id: Some(column.id.clone()),
            title: column.title.clone(),
            color: column.color.clone(),
        }
    }

    pub fn into_column(self) -> Result<Column, FormError> {
        let title = non_blank(&self.title).ok_or(FormError::TitleRequired)?;
        let color = non_blank(&self.color).unwrap_or_else(|| DEFAULT_COLUMN_COLOR.to_string());

        Ok(Column {
            id: self.id.unwrap_or_else(new_id),
            title,
            color,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectDraft {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
}

impl ProjectDraft {
    /// Returns the validated `(name, description)` pair.
    pub fn validate(&self) -> Result<(String, String), FormError> {
        let name = non_blank(&self.name).ok_or(FormError::NameRequired)?;
        Ok((name, self.description.trim().to_string()))
    }
}
