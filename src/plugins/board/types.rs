use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Sort rank, higher first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Id of the column the task sits in.
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    /// Free-text label, unrelated to [`Project`].
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: i64,
    #[serde(default)]
    pub due_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityColor {
    pub bg: String,
    pub text: String,
}

impl PriorityColor {
    pub fn new(bg: &str, text: &str) -> Self {
        Self {
            bg: bg.to_string(),
            text: text.to_string(),
        }
    }
}

/// Display colours per priority level. Global, not per project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritySettings {
    #[serde(rename = "Low")]
    pub low: PriorityColor,
    #[serde(rename = "Medium")]
    pub medium: PriorityColor,
    #[serde(rename = "High")]
    pub high: PriorityColor,
}

impl PrioritySettings {
    pub fn get(&self, priority: Priority) -> &PriorityColor {
        match priority {
            Priority::Low => &self.low,
            Priority::Medium => &self.medium,
            Priority::High => &self.high,
        }
    }

    pub fn set(&mut self, priority: Priority, color: PriorityColor) {
        match priority {
            Priority::Low => self.low = color,
            Priority::Medium => self.medium = color,
            Priority::High => self.high = color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    Date,
    Priority,
    Category,
    Status,
    DueDate,
    #[default]
    None,
}

/// Board columns alongside the tasks that sit in each.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWithTasks<'a> {
    pub column: &'a Column,
    pub tasks: Vec<&'a Task>,
    pub task_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_order_and_parse() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(Priority::parse("high"), Some(Priority::High));
        assert_eq!(Priority::parse(" Low "), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn test_task_json_uses_camel_case() {
        let raw = json!({
            "id": "t1",
            "title": "Fix bug",
            "description": "",
            "status": "To Do",
            "priority": "High",
            "category": "Backend",
            "project": "API",
            "isCompleted": false,
            "createdAt": 10,
            "dueDate": null,
            "subTasks": [{"id": "s1", "title": "repro", "isCompleted": true}]
        });

        let task: Task = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, None);
        assert!(task.sub_tasks[0].is_completed);

        assert_eq!(serde_json::to_value(&task).unwrap(), raw);
    }

    #[test]
    fn test_priority_settings_keys() {
        let raw = json!({
            "Low": {"bg": "#1", "text": "#2"},
            "Medium": {"bg": "#3", "text": "#4"},
            "High": {"bg": "#5", "text": "#6"}
        });
        let mut settings: PrioritySettings = serde_json::from_value(raw).unwrap();
        assert_eq!(settings.get(Priority::Medium).bg, "#3");

        settings.set(Priority::High, PriorityColor::new("#000", "#fff"));
        assert_eq!(settings.high.text, "#fff");
    }

    #[test]
    fn test_sort_option_names() {
        let parsed: SortOption = serde_json::from_value(json!("dueDate")).unwrap();
        assert_eq!(parsed, SortOption::DueDate);
        assert_eq!(serde_json::to_value(SortOption::None).unwrap(), json!("none"));
    }
}
