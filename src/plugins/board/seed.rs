//! Defaults written for new projects and first-time users.

use super::types::{Column, Priority, PriorityColor, PrioritySettings, Project, SubTask, Task};

pub const SEED_PROJECT_ID: &str = "intro-project-welcome";
pub const DEFAULT_COLUMN_COLOR: &str = "#94a3b8";
const DAY_MS: i64 = 86_400_000;

pub const PRESET_COLUMN_COLORS: [&str; 13] = [
    "#94a3b8", // gray
    "#ef4444", // red
    "#f97316", // orange
    "#f59e0b", // amber
    "#84cc16", // lime
    "#22c55e", // green
    "#10b981", // emerald
    "#06b6d4", // cyan
    "#3b82f6", // blue
    "#6366f1", // indigo
    "#8b5cf6", // violet
    "#d946ef", // fuchsia
    "#f43f5e", // rose
];

fn column(id: &str, title: &str, color: &str) -> Column {
    Column {
        id: id.to_string(),
        title: title.to_string(),
        color: color.to_string(),
    }
}

/// Columns every new project starts with.
pub fn template_columns() -> Vec<Column> {
    vec![
        column("Draft", "DRAFT", "#94a3b8"),
        column("To Do", "TO-DO", "#f59e0b"),
        column("On Going", "ON GOING", "#3b82f6"),
        column("Complete", "COMPLETE", "#22c55e"),
    ]
}

pub fn default_priority_settings() -> PrioritySettings {
    PrioritySettings {
        low: PriorityColor::new("#dbeafe", "#1e40af"),
        medium: PriorityColor::new("#fef3c7", "#92400e"),
        high: PriorityColor::new("#fee2e2", "#991b1b"),
    }
}

pub fn seed_project(now: i64) -> Project {
    Project {
        id: SEED_PROJECT_ID.to_string(),
        name: "Welcome to Koge Kanban".to_string(),
        description: "A quick tour of the board. Open it to start!".to_string(),
        created_at: now,
    }
}

fn seed_task(id: &str, title: &str, description: &str, status: &str, priority: Priority, category: &str, now: i64) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status: status.to_string(),
        priority,
        category: category.to_string(),
        project: "Welcome".to_string(),
        is_completed: false,
        created_at: now,
        due_date: None,
        media: None,
        assignee: None,
        sub_tasks: Vec::new(),
    }
}

/// Introductory tasks for the welcome project.
pub fn seed_tasks(now: i64) -> Vec<Task> {
    let welcome = seed_task(
        "intro-task-1",
        "Welcome! Read Me First",
        "## Welcome to Koge Kanban!\n\n* **Projects** keep workspaces apart.\n* **Columns** track each stage of work.\n* Your data is stored locally and synced to your own server when it is reachable.",
        "Draft",
        Priority::Low,
        "Onboarding",
        now,
    );

    let mut drag = seed_task(
        "intro-task-2",
        "Try Dragging This Card",
        "Drag this card onto the **ON GOING** column to change its status.",
        "To Do",
        Priority::High,
        "Interaction",
        now,
    );
    drag.due_date = Some(now + DAY_MS);

    let mut edit = seed_task(
        "intro-task-3",
        "Edit Task Details",
        "Open this card to edit descriptions, due dates, assignees and subtasks.",
        "To Do",
        Priority::Medium,
        "Features",
        now,
    );
    edit.sub_tasks = vec![
        SubTask {
            id: "st-1".to_string(),
            title: "Open this task".to_string(),
            is_completed: true,
        },
        SubTask {
            id: "st-2".to_string(),
            title: "Add a subtask".to_string(),
            is_completed: false,
        },
    ];

    let mut assigned = seed_task(
        "intro-task-4",
        "Assignees & Media",
        "Tasks can be assigned to people and carry an image link.",
        "On Going",
        Priority::Medium,
        "Features",
        now,
    );
    assigned.assignee = Some("New User".to_string());
    assigned.media =
        Some("https://images.unsplash.com/photo-1542626991-cbc4e32524cc?w=400&q=80".to_string());

    let mut done = seed_task(
        "intro-task-5",
        "Completed Task",
        "This task is marked as complete. Toggle it from the card or the editor.",
        "Complete",
        Priority::Low,
        "General",
        now,
    );
    done.is_completed = true;

    vec![welcome, drag, edit, assigned, done]
}
