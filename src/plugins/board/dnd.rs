//! Maps a finished drag gesture to a board mutation.

use super::helpers::{column_index, find_column, find_task};
use super::types::{Column, Task};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragKind {
    Task,
    Column,
}

/// What the drag layer reports when the pointer is released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEnd {
    pub kind: DragKind,
    pub active_id: String,
    /// Id of the column or task under the pointer, if any.
    pub over_id: Option<String>,
}

impl DragEnd {
    pub fn task(active_id: &str, over_id: Option<&str>) -> Self {
        Self {
            kind: DragKind::Task,
            active_id: active_id.to_string(),
            over_id: over_id.map(str::to_string),
        }
    }

    pub fn column(active_id: &str, over_id: Option<&str>) -> Self {
        Self {
            kind: DragKind::Column,
            active_id: active_id.to_string(),
            over_id: over_id.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    MoveTask { task_id: String, to_column: String },
    ReorderColumn { from: usize, to: usize },
    Ignore,
}

/// Resolves a drop against the current columns and tasks.
pub fn resolve(event: &DragEnd, columns: &[Column], tasks: &[Task]) -> DropAction {
    let Some(over_id) = event.over_id.as_deref() else {
        return DropAction::Ignore;
    };

    match event.kind {
        DragKind::Column => {
            if event.active_id == over_id {
                return DropAction::Ignore;
            }
            match (column_index(columns, &event.active_id), column_index(columns, over_id)) {
                (Some(from), Some(to)) => DropAction::ReorderColumn { from, to },
                _ => DropAction::Ignore,
            }
        }
        DragKind::Task => {
            let Some(task) = find_task(tasks, &event.active_id) else {
                return DropAction::Ignore;
            };

            let target = if find_column(columns, over_id).is_some() {
                over_id
            } else {
                match find_task(tasks, over_id) {
                    Some(over_task) => over_task.status.as_str(),
                    None => return DropAction::Ignore,
                }
            };

            if find_column(columns, target).is_none() || target == task.status {
                return DropAction::Ignore;
            }

            DropAction::MoveTask {
                task_id: task.id.clone(),
                to_column: target.to_string(),
            }
        }
    }
}

/// Removes the item at `from` and reinserts it at `to`; every other
/// element keeps its relative order.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
