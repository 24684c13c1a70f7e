//! Derived, read-only views over a project's tasks: search, label filters,
//! sorting and per-column grouping.

use super::types::{Column, ColumnWithTasks, SortOption, Task};
use std::cmp::Ordering;

pub const ALL_LABELS: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LabelFilter {
    #[default]
    All,
    Only(String),
}

impl LabelFilter {
    /// Maps the `"All"` sentinel used by selectors to [`LabelFilter::All`].
    pub fn from_selection(value: &str) -> Self {
        if value == ALL_LABELS {
            LabelFilter::All
        } else {
            LabelFilter::Only(value.to_string())
        }
    }

    fn matches(&self, label: &str) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Only(wanted) => wanted == label,
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, LabelFilter::All)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewOptions {
    pub search: String,
    pub project: LabelFilter,
    pub category: LabelFilter,
    pub sort: SortOption,
}

impl ViewOptions {
    /// Drag-and-drop works against the stored order, so any sort or label
    /// filter makes the board read-only. Search alone does not.
    pub fn is_read_only(&self) -> bool {
        self.sort != SortOption::None || !self.project.is_all() || !self.category.is_all()
    }
}

fn matches_search(task: &Task, query: &str) -> bool {
    task.title.to_lowercase().contains(query)
        || task.category.to_lowercase().contains(query)
        || task.project.to_lowercase().contains(query)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn compare(sort: SortOption, a: &Task, b: &Task) -> Ordering {
    match sort {
        SortOption::Date => b.created_at.cmp(&a.created_at),
        SortOption::Priority => b.priority.rank().cmp(&a.priority.rank()),
        SortOption::Category => compare_text(&a.category, &b.category),
        SortOption::Status => compare_text(&a.status, &b.status),
        SortOption::DueDate => match (a.due_date, b.due_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortOption::None => Ordering::Equal,
    }
}

/// Runs search, project-label filter, category filter and sort, in that order.
pub fn apply<'a>(tasks: &'a [Task], options: &ViewOptions) -> Vec<&'a Task> {
    let query = options.search.to_lowercase();

    let mut result: Vec<&Task> = tasks
        .iter()
        .filter(|task| query.is_empty() || matches_search(task, &query))
        .filter(|task| options.project.matches(&task.project))
        .filter(|task| options.category.matches(&task.category))
        .collect();

    if options.sort != SortOption::None {
        // stable: ties keep their filtered order
        result.sort_by(|a, b| compare(options.sort, a, b));
    }

    result
}

/// Selector entries: `"All"` followed by each distinct non-empty label in
/// first-seen order.
pub fn label_options<'a>(tasks: &'a [Task], label: impl Fn(&'a Task) -> &'a str) -> Vec<String> {
    let mut options = vec![ALL_LABELS.to_string()];
    for task in tasks {
        let value = label(task);
        if !value.is_empty() && !options.iter().skip(1).any(|o| o == value) {
            options.push(value.to_string());
        }
    }
    options
}

pub fn project_label_options(tasks: &[Task]) -> Vec<String> {
    label_options(tasks, |task| task.project.as_str())
}

pub fn category_options(tasks: &[Task]) -> Vec<String> {
    label_options(tasks, |task| task.category.as_str())
}

/// Board layout: each column with the view's tasks whose status matches it.
/// Tasks pointing at unknown columns are not shown.
pub fn group_by_column<'a>(columns: &'a [Column], view: &[&'a Task]) -> Vec<ColumnWithTasks<'a>> {
    columns
        .iter()
        .map(|column| {
            let tasks: Vec<&Task> = view
                .iter()
                .copied()
                .filter(|task| task.status == column.id)
                .collect();
            ColumnWithTasks {
                column,
                task_count: tasks.len(),
                tasks,
            }
        })
        .collect()
}
