//! In-memory board state. All mutation goes through the transitions below;
//! each reports which persisted keys it dirtied.

use super::dnd::{self, DragEnd, DropAction};
use super::forms::{ColumnDraft, FormError, ProjectDraft, TaskDraft};
use super::helpers::{
    column_index, find_column, find_column_mut, find_project, find_project_mut, find_subtask_mut,
    find_task, find_task_mut, new_id,
};
use super::seed::{default_priority_settings, template_columns};
use super::types::{Column, ColumnWithTasks, Priority, PriorityColor, PrioritySettings, Project, SubTask, Task};
use super::view::{self, ViewOptions};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoardError {
    #[error("No project is open")]
    NoBoardOpen,
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Subtask not found: {0}")]
    SubTaskNotFound(String),
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("You must have at least one column")]
    LastColumn,
    #[error("Nothing is awaiting confirmation")]
    NothingPending,
    #[error(transparent)]
    Form(#[from] FormError),
}

/// Which persisted keys a transition dirtied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub projects: bool,
    pub tasks: bool,
    pub columns: bool,
    pub settings: bool,
}

impl Changes {
    pub const NONE: Changes = Changes {
        projects: false,
        tasks: false,
        columns: false,
        settings: false,
    };
    pub const PROJECTS: Changes = Changes {
        projects: true,
        ..Changes::NONE
    };
    pub const TASKS: Changes = Changes {
        tasks: true,
        ..Changes::NONE
    };
    pub const COLUMNS: Changes = Changes {
        columns: true,
        ..Changes::NONE
    };
    pub const SETTINGS: Changes = Changes {
        settings: true,
        ..Changes::NONE
    };

    pub fn merge(self, other: Changes) -> Changes {
        Changes {
            projects: self.projects || other.projects,
            tasks: self.tasks || other.tasks,
            columns: self.columns || other.columns,
            settings: self.settings || other.settings,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Changes::NONE
    }
}

/// A destructive action waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDeletion {
    Task(String),
    Column(String),
    Project(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectSave {
    Created(Project),
    Updated(Project),
}

#[derive(Debug, Clone)]
pub struct BoardState {
    projects: Vec<Project>,
    current_project: Option<String>,
    tasks: Vec<Task>,
    columns: Vec<Column>,
    priority_settings: PrioritySettings,
    pending: Option<PendingDeletion>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            current_project: None,
            tasks: Vec::new(),
            columns: Vec::new(),
            priority_settings: default_priority_settings(),
            pending: None,
        }
    }
}

impl BoardState {
    pub fn new(projects: Vec<Project>, priority_settings: Option<PrioritySettings>) -> Self {
        Self {
            projects,
            priority_settings: priority_settings.unwrap_or_else(default_priority_settings),
            ..Self::default()
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current_project
            .as_deref()
            .and_then(|id| find_project(&self.projects, id))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn priority_settings(&self) -> &PrioritySettings {
        &self.priority_settings
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref()
    }

    pub fn view(&self, options: &ViewOptions) -> Vec<&Task> {
        view::apply(&self.tasks, options)
    }

    pub fn board(&self, options: &ViewOptions) -> Vec<ColumnWithTasks<'_>> {
        view::group_by_column(&self.columns, &self.view(options))
    }

    fn require_board(&self) -> Result<(), BoardError> {
        if self.current_project.is_some() {
            Ok(())
        } else {
            Err(BoardError::NoBoardOpen)
        }
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Makes `project_id` the open board. Empty or missing columns fall
    /// back to the template, which then needs persisting.
    pub fn open_board(
        &mut self,
        project_id: &str,
        tasks: Option<Vec<Task>>,
        columns: Option<Vec<Column>>,
    ) -> Result<Changes, BoardError> {
        if find_project(&self.projects, project_id).is_none() {
            return Err(BoardError::ProjectNotFound(project_id.to_string()));
        }

        let (columns, changes) = match columns {
            Some(columns) if !columns.is_empty() => (columns, Changes::NONE),
            _ => (template_columns(), Changes::COLUMNS),
        };

        self.current_project = Some(project_id.to_string());
        self.tasks = tasks.unwrap_or_default();
        self.columns = columns;
        self.pending = None;

        tracing::debug!(
            target: "board",
            project_id,
            tasks = self.tasks.len(),
            columns = self.columns.len(),
            "Board opened"
        );
        Ok(changes)
    }

    pub fn close_board(&mut self) {
        self.current_project = None;
        self.tasks.clear();
        self.columns.clear();
        self.pending = None;
    }

    /// Creates the project, or updates name/description when the id exists.
    pub fn save_project(&mut self, draft: ProjectDraft, now: i64) -> Result<ProjectSave, BoardError> {
        let (name, description) = draft.validate()?;

        if let Some(existing) = draft
            .id
            .as_deref()
            .and_then(|id| find_project_mut(&mut self.projects, id))
        {
            existing.name = name;
            existing.description = description;
            return Ok(ProjectSave::Updated(existing.clone()));
        }

        let project = Project {
            id: draft.id.unwrap_or_else(new_id),
            name,
            description,
            created_at: now,
        };
        self.projects.push(project.clone());
        tracing::info!(target: "board", project_id = %project.id, "Project created");
        Ok(ProjectSave::Created(project))
    }

    fn remove_project(&mut self, id: &str) -> Result<Changes, BoardError> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() == before {
            return Err(BoardError::ProjectNotFound(id.to_string()));
        }

        if self.current_project.as_deref() == Some(id) {
            self.close_board();
        }
        tracing::info!(target: "board", project_id = id, "Project removed");
        Ok(Changes::PROJECTS)
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub fn add_task(&mut self, draft: TaskDraft, now: i64) -> Result<Changes, BoardError> {
        self.require_board()?;
        let mut draft = draft;
        draft.id = None;
        draft.created_at = None;
        self.tasks.push(draft.into_task(now)?);
        Ok(Changes::TASKS)
    }

    /// Replaces the task named by the draft's id, keeping its creation time.
    pub fn update_task(&mut self, draft: TaskDraft) -> Result<Changes, BoardError> {
        self.require_board()?;
        let id = draft.id.clone().ok_or_else(|| BoardError::TaskNotFound(String::new()))?;
        let slot = find_task_mut(&mut self.tasks, &id).ok_or(BoardError::TaskNotFound(id))?;

        let created_at = slot.created_at;
        *slot = draft.into_task(created_at)?;
        slot.created_at = created_at;
        Ok(Changes::TASKS)
    }

    /// What the task editor submits: update when the draft carries an id.
    pub fn save_task(&mut self, draft: TaskDraft, now: i64) -> Result<Changes, BoardError> {
        if draft.id.is_some() {
            self.update_task(draft)
        } else {
            self.add_task(draft, now)
        }
    }

    pub fn toggle_task_completed(&mut self, task_id: &str) -> Result<Changes, BoardError> {
        let task = find_task_mut(&mut self.tasks, task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        task.is_completed = !task.is_completed;
        Ok(Changes::TASKS)
    }

    /// Sets a task's status. Moving into its current column is a no-op.
    pub fn move_task(&mut self, task_id: &str, to_column: &str) -> Result<Changes, BoardError> {
        if find_column(&self.columns, to_column).is_none() {
            return Err(BoardError::ColumnNotFound(to_column.to_string()));
        }

        let task = find_task_mut(&mut self.tasks, task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        if task.status == to_column {
            return Ok(Changes::NONE);
        }

        tracing::debug!(target: "board", task_id, from = %task.status, to = to_column, "Task moved");
        task.status = to_column.to_string();
        Ok(Changes::TASKS)
    }

    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> Result<Changes, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FormError::TitleRequired.into());
        }

        let task = find_task_mut(&mut self.tasks, task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        task.sub_tasks.push(SubTask {
            id: new_id(),
            title: title.to_string(),
            is_completed: false,
        });
        Ok(Changes::TASKS)
    }

    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<Changes, BoardError> {
        let task = find_task_mut(&mut self.tasks, task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        let subtask = find_subtask_mut(task, subtask_id)
            .ok_or_else(|| BoardError::SubTaskNotFound(subtask_id.to_string()))?;
        subtask.is_completed = !subtask.is_completed;
        Ok(Changes::TASKS)
    }

    pub fn remove_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<Changes, BoardError> {
        let task = find_task_mut(&mut self.tasks, task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        let before = task.sub_tasks.len();
        task.sub_tasks.retain(|s| s.id != subtask_id);
        if task.sub_tasks.len() == before {
            return Err(BoardError::SubTaskNotFound(subtask_id.to_string()));
        }
        Ok(Changes::TASKS)
    }

    fn remove_task(&mut self, task_id: &str) -> Result<Changes, BoardError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        if self.tasks.len() == before {
            return Err(BoardError::TaskNotFound(task_id.to_string()));
        }
        Ok(Changes::TASKS)
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    pub fn add_column(&mut self, draft: ColumnDraft) -> Result<Changes, BoardError> {
        self.require_board()?;
        let mut draft = draft;
        draft.id = None;
        self.columns.push(draft.into_column()?);
        Ok(Changes::COLUMNS)
    }

    /// Updates title and colour. The id never changes, so tasks stay put.
    pub fn update_column(&mut self, draft: ColumnDraft) -> Result<Changes, BoardError> {
        self.require_board()?;
        let id = draft.id.clone().ok_or_else(|| BoardError::ColumnNotFound(String::new()))?;
        let slot = find_column_mut(&mut self.columns, &id).ok_or(BoardError::ColumnNotFound(id))?;
        *slot = draft.into_column()?;
        Ok(Changes::COLUMNS)
    }

    pub fn save_column(&mut self, draft: ColumnDraft) -> Result<Changes, BoardError> {
        if draft.id.is_some() {
            self.update_column(draft)
        } else {
            self.add_column(draft)
        }
    }

    /// Moves `active_id` to the index currently held by `over_id`.
    pub fn move_column(&mut self, active_id: &str, over_id: &str) -> Result<Changes, BoardError> {
        let from = column_index(&self.columns, active_id)
            .ok_or_else(|| BoardError::ColumnNotFound(active_id.to_string()))?;
        let to = column_index(&self.columns, over_id)
            .ok_or_else(|| BoardError::ColumnNotFound(over_id.to_string()))?;
        if from == to {
            return Ok(Changes::NONE);
        }

        dnd::move_item(&mut self.columns, from, to);
        Ok(Changes::COLUMNS)
    }

    /// Removes a column and moves its tasks to the first remaining column,
    /// in one step. Refused when it is the last column.
    pub fn delete_column(&mut self, column_id: &str) -> Result<Changes, BoardError> {
        let index = column_index(&self.columns, column_id)
            .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))?;
        if self.columns.len() <= 1 {
            return Err(BoardError::LastColumn);
        }

        self.columns.remove(index);
        let fallback = self.columns[0].id.clone();

        let mut migrated = 0;
        for task in self.tasks.iter_mut().filter(|t| t.status == column_id) {
            task.status = fallback.clone();
            migrated += 1;
        }

        tracing::info!(
            target: "board",
            column_id,
            fallback = %fallback,
            migrated,
            "Column deleted"
        );
        Ok(Changes::COLUMNS.merge(Changes::TASKS))
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Applies a drop. Ignored entirely while `options` make the board read-only.
    pub fn apply_drop(&mut self, event: &DragEnd, options: &ViewOptions) -> Result<Changes, BoardError> {
        if options.is_read_only() {
            tracing::debug!(target: "board", "Drop ignored, board is read-only");
            return Ok(Changes::NONE);
        }

        match dnd::resolve(event, &self.columns, &self.tasks) {
            DropAction::MoveTask { task_id, to_column } => self.move_task(&task_id, &to_column),
            DropAction::ReorderColumn { from, to } => {
                dnd::move_item(&mut self.columns, from, to);
                Ok(Changes::COLUMNS)
            }
            DropAction::Ignore => Ok(Changes::NONE),
        }
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn set_priority_settings(&mut self, settings: PrioritySettings) -> Changes {
        self.priority_settings = settings;
        Changes::SETTINGS
    }

    pub fn set_priority_color(&mut self, priority: Priority, color: PriorityColor) -> Changes {
        self.priority_settings.set(priority, color);
        Changes::SETTINGS
    }

    pub fn reset_priority_settings(&mut self) -> Changes {
        self.priority_settings = default_priority_settings();
        Changes::SETTINGS
    }

    // ------------------------------------------------------------------
    // Confirmation-gated deletion
    // ------------------------------------------------------------------

    pub fn request_delete_task(&mut self, task_id: &str) -> Result<(), BoardError> {
        if find_task(&self.tasks, task_id).is_none() {
            return Err(BoardError::TaskNotFound(task_id.to_string()));
        }
        self.pending = Some(PendingDeletion::Task(task_id.to_string()));
        Ok(())
    }

    pub fn request_delete_column(&mut self, column_id: &str) -> Result<(), BoardError> {
        if find_column(&self.columns, column_id).is_none() {
            return Err(BoardError::ColumnNotFound(column_id.to_string()));
        }
        if self.columns.len() <= 1 {
            return Err(BoardError::LastColumn);
        }
        self.pending = Some(PendingDeletion::Column(column_id.to_string()));
        Ok(())
    }

    pub fn request_delete_project(&mut self, project_id: &str) -> Result<(), BoardError> {
        if find_project(&self.projects, project_id).is_none() {
            return Err(BoardError::ProjectNotFound(project_id.to_string()));
        }
        self.pending = Some(PendingDeletion::Project(project_id.to_string()));
        Ok(())
    }

    pub fn cancel_deletion(&mut self) {
        self.pending = None;
    }

    /// Executes the pending deletion and returns it alongside the changes.
    pub fn confirm_deletion(&mut self) -> Result<(Changes, PendingDeletion), BoardError> {
        let pending = self.pending.take().ok_or(BoardError::NothingPending)?;

        let changes = match &pending {
            PendingDeletion::Task(id) => self.remove_task(id)?,
            PendingDeletion::Column(id) => self.delete_column(id)?,
            PendingDeletion::Project(id) => self.remove_project(id)?,
        };
        Ok((changes, pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::board::seed::SEED_PROJECT_ID;
    use crate::plugins::board::types::SortOption;

    fn column(id: &str) -> Column {
        Column {
            id: id.to_string(),
            title: id.to_uppercase(),
            color: "#94a3b8".to_string(),
        }
    }

    fn task(id: &str, status: &str) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            status: status.to_string(),
            priority: Priority::Medium,
            category: "General".to_string(),
            project: "Main Project".to_string(),
            is_completed: false,
            created_at: 0,
            due_date: None,
            media: None,
            assignee: None,
            sub_tasks: Vec::new(),
        }
    }

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            created_at: 0,
        }
    }

    fn board(columns: &[&str], tasks: Vec<Task>) -> BoardState {
        let mut state = BoardState::new(vec![project("p1")], None);
        state
            .open_board("p1", Some(tasks), Some(columns.iter().map(|c| column(c)).collect()))
            .unwrap();
        state
    }

    fn statuses(state: &BoardState) -> Vec<(String, String)> {
        state
            .tasks()
            .iter()
            .map(|t| (t.id.clone(), t.status.clone()))
            .collect()
    }

    #[test]
    fn test_open_board_falls_back_to_template_columns() {
        let mut state = BoardState::new(vec![project("p1")], None);

        let changes = state.open_board("p1", None, Some(Vec::new())).unwrap();
        assert_eq!(changes, Changes::COLUMNS);
        assert_eq!(state.columns(), template_columns().as_slice());
        assert!(state.tasks().is_empty());

        assert_eq!(
            state.open_board("missing", None, None),
            Err(BoardError::ProjectNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_delete_column_migrates_tasks_to_first_remaining() {
        let mut state = board(
            &["Draft", "ToDo", "Doing", "Done"],
            vec![task("a", "ToDo"), task("b", "Doing"), task("c", "ToDo")],
        );

        let changes = state.delete_column("ToDo").unwrap();
        assert!(changes.tasks && changes.columns);
        assert_eq!(
            statuses(&state),
            vec![
                ("a".to_string(), "Draft".to_string()),
                ("b".to_string(), "Doing".to_string()),
                ("c".to_string(), "Draft".to_string()),
            ]
        );

        // nothing points at a removed column
        for t in state.tasks() {
            assert!(state.columns().iter().any(|c| c.id == t.status));
        }
    }

    #[test]
    fn test_delete_first_column_falls_back_to_new_first() {
        let mut state = board(&["Draft", "ToDo"], vec![task("a", "Draft")]);
        state.delete_column("Draft").unwrap();
        assert_eq!(statuses(&state), vec![("a".to_string(), "ToDo".to_string())]);
    }

    #[test]
    fn test_delete_last_column_is_rejected_without_change() {
        let mut state = board(&["Only"], vec![task("a", "Only")]);
        let before = state.clone();

        assert_eq!(state.delete_column("Only"), Err(BoardError::LastColumn));
        assert_eq!(state.request_delete_column("Only"), Err(BoardError::LastColumn));
        assert_eq!(state.columns(), before.columns());
        assert_eq!(state.tasks(), before.tasks());
        assert!(state.pending().is_none());
    }

    #[test]
    fn test_drag_example() {
        let mut state = board(
            &["Draft", "ToDo", "Doing", "Done"],
            vec![task("T", "ToDo"), task("U", "Doing")],
        );
        let options = ViewOptions::default();

        assert_eq!(
            state.apply_drop(&DragEnd::task("T", Some("T")), &options).unwrap(),
            Changes::NONE
        );
        assert_eq!(
            state.apply_drop(&DragEnd::task("T", Some("ToDo")), &options).unwrap(),
            Changes::NONE
        );
        assert_eq!(
            state.apply_drop(&DragEnd::task("T", Some("U")), &options).unwrap(),
            Changes::TASKS
        );
        assert_eq!(state.tasks()[0].status, "Doing");
    }

    #[test]
    fn test_drop_ignored_when_read_only() {
        let mut state = board(&["ToDo", "Done"], vec![task("T", "ToDo")]);
        let sorted = ViewOptions {
            sort: SortOption::Priority,
            ..ViewOptions::default()
        };

        let changes = state.apply_drop(&DragEnd::task("T", Some("Done")), &sorted).unwrap();
        assert!(changes.is_empty());
        assert_eq!(state.tasks()[0].status, "ToDo");

        let changes = state.apply_drop(&DragEnd::column("Done", Some("ToDo")), &sorted).unwrap();
        assert!(changes.is_empty());
        assert_eq!(state.columns()[0].id, "ToDo");
    }

    #[test]
    fn test_column_drop_reorders() {
        let mut state = board(&["a", "b", "c", "d"], Vec::new());
        let changes = state
            .apply_drop(&DragEnd::column("a", Some("c")), &ViewOptions::default())
            .unwrap();

        assert_eq!(changes, Changes::COLUMNS);
        let order: Vec<&str> = state.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_move_task_validates_column() {
        let mut state = board(&["ToDo", "Done"], vec![task("T", "ToDo")]);
        assert_eq!(
            state.move_task("T", "Nope"),
            Err(BoardError::ColumnNotFound("Nope".to_string()))
        );
        assert_eq!(state.move_task("T", "Done").unwrap(), Changes::TASKS);
    }

    #[test]
    fn test_save_task_adds_then_updates() {
        let mut state = board(&["ToDo", "Done"], Vec::new());

        let mut draft = TaskDraft::new(state.columns(), Some("Done"));
        draft.title = "Write changelog".to_string();
        assert_eq!(state.save_task(draft, 5).unwrap(), Changes::TASKS);
        assert_eq!(state.tasks().len(), 1);
        let created = state.tasks()[0].clone();
        assert_eq!(created.status, "Done");
        assert_eq!(created.created_at, 5);

        let mut edit = TaskDraft::from_task(&created);
        edit.priority = Priority::High;
        state.save_task(edit, 9).unwrap();
        assert_eq!(state.tasks().len(), 1);
        assert_eq!(state.tasks()[0].priority, Priority::High);
        assert_eq!(state.tasks()[0].created_at, 5);

        let mut stale = TaskDraft::from_task(&created);
        stale.id = Some("gone".to_string());
        assert_eq!(
            state.update_task(stale),
            Err(BoardError::TaskNotFound("gone".to_string()))
        );
    }

    #[test]
    fn test_column_add_and_update() {
        let mut state = board(&["ToDo"], vec![task("T", "ToDo")]);

        state
            .add_column(ColumnDraft {
                title: "Review".to_string(),
                ..ColumnDraft::default()
            })
            .unwrap();
        assert_eq!(state.columns().len(), 2);
        assert_eq!(state.columns()[1].color, "#94a3b8");

        let mut edit = ColumnDraft::from_column(&state.columns()[0]);
        edit.title = "Backlog".to_string();
        edit.color = "#ef4444".to_string();
        state.update_column(edit).unwrap();
        assert_eq!(state.columns()[0].id, "ToDo");
        assert_eq!(state.columns()[0].title, "Backlog");
        assert_eq!(state.tasks()[0].status, "ToDo");

        assert_eq!(
            state.add_column(ColumnDraft::default()),
            Err(BoardError::Form(FormError::TitleRequired))
        );
    }

    #[test]
    fn test_save_task_requires_open_board() {
        let mut state = BoardState::new(vec![project("p1")], None);
        let mut draft = TaskDraft::new(&template_columns(), None);
        draft.title = "x".to_string();
        assert_eq!(state.save_task(draft, 0), Err(BoardError::NoBoardOpen));
    }

    #[test]
    fn test_toggle_and_subtasks() {
        let mut state = board(&["ToDo"], vec![task("T", "ToDo")]);

        state.toggle_task_completed("T").unwrap();
        assert!(state.tasks()[0].is_completed);

        state.add_subtask("T", "step one").unwrap();
        let sub_id = state.tasks()[0].sub_tasks[0].id.clone();
        state.toggle_subtask("T", &sub_id).unwrap();
        assert!(state.tasks()[0].sub_tasks[0].is_completed);

        state.remove_subtask("T", &sub_id).unwrap();
        assert!(state.tasks()[0].sub_tasks.is_empty());
        assert_eq!(
            state.remove_subtask("T", &sub_id),
            Err(BoardError::SubTaskNotFound(sub_id.clone()))
        );
    }

    #[test]
    fn test_task_deletion_needs_confirmation() {
        let mut state = board(&["ToDo"], vec![task("T", "ToDo"), task("U", "ToDo")]);

        state.request_delete_task("T").unwrap();
        assert_eq!(state.tasks().len(), 2);

        state.cancel_deletion();
        assert_eq!(state.confirm_deletion(), Err(BoardError::NothingPending));

        state.request_delete_task("T").unwrap();
        let (changes, deleted) = state.confirm_deletion().unwrap();
        assert_eq!(changes, Changes::TASKS);
        assert_eq!(deleted, PendingDeletion::Task("T".to_string()));
        assert_eq!(state.tasks().len(), 1);
    }

    #[test]
    fn test_confirmed_column_deletion_migrates() {
        let mut state = board(&["ToDo", "Done"], vec![task("T", "Done")]);
        state.request_delete_column("Done").unwrap();
        state.confirm_deletion().unwrap();
        assert_eq!(state.tasks()[0].status, "ToDo");
    }

    #[test]
    fn test_project_save_and_delete_closes_board() {
        let mut state = BoardState::new(Vec::new(), None);

        let created = state
            .save_project(
                ProjectDraft {
                    name: "Website".to_string(),
                    ..ProjectDraft::default()
                },
                11,
            )
            .unwrap();
        let ProjectSave::Created(project) = created else {
            panic!("expected a new project");
        };
        assert_eq!(project.created_at, 11);

        let updated = state
            .save_project(
                ProjectDraft {
                    id: Some(project.id.clone()),
                    name: "Website v2".to_string(),
                    description: "relaunch".to_string(),
                },
                99,
            )
            .unwrap();
        assert!(matches!(updated, ProjectSave::Updated(ref p) if p.name == "Website v2" && p.created_at == 11));
        assert_eq!(state.projects().len(), 1);

        state.open_board(&project.id, None, None).unwrap();
        assert_eq!(state.current_project().map(|p| p.name.as_str()), Some("Website v2"));

        state.request_delete_project(&project.id).unwrap();
        let (changes, _) = state.confirm_deletion().unwrap();
        assert_eq!(changes, Changes::PROJECTS);
        assert!(state.projects().is_empty());
        assert!(state.current_project().is_none());
        assert!(state.columns().is_empty());
    }

    #[test]
    fn test_priority_settings_transitions() {
        let mut state = BoardState::new(vec![project(SEED_PROJECT_ID)], None);
        let changes = state.set_priority_color(Priority::High, PriorityColor::new("#000", "#fff"));
        assert_eq!(changes, Changes::SETTINGS);
        assert_eq!(state.priority_settings().high.bg, "#000");

        state.reset_priority_settings();
        assert_eq!(state.priority_settings(), &default_priority_settings());
    }
}
