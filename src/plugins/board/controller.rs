//! Ties board transitions to persistence. Every transition that dirties a
//! key is followed by a write of exactly that key.
//!
//! List entries that fail to decode are carried along and written back after
//! the decoded ones. A list key whose stored value cannot be read at all is
//! never written.

use super::dnd::DragEnd;
use super::forms::{ColumnDraft, ProjectDraft, TaskDraft};
use super::helpers::{find_project, now_ms};
use super::seed::{seed_project, seed_tasks, template_columns, SEED_PROJECT_ID};
use super::state::{BoardError, BoardState, Changes, PendingDeletion, ProjectSave};
use super::types::{Column, ColumnWithTasks, Priority, PriorityColor, PrioritySettings, Project, Task};
use super::view::ViewOptions;
use crate::plugins::assist::{apply_suggestion, AssistError, GeminiClient};
use crate::plugins::sync::keys::{columns_key, tasks_key, PROJECTS_KEY, SETTINGS_KEY};
use crate::plugins::sync::records::{ListRecord, Loaded};
use crate::plugins::sync::SyncStore;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub struct BoardController {
    state: BoardState,
    store: SyncStore,
    view: ViewOptions,
    assist: Option<GeminiClient>,
    /// Undecodable entries per list key, appended on every write.
    kept: HashMap<String, Vec<Value>>,
    /// List keys whose stored value could not be read.
    locked: HashSet<String>,
}

impl BoardController {
    /// Fetches projects and settings concurrently. With no stored projects
    /// the welcome project, its columns and its tasks are written first.
    pub async fn load(store: SyncStore) -> Self {
        let (projects, settings) = tokio::join!(
            store.load_list::<Project>(PROJECTS_KEY),
            store.load::<PrioritySettings>(SETTINGS_KEY),
        );

        let mut controller = Self {
            state: BoardState::default(),
            store,
            view: ViewOptions::default(),
            assist: None,
            kept: HashMap::new(),
            locked: HashSet::new(),
        };

        let first_run = match &projects {
            Loaded::Absent => true,
            Loaded::Found(record) => record.is_empty(),
            Loaded::Unreadable => false,
        };
        let projects = if first_run {
            controller.seed().await
        } else {
            controller.accept(PROJECTS_KEY, projects).unwrap_or_default()
        };

        tracing::info!(target: "board", projects = projects.len(), "Board loaded");
        controller.state = BoardState::new(projects, settings);
        controller
    }

    async fn seed(&self) -> Vec<Project> {
        tracing::info!(target: "board", "No projects found, writing welcome project");
        let now = now_ms();
        let projects = vec![seed_project(now)];
        let columns = template_columns();
        let tasks = seed_tasks(now);
        let (tasks_at, columns_at) = (tasks_key(SEED_PROJECT_ID), columns_key(SEED_PROJECT_ID));

        tokio::join!(
            self.store.store(PROJECTS_KEY, &projects),
            self.store.store(&columns_at, &columns),
            self.store.store(&tasks_at, &tasks),
        );
        projects
    }

    /// Records what a list read left behind and returns the usable entries.
    fn accept<T>(&mut self, key: &str, loaded: Loaded<ListRecord<T>>) -> Option<Vec<T>> {
        self.forget(key);
        match loaded {
            Loaded::Absent => None,
            Loaded::Found(record) => {
                if !record.rejected.is_empty() {
                    self.kept.insert(key.to_string(), record.rejected);
                }
                Some(record.items)
            }
            Loaded::Unreadable => {
                tracing::warn!(target: "board", key, "Stored value unreadable, changes to it will not be saved");
                self.locked.insert(key.to_string());
                None
            }
        }
    }

    fn forget(&mut self, key: &str) {
        self.kept.remove(key);
        self.locked.remove(key);
    }

    pub fn with_assist(mut self, client: GeminiClient) -> Self {
        self.assist = Some(client);
        self
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn store(&self) -> &SyncStore {
        &self.store
    }

    pub fn view_options(&self) -> &ViewOptions {
        &self.view
    }

    pub fn set_view_options(&mut self, view: ViewOptions) {
        self.view = view;
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.state.view(&self.view)
    }

    pub fn board(&self) -> Vec<ColumnWithTasks<'_>> {
        self.state.board(&self.view)
    }

    async fn write_list<T: Serialize>(&self, key: &str, items: &[T]) {
        if self.locked.contains(key) {
            tracing::warn!(target: "board", key, "Skipping write over unreadable stored value");
            return;
        }
        let kept = self.kept.get(key).map(Vec::as_slice).unwrap_or_default();
        self.store.store_list(key, items, kept).await;
    }

    async fn persist(&self, changes: Changes) {
        let project_id = self.state.current_project().map(|p| p.id.clone());
        let tasks_at = project_id.as_deref().map(tasks_key);
        let columns_at = project_id.as_deref().map(columns_key);

        tokio::join!(
            async {
                if changes.projects {
                    self.write_list(PROJECTS_KEY, self.state.projects()).await;
                }
            },
            async {
                if changes.settings {
                    self.store.store(SETTINGS_KEY, self.state.priority_settings()).await;
                }
            },
            async {
                if let (true, Some(key)) = (changes.tasks, tasks_at.as_deref()) {
                    self.write_list(key, self.state.tasks()).await;
                }
            },
            async {
                if let (true, Some(key)) = (changes.columns, columns_at.as_deref()) {
                    self.write_list(key, self.state.columns()).await;
                }
            },
        );
    }

    async fn commit(&self, result: Result<Changes, BoardError>) -> Result<Changes, BoardError> {
        let changes = result?;
        if !changes.is_empty() {
            self.persist(changes).await;
        }
        Ok(changes)
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Loads tasks and columns concurrently; missing or empty columns fall
    /// back to the template (and are written back).
    pub async fn open_project(&mut self, project_id: &str) -> Result<(), BoardError> {
        if find_project(self.state.projects(), project_id).is_none() {
            return Err(BoardError::ProjectNotFound(project_id.to_string()));
        }

        let (tasks_at, columns_at) = (tasks_key(project_id), columns_key(project_id));
        let (tasks, columns) = tokio::join!(
            self.store.load_list::<Task>(&tasks_at),
            self.store.load_list::<Column>(&columns_at),
        );
        let tasks = self.accept(&tasks_at, tasks);
        let columns = self.accept(&columns_at, columns);

        let result = self.state.open_board(project_id, tasks, columns);
        self.commit(result).await?;
        Ok(())
    }

    pub fn close_project(&mut self) {
        self.state.close_board();
    }

    /// New projects get template columns and an empty task list right away.
    pub async fn save_project(&mut self, draft: ProjectDraft) -> Result<Project, BoardError> {
        match self.state.save_project(draft, now_ms())? {
            ProjectSave::Created(project) => {
                let (tasks_at, columns_at) = (tasks_key(&project.id), columns_key(&project.id));
                self.forget(&tasks_at);
                self.forget(&columns_at);

                let columns = template_columns();
                let no_tasks: Vec<Task> = Vec::new();
                tokio::join!(
                    self.persist(Changes::PROJECTS),
                    self.store.store(&columns_at, &columns),
                    self.store.store(&tasks_at, &no_tasks),
                );
                Ok(project)
            }
            ProjectSave::Updated(project) => {
                self.persist(Changes::PROJECTS).await;
                Ok(project)
            }
        }
    }

    // ------------------------------------------------------------------
    // Tasks and columns
    // ------------------------------------------------------------------

    pub async fn save_task(&mut self, draft: TaskDraft) -> Result<Changes, BoardError> {
        let result = self.state.save_task(draft, now_ms());
        self.commit(result).await
    }

    pub async fn toggle_task_completed(&mut self, task_id: &str) -> Result<Changes, BoardError> {
        let result = self.state.toggle_task_completed(task_id);
        self.commit(result).await
    }

    pub async fn move_task(&mut self, task_id: &str, to_column: &str) -> Result<Changes, BoardError> {
        let result = self.state.move_task(task_id, to_column);
        self.commit(result).await
    }

    pub async fn add_subtask(&mut self, task_id: &str, title: &str) -> Result<Changes, BoardError> {
        let result = self.state.add_subtask(task_id, title);
        self.commit(result).await
    }

    pub async fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<Changes, BoardError> {
        let result = self.state.toggle_subtask(task_id, subtask_id);
        self.commit(result).await
    }

    pub async fn remove_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<Changes, BoardError> {
        let result = self.state.remove_subtask(task_id, subtask_id);
        self.commit(result).await
    }

    pub async fn save_column(&mut self, draft: ColumnDraft) -> Result<Changes, BoardError> {
        let result = self.state.save_column(draft);
        self.commit(result).await
    }

    pub async fn move_column(&mut self, active_id: &str, over_id: &str) -> Result<Changes, BoardError> {
        let result = self.state.move_column(active_id, over_id);
        self.commit(result).await
    }

    /// Applies a finished drag against the current view options.
    pub async fn apply_drop(&mut self, event: &DragEnd) -> Result<Changes, BoardError> {
        let result = self.state.apply_drop(event, &self.view);
        self.commit(result).await
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub async fn set_priority_settings(&mut self, settings: PrioritySettings) {
        let changes = self.state.set_priority_settings(settings);
        self.persist(changes).await;
    }

    pub async fn set_priority_color(&mut self, priority: Priority, color: PriorityColor) {
        let changes = self.state.set_priority_color(priority, color);
        self.persist(changes).await;
    }

    pub async fn reset_priority_settings(&mut self) {
        let changes = self.state.reset_priority_settings();
        self.persist(changes).await;
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    pub fn request_delete_task(&mut self, task_id: &str) -> Result<(), BoardError> {
        self.state.request_delete_task(task_id)
    }

    pub fn request_delete_column(&mut self, column_id: &str) -> Result<(), BoardError> {
        self.state.request_delete_column(column_id)
    }

    pub fn request_delete_project(&mut self, project_id: &str) -> Result<(), BoardError> {
        self.state.request_delete_project(project_id)
    }

    pub fn cancel_deletion(&mut self) {
        self.state.cancel_deletion();
    }

    /// Runs the pending deletion. A deleted project's tasks and columns are
    /// dropped remotely, both at once and not as a unit.
    pub async fn confirm_deletion(&mut self) -> Result<PendingDeletion, BoardError> {
        let (changes, deleted) = self.state.confirm_deletion()?;

        if let PendingDeletion::Project(id) = &deleted {
            let (tasks_at, columns_at) = (tasks_key(id), columns_key(id));
            tokio::join!(self.store.delete(&tasks_at), self.store.delete(&columns_at));
            self.forget(&tasks_at);
            self.forget(&columns_at);
        }

        self.persist(changes).await;
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // Assist
    // ------------------------------------------------------------------

    /// Returns `draft` with the model's suggestion merged in. On failure the
    /// caller keeps its draft unchanged.
    pub async fn assist(&self, draft: &TaskDraft) -> Result<TaskDraft, AssistError> {
        let client = self.assist.as_ref().ok_or(AssistError::MissingApiKey)?;
        let suggestion = client.suggest(&draft.title, &draft.description).await?;

        let mut merged = draft.clone();
        apply_suggestion(&mut merged, suggestion);
        Ok(merged)
    }
}
