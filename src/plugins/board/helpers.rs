use super::types::{Column, Project, SubTask, Task};
use uuid::Uuid;

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn find_project<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
    projects.iter().find(|project| project.id == id)
}

pub fn find_project_mut<'a>(projects: &'a mut [Project], id: &str) -> Option<&'a mut Project> {
    projects.iter_mut().find(|project| project.id == id)
}

pub fn find_column<'a>(columns: &'a [Column], id: &str) -> Option<&'a Column> {
    columns.iter().find(|column| column.id == id)
}

pub fn find_column_mut<'a>(columns: &'a mut [Column], id: &str) -> Option<&'a mut Column> {
    columns.iter_mut().find(|column| column.id == id)
}

pub fn column_index(columns: &[Column], id: &str) -> Option<usize> {
    columns.iter().position(|column| column.id == id)
}

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id == id)
}

pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|task| task.id == id)
}

pub fn find_subtask_mut<'a>(task: &'a mut Task, id: &str) -> Option<&'a mut SubTask> {
    task.sub_tasks.iter_mut().find(|subtask| subtask.id == id)
}
