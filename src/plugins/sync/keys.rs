//! Storage keys shared by the browser client and the key-value service.

pub const PROJECTS_KEY: &str = "kanban_projects";
pub const SETTINGS_KEY: &str = "kanban_settings";

pub fn tasks_key(project_id: &str) -> String {
    format!("tasks_{}", project_id)
}

pub fn columns_key(project_id: &str) -> String {
    format!("columns_{}", project_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_scoped_keys() {
        assert_eq!(tasks_key("intro-project-welcome"), "tasks_intro-project-welcome");
        assert_eq!(columns_key("abc"), "columns_abc");
    }
}
