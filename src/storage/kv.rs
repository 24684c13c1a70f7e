use super::Database;
use crate::shared::errors::StorageError;
use rusqlite::OptionalExtension;
use serde_json::Value;

impl Database {
    /// Returns the stored JSON value, or `None` when the key is absent.
    pub fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let conn = self.conn()?;

        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Inserts or replaces the value stored under `key`.
    pub fn put(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, text.as_str()],
        )?;

        Ok(())
    }

    /// Removes the row. Returns whether a row existed.
    pub fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let rows_affected = conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(rows_affected > 0)
    }

    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_missing_key_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get("kanban_projects").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_previous_value() {
        let db = Database::open_in_memory().unwrap();

        db.put("tasks_p1", &json!([{"id": "a"}])).unwrap();
        db.put("tasks_p1", &json!([{"id": "b"}, {"id": "c"}])).unwrap();

        assert_eq!(
            db.get("tasks_p1").unwrap(),
            Some(json!([{"id": "b"}, {"id": "c"}]))
        );
        assert_eq!(db.keys().unwrap(), vec!["tasks_p1".to_string()]);
    }

    #[test]
    fn test_null_value_is_stored_as_json_null() {
        let db = Database::open_in_memory().unwrap();
        db.put("kanban_settings", &Value::Null).unwrap();
        assert_eq!(db.get("kanban_settings").unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_delete_reports_existence() {
        let db = Database::open_in_memory().unwrap();
        db.put("columns_p1", &json!([])).unwrap();

        assert!(db.delete("columns_p1").unwrap());
        assert!(!db.delete("columns_p1").unwrap());
        assert!(db.get("columns_p1").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_row_is_a_parse_error() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .unwrap()
            .execute(
                "INSERT INTO kv_store (key, value) VALUES ('broken', '{oops')",
                [],
            )
            .unwrap();

        assert!(matches!(db.get("broken"), Err(StorageError::ParseError(_))));
    }

    #[test]
    fn test_open_creates_file_and_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data").join("koge.db");

        {
            let db = Database::open(&path).unwrap();
            db.put("kanban_projects", &json!([])).unwrap();
        }

        let reopened = Database::open(&path).unwrap();
        assert_eq!(reopened.get("kanban_projects").unwrap(), Some(json!([])));
    }
}
