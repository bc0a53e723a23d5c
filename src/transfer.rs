//! Import and export of task lists as JSON files.

use crate::task::Task;
use log::{info, warn};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const EXPORT_FILE_NAME: &str = "todo-tasks.json";

/// Field an import wrapper object may hold the task array under.
const WRAPPER_FIELD: &str = "tasks";

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid import file.")]
    InvalidJson(#[source] serde_json::Error),
    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Parses an import payload.
///
/// A JSON array is the task list. An object holding an array under `tasks`
/// yields that array. Every other JSON shape yields an empty list. Only a
/// payload that is not JSON at all is an error.
pub fn parse_import(payload: &str) -> Result<Vec<Task>, TransferError> {
    let value: Value = serde_json::from_str(payload).map_err(TransferError::InvalidJson)?;
    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut fields) => match fields.remove(WRAPPER_FIELD) {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    Ok(tasks_from_records(records))
}

/// Converts raw records into tasks. Every JSON object becomes a task; only
/// records that are not objects are dropped.
pub(crate) fn tasks_from_records(records: Vec<Value>) -> Vec<Task> {
    let total = records.len();
    let tasks: Vec<Task> = records
        .into_iter()
        .filter_map(|record| match record {
            Value::Object(_) => match serde_json::from_value::<Task>(record) {
                Ok(task) => Some(task),
                Err(err) => {
                    warn!("dropping malformed task record: {err}");
                    None
                }
            },
            other => {
                warn!("dropping non-object task record: {other}");
                None
            }
        })
        .collect();
    if tasks.len() != total {
        warn!("kept {} of {} task records", tasks.len(), total);
    }
    tasks
}

pub fn import_file(path: &Path) -> Result<Vec<Task>, TransferError> {
    let payload = fs::read_to_string(path).map_err(|source| TransferError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tasks = parse_import(&payload)?;
    info!("imported {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

/// Pretty-printed JSON array of `tasks`.
pub fn export(tasks: &[Task]) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Writes the export into `dir` and returns the written path.
pub fn export_file(tasks: &[Task], dir: &Path) -> Result<PathBuf, TransferError> {
    let path = dir.join(EXPORT_FILE_NAME);
    let write_err = |source| TransferError::Write {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(write_err)?;
    fs::write(&path, export(tasks)?).map_err(write_err)?;
    info!("exported {} tasks to {}", tasks.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Status};

    #[test]
    fn bare_array_is_accepted() {
        let tasks = parse_import(r#"[{"id":1,"text":"A","priority":"low"}]"#).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::Low);
        assert_eq!(tasks[0].status, Status::Pending);
    }

    #[test]
    fn wrapper_object_is_unwrapped() {
        let tasks = parse_import(r#"{"tasks":[{"text":"A"},{"text":"B"}]}"#).unwrap();
        let texts: Vec<_> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["A", "B"]);
    }

    #[test]
    fn unrecognized_shapes_yield_empty_list() {
        assert!(parse_import(r#"{"foo": 1}"#).unwrap().is_empty());
        assert!(parse_import(r#"{"tasks": 3}"#).unwrap().is_empty());
        assert!(parse_import("42").unwrap().is_empty());
        assert!(parse_import("null").unwrap().is_empty());
    }

    #[test]
    fn non_object_records_are_dropped() {
        let tasks = parse_import(r#"[1, "two", {"text":"three"}]"#).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "three");
    }

    #[test]
    fn objects_with_wrongly_typed_fields_are_kept() {
        let tasks = parse_import(
            r#"[
                {"id":1,"text":"keep"},
                {"id":"abc","text":"string id","priority":"high"},
                {"id":2,"text":"null date","dueDate":null,"priority":"low"},
                {"id":1.5e12,"text":"float id","status":"completed"}
            ]"#,
        )
        .unwrap();
        let texts: Vec<_> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["keep", "string id", "null date", "float id"]);
        assert_eq!(tasks[1].id, 0);
        assert_eq!(tasks[2].due_date, "");
        assert_eq!(tasks[3].id, 1_500_000_000_000);
        assert_eq!(tasks[3].status, Status::Completed);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_import("{not json").unwrap_err();
        assert!(matches!(err, TransferError::InvalidJson(_)));
        assert_eq!(err.to_string(), "Invalid import file.");
    }

    #[test]
    fn export_is_indented_with_camel_case_fields() {
        let task = Task {
            id: 7,
            text: "A".into(),
            due_date: "2024-01-01".into(),
            priority: Priority::High,
            status: Status::Pending,
        };
        let out = export(&[task]).unwrap();
        assert!(out.starts_with("[\n  {"));
        assert!(out.contains("\"dueDate\": \"2024-01-01\""));
    }
}
