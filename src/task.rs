use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Position of a task inside the store.
///
/// Rows produced by the view carry the `TaskRef` of the task they display, so
/// two imported tasks sharing an id are still told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskRef(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    /// Anything an imported file carried that is not one of the three levels.
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Other(raw) => raw,
        }
    }

    /// Sort rank, unknown priorities after `low`.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Other(_) => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "Very important",
            Priority::Medium => "A bit important",
            _ => "Not in a hurry",
        }
    }

    /// Whether a form holding this priority may be submitted.
    pub fn is_set(&self) -> bool {
        !matches!(self, Priority::Other(raw) if raw.is_empty())
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Other(String::new())
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(raw),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(raw) => raw,
            level => level.as_str().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Pending,
    Completed,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
            Status::Other(raw) => raw,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }

    pub fn toggled(&self) -> Status {
        match self {
            Status::Completed => Status::Pending,
            _ => Status::Completed,
        }
    }

    /// "pending" -> "Pending"
    pub fn label(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Status::Pending,
            "completed" => Status::Completed,
            _ => Status::Other(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Fields of the wrong JSON type fall back to their default, or are
/// stringified for the string fields, so a record is never lost over one bad
/// field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(deserialize_with = "lenient_string")]
    pub due_date: String, // "YYYY-MM-DD" or ""
    #[serde(deserialize_with = "lenient_tag")]
    pub priority: Priority,
    #[serde(deserialize_with = "lenient_tag")]
    pub status: Status,
}

/// `null` is `None`; scalars become their JSON text; strings pass through.
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_tag<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String> + Default,
{
    Ok(value_text(Value::deserialize(deserializer)?)
        .map(T::from)
        .unwrap_or_default())
}

/// Integers as-is, floats truncated, numeric strings parsed, anything else 0.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(raw) => raw.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

impl Task {
    /// Pending and due strictly before `today`.
    pub fn is_overdue(&self, today: &str) -> bool {
        !self.status.is_completed() && !self.due_date.is_empty() && self.due_date.as_str() < today
    }
}

/// Form input for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub due_date: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>, due_date: impl Into<String>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            due_date: due_date.into(),
            priority,
        }
    }

    /// Trimmed text, or `None` when the draft must be rejected.
    pub fn validated_text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty() && self.priority.is_set()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_record() {
        let task: Task = serde_json::from_str(
            r#"{"id":1,"text":"A","dueDate":"2024-01-01","priority":"high","status":"pending"}"#,
        )
        .unwrap();
        assert_eq!(task.due_date, "2024-01-01");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::Pending);
    }

    #[test]
    fn unknown_priority_survives_reserialization() {
        let task: Task = serde_json::from_str(r#"{"text":"x","priority":"urgent"}"#).unwrap();
        assert_eq!(task.priority, Priority::Other("urgent".into()));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["priority"], "urgent");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn wrongly_typed_fields_fall_back() {
        let task: Task = serde_json::from_str(
            r#"{"id":"abc","text":42,"dueDate":null,"priority":null,"status":true}"#,
        )
        .unwrap();
        assert_eq!(task.id, 0);
        assert_eq!(task.text, "42");
        assert_eq!(task.due_date, "");
        assert_eq!(task.priority, Priority::default());
        assert_eq!(task.status, Status::Other("true".into()));
    }

    #[test]
    fn ids_accept_floats_and_numeric_strings() {
        let float: Task = serde_json::from_str(r#"{"id":1.5e12}"#).unwrap();
        assert_eq!(float.id, 1_500_000_000_000);
        let text: Task = serde_json::from_str(r#"{"id":" 17 "}"#).unwrap();
        assert_eq!(text.id, 17);
        let null: Task = serde_json::from_str(r#"{"id":null,"status":null}"#).unwrap();
        assert_eq!(null.id, 0);
        assert_eq!(null.status, Status::Pending);
    }

    #[test]
    fn toggling_twice_restores_status() {
        assert_eq!(Status::Pending.toggled().toggled(), Status::Pending);
        assert_eq!(Status::Completed.toggled().toggled(), Status::Completed);
        assert_eq!(Status::Other("blocked".into()).toggled(), Status::Completed);
    }

    #[test]
    fn labels() {
        assert_eq!(Status::Completed.label(), "Completed");
        assert_eq!(Priority::Medium.label(), "A bit important");
        assert_eq!(Priority::Other("x".into()).label(), "Not in a hurry");
    }

    #[test]
    fn draft_validation() {
        assert_eq!(
            TaskDraft::new("  buy milk ", "", Priority::Low).validated_text(),
            Some("buy milk")
        );
        assert_eq!(TaskDraft::new("   ", "", Priority::Low).validated_text(), None);
        assert_eq!(
            TaskDraft::new("x", "", Priority::default()).validated_text(),
            None
        );
    }

    #[test]
    fn completed_tasks_are_never_overdue() {
        let mut task = Task {
            due_date: "2024-01-01".into(),
            ..Task::default()
        };
        assert!(task.is_overdue("2024-06-01"));
        assert!(!task.is_overdue("2024-01-01"));
        task.status = Status::Completed;
        assert!(!task.is_overdue("2024-06-01"));
    }
}
