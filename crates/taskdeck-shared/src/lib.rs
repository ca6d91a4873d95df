//! Wire types shared by every taskdeck surface.
//!
//! These mirror the JSON the task API speaks. Field names follow the
//! backend (`due_date`, `completion_rate`, ...), so the structs
//! serialize straight onto the wire.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Deserializer,
  Serialize
};
use serde_json::Value;

pub const DEFAULT_CATEGORY: &str =
  "General";

pub type TaskId = u64;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
  Default,
)]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High
}

impl Priority {
  pub const ALL: [Priority; 3] = [
    Priority::Low,
    Priority::Medium,
    Priority::High
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      | Priority::Low => "Low",
      | Priority::Medium => "Medium",
      | Priority::High => "High"
    }
  }

  /// CSS modifier used on the priority
  /// badge, e.g. `priority-high`.
  pub fn css_class(
    &self
  ) -> &'static str {
    match self {
      | Priority::Low => "priority-low",
      | Priority::Medium => {
        "priority-medium"
      }
      | Priority::High => {
        "priority-high"
      }
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct UnknownPriority(pub String);

impl fmt::Display for UnknownPriority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "unknown priority `{}` \
       (expected Low, Medium or High)",
      self.0
    )
  }
}

impl std::error::Error
  for UnknownPriority
{
}

impl FromStr for Priority {
  type Err = UnknownPriority;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "low" => Ok(Priority::Low),
      | "medium" => Ok(Priority::Medium),
      | "high" => Ok(Priority::High),
      | _ => {
        Err(UnknownPriority(
          s.to_string()
        ))
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct Task {
  pub id:          TaskId,
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(
    default = "default_category",
    deserialize_with = "category_or_default"
  )]
  pub category:    String,
  #[serde(default)]
  pub priority:    Priority,
  #[serde(default)]
  pub due_date:    Option<String>,
  #[serde(
    default,
    deserialize_with = "flag_from_bool_or_int"
  )]
  pub completed:   bool,
  #[serde(default)]
  pub created_at:  Option<String>
}

impl Task {
  /// Description with blank text
  /// treated as absent.
  pub fn description_text(
    &self
  ) -> Option<&str> {
    self
      .description
      .as_deref()
      .filter(|text| {
        !text.trim().is_empty()
      })
  }
}

/// Body of `POST /tasks`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskCreate {
  pub title:       String,
  pub description: String,
  pub category:    String,
  pub priority:    Priority,
  pub due_date:    Option<String>
}

/// Partial body of `PUT /tasks/{id}`.
///
/// Absent fields are left untouched by
/// the backend. `due_date:
/// Some(None)` clears the due date.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Default,
)]
pub struct TaskPatch {
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub title:       Option<String>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub description: Option<String>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub category:    Option<String>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub priority:    Option<Priority>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "explicit_null"
  )]
  pub due_date:    Option<Option<String>>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub completed:   Option<bool>
}

impl TaskPatch {
  pub fn completion(
    completed: bool
  ) -> Self {
    Self {
      completed: Some(completed),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    self == &Self::default()
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Default,
)]
pub struct Stats {
  pub total:           u64,
  pub completed:       u64,
  pub pending:         u64,
  pub completion_rate: f64,
  #[serde(default)]
  pub priority_stats:
    BTreeMap<String, u64>,
  #[serde(default)]
  pub category_stats:
    BTreeMap<String, u64>
}

/// Response envelope every endpoint
/// wraps its payload in.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
  pub success: Option<bool>,
  pub data:    Option<T>,
  pub error:   Option<Value>,
  pub message: Option<String>,
  pub count:   Option<usize>
}

impl<T> Envelope<T> {
  /// Human-readable text of the `error`
  /// field, if the response carried
  /// one.
  pub fn error_message(
    &self
  ) -> Option<String> {
    match self.error.as_ref()? {
      | Value::Null => None,
      | Value::String(text) => {
        Some(text.clone())
      }
      | other => Some(other.to_string())
    }
  }
}

fn default_category() -> String {
  DEFAULT_CATEGORY.to_string()
}

fn category_or_default<'de, D>(
  deserializer: D
) -> Result<String, D::Error>
where
  D: Deserializer<'de>
{
  let raw =
    Option::<String>::deserialize(
      deserializer
    )?;
  Ok(raw.unwrap_or_else(
    default_category
  ))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireFlag {
  Bool(bool),
  Int(i64)
}

// SQLite hands booleans back as 0/1.
fn flag_from_bool_or_int<'de, D>(
  deserializer: D
) -> Result<bool, D::Error>
where
  D: Deserializer<'de>
{
  let raw =
    Option::<WireFlag>::deserialize(
      deserializer
    )?;
  Ok(match raw {
    | Some(WireFlag::Bool(value)) => {
      value
    }
    | Some(WireFlag::Int(value)) => {
      value != 0
    }
    | None => false
  })
}

fn explicit_null<'de, D>(
  deserializer: D
) -> Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>
{
  Option::<String>::deserialize(
    deserializer
  )
  .map(Some)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn task_accepts_sqlite_row_shape() {
    let task: Task =
      serde_json::from_value(json!({
        "id": 7,
        "title": "Ship it",
        "description": null,
        "category": null,
        "priority": "High",
        "completed": 1,
        "created_at": "2026-02-16 05:00:00",
        "due_date": "2026-02-20T09:30"
      }))
      .expect("decode task");

    assert_eq!(task.id, 7);
    assert!(task.completed);
    assert_eq!(
      task.category,
      DEFAULT_CATEGORY
    );
    assert_eq!(
      task.priority,
      Priority::High
    );
    assert_eq!(
      task.description_text(),
      None
    );
  }

  #[test]
  fn task_defaults_missing_fields() {
    let task: Task =
      serde_json::from_value(json!({
        "id": 1,
        "title": "A",
        "completed": false
      }))
      .expect("decode task");

    assert_eq!(
      task.priority,
      Priority::Medium
    );
    assert_eq!(task.category, "General");
    assert!(task.due_date.is_none());
  }

  #[test]
  fn patch_serializes_only_set_fields()
  {
    let patch = TaskPatch::completion(true);
    assert_eq!(
      serde_json::to_value(&patch)
        .expect("encode patch"),
      json!({ "completed": true })
    );

    let clear_due = TaskPatch {
      due_date: Some(None),
      ..TaskPatch::default()
    };
    assert_eq!(
      serde_json::to_value(&clear_due)
        .expect("encode patch"),
      json!({ "due_date": null })
    );
    assert!(TaskPatch::default().is_empty());
    assert!(!clear_due.is_empty());
  }

  #[test]
  fn create_sends_null_due_date() {
    let create = TaskCreate {
      title:       "A".to_string(),
      description: String::new(),
      category:    "General".to_string(),
      priority:    Priority::Low,
      due_date:    None
    };
    let value = serde_json::to_value(
      &create
    )
    .expect("encode create");
    assert_eq!(value["due_date"], json!(null));
    assert_eq!(value["priority"], json!("Low"));
  }

  #[test]
  fn envelope_error_message_handles_shapes()
  {
    let env: Envelope<Vec<Task>> =
      serde_json::from_value(json!({
        "success": false,
        "error": "Task not found"
      }))
      .expect("decode envelope");
    assert_eq!(
      env.error_message().as_deref(),
      Some("Task not found")
    );
    assert!(env.data.is_none());

    let env: Envelope<Vec<Task>> =
      serde_json::from_value(json!({
        "error": { "code": 3 }
      }))
      .expect("decode envelope");
    assert_eq!(
      env.error_message().as_deref(),
      Some("{\"code\":3}")
    );
  }

  #[test]
  fn priority_parses_case_insensitively()
  {
    assert_eq!(
      "high".parse::<Priority>(),
      Ok(Priority::High)
    );
    assert!(
      "urgent"
        .parse::<Priority>()
        .is_err()
    );
    assert_eq!(
      Priority::Low.css_class(),
      "priority-low"
    );
  }
}
