//! JSON shapes exchanged with the task API.

use serde::{
  Deserialize,
  Deserializer,
  Serialize
};

pub type TaskId = u64;

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Task {
  pub id:          TaskId,
  pub title:       String,
  #[serde(
    default,
    deserialize_with = "null_as_empty"
  )]
  pub description: String,
  pub completed:   bool,
  #[serde(default)]
  pub created_at:  Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub updated_at:  Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskCreate {
  pub title:       String,
  pub description: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskUpdate {
  pub title:       String,
  pub description: String,
  pub completed:   bool
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskListResponse {
  #[serde(default)]
  pub tasks: Vec<Task>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskResponse {
  pub task: Task
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ToggleResult {
  pub completed: bool,
  #[serde(default)]
  pub message:   String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
)]
pub struct ErrorBody {
  #[serde(default)]
  pub message: Option<String>
}

fn null_as_empty<'de, D>(
  deserializer: D
) -> Result<String, D::Error>
where
  D: Deserializer<'de>
{
  Ok(
    Option::<String>::deserialize(
      deserializer
    )?
    .unwrap_or_default()
  )
}
