use std::fmt;
use std::str::FromStr;

use tasklist_shared::Task;
use thiserror::Error;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
)]
pub enum Filter {
  #[default]
  All,
  Completed,
  Pending
}

#[derive(Debug, Clone, Error)]
#[error(
  "unknown filter `{0}` (expected \
   all, completed or pending)"
)]
pub struct ParseFilterError(String);

impl Filter {
  pub const ALL: [Filter; 3] = [
    Filter::All,
    Filter::Completed,
    Filter::Pending
  ];

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Filter::All => true,
      | Filter::Completed => {
        task.completed
      }
      | Filter::Pending => {
        !task.completed
      }
    }
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Filter::All => "all",
      | Filter::Completed => "completed",
      | Filter::Pending => "pending"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Filter::All => "All",
      | Filter::Completed => "Completed",
      | Filter::Pending => "Pending"
    }
  }
}

impl fmt::Display for Filter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for Filter {
  type Err = ParseFilterError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "all" => Ok(Filter::All),
      | "completed" => {
        Ok(Filter::Completed)
      }
      | "pending" => Ok(Filter::Pending),
      | _ => {
        Err(ParseFilterError(
          s.to_string()
        ))
      }
    }
  }
}
