//! Display records derived from [`TaskStore`] state.
//!
//! Everything here is a pure function of its input; front ends re-run
//! [`project`] after every state change and draw the result.

use chrono::{DateTime, Local, NaiveDateTime};
use tasklist_shared::{Task, TaskId};

use crate::filter::Filter;
use crate::store::TaskStore;

const CREATED_FORMAT: &str = "%b %-d, %Y, %I:%M %p";
const NAIVE_PATTERNS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance {
    pub action: Action,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub status: StatusBadge,
    pub created: String,
    pub actions: [Affordance; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub filter: Filter,
    pub rows: Vec<TaskRow>,
    pub count_label: String,
    pub is_empty: bool,
}

pub fn project(store: &TaskStore) -> ListView {
    let rows: Vec<TaskRow> = store.filtered_view().into_iter().map(project_task).collect();
    ListView {
        filter: store.filter(),
        count_label: count_label(rows.len()),
        is_empty: rows.is_empty(),
        rows,
    }
}

pub fn project_task(task: &Task) -> TaskRow {
    let description = Some(task.description.clone()).filter(|d| !d.is_empty());
    TaskRow {
        id: task.id,
        title: task.title.clone(),
        description,
        completed: task.completed,
        status: status_badge(task.completed),
        created: format_created(task.created_at.as_deref()),
        actions: [
            toggle_affordance(task.completed),
            Affordance {
                action: Action::Edit,
                label: "Edit task",
                icon: "edit",
            },
            Affordance {
                action: Action::Delete,
                label: "Delete task",
                icon: "trash",
            },
        ],
    }
}

pub fn status_badge(completed: bool) -> StatusBadge {
    if completed {
        StatusBadge {
            label: "Completed",
            class: "completed",
        }
    } else {
        StatusBadge {
            label: "Pending",
            class: "pending",
        }
    }
}

pub fn toggle_affordance(completed: bool) -> Affordance {
    if completed {
        Affordance {
            action: Action::Toggle,
            label: "Mark as incomplete",
            icon: "undo",
        }
    } else {
        Affordance {
            action: Action::Toggle,
            label: "Mark as complete",
            icon: "check",
        }
    }
}

pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{count} tasks")
    }
}

/// Formats a server timestamp as e.g. `Jan 5, 2024, 10:30 AM`.
///
/// Offset-bearing timestamps are shown in local time, naive ones as given.
/// Anything unparseable is returned verbatim.
pub fn format_created(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return String::new();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(CREATED_FORMAT).to_string();
    }
    // Flask serializes datetimes it did not isoformat() as RFC 2822.
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.with_timezone(&Local).format(CREATED_FORMAT).to_string();
    }
    for pattern in NAIVE_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return naive.format(CREATED_FORMAT).to_string();
        }
    }

    raw.to_string()
}
