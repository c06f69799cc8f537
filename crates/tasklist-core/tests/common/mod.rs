#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use tasklist_core::{ClientError, RequestError, Task, TaskApi, TaskId, ToggleResult};

pub const CREATED_AT: &str = "2024-01-05T10:30:00";

pub fn task(id: TaskId, title: &str, completed: bool) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: String::new(),
        completed,
        created_at: Some(CREATED_AT.to_string()),
        updated_at: None,
    }
}

/// Server stand-in: keeps its own task table and records every call.
#[derive(Default)]
pub struct FakeApi {
    tasks: RefCell<Vec<Task>>,
    next_id: Cell<TaskId>,
    failures: RefCell<VecDeque<ClientError>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            tasks: RefCell::new(tasks),
            next_id: Cell::new(next_id),
            ..Self::default()
        }
    }

    /// The next call fails with `status` and `message` instead of touching the table.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.failures
            .borrow_mut()
            .push_back(RequestError::new(Some(status), message).into());
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, call: String) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(call);
        match self.failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> ClientError {
        RequestError::new(Some(404), "Task not found").into()
    }
}

#[async_trait(?Send)]
impl TaskApi for FakeApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.record("list".to_string())?;
        Ok(self.tasks.borrow().clone())
    }

    async fn create_task(&self, title: &str, description: &str) -> Result<Task, ClientError> {
        self.record(format!("create {title}"))?;
        let id = self.next_id.get().max(1);
        self.next_id.set(id + 1);
        let mut created = task(id, title, false);
        created.description = description.to_string();
        self.tasks.borrow_mut().insert(0, created.clone());
        Ok(created)
    }

    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<Task, ClientError> {
        self.record(format!("update {id}"))?;
        let mut tasks = self.tasks.borrow_mut();
        let stored = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        stored.title = title.to_string();
        stored.description = description.to_string();
        stored.completed = completed;
        stored.updated_at = Some("2024-01-06T08:00:00".to_string());
        Ok(stored.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        self.record(format!("delete {id}"))?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn toggle_task(&self, id: TaskId) -> Result<ToggleResult, ClientError> {
        self.record(format!("toggle {id}"))?;
        let mut tasks = self.tasks.borrow_mut();
        let stored = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        stored.completed = !stored.completed;
        let state = if stored.completed { "completed" } else { "incomplete" };
        Ok(ToggleResult {
            completed: stored.completed,
            message: format!("Task marked as {state}"),
        })
    }
}
