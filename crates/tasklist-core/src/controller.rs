//! Interaction controller.
//!
//! Every user action is a [`Command`]. The controller validates input,
//! awaits the [`TaskApi`] call, and only then applies the server's answer to
//! the [`TaskStore`]. Failures become notifications and leave the store as
//! it was.
//!
//! State lives in a `RefCell` and is never borrowed across an `.await`, so a
//! shared `Rc<Controller<_>>` can serve several in-flight actions on one
//! thread.

use std::cell::RefCell;
use std::rc::Rc;

use tasklist_shared::TaskId;
use tracing::{debug, info, instrument, warn};

use crate::api::TaskApi;
use crate::config::Config;
use crate::error::{ClientError, ValidationError};
use crate::filter::Filter;
use crate::store::TaskStore;
use crate::view::{self, ListView};

pub const DEFAULT_NOTIFY_DURATION_MS: u64 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub notify_duration_ms: u64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            notify_duration_ms: DEFAULT_NOTIFY_DURATION_MS,
        }
    }
}

impl ControllerSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            notify_duration_ms: cfg.notify_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load,
    SetDraftTitle(String),
    SetDraftDescription(String),
    Create,
    OpenEdit(TaskId),
    SetEditTitle(String),
    SetEditDescription(String),
    SetEditCompleted(bool),
    SaveEdit,
    CloseEdit,
    Toggle(TaskId),
    RequestDelete(TaskId),
    Confirm,
    CancelConfirm,
    SetFilter(Filter),
    Escape,
    Dismiss(u64),
    ClearFocus,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Load => "load",
            Command::SetDraftTitle(_) => "set_draft_title",
            Command::SetDraftDescription(_) => "set_draft_description",
            Command::Create => "create",
            Command::OpenEdit(_) => "open_edit",
            Command::SetEditTitle(_) => "set_edit_title",
            Command::SetEditDescription(_) => "set_edit_description",
            Command::SetEditCompleted(_) => "set_edit_completed",
            Command::SaveEdit => "save_edit",
            Command::CloseEdit => "close_edit",
            Command::Toggle(_) => "toggle",
            Command::RequestDelete(_) => "request_delete",
            Command::Confirm => "confirm",
            Command::CancelConfirm => "cancel_confirm",
            Command::SetFilter(_) => "set_filter",
            Command::Escape => "escape",
            Command::Dismiss(_) => "dismiss",
            Command::ClearFocus => "clear_focus",
        }
    }
}

/// Add-form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

/// Edit-form fields. Its presence means the edit form is open for `task_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub task_id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Delete(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub message: String,
    pub action: PendingAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    AddTitle,
    EditTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
}

impl NotificationKind {
    pub fn title(self) -> &'static str {
        match self {
            NotificationKind::Success => "Success",
            NotificationKind::Error => "Error",
            NotificationKind::Warning => "Warning",
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: &'static str,
    pub message: String,
    pub duration_ms: u64,
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub view: ListView,
    pub draft: TaskDraft,
    pub edit: Option<EditDraft>,
    pub confirm: Option<Confirmation>,
    pub busy: bool,
    pub notifications: Vec<Notification>,
    pub focus: Option<FocusTarget>,
}

#[derive(Debug, Default)]
struct Session {
    store: TaskStore,
    draft: TaskDraft,
    edit: Option<EditDraft>,
    confirm: Option<Confirmation>,
    in_flight: u32,
    notifications: Vec<Notification>,
    next_notification_id: u64,
    focus: Option<FocusTarget>,
}

type Listener = Rc<dyn Fn()>;

pub struct Controller<A> {
    api: A,
    settings: ControllerSettings,
    session: RefCell<Session>,
    listener: RefCell<Option<Listener>>,
}

/// Shows the busy indicator until dropped.
struct BusyGuard<'a, A> {
    controller: &'a Controller<A>,
}

impl<A> Drop for BusyGuard<'_, A> {
    fn drop(&mut self) {
        self.controller
            .mutate(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}

impl<A> Controller<A> {
    pub fn new(api: A, settings: ControllerSettings) -> Self {
        Self {
            api,
            settings,
            session: RefCell::new(Session::default()),
            listener: RefCell::new(None),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Registers the callback run after every state change.
    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn snapshot(&self) -> Snapshot {
        let s = self.session.borrow();
        Snapshot {
            view: view::project(&s.store),
            draft: s.draft.clone(),
            edit: s.edit.clone(),
            confirm: s.confirm.clone(),
            busy: s.in_flight > 0,
            notifications: s.notifications.clone(),
            focus: s.focus,
        }
    }

    pub fn with_store<R>(&self, f: impl FnOnce(&TaskStore) -> R) -> R {
        f(&self.session.borrow().store)
    }

    pub fn is_busy(&self) -> bool {
        self.session.borrow().in_flight > 0
    }

    pub fn set_filter(&self, filter: Filter) {
        self.mutate(|s| s.store.set_filter(filter));
    }

    pub fn set_draft_title(&self, title: String) {
        self.mutate(|s| s.draft.title = title);
    }

    pub fn set_draft_description(&self, description: String) {
        self.mutate(|s| s.draft.description = description);
    }

    /// Opens the edit form pre-filled from the stored task. Unknown ids are ignored.
    pub fn open_edit(&self, id: TaskId) -> bool {
        self.mutate(|s| {
            let Some(task) = s.store.get(id) else {
                return false;
            };
            s.edit = Some(EditDraft {
                task_id: task.id,
                title: task.title.clone(),
                description: task.description.clone(),
                completed: task.completed,
            });
            s.focus = Some(FocusTarget::EditTitle);
            true
        })
    }

    pub fn set_edit_title(&self, title: String) {
        self.mutate(|s| {
            if let Some(edit) = s.edit.as_mut() {
                edit.title = title;
            }
        });
    }

    pub fn set_edit_description(&self, description: String) {
        self.mutate(|s| {
            if let Some(edit) = s.edit.as_mut() {
                edit.description = description;
            }
        });
    }

    pub fn set_edit_completed(&self, completed: bool) {
        self.mutate(|s| {
            if let Some(edit) = s.edit.as_mut() {
                edit.completed = completed;
            }
        });
    }

    pub fn close_edit(&self) {
        self.mutate(|s| s.edit = None);
    }

    /// Asks for confirmation before deleting. Nothing is sent until [`Controller::confirm`].
    pub fn request_delete(&self, id: TaskId) -> bool {
        self.mutate(|s| {
            let Some(task) = s.store.get(id) else {
                return false;
            };
            s.confirm = Some(Confirmation {
                message: format!("Are you sure you want to delete \"{}\"?", task.title),
                action: PendingAction::Delete(id),
            });
            true
        })
    }

    pub fn cancel_confirm(&self) {
        self.mutate(|s| s.confirm = None);
    }

    /// Dismiss-key handling: closes whichever overlays are open.
    pub fn escape(&self) {
        self.mutate(|s| {
            s.edit = None;
            s.confirm = None;
        });
    }

    pub fn dismiss(&self, id: u64) {
        self.mutate(|s| s.notifications.retain(|n| n.id != id));
    }

    pub fn take_notifications(&self) -> Vec<Notification> {
        self.mutate(|s| std::mem::take(&mut s.notifications))
    }

    pub fn clear_focus(&self) {
        self.mutate(|s| s.focus = None);
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let out = f(&mut self.session.borrow_mut());
        self.changed();
        out
    }

    fn changed(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    fn busy(&self) -> BusyGuard<'_, A> {
        self.mutate(|s| s.in_flight += 1);
        BusyGuard { controller: self }
    }

    fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        let duration_ms = self.settings.notify_duration_ms;
        let message = message.into();
        debug!(kind = kind.as_key(), message = %message, "notification");
        self.mutate(|s| {
            s.next_notification_id += 1;
            s.notifications.push(Notification {
                id: s.next_notification_id,
                kind,
                title: kind.title(),
                message,
                duration_ms,
            });
        });
    }

    fn notify_failure(&self, err: &ClientError) {
        match err {
            ClientError::Validation(_) => self.notify(NotificationKind::Warning, err.message()),
            ClientError::Request(_) => self.notify(NotificationKind::Error, err.message()),
        }
    }

    fn reject(&self, err: ValidationError, focus: FocusTarget) {
        warn!(field = err.field, "validation failed");
        self.mutate(|s| s.focus = Some(focus));
        self.notify(NotificationKind::Warning, err.message);
    }
}

impl<A: TaskApi> Controller<A> {
    #[instrument(skip(self), fields(command = command.name()))]
    pub async fn dispatch(&self, command: Command) {
        match command {
            Command::Load => self.load().await,
            Command::SetDraftTitle(title) => self.set_draft_title(title),
            Command::SetDraftDescription(description) => self.set_draft_description(description),
            Command::Create => self.create().await,
            Command::OpenEdit(id) => {
                self.open_edit(id);
            }
            Command::SetEditTitle(title) => self.set_edit_title(title),
            Command::SetEditDescription(description) => self.set_edit_description(description),
            Command::SetEditCompleted(completed) => self.set_edit_completed(completed),
            Command::SaveEdit => self.save_edit().await,
            Command::CloseEdit => self.close_edit(),
            Command::Toggle(id) => self.toggle(id).await,
            Command::RequestDelete(id) => {
                self.request_delete(id);
            }
            Command::Confirm => self.confirm().await,
            Command::CancelConfirm => self.cancel_confirm(),
            Command::SetFilter(filter) => self.set_filter(filter),
            Command::Escape => self.escape(),
            Command::Dismiss(id) => self.dismiss(id),
            Command::ClearFocus => self.clear_focus(),
        }
    }

    #[instrument(skip(self))]
    pub async fn load(&self) {
        let result = {
            let _busy = self.busy();
            self.api.list_tasks().await
        };

        match result {
            Ok(tasks) => {
                info!(count = tasks.len(), "tasks loaded");
                self.mutate(|s| s.store.set_all(tasks));
            }
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                self.notify(NotificationKind::Error, "Failed to load tasks");
            }
        }
    }

    /// Submits the add form.
    #[instrument(skip(self))]
    pub async fn create(&self) {
        let draft = self.session.borrow().draft.clone();
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            self.reject(ValidationError::required("title"), FocusTarget::AddTitle);
            return;
        }
        let description = draft.description.trim().to_string();

        let result = {
            let _busy = self.busy();
            self.api.create_task(&title, &description).await
        };

        match result {
            Ok(task) => {
                info!(id = task.id, "task created");
                self.mutate(|s| {
                    s.store.upsert(task);
                    s.draft = TaskDraft::default();
                });
                self.notify(NotificationKind::Success, "Task created successfully");
            }
            Err(err) => self.notify_failure(&err),
        }
    }

    /// Submits the edit form. The form stays open when the call fails.
    #[instrument(skip(self))]
    pub async fn save_edit(&self) {
        let Some(edit) = self.session.borrow().edit.clone() else {
            debug!("save requested with no edit form open");
            return;
        };
        let title = edit.title.trim().to_string();
        if title.is_empty() {
            self.reject(ValidationError::required("title"), FocusTarget::EditTitle);
            return;
        }
        let description = edit.description.trim().to_string();

        let result = {
            let _busy = self.busy();
            self.api
                .update_task(edit.task_id, &title, &description, edit.completed)
                .await
        };

        match result {
            Ok(task) => {
                info!(id = task.id, "task updated");
                self.mutate(|s| {
                    s.store.upsert(task);
                    if s.edit.as_ref().map(|e| e.task_id) == Some(edit.task_id) {
                        s.edit = None;
                    }
                });
                self.notify(NotificationKind::Success, "Task updated successfully");
            }
            Err(err) => self.notify_failure(&err),
        }
    }

    /// Flips completion. Only `completed` of the local copy is patched because
    /// the toggle response does not carry the full task.
    #[instrument(skip(self))]
    pub async fn toggle(&self, id: TaskId) {
        let result = {
            let _busy = self.busy();
            self.api.toggle_task(id).await
        };

        match result {
            Ok(toggled) => {
                let matched = self.mutate(|s| s.store.set_completed(id, toggled.completed));
                if !matched {
                    debug!(id, "toggled task is no longer in the store");
                }
                let message = if toggled.message.trim().is_empty() {
                    "Task updated successfully".to_string()
                } else {
                    toggled.message
                };
                self.notify(NotificationKind::Success, message);
            }
            Err(err) => self.notify_failure(&err),
        }
    }

    /// Closes the confirmation dialog, then runs its pending action.
    #[instrument(skip(self))]
    pub async fn confirm(&self) {
        let pending = self.mutate(|s| s.confirm.take());
        match pending.map(|c| c.action) {
            Some(PendingAction::Delete(id)) => self.delete(id).await,
            None => debug!("confirm with no pending action"),
        }
    }

    async fn delete(&self, id: TaskId) {
        let result = {
            let _busy = self.busy();
            self.api.delete_task(id).await
        };

        match result {
            Ok(()) => {
                info!(id, "task deleted");
                self.mutate(|s| {
                    s.store.remove(id);
                    if s.edit.as_ref().map(|e| e.task_id) == Some(id) {
                        s.edit = None;
                    }
                });
                self.notify(NotificationKind::Success, "Task deleted successfully");
            }
            Err(err) => self.notify_failure(&err),
        }
    }
}
