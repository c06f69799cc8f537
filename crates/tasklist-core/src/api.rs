//! Task API client.
//!
//! [`ApiClient`] owns URL building, request encoding, local validation and
//! response normalization. The wire itself is behind [`Transport`] so the
//! same client runs on reqwest natively and on `fetch` in the browser.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tasklist_shared::{
    ErrorBody, Task, TaskCreate, TaskId, TaskListResponse, TaskResponse, TaskUpdate, ToggleResult,
};
use tracing::{debug, instrument, warn};

use crate::error::{ClientError, RequestError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

/// One HTTP exchange, already addressed. `body` is JSON when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single request. Must not retry.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, RequestError>;
}

/// The resource operations the interaction layer depends on.
#[async_trait(?Send)]
pub trait TaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;

    async fn create_task(&self, title: &str, description: &str) -> Result<Task, ClientError>;

    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<Task, ClientError>;

    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError>;

    async fn toggle_task(&self, id: TaskId) -> Result<ToggleResult, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<RawResponse, RequestError> {
        let request = ApiRequest {
            method,
            url: self.url(path),
            body,
        };
        debug!(method = method.as_str(), url = %request.url, "sending request");

        let response = self.transport.send(request).await.inspect_err(|err| {
            warn!(method = method.as_str(), path, error = %err, "transport failure");
        })?;

        if !response.is_success() {
            let err = error_from_response(&response);
            warn!(
                method = method.as_str(),
                path,
                status = response.status,
                error = %err,
                "request rejected"
            );
            return Err(err);
        }

        debug!(status = response.status, "request succeeded");
        Ok(response)
    }
}

#[async_trait(?Send)]
impl<T: Transport> TaskApi for ApiClient<T> {
    #[instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.call(Method::Get, "/tasks", None).await?;
        let list: TaskListResponse = decode_payload(&response)?;
        Ok(list.tasks)
    }

    #[instrument(skip(self, description), fields(title_len = title.len()))]
    async fn create_task(&self, title: &str, description: &str) -> Result<Task, ClientError> {
        let body = encode(&TaskCreate {
            title: required_title(title)?,
            description: description.to_string(),
        })?;
        let response = self.call(Method::Post, "/tasks", Some(body)).await?;
        let created: TaskResponse = decode_payload(&response)?;
        Ok(created.task)
    }

    #[instrument(skip(self, title, description))]
    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<Task, ClientError> {
        let body = encode(&TaskUpdate {
            title: required_title(title)?,
            description: description.to_string(),
            completed,
        })?;
        let response = self
            .call(Method::Put, &format!("/tasks/{id}"), Some(body))
            .await?;
        let updated: TaskResponse = decode_payload(&response)?;
        Ok(updated.task)
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        self.call(Method::Delete, &format!("/tasks/{id}"), None)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn toggle_task(&self, id: TaskId) -> Result<ToggleResult, ClientError> {
        let response = self
            .call(Method::Patch, &format!("/tasks/{id}/toggle"), None)
            .await?;
        Ok(decode_payload(&response)?)
    }
}

/// Builds the failure for a non-2xx response from its optional `{ message }` body.
pub fn error_from_response(response: &RawResponse) -> RequestError {
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message);
    RequestError::from_status(response.status, message)
}

pub fn decode_payload<D: DeserializeOwned>(response: &RawResponse) -> Result<D, RequestError> {
    serde_json::from_str(&response.body)
        .map_err(|err| RequestError::malformed(response.status, err))
}

fn encode<S: Serialize>(body: &S) -> Result<String, RequestError> {
    serde_json::to_string(body)
        .map_err(|err| RequestError::new(None, format!("failed to encode request: {err}")))
}

fn required_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::required("title"));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use async_trait::async_trait;

    use super::*;
    use crate::error::GENERIC_FAILURE;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<RawResponse, RequestError>>>,
        sent: RefCell<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(RawResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, message: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(RequestError::transport(message)));
            self
        }
    }

    #[async_trait(?Send)]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> Result<RawResponse, RequestError> {
            self.sent.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(RequestError::transport("no scripted reply")))
        }
    }

    fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
        ApiClient::new("http://localhost:5000/api/", transport)
    }

    const TASK_JSON: &str = r#"{"id":1,"title":"Buy milk","description":"","completed":false,"created_at":"2024-01-05T10:30:00"}"#;

    #[tokio::test]
    async fn list_builds_url_and_decodes_envelope() {
        let api = client(
            ScriptedTransport::default().reply(200, &format!(r#"{{"tasks":[{TASK_JSON}]}}"#)),
        );

        let tasks = api.list_tasks().await.expect("list");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");

        assert_eq!(api.base_url(), "http://localhost:5000/api");
        let sent = api.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].url, "http://localhost:5000/api/tasks");
        assert_eq!(sent[0].body, None);
    }

    #[tokio::test]
    async fn create_trims_title_and_posts_json() {
        let api = client(ScriptedTransport::default().reply(201, &format!(r#"{{"task":{TASK_JSON}}}"#)));

        let task = api.create_task("  Buy milk ", "2%").await.expect("create");
        assert_eq!(task.id, 1);

        let sent = api.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Post);
        let body: serde_json::Value =
            serde_json::from_str(sent[0].body.as_deref().unwrap_or_default()).expect("json body");
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["description"], "2%");
    }

    #[tokio::test]
    async fn blank_title_never_reaches_transport() {
        let api = client(ScriptedTransport::default());

        let err = api.create_task("   ", "").await.expect_err("validation");
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.message(), "Task title is required");

        let err = api.update_task(3, "", "", true).await.expect_err("validation");
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(api.transport().sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let api = client(
            ScriptedTransport::default().reply(404, r#"{"success":false,"message":"Task not found"}"#),
        );

        let err = api.update_task(7, "x", "", false).await.expect_err("404");
        assert_eq!(
            err,
            ClientError::Request(RequestError::new(Some(404), "Task not found"))
        );
        assert_eq!(api.transport().sent.borrow()[0].url, "http://localhost:5000/api/tasks/7");
    }

    #[tokio::test]
    async fn missing_or_unreadable_error_body_uses_generic_message() {
        let api = client(
            ScriptedTransport::default()
                .reply(500, r#"{"success":false}"#)
                .reply(502, "<html>Bad Gateway</html>")
                .reply(400, r#"{"message":""}"#),
        );

        for status in [500, 502, 400] {
            let err = api.delete_task(1).await.expect_err("failure");
            assert_eq!(
                err,
                ClientError::Request(RequestError::new(Some(status), GENERIC_FAILURE))
            );
        }
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_request_error() {
        let api = client(ScriptedTransport::default().reply(200, "not json"));

        let err = api.toggle_task(1).await.expect_err("malformed");
        match err {
            ClientError::Request(err) => {
                assert_eq!(err.status, Some(200));
                assert!(err.message.starts_with("Malformed response:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_task_without_title() {
        let api = client(ScriptedTransport::default().reply(201, r#"{"task":{"id":9}}"#));

        let err = api.create_task("Buy milk", "").await.expect_err("missing title");
        match err {
            ClientError::Request(err) => {
                assert_eq!(err.status, Some(201));
                assert!(err.message.starts_with("Malformed response:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_has_no_status() {
        let api = client(ScriptedTransport::default().fail("connection refused"));

        let err = api.list_tasks().await.expect_err("transport");
        assert_eq!(
            err,
            ClientError::Request(RequestError::new(None, "connection refused"))
        );
    }

    #[tokio::test]
    async fn delete_ignores_body_and_toggle_hits_patch_route() {
        let api = client(
            ScriptedTransport::default()
                .reply(200, "")
                .reply(200, r#"{"completed":true,"message":"Task marked as completed"}"#),
        );

        api.delete_task(5).await.expect("delete");
        let toggled = api.toggle_task(5).await.expect("toggle");
        assert!(toggled.completed);

        let sent = api.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Delete);
        assert_eq!(sent[1].method, Method::Patch);
        assert_eq!(sent[1].url, "http://localhost:5000/api/tasks/5/toggle");
    }
}
