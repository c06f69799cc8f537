use std::fmt::Display;

use thiserror::Error;

/// Message used when the server gives no usable explanation for a failure.
pub const GENERIC_FAILURE: &str = "Request failed";

/// A required field was empty. Raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("Task {field} is required"),
        }
    }
}

/// A non-2xx response or a transport failure, carrying a display message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    pub status: Option<u16>,
    pub message: String,
}

impl RequestError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Status-bearing failure; an empty or missing server message falls back to
    /// [`GENERIC_FAILURE`], anything else is kept as sent.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        Self::new(Some(status), message)
    }

    pub fn transport(err: impl Display) -> Self {
        Self::new(None, err.to_string())
    }

    pub fn malformed(status: u16, err: impl Display) -> Self {
        Self::new(Some(status), format!("Malformed response: {err}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl ClientError {
    pub fn message(&self) -> &str {
        match self {
            ClientError::Validation(err) => &err.message,
            ClientError::Request(err) => &err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_server_message_falls_back_to_generic() {
        assert_eq!(
            RequestError::from_status(500, Some(String::new())).message,
            GENERIC_FAILURE
        );
        assert_eq!(RequestError::from_status(502, None).message, GENERIC_FAILURE);
    }

    #[test]
    fn server_message_is_kept_verbatim() {
        assert_eq!(
            RequestError::from_status(404, Some(" Task not found ".to_string())),
            RequestError::new(Some(404), " Task not found ")
        );
        assert_eq!(RequestError::from_status(400, Some("  ".to_string())).message, "  ");
    }

    #[test]
    fn client_error_exposes_inner_message() {
        let validation: ClientError = ValidationError::required("title").into();
        assert_eq!(validation.message(), "Task title is required");
        assert_eq!(validation.to_string(), "Task title is required");

        let malformed: ClientError = RequestError::malformed(200, "expected value").into();
        assert_eq!(malformed.message(), "Malformed response: expected value");
    }
}
