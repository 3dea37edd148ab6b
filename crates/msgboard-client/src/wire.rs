// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request/response payloads and error-body classification.
//!
//! Backends describe failures inconsistently (`message`, `error`, or a
//! structured `code`/`errorCode`). The body is parsed once into an
//! [`ApiFailure`] and then mapped onto the error taxonomy by [`classify`].

use msgboard_core::message_id::IdProblem;
use msgboard_core::{MsgboardError, TaskId, User};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Structured code the backend uses for malformed message ids.
pub const INVALID_MESSAGE_ID: &str = "INVALID_MESSAGE_ID";

/// Body of `POST /messages`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageRequest<'a> {
    pub user_id: &'a str,
    pub content: &'a str,
}

/// Body of `PUT /messages/{id}`.
#[derive(Debug, Serialize)]
pub struct UpdateMessageRequest<'a> {
    pub content: &'a str,
}

/// Body of `POST /users/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Acknowledgement of an accepted mutation. Some backends send the bare id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskAccepted {
    Object {
        #[serde(rename = "taskId")]
        task_id: TaskId,
    },
    Bare(TaskId),
}

impl TaskAccepted {
    pub fn into_task_id(self) -> TaskId {
        match self {
            TaskAccepted::Object { task_id } | TaskAccepted::Bare(task_id) => task_id,
        }
    }
}

/// Successful login: either a `{success, user, message}` envelope or the user itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LoginReply {
    Envelope { user: User },
    User(User),
}

impl LoginReply {
    pub fn into_user(self) -> User {
        match self {
            LoginReply::Envelope { user } | LoginReply::User(user) => user,
        }
    }
}

/// What an error response body said, parsed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// The backend flagged the message id as malformed.
    InvalidMessageId { message: Option<String> },
    /// A human-readable `message` field.
    Message(String),
    /// An `error` field (used when `message` is absent).
    Error(String),
    /// JSON without any usable field.
    Unstructured,
    /// Not JSON at all (HTML error page, empty body, ...).
    Unparseable,
}

impl ApiFailure {
    pub fn parse(body: &[u8]) -> Self {
        let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body)
        else {
            return ApiFailure::Unparseable;
        };

        let text = |key: &str| {
            map.get(key)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let code = text("code").or_else(|| text("errorCode"));
        if code.as_deref() == Some(INVALID_MESSAGE_ID) {
            return ApiFailure::InvalidMessageId {
                message: text("message"),
            };
        }

        if let Some(message) = text("message") {
            ApiFailure::Message(message)
        } else if let Some(error) = text("error") {
            ApiFailure::Error(error)
        } else {
            ApiFailure::Unstructured
        }
    }
}

/// How a 404 should be read for the operation that received it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundPolicy {
    /// A lookup by id: 404 means the resource is missing.
    Missing(&'static str),
    /// Anything else: 404 is an ordinary client error.
    ClientError,
}

/// Map a non-success response onto [`MsgboardError`].
pub fn classify(
    context: &str,
    status: StatusCode,
    failure: ApiFailure,
    not_found: NotFoundPolicy,
) -> MsgboardError {
    let code = status.as_u16();
    let generic = || format!("response not ok (status {code})");

    if let ApiFailure::InvalidMessageId { message } = failure {
        return MsgboardError::InvalidIdentifier {
            context: context.to_string(),
            message: message.unwrap_or_else(|| IdProblem::Malformed.message().to_string()),
        };
    }

    if status == StatusCode::NOT_FOUND
        && let NotFoundPolicy::Missing(what) = not_found
    {
        return MsgboardError::NotFound {
            context: context.to_string(),
            message: format!("{what} not found"),
        };
    }

    let (message, understood) = match failure {
        ApiFailure::Message(m) | ApiFailure::Error(m) => (m, true),
        ApiFailure::Unstructured => (generic(), true),
        ApiFailure::Unparseable | ApiFailure::InvalidMessageId { .. } => (generic(), false),
    };

    if understood && status.is_client_error() {
        MsgboardError::Validation {
            context: context.to_string(),
            status: code,
            message,
        }
    } else {
        MsgboardError::Server {
            context: context.to_string(),
            status: Some(code),
            message,
        }
    }
}
