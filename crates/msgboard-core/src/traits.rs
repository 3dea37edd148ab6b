// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the HTTP client, the task poller, and callers.
//!
//! Both traits use `#[async_trait]` so they can be held as trait objects.

use async_trait::async_trait;

use crate::error::MsgboardError;
use crate::types::{
    Message, Page, PageRequest, RegisterRequest, Task, TaskId, User, UserUpdate,
};

/// Anything that can report the current state of a backend task.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn task_status(&self, task_id: &TaskId) -> Result<Task, MsgboardError>;
}

/// The message-board REST operations.
///
/// Identifier-addressed calls (`get_message`, `update_message`,
/// `delete_message`) reject a malformed id before performing any I/O.
/// Mutations return the id of the backend task that carries them out.
#[async_trait]
pub trait MessageApi: TaskSource {
    async fn list_messages(&self, page: PageRequest) -> Result<Page<Message>, MsgboardError>;

    async fn list_user_messages(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> Result<Page<Message>, MsgboardError>;

    async fn get_message(&self, id: &str) -> Result<Message, MsgboardError>;

    async fn create_message(&self, user_id: &str, content: &str) -> Result<TaskId, MsgboardError>;

    async fn update_message(&self, id: &str, content: &str) -> Result<TaskId, MsgboardError>;

    async fn delete_message(&self, id: &str) -> Result<TaskId, MsgboardError>;
}

/// Account operations used by login and registration flows.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<User, MsgboardError>;

    async fn register(&self, request: &RegisterRequest) -> Result<User, MsgboardError>;

    async fn get_user(&self, user_id: &str) -> Result<User, MsgboardError>;

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<User, MsgboardError>;
}
