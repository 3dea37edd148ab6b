// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource types exchanged with the message-board backend.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Identifier of an asynchronous backend task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A message stored by the backend.
///
/// `id` never changes once assigned; updates only touch `content` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Lifecycle state of a backend task. `Completed` and `Failed` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Backend view of an asynchronous create/update/delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: TaskId,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PageWire<T>")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: Option<u64>,
    /// Zero-based index of this page. Some backends call it `page`.
    pub number: u32,
    pub size: Option<u32>,
}

/// Listing body as sent. Spring-style backends may send both `number`
/// and `page`; `number` wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageWire<T> {
    content: Vec<T>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_elements: Option<u64>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    size: Option<u32>,
}

impl<T> From<PageWire<T>> for Page<T> {
    fn from(wire: PageWire<T>) -> Self {
        Page {
            content: wire.content,
            total_pages: wire.total_pages,
            total_elements: wire.total_elements,
            number: wire.number.or(wire.page).unwrap_or_default(),
            size: wire.size,
        }
    }
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.total_pages == 0 || self.number + 1 >= self.total_pages
    }
}

/// Zero-based page request. Size defaults to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;

    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// A registered user as returned by the backend. Passwords are never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    /// Key used to attribute messages to this user.
    pub fn author_key(&self) -> &str {
        &self.username
    }
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `PUT /users/{id}`. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Numeric database keys and string keys both end up as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Key>::deserialize(deserializer)?.map(|k| match k {
        Key::Text(s) => s,
        Key::Number(n) => n.to_string(),
    }))
}
