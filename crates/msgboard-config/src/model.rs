// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported instead of silently ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level msgboard configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MsgboardConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Task polling settings.
    #[serde(default)]
    pub poll: PollConfig,

    /// Listing defaults.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Output formatting.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging.
    #[serde(default)]
    pub log: LogConfig,

    /// Session persistence.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Route shape used for "messages by user".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserMessagesPath {
    /// `/messages/users/{userId}`
    #[default]
    MessagesFirst,
    /// `/users/{userId}/messages`
    UsersFirst,
}

/// Backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL every route is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub user_messages_path: UserMessagesPath,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            user_messages_path: UserMessagesPath::default(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Task polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Delay between task status queries, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Upper bound on a whole poll session. `None` polls until a terminal state.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_secs: None,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_interval_ms() -> u64 {
    2000
}

/// Listing defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

/// Output formatting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Characters of a message id shown before the ellipsis.
    #[serde(default = "default_id_truncate_len")]
    pub id_truncate_len: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            id_truncate_len: default_id_truncate_len(),
        }
    }
}

fn default_id_truncate_len() -> usize {
    8
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Session persistence configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Where the logged-in user is remembered. Defaults to
    /// `<config dir>/msgboard/session.json`.
    #[serde(default)]
    pub path: Option<String>,
}
