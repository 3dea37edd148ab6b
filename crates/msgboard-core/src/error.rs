// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the msgboard client.
//!
//! Every API-facing variant carries the operation context (for example
//! `"Failed to create message"`) and renders as `"{context}: {message}"`,
//! so callers can display provenance without knowing which call failed.

use std::time::Duration;

use strum::{Display, EnumString};
use thiserror::Error;

/// The primary error type returned by every client operation.
#[derive(Debug, Error)]
pub enum MsgboardError {
    /// A message identifier failed the format check, either locally before any
    /// request was made or because the server reported `INVALID_MESSAGE_ID`.
    #[error("{context}: {message}")]
    InvalidIdentifier { context: String, message: String },

    /// The addressed message does not exist (404 on a get-by-id).
    #[error("{context}: {message}")]
    NotFound { context: String, message: String },

    /// The server rejected the request with a 4xx status (other than id format).
    #[error("{context}: {message}")]
    Validation {
        context: String,
        status: u16,
        message: String,
    },

    /// The server failed (5xx), or returned a body that could not be understood.
    #[error("{context}: {message}")]
    Server {
        context: String,
        status: Option<u16>,
        message: String,
    },

    /// Transport failure before any response was obtained.
    #[error("{context}: {message}")]
    Network {
        context: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation needs a logged-in session and none is active.
    #[error("{context}: please log in first")]
    Unauthenticated { context: String },

    /// Client configuration is unusable (bad base URL, header values, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// A bounded operation (task polling) exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`MsgboardError`], for branching without matching on fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ErrorKind {
    InvalidIdentifier,
    NotFound,
    Validation,
    Server,
    Network,
    Unauthenticated,
    Config,
    Timeout,
    Internal,
}

impl MsgboardError {
    /// Builds an [`MsgboardError::InvalidIdentifier`] for the given operation.
    pub fn invalid_identifier(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Builds a [`MsgboardError::Network`] wrapping a transport error.
    pub fn network<E>(context: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            context: context.into(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
            Self::Network { .. } => ErrorKind::Network,
            Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            Self::Config(_) => ErrorKind::Config,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the operation context, if this error came from an API call.
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidIdentifier { context, .. }
            | Self::NotFound { context, .. }
            | Self::Validation { context, .. }
            | Self::Server { context, .. }
            | Self::Network { context, .. }
            | Self::Unauthenticated { context } => Some(context),
            Self::Config(_) | Self::Timeout { .. } | Self::Internal(_) => None,
        }
    }

    /// Returns the HTTP status that produced this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Validation { status, .. } => Some(*status),
            Self::Server { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_with_context() {
        let err = MsgboardError::Validation {
            context: "Failed to create message".into(),
            status: 400,
            message: "content is required".into(),
        };
        assert_eq!(err.to_string(), "Failed to create message: content is required");
        assert_eq!(err.context(), Some("Failed to create message"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn kind_matches_variant() {
        let err = MsgboardError::invalid_identifier("Failed to get message", "bad id");
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);

        let err = MsgboardError::network(
            "Failed to get messages",
            std::io::Error::other("connection refused"),
        );
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("connection refused"));

        let err = MsgboardError::Timeout {
            duration: Duration::from_secs(5),
        };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.context(), None);
    }

    #[test]
    fn error_kind_parses_from_display() {
        use std::str::FromStr;

        for kind in [ErrorKind::NotFound, ErrorKind::Server, ErrorKind::Network] {
            assert_eq!(ErrorKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }
}
