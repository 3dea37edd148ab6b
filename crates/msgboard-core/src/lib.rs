// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the msgboard client.
//!
//! This crate provides the resource types, the error taxonomy, message id
//! validation, the session context, and the trait seams implemented by the
//! HTTP client. It performs no I/O.

pub mod error;
pub mod message_id;
pub mod session;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, MsgboardError};
pub use message_id::{IdProblem, IdValidation, RawId};
pub use session::{MemorySessionStore, Session, SessionStore};
pub use traits::{MessageApi, TaskSource, UserApi};
pub use types::{
    Message, Page, PageRequest, RegisterRequest, Task, TaskId, TaskStatus, User, UserUpdate,
};

#[cfg(test)]
mod tests {
    use super::*;

    struct FinishedTasks;

    #[async_trait::async_trait]
    impl TaskSource for FinishedTasks {
        async fn task_status(&self, task_id: &TaskId) -> Result<Task, MsgboardError> {
            Ok(Task {
                task_id: task_id.clone(),
                status: TaskStatus::Completed,
                error: None,
            })
        }
    }

    #[tokio::test]
    async fn task_source_works_as_trait_object() {
        let source: Box<dyn TaskSource> = Box::new(FinishedTasks);
        let task = source.task_status(&TaskId::from("t1")).await.unwrap();
        assert_eq!(task.task_id, "t1");
        assert!(task.status.is_terminal());
    }

    #[test]
    fn session_store_works_as_trait_object() {
        let store: Box<dyn SessionStore> = Box::new(MemorySessionStore::default());
        let mut session = store.load().unwrap();
        assert!(!session.is_logged_in());

        session.login(User {
            id: Some("1".into()),
            username: "alice".into(),
            email: String::new(),
        });
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap().current().map(|u| u.username.as_str()), Some("alice"));
    }

    #[test]
    fn validator_reexports_are_usable() {
        assert!(message_id::is_valid_id("ABCD1234-EFGH-5678-IJKL-MNOPQRSTUVWX"));
        assert_eq!(
            message_id::validate_with_error("").problem,
            Some(IdProblem::Empty)
        );
    }
}
