// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand handlers.
//!
//! [`App`] owns the API client, the task poller, and the session store, and
//! prints results to stdout. Mutations either report the accepted task id or,
//! with `--wait`, follow the task to completion and refresh the affected view.

use std::sync::Arc;

use msgboard_client::{ApiClient, PollFailure, PollOutcome, TaskObserver, TaskPoller};
use msgboard_config::MsgboardConfig;
use msgboard_core::message_id;
use msgboard_core::{
    MessageApi, MsgboardError, PageRequest, RegisterRequest, SessionStore, Task, TaskId,
    TaskSource, UserApi, UserUpdate,
};
use tracing::debug;

use crate::render::{self, Style};

/// What to show once a mutation's task completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// The first page of all messages.
    Listing,
    /// The first page of one author's messages.
    UserListing(String),
    /// A single message by id.
    Message(String),
}

/// Everything the handlers need, built once from config.
pub struct App {
    client: Arc<ApiClient>,
    poller: TaskPoller,
    store: Box<dyn SessionStore + Send + Sync>,
    page_size: u32,
    style: Style,
}

impl App {
    pub fn new(
        config: &MsgboardConfig,
        store: Box<dyn SessionStore + Send + Sync>,
        use_color: bool,
    ) -> Result<Self, MsgboardError> {
        let client = Arc::new(ApiClient::from_config(&config.api)?);
        let poller = TaskPoller::from_config(client.clone(), &config.poll);
        Ok(Self {
            client,
            poller,
            store,
            page_size: config.pagination.default_page_size,
            style: Style {
                use_color,
                id_len: config.display.id_truncate_len,
            },
        })
    }

    /// Converts a 1-based `--page` and optional `--size` into a request.
    pub fn page_request(&self, page: u32, size: Option<u32>) -> PageRequest {
        PageRequest::new(page.saturating_sub(1), size.unwrap_or(self.page_size))
    }

    pub async fn list(&self, page: u32, size: Option<u32>) -> Result<(), MsgboardError> {
        let result = self.client.list_messages(self.page_request(page, size)).await?;
        println!("{}", render::page(&result, self.style));
        Ok(())
    }

    pub async fn user_messages(
        &self,
        user_id: &str,
        page: u32,
        size: Option<u32>,
    ) -> Result<(), MsgboardError> {
        let result = self
            .client
            .list_user_messages(user_id, self.page_request(page, size))
            .await?;
        println!("{}", render::page(&result, self.style));
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<(), MsgboardError> {
        let msg = self.client.get_message(id).await?;
        println!("{}", render::message_detail(&msg));
        Ok(())
    }

    /// Posts a message as `user`, or as the logged-in user when omitted.
    pub async fn create(
        &self,
        content: &str,
        user: Option<&str>,
        wait: bool,
    ) -> Result<(), MsgboardError> {
        let author = match user {
            Some(user) => user.to_string(),
            None => {
                let session = self.store.load()?;
                session
                    .require_user("Failed to create message")?
                    .author_key()
                    .to_string()
            }
        };

        let task_id = self.client.create_message(&author, content).await?;
        self.accepted(task_id, wait, Refresh::UserListing(author)).await
    }

    pub async fn update(&self, id: &str, content: &str, wait: bool) -> Result<(), MsgboardError> {
        let task_id = self.client.update_message(id, content).await?;
        self.accepted(task_id, wait, Refresh::Message(id.to_string()))
            .await
    }

    pub async fn delete(&self, id: &str, wait: bool) -> Result<(), MsgboardError> {
        let task_id = self.client.delete_message(id).await?;
        self.accepted(task_id, wait, Refresh::Listing).await
    }

    pub async fn task(&self, task_id: &str) -> Result<(), MsgboardError> {
        let task = self.client.task_status(&TaskId::from(task_id)).await?;
        println!("{}", render::task(&task, self.style));
        Ok(())
    }

    /// Checks an id locally. A bad id is reported and fails the command.
    pub fn validate(&self, id: &str) -> Result<(), MsgboardError> {
        let result = message_id::validate_with_error(id);
        println!("{}", render::validation(id, result.problem, self.style));
        match result.problem {
            None => Ok(()),
            Some(problem) => Err(MsgboardError::invalid_identifier(
                "Invalid message id",
                problem.message(),
            )),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), MsgboardError> {
        let user = self.client.login(username, password).await?;
        let mut session = self.store.load()?;
        session.login(user);
        self.store.save(&session)?;
        if let Some(user) = session.current() {
            println!("Logged in as {}", render::user(user));
        }
        Ok(())
    }

    pub fn logout(&self) -> Result<(), MsgboardError> {
        let mut session = self.store.load()?;
        match session.logout() {
            Some(user) => {
                self.store.save(&session)?;
                println!("Logged out {}", user.username);
            }
            None => println!("Not logged in."),
        }
        Ok(())
    }

    pub fn whoami(&self) -> Result<(), MsgboardError> {
        let session = self.store.load()?;
        match session.current() {
            Some(user) => println!("{}", render::user(user)),
            None => println!("Not logged in."),
        }
        Ok(())
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), MsgboardError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let user = self.client.register(&request).await?;
        println!("Registered {}", render::user(&user));
        Ok(())
    }

    pub async fn user(&self, user_id: &str) -> Result<(), MsgboardError> {
        let user = self.client.get_user(user_id).await?;
        println!("{}", render::user(&user));
        Ok(())
    }

    /// Updates a profile; the saved session follows if it is the same user.
    pub async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<(), MsgboardError> {
        let user = self.client.update_user(user_id, &update).await?;

        let mut session = self.store.load()?;
        let is_current = session
            .current()
            .and_then(|u| u.id.as_deref())
            .is_some_and(|id| id == user_id);
        if is_current {
            session.login(user.clone());
            self.store.save(&session)?;
        }

        println!("Updated {}", render::user(&user));
        Ok(())
    }

    async fn accepted(
        &self,
        task_id: TaskId,
        wait: bool,
        refresh: Refresh,
    ) -> Result<(), MsgboardError> {
        if !wait {
            println!("Accepted as task {task_id}. Check with: msgboard task {task_id}");
            return Ok(());
        }

        match self.follow(task_id.clone()).await {
            PollOutcome::Completed(_) => {
                println!("Task {task_id} completed.");
                self.refresh(refresh).await
            }
            PollOutcome::Failed(failure) => Err(failure.into_error()),
            PollOutcome::Cancelled => {
                println!("Stopped waiting. Task {task_id} may still complete.");
                Ok(())
            }
        }
    }

    /// Polls until the task ends. Ctrl+C cancels the poll session.
    async fn follow(&self, task_id: TaskId) -> PollOutcome {
        let handle = self.poller.spawn(
            task_id,
            ProgressReporter {
                style: self.style,
            },
        );

        let cancel = handle.cancellation_token();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, cancelling poll");
                cancel.cancel();
            }
        });

        let outcome = handle.wait().await;
        interrupt.abort();
        outcome
    }

    async fn refresh(&self, refresh: Refresh) -> Result<(), MsgboardError> {
        debug!(?refresh, "refreshing after task completion");
        match refresh {
            Refresh::Listing => self.list(1, None).await,
            Refresh::UserListing(user) => self.user_messages(&user, 1, None).await,
            Refresh::Message(id) => self.get(&id).await,
        }
    }
}

/// Prints each pending status to stderr while `--wait` is polling.
struct ProgressReporter {
    style: Style,
}

impl TaskObserver for ProgressReporter {
    fn on_progress(&mut self, task: &Task) {
        eprintln!("{}", render::task(task, self.style));
    }

    fn on_completed(&mut self, _task: &Task) {}

    fn on_failed(&mut self, failure: &PollFailure) {
        debug!(error = %failure, "poll session failed");
    }
}
