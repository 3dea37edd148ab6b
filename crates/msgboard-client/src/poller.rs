// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous task polling.
//!
//! Mutations return a [`TaskId`]; the [`TaskPoller`] queries its status on a
//! fixed interval until the task completes, fails, or polling is cancelled.
//! One status query is in flight at a time, and the next tick is scheduled
//! only after the previous response was handled.
//!
//! Per poll session exactly one of [`TaskObserver::on_completed`] or
//! [`TaskObserver::on_failed`] fires, unless the session is cancelled, in
//! which case neither does.

use std::sync::Arc;
use std::time::Duration;

use msgboard_config::model::PollConfig;
use msgboard_core::{MsgboardError, Task, TaskId, TaskSource, TaskStatus};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

/// Default period between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Why a poll session ended without completing.
#[derive(Debug, Error)]
pub enum PollFailure {
    /// The backend reported the task as `FAILED`. Displays the task's error text.
    #[error("{}", .error.as_deref().unwrap_or("task failed"))]
    Task {
        task_id: TaskId,
        error: Option<String>,
    },

    /// A status query failed; polling stops without retrying.
    #[error(transparent)]
    Transport(#[from] MsgboardError),

    /// The configured polling deadline passed while the task was still pending.
    #[error("task polling timed out after {0:?}")]
    TimedOut(Duration),
}

impl PollFailure {
    /// The task's own error text, when the backend reported one.
    pub fn task_error(&self) -> Option<&str> {
        match self {
            PollFailure::Task { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Converts into the client error taxonomy.
    pub fn into_error(self) -> MsgboardError {
        match self {
            PollFailure::Task { task_id, error } => MsgboardError::Server {
                context: format!("Task {task_id} failed"),
                status: None,
                message: error.unwrap_or_else(|| "task failed".to_string()),
            },
            PollFailure::Transport(err) => err,
            PollFailure::TimedOut(duration) => MsgboardError::Timeout { duration },
        }
    }
}

/// How a poll session ended.
#[derive(Debug)]
pub enum PollOutcome {
    Completed(Task),
    Failed(PollFailure),
    Cancelled,
}

impl PollOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PollOutcome::Completed(_))
    }
}

/// Receives the progress and terminal result of a poll session.
pub trait TaskObserver: Send + 'static {
    /// Called after each status query that found the task still pending.
    fn on_progress(&mut self, _task: &Task) {}

    fn on_completed(&mut self, task: &Task);

    fn on_failed(&mut self, failure: &PollFailure);
}

/// A [`TaskObserver`] built from a success closure and a failure closure.
pub struct Callbacks<C, F> {
    on_completed: C,
    on_failed: F,
}

impl<C, F> Callbacks<C, F>
where
    C: FnMut(&Task) + Send + 'static,
    F: FnMut(&PollFailure) + Send + 'static,
{
    pub fn new(on_completed: C, on_failed: F) -> Self {
        Self {
            on_completed,
            on_failed,
        }
    }
}

impl<C, F> TaskObserver for Callbacks<C, F>
where
    C: FnMut(&Task) + Send + 'static,
    F: FnMut(&PollFailure) + Send + 'static,
{
    fn on_completed(&mut self, task: &Task) {
        (self.on_completed)(task);
    }

    fn on_failed(&mut self, failure: &PollFailure) {
        (self.on_failed)(failure);
    }
}

/// Drives a task to a terminal state by polling a [`TaskSource`].
#[derive(Clone)]
pub struct TaskPoller {
    source: Arc<dyn TaskSource>,
    interval: Duration,
    timeout: Option<Duration>,
}

impl TaskPoller {
    /// Creates an unbounded poller querying `source` every `interval`.
    pub fn new(source: Arc<dyn TaskSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            timeout: None,
        }
    }

    /// Creates a poller from the `[poll]` config section.
    pub fn from_config(source: Arc<dyn TaskSource>, config: &PollConfig) -> Self {
        Self::new(source, config.interval()).with_timeout(config.timeout())
    }

    /// Gives up with [`PollFailure::TimedOut`] once `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts polling `task_id` on a background task.
    pub fn spawn<O: TaskObserver>(&self, task_id: TaskId, mut observer: O) -> PollHandle {
        let cancel = CancellationToken::new();
        let poller = self.clone();
        let token = cancel.clone();
        let id = task_id.clone();

        let join = tokio::spawn(async move { poller.run(&id, &mut observer, &token).await });

        PollHandle {
            task_id,
            guard: cancel.clone().drop_guard(),
            cancel,
            join,
        }
    }

    /// Polls `task_id` on the current task until a terminal state or cancellation.
    ///
    /// The first query happens one interval after the call.
    pub async fn run<O: TaskObserver>(
        &self,
        task_id: &TaskId,
        observer: &mut O,
        cancel: &CancellationToken,
    ) -> PollOutcome {
        let deadline = self.timeout.map(|t| (Instant::now() + t, t));
        let mut queries: u32 = 0;
        debug!(task_id = %task_id, interval = ?self.interval, "polling task");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(task_id = %task_id, queries, "polling cancelled");
                    return PollOutcome::Cancelled;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            if let Some((at, timeout)) = deadline
                && Instant::now() >= at
            {
                warn!(task_id = %task_id, queries, "task still pending at polling deadline");
                return Self::fail(observer, PollFailure::TimedOut(timeout));
            }

            queries += 1;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(task_id = %task_id, queries, "polling cancelled mid-query");
                    return PollOutcome::Cancelled;
                }
                result = self.source.task_status(task_id) => result,
            };

            let task = match result {
                Ok(task) => task,
                Err(err) => {
                    warn!(task_id = %task_id, error = %err, "task status query failed");
                    return Self::fail(observer, PollFailure::Transport(err));
                }
            };

            match task.status {
                TaskStatus::Pending => {
                    debug!(task_id = %task_id, queries, "task pending");
                    observer.on_progress(&task);
                }
                TaskStatus::Completed => {
                    info!(task_id = %task_id, queries, "task completed");
                    observer.on_completed(&task);
                    return PollOutcome::Completed(task);
                }
                TaskStatus::Failed => {
                    warn!(task_id = %task_id, error = ?task.error, "task failed");
                    let failure = PollFailure::Task {
                        task_id: task.task_id,
                        error: task.error,
                    };
                    return Self::fail(observer, failure);
                }
            }
        }
    }

    fn fail<O: TaskObserver>(observer: &mut O, failure: PollFailure) -> PollOutcome {
        observer.on_failed(&failure);
        PollOutcome::Failed(failure)
    }
}

/// Handle to a spawned poll session.
///
/// Dropping the handle (or an unfinished [`PollHandle::wait`] future) cancels
/// the session.
pub struct PollHandle {
    task_id: TaskId,
    cancel: CancellationToken,
    guard: DropGuard,
    join: JoinHandle<PollOutcome>,
}

impl PollHandle {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Stops polling. No further query is issued and no callback fires.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token that cancels this session when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the session to end.
    pub async fn wait(self) -> PollOutcome {
        let PollHandle { guard, join, .. } = self;
        let result = join.await;
        // The session is over; nothing left to cancel.
        let _ = guard.disarm();

        match result {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => PollOutcome::Cancelled,
            Err(err) => PollOutcome::Failed(PollFailure::Transport(MsgboardError::Internal(
                format!("poll task panicked: {err}"),
            ))),
        }
    }
}
