// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST client and task poller for the message board.
//!
//! [`ApiClient`] implements the [`MessageApi`](msgboard_core::MessageApi),
//! [`UserApi`](msgboard_core::UserApi) and [`TaskSource`](msgboard_core::TaskSource) seams over HTTP.
//! Mutations hand back a task id which [`TaskPoller`] follows until the
//! backend reports a terminal state.

pub mod client;
pub mod poller;
pub mod wire;

pub use client::ApiClient;
pub use poller::{
    Callbacks, PollFailure, PollHandle, PollOutcome, TaskObserver, TaskPoller,
    DEFAULT_POLL_INTERVAL,
};
