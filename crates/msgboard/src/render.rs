// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output for messages, pages, tasks, and users.
//!
//! Every function returns the text to print, so formatting is testable
//! without capturing stdout. Colors are only applied when `use_color` is set.

use msgboard_core::message_id::{self, IdProblem};
use msgboard_core::{Message, Page, Task, TaskStatus, User};

/// How ids and colors are rendered.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub use_color: bool,
    pub id_len: usize,
}

/// Formats a timestamp the way listings show it.
fn timestamp(ts: &chrono::NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Short id for listings. Ids that would not resolve are flagged.
pub fn short_id(id: &str, style: Style) -> String {
    let short = message_id::truncate_for_display(id, style.id_len);
    if message_id::is_valid_id(id) {
        return short;
    }
    if style.use_color {
        use colored::Colorize;
        format!("{} {}", short, "(invalid id)".yellow())
    } else {
        format!("{short} (invalid id)")
    }
}

pub fn message_line(msg: &Message, style: Style) -> String {
    let id = short_id(&msg.id, style);
    let when = timestamp(&msg.created_at);
    if style.use_color {
        use colored::Colorize;
        format!(
            "{}  {}  {}  {}",
            id.cyan(),
            msg.user_id.bold(),
            when.dimmed(),
            msg.content
        )
    } else {
        format!("{id}  {}  {when}  {}", msg.user_id, msg.content)
    }
}

/// A listing page with a `page N of M` footer (1-based for humans).
pub fn page(page: &Page<Message>, style: Style) -> String {
    if page.content.is_empty() {
        return "No messages.".to_string();
    }

    let mut out: Vec<String> = page.content.iter().map(|m| message_line(m, style)).collect();
    out.push(String::new());
    let total = page.total_pages.max(1);
    let mut footer = format!("page {} of {total}", page.number + 1);
    if let Some(count) = page.total_elements {
        footer.push_str(&format!(" ({count} messages)"));
    }
    if !page.is_last() {
        footer.push_str(&format!(", next: --page {}", page.number + 2));
    }
    out.push(footer);
    out.join("\n")
}

/// Full detail view of one message.
pub fn message_detail(msg: &Message) -> String {
    let mut out = vec![
        format!("id:       {}", message_id::format_for_display(&msg.id)),
        format!("author:   {}", msg.user_id),
        format!("created:  {}", timestamp(&msg.created_at)),
    ];
    if msg.updated_at != msg.created_at {
        out.push(format!("updated:  {}", timestamp(&msg.updated_at)));
    }
    out.push(String::new());
    out.push(msg.content.clone());
    out.join("\n")
}

pub fn task(task: &Task, style: Style) -> String {
    let status = task.status.to_string();
    let status = if style.use_color {
        use colored::Colorize;
        match task.status {
            TaskStatus::Pending => status.yellow().to_string(),
            TaskStatus::Completed => status.green().to_string(),
            TaskStatus::Failed => status.red().to_string(),
        }
    } else {
        status
    };

    match &task.error {
        Some(error) => format!("task {}: {status} ({error})", task.task_id),
        None => format!("task {}: {status}", task.task_id),
    }
}

pub fn user(user: &User) -> String {
    let id = user.id.as_deref().unwrap_or("-");
    if user.email.is_empty() {
        format!("{} (id {id})", user.username)
    } else {
        format!("{} <{}> (id {id})", user.username, user.email)
    }
}

/// Outcome of `msgboard validate`.
pub fn validation(id: &str, problem: Option<IdProblem>, style: Style) -> String {
    match problem {
        None => {
            if style.use_color {
                use colored::Colorize;
                format!("{} {id}", "valid".green())
            } else {
                format!("valid {id}")
            }
        }
        Some(problem) => {
            if style.use_color {
                use colored::Colorize;
                format!("{} {}", "invalid".red(), problem.message())
            } else {
                format!("invalid {}", problem.message())
            }
        }
    }
}
