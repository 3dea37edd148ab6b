// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! msgboard - command-line client for the message board.

mod commands;
mod render;
mod session_store;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use msgboard_config::MsgboardConfig;
use msgboard_core::{MsgboardError, UserUpdate};

use crate::commands::App;
use crate::session_store::FileSessionStore;

/// msgboard - read and post to a message board from the terminal.
#[derive(Parser, Debug)]
#[command(name = "msgboard", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List all messages, newest page first.
    List {
        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Messages per page (defaults to pagination.default_page_size).
        #[arg(long)]
        size: Option<u32>,
    },
    /// List the messages of one user.
    UserMessages {
        user_id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },
    /// Show one message.
    Get { id: String },
    /// Post a message.
    Create {
        content: String,
        /// Author to post as (defaults to the logged-in user).
        #[arg(long)]
        user: Option<String>,
        /// Wait for the backend to finish and show the result.
        #[arg(long)]
        wait: bool,
    },
    /// Replace the content of a message.
    Update {
        id: String,
        content: String,
        #[arg(long)]
        wait: bool,
    },
    /// Delete a message.
    Delete {
        id: String,
        #[arg(long)]
        wait: bool,
    },
    /// Show the status of a background task.
    Task { task_id: String },
    /// Check a message id without contacting the backend.
    Validate { id: String },
    /// Log in and remember the user for later commands.
    Login { username: String },
    /// Forget the logged-in user.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Create an account.
    Register { username: String, email: String },
    /// Show a user profile.
    User { user_id: String },
    /// Change a user profile.
    #[command(group(
        ArgGroup::new("changes")
            .required(true)
            .multiple(true)
            .args(["email", "password"])
    ))]
    UpdateUser {
        user_id: String,
        #[arg(long)]
        email: Option<String>,
        /// Prompt for a new password.
        #[arg(long)]
        password: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => msgboard_config::load_and_validate_path(path),
        None => msgboard_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            msgboard_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    if let Err(e) = run(cli.command, &config, cli.plain).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &MsgboardConfig, plain: bool) -> Result<(), MsgboardError> {
    let store = FileSessionStore::from_config(&config.session)?;
    let use_color = !plain && std::io::stdout().is_terminal();
    let app = App::new(config, Box::new(store), use_color)?;

    match command {
        Commands::List { page, size } => app.list(page, size).await,
        Commands::UserMessages {
            user_id,
            page,
            size,
        } => app.user_messages(&user_id, page, size).await,
        Commands::Get { id } => app.get(&id).await,
        Commands::Create {
            content,
            user,
            wait,
        } => app.create(&content, user.as_deref(), wait).await,
        Commands::Update { id, content, wait } => app.update(&id, &content, wait).await,
        Commands::Delete { id, wait } => app.delete(&id, wait).await,
        Commands::Task { task_id } => app.task(&task_id).await,
        Commands::Validate { id } => app.validate(&id),
        Commands::Login { username } => {
            let password = prompt_password("Password: ")?;
            app.login(&username, &password).await
        }
        Commands::Logout => app.logout(),
        Commands::Whoami => app.whoami(),
        Commands::Register { username, email } => {
            let password = prompt_password("Choose a password: ")?;
            app.register(&username, &email, &password).await
        }
        Commands::User { user_id } => app.user(&user_id).await,
        Commands::UpdateUser {
            user_id,
            email,
            password,
        } => {
            let password = if password {
                Some(prompt_password("New password: ")?)
            } else {
                None
            };
            let update = UserUpdate {
                email,
                password,
                ..Default::default()
            };
            app.update_user(&user_id, update).await
        }
    }
}

fn prompt_password(prompt: &str) -> Result<String, MsgboardError> {
    rpassword::prompt_password(prompt)
        .map_err(|e| MsgboardError::Internal(format!("failed to read password: {e}")))
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("msgboard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
