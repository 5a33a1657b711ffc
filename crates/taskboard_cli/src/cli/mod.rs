use clap::{Parser, Subcommand};
use taskboard_core::error::AppError;
use taskboard_core::{StatusSelector, TaskPriority, TaskStatus};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Omit to start an interactive session
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskboard add "Write release notes" -d "for 0.2" --priority high
    Add {
        title: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,
        #[arg(long)]
        assignee: Option<String>,
        /// Due date, RFC 3339 or YYYY-MM-DD (midnight UTC)
        #[arg(long, value_parser = parse_due_date)]
        due: Option<OffsetDateTime>,
    },
    /// Change fields of an existing task
    ///
    /// Example: taskboard update 3 --priority low --unassign
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long, conflicts_with = "unassign")]
        assignee: Option<String>,
        #[arg(long)]
        unassign: bool,
        #[arg(long, value_parser = parse_due_date, conflicts_with = "clear_due")]
        due: Option<OffsetDateTime>,
        #[arg(long)]
        clear_due: bool,
    },
    /// Set the status of a task
    ///
    /// Example: taskboard status 2 in-progress
    Status { id: String, status: TaskStatus },
    /// Delete a task
    ///
    /// Example: taskboard delete 1
    Delete { id: String },
    /// Show details of a task
    ///
    /// Example: taskboard show 1
    Show { id: String },
    /// List tasks, optionally filtered
    ///
    /// Example: taskboard list -q api --status completed
    List {
        /// Case-insensitive text matched against title and description
        #[arg(short, long, default_value = "")]
        query: String,
        /// all, pending, in-progress or completed
        #[arg(long, default_value = "all")]
        status: StatusSelector,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Count tasks by status
    Stats,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_due_date(raw: &str) -> Result<OffsetDateTime, AppError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed);
    }

    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| AppError::invalid_input("due date must be RFC3339 or YYYY-MM-DD"))
}
