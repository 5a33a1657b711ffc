//! Read-only views over the task list: search/status predicate and counts.

use crate::error::AppError;
use crate::model::{Task, TaskPriority, TaskStatus};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusSelector {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusSelector {
    pub fn accepts(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}

impl fmt::Display for StatusSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusSelector {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        raw.parse().map(Self::Only)
    }
}

/// True when `task` passes both the status selector and the text query.
///
/// An empty query matches everything; otherwise the lowercased query must
/// occur in the lowercased title or description.
pub fn matches(task: &Task, query: &str, selector: StatusSelector) -> bool {
    if !selector.accepts(task.status) {
        return false;
    }

    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub query: String,
    pub status: StatusSelector,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
}

impl TaskFilter {
    pub fn new<Q: Into<String>>(query: Q, status: StatusSelector) -> Self {
        Self {
            query: query.into(),
            status,
            ..Self::default()
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if !matches(task, &self.query, self.status) {
            return false;
        }

        if let Some(priority) = self.priority
            && task.priority != priority
        {
            return false;
        }

        match self.assignee.as_deref().map(str::trim) {
            None => true,
            Some(wanted) => task
                .assignee
                .as_deref()
                .is_some_and(|assignee| assignee.trim().eq_ignore_ascii_case(wanted)),
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }
        stats
    }
}
