use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskboard_core::{Task, TaskStats};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

#[derive(Tabled)]
struct TaskRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Title")]
    title: &'a str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Assignee")]
    assignee: &'a str,
    #[tabled(rename = "Due")]
    due: String,
}

impl<'a> From<&'a Task> for TaskRow<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: &task.id,
            title: &task.title,
            status: task.status.as_str(),
            priority: task.priority.as_str(),
            assignee: task.assignee.as_deref().unwrap_or("-"),
            due: task
                .due_date
                .map(format_day)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn task_table(tasks: &[&Task]) -> String {
    let rows: Vec<TaskRow<'_>> = tasks.iter().map(|task| TaskRow::from(*task)).collect();
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn task_details(task: &Task) -> String {
    let mut lines = vec![
        format!("ID:          {}", task.id),
        format!("Title:       {}", task.title),
        format!("Status:      {}", task.status),
        format!("Priority:    {}", task.priority),
        format!(
            "Assignee:    {}",
            task.assignee.as_deref().unwrap_or("unassigned")
        ),
        format!(
            "Due:         {}",
            task.due_date
                .map(format_timestamp)
                .unwrap_or_else(|| "no due date".to_string())
        ),
        format!("Created:     {}", format_timestamp(task.created_at)),
        format!("Updated:     {}", format_timestamp(task.updated_at)),
    ];
    if !task.description.is_empty() {
        lines.push(String::new());
        lines.push(task.description.clone());
    }
    lines.join("\n")
}

pub fn stats_summary(stats: &TaskStats) -> String {
    format!(
        "Total: {}\nPending: {}\nIn progress: {}\nCompleted: {}",
        stats.total, stats.pending, stats.in_progress, stats.completed
    )
}

fn format_day(value: OffsetDateTime) -> String {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| value.to_string())
}

fn format_timestamp(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::{stats_summary, task_details, task_table};
    use taskboard_core::TaskStats;
    use taskboard_core::seed::seed_tasks;

    #[test]
    fn table_lists_every_row_with_headers() {
        let tasks = seed_tasks();
        let refs: Vec<_> = tasks.iter().collect();

        let table = task_table(&refs);

        assert!(table.contains("Title"));
        assert!(table.contains("Write API Documentation"));
        assert!(table.contains("in-progress"));
        assert!(table.contains("2025-06-25"));
    }

    #[test]
    fn details_fall_back_for_missing_fields() {
        let mut task = seed_tasks().remove(0);
        task.assignee = None;
        task.due_date = None;

        let details = task_details(&task);

        assert!(details.contains("Assignee:    unassigned"));
        assert!(details.contains("Due:         no due date"));
        assert!(details.contains("Created:     2025-06-15T00:00:00Z"));
    }

    #[test]
    fn stats_summary_lists_counts() {
        let summary = stats_summary(&TaskStats {
            total: 5,
            completed: 1,
            in_progress: 2,
            pending: 2,
        });

        assert_eq!(
            summary,
            "Total: 5\nPending: 2\nIn progress: 2\nCompleted: 1"
        );
    }
}
