//! Example tasks adopted when nothing usable has been persisted yet.

use crate::model::{Task, TaskPriority, TaskStatus};
use time::OffsetDateTime;
use time::macros::datetime;

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: TaskPriority,
    assignee: &str,
    due_date: OffsetDateTime,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        priority,
        assignee: Some(assignee.to_string()),
        due_date: Some(due_date),
        created_at,
        updated_at,
    }
}

pub fn seed_tasks() -> Vec<Task> {
    vec![
        seed(
            "1",
            "Design Mobile App Interface",
            "Create wireframes and mockups for the new mobile application interface with focus on user experience.",
            TaskStatus::InProgress,
            TaskPriority::High,
            "Sarah Chen",
            datetime!(2025-06-25 0:00 UTC),
            datetime!(2025-06-15 0:00 UTC),
            datetime!(2025-06-18 0:00 UTC),
        ),
        seed(
            "2",
            "Implement Real-time Notifications",
            "Set up push notification system for task updates and collaboration features.",
            TaskStatus::Pending,
            TaskPriority::Medium,
            "Mike Johnson",
            datetime!(2025-06-30 0:00 UTC),
            datetime!(2025-06-16 0:00 UTC),
            datetime!(2025-06-16 0:00 UTC),
        ),
        seed(
            "3",
            "Write API Documentation",
            "Complete comprehensive API documentation for the task management endpoints.",
            TaskStatus::Completed,
            TaskPriority::Medium,
            "Alex Rodriguez",
            datetime!(2025-06-20 0:00 UTC),
            datetime!(2025-06-10 0:00 UTC),
            datetime!(2025-06-19 0:00 UTC),
        ),
        seed(
            "4",
            "Set up CI/CD Pipeline",
            "Configure automated testing and deployment pipeline for the application.",
            TaskStatus::InProgress,
            TaskPriority::High,
            "David Kim",
            datetime!(2025-06-28 0:00 UTC),
            datetime!(2025-06-14 0:00 UTC),
            datetime!(2025-06-17 0:00 UTC),
        ),
        seed(
            "5",
            "User Testing Session",
            "Conduct user testing sessions to gather feedback on the new features.",
            TaskStatus::Pending,
            TaskPriority::Low,
            "Emma Wilson",
            datetime!(2025-07-05 0:00 UTC),
            datetime!(2025-06-18 0:00 UTC),
            datetime!(2025-06-18 0:00 UTC),
        ),
    ]
}
