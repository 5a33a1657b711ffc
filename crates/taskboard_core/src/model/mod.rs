mod task;
pub(crate) mod timestamp;

pub use task::{Task, TaskInput, TaskPatch, TaskPriority, TaskStatus};
