use crate::error::AppError;
use crate::model::Task;
use std::collections::HashSet;

pub fn encode_tasks(tasks: &[Task]) -> Result<Vec<u8>, AppError> {
    serde_json::to_vec(tasks).map_err(|err| AppError::persistence_write(err.to_string()))
}

pub fn decode_tasks(bytes: &[u8]) -> Result<Vec<Task>, AppError> {
    let tasks: Vec<Task> =
        serde_json::from_slice(bytes).map_err(|err| AppError::persistence_read(err.to_string()))?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(AppError::persistence_read(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
    }

    Ok(tasks)
}
