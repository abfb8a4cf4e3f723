//! Task executor error types.

use thiserror::Error;

/// Errors reported by a task executor.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task has no input features parameter")]
    MissingInputFeatures,
    #[error("Invalid task parameters: {0}")]
    InvalidParameters(String),
    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_display() {
        assert_eq!(
            TaskError::MissingInputFeatures.to_string(),
            "Task has no input features parameter"
        );
        assert_eq!(
            TaskError::InvalidParameters("empty name".into()).to_string(),
            "Invalid task parameters: empty name"
        );
        assert_eq!(
            TaskError::ExecutionFailed("boom".into()).to_string(),
            "Task execution failed: boom"
        );
    }
}
