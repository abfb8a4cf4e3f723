use std::collections::HashMap;

use crate::domain::task::{GeospatialTask, TaskId};

/// Registry of the tasks announced by the backend.
///
/// Fed by `TaskLoaded` signals; serves single-task lookup and listing. The
/// backend keeps its own view of the loaded tasks for broadcast execution.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskId, GeospatialTask>,
    order: Vec<TaskId>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task, replacing any previous task with the same id.
    pub fn register(&mut self, task: GeospatialTask) {
        let id = task.id().clone();
        if self.tasks.insert(id.clone(), task).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &TaskId) -> Option<&GeospatialTask> {
        self.tasks.get(id)
    }

    /// All registered tasks in announcement order.
    pub fn tasks(&self) -> Vec<&GeospatialTask> {
        self.order
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::{ParameterDataType, ParameterDirection, TaskParameterInfo};

    fn task(id: &str) -> GeospatialTask {
        GeospatialTask::new(
            TaskId::new(id),
            id.to_uppercase(),
            "",
            vec![TaskParameterInfo::new(
                "areas",
                ParameterDirection::Input,
                ParameterDataType::Features,
            )],
        )
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = TaskRegistry::new();
        registry.register(task("viewshed"));

        assert!(registry.get(&TaskId::new("viewshed")).is_some());
        assert!(registry.get(&TaskId::new("missing")).is_none());
    }

    #[test]
    fn test_tasks_preserve_announcement_order() {
        let mut registry = TaskRegistry::new();
        registry.register(task("b"));
        registry.register(task("a"));

        let ids: Vec<_> = registry.tasks().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_reregistering_replaces_without_duplicating() {
        let mut registry = TaskRegistry::new();
        registry.register(task("viewshed"));
        registry.register(task("viewshed"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.tasks().len(), 1);
    }
}
