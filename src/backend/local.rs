//! In-process geoprocessing backend hosting registered task executors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::feature::FeaturePayload;
use crate::domain::task::GeospatialTask;
use crate::error::EngineError;

use super::{BackendSignal, BackendSignalSender, GeoprocessingBackend, TaskExecutor};

/// A [`GeoprocessingBackend`] that executes tasks in-process.
///
/// Executors are registered up front; `start` announces each of them once.
/// Every execution runs on its own spawned task, so callers observe outcomes
/// only through the signal channel.
pub struct LocalBackend {
    executors: Vec<Arc<dyn TaskExecutor>>,
    signals: BackendSignalSender,
}

impl LocalBackend {
    pub fn new(signals: BackendSignalSender) -> Self {
        Self {
            executors: Vec::new(),
            signals,
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executors.push(executor);
        self
    }

    pub fn task_count(&self) -> usize {
        self.executors.len()
    }

    fn find_executor(&self, task: &GeospatialTask) -> Option<&Arc<dyn TaskExecutor>> {
        self.executors
            .iter()
            .find(|executor| executor.task().id() == task.id())
    }

    fn spawn_execution(&self, executor: Arc<dyn TaskExecutor>, payload: FeaturePayload) {
        let signals = self.signals.clone();
        tokio::spawn(async move {
            let task = executor.task();
            debug!(task = %task.id(), "geoprocessing job starting");
            match executor.execute(payload).await {
                Ok(result) => {
                    debug!(task = %task.id(), "geoprocessing job succeeded");
                    let _ = signals.send(BackendSignal::TaskCompleted { result });
                }
                Err(error) => {
                    let _ = signals.send(BackendSignal::TaskFailed {
                        task: task.id().clone(),
                        error: error.to_string(),
                    });
                }
            }
        });
    }
}

#[async_trait]
impl GeoprocessingBackend for LocalBackend {
    async fn start(&self) -> Result<(), EngineError> {
        if self.executors.is_empty() {
            return Err(EngineError::BackendUnavailable(
                "no geoprocessing tasks are registered".into(),
            ));
        }

        for executor in &self.executors {
            let task = executor.task();
            info!(task = %task.id(), name = task.display_name(), "geoprocessing task loaded");
            let _ = self.signals.send(BackendSignal::TaskLoaded { task });
        }
        Ok(())
    }

    async fn execute_task(&self, task: &GeospatialTask, payload: FeaturePayload) {
        // A task without a feature-typed input parameter has nothing to bind
        // the payload to; the run is dropped before a job is created.
        if task.first_input_features_parameter().is_none() {
            debug!(task = %task.id(), "task declares no input features parameter; skipping");
            return;
        }

        let Some(executor) = self.find_executor(task) else {
            warn!(task = %task.id(), "task is not hosted by this backend");
            return;
        };

        self.spawn_execution(Arc::clone(executor), payload);
    }

    async fn execute_all(&self, payload: FeaturePayload) {
        for executor in &self.executors {
            let task = executor.task();
            if !task.accepts_feature_input() {
                debug!(task = %task.id(), "task does not accept feature input; skipping");
                continue;
            }
            self.spawn_execution(Arc::clone(executor), payload.clone());
        }
    }
}
