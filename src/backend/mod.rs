//! Geoprocessing backend — task announcement and execution.
//!
//! A [`GeoprocessingBackend`] is the execution service behind the engine:
//! it announces its loaded tasks once started and runs them against a
//! feature payload, reporting outcomes as [`BackendSignal`] messages on the
//! channel handed to it at construction. The engine never blocks on an
//! execution; it only reacts to the signals.

mod executor;
mod local;
mod registry;

pub use executor::TaskExecutor;
pub use local::LocalBackend;
pub use registry::TaskRegistry;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::domain::feature::{FeaturePayload, FeatureSet};
use crate::domain::task::{GeospatialTask, TaskId};
use crate::error::EngineError;

/// One named output produced by a task run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GeoprocessingParameter {
    Features(FeatureSet),
    Text(String),
}

/// The outputs of one completed task run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeoprocessingResult {
    task_name: String,
    outputs: HashMap<String, GeoprocessingParameter>,
}

impl GeoprocessingResult {
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            outputs: HashMap::new(),
        }
    }

    pub fn with_output(
        mut self,
        name: impl Into<String>,
        parameter: GeoprocessingParameter,
    ) -> Self {
        self.outputs.insert(name.into(), parameter);
        self
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn outputs(&self) -> &HashMap<String, GeoprocessingParameter> {
        &self.outputs
    }
}

/// Signal delivered by the backend to the coordination loop.
#[derive(Clone, Debug)]
pub enum BackendSignal {
    /// A task finished loading and is ready for execution.
    TaskLoaded { task: GeospatialTask },
    /// A task run finished successfully.
    TaskCompleted { result: GeoprocessingResult },
    /// A task run failed. Terminal; there is no retry.
    TaskFailed { task: TaskId, error: String },
}

/// Signal sender, handed to a backend at construction.
pub type BackendSignalSender = mpsc::UnboundedSender<BackendSignal>;

/// Signal receiver, drained by the coordination loop.
pub type BackendSignalReceiver = mpsc::UnboundedReceiver<BackendSignal>;

/// Creates the signal channel connecting a backend to the engine.
pub fn backend_signal_channel() -> (BackendSignalSender, BackendSignalReceiver) {
    mpsc::unbounded_channel()
}

/// Asynchronous geoprocessing execution contract.
#[async_trait]
pub trait GeoprocessingBackend: Send + Sync {
    /// Brings the backend up and announces every loaded task with
    /// [`BackendSignal::TaskLoaded`].
    async fn start(&self) -> Result<(), EngineError>;

    /// Runs a single task against the payload. Tasks without a feature-typed
    /// input parameter are skipped without a signal.
    async fn execute_task(&self, task: &GeospatialTask, payload: FeaturePayload);

    /// Runs every loaded task that accepts feature input against the
    /// payload; the others are silently skipped.
    async fn execute_all(&self, payload: FeaturePayload);
}
