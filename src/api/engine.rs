//! Engine builder, coordination loop, and handle.
//!
//! [`GeointEngine::builder`] assembles the engine: the caller constructs a
//! feature store and a geoprocessing backend against the builder's
//! completion/signal senders, then `start`s the engine. Starting spawns a
//! single coordination loop that owns the orchestrator state and processes
//! commands, store completions, and backend signals one at a time — the
//! whole engine is free of shared mutable state.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::{
    backend_signal_channel, BackendSignal, BackendSignalReceiver, BackendSignalSender,
    GeoprocessingBackend, TaskRegistry,
};
use crate::core::event_bus::{create_event_channel, EngineEvent, EventReceiver, EventSender};
use crate::core::orchestrator::TaskOrchestrator;
use crate::domain::feature::Field;
use crate::domain::geometry::{Polygon, SpatialReference};
use crate::domain::task::TaskId;
use crate::error::EngineError;
use crate::store::{
    store_completion_channel, FeatureStore, StoreCompletionReceiver, StoreCompletionSender,
};

/// Input-layer configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Spatial reference of the input feature table.
    pub spatial_reference: SpatialReference,
    /// Attribute schema of the input feature table.
    pub input_fields: Vec<Field>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spatial_reference: SpatialReference::web_mercator(),
            input_fields: vec![Field::text("Description")],
        }
    }
}

/// External command accepted by the coordination loop.
#[derive(Clone, Debug)]
pub enum Command {
    ReplaceInput { geometry: Polygon },
    ClearInput,
    RunTask { task: TaskId },
    RunAllTasks,
}

/// Engine entry point.
pub struct GeointEngine;

impl GeointEngine {
    /// Creates a builder with the given input-layer configuration.
    pub fn builder(config: EngineConfig) -> GeointEngineBuilder {
        let (store_tx, store_rx) = store_completion_channel();
        let (backend_tx, backend_rx) = backend_signal_channel();
        GeointEngineBuilder {
            config,
            store_tx,
            store_rx,
            backend_tx,
            backend_rx,
            store: None,
            backend: None,
        }
    }
}

/// Builder for configuring and launching a [`GeointEngine`].
pub struct GeointEngineBuilder {
    config: EngineConfig,
    store_tx: StoreCompletionSender,
    store_rx: StoreCompletionReceiver,
    backend_tx: BackendSignalSender,
    backend_rx: BackendSignalReceiver,
    store: Option<Arc<dyn FeatureStore>>,
    backend: Option<Arc<dyn GeoprocessingBackend>>,
}

impl GeointEngineBuilder {
    /// The sender a feature store must complete its operations on.
    pub fn store_completions(&self) -> StoreCompletionSender {
        self.store_tx.clone()
    }

    /// The sender a backend must deliver its signals on.
    pub fn backend_signals(&self) -> BackendSignalSender {
        self.backend_tx.clone()
    }

    /// The input-layer configuration the store should be built against.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sets the feature store.
    pub fn store(mut self, store: Arc<dyn FeatureStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the geoprocessing backend.
    pub fn backend(mut self, backend: Arc<dyn GeoprocessingBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Starts the backend and spawns the coordination loop.
    ///
    /// A backend that fails to start is logged and left to announce nothing;
    /// the engine still runs and replacement commands keep working.
    pub async fn start(self) -> Result<(EngineHandle, EventReceiver), EngineError> {
        let store = self.store.ok_or(EngineError::MissingFeatureStore)?;
        let backend = self.backend.ok_or(EngineError::MissingBackend)?;

        let (event_tx, event_rx) = create_event_channel();
        let (command_tx, command_rx) = mpsc::channel(64);
        let registry = Arc::new(RwLock::new(TaskRegistry::new()));

        if let Err(error) = backend.start().await {
            warn!(%error, "geoprocessing backend could not be started");
        }

        let orchestrator =
            TaskOrchestrator::new(store, backend, Arc::clone(&registry), event_tx.clone());
        tokio::spawn(run_coordination_loop(
            orchestrator,
            registry,
            event_tx,
            command_rx,
            self.store_rx,
            self.backend_rx,
        ));

        Ok((EngineHandle { commands: command_tx }, event_rx))
    }
}

async fn run_coordination_loop(
    mut orchestrator: TaskOrchestrator,
    registry: Arc<RwLock<TaskRegistry>>,
    events: EventSender,
    mut commands: mpsc::Receiver<Command>,
    mut store_completions: StoreCompletionReceiver,
    mut backend_signals: BackendSignalReceiver,
) {
    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(Command::ReplaceInput { geometry }) => {
                        orchestrator.replace_input_with_geometry(geometry).await;
                    }
                    Some(Command::ClearInput) => orchestrator.clear_input_features().await,
                    Some(Command::RunTask { task }) => orchestrator.run_task(task).await,
                    Some(Command::RunAllTasks) => orchestrator.run_all_tasks().await,
                    None => break,
                }
            }
            Some(completion) = store_completions.recv() => {
                orchestrator.handle_store_completion(completion).await;
            }
            Some(signal) = backend_signals.recv() => {
                match signal {
                    BackendSignal::TaskLoaded { task } => {
                        registry.write().register(task.clone());
                        let _ = events.send(EngineEvent::TaskAvailable {
                            task,
                            timestamp: Utc::now(),
                        });
                    }
                    BackendSignal::TaskCompleted { result } => {
                        orchestrator.on_task_completed(result);
                    }
                    BackendSignal::TaskFailed { task, error } => {
                        orchestrator.on_task_failed(&task, &error);
                    }
                }
            }
        }
    }
    debug!("coordination loop stopped");
}

/// Handle for driving a running engine.
///
/// Every method returns as soon as the command is queued; outcomes are
/// observed through the event receiver returned by
/// [`GeointEngineBuilder::start`].
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
}

impl EngineHandle {
    /// Replaces the input features with the committed geometry.
    pub async fn replace_input_with_geometry(&self, geometry: Polygon) {
        self.send(Command::ReplaceInput { geometry }).await;
    }

    /// Removes all input features.
    pub async fn clear_input_features(&self) {
        self.send(Command::ClearInput).await;
    }

    /// Runs one task against the current input features.
    pub async fn run_task(&self, task: TaskId) {
        self.send(Command::RunTask { task }).await;
    }

    /// Runs every feature-accepting task against the current input features.
    pub async fn run_all_tasks(&self) {
        self.send(Command::RunAllTasks).await;
    }

    async fn send(&self, command: Command) {
        if self.commands.send(command).await.is_err() {
            warn!("engine is no longer running; command dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::timeout;

    use super::*;
    use crate::backend::{GeoprocessingParameter, GeoprocessingResult, LocalBackend, TaskExecutor};
    use crate::domain::feature::FeaturePayload;
    use crate::domain::geometry::Envelope;
    use crate::domain::task::{
        GeospatialTask, ParameterDataType, ParameterDirection, TaskParameterInfo,
    };
    use crate::error::TaskError;
    use crate::store::InMemoryFeatureStore;

    struct FootprintTask;

    #[async_trait]
    impl TaskExecutor for FootprintTask {
        fn task(&self) -> GeospatialTask {
            GeospatialTask::new(
                TaskId::new("footprint"),
                "Operational Footprint",
                "Returns the committed areas of interest",
                vec![
                    TaskParameterInfo::new(
                        "areas",
                        ParameterDirection::Input,
                        ParameterDataType::Features,
                    ),
                    TaskParameterInfo::new(
                        "footprint",
                        ParameterDirection::Output,
                        ParameterDataType::Features,
                    ),
                ],
            )
        }

        async fn execute(
            &self,
            payload: FeaturePayload,
        ) -> Result<GeoprocessingResult, TaskError> {
            Ok(GeoprocessingResult::new("Operational Footprint").with_output(
                "footprint",
                GeoprocessingParameter::Features(payload.into_features()),
            ))
        }
    }

    async fn next_event(events: &mut EventReceiver) -> EngineEvent {
        timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for engine event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_start_without_store_fails() {
        let (tx, _rx) = backend_signal_channel();
        let backend = Arc::new(LocalBackend::new(tx).with_executor(Arc::new(FootprintTask)));
        let result = GeointEngine::builder(EngineConfig::default())
            .backend(backend)
            .start()
            .await;
        assert!(matches!(result, Err(EngineError::MissingFeatureStore)));
    }

    #[tokio::test]
    async fn test_start_without_backend_fails() {
        let builder = GeointEngine::builder(EngineConfig::default());
        let store = Arc::new(InMemoryFeatureStore::new(
            builder.config().spatial_reference,
            builder.config().input_fields.clone(),
            builder.store_completions(),
        ));
        let result = builder.store(store).start().await;
        assert!(matches!(result, Err(EngineError::MissingBackend)));
    }

    #[tokio::test]
    async fn test_replace_then_run_all_produces_output() {
        let builder = GeointEngine::builder(EngineConfig::default());
        let store = Arc::new(InMemoryFeatureStore::new(
            builder.config().spatial_reference,
            builder.config().input_fields.clone(),
            builder.store_completions(),
        ));
        let backend =
            Arc::new(LocalBackend::new(builder.backend_signals()).with_executor(Arc::new(FootprintTask)));

        let (handle, mut events) = builder
            .store(Arc::clone(&store) as Arc<dyn FeatureStore>)
            .backend(backend)
            .start()
            .await
            .unwrap();

        match next_event(&mut events).await {
            EngineEvent::TaskAvailable { task, .. } => {
                assert_eq!(task.id().as_str(), "footprint");
            }
            other => panic!("Unexpected event: {other:?}"),
        }

        let extent = Envelope::new(SpatialReference::web_mercator(), 0.0, 0.0, 10.0, 10.0);
        handle.replace_input_with_geometry(extent.as_polygon()).await;

        // The replacement completes asynchronously; wait for the store to
        // reflect it before dispatching.
        for _ in 0..100 {
            if store.len() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(store.len(), 1);

        handle.run_all_tasks().await;

        match next_event(&mut events).await {
            EngineEvent::OutputProduced { task_name, features, .. } => {
                assert_eq!(task_name, "Operational Footprint");
                assert_eq!(features.len(), 1);
                assert_eq!(features.features()[0].geometry(), &extent.as_polygon());
            }
            other => panic!("Unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_before_replace_emits_nothing() {
        let builder = GeointEngine::builder(EngineConfig::default());
        let store = Arc::new(InMemoryFeatureStore::new(
            builder.config().spatial_reference,
            builder.config().input_fields.clone(),
            builder.store_completions(),
        ));
        let backend =
            Arc::new(LocalBackend::new(builder.backend_signals()).with_executor(Arc::new(FootprintTask)));

        let (handle, mut events) = builder
            .store(store)
            .backend(backend)
            .start()
            .await
            .unwrap();

        match next_event(&mut events).await {
            EngineEvent::TaskAvailable { .. } => {}
            other => panic!("Unexpected event: {other:?}"),
        }

        handle.run_task(TaskId::new("footprint")).await;
        handle.run_all_tasks().await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(events.try_recv().is_err());
    }
}
