//! Task orchestrator — input replacement, task dispatch, output ingestion.
//!
//! The orchestrator sequences "clear existing input → add new input → run
//! geoprocessing tasks → ingest outputs" entirely through asynchronous
//! completion messages. It is single-owner state driven by the engine's
//! coordination loop: no completion handler ever runs concurrently with
//! another, and no public operation blocks on an in-flight request.
//!
//! Replacing the input features always goes through the delete-then-add
//! path, even when no prior features exist; the query completion
//! short-circuits the delete in that case but still performs the add. The
//! follow-up add is armed in [`DeletePostAction`] before the query is issued
//! and consumed exactly once, win or fail.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::backend::{
    GeoprocessingBackend, GeoprocessingParameter, GeoprocessingResult, TaskRegistry,
};
use crate::core::event_bus::{EngineEvent, EventSender};
use crate::core::output_layer::OutputLayer;
use crate::domain::feature::{Feature, FeaturePayload};
use crate::domain::geometry::Polygon;
use crate::domain::task::TaskId;
use crate::store::{
    FeatureQueryResult, FeatureStore, OperationId, QueryParameters, StoreCompletion,
};

/// What to do once an in-flight delete of the input features completes.
#[derive(Debug, Default)]
enum DeletePostAction {
    #[default]
    Idle,
    AddInput {
        geometry: Polygon,
    },
}

/// Coordinates the feature store and the geoprocessing backend.
pub struct TaskOrchestrator {
    store: Arc<dyn FeatureStore>,
    backend: Arc<dyn GeoprocessingBackend>,
    registry: Arc<RwLock<TaskRegistry>>,
    events: EventSender,
    post_delete: DeletePostAction,
    held_results: HashMap<OperationId, FeatureQueryResult>,
    output_layer: OutputLayer,
    current_task: Option<TaskId>,
    layers_initialized: bool,
}

impl TaskOrchestrator {
    pub fn new(
        store: Arc<dyn FeatureStore>,
        backend: Arc<dyn GeoprocessingBackend>,
        registry: Arc<RwLock<TaskRegistry>>,
        events: EventSender,
    ) -> Self {
        Self {
            store,
            backend,
            registry,
            events,
            post_delete: DeletePostAction::Idle,
            held_results: HashMap::new(),
            output_layer: OutputLayer::new(),
            current_task: None,
            layers_initialized: false,
        }
    }

    /// The currently selected task, if a single-task run was requested last.
    pub fn current_task(&self) -> Option<&TaskId> {
        self.current_task.as_ref()
    }

    /// Result tables collected from completed task runs.
    pub fn output_layer(&self) -> &OutputLayer {
        &self.output_layer
    }

    fn ensure_layers_initialized(&mut self) {
        if self.layers_initialized {
            return;
        }
        self.output_layer = OutputLayer::new();
        self.layers_initialized = true;
        debug!("input and output layers initialized");
    }

    /// Replaces the input features with the committed geometry.
    ///
    /// Returns once the initial query is issued; the replacement itself
    /// completes through the query/delete/add completion chain.
    pub async fn replace_input_with_geometry(&mut self, geometry: Polygon) {
        self.ensure_layers_initialized();

        self.post_delete = DeletePostAction::AddInput { geometry };
        let operation = self
            .store
            .query_features(QueryParameters::matching_all())
            .await;
        debug!(%operation, "queried input features for replacement");
    }

    /// Removes all input features without adding a replacement.
    pub async fn clear_input_features(&mut self) {
        if !self.layers_initialized {
            return;
        }

        self.post_delete = DeletePostAction::Idle;
        let operation = self
            .store
            .query_features(QueryParameters::matching_all())
            .await;
        debug!(%operation, "queried input features for removal");
    }

    /// Runs one task against the buffered input features.
    ///
    /// The run is rejected outright — logged, not queued — when the input
    /// layer was never initialized or the task id is unknown.
    pub async fn run_task(&mut self, task_id: TaskId) {
        self.current_task = Some(task_id.clone());

        if !self.layers_initialized {
            warn!("input layer was not initialized; task run rejected");
            return;
        }

        let Some(task) = self.registry.read().get(&task_id).cloned() else {
            warn!(task = %task_id, "unknown geoprocessing task");
            return;
        };

        info!(task = task.display_name(), "executing task using the input features");
        let payload = FeaturePayload::from(self.store.snapshot().await);
        self.backend.execute_task(&task, payload).await;
    }

    /// Runs every loaded task that accepts feature input against the
    /// buffered input features.
    pub async fn run_all_tasks(&mut self) {
        self.current_task = None;

        if !self.layers_initialized {
            warn!("input layer was not initialized; task run rejected");
            return;
        }

        info!("executing all tasks using the input features");
        let payload = FeaturePayload::from(self.store.snapshot().await);
        self.backend.execute_all(payload).await;
    }

    /// Dispatches a store completion to the matching handler.
    pub async fn handle_store_completion(&mut self, completion: StoreCompletion) {
        match completion {
            StoreCompletion::QueryCompleted { operation, result } => {
                self.on_query_completed(operation, result).await;
            }
            StoreCompletion::FeaturesDeleted { operation, deleted } => {
                self.on_features_deleted(operation, deleted).await;
            }
            StoreCompletion::FeatureAdded { operation, added } => {
                self.on_feature_added(operation, added);
            }
        }
    }

    async fn on_query_completed(
        &mut self,
        operation: OperationId,
        result: Option<FeatureQueryResult>,
    ) {
        let Some(result) = result else {
            warn!(%operation, "feature query result is not valid");
            return;
        };

        if result.is_empty() {
            debug!("no input features returned");
            match std::mem::take(&mut self.post_delete) {
                // Nothing to delete; add the committed geometry directly.
                DeletePostAction::AddInput { geometry } => self.add_input_feature(geometry).await,
                DeletePostAction::Idle => {}
            }
            return;
        }

        let ids = result.feature_ids();
        let delete_operation = self.store.delete_features(ids).await;
        // Keep the queried records alive until their deletion completes.
        self.held_results.insert(delete_operation, result);
        debug!(operation = %delete_operation, "deleting all input features");
    }

    async fn on_features_deleted(&mut self, operation: OperationId, deleted: bool) {
        if let Some(result) = self.held_results.remove(&operation) {
            debug!(%operation, count = result.len(), "released features held for deletion");
        }

        let post_delete = std::mem::take(&mut self.post_delete);

        if !deleted {
            warn!(%operation, "deleting the input features failed");
            return;
        }

        if let DeletePostAction::AddInput { geometry } = post_delete {
            self.add_input_feature(geometry).await;
        }
    }

    fn on_feature_added(&mut self, operation: OperationId, added: bool) {
        if added {
            debug!(%operation, "input feature added");
        } else {
            warn!(%operation, "adding the input feature failed");
        }
    }

    async fn add_input_feature(&mut self, geometry: Polygon) {
        let feature = Feature::new(geometry);
        let operation = self.store.add_feature(feature).await;
        debug!(%operation, "adding the committed geometry as an input feature");
    }

    /// Ingests a completed task run: every feature-bearing output parameter
    /// becomes a new table in the output layer; other outputs are ignored.
    pub fn on_task_completed(&mut self, result: GeoprocessingResult) {
        for (name, parameter) in result.outputs() {
            match parameter {
                GeoprocessingParameter::Features(features) => {
                    self.output_layer.append_table(features.clone());
                    let _ = self.events.send(EngineEvent::OutputProduced {
                        task_name: result.task_name().to_string(),
                        features: features.clone(),
                        timestamp: Utc::now(),
                    });
                    debug!(parameter = name.as_str(), "appended feature output as a new table");
                }
                GeoprocessingParameter::Text(_) => {
                    debug!(parameter = name.as_str(), "ignoring non-feature output");
                }
            }
        }
    }

    /// Logs a failed task run. Terminal; there is no retry.
    pub fn on_task_failed(&mut self, task: &TaskId, error: &str) {
        warn!(task = %task, error, "geoprocessing task failed");
    }
}
