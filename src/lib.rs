//! # GEOINT Engine — geospatial task orchestration
//!
//! `geoint-engine` coordinates a desktop GEOINT workflow: commit an area of
//! interest (a sketched polygon or the current map extent) as the input
//! feature set, run one or all loaded geoprocessing tasks against it, and
//! collect every feature-bearing result as a new output table.
//!
//! The engine is built around three seams:
//!
//! - **[`FeatureStore`]**: an asynchronous feature collection. Every query,
//!   add, and delete returns a correlation identifier immediately and
//!   reports its outcome later as a completion message.
//! - **[`GeoprocessingBackend`]**: the execution service. It announces its
//!   loaded tasks and runs them against a feature payload, signalling
//!   completion or failure. [`LocalBackend`] hosts in-process
//!   [`TaskExecutor`] implementations.
//! - **[`TaskOrchestrator`]**: the state machine tying both together. It
//!   replaces input features through a uniform delete-then-add chain, keeps
//!   queried records alive while their deletion is in flight, and ingests
//!   task outputs into the [`OutputLayer`].
//!
//! All state is owned by a single coordination loop spawned by
//! [`GeointEngine::builder`]; commands, store completions, and backend
//! signals are processed one at a time, so there is no shared mutable state
//! and no locking around the orchestration logic.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use geoint_engine::{
//!     Envelope, EngineConfig, GeointEngine, InMemoryFeatureStore, LocalBackend,
//!     SpatialReference,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let builder = GeointEngine::builder(EngineConfig::default());
//!     let store = Arc::new(InMemoryFeatureStore::new(
//!         builder.config().spatial_reference,
//!         builder.config().input_fields.clone(),
//!         builder.store_completions(),
//!     ));
//!     let backend = Arc::new(LocalBackend::new(builder.backend_signals()));
//!
//!     let (handle, mut events) = builder.store(store).backend(backend).start().await.unwrap();
//!
//!     let extent = Envelope::new(SpatialReference::web_mercator(), 0.0, 0.0, 10.0, 10.0);
//!     handle.replace_input_with_geometry(extent.as_polygon()).await;
//!     handle.run_all_tasks().await;
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub mod api;
pub mod backend;
pub mod core;
pub mod domain;
pub mod error;
pub mod store;
pub mod tools;

pub use crate::api::{Command, EngineConfig, EngineHandle, GeointEngine, GeointEngineBuilder};
pub use crate::backend::{
    backend_signal_channel, BackendSignal, BackendSignalReceiver, BackendSignalSender,
    GeoprocessingBackend, GeoprocessingParameter, GeoprocessingResult, LocalBackend,
    TaskExecutor, TaskRegistry,
};
pub use crate::core::{
    create_event_channel, EngineEvent, EventReceiver, EventSender, OutputLayer, TaskOrchestrator,
};
pub use crate::domain::{
    Envelope, Feature, FeatureId, FeaturePayload, FeatureSet, Field, FieldType, GeometryType,
    GeospatialTask, ParameterDataType, ParameterDirection, Point, Polygon, PolygonBuilder,
    SpatialReference, TaskId, TaskParameterInfo,
};
pub use crate::error::{EngineError, TaskError};
pub use crate::store::{
    store_completion_channel, FeatureQueryResult, FeatureStore, InMemoryFeatureStore,
    OperationId, QueryParameters, StoreCompletion, StoreCompletionReceiver,
    StoreCompletionSender,
};
pub use crate::tools::{MapViewTool, PointerButton, PointerEvent, PolygonSketchTool};
