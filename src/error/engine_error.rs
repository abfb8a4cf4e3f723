//! Engine-level error types.

use thiserror::Error;

/// Errors raised while assembling or starting the engine.
///
/// Failures of in-flight asynchronous operations (query, delete, add, task
/// execution) are never surfaced through this type; they are reported on the
/// completion channels and handled by the coordination loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No feature store was configured")]
    MissingFeatureStore,
    #[error("No geoprocessing backend was configured")]
    MissingBackend,
    #[error("Geoprocessing backend unavailable: {0}")]
    BackendUnavailable(String),
}
