//! Task executor seam for in-process backends.

use async_trait::async_trait;

use crate::domain::feature::FeaturePayload;
use crate::domain::task::GeospatialTask;
use crate::error::TaskError;

use super::GeoprocessingResult;

/// One runnable geoprocessing task hosted by a [`LocalBackend`](super::LocalBackend).
///
/// Implementations declare their metadata (including parameter shapes, from
/// which feature-input acceptance is derived) and perform the actual work.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Task metadata as announced to the engine.
    fn task(&self) -> GeospatialTask;

    /// Runs the task against the input features.
    async fn execute(&self, payload: FeaturePayload) -> Result<GeoprocessingResult, TaskError>;
}
