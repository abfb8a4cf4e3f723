use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use geoint_engine::{
    EngineConfig, EngineEvent, Envelope, Feature, FeaturePayload, FeatureSet, Field,
    GeointEngine, GeometryType, GeoprocessingParameter, GeoprocessingResult, GeospatialTask,
    InMemoryFeatureStore, LocalBackend, ParameterDataType, ParameterDirection, SpatialReference,
    TaskError, TaskExecutor, TaskId, TaskParameterInfo,
};

/// Returns the committed areas of interest as its own output table.
struct OperationalFootprint;

#[async_trait]
impl TaskExecutor for OperationalFootprint {
    fn task(&self) -> GeospatialTask {
        GeospatialTask::new(
            TaskId::new("operational-footprint"),
            "Operational Footprint",
            "Materializes the committed areas of interest as a result layer",
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

    async fn execute(&self, payload: FeaturePayload) -> Result<GeoprocessingResult, TaskError> {
        let input = payload.into_features();
        let mut footprint = FeatureSet::new(
            input.spatial_reference(),
            GeometryType::Polygon,
            vec![Field::text("Description")],
        );
        for (index, feature) in input.features().iter().enumerate() {
            footprint.push(
                Feature::new(feature.geometry().clone())
                    .with_attribute("Description", json!(format!("Footprint {}", index + 1))),
            );
        }
        Ok(GeoprocessingResult::new("Operational Footprint")
            .with_output("footprint", GeoprocessingParameter::Features(footprint)))
    }
}

/// Summarizes the committed extent as text; produces no feature output.
struct ExtentReport;

#[async_trait]
impl TaskExecutor for ExtentReport {
    fn task(&self) -> GeospatialTask {
        GeospatialTask::new(
            TaskId::new("extent-report"),
            "Extent Report",
            "Summarizes the committed areas of interest",
            vec![
                TaskParameterInfo::new(
                    "areas",
                    ParameterDirection::Input,
                    ParameterDataType::Features,
                ),
                TaskParameterInfo::new(
                    "report",
                    ParameterDirection::Output,
                    ParameterDataType::Text,
                ),
            ],
        )
    }

    async fn execute(&self, payload: FeaturePayload) -> Result<GeoprocessingResult, TaskError> {
        let features = payload.features();
        let report = format!(
            "{} area(s) of interest in wkid {}",
            features.len(),
            features.spatial_reference().wkid()
        );
        Ok(GeoprocessingResult::new("Extent Report")
            .with_output("report", GeoprocessingParameter::Text(report)))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== GEOINT Engine ===\n");

    let builder = GeointEngine::builder(EngineConfig::default());
    let store = Arc::new(InMemoryFeatureStore::new(
        builder.config().spatial_reference,
        builder.config().input_fields.clone(),
        builder.store_completions(),
    ));
    let backend = Arc::new(
        LocalBackend::new(builder.backend_signals())
            .with_executor(Arc::new(OperationalFootprint))
            .with_executor(Arc::new(ExtentReport)),
    );

    let (handle, mut events) = builder
        .store(store.clone())
        .backend(backend)
        .start()
        .await
        .expect("Failed to start the engine");

    // Commit the current map extent as the area of interest.
    let extent = Envelope::new(
        SpatialReference::web_mercator(),
        1_100_000.0,
        6_400_000.0,
        1_180_000.0,
        6_470_000.0,
    );
    handle.replace_input_with_geometry(extent.as_polygon()).await;

    // The replacement settles through the query/delete/add chain.
    for _ in 0..100 {
        if store.len() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    println!("[OK] Input features committed ({} feature)", store.len());

    handle.run_all_tasks().await;

    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_secs(2), events.recv()).await
    {
        match event {
            EngineEvent::TaskAvailable { task, .. } => {
                println!("[OK] Task loaded: {} — {}", task.display_name(), task.description());
            }
            EngineEvent::OutputProduced { task_name, features, .. } => {
                println!(
                    "[OK] {} produced {} output feature(s)",
                    task_name,
                    features.len()
                );
            }
        }
    }

    println!("\nDone.");
}
