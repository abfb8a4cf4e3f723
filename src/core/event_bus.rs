use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::domain::feature::FeatureSet;
use crate::domain::task::GeospatialTask;

/// Engine events delivered to the embedding application.
#[derive(Clone, Debug, Serialize)]
pub enum EngineEvent {
    /// A geoprocessing task became available for execution.
    TaskAvailable {
        task: GeospatialTask,
        timestamp: DateTime<Utc>,
    },

    /// A task produced feature records; the set was appended to the output
    /// layer and is handed over for rendering.
    OutputProduced {
        task_name: String,
        features: FeatureSet,
        timestamp: DateTime<Utc>,
    },
}

/// Event sender.
pub type EventSender = mpsc::UnboundedSender<EngineEvent>;

/// Event receiver.
pub type EventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

/// Creates the event channel.
pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskId;

    #[tokio::test]
    async fn test_event_channel() {
        let (sender, mut receiver) = create_event_channel();

        sender
            .send(EngineEvent::TaskAvailable {
                task: GeospatialTask::new(TaskId::new("viewshed"), "Viewshed", "", Vec::new()),
                timestamp: Utc::now(),
            })
            .unwrap();

        let event = receiver.recv().await.unwrap();
        match event {
            EngineEvent::TaskAvailable { task, .. } => {
                assert_eq!(task.id().as_str(), "viewshed");
            }
            _ => panic!("Unexpected event type"),
        }
    }
}
