pub mod event_bus;
pub mod orchestrator;
pub mod output_layer;

pub use event_bus::{create_event_channel, EngineEvent, EventReceiver, EventSender};
pub use orchestrator::TaskOrchestrator;
pub use output_layer::OutputLayer;
