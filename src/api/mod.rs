//! Public engine API.

mod engine;

pub use engine::{Command, EngineConfig, EngineHandle, GeointEngine, GeointEngineBuilder};
