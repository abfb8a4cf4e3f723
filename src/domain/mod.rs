//! Domain model: geometry primitives, feature records, and task metadata.

pub mod feature;
pub mod geometry;
pub mod task;

pub use feature::{Feature, FeatureId, FeaturePayload, FeatureSet, Field, FieldType, GeometryType};
pub use geometry::{Envelope, Point, Polygon, PolygonBuilder, SpatialReference};
pub use task::{
    GeospatialTask, ParameterDataType, ParameterDirection, TaskId, TaskParameterInfo,
};
