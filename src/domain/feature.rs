//! Feature records and feature sets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::geometry::{Polygon, SpatialReference};

/// Opaque identifier assigned to a feature when it enters a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId(Uuid);

impl FeatureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A geometry plus attributes record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    id: FeatureId,
    geometry: Polygon,
    attributes: HashMap<String, Value>,
}

impl Feature {
    pub fn new(geometry: Polygon) -> Self {
        Self {
            id: FeatureId::new(),
            geometry,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn geometry(&self) -> &Polygon {
        &self.geometry
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }
}

/// Attribute field types supported by feature tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Number,
}

/// A named attribute column of a feature table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    field_type: FieldType,
}

impl Field {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Text,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Number,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// Geometry types a feature table can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Polygon,
}

/// A homogeneous collection of features together with its table schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    spatial_reference: SpatialReference,
    geometry_type: GeometryType,
    fields: Vec<Field>,
    features: Vec<Feature>,
}

impl FeatureSet {
    pub fn new(
        spatial_reference: SpatialReference,
        geometry_type: GeometryType,
        fields: Vec<Field>,
    ) -> Self {
        Self {
            spatial_reference,
            geometry_type,
            fields,
            features: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// The feature set handed to the backend as task input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeaturePayload {
    features: FeatureSet,
}

impl FeaturePayload {
    pub fn new(features: FeatureSet) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn into_features(self) -> FeatureSet {
        self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl From<FeatureSet> for FeaturePayload {
    fn from(features: FeatureSet) -> Self {
        Self::new(features)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::geometry::{Point, PolygonBuilder};

    fn triangle() -> Polygon {
        let mut builder = PolygonBuilder::new(SpatialReference::wgs84());
        builder.add_vertex(Point::new(0.0, 0.0));
        builder.add_vertex(Point::new(1.0, 0.0));
        builder.add_vertex(Point::new(0.0, 1.0));
        builder.to_polygon()
    }

    #[test]
    fn test_feature_ids_are_unique() {
        let a = Feature::new(triangle());
        let b = Feature::new(triangle());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_feature_attributes() {
        let feature = Feature::new(triangle()).with_attribute("Description", json!("sketch"));
        assert_eq!(feature.attributes().get("Description"), Some(&json!("sketch")));
    }

    #[test]
    fn test_feature_set_push_and_len() {
        let mut set = FeatureSet::new(
            SpatialReference::wgs84(),
            GeometryType::Polygon,
            vec![Field::text("Description")],
        );
        assert!(set.is_empty());

        set.push(Feature::new(triangle()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.fields()[0].name(), "Description");
    }

    #[test]
    fn test_payload_from_feature_set() {
        let set = FeatureSet::new(SpatialReference::wgs84(), GeometryType::Polygon, Vec::new())
            .with_features(vec![Feature::new(triangle())]);
        let payload = FeaturePayload::from(set);
        assert_eq!(payload.feature_count(), 1);
    }
}
