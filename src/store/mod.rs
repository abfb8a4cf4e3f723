//! Feature storage — the asynchronous query/add/delete contract.
//!
//! A [`FeatureStore`] is a mutable collection of feature records. Every
//! mutating or querying call returns an [`OperationId`] immediately; the
//! outcome arrives later as a [`StoreCompletion`] message carrying the same
//! identifier on the channel handed to the store at construction. A
//! completion is only ever observed after the call that issued it has
//! returned its identifier, so callers can correlate without races.

mod in_memory;

pub use in_memory::InMemoryFeatureStore;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::feature::{Feature, FeatureId, FeatureSet};

/// Correlation identifier of one asynchronous store operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The one predicate the engine ever issues: match every feature.
pub const ALL_FEATURES_CLAUSE: &str = "1=1";

/// Query predicate for [`FeatureStore::query_features`].
#[derive(Clone, Debug, PartialEq)]
pub struct QueryParameters {
    where_clause: String,
}

impl QueryParameters {
    pub fn with_where_clause(where_clause: impl Into<String>) -> Self {
        Self {
            where_clause: where_clause.into(),
        }
    }

    /// A constant-true predicate matching all features.
    pub fn matching_all() -> Self {
        Self::with_where_clause(ALL_FEATURES_CLAUSE)
    }

    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }
}

/// The records returned by a completed query. The result owns its records;
/// holding on to it keeps them alive while a follow-up operation is in flight.
#[derive(Clone, Debug)]
pub struct FeatureQueryResult {
    features: Vec<Feature>,
}

impl FeatureQueryResult {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.iter().map(|feature| feature.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Completion message for an asynchronous store operation.
#[derive(Clone, Debug)]
pub enum StoreCompletion {
    /// A query finished. `result` is `None` when the query itself was
    /// invalid (e.g. an unsupported predicate).
    QueryCompleted {
        operation: OperationId,
        result: Option<FeatureQueryResult>,
    },
    /// A batch delete finished.
    FeaturesDeleted {
        operation: OperationId,
        deleted: bool,
    },
    /// A single-feature add finished.
    FeatureAdded { operation: OperationId, added: bool },
}

/// Completion sender, handed to a store at construction.
pub type StoreCompletionSender = mpsc::UnboundedSender<StoreCompletion>;

/// Completion receiver, drained by the coordination loop.
pub type StoreCompletionReceiver = mpsc::UnboundedReceiver<StoreCompletion>;

/// Creates the completion channel connecting a store to the engine.
pub fn store_completion_channel() -> (StoreCompletionSender, StoreCompletionReceiver) {
    mpsc::unbounded_channel()
}

/// Asynchronous feature collection contract.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Queries features matching the predicate. Completes with
    /// [`StoreCompletion::QueryCompleted`].
    async fn query_features(&self, parameters: QueryParameters) -> OperationId;

    /// Adds one feature. Completes with [`StoreCompletion::FeatureAdded`].
    async fn add_feature(&self, feature: Feature) -> OperationId;

    /// Deletes the identified features as one batch. Completes with
    /// [`StoreCompletion::FeaturesDeleted`].
    async fn delete_features(&self, ids: Vec<FeatureId>) -> OperationId;

    /// The current contents of the store as a feature set.
    async fn snapshot(&self) -> FeatureSet;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::{Point, Polygon, SpatialReference};

    #[test]
    fn test_query_parameters_matching_all() {
        assert_eq!(QueryParameters::matching_all().where_clause(), "1=1");
    }

    #[test]
    fn test_query_result_ids() {
        let polygon = Polygon::new(
            SpatialReference::wgs84(),
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
        );
        let features = vec![Feature::new(polygon.clone()), Feature::new(polygon)];
        let expected: Vec<_> = features.iter().map(|f| f.id()).collect();

        let result = FeatureQueryResult::new(features);
        assert_eq!(result.len(), 2);
        assert_eq!(result.feature_ids(), expected);
    }
}
