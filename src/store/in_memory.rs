//! In-memory feature store.

use parking_lot::Mutex;
use tracing::warn;

use async_trait::async_trait;

use crate::domain::feature::{Feature, FeatureId, FeatureSet, Field, GeometryType};
use crate::domain::geometry::SpatialReference;

use super::{
    FeatureQueryResult, FeatureStore, OperationId, QueryParameters, StoreCompletion,
    StoreCompletionSender, ALL_FEATURES_CLAUSE,
};

#[derive(Debug, Default)]
struct OperationCounters {
    queries: usize,
    adds: usize,
    deletes: usize,
    delete_batch_sizes: Vec<usize>,
}

/// A [`FeatureStore`] backed by a plain vector, completing every operation
/// through the completion channel. Operation counters and failure injection
/// make the asynchronous contract observable in tests and demos.
pub struct InMemoryFeatureStore {
    spatial_reference: SpatialReference,
    fields: Vec<Field>,
    features: Mutex<Vec<Feature>>,
    completions: StoreCompletionSender,
    counters: Mutex<OperationCounters>,
    fail_next_delete: Mutex<bool>,
    fail_next_add: Mutex<bool>,
}

impl InMemoryFeatureStore {
    pub fn new(
        spatial_reference: SpatialReference,
        fields: Vec<Field>,
        completions: StoreCompletionSender,
    ) -> Self {
        Self {
            spatial_reference,
            fields,
            features: Mutex::new(Vec::new()),
            completions,
            counters: Mutex::new(OperationCounters::default()),
            fail_next_delete: Mutex::new(false),
            fail_next_add: Mutex::new(false),
        }
    }

    /// Inserts a feature directly, bypassing the asynchronous contract.
    pub fn seed(&self, feature: Feature) {
        self.features.lock().push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.lock().is_empty()
    }

    /// Makes the next delete operation report failure without mutating.
    pub fn fail_next_delete(&self) {
        *self.fail_next_delete.lock() = true;
    }

    /// Makes the next add operation report failure without mutating.
    pub fn fail_next_add(&self) {
        *self.fail_next_add.lock() = true;
    }

    pub fn query_count(&self) -> usize {
        self.counters.lock().queries
    }

    pub fn add_count(&self) -> usize {
        self.counters.lock().adds
    }

    pub fn delete_count(&self) -> usize {
        self.counters.lock().deletes
    }

    /// Sizes of the delete batches issued so far, in order.
    pub fn delete_batch_sizes(&self) -> Vec<usize> {
        self.counters.lock().delete_batch_sizes.clone()
    }

    fn complete(&self, completion: StoreCompletion) {
        // The receiver half lives in the coordination loop; a closed channel
        // only happens on shutdown.
        let _ = self.completions.send(completion);
    }
}

#[async_trait]
impl FeatureStore for InMemoryFeatureStore {
    async fn query_features(&self, parameters: QueryParameters) -> OperationId {
        let operation = OperationId::new();
        self.counters.lock().queries += 1;

        let result = if parameters.where_clause() == ALL_FEATURES_CLAUSE {
            Some(FeatureQueryResult::new(self.features.lock().clone()))
        } else {
            warn!(
                where_clause = parameters.where_clause(),
                "unsupported where clause"
            );
            None
        };

        self.complete(StoreCompletion::QueryCompleted { operation, result });
        operation
    }

    async fn add_feature(&self, feature: Feature) -> OperationId {
        let operation = OperationId::new();
        self.counters.lock().adds += 1;

        let added = if std::mem::take(&mut *self.fail_next_add.lock()) {
            false
        } else {
            self.features.lock().push(feature);
            true
        };

        self.complete(StoreCompletion::FeatureAdded { operation, added });
        operation
    }

    async fn delete_features(&self, ids: Vec<FeatureId>) -> OperationId {
        let operation = OperationId::new();
        {
            let mut counters = self.counters.lock();
            counters.deletes += 1;
            counters.delete_batch_sizes.push(ids.len());
        }

        let deleted = if std::mem::take(&mut *self.fail_next_delete.lock()) {
            false
        } else {
            self.features
                .lock()
                .retain(|feature| !ids.contains(&feature.id()));
            true
        };

        self.complete(StoreCompletion::FeaturesDeleted { operation, deleted });
        operation
    }

    async fn snapshot(&self) -> FeatureSet {
        FeatureSet::new(
            self.spatial_reference,
            GeometryType::Polygon,
            self.fields.clone(),
        )
        .with_features(self.features.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::{Point, Polygon};
    use crate::store::store_completion_channel;

    fn store() -> (InMemoryFeatureStore, crate::store::StoreCompletionReceiver) {
        let (tx, rx) = store_completion_channel();
        let store = InMemoryFeatureStore::new(
            SpatialReference::web_mercator(),
            vec![Field::text("Description")],
            tx,
        );
        (store, rx)
    }

    fn square() -> Polygon {
        Polygon::new(
            SpatialReference::web_mercator(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(1.0, 1.0),
                Point::new(1.0, 0.0),
            ],
        )
    }

    #[tokio::test]
    async fn test_add_then_query_roundtrip() {
        let (store, mut rx) = store();

        let add_op = store.add_feature(Feature::new(square())).await;
        match rx.try_recv().unwrap() {
            StoreCompletion::FeatureAdded { operation, added } => {
                assert_eq!(operation, add_op);
                assert!(added);
            }
            other => panic!("Unexpected completion: {other:?}"),
        }

        let query_op = store.query_features(QueryParameters::matching_all()).await;
        match rx.try_recv().unwrap() {
            StoreCompletion::QueryCompleted { operation, result } => {
                assert_eq!(operation, query_op);
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("Unexpected completion: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_clause_reports_invalid_result() {
        let (store, mut rx) = store();
        store.seed(Feature::new(square()));

        store
            .query_features(QueryParameters::with_where_clause("Description = 'x'"))
            .await;
        match rx.try_recv().unwrap() {
            StoreCompletion::QueryCompleted { result, .. } => assert!(result.is_none()),
            other => panic!("Unexpected completion: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_only_identified_features() {
        let (store, mut rx) = store();
        let keep = Feature::new(square());
        let drop_a = Feature::new(square());
        let drop_b = Feature::new(square());
        let ids = vec![drop_a.id(), drop_b.id()];
        store.seed(keep.clone());
        store.seed(drop_a);
        store.seed(drop_b);

        store.delete_features(ids).await;
        match rx.try_recv().unwrap() {
            StoreCompletion::FeaturesDeleted { deleted, .. } => assert!(deleted),
            other => panic!("Unexpected completion: {other:?}"),
        }

        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot().await.features()[0].id(), keep.id());
        assert_eq!(store.delete_batch_sizes(), vec![2]);
    }

    #[tokio::test]
    async fn test_failure_injection_leaves_store_untouched() {
        let (store, mut rx) = store();
        store.seed(Feature::new(square()));

        store.fail_next_delete();
        store.delete_features(vec![]).await;
        match rx.try_recv().unwrap() {
            StoreCompletion::FeaturesDeleted { deleted, .. } => assert!(!deleted),
            other => panic!("Unexpected completion: {other:?}"),
        }
        assert_eq!(store.len(), 1);

        store.fail_next_add();
        store.add_feature(Feature::new(square())).await;
        match rx.try_recv().unwrap() {
            StoreCompletion::FeatureAdded { added, .. } => assert!(!added),
            other => panic!("Unexpected completion: {other:?}"),
        }
        assert_eq!(store.len(), 1);

        // Injection is one-shot.
        store.add_feature(Feature::new(square())).await;
        assert_eq!(store.len(), 2);
    }
}
