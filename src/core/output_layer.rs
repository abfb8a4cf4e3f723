use crate::domain::feature::FeatureSet;

/// Destination container for geoprocessing results.
///
/// Each feature-bearing output parameter of a completed task becomes one new
/// table; tables are only ever appended, never merged or replaced.
#[derive(Clone, Debug, Default)]
pub struct OutputLayer {
    tables: Vec<FeatureSet>,
}

impl OutputLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_table(&mut self, table: FeatureSet) {
        self.tables.push(table);
    }

    pub fn tables(&self) -> &[FeatureSet] {
        &self.tables
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::GeometryType;
    use crate::domain::geometry::SpatialReference;

    #[test]
    fn test_append_only() {
        let mut layer = OutputLayer::new();
        assert!(layer.is_empty());

        let table =
            FeatureSet::new(SpatialReference::wgs84(), GeometryType::Polygon, Vec::new());
        layer.append_table(table.clone());
        layer.append_table(table);
        assert_eq!(layer.table_count(), 2);
    }
}
