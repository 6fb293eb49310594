//! Offline cluster training, one category at a time.
//!
//! Each run fetches the category's records, clusters their feature vectors
//! with the category's configured parameters, and writes every label back.
//! Runs are not incremental: all labels of the category are recomputed.
//!
//! Writes are individual; there is no rollback. If some writes fail the run
//! still attempts the rest and reports [`Error::BatchPartialFailure`], leaving
//! the store with a mix of old and new labels for that category. If no write
//! lands at all, nothing was mixed and the first write error is returned as is.

use serde::Serialize;

use crate::category::Category;
use crate::cluster::{Agglomerative, Partitioner};
use crate::config::{ClusteringConfig, DEFAULT_COLLECTION};
use crate::error::{Error, Result};
use crate::record::{FeatureSchema, FeatureVector, RecordId};
use crate::store::{Filter, RecordStore};

/// Outcome of a successful training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    /// Category trained.
    pub category: Category,
    /// Distinct labels produced.
    pub clusters: usize,
    /// Label written for each record, in fetch order.
    pub labels: Vec<(RecordId, usize)>,
}

impl TrainingReport {
    /// Records relabelled.
    pub fn records(&self) -> usize {
        self.labels.len()
    }
}

/// Clusters each category's records and persists the labels.
#[derive(Debug)]
pub struct ClusterTrainer<S, P = Agglomerative> {
    store: S,
    partitioner: P,
    config: ClusteringConfig,
    collection: String,
}

impl<S: RecordStore> ClusterTrainer<S> {
    /// Trainer using agglomerative clustering.
    pub fn new(store: S, config: ClusteringConfig) -> Self {
        Self {
            store,
            partitioner: Agglomerative,
            config,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl<S: RecordStore, P: Partitioner> ClusterTrainer<S, P> {
    /// Replace the clustering capability.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> ClusterTrainer<S, Q> {
        ClusterTrainer {
            store: self.store,
            partitioner,
            config: self.config,
            collection: self.collection,
        }
    }

    /// Train against a different collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// The clustering table.
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Train the category named by a store tag such as `"Yes"`.
    pub fn train_tag(&self, tag: &str) -> Result<TrainingReport> {
        self.train(tag.parse()?)
    }

    /// Recompute and persist the labels of every record in `category`.
    pub fn train(&self, category: Category) -> Result<TrainingReport> {
        let params = self.config.get(category)?;

        let records = self
            .store
            .fetch(&self.collection, &Filter::Category(category))?;
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }

        let schema = FeatureSchema::from_records(&records)?;
        let vectors = records
            .iter()
            .map(|r| schema.project(r))
            .collect::<Result<Vec<FeatureVector>>>()?;

        let labels = self.partitioner.partition(&vectors, params)?;
        if labels.len() != records.len() {
            return Err(Error::DimensionMismatch {
                expected: records.len(),
                found: labels.len(),
            });
        }

        let mut written = Vec::with_capacity(records.len());
        let mut failed = Vec::new();
        let mut first_error = None;
        for (record, &label) in records.iter().zip(&labels) {
            match self.store.update_label(&self.collection, &record.id, label) {
                Ok(()) => written.push((record.id.clone(), label)),
                Err(e) => {
                    tracing::warn!(record = %record.id, label, error = %e, "label write failed");
                    failed.push((record.id.clone(), e.to_string()));
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(error) = first_error {
            if written.is_empty() {
                return Err(error);
            }
            return Err(Error::BatchPartialFailure {
                category,
                written: written.len(),
                total: records.len(),
                failed,
            });
        }

        let mut distinct = labels.clone();
        distinct.sort_unstable();
        distinct.dedup();

        tracing::info!(
            %category,
            records = records.len(),
            clusters = distinct.len(),
            linkage = ?params.linkage,
            metric = ?params.metric,
            "cluster training finished"
        );
        Ok(TrainingReport {
            category,
            clusters: distinct.len(),
            labels: written,
        })
    }

    /// Train every configured category in turn.
    ///
    /// A failure in one category does not stop the others.
    pub fn train_all(&self) -> Vec<(Category, Result<TrainingReport>)> {
        self.config
            .categories()
            .map(|category| (category, self.train(category)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;
    use crate::cluster::{Linkage, Metric};
    use crate::record::Record;
    use crate::store::InMemoryStore;

    fn record(id: &str, category: Category, x: f64) -> Record {
        Record::new(id, category, x, [("x".to_string(), x), ("y".to_string(), 0.0)])
    }

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert(
                DEFAULT_COLLECTION,
                [
                    record("p1", Category::HeatingPresent, 0.0),
                    record("p2", Category::HeatingPresent, 0.1),
                    record("p3", Category::HeatingPresent, 5.0),
                    record("a1", Category::HeatingAbsent, 1.0),
                ],
            )
            .unwrap();
        store
    }

    fn two_clusters() -> ClusteringConfig {
        ClusteringConfig::empty().with(
            Category::HeatingPresent,
            CategoryConfig::new(2, Linkage::Average, Metric::Euclidean),
        )
    }

    #[test]
    fn test_train_writes_labels_for_category_only() {
        let store = seeded();
        let trainer = ClusterTrainer::new(&store, two_clusters());
        let report = trainer.train(Category::HeatingPresent).unwrap();
        assert_eq!(report.records(), 3);
        assert_eq!(report.clusters, 2);

        let records = store.fetch(DEFAULT_COLLECTION, &Filter::All).unwrap();
        let label = |id: &str| {
            records
                .iter()
                .find(|r| r.id == RecordId::from(id))
                .and_then(|r| r.cluster_label)
        };
        assert_eq!(label("p1"), label("p2"));
        assert_ne!(label("p1"), label("p3"));
        assert_eq!(label("a1"), None);
    }

    #[test]
    fn test_unconfigured_category_is_invalid() {
        let store = seeded();
        let trainer = ClusterTrainer::new(&store, two_clusters());
        assert_eq!(
            trainer.train(Category::HeatingAbsent).unwrap_err(),
            Error::InvalidCategory("No".into())
        );
        assert!(matches!(
            trainer.train_tag("Sometimes"),
            Err(Error::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_empty_partition() {
        let store = InMemoryStore::new();
        let trainer = ClusterTrainer::new(&store, two_clusters());
        assert_eq!(
            trainer.train(Category::HeatingPresent).unwrap_err(),
            Error::EmptyInput
        );
    }

    struct ReadOnly(InMemoryStore);

    impl RecordStore for ReadOnly {
        fn fetch(&self, collection: &str, filter: &Filter) -> Result<Vec<Record>> {
            self.0.fetch(collection, filter)
        }

        fn update_label(&self, _: &str, _: &RecordId, _: usize) -> Result<()> {
            Err(Error::Store("read-only replica".into()))
        }
    }

    #[test]
    fn test_no_write_landed_returns_store_error() {
        let store = ReadOnly(seeded());
        let err = ClusterTrainer::new(&store, two_clusters())
            .train(Category::HeatingPresent)
            .unwrap_err();
        assert_eq!(err, Error::Store("read-only replica".into()));
        assert!(err.is_transient());
    }

    #[test]
    fn test_train_all_reports_each_category() {
        let store = seeded();
        let config = two_clusters().with(
            Category::HeatingAbsent,
            CategoryConfig::new(2, Linkage::Average, Metric::Euclidean),
        );
        let results = ClusterTrainer::new(&store, config).train_all();
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        // One record cannot form two clusters.
        assert!(matches!(
            results[1].1,
            Err(Error::InvalidClusterCount { requested: 2, n_items: 1 })
        ));
    }
}
