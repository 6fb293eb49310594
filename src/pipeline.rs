//! Single-record consumption prediction.
//!
//! One call reads the labelled historical records once, aligns the new
//! record to their feature schema, votes its cluster among the nearest
//! labelled neighbors and reports that cluster's mean consumption. The store
//! is never written; persisting the new record is up to the caller.

use crate::config::{PipelineConfig, PredictionScope};
use crate::error::{Error, Result};
use crate::estimate::{assess, Assessment, ConsumptionEstimator, DEFAULT_TOLERANCE};
use crate::knn::NearestNeighborVoter;
use crate::record::{FeatureSchema, FeatureVector, Record};
use crate::store::{Filter, RecordStore};

/// Result of one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Expected consumption (mean of the assigned cluster).
    pub consumption: f64,
    /// Cluster the new record was assigned to.
    pub label: usize,
    /// The historical records the prediction was computed from.
    pub historical: Vec<Record>,
}

impl Prediction {
    /// Compare an observed consumption with this prediction.
    pub fn assess(&self, actual: f64) -> Assessment {
        assess(actual, self.consumption, DEFAULT_TOLERANCE)
    }
}

/// Orchestrates store read, neighbor vote and cluster estimate.
#[derive(Debug)]
pub struct ClassificationPipeline<S> {
    store: S,
    config: PipelineConfig,
    voter: NearestNeighborVoter,
    estimator: ConsumptionEstimator,
}

impl<S: RecordStore> ClassificationPipeline<S> {
    /// Pipeline with the default configuration.
    pub fn new(store: S) -> Self {
        let config = PipelineConfig::default();
        Self {
            store,
            voter: NearestNeighborVoter::new(config.neighbors),
            estimator: ConsumptionEstimator,
            config,
        }
    }

    /// Pipeline with a validated configuration.
    pub fn with_config(store: S, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            voter: NearestNeighborVoter::new(config.neighbors),
            estimator: ConsumptionEstimator,
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Predict the consumption of `new_record`.
    ///
    /// Any failure aborts the prediction; no partial result is returned.
    /// Show [`Error::user_message`] to end users.
    pub fn predict(&self, new_record: &Record) -> Result<Prediction> {
        let result = self.run(new_record);
        if let Err(e) = &result {
            tracing::warn!(record = %new_record.id, error = %e, "{}", e.user_message());
        }
        result
    }

    fn run(&self, new_record: &Record) -> Result<Prediction> {
        let filter = match self.config.scope {
            PredictionScope::AllRecords => Filter::All,
            PredictionScope::SameCategory => Filter::Category(new_record.heating_source),
        };
        let historical = self.store.fetch(&self.config.collection, &filter)?;
        if historical.is_empty() {
            return Err(Error::InsufficientData { candidates: 0 });
        }

        let schema = FeatureSchema::from_records(&historical)?;
        let candidates = historical
            .iter()
            .filter_map(|r| r.cluster_label.map(|label| (r, label)))
            .map(|(r, label)| schema.project(r).map(|v| (v, label)))
            .collect::<Result<Vec<(FeatureVector, usize)>>>()?;

        let query = schema.align(new_record)?;
        let label = self.voter.classify(&query, &candidates)?;
        let consumption = self.estimator.estimate(&historical, label)?;

        tracing::info!(
            record = %new_record.id,
            label,
            consumption,
            candidates = candidates.len(),
            k = self.voter.k(),
            "prediction produced"
        );
        Ok(Prediction {
            consumption,
            label,
            historical,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::config::DEFAULT_COLLECTION;
    use crate::record::RecordId;
    use crate::store::InMemoryStore;

    fn record(id: &str, category: Category, x: f64, consumption: f64, label: usize) -> Record {
        Record::new(id, category, consumption, [("x".to_string(), x)]).with_label(label)
    }

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert(
                DEFAULT_COLLECTION,
                [
                    record("a", Category::HeatingPresent, 0.0, 10.0, 0),
                    record("b", Category::HeatingPresent, 0.2, 20.0, 0),
                    record("c", Category::HeatingPresent, 5.0, 100.0, 1),
                    record("d", Category::HeatingAbsent, 0.1, 7.0, 1),
                ],
            )
            .unwrap();
        store
    }

    fn new_record(x: f64, category: Category) -> Record {
        Record::new("new", category, 0.0, [("x".to_string(), x)])
    }

    #[test]
    fn test_predict_nearest_cluster_mean() {
        let store = store();
        let pipeline = ClassificationPipeline::new(&store);
        let prediction = pipeline.predict(&new_record(4.0, Category::HeatingPresent)).unwrap();
        assert_eq!(prediction.label, 1);
        // Label 1 spans both categories under the default scope.
        assert!((prediction.consumption - 53.5).abs() < 1e-12);
        assert_eq!(prediction.historical.len(), 4);
    }

    #[test]
    fn test_same_category_scope() {
        let store = store();
        let config = PipelineConfig::default().with_scope(PredictionScope::SameCategory);
        let pipeline = ClassificationPipeline::with_config(&store, config).unwrap();
        let prediction = pipeline.predict(&new_record(4.0, Category::HeatingPresent)).unwrap();
        assert_eq!(prediction.label, 1);
        assert!((prediction.consumption - 100.0).abs() < 1e-12);
        assert_eq!(prediction.historical.len(), 3);
    }

    #[test]
    fn test_predict_is_read_only() {
        let store = store();
        let before = store.fetch(DEFAULT_COLLECTION, &Filter::All).unwrap();
        let pipeline = ClassificationPipeline::new(&store);
        pipeline.predict(&new_record(0.05, Category::HeatingPresent)).unwrap();
        let after = store.fetch(DEFAULT_COLLECTION, &Filter::All).unwrap();
        assert_eq!(after, before);
        assert!(after.iter().all(|r| r.id != RecordId::from("new")));
    }

    #[test]
    fn test_more_neighbors_change_majority() {
        let store = store();
        // d (label 1) is nearest; b and a (label 0) come next.
        let query = new_record(0.12, Category::HeatingPresent);

        let single = ClassificationPipeline::new(&store).predict(&query).unwrap();
        assert_eq!(single.label, 1);
        assert!((single.consumption - 53.5).abs() < 1e-12);

        let config = PipelineConfig::default().with_neighbors(3);
        let triple = ClassificationPipeline::with_config(&store, config)
            .unwrap()
            .predict(&query)
            .unwrap();
        assert_eq!(triple.label, 0);
        assert!((triple.consumption - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_store_fails() {
        let store = InMemoryStore::new();
        let err = ClassificationPipeline::new(&store)
            .predict(&new_record(1.0, Category::HeatingAbsent))
            .unwrap_err();
        assert_eq!(err, Error::InsufficientData { candidates: 0 });
        assert_eq!(err.user_message(), crate::error::CLASSIFICATION_FAILED);
    }

    #[test]
    fn test_zero_neighbors_rejected() {
        let store = store();
        let config = PipelineConfig::default().with_neighbors(0);
        assert!(ClassificationPipeline::with_config(&store, config).is_err());
    }

    #[test]
    fn test_assess_against_prediction() {
        let store = store();
        let prediction = ClassificationPipeline::new(&store)
            .predict(&new_record(0.01, Category::HeatingPresent))
            .unwrap();
        assert_eq!(prediction.label, 0);
        assert_eq!(prediction.assess(30.0), Assessment::Above);
        assert_eq!(prediction.assess(5.0), Assessment::Below);
    }
}
