//! Training and prediction configuration.
//!
//! Clustering parameters are a table keyed by [`Category`]; adding a category
//! means adding a row, not a branch.
//!
//! ```rust
//! use hearth::{Category, ClusteringConfig, Metric};
//!
//! let config = ClusteringConfig::from_json(
//!     r#"{"Yes": {"n_clusters": 3, "linkage": "average", "metric": "l1"}}"#,
//! )
//! .unwrap();
//! assert_eq!(config.get(Category::HeatingPresent).unwrap().metric, Metric::L1);
//! assert!(config.get(Category::HeatingAbsent).is_err());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::cluster::{Linkage, Metric};
use crate::error::{Error, Result};

/// Default store collection holding the labelled historical records.
pub const DEFAULT_COLLECTION: &str = "Active_data";

/// Default neighbor count for classification.
pub const DEFAULT_NEIGHBORS: usize = 1;

/// Clustering parameters for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Number of clusters to cut the dendrogram into.
    pub n_clusters: usize,
    /// Linkage method.
    #[serde(default)]
    pub linkage: Linkage,
    /// Dissimilarity metric.
    #[serde(default)]
    pub metric: Metric,
}

impl CategoryConfig {
    /// Create a category configuration.
    pub fn new(n_clusters: usize, linkage: Linkage, metric: Metric) -> Self {
        Self {
            n_clusters,
            linkage,
            metric,
        }
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "n_clusters",
                message: "must be at least 1",
            });
        }
        if self.linkage == Linkage::Ward && self.metric != Metric::Euclidean {
            return Err(Error::InvalidParameter {
                name: "linkage",
                message: "ward linkage requires the euclidean metric",
            });
        }
        Ok(())
    }
}

/// Per-category clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusteringConfig {
    categories: BTreeMap<Category, CategoryConfig>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self::empty()
            .with(
                Category::HeatingPresent,
                CategoryConfig::new(3, Linkage::Average, Metric::L1),
            )
            .with(
                Category::HeatingAbsent,
                CategoryConfig::new(4, Linkage::Average, Metric::Euclidean),
            )
    }
}

impl ClusteringConfig {
    /// A table with no categories.
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Add or replace the row for `category`.
    pub fn with(mut self, category: Category, config: CategoryConfig) -> Self {
        self.categories.insert(category, config);
        self
    }

    /// Parse and validate a JSON table, e.g. `{"Yes": {"n_clusters": 3}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every row.
    pub fn validate(&self) -> Result<()> {
        self.categories.values().try_for_each(CategoryConfig::validate)
    }

    /// Parameters for `category`; unconfigured categories are invalid.
    pub fn get(&self, category: Category) -> Result<&CategoryConfig> {
        self.categories
            .get(&category)
            .ok_or_else(|| Error::InvalidCategory(category.to_string()))
    }

    /// Configured categories, in order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.keys().copied()
    }
}

/// Which historical records a prediction draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionScope {
    /// Every record in the collection.
    #[default]
    AllRecords,
    /// Only records sharing the new record's category.
    SameCategory,
}

/// Settings for the classification pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Store collection holding labelled records.
    pub collection: String,
    /// Neighbor count k.
    pub neighbors: usize,
    /// Candidate pool scope.
    pub scope: PredictionScope,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            neighbors: DEFAULT_NEIGHBORS,
            scope: PredictionScope::AllRecords,
        }
    }
}

impl PipelineConfig {
    /// Set the neighbor count.
    pub fn with_neighbors(mut self, k: usize) -> Self {
        self.neighbors = k;
        self
    }

    /// Set the prediction scope.
    pub fn with_scope(mut self, scope: PredictionScope) -> Self {
        self.scope = scope;
        self
    }

    /// Parse and validate from JSON; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(Error::InvalidParameter {
                name: "neighbors",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = ClusteringConfig::default();
        let yes = config.get(Category::HeatingPresent).unwrap();
        assert_eq!(yes.n_clusters, 3);
        assert_eq!(yes.metric, Metric::L1);
        assert_eq!(yes.linkage, Linkage::Average);
        let no = config.get(Category::HeatingAbsent).unwrap();
        assert_eq!(no.n_clusters, 4);
        assert_eq!(no.metric, Metric::Euclidean);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ClusteringConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ClusteringConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_ward_requires_euclidean() {
        let err = ClusteringConfig::from_json(
            r#"{"No": {"n_clusters": 2, "linkage": "ward", "metric": "l1"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "linkage", .. }));
    }

    #[test]
    fn test_zero_clusters_rejected() {
        assert!(ClusteringConfig::from_json(r#"{"Yes": {"n_clusters": 0}}"#).is_err());
    }

    #[test]
    fn test_unknown_category_key_is_config_error() {
        let err = ClusteringConfig::from_json(r#"{"Maybe": {"n_clusters": 2}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config.collection, "Active_data");
        assert_eq!(config.neighbors, 1);
        assert_eq!(config.scope, PredictionScope::AllRecords);
        assert!(PipelineConfig::from_json(r#"{"neighbors": 0}"#).is_err());
    }
}
