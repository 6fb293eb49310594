//! Hierarchical (agglomerative) clustering.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest clusters, then cuts it into a fixed number of
//! clusters.
//!
//! # Linkage Methods
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact, spherical clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//! | Ward | Δ variance | Minimizes within-cluster variance |
//!
//! Ward is only meaningful on Euclidean dissimilarities; the other linkages
//! accept any [`Metric`].

use kodama::{linkage as kodama_linkage, Method as KodamaMethod};
use serde::{Deserialize, Serialize};

use super::dendrogram::Dendrogram;
use super::distance::Metric;
use super::traits::{Clustering, Partitioner};
use crate::config::CategoryConfig;
use crate::error::{Error, Result};
use crate::record::FeatureVector;

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    #[default]
    Average,
    /// Ward's method: minimize within-cluster variance.
    Ward,
}

impl From<Linkage> for KodamaMethod {
    fn from(linkage: Linkage) -> Self {
        match linkage {
            Linkage::Single => KodamaMethod::Single,
            Linkage::Complete => KodamaMethod::Complete,
            Linkage::Average => KodamaMethod::Average,
            Linkage::Ward => KodamaMethod::Ward,
        }
    }
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    n_clusters: usize,
    linkage: Linkage,
    metric: Metric,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::Average,
            metric: Metric::Euclidean,
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set dissimilarity metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Fit and return the full dendrogram.
    pub fn fit_dendrogram(&self, data: &[FeatureVector]) -> Result<Dendrogram> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.linkage == Linkage::Ward && self.metric != Metric::Euclidean {
            return Err(Error::InvalidParameter {
                name: "linkage",
                message: "ward linkage requires the euclidean metric",
            });
        }

        let n = data.len();
        let d = data[0].len();
        if let Some(p) = data.iter().find(|p| p.len() != d) {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: p.len(),
            });
        }

        let mut dendro = Dendrogram::new(n);
        if n < 2 {
            return Ok(dendro);
        }

        // Condensed dissimilarity matrix (upper triangle, row-major), N-choose-2 long.
        let mut condensed = Vec::with_capacity((n * (n - 1)) / 2);
        for row in 0..(n - 1) {
            for col in (row + 1)..n {
                condensed.push(
                    self.metric
                        .distance(data[row].as_slice(), data[col].as_slice()),
                );
            }
        }

        // Leaves are 0..n-1 and merge i creates cluster n+i.
        let dend = kodama_linkage(&mut condensed, n, self.linkage.into());
        for step in dend.steps() {
            dendro.add_merge(step.cluster1, step.cluster2, step.dissimilarity, step.size);
        }

        tracing::debug!(
            n_items = n,
            n_merges = dendro.n_merges(),
            linkage = ?self.linkage,
            metric = ?self.metric,
            "built dendrogram"
        );
        Ok(dendro)
    }
}

impl From<&CategoryConfig> for HierarchicalClustering {
    fn from(config: &CategoryConfig) -> Self {
        Self::new(config.n_clusters)
            .with_linkage(config.linkage)
            .with_metric(config.metric)
    }
}

impl Clustering for HierarchicalClustering {
    fn fit_predict(&self, data: &[FeatureVector]) -> Result<Vec<usize>> {
        if self.n_clusters == 0 || self.n_clusters > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: data.len(),
            });
        }
        let dendro = self.fit_dendrogram(data)?;
        dendro.cut_to_k(self.n_clusters)
    }
}

/// The agglomerative partitioner used by training.
#[derive(Debug, Clone, Copy, Default)]
pub struct Agglomerative;

impl Partitioner for Agglomerative {
    fn partition(&self, vectors: &[FeatureVector], config: &CategoryConfig) -> Result<Vec<usize>> {
        config.validate()?;
        HierarchicalClustering::from(config).fit_predict(vectors)
    }
}
