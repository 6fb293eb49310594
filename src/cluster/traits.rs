//! Clustering traits.

use crate::config::CategoryConfig;
use crate::error::Result;
use crate::record::FeatureVector;

/// Trait for clustering algorithms.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point.
    fn fit_predict(&self, data: &[FeatureVector]) -> Result<Vec<usize>>;
}

/// Batch clustering capability invoked once per training run.
///
/// Returns one label per input vector, aligned by position. Labels only need
/// to be consistent within a single call.
pub trait Partitioner {
    /// Partition `vectors` using the category's parameters.
    fn partition(&self, vectors: &[FeatureVector], config: &CategoryConfig) -> Result<Vec<usize>>;
}

impl<P: Partitioner + ?Sized> Partitioner for &P {
    fn partition(&self, vectors: &[FeatureVector], config: &CategoryConfig) -> Result<Vec<usize>> {
        (**self).partition(vectors, config)
    }
}
