//! Merge history of an agglomerative clustering run.
//!
//! Cluster ids follow the SciPy convention: leaves are `0..n`, and merge `i`
//! creates cluster `n + i`.

use super::util::{relabel_by_first_appearance, UnionFind};
use crate::error::{Error, Result};

/// A dendrogram representing hierarchical cluster merges.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First cluster being merged (index).
    pub cluster_a: usize,
    /// Second cluster being merged (index).
    pub cluster_b: usize,
    /// Distance/dissimilarity at which merge occurred.
    pub distance: f64,
    /// Size of resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create a new dendrogram for n items.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge operation.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Labels after applying every merge at or below `threshold`.
    pub fn cut_at_distance(&self, threshold: f64) -> Vec<usize> {
        let applied = self
            .merges
            .iter()
            .take_while(|m| m.distance <= threshold)
            .count();
        self.labels_after(applied)
    }

    /// Labels for exactly `k` clusters.
    ///
    /// Applies the first `n - k` merges, so ties in merge distance never
    /// collapse more clusters than requested.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 || k > self.n_items {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: self.n_items,
            });
        }
        Ok(self.labels_after(self.n_items - k))
    }

    fn labels_after(&self, n_merges: usize) -> Vec<usize> {
        let n = self.n_items;
        let mut uf = UnionFind::new(n + self.merges.len());
        for (i, merge) in self.merges.iter().take(n_merges).enumerate() {
            uf.union(merge.cluster_a, n + i);
            uf.union(merge.cluster_b, n + i);
        }
        let roots: Vec<usize> = (0..n).map(|leaf| uf.find(leaf)).collect();
        relabel_by_first_appearance(&roots)
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }
}
