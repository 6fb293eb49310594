//! Nearest-neighbor cluster vote.
//!
//! Assigns a query vector to the majority label among its `k` nearest
//! labelled candidates (Euclidean distance). Candidates at distance exactly
//! zero are the query's own echo in the pool and never vote.
//!
//! # Selection
//!
//! A bounded max-heap holds at most `k` neighbors with the farthest on top.
//! Each candidate is pushed, and whenever the heap grows past `k` the top is
//! evicted, so after one pass it holds the `k` closest in O(n log k) without
//! sorting the pool.
//!
//! Neighbors are ordered by `(distance, label)`. At equal distance the higher
//! label is evicted first, and a tied vote goes to the lowest label, so the
//! result does not depend on candidate order.
//!
//! ```rust
//! use hearth::knn::classify;
//! use hearth::FeatureVector;
//!
//! let candidates = vec![
//!     (FeatureVector::new(vec![1.0, 0.0]), 0),
//!     (FeatureVector::new(vec![0.0, 3.0]), 1),
//!     (FeatureVector::new(vec![0.0, 1.0]), 0),
//! ];
//! let label = classify(&FeatureVector::new(vec![0.0, 0.0]), &candidates, 2).unwrap();
//! assert_eq!(label, 0);
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::cluster::euclidean;
use crate::error::{Error, Result};
use crate::record::FeatureVector;

/// A candidate retained by the vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Euclidean distance to the query.
    pub distance: f64,
    /// The candidate's cluster label.
    pub label: usize,
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Majority vote over the `k` nearest labelled candidates.
#[derive(Debug, Clone, Copy)]
pub struct NearestNeighborVoter {
    k: usize,
}

impl Default for NearestNeighborVoter {
    fn default() -> Self {
        Self {
            k: crate::config::DEFAULT_NEIGHBORS,
        }
    }
}

impl NearestNeighborVoter {
    /// Voter over `k` neighbors.
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Configured neighbor count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// The retained neighbors, closest first.
    ///
    /// Holds `min(k, non-excluded candidates)` entries.
    pub fn nearest(
        &self,
        query: &FeatureVector,
        candidates: &[(FeatureVector, usize)],
    ) -> Result<Vec<Neighbor>> {
        let mut neighbors = self.select(query, candidates)?.into_vec();
        neighbors.sort_unstable();
        Ok(neighbors)
    }

    /// Label of the query by majority vote.
    pub fn classify(
        &self,
        query: &FeatureVector,
        candidates: &[(FeatureVector, usize)],
    ) -> Result<usize> {
        let heap = self.select(query, candidates)?;

        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for neighbor in heap.iter() {
            *counts.entry(neighbor.label).or_insert(0) += 1;
        }

        // Ascending label order plus a strict comparison keeps the lowest label on ties.
        let mut winner = None;
        for (&label, &count) in &counts {
            match winner {
                Some((_, best)) if count <= best => {}
                _ => winner = Some((label, count)),
            }
        }
        let (label, votes) = winner.ok_or(Error::InsufficientData {
            candidates: candidates.len(),
        })?;

        tracing::debug!(label, votes, voters = heap.len(), "nearest-neighbor vote");
        Ok(label)
    }

    fn select(
        &self,
        query: &FeatureVector,
        candidates: &[(FeatureVector, usize)],
    ) -> Result<BinaryHeap<Neighbor>> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }

        let mut heap = BinaryHeap::with_capacity(self.k + 1);
        let mut excluded = 0usize;
        for (vector, label) in candidates {
            if vector.len() != query.len() {
                return Err(Error::SchemaMismatch(format!(
                    "candidate has {} features, query has {}",
                    vector.len(),
                    query.len()
                )));
            }

            let distance = euclidean(query.as_slice(), vector.as_slice());
            if distance == 0.0 {
                excluded += 1;
                continue;
            }

            heap.push(Neighbor {
                distance,
                label: *label,
            });
            if heap.len() > self.k {
                heap.pop();
            }
        }

        if excluded > 0 {
            tracing::debug!(excluded, "skipped zero-distance candidates");
        }
        if heap.is_empty() {
            return Err(Error::InsufficientData {
                candidates: candidates.len(),
            });
        }
        Ok(heap)
    }
}

/// Classify `query` against `candidates` with `k` neighbors.
pub fn classify(
    query: &FeatureVector,
    candidates: &[(FeatureVector, usize)],
    k: usize,
) -> Result<usize> {
    NearestNeighborVoter::new(k).classify(query, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(points: &[([f64; 2], usize)]) -> Vec<(FeatureVector, usize)> {
        points
            .iter()
            .map(|(p, l)| (FeatureVector::new(p.to_vec()), *l))
            .collect()
    }

    fn origin() -> FeatureVector {
        FeatureVector::new(vec![0.0, 0.0])
    }

    #[test]
    fn test_two_nearest_agree() {
        let candidates = pool(&[([1.0, 0.0], 0), ([0.0, 3.0], 1), ([0.0, 1.0], 0)]);
        assert_eq!(classify(&origin(), &candidates, 2).unwrap(), 0);
    }

    #[test]
    fn test_k1_picks_closest() {
        let candidates = pool(&[([5.0, 0.0], 7), ([0.0, 0.5], 3), ([2.0, 2.0], 7)]);
        assert_eq!(classify(&origin(), &candidates, 1).unwrap(), 3);
    }

    #[test]
    fn test_self_echo_excluded() {
        let candidates = pool(&[([0.0, 0.0], 9), ([1.0, 1.0], 2)]);
        assert_eq!(classify(&origin(), &candidates, 1).unwrap(), 2);
    }

    #[test]
    fn test_only_echo_is_insufficient() {
        let candidates = pool(&[([0.0, 0.0], 9)]);
        assert_eq!(
            classify(&origin(), &candidates, 1).unwrap_err(),
            Error::InsufficientData { candidates: 1 }
        );
    }

    #[test]
    fn test_empty_pool_is_insufficient() {
        assert_eq!(
            classify(&origin(), &[], 3).unwrap_err(),
            Error::InsufficientData { candidates: 0 }
        );
    }

    #[test]
    fn test_k_beyond_pool_uses_all() {
        let candidates = pool(&[([1.0, 0.0], 4), ([0.0, 2.0], 4), ([3.0, 3.0], 1)]);
        let voter = NearestNeighborVoter::new(50);
        assert_eq!(voter.nearest(&origin(), &candidates).unwrap().len(), 3);
        assert_eq!(voter.classify(&origin(), &candidates).unwrap(), 4);
    }

    #[test]
    fn test_tie_goes_to_lowest_label() {
        let candidates = pool(&[([1.0, 0.0], 5), ([0.0, 2.0], 2)]);
        assert_eq!(classify(&origin(), &candidates, 2).unwrap(), 2);

        let reversed: Vec<_> = candidates.into_iter().rev().collect();
        assert_eq!(classify(&origin(), &reversed, 2).unwrap(), 2);
    }

    #[test]
    fn test_equal_distance_eviction_keeps_lowest_label() {
        let candidates = pool(&[([1.0, 0.0], 8), ([0.0, 1.0], 1), ([-1.0, 0.0], 4)]);
        let nearest = NearestNeighborVoter::new(1).nearest(&origin(), &candidates).unwrap();
        assert_eq!(
            nearest,
            vec![Neighbor {
                distance: 1.0,
                label: 1
            }]
        );
    }

    #[test]
    fn test_nearest_sorted() {
        let candidates = pool(&[([3.0, 0.0], 0), ([1.0, 0.0], 1), ([2.0, 0.0], 2)]);
        let nearest = NearestNeighborVoter::new(2).nearest(&origin(), &candidates).unwrap();
        let labels: Vec<usize> = nearest.iter().map(|n| n.label).collect();
        assert_eq!(labels, vec![1, 2]);
    }

    #[test]
    fn test_schema_mismatch() {
        let candidates = vec![(FeatureVector::new(vec![1.0]), 0)];
        assert!(matches!(
            classify(&origin(), &candidates, 1),
            Err(Error::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_zero_k_rejected() {
        let candidates = pool(&[([1.0, 0.0], 0)]);
        assert!(matches!(
            classify(&origin(), &candidates, 0),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
    }
}
