//! Batch clustering used to label each category's historical records.
//!
//! ## Hierarchical (Agglomerative) Clustering
//!
//! Bottom-up: start with each point as its own cluster, repeatedly merge
//! the two closest clusters until one remains. The merge history forms a
//! **dendrogram**, a binary tree cut here at exactly `k` clusters.
//!
//! **Linkage methods** determine "distance between clusters":
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Average | mean(pairwise) | Balanced compromise |
//! | Ward | Variance increase | Minimizes within-cluster variance |
//!
//! Pairwise distances come from a configurable [`Metric`].
//!
//! ## Usage
//!
//! ```rust
//! use hearth::cluster::{Clustering, HierarchicalClustering, Linkage, Metric};
//! use hearth::FeatureVector;
//!
//! let data: Vec<FeatureVector> = vec![
//!     vec![0.0, 0.0].into(),
//!     vec![0.1, 0.1].into(),
//!     vec![10.0, 10.0].into(),
//!     vec![10.1, 10.1].into(),
//! ];
//!
//! let labels = HierarchicalClustering::new(2)
//!     .with_linkage(Linkage::Average)
//!     .with_metric(Metric::L1)
//!     .fit_predict(&data)
//!     .unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod dendrogram;
mod distance;
mod hierarchical;
mod traits;
mod util;

pub use dendrogram::{Dendrogram, Merge};
pub use distance::{euclidean, Metric};
pub use hierarchical::{Agglomerative, HierarchicalClustering, Linkage};
pub use traits::{Clustering, Partitioner};
