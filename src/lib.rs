//! # hearth
//!
//! Dwelling energy-consumption estimation by cluster assignment.
//!
//! Offline, each heating-source category's historical records are grouped by
//! agglomerative clustering ([`ClusterTrainer`]). Online, a new dwelling is
//! assigned to the cluster of its nearest labelled neighbors
//! ([`NearestNeighborVoter`]) and the cluster's mean consumption is reported
//! as its expected consumption ([`ClassificationPipeline`]).
//!
//! Storage is reached only through [`RecordStore`]; feature encoding happens
//! upstream, so every [`Record`] arrives already scaled.
//!
//! ```rust
//! use hearth::{
//!     Category, ClassificationPipeline, ClusterTrainer, ClusteringConfig, InMemoryStore, Record,
//! };
//!
//! let store = InMemoryStore::new();
//! let dwelling = |id: &str, size: f64, kwh: f64| {
//!     Record::new(id, Category::HeatingAbsent, kwh, [("Size".to_string(), size)])
//! };
//! store
//!     .insert(
//!         "Active_data",
//!         [
//!             dwelling("a", 0.0, 1.0),
//!             dwelling("b", 0.1, 1.2),
//!             dwelling("c", 0.5, 2.0),
//!             dwelling("d", 0.6, 2.2),
//!             dwelling("e", 1.0, 4.0),
//!             dwelling("f", 0.9, 3.8),
//!             dwelling("g", 0.3, 1.6),
//!         ],
//!     )
//!     .unwrap();
//!
//! ClusterTrainer::new(&store, ClusteringConfig::default())
//!     .train(Category::HeatingAbsent)
//!     .unwrap();
//!
//! let prediction = ClassificationPipeline::new(&store)
//!     .predict(&dwelling("new", 0.95, 0.0))
//!     .unwrap();
//! assert!((prediction.consumption - 3.9).abs() < 1e-9);
//! ```

pub mod category;
pub mod cluster;
pub mod config;
/// Error types used across `hearth`.
pub mod error;
pub mod estimate;
pub mod knn;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod train;

pub use category::Category;
pub use cluster::{Agglomerative, HierarchicalClustering, Linkage, Metric, Partitioner};
pub use config::{CategoryConfig, ClusteringConfig, PipelineConfig, PredictionScope};
pub use error::{Error, Result};
pub use estimate::{assess, Assessment, ClusterSummary, ConsumptionEstimator};
pub use knn::{NearestNeighborVoter, Neighbor};
pub use metrics::same_partition;
pub use pipeline::{ClassificationPipeline, Prediction};
pub use record::{FeatureSchema, FeatureVector, Record, RecordId};
pub use store::{Filter, InMemoryStore, RecordStore};
pub use train::{ClusterTrainer, TrainingReport};
