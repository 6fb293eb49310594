use thiserror::Error;

use crate::category::Category;
use crate::record::RecordId;

/// Message shown to end users for any failed classification.
pub const CLASSIFICATION_FAILED: &str = "classification could not be completed";

/// Errors returned by the voter, estimator, trainer and pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No neighbor candidates remained after zero-distance exclusion.
    #[error("insufficient data: {candidates} candidates, none left after excluding exact matches")]
    InsufficientData {
        /// Number of candidates offered to the voter.
        candidates: usize,
    },

    /// Category is not recognized or has no clustering configuration.
    #[error("invalid category '{0}'")]
    InvalidCategory(String),

    /// A cluster label has no backing records.
    #[error("cluster {label} has no records")]
    EmptyCluster {
        /// The label that matched nothing.
        label: usize,
    },

    /// Feature vectors (or records) do not share one schema.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A training run persisted some labels before store writes failed.
    #[error(
        "training for {category} wrote {written} of {total} labels; {} writes failed",
        .failed.len()
    )]
    BatchPartialFailure {
        /// Category being trained.
        category: Category,
        /// Labels successfully written.
        written: usize,
        /// Records in the partition.
        total: usize,
        /// Records whose write failed, with the store's reason.
        failed: Vec<(RecordId, String)>,
    },

    /// Input was empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// The record store failed.
    #[error("record store: {0}")]
    Store(String),

    /// A write addressed a record the store does not hold.
    #[error("record {id} not found in {collection}")]
    NotFound {
        /// Collection searched.
        collection: String,
        /// Missing record.
        id: RecordId,
    },

    /// Configuration could not be parsed.
    #[error("configuration: {0}")]
    Config(String),
}

impl Error {
    /// The generic outcome shown to end users.
    ///
    /// The variant carries the diagnostic detail; callers log it and show this.
    pub fn user_message(&self) -> &'static str {
        CLASSIFICATION_FAILED
    }

    /// Whether retrying the operation could change the outcome.
    ///
    /// Only store I/O failures qualify; a missing record stays missing and the
    /// numeric core is deterministic.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
