//! Dwelling records and their numeric projection.
//!
//! A [`Record`] is produced by the preprocessing collaborator with every
//! feature already scaled and encoded. The core only projects records onto a
//! [`FeatureSchema`] to obtain [`FeatureVector`]s; it never encodes anything.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{Error, Result};

/// Store identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

/// One dwelling as held by the record store.
///
/// Field names follow the store's document layout; every key that is not an
/// identifier, category, target or label is a numeric feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Heating-source category.
    #[serde(rename = "Heating Source")]
    pub heating_source: Category,
    /// Observed consumption (kWh/day/m²).
    #[serde(rename = "Kwh/day/m2")]
    pub target_consumption: f64,
    /// Cluster assigned by the last training run.
    #[serde(rename = "label", default, skip_serializing_if = "Option::is_none")]
    pub cluster_label: Option<usize>,
    /// Encoded numeric features.
    #[serde(flatten)]
    pub features: BTreeMap<String, f64>,
}

impl Record {
    /// Create an unlabelled record.
    pub fn new(
        id: impl Into<RecordId>,
        heating_source: Category,
        target_consumption: f64,
        features: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        Self {
            id: id.into(),
            heating_source,
            target_consumption,
            cluster_label: None,
            features: features.into_iter().collect(),
        }
    }

    /// Set the cluster label.
    pub fn with_label(mut self, label: usize) -> Self {
        self.cluster_label = Some(label);
        self
    }
}

/// Ordered numeric features of one record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Wrap raw values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no features.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the values.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// The fixed, ordered set of feature keys shared by a comparison set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    keys: Vec<String>,
}

impl FeatureSchema {
    /// Schema with the given keys, in order.
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    /// Derive the schema from a set of records.
    ///
    /// Every record must carry exactly the same feature keys.
    pub fn from_records(records: &[Record]) -> Result<Self> {
        let first = records.first().ok_or(Error::EmptyInput)?;
        let schema = Self {
            keys: first.features.keys().cloned().collect(),
        };
        for record in &records[1..] {
            if !schema.matches(record) {
                return Err(Error::SchemaMismatch(format!(
                    "record {} has {} features, expected the {} features of record {}",
                    record.id,
                    record.features.len(),
                    schema.len(),
                    first.id
                )));
            }
        }
        Ok(schema)
    }

    /// Feature keys in order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the schema has no features.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn matches(&self, record: &Record) -> bool {
        record.features.len() == self.keys.len()
            && self.keys.iter().all(|k| record.features.contains_key(k))
    }

    /// Project a record that must match the schema exactly.
    pub fn project(&self, record: &Record) -> Result<FeatureVector> {
        if !self.matches(record) {
            return Err(Error::SchemaMismatch(format!(
                "record {} does not match the {}-feature schema",
                record.id,
                self.len()
            )));
        }
        Ok(FeatureVector(
            self.keys.iter().map(|k| record.features[k]).collect(),
        ))
    }

    /// Project a newly observed record onto the schema.
    ///
    /// Keys absent from the record read as 0 (unset one-hot columns). Keys
    /// unknown to the schema are rejected.
    pub fn align(&self, record: &Record) -> Result<FeatureVector> {
        if let Some(unknown) = record.features.keys().find(|k| !self.keys.contains(k)) {
            return Err(Error::SchemaMismatch(format!(
                "record {} carries unknown feature '{unknown}'",
                record.id
            )));
        }
        Ok(FeatureVector(
            self.keys
                .iter()
                .map(|k| record.features.get(k).copied().unwrap_or(0.0))
                .collect(),
        ))
    }
}
