//! Consumption estimates from labelled historical records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Record;

/// Relative band above the prediction still counted as expected consumption.
pub const DEFAULT_TOLERANCE: f64 = 0.10;

/// Consumption statistics of one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Cluster label.
    pub label: usize,
    /// Records carrying the label.
    pub count: usize,
    /// Mean target consumption.
    pub mean: f64,
    /// Lowest target consumption.
    pub min: f64,
    /// Highest target consumption.
    pub max: f64,
}

/// Mean consumption of records sharing one value of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureGroup {
    /// The feature value.
    pub value: f64,
    /// Records with that value.
    pub count: usize,
    /// Mean target consumption.
    pub mean: f64,
}

/// How an observed consumption compares with its prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    /// Below the prediction.
    Below,
    /// At the prediction or above it by at most the tolerance.
    WithinTolerance,
    /// Above the tolerance band.
    Above,
}

/// Compare `actual` with `prediction` using a relative `tolerance` band.
pub fn assess(actual: f64, prediction: f64, tolerance: f64) -> Assessment {
    if actual < prediction {
        Assessment::Below
    } else if actual <= prediction + prediction * tolerance {
        Assessment::WithinTolerance
    } else {
        Assessment::Above
    }
}

/// Aggregates target consumption over historical records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumptionEstimator;

impl ConsumptionEstimator {
    /// Mean target consumption of the records labelled `label`.
    ///
    /// A label with no records means training and serving disagree on the
    /// label space; that is an error, never a zero.
    pub fn estimate(&self, historical: &[Record], label: usize) -> Result<f64> {
        let (sum, count) = historical
            .iter()
            .filter(|r| r.cluster_label == Some(label))
            .fold((0.0, 0usize), |(sum, count), r| {
                (sum + r.target_consumption, count + 1)
            });
        if count == 0 {
            return Err(Error::EmptyCluster { label });
        }
        Ok(sum / count as f64)
    }

    /// Per-label statistics, ordered by label. Unlabelled records are skipped.
    pub fn summaries(&self, historical: &[Record]) -> Vec<ClusterSummary> {
        let mut by_label: BTreeMap<usize, ClusterSummary> = BTreeMap::new();
        for record in historical {
            let Some(label) = record.cluster_label else {
                continue;
            };
            let value = record.target_consumption;
            by_label
                .entry(label)
                .and_modify(|s| {
                    s.count += 1;
                    s.mean += value;
                    s.min = s.min.min(value);
                    s.max = s.max.max(value);
                })
                .or_insert(ClusterSummary {
                    label,
                    count: 1,
                    mean: value,
                    min: value,
                    max: value,
                });
        }
        by_label
            .into_values()
            .map(|mut s| {
                s.mean /= s.count as f64;
                s
            })
            .collect()
    }

    /// Mean consumption grouped by the value of `feature`, ordered by value.
    ///
    /// Records without the feature are skipped.
    pub fn mean_by_feature(&self, historical: &[Record], feature: &str) -> Vec<FeatureGroup> {
        let mut values: Vec<(f64, f64)> = historical
            .iter()
            .filter_map(|r| r.features.get(feature).map(|v| (*v, r.target_consumption)))
            .collect();
        values.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut groups: Vec<FeatureGroup> = Vec::new();
        for (value, consumption) in values {
            match groups.last_mut() {
                Some(g) if g.value == value => {
                    g.count += 1;
                    g.mean += consumption;
                }
                _ => groups.push(FeatureGroup {
                    value,
                    count: 1,
                    mean: consumption,
                }),
            }
        }
        for g in &mut groups {
            g.mean /= g.count as f64;
        }
        groups
    }
}

/// Mean target consumption of the records labelled `label`.
pub fn estimate(historical: &[Record], label: usize) -> Result<f64> {
    ConsumptionEstimator.estimate(historical, label)
}
