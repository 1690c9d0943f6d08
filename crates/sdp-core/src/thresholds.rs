// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::SdpError;

/// Offset of the lowest threshold below zero, so that a score of exactly
/// `0.0` still exceeds it.
pub const LOWEST_THRESHOLD_EPSILON: f64 = 1e-6;
/// Smallest accepted `num_thresholds`.
pub const MIN_NUM_THRESHOLDS: usize = 2;

/// Immutable, strictly increasing decision boundaries.
///
/// A score `p` is classified positive at threshold `t` iff `p > t`. With `T`
/// thresholds the score axis splits into `T + 1` buckets: bucket `0` holds
/// `p <= t[0]`, bucket `k` holds `t[k-1] < p <= t[k]`, and bucket `T` holds
/// `p > t[T-1]`.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdSet {
    values: Vec<f64>,
}

impl ThresholdSet {
    /// Builds `[-1e-6, 0, 1/n, 2/n, ..., 1]`: the `n + 1` evenly spaced grid
    /// points over `[0, 1]` preceded by a sentinel just below zero.
    pub fn evenly_spaced(num_thresholds: usize) -> Result<Self, SdpError> {
        if num_thresholds < MIN_NUM_THRESHOLDS {
            return Err(SdpError::invalid_input(format!(
                "num_thresholds must be >= {MIN_NUM_THRESHOLDS}; got {num_thresholds}"
            )));
        }

        let denom = num_thresholds as f64;
        let mut values = Vec::with_capacity(num_thresholds + 2);
        values.push(-LOWEST_THRESHOLD_EPSILON);
        values.extend((0..=num_thresholds).map(|i| i as f64 / denom));
        Ok(Self { values })
    }

    /// Builds a set from explicit boundaries.
    pub fn from_values(values: Vec<f64>) -> Result<Self, SdpError> {
        if values.is_empty() {
            return Err(SdpError::invalid_input(
                "ThresholdSet requires at least one threshold",
            ));
        }
        if let Some((idx, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SdpError::invalid_input(format!(
                "ThresholdSet values must be finite; got {value} at index {idx}"
            )));
        }
        if let Some(idx) = values.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(SdpError::invalid_input(format!(
                "ThresholdSet values must be strictly increasing; got {} then {} at index {}",
                values[idx],
                values[idx + 1],
                idx + 1
            )));
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Number of buckets delimited by this set.
    pub fn num_buckets(&self) -> usize {
        self.values.len() + 1
    }

    /// Bucket holding `prediction`: the count of thresholds strictly below it.
    ///
    /// A prediction equal to a threshold lands in the bucket whose upper edge
    /// is that threshold, i.e. it does not exceed it.
    pub fn bucket_index(&self, prediction: f64) -> usize {
        self.values.partition_point(|threshold| *threshold < prediction)
    }
}

impl TryFrom<Vec<f64>> for ThresholdSet {
    type Error = SdpError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_values(values)
    }
}

impl From<ThresholdSet> for Vec<f64> {
    fn from(set: ThresholdSet) -> Self {
        set.values
    }
}
