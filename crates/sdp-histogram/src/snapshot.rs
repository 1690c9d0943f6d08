// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::accumulator::HistogramAccumulator;
use crate::bucket::Bucket;
use sdp_core::{SdpError, ThresholdSet};
use std::sync::Arc;

/// Current snapshot schema version emitted by writers.
pub const CURRENT_SNAPSHOT_SCHEMA_VERSION: u32 = 1;
/// Minimum snapshot schema version accepted by readers.
pub const MIN_SUPPORTED_SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Portable form of a partial accumulator, shipped between workers.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramSnapshot {
    pub schema_version: u32,
    pub thresholds: Vec<f64>,
    pub buckets: Vec<Bucket>,
    pub example_count: u64,
}

impl HistogramAccumulator {
    /// Captures the accumulator for transfer.
    pub fn to_snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot {
            schema_version: CURRENT_SNAPSHOT_SCHEMA_VERSION,
            thresholds: self.thresholds().as_slice().to_vec(),
            buckets: self.buckets().to_vec(),
            example_count: self.example_count(),
        }
    }

    /// Rebuilds an accumulator after validating the snapshot.
    pub fn from_snapshot(snapshot: HistogramSnapshot) -> Result<Self, SdpError> {
        let thresholds = Arc::new(ThresholdSet::from_values(snapshot.thresholds)?);
        Self::restore(
            thresholds,
            snapshot.schema_version,
            snapshot.buckets,
            snapshot.example_count,
        )
    }

    /// Rebuilds an accumulator over an already shared threshold set.
    ///
    /// Fails when the snapshot was taken over a different set.
    pub fn from_snapshot_with(
        thresholds: Arc<ThresholdSet>,
        snapshot: HistogramSnapshot,
    ) -> Result<Self, SdpError> {
        if snapshot.thresholds.len() != thresholds.len() {
            return Err(SdpError::invalid_input(format!(
                "histogram snapshot thresholds do not match the target set: snapshot has {}, target has {}",
                snapshot.thresholds.len(),
                thresholds.len()
            )));
        }
        if let Some(idx) = thresholds
            .iter()
            .zip(&snapshot.thresholds)
            .position(|(target, carried)| target.to_bits() != carried.to_bits())
        {
            return Err(SdpError::invalid_input(format!(
                "histogram snapshot thresholds do not match the target set at index {idx}: snapshot has {}, target has {}",
                snapshot.thresholds[idx],
                thresholds.as_slice()[idx]
            )));
        }
        Self::restore(
            thresholds,
            snapshot.schema_version,
            snapshot.buckets,
            snapshot.example_count,
        )
    }

    fn restore(
        thresholds: Arc<ThresholdSet>,
        schema_version: u32,
        buckets: Vec<Bucket>,
        example_count: u64,
    ) -> Result<Self, SdpError> {
        validate_snapshot_schema_version(schema_version)?;
        if buckets.len() != thresholds.num_buckets() {
            return Err(SdpError::invalid_input(format!(
                "histogram snapshot must carry thresholds.len() + 1 = {} buckets; got {}",
                thresholds.num_buckets(),
                buckets.len()
            )));
        }
        if let Some(idx) = buckets.iter().position(|bucket| !bucket.is_valid()) {
            return Err(SdpError::invalid_input(format!(
                "histogram snapshot bucket[{idx}] must hold finite, non-negative weights; got positive={}, negative={}",
                buckets[idx].positive_weight, buckets[idx].negative_weight
            )));
        }
        Self::from_parts(thresholds, buckets, example_count)
    }
}

fn validate_snapshot_schema_version(version: u32) -> Result<(), SdpError> {
    if !(MIN_SUPPORTED_SNAPSHOT_SCHEMA_VERSION..=CURRENT_SNAPSHOT_SCHEMA_VERSION).contains(&version)
    {
        return Err(SdpError::invalid_input(format!(
            "histogram snapshot schema_version={version} is unsupported; supported range is {MIN_SUPPORTED_SNAPSHOT_SCHEMA_VERSION}..={CURRENT_SNAPSHOT_SCHEMA_VERSION}"
        )));
    }
    Ok(())
}
