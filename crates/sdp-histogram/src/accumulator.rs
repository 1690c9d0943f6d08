// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::bucket::Bucket;
use sdp_core::{LabeledPrediction, SdpError, ThresholdSet};
use std::sync::Arc;

/// Per-partition histogram state: weighted label counts per threshold bucket.
///
/// Accumulators over the same [`ThresholdSet`] form a commutative monoid
/// under [`merge`](Self::merge) with [`new`](Self::new) as the identity, so a
/// combine tree of any shape reproduces the sequential result. `merge` takes
/// its operand by value and [`finalize`](Self::finalize) consumes `self`;
/// merged-away or finalized state cannot receive further examples.
///
/// The sum of all counters is kept finite as well as each counter, so every
/// prefix and suffix sum taken by matrix derivation stays finite.
#[derive(Clone, Debug)]
pub struct HistogramAccumulator {
    thresholds: Arc<ThresholdSet>,
    buckets: Vec<Bucket>,
    example_count: u64,
    // Overflow guard only; excluded from equality.
    weight_total: f64,
}

impl PartialEq for HistogramAccumulator {
    fn eq(&self, other: &Self) -> bool {
        self.thresholds == other.thresholds
            && self.buckets == other.buckets
            && self.example_count == other.example_count
    }
}

impl HistogramAccumulator {
    /// Empty accumulator; the identity element for `merge`.
    pub fn new(thresholds: Arc<ThresholdSet>) -> Self {
        let buckets = vec![Bucket::ZERO; thresholds.num_buckets()];
        Self {
            thresholds,
            buckets,
            example_count: 0,
            weight_total: 0.0,
        }
    }

    /// Empty accumulator over `ThresholdSet::evenly_spaced(num_thresholds)`.
    pub fn with_num_thresholds(num_thresholds: usize) -> Result<Self, SdpError> {
        Ok(Self::new(Arc::new(ThresholdSet::evenly_spaced(
            num_thresholds,
        )?)))
    }

    /// Adds one example to the bucket holding its prediction.
    ///
    /// Leaves the state untouched and fails when the addition would push the
    /// bucket counter or the accumulated total out of the finite range.
    pub fn add(&mut self, example: &LabeledPrediction) -> Result<(), SdpError> {
        let idx = self.thresholds.bucket_index(example.prediction());
        let updated = self.buckets[idx].with_added(example.label(), example.weight());
        if !updated.is_valid() {
            return Err(SdpError::numerical_issue(format!(
                "bucket[{idx}] counters overflowed adding weight={} (label={:?}, prediction={})",
                example.weight(),
                example.label(),
                example.prediction()
            )));
        }
        let weight_total = self.weight_total + example.weight();
        if !weight_total.is_finite() {
            return Err(SdpError::numerical_issue(format!(
                "total weight overflowed adding weight={} to {}",
                example.weight(),
                self.weight_total
            )));
        }
        self.buckets[idx] = updated;
        self.example_count += 1;
        self.weight_total = weight_total;
        Ok(())
    }

    /// Validates a raw `(label, prediction, weight)` triple, then adds it.
    pub fn add_raw(&mut self, label: f64, prediction: f64, weight: f64) -> Result<(), SdpError> {
        let example = LabeledPrediction::new(label, prediction, weight)?;
        self.add(&example)
    }

    /// Adds every example in order, stopping at the first failure.
    pub fn extend<'a, I>(&mut self, examples: I) -> Result<(), SdpError>
    where
        I: IntoIterator<Item = &'a LabeledPrediction>,
    {
        for example in examples {
            self.add(example)?;
        }
        Ok(())
    }

    /// Bucket-wise sum of `other` into `self`.
    ///
    /// Both accumulators must share the same threshold set. On failure `self`
    /// is left as it was.
    pub fn merge(&mut self, other: Self) -> Result<(), SdpError> {
        self.check_compatible(&other)?;

        let merged: Vec<Bucket> = self
            .buckets
            .iter()
            .zip(other.buckets.iter())
            .map(|(lhs, rhs)| lhs.combined(*rhs))
            .collect();
        if let Some(idx) = merged.iter().position(|bucket| !bucket.is_valid()) {
            return Err(SdpError::numerical_issue(format!(
                "bucket[{idx}] counters overflowed while merging accumulators"
            )));
        }
        let weight_total = self.weight_total + other.weight_total;
        if !weight_total.is_finite() {
            return Err(SdpError::numerical_issue(
                "total weight overflowed while merging accumulators",
            ));
        }

        self.buckets = merged;
        self.example_count = self.example_count.saturating_add(other.example_count);
        self.weight_total = weight_total;
        Ok(())
    }

    /// Value-style merge, convenient for folds and reductions.
    pub fn merged(mut self, other: Self) -> Result<Self, SdpError> {
        self.merge(other)?;
        Ok(self)
    }

    /// Ends accumulation and hands the counts to derivation.
    pub fn finalize(self) -> Histogram {
        tracing::debug!(
            buckets = self.buckets.len(),
            examples = self.example_count,
            "histogram finalized"
        );
        Histogram {
            thresholds: self.thresholds,
            buckets: self.buckets,
            example_count: self.example_count,
        }
    }

    pub fn thresholds(&self) -> &Arc<ThresholdSet> {
        &self.thresholds
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn example_count(&self) -> u64 {
        self.example_count
    }

    pub fn is_empty(&self) -> bool {
        self.example_count == 0
    }

    pub fn positive_weight(&self) -> f64 {
        self.buckets.iter().map(|bucket| bucket.positive_weight).sum()
    }

    pub fn negative_weight(&self) -> f64 {
        self.buckets.iter().map(|bucket| bucket.negative_weight).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.buckets.iter().map(Bucket::total_weight).sum()
    }

    /// Caller guarantees every bucket is valid; fails when their sum is not
    /// finite.
    pub(crate) fn from_parts(
        thresholds: Arc<ThresholdSet>,
        buckets: Vec<Bucket>,
        example_count: u64,
    ) -> Result<Self, SdpError> {
        let weight_total: f64 = buckets.iter().map(Bucket::total_weight).sum();
        if !weight_total.is_finite() {
            return Err(SdpError::invalid_input(
                "histogram snapshot total weight must be finite",
            ));
        }
        Ok(Self {
            thresholds,
            buckets,
            example_count,
            weight_total,
        })
    }

    fn check_compatible(&self, other: &Self) -> Result<(), SdpError> {
        let same_thresholds =
            Arc::ptr_eq(&self.thresholds, &other.thresholds) || self.thresholds == other.thresholds;
        if !same_thresholds || self.buckets.len() != other.buckets.len() {
            tracing::warn!(
                lhs_buckets = self.buckets.len(),
                rhs_buckets = other.buckets.len(),
                "rejected merge of accumulators over different threshold sets"
            );
            return Err(SdpError::invalid_input(format!(
                "cannot merge histogram accumulators over different threshold sets: lhs has {} thresholds, rhs has {}",
                self.thresholds.len(),
                other.thresholds.len()
            )));
        }
        Ok(())
    }
}

/// Finalized, read-only histogram consumed by matrix derivation.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    thresholds: Arc<ThresholdSet>,
    buckets: Vec<Bucket>,
    example_count: u64,
}

impl Histogram {
    /// Histogram of an empty stream.
    pub fn empty(thresholds: Arc<ThresholdSet>) -> Self {
        HistogramAccumulator::new(thresholds).finalize()
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn example_count(&self) -> u64 {
        self.example_count
    }

    pub fn positive_weight(&self) -> f64 {
        self.buckets.iter().map(|bucket| bucket.positive_weight).sum()
    }

    pub fn negative_weight(&self) -> f64 {
        self.buckets.iter().map(|bucket| bucket.negative_weight).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.buckets.iter().map(Bucket::total_weight).sum()
    }
}
