// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use sdp_histogram::{Bucket, Histogram};

/// Weighted confusion matrix at one decision threshold.
///
/// A prediction counts as positive at `threshold` iff it is strictly greater
/// than it. With the `serde` feature, zero-valued fields are omitted on
/// encode and default to zero on decode.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConfusionMatrixAtThreshold {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_zero"))]
    pub threshold: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_zero"))]
    pub true_positives: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_zero"))]
    pub false_positives: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_zero"))]
    pub true_negatives: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_zero"))]
    pub false_negatives: f64,
}

#[cfg(feature = "serde")]
fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

impl ConfusionMatrixAtThreshold {
    /// All-zero matrix at `threshold`.
    pub fn empty(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// Weight of examples with a positive label.
    pub fn label_positive_weight(&self) -> f64 {
        self.true_positives + self.false_negatives
    }

    /// Weight of examples with a negative label.
    pub fn label_negative_weight(&self) -> f64 {
        self.true_negatives + self.false_positives
    }

    /// Weight scored above the threshold.
    pub fn predicted_positive_weight(&self) -> f64 {
        self.true_positives + self.false_positives
    }

    /// Weight scored at or below the threshold.
    pub fn predicted_negative_weight(&self) -> f64 {
        self.true_negatives + self.false_negatives
    }

    /// `tp / (tp + fp)`, or `None` when nothing is predicted positive.
    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positives, self.predicted_positive_weight())
    }

    /// `tp / (tp + fn)`, or `None` without positive labels.
    pub fn recall(&self) -> Option<f64> {
        ratio(self.true_positives, self.label_positive_weight())
    }

    /// `fp / (fp + tn)`, or `None` without negative labels.
    pub fn false_positive_rate(&self) -> Option<f64> {
        ratio(self.false_positives, self.label_negative_weight())
    }

    pub fn accuracy(&self) -> Option<f64> {
        ratio(
            self.true_positives + self.true_negatives,
            self.total_weight(),
        )
    }
}

/// Derives one confusion matrix per threshold, ascending by threshold.
///
/// Bucket `k` of a histogram over `T` thresholds sits above threshold `i`
/// iff `k > i`, so `tp[i]`/`fp[i]` are suffix sums over buckets `i+1..=T`
/// and `fn[i]`/`tn[i]` are prefix sums over buckets `0..=i`. One backward
/// and one forward pass; linear in the bucket count.
pub fn derive_matrices(histogram: &Histogram) -> Vec<ConfusionMatrixAtThreshold> {
    let thresholds = histogram.thresholds().as_slice();
    let buckets = histogram.buckets();
    debug_assert_eq!(buckets.len(), thresholds.len() + 1);

    let mut matrices = Vec::with_capacity(thresholds.len());
    let mut above = Bucket::ZERO;
    for (idx, threshold) in thresholds.iter().enumerate().rev() {
        let bucket = buckets[idx + 1];
        above.positive_weight += bucket.positive_weight;
        above.negative_weight += bucket.negative_weight;
        matrices.push(ConfusionMatrixAtThreshold {
            threshold: *threshold,
            true_positives: above.positive_weight,
            false_positives: above.negative_weight,
            ..ConfusionMatrixAtThreshold::default()
        });
    }
    matrices.reverse();

    let mut below = Bucket::ZERO;
    for (matrix, bucket) in matrices.iter_mut().zip(buckets.iter()) {
        below.positive_weight += bucket.positive_weight;
        below.negative_weight += bucket.negative_weight;
        matrix.false_negatives = below.positive_weight;
        matrix.true_negatives = below.negative_weight;
    }

    tracing::trace!(thresholds = matrices.len(), "confusion matrices derived");
    matrices
}
