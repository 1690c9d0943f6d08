// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use sdp_core::Label;

/// Weighted label counts for the predictions falling into one score interval.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bucket {
    pub positive_weight: f64,
    pub negative_weight: f64,
}

impl Bucket {
    pub const ZERO: Self = Self {
        positive_weight: 0.0,
        negative_weight: 0.0,
    };

    pub fn total_weight(&self) -> f64 {
        self.positive_weight + self.negative_weight
    }

    pub fn is_zero(&self) -> bool {
        self.positive_weight == 0.0 && self.negative_weight == 0.0
    }

    /// Counts after adding `weight` to the counter selected by `label`.
    pub(crate) fn with_added(self, label: Label, weight: f64) -> Self {
        match label {
            Label::Positive => Self {
                positive_weight: self.positive_weight + weight,
                ..self
            },
            Label::Negative => Self {
                negative_weight: self.negative_weight + weight,
                ..self
            },
        }
    }

    /// Counter-wise sum of two buckets.
    pub(crate) fn combined(self, other: Self) -> Self {
        Self {
            positive_weight: self.positive_weight + other.positive_weight,
            negative_weight: self.negative_weight + other.negative_weight,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.positive_weight.is_finite()
            && self.negative_weight.is_finite()
            && self.positive_weight >= 0.0
            && self.negative_weight >= 0.0
    }
}
