// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod error;
pub mod example;
pub mod thresholds;

pub use error::SdpError;
pub use example::{Label, LabeledPrediction};
pub use thresholds::{LOWEST_THRESHOLD_EPSILON, MIN_NUM_THRESHOLDS, ThresholdSet};

/// Core shared types for score distribution plots.
pub fn crate_name() -> &'static str {
    "sdp-core"
}
