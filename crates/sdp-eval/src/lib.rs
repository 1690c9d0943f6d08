// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod computation;
pub mod config;
pub mod matrices;
pub mod plot;

pub use computation::PlotComputation;
pub use config::{DEFAULT_NUM_THRESHOLDS, PlotKind, ScoreDistributionPlotConfig};
pub use matrices::{ConfusionMatrixAtThreshold, derive_matrices};
pub use plot::{
    CONFUSION_MATRIX_PLOT_NAME, ConfusionMatrixPlot, PlotKey, SCORE_DISTRIBUTION_PLOT_NAME,
    derive_plot, derive_score_distribution,
};

/// Matrix and plot derivation namespace.
pub fn crate_name() -> &'static str {
    let _ = (sdp_core::crate_name(), sdp_histogram::crate_name());
    "sdp-eval"
}
