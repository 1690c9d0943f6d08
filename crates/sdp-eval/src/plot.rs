// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::matrices::ConfusionMatrixAtThreshold;

/// Stable name of the score distribution plot.
pub const SCORE_DISTRIBUTION_PLOT_NAME: &str = "score_distribution_plot";
/// Stable name of the label-aware confusion matrix plot.
pub const CONFUSION_MATRIX_PLOT_NAME: &str = "confusion_matrix_plot";

/// Identifies a plot among the outputs of one evaluation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlotKey {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    pub model_name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    pub output_name: String,
}

impl PlotKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_name: String::new(),
            output_name: String::new(),
        }
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = output_name.into();
        self
    }

    pub fn score_distribution() -> Self {
        Self::new(SCORE_DISTRIBUTION_PLOT_NAME)
    }

    pub fn confusion_matrix() -> Self {
        Self::new(CONFUSION_MATRIX_PLOT_NAME)
    }
}

/// Keyed sequence of confusion matrices, ascending by threshold.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrixPlot {
    pub key: PlotKey,
    pub matrices: Vec<ConfusionMatrixAtThreshold>,
}

impl ConfusionMatrixPlot {
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn thresholds(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.matrices.iter().map(|matrix| matrix.threshold)
    }

    /// Matrix whose threshold equals `threshold` exactly.
    pub fn matrix_at(&self, threshold: f64) -> Option<&ConfusionMatrixAtThreshold> {
        self.matrices
            .iter()
            .find(|matrix| matrix.threshold == threshold)
    }
}

/// Wraps derived matrices, unchanged and in order, under `key`.
pub fn derive_plot(
    key: PlotKey,
    matrices: Vec<ConfusionMatrixAtThreshold>,
) -> ConfusionMatrixPlot {
    tracing::debug!(plot = %key.name, matrices = matrices.len(), "plot derived");
    ConfusionMatrixPlot { key, matrices }
}

/// Label-agnostic view of derived matrices.
///
/// Each entry reports the weight scored above its threshold as
/// `true_positives` and the weight at or below it as `true_negatives`;
/// the remaining fields are zero.
pub fn derive_score_distribution(
    key: PlotKey,
    matrices: &[ConfusionMatrixAtThreshold],
) -> ConfusionMatrixPlot {
    let distribution = matrices
        .iter()
        .map(|matrix| ConfusionMatrixAtThreshold {
            threshold: matrix.threshold,
            true_positives: matrix.predicted_positive_weight(),
            true_negatives: matrix.predicted_negative_weight(),
            ..ConfusionMatrixAtThreshold::default()
        })
        .collect();
    derive_plot(key, distribution)
}
