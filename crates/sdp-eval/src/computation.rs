// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::config::{PlotKind, ScoreDistributionPlotConfig};
use crate::matrices::{ConfusionMatrixAtThreshold, derive_matrices};
use crate::plot::{ConfusionMatrixPlot, PlotKey, derive_plot, derive_score_distribution};
use sdp_core::{LabeledPrediction, SdpError, ThresholdSet};
#[cfg(feature = "rayon")]
use sdp_histogram::combine_parallel;
use sdp_histogram::{Combiner, Histogram, HistogramCombiner, combine_sequential};
use std::sync::Arc;

/// The three-stage plot computation: histogram combine, matrix derivation,
/// plot derivation.
///
/// An execution engine drives [`combiner`](Self::combiner) per slice and
/// then calls [`matrices`](Self::matrices) and [`plot`](Self::plot) on the
/// merged result.
#[derive(Clone, Debug)]
pub struct PlotComputation {
    key: PlotKey,
    kind: PlotKind,
    combiner: HistogramCombiner,
}

impl PlotComputation {
    pub fn new(config: &ScoreDistributionPlotConfig) -> Result<Self, SdpError> {
        config.validate()?;
        let thresholds = Arc::new(ThresholdSet::evenly_spaced(config.num_thresholds)?);
        Ok(Self {
            key: config.plot_key(),
            kind: config.kind,
            combiner: HistogramCombiner::new(thresholds),
        })
    }

    /// Score distribution plot over `num_thresholds` evenly spaced thresholds.
    pub fn score_distribution(num_thresholds: usize) -> Result<Self, SdpError> {
        Self::new(&ScoreDistributionPlotConfig::with_num_thresholds(
            num_thresholds,
        ))
    }

    pub fn key(&self) -> &PlotKey {
        &self.key
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    pub fn thresholds(&self) -> &Arc<ThresholdSet> {
        self.combiner.thresholds()
    }

    /// Histogram stage, for engines that own partitioning and merging.
    pub fn combiner(&self) -> &HistogramCombiner {
        &self.combiner
    }

    /// Matrix stage.
    pub fn matrices(&self, histogram: &Histogram) -> Vec<ConfusionMatrixAtThreshold> {
        derive_matrices(histogram)
    }

    /// Plot stage.
    pub fn plot(&self, matrices: Vec<ConfusionMatrixAtThreshold>) -> ConfusionMatrixPlot {
        match self.kind {
            PlotKind::ScoreDistribution => derive_score_distribution(self.key.clone(), &matrices),
            PlotKind::ConfusionMatrix => derive_plot(self.key.clone(), matrices),
        }
    }

    /// Matrix and plot stages over a finished histogram.
    pub fn finish(&self, histogram: &Histogram) -> ConfusionMatrixPlot {
        self.plot(self.matrices(histogram))
    }

    /// Runs all three stages single-threaded over `examples`.
    pub fn compute<'a, I>(&self, examples: I) -> Result<ConfusionMatrixPlot, SdpError>
    where
        I: IntoIterator<Item = &'a LabeledPrediction>,
    {
        let histogram = combine_sequential(&self.combiner, examples)?;
        Ok(self.finish(&histogram))
    }

    /// Runs all three stages with a rayon fan-in over `chunk_size` chunks.
    #[cfg(feature = "rayon")]
    pub fn compute_parallel(
        &self,
        examples: &[LabeledPrediction],
        chunk_size: usize,
    ) -> Result<ConfusionMatrixPlot, SdpError> {
        let histogram = combine_parallel(&self.combiner, examples, chunk_size)?;
        Ok(self.finish(&histogram))
    }

    /// Plot of an empty stream: every matrix is zero.
    pub fn empty_plot(&self) -> ConfusionMatrixPlot {
        let accumulator = self.combiner.create_accumulator();
        self.finish(&self.combiner.extract_output(accumulator))
    }
}
