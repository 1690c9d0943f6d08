// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use sdp_core::LabeledPrediction;
use sdp_eval::{ConfusionMatrixAtThreshold, PlotComputation, PlotKey, SCORE_DISTRIBUTION_PLOT_NAME};
use sdp_histogram::{Combiner, combine_partitions};
use std::collections::BTreeMap;

fn reference_examples() -> Vec<LabeledPrediction> {
    [0.0, 0.5, 0.3, 0.9]
        .into_iter()
        .map(|prediction| {
            LabeledPrediction::new(0.0, prediction, 1.0).expect("reference example is valid")
        })
        .collect()
}

fn expected_reference_matrices() -> Vec<ConfusionMatrixAtThreshold> {
    [
        (-1e-6, 4.0, 0.0),
        (0.0, 3.0, 1.0),
        (0.25, 3.0, 1.0),
        (0.5, 1.0, 3.0),
        (0.75, 1.0, 3.0),
        (1.0, 0.0, 4.0),
    ]
    .into_iter()
    .map(|(threshold, true_positives, true_negatives)| ConfusionMatrixAtThreshold {
        threshold,
        true_positives,
        true_negatives,
        ..ConfusionMatrixAtThreshold::default()
    })
    .collect()
}

#[test]
fn score_distribution_matches_reference_trace() {
    let computation = PlotComputation::score_distribution(4).expect("valid config");
    let plot = computation
        .compute(&reference_examples())
        .expect("reference examples should compute");

    assert_eq!(plot.key, PlotKey::new(SCORE_DISTRIBUTION_PLOT_NAME));
    assert_eq!(plot.matrices, expected_reference_matrices());
}

#[test]
fn reference_trace_is_stage_by_stage_reproducible() {
    let computation = PlotComputation::score_distribution(4).expect("valid config");
    let combiner = computation.combiner();
    let examples = reference_examples();

    let mut accumulator = combiner.create_accumulator();
    for example in &examples {
        combiner
            .add_input(&mut accumulator, example)
            .expect("add should succeed");
    }
    let histogram = combiner.extract_output(accumulator);
    let matrices = computation.matrices(&histogram);

    // Every label is negative, so the label-aware matrices put all weight in
    // the negative-label cells.
    for matrix in &matrices {
        assert_eq!(matrix.true_positives, 0.0);
        assert_eq!(matrix.false_negatives, 0.0);
        assert_eq!(matrix.false_positives + matrix.true_negatives, 4.0);
    }

    let plot = computation.plot(matrices);
    assert_eq!(plot.matrices, expected_reference_matrices());
}

#[test]
fn per_slice_partitions_produce_identical_plots() {
    let computation = PlotComputation::score_distribution(4).expect("valid config");
    let examples = reference_examples();

    let mut slices: BTreeMap<&str, Vec<LabeledPrediction>> = BTreeMap::new();
    slices.insert("all", examples.clone());
    slices.insert("repeated", [examples.clone(), examples.clone()].concat());

    let mut plots = BTreeMap::new();
    for (slice, slice_examples) in &slices {
        let partitions: Vec<&[LabeledPrediction]> = slice_examples.chunks(1).collect();
        let histogram =
            combine_partitions(computation.combiner(), &partitions).expect("slice combine");
        plots.insert(*slice, computation.finish(&histogram));
    }

    assert_eq!(plots["all"].matrices, expected_reference_matrices());
    for (single, doubled) in plots["all"].matrices.iter().zip(&plots["repeated"].matrices) {
        assert_eq!(doubled.threshold, single.threshold);
        assert_eq!(doubled.true_positives, 2.0 * single.true_positives);
        assert_eq!(doubled.true_negatives, 2.0 * single.true_negatives);
    }
}

#[cfg(feature = "serde")]
#[test]
fn reference_plot_serializes_sparsely() {
    let computation = PlotComputation::score_distribution(4).expect("valid config");
    let plot = computation
        .compute(&reference_examples())
        .expect("reference examples should compute");
    let encoded = serde_json::to_value(&plot).expect("plot should serialize");

    let matrices = encoded["matrices"]
        .as_array()
        .expect("matrices should encode as an array");
    assert_eq!(matrices.len(), 6);
    // threshold 0.0 and every zero count are omitted.
    assert_eq!(
        matrices[1],
        serde_json::json!({"true_positives": 3.0, "true_negatives": 1.0})
    );
    assert_eq!(
        matrices[5],
        serde_json::json!({"threshold": 1.0, "true_negatives": 4.0})
    );
}
