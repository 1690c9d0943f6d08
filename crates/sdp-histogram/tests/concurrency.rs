// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use sdp_core::{LabeledPrediction, ThresholdSet};
use sdp_histogram::{HistogramAccumulator, HistogramSnapshot};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

const WORKERS: usize = 6;
const EXAMPLES_PER_WORKER: usize = 2_000;

fn lcg_next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

fn generate_examples(seed: u64, count: usize) -> Vec<LabeledPrediction> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            let label = (lcg_next(&mut state) % 2) as f64;
            let prediction = (lcg_next(&mut state) % 1_001) as f64 / 1_000.0;
            let weight = (lcg_next(&mut state) % 4) as f64;
            LabeledPrediction::new(label, prediction, weight)
                .expect("generated example should be valid")
        })
        .collect()
}

#[test]
fn worker_partitions_merge_to_sequential_result() {
    let thresholds = Arc::new(ThresholdSet::evenly_spaced(100).expect("valid"));
    let partitions: Vec<Vec<LabeledPrediction>> = (0..WORKERS)
        .map(|worker| generate_examples(0xfeed_f00d + worker as u64, EXAMPLES_PER_WORKER))
        .collect();

    let mut handles = Vec::with_capacity(WORKERS);
    for partition in partitions.iter().cloned() {
        let thresholds = Arc::clone(&thresholds);
        handles.push(thread::spawn(move || {
            let mut acc = HistogramAccumulator::new(thresholds);
            acc.extend(&partition).expect("worker adds should succeed");
            acc
        }));
    }

    let mut merged = HistogramAccumulator::new(Arc::clone(&thresholds));
    for handle in handles.into_iter().rev() {
        let partial = handle.join().expect("worker should join cleanly");
        merged.merge(partial).expect("partial merge should succeed");
    }

    let mut sequential = HistogramAccumulator::new(thresholds);
    for partition in &partitions {
        sequential.extend(partition).expect("sequential adds");
    }

    assert_eq!(merged, sequential);
    assert_eq!(merged.example_count(), (WORKERS * EXAMPLES_PER_WORKER) as u64);
}

#[test]
fn snapshots_shipped_over_channels_merge_in_arrival_order() {
    let thresholds = Arc::new(ThresholdSet::evenly_spaced(40).expect("valid"));
    let (tx, rx) = mpsc::channel::<HistogramSnapshot>();

    let mut handles = Vec::with_capacity(WORKERS);
    for worker in 0..WORKERS {
        let tx = tx.clone();
        let thresholds = Arc::clone(&thresholds);
        handles.push(thread::spawn(move || {
            let examples = generate_examples(17 * worker as u64 + 3, EXAMPLES_PER_WORKER);
            let mut acc = HistogramAccumulator::new(thresholds);
            acc.extend(&examples).expect("worker adds should succeed");
            tx.send(acc.to_snapshot()).expect("coordinator should be listening");
        }));
    }
    drop(tx);

    let mut merged = HistogramAccumulator::new(Arc::clone(&thresholds));
    for snapshot in rx {
        let partial = HistogramAccumulator::from_snapshot_with(Arc::clone(&thresholds), snapshot)
            .expect("snapshot should restore");
        merged.merge(partial).expect("merge should succeed");
    }
    for handle in handles {
        handle.join().expect("worker should join cleanly");
    }

    let mut sequential = HistogramAccumulator::new(thresholds);
    for worker in 0..WORKERS {
        let examples = generate_examples(17 * worker as u64 + 3, EXAMPLES_PER_WORKER);
        sequential.extend(&examples).expect("sequential adds");
    }
    assert_eq!(merged, sequential);
}
