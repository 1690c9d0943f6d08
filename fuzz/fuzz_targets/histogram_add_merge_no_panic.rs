// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

#[path = "common.rs"]
mod common;

use libfuzzer_sys::fuzz_target;
use sdp_core::ThresholdSet;
use sdp_eval::derive_matrices;
use sdp_histogram::HistogramAccumulator;
use std::sync::Arc;

const MAX_OPS: usize = 256;

fn build_value(cursor: &mut common::ByteCursor<'_>) -> f64 {
    match cursor.next_u8() % 8 {
        0 => 0.0,
        1 => 1.0,
        2 => f64::from(cursor.next_u8()) / 255.0,
        3 => f64::from(cursor.next_i16()) / 64.0,
        4 => f64::NAN,
        5 => f64::INFINITY,
        6 => -f64::from(cursor.next_u8()),
        _ => cursor.next_f64(),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut cursor = common::ByteCursor::new(data);

    let num_thresholds = common::bounded(cursor.next_u8(), 0, 64);
    let Ok(thresholds) = ThresholdSet::evenly_spaced(num_thresholds) else {
        return;
    };
    let thresholds = Arc::new(thresholds);
    let mut partials = vec![HistogramAccumulator::new(Arc::clone(&thresholds))];

    for _ in 0..MAX_OPS {
        if cursor.is_exhausted() {
            break;
        }
        match cursor.next_u8() % 6 {
            0 => {
                partials.push(HistogramAccumulator::new(Arc::clone(&thresholds)));
            }
            1 => {
                if partials.len() > 1 {
                    if let Some(rhs) = partials.pop() {
                        let lhs_idx = usize::from(cursor.next_u8()) % partials.len();
                        let _ = partials[lhs_idx].merge(rhs);
                    }
                }
            }
            2 => {
                // Mismatched sets must be rejected, never misaligned.
                let foreign = HistogramAccumulator::with_num_thresholds(num_thresholds + 1);
                if let Ok(foreign) = foreign {
                    assert!(partials[0].clone().merge(foreign).is_err());
                }
            }
            3 => {
                let snapshot = partials[0].to_snapshot();
                let restored =
                    HistogramAccumulator::from_snapshot_with(Arc::clone(&thresholds), snapshot);
                if let Ok(restored) = restored {
                    assert_eq!(restored, partials[0]);
                }
            }
            _ => {
                let label = build_value(&mut cursor);
                let prediction = build_value(&mut cursor);
                let weight = build_value(&mut cursor);
                let target = usize::from(cursor.next_u8()) % partials.len();
                let _ = partials[target].add_raw(label, prediction, weight);
            }
        }
    }

    let root = partials
        .into_iter()
        .try_fold(HistogramAccumulator::new(Arc::clone(&thresholds)), |acc, part| {
            acc.merged(part)
        });
    if let Ok(root) = root {
        let matrices = derive_matrices(&root.finalize());
        assert_eq!(matrices.len(), thresholds.len());
        for pair in matrices.windows(2) {
            assert!(pair[1].true_positives <= pair[0].true_positives);
            assert!(pair[1].true_negatives >= pair[0].true_negatives);
        }
    }
});
