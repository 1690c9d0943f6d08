// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use sdp_core::LabeledPrediction;

fn lcg_next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

/// Deterministic pseudo-random example stream for benchmarks.
///
/// Predictions cover `[0, 1]` on a 1e-4 grid, labels are balanced, and
/// weights cycle through `0..4`.
pub fn generate_examples(count: usize, seed: u64) -> Vec<LabeledPrediction> {
    let mut state = seed;
    let mut examples = Vec::with_capacity(count);
    for _ in 0..count {
        let label = (lcg_next(&mut state) & 1) as f64;
        let prediction = (lcg_next(&mut state) % 10_001) as f64 / 10_000.0;
        let weight = (lcg_next(&mut state) % 4) as f64;
        if let Ok(example) = LabeledPrediction::new(label, prediction, weight) {
            examples.push(example);
        }
    }
    examples
}

#[cfg(test)]
mod tests {
    use super::generate_examples;

    #[test]
    fn generator_is_deterministic_and_valid() {
        let first = generate_examples(256, 7);
        let second = generate_examples(256, 7);
        assert_eq!(first, second);
        assert_eq!(first.len(), 256);
        assert!(first.iter().all(|example| (0.0..=1.0).contains(&example.prediction())));
    }
}
