// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::accumulator::{Histogram, HistogramAccumulator};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use sdp_core::{LabeledPrediction, SdpError, ThresholdSet};
use std::sync::Arc;

/// Combine-function contract invoked by an execution engine.
///
/// Engines create one accumulator per partition, add inputs into it, merge
/// accumulators pairwise in any order or tree shape, and extract the output
/// from the last one. `merge_accumulators` must be associative and
/// commutative with `create_accumulator` as its identity.
pub trait Combiner {
    type Input;
    type Accumulator;
    type Output;

    fn create_accumulator(&self) -> Self::Accumulator;

    fn add_input(
        &self,
        accumulator: &mut Self::Accumulator,
        input: &Self::Input,
    ) -> Result<(), SdpError>;

    fn merge_accumulators(
        &self,
        lhs: Self::Accumulator,
        rhs: Self::Accumulator,
    ) -> Result<Self::Accumulator, SdpError>;

    fn extract_output(&self, accumulator: Self::Accumulator) -> Self::Output;
}

/// Builds [`Histogram`]s over one shared threshold set.
#[derive(Clone, Debug)]
pub struct HistogramCombiner {
    thresholds: Arc<ThresholdSet>,
}

impl HistogramCombiner {
    pub fn new(thresholds: Arc<ThresholdSet>) -> Self {
        Self { thresholds }
    }

    pub fn with_num_thresholds(num_thresholds: usize) -> Result<Self, SdpError> {
        Ok(Self::new(Arc::new(ThresholdSet::evenly_spaced(
            num_thresholds,
        )?)))
    }

    pub fn thresholds(&self) -> &Arc<ThresholdSet> {
        &self.thresholds
    }
}

impl Combiner for HistogramCombiner {
    type Input = LabeledPrediction;
    type Accumulator = HistogramAccumulator;
    type Output = Histogram;

    fn create_accumulator(&self) -> HistogramAccumulator {
        HistogramAccumulator::new(Arc::clone(&self.thresholds))
    }

    fn add_input(
        &self,
        accumulator: &mut HistogramAccumulator,
        input: &LabeledPrediction,
    ) -> Result<(), SdpError> {
        accumulator.add(input)
    }

    fn merge_accumulators(
        &self,
        lhs: HistogramAccumulator,
        rhs: HistogramAccumulator,
    ) -> Result<HistogramAccumulator, SdpError> {
        lhs.merged(rhs)
    }

    fn extract_output(&self, accumulator: HistogramAccumulator) -> Histogram {
        accumulator.finalize()
    }
}

/// Single-threaded left fold of every input into one accumulator.
pub fn combine_sequential<'a, C, I>(combiner: &C, inputs: I) -> Result<C::Output, SdpError>
where
    C: Combiner,
    C::Input: 'a,
    I: IntoIterator<Item = &'a C::Input>,
{
    let mut accumulator = combiner.create_accumulator();
    for input in inputs {
        combiner.add_input(&mut accumulator, input)?;
    }
    Ok(combiner.extract_output(accumulator))
}

/// Merges accumulators as a balanced binary tree.
///
/// An empty list yields the identity accumulator.
pub fn merge_tree<C: Combiner>(
    combiner: &C,
    accumulators: Vec<C::Accumulator>,
) -> Result<C::Accumulator, SdpError> {
    let mut level = accumulators;
    if level.is_empty() {
        return Ok(combiner.create_accumulator());
    }

    let mut depth = 0usize;
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut drained = level.into_iter();
        while let Some(lhs) = drained.next() {
            match drained.next() {
                Some(rhs) => next.push(combiner.merge_accumulators(lhs, rhs)?),
                None => next.push(lhs),
            }
        }
        level = next;
        depth += 1;
    }

    tracing::debug!(depth, "combine tree merged");
    match level.pop() {
        Some(root) => Ok(root),
        None => Ok(combiner.create_accumulator()),
    }
}

/// Accumulates each partition separately, then merges them as a tree.
pub fn combine_partitions<C, P>(combiner: &C, partitions: &[P]) -> Result<C::Output, SdpError>
where
    C: Combiner,
    P: AsRef<[C::Input]>,
{
    let mut accumulators = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let mut accumulator = combiner.create_accumulator();
        for input in partition.as_ref() {
            combiner.add_input(&mut accumulator, input)?;
        }
        accumulators.push(accumulator);
    }
    tracing::debug!(partitions = partitions.len(), "partitions accumulated");
    let root = merge_tree(combiner, accumulators)?;
    Ok(combiner.extract_output(root))
}

/// Data-parallel fan-in: rayon folds `chunk_size`-sized chunks into their own
/// accumulators and reduces them pairwise.
#[cfg(feature = "rayon")]
pub fn combine_parallel<C>(
    combiner: &C,
    inputs: &[C::Input],
    chunk_size: usize,
) -> Result<C::Output, SdpError>
where
    C: Combiner + Sync,
    C::Input: Sync,
    C::Accumulator: Send,
{
    if chunk_size == 0 {
        return Err(SdpError::invalid_input("chunk_size must be > 0; got 0"));
    }

    let root = inputs
        .par_chunks(chunk_size)
        .map(|chunk| -> Result<C::Accumulator, SdpError> {
            let mut accumulator = combiner.create_accumulator();
            for input in chunk {
                combiner.add_input(&mut accumulator, input)?;
            }
            Ok(accumulator)
        })
        .try_reduce(
            || combiner.create_accumulator(),
            |lhs, rhs| combiner.merge_accumulators(lhs, rhs),
        )?;

    tracing::debug!(
        inputs = inputs.len(),
        chunk_size,
        threads = rayon::current_num_threads(),
        "parallel combine finished"
    );
    Ok(combiner.extract_output(root))
}
