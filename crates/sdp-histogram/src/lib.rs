// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod accumulator;
pub mod bucket;
pub mod combine;
pub mod snapshot;

pub use accumulator::{Histogram, HistogramAccumulator};
pub use bucket::Bucket;
#[cfg(feature = "rayon")]
pub use combine::combine_parallel;
pub use combine::{Combiner, HistogramCombiner, combine_partitions, combine_sequential, merge_tree};
pub use snapshot::{
    CURRENT_SNAPSHOT_SCHEMA_VERSION, HistogramSnapshot, MIN_SUPPORTED_SNAPSHOT_SCHEMA_VERSION,
};

/// Histogram accumulation namespace.
pub fn crate_name() -> &'static str {
    let _ = sdp_core::crate_name();
    "sdp-histogram"
}
