//! Blog statistics.
//!
//! Pure aggregation over slices of posts. Nothing in here logs or does I/O.

pub mod aggregator;

pub use aggregator::*;
