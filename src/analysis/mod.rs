//! Analysis modules.
//!
//! Pure aggregation over a fetched roster snapshot; all I/O lives in
//! the API client.

pub mod aggregator;

pub use aggregator::*;
