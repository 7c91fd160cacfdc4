//! Error taxonomy for aggregation and roster validation.

use thiserror::Error;

/// Errors raised by the aggregation functions and roster validation.
///
/// All of these are local, synchronous failures. None are expected with
/// well-formed data from the class API, so callers treat them as contract
/// violations rather than retryable conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// An averaging function was handed an empty strand catalog.
    /// Guarded explicitly so no average ever divides by zero.
    #[error("strand catalog is empty; averages over zero strands are undefined")]
    EmptyStrandCatalog,

    /// A progress value outside 0..=100 was found at ingestion.
    ///
    /// Contract: out-of-range progress is rejected, not clamped. A value
    /// like 130 is bad data from the source, and clamping it would bake a
    /// wrong number into every average downstream.
    #[error(
        "progress {progress} for student {student_id} strand {strand_key} is outside 0..=100"
    )]
    ProgressOutOfRange {
        student_id: String,
        strand_key: String,
        progress: u8,
    },

    /// Two students in one fetched roster share an id. Lookups by id
    /// would silently pick one of them, so ingestion refuses the roster.
    #[error("duplicate student id in roster: {0}")]
    DuplicateStudentId(String),
}
