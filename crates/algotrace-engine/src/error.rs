//! Error types for algotrace-engine.

use thiserror::Error;

/// Result type for trace generation.
pub type Result<T> = std::result::Result<T, TraceError>;

/// Input rejected before any step was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// Grid rows have different lengths.
    #[error("ragged grid: row {row} has {len} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// A grid cell holds a code other than 0-3.
    #[error("unknown cell code {code} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, code: u8 },

    /// The grid has no start cell, or more than one.
    #[error("grid must contain exactly one start cell, found {0}")]
    StartCount(usize),

    /// The grid has no end cell, or more than one.
    #[error("grid must contain exactly one end cell, found {0}")]
    EndCount(usize),

    /// Knapsack weights and values differ in length.
    #[error("knapsack has {weights} weights but {values} values")]
    ItemMismatch { weights: usize, values: usize },

    /// Negative knapsack weight or capacity.
    #[error("negative {0} in knapsack input")]
    Negative(&'static str),

    /// Knapsack values whose best total does not fit in an i64.
    #[error("knapsack values overflow i64")]
    ValueOverflow,

    /// Fibonacci index whose value does not fit in an i64.
    #[error("fibonacci index {0} overflows (max {max})", max = crate::dp::MAX_FIBONACCI)]
    FibonacciOverflow(usize),

    /// Input kind does not match what the algorithm consumes.
    #[error("{algorithm} expects {expected} input, got {actual}")]
    InputMismatch {
        algorithm: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Binary search needs ascending input.
    #[error("binary search input is not sorted (index {0} is smaller than its predecessor)")]
    Unsorted(usize),

    /// No algorithm with this id.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A trace must hold at least one step.
    #[error("trace has no steps")]
    EmptyTrace,

    /// Requested sample larger than the visualizer supports.
    #[error("sample size {requested} exceeds limit {limit}")]
    SampleTooLarge { requested: usize, limit: usize },
}
