//! Algorithm Trace Engine
//!
//! Runs classical algorithms against small inputs and records every
//! intermediate state as a replayable [`Trace`] of [`Step`]s.
//!
//! # Families
//!
//! - **Sorts**: bubble, selection, insertion, merge, quick
//! - **Search**: linear, binary
//! - **Grid pathfinding**: BFS, DFS
//! - **Heap**: max-heap insertion with sift-up
//! - **Tabulated DP**: Fibonacci, 0/1 knapsack, LCS
//!
//! # Determinism
//!
//! Generators are pure: the same input always yields the same trace. Random
//! sample arrays come from [`input`] and are produced before a generator runs.
//!
//! # Usage
//!
//! ```
//! use algotrace_engine::sort::bubble_sort;
//!
//! let trace = bubble_sort(&[5, 3, 1]);
//! assert_eq!(trace.terminal().array, vec![1, 3, 5]);
//! ```

mod error;
mod registry;
mod step;

pub mod dp;
pub mod grid;
pub mod heap;
pub mod input;
pub mod search;
pub mod sort;

pub use error::{Result, TraceError};
pub use registry::{generate, generate_by_name, generate_or_fallback, AlgorithmId, AlgorithmInput, Family};
pub use step::{Auxiliary, DpAux, GraphAux, HeapAux, Recorder, Step, Trace};

pub use dp::Item;
pub use grid::{Cell, Grid};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_deterministic() {
        for id in AlgorithmId::ALL {
            let a = generate_by_name(id.as_str(), None);
            let b = generate_by_name(id.as_str(), None);
            assert_eq!(a, b, "{id}");
        }
    }

    #[test]
    fn every_trace_has_descriptions() {
        for id in AlgorithmId::ALL {
            let trace = generate_by_name(id.as_str(), None);
            assert!(trace.iter().all(|s| !s.description.is_empty()), "{id}");
        }
    }
}
