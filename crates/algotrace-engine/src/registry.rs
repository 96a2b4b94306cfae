//! Algorithm selection.
//!
//! Maps algorithm ids to generators and demo inputs. Ids without a generator
//! (the tree family) resolve to a single "visualization not implemented"
//! step instead of an error, so a view always has something to render.

use std::fmt;
use std::str::FromStr;

use crate::dp::{self, Item};
use crate::error::{Result, TraceError};
use crate::grid::{self, Grid};
use crate::input;
use crate::step::Trace;
use crate::{heap, search, sort};

/// Algorithm family; decides the input kind and auxiliary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Family {
    Sort,
    Search,
    Graph,
    Heap,
    Dp,
    Tree,
}

/// Every selectable algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AlgorithmId {
    BubbleSort,
    SelectionSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    LinearSearch,
    BinarySearch,
    Bfs,
    Dfs,
    MaxHeap,
    Fibonacci,
    Knapsack,
    Lcs,
    Bst,
    AvlTree,
    Trie,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 16] = [
        AlgorithmId::BubbleSort,
        AlgorithmId::SelectionSort,
        AlgorithmId::InsertionSort,
        AlgorithmId::MergeSort,
        AlgorithmId::QuickSort,
        AlgorithmId::LinearSearch,
        AlgorithmId::BinarySearch,
        AlgorithmId::Bfs,
        AlgorithmId::Dfs,
        AlgorithmId::MaxHeap,
        AlgorithmId::Fibonacci,
        AlgorithmId::Knapsack,
        AlgorithmId::Lcs,
        AlgorithmId::Bst,
        AlgorithmId::AvlTree,
        AlgorithmId::Trie,
    ];

    /// Kebab-case id used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmId::BubbleSort => "bubble-sort",
            AlgorithmId::SelectionSort => "selection-sort",
            AlgorithmId::InsertionSort => "insertion-sort",
            AlgorithmId::MergeSort => "merge-sort",
            AlgorithmId::QuickSort => "quick-sort",
            AlgorithmId::LinearSearch => "linear-search",
            AlgorithmId::BinarySearch => "binary-search",
            AlgorithmId::Bfs => "bfs",
            AlgorithmId::Dfs => "dfs",
            AlgorithmId::MaxHeap => "max-heap",
            AlgorithmId::Fibonacci => "fibonacci",
            AlgorithmId::Knapsack => "knapsack",
            AlgorithmId::Lcs => "lcs",
            AlgorithmId::Bst => "bst",
            AlgorithmId::AvlTree => "avl-tree",
            AlgorithmId::Trie => "trie",
        }
    }

    pub fn family(self) -> Family {
        match self {
            AlgorithmId::BubbleSort
            | AlgorithmId::SelectionSort
            | AlgorithmId::InsertionSort
            | AlgorithmId::MergeSort
            | AlgorithmId::QuickSort => Family::Sort,
            AlgorithmId::LinearSearch | AlgorithmId::BinarySearch => Family::Search,
            AlgorithmId::Bfs | AlgorithmId::Dfs => Family::Graph,
            AlgorithmId::MaxHeap => Family::Heap,
            AlgorithmId::Fibonacci | AlgorithmId::Knapsack | AlgorithmId::Lcs => Family::Dp,
            AlgorithmId::Bst | AlgorithmId::AvlTree | AlgorithmId::Trie => Family::Tree,
        }
    }

    /// Whether a generator exists for this id.
    pub fn is_implemented(self) -> bool {
        self.family() != Family::Tree
    }

    /// Demo input, or `None` for ids without a generator.
    pub fn default_input(self) -> Option<AlgorithmInput> {
        let input = match self.family() {
            Family::Sort => AlgorithmInput::Array {
                values: input::SAMPLE_ARRAY.to_vec(),
            },
            Family::Search => AlgorithmInput::Search {
                values: input::SAMPLE_SORTED.to_vec(),
                target: input::SAMPLE_TARGET,
            },
            Family::Graph => AlgorithmInput::Grid {
                grid: input::sample_grid().ok()?,
            },
            Family::Heap => AlgorithmInput::Array {
                values: input::SAMPLE_HEAP.to_vec(),
            },
            Family::Dp => match self {
                AlgorithmId::Fibonacci => AlgorithmInput::Fibonacci {
                    n: input::SAMPLE_FIBONACCI,
                },
                AlgorithmId::Knapsack => AlgorithmInput::Knapsack {
                    items: input::SAMPLE_ITEMS.to_vec(),
                    capacity: input::SAMPLE_CAPACITY,
                },
                _ => AlgorithmInput::Lcs {
                    a: input::SAMPLE_LCS.0.to_string(),
                    b: input::SAMPLE_LCS.1.to_string(),
                },
            },
            Family::Tree => return None,
        };
        Some(input)
    }

    /// Seeded random input for the array-based families.
    ///
    /// Search ids get a sorted array and a target drawn from it.
    pub fn random_input(self, len: usize, seed: u64) -> Result<AlgorithmInput> {
        match self.family() {
            Family::Sort | Family::Heap => Ok(AlgorithmInput::Array {
                values: input::random_array(len, seed)?,
            }),
            Family::Search => {
                let values = input::random_sorted_array(len, seed)?;
                let target = if values.is_empty() {
                    0
                } else {
                    values[(seed % values.len() as u64) as usize]
                };
                Ok(AlgorithmInput::Search { values, target })
            }
            _ => Err(TraceError::InputMismatch {
                algorithm: self.as_str(),
                expected: expected_kind(self),
                actual: "random array",
            }),
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        AlgorithmId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| TraceError::UnknownAlgorithm(s.to_string()))
    }
}

/// Algorithm-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AlgorithmInput {
    /// Array to sort, or values to insert into a heap.
    Array { values: Vec<i64> },
    Search { values: Vec<i64>, target: i64 },
    Grid { grid: Grid },
    Fibonacci { n: usize },
    Knapsack { items: Vec<Item>, capacity: i64 },
    Lcs { a: String, b: String },
}

impl AlgorithmInput {
    pub fn kind(&self) -> &'static str {
        match self {
            AlgorithmInput::Array { .. } => "array",
            AlgorithmInput::Search { .. } => "search",
            AlgorithmInput::Grid { .. } => "grid",
            AlgorithmInput::Fibonacci { .. } => "fibonacci",
            AlgorithmInput::Knapsack { .. } => "knapsack",
            AlgorithmInput::Lcs { .. } => "lcs",
        }
    }
}

fn expected_kind(id: AlgorithmId) -> &'static str {
    match id {
        AlgorithmId::LinearSearch | AlgorithmId::BinarySearch => "search",
        AlgorithmId::Bfs | AlgorithmId::Dfs => "grid",
        AlgorithmId::Fibonacci => "fibonacci",
        AlgorithmId::Knapsack => "knapsack",
        AlgorithmId::Lcs => "lcs",
        _ => "array",
    }
}

/// Reject arrays and grids too large to record step by step.
///
/// DP inputs are bounded by the table size inside each generator.
fn check_size(input: &AlgorithmInput) -> Result<()> {
    let (requested, limit) = match input {
        AlgorithmInput::Array { values } | AlgorithmInput::Search { values, .. } => {
            (values.len(), input::MAX_INPUT_LEN)
        }
        AlgorithmInput::Grid { grid } => (grid.len(), input::MAX_GRID_CELLS),
        _ => return Ok(()),
    };
    if requested > limit {
        return Err(TraceError::SampleTooLarge { requested, limit });
    }
    Ok(())
}

/// Run the generator for `id`.
///
/// Ids without a generator succeed with the "not implemented" trace. Input
/// that does not suit the algorithm is rejected before any step is recorded.
pub fn generate(id: AlgorithmId, input: &AlgorithmInput) -> Result<Trace> {
    if !id.is_implemented() {
        return Ok(Trace::not_implemented(id.as_str()));
    }
    check_size(input)?;

    let trace = match (id, input) {
        (AlgorithmId::BubbleSort, AlgorithmInput::Array { values }) => sort::bubble_sort(values),
        (AlgorithmId::SelectionSort, AlgorithmInput::Array { values }) => {
            sort::selection_sort(values)
        }
        (AlgorithmId::InsertionSort, AlgorithmInput::Array { values }) => {
            sort::insertion_sort(values)
        }
        (AlgorithmId::MergeSort, AlgorithmInput::Array { values }) => sort::merge_sort(values),
        (AlgorithmId::QuickSort, AlgorithmInput::Array { values }) => sort::quick_sort(values),
        (AlgorithmId::MaxHeap, AlgorithmInput::Array { values }) => heap::max_heap_insert(values),
        (AlgorithmId::LinearSearch, AlgorithmInput::Search { values, target }) => {
            search::linear_search(values, *target)
        }
        (AlgorithmId::BinarySearch, AlgorithmInput::Search { values, target }) => {
            if let Some(i) = (1..values.len()).find(|&i| values[i] < values[i - 1]) {
                return Err(TraceError::Unsorted(i));
            }
            search::binary_search(values, *target)
        }
        (AlgorithmId::Bfs, AlgorithmInput::Grid { grid }) => grid::bfs(grid),
        (AlgorithmId::Dfs, AlgorithmInput::Grid { grid }) => grid::dfs(grid),
        (AlgorithmId::Fibonacci, AlgorithmInput::Fibonacci { n }) => dp::fibonacci(*n)?,
        (AlgorithmId::Knapsack, AlgorithmInput::Knapsack { items, capacity }) => {
            dp::knapsack(items, *capacity)?
        }
        (AlgorithmId::Lcs, AlgorithmInput::Lcs { a, b }) => dp::lcs(a, b)?,
        (id, input) => {
            return Err(TraceError::InputMismatch {
                algorithm: id.as_str(),
                expected: expected_kind(id),
                actual: input.kind(),
            })
        }
    };

    tracing::debug!(algorithm = %id, steps = trace.len(), "trace generated");
    Ok(trace)
}

/// Like [`generate`], substituting a single-step fallback trace on failure.
pub fn generate_or_fallback(id: AlgorithmId, input: &AlgorithmInput) -> Trace {
    generate(id, input).unwrap_or_else(|err| {
        tracing::warn!(algorithm = %id, error = %err, "generation rejected input");
        Trace::rejected(id.as_str(), &err)
    })
}

/// Resolve an id string and generate, using the demo input when none is given.
///
/// Never fails: unknown ids yield the "not implemented" trace.
pub fn generate_by_name(name: &str, input: Option<&AlgorithmInput>) -> Trace {
    let id = match name.parse::<AlgorithmId>() {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(algorithm = name, "no generator for algorithm");
            return Trace::not_implemented(name);
        }
    };

    match input {
        Some(input) => generate_or_fallback(id, input),
        None => match id.default_input() {
            Some(input) => generate_or_fallback(id, &input),
            None => Trace::not_implemented(id.as_str()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        for id in AlgorithmId::ALL {
            assert_eq!(id.as_str().parse::<AlgorithmId>().unwrap(), id);
            assert_eq!(id.to_string(), id.as_str());
        }
        assert_eq!(
            "bogo-sort".parse::<AlgorithmId>(),
            Err(TraceError::UnknownAlgorithm("bogo-sort".into()))
        );
    }

    #[test]
    fn every_implemented_id_runs_on_its_default() {
        for id in AlgorithmId::ALL.into_iter().filter(|id| id.is_implemented()) {
            let input = id.default_input().unwrap();
            let trace = generate(id, &input).unwrap();
            assert!(trace.len() > 1, "{id} produced only {} steps", trace.len());
            assert!(trace.iter().all(|s| s.indices_in_bounds()), "{id}");
        }
    }

    #[test]
    fn tree_ids_fall_back() {
        for id in [AlgorithmId::Bst, AlgorithmId::AvlTree, AlgorithmId::Trie] {
            assert!(id.default_input().is_none());
            let trace = generate_by_name(id.as_str(), None);
            assert_eq!(trace.len(), 1);
            assert!(trace.terminal().description.contains("visualization not implemented"));
        }
    }

    #[test]
    fn unknown_name_falls_back() {
        let trace = generate_by_name("red-black-tree", None);
        assert_eq!(trace.len(), 1);
        assert!(trace.terminal().description.contains("visualization not implemented"));
    }

    #[test]
    fn mismatched_input_is_rejected() {
        let err = generate(AlgorithmId::Bfs, &AlgorithmInput::Array { values: vec![1] }).unwrap_err();
        assert_eq!(
            err,
            TraceError::InputMismatch {
                algorithm: "bfs",
                expected: "grid",
                actual: "array",
            }
        );

        let trace = generate_or_fallback(AlgorithmId::Bfs, &AlgorithmInput::Array { values: vec![1] });
        assert_eq!(trace.len(), 1);
        assert!(trace.terminal().description.contains("cannot visualize"));
    }

    #[test]
    fn binary_search_requires_sorted_input() {
        let input = AlgorithmInput::Search {
            values: vec![1, 5, 3],
            target: 3,
        };
        assert_eq!(generate(AlgorithmId::BinarySearch, &input), Err(TraceError::Unsorted(2)));
        assert!(generate(AlgorithmId::LinearSearch, &input).is_ok());
    }

    #[test]
    fn oversized_input_is_rejected() {
        let values = vec![1; input::MAX_INPUT_LEN + 1];
        let err = generate(AlgorithmId::BubbleSort, &AlgorithmInput::Array { values: values.clone() })
            .unwrap_err();
        assert_eq!(
            err,
            TraceError::SampleTooLarge {
                requested: input::MAX_INPUT_LEN + 1,
                limit: input::MAX_INPUT_LEN,
            }
        );
        let search = AlgorithmInput::Search { values, target: 1 };
        assert!(matches!(
            generate(AlgorithmId::LinearSearch, &search),
            Err(TraceError::SampleTooLarge { .. })
        ));

        let at_limit = AlgorithmInput::Array { values: vec![1; input::MAX_INPUT_LEN] };
        assert!(generate(AlgorithmId::QuickSort, &at_limit).is_ok());
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let mut rows = vec![vec![0u8; 40]; 40];
        rows[0][0] = 2;
        rows[39][39] = 3;
        let grid = Grid::from_rows(&rows).unwrap();
        let err = generate(AlgorithmId::Bfs, &AlgorithmInput::Grid { grid }).unwrap_err();
        assert_eq!(
            err,
            TraceError::SampleTooLarge {
                requested: 1_600,
                limit: input::MAX_GRID_CELLS,
            }
        );
    }

    #[test]
    fn random_input_targets_present_value() {
        let input = AlgorithmId::BinarySearch.random_input(16, 5).unwrap();
        let AlgorithmInput::Search { values, target } = &input else {
            panic!("expected search input, got {input:?}");
        };
        assert!(values.contains(target));
        assert!(generate(AlgorithmId::BinarySearch, &input)
            .unwrap()
            .terminal()
            .description
            .contains("Found"));
    }

    #[test]
    fn random_input_only_for_arrays() {
        assert!(AlgorithmId::QuickSort.random_input(8, 1).is_ok());
        assert!(AlgorithmId::MaxHeap.random_input(8, 1).is_ok());
        assert!(matches!(
            AlgorithmId::Knapsack.random_input(8, 1),
            Err(TraceError::InputMismatch { .. })
        ));
    }

    #[test]
    fn families() {
        assert_eq!(AlgorithmId::QuickSort.family(), Family::Sort);
        assert_eq!(AlgorithmId::Dfs.family(), Family::Graph);
        assert_eq!(AlgorithmId::Lcs.family(), Family::Dp);
        assert!(!AlgorithmId::Trie.is_implemented());
    }
}
