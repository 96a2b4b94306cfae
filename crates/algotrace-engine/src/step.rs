//! Recorded algorithm state.
//!
//! A [`Step`] is one immutable snapshot; a [`Trace`] is the non-empty ordered
//! sequence of steps produced by one generator run. Generators build traces
//! through a [`Recorder`], an explicit accumulator threaded through recursive
//! calls as `&mut`.

use std::collections::BTreeSet;

use crate::error::TraceError;

/// Family-specific side state attached to a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Auxiliary {
    /// Sorts and searches carry everything in `array`.
    #[default]
    None,
    /// Heap construction.
    Heap(HeapAux),
    /// Tabulated dynamic programming.
    Dp(DpAux),
    /// Grid pathfinding.
    Graph(GraphAux),
}

/// Heap state: `Step::array` is the heap itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeapAux {
    /// Values still waiting to be inserted, in insertion order.
    pub pending: Vec<i64>,
}

/// DP table in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DpAux {
    pub rows: usize,
    pub cols: usize,
    /// `None` marks a cell not yet computed.
    pub cells: Vec<Option<i64>>,
}

impl DpAux {
    /// Flat index of `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

/// Pathfinding state over a flattened grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphAux {
    pub rows: usize,
    pub cols: usize,
    /// Cells in the order they were visited. Only grows within a trace.
    pub visited: Vec<usize>,
    /// Cells queued (BFS) or stacked (DFS) but not yet visited.
    pub frontier: Vec<usize>,
    /// Start-to-end path; empty until the terminal step of a successful search.
    pub path: Vec<usize>,
}

/// One recorded snapshot of algorithm state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Primary linear state.
    pub array: Vec<i64>,
    /// Positions touched this step, without duplicates.
    ///
    /// DP steps put the written cell first, followed by the cells it reads.
    pub active: Vec<usize>,
    /// Positions in final position, or otherwise resolved.
    pub sorted: BTreeSet<usize>,
    /// Human-readable account of the step. Never empty.
    pub description: String,
    pub aux: Auxiliary,
}

impl Step {
    /// Exclusive upper bound for `active` and `sorted` entries.
    ///
    /// DP steps index into the table; everything else indexes `array`.
    pub fn index_bound(&self) -> usize {
        match &self.aux {
            Auxiliary::Dp(dp) => dp.cells.len(),
            _ => self.array.len(),
        }
    }

    /// True when every highlighted index points inside the step.
    pub fn indices_in_bounds(&self) -> bool {
        let bound = self.index_bound();
        self.active.iter().chain(self.sorted.iter()).all(|&i| i < bound)
    }
}

/// A non-empty, immutable sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Step>", into = "Vec<Step>"))]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    /// A trace with exactly one step.
    pub fn single(step: Step) -> Self {
        Self { steps: vec![step] }
    }

    /// Terminal-only trace for an input with nothing to process.
    pub fn nothing_to_do(array: Vec<i64>, what: &str) -> Self {
        Self::single(Step {
            array,
            active: Vec::new(),
            sorted: BTreeSet::new(),
            description: format!("Nothing to do: {what} is empty"),
            aux: Auxiliary::None,
        })
    }

    /// Fallback for an algorithm with no generator.
    pub fn not_implemented(algorithm: &str) -> Self {
        Self::single(Step {
            array: Vec::new(),
            active: Vec::new(),
            sorted: BTreeSet::new(),
            description: format!("{algorithm}: visualization not implemented"),
            aux: Auxiliary::None,
        })
    }

    /// Fallback for a generation that rejected its input.
    pub fn rejected(algorithm: &str, err: &TraceError) -> Self {
        Self::single(Step {
            array: Vec::new(),
            active: Vec::new(),
            sorted: BTreeSet::new(),
            description: format!("{algorithm}: cannot visualize this input ({err})"),
            aux: Auxiliary::None,
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the terminal step.
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn first(&self) -> &Step {
        &self.steps[0]
    }

    /// The terminal step.
    pub fn terminal(&self) -> &Step {
        &self.steps[self.last_index()]
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl TryFrom<Vec<Step>> for Trace {
    type Error = TraceError;

    fn try_from(steps: Vec<Step>) -> Result<Self, Self::Error> {
        if steps.is_empty() {
            return Err(TraceError::EmptyTrace);
        }
        Ok(Self { steps })
    }
}

impl From<Trace> for Vec<Step> {
    fn from(trace: Trace) -> Self {
        trace.steps
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Accumulates steps while a generator runs.
///
/// The resolved set is carried between records so each step sees every
/// position resolved so far.
#[derive(Debug, Default)]
pub struct Recorder {
    steps: Vec<Step>,
    sorted: BTreeSet<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step with no auxiliary state.
    pub fn record<I>(&mut self, array: &[i64], active: I, description: impl Into<String>)
    where
        I: IntoIterator<Item = usize>,
    {
        self.record_with(array, active, description, Auxiliary::None);
    }

    /// Record a step carrying family-specific state.
    pub fn record_with<I>(
        &mut self,
        array: &[i64],
        active: I,
        description: impl Into<String>,
        aux: Auxiliary,
    ) where
        I: IntoIterator<Item = usize>,
    {
        let mut seen = BTreeSet::new();
        let active: Vec<usize> = active.into_iter().filter(|i| seen.insert(*i)).collect();
        let description = description.into();
        debug_assert!(!description.is_empty(), "step description must not be empty");

        self.steps.push(Step {
            array: array.to_vec(),
            active,
            sorted: self.sorted.clone(),
            description,
            aux,
        });
    }

    /// Mark one position resolved for all following steps.
    pub fn resolve(&mut self, index: usize) {
        self.sorted.insert(index);
    }

    /// Mark positions `0..len` resolved.
    pub fn resolve_all(&mut self, len: usize) {
        self.sorted.extend(0..len);
    }

    pub fn is_resolved(&self, index: usize) -> bool {
        self.sorted.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Recorded steps so far.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Seal the recorded steps into a trace.
    ///
    /// Generators always record a terminal step, so an empty recorder is a
    /// logic error upstream.
    pub fn finish(self) -> Trace {
        debug_assert!(!self.steps.is_empty(), "generator recorded no steps");
        Trace { steps: self.steps }
    }
}
