//! Sample inputs.
//!
//! Fixed demo inputs per family, plus seeded random arrays. All randomness
//! lives here so that generators stay deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dp::Item;
use crate::error::{Result, TraceError};
use crate::grid::Grid;

/// Longest array the visualizer will generate.
pub const MAX_SAMPLE_LEN: usize = 64;

/// Longest caller-supplied array or search input.
pub const MAX_INPUT_LEN: usize = 128;

/// Largest caller-supplied grid, in cells.
pub const MAX_GRID_CELLS: usize = 1_024;

/// Default length for generated arrays.
pub const DEFAULT_SAMPLE_LEN: usize = 10;

pub const SAMPLE_ARRAY: [i64; 8] = [38, 27, 43, 3, 9, 82, 10, 15];

pub const SAMPLE_SORTED: [i64; 10] = [2, 5, 8, 12, 16, 23, 38, 56, 72, 91];

pub const SAMPLE_TARGET: i64 = 23;

pub const SAMPLE_HEAP: [i64; 7] = [10, 20, 15, 30, 40, 5, 25];

pub const SAMPLE_FIBONACCI: usize = 10;

pub const SAMPLE_ITEMS: [Item; 4] = [
    Item::new(1, 1),
    Item::new(3, 4),
    Item::new(4, 5),
    Item::new(5, 7),
];

pub const SAMPLE_CAPACITY: i64 = 7;

pub const SAMPLE_LCS: (&str, &str) = ("ABCBDAB", "BDCABA");

/// 6x8 maze: start top-left, end bottom-right.
pub const SAMPLE_GRID: [[u8; 8]; 6] = [
    [2, 0, 0, 1, 0, 0, 0, 0],
    [1, 1, 0, 1, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 1, 0, 0],
    [0, 1, 1, 1, 0, 1, 0, 1],
    [0, 0, 0, 1, 0, 0, 0, 0],
    [1, 1, 0, 0, 0, 1, 1, 3],
];

/// The demo maze.
pub fn sample_grid() -> Result<Grid> {
    Grid::from_rows(&SAMPLE_GRID)
}

/// `len` values in `1..=99` from a seeded generator.
pub fn random_array(len: usize, seed: u64) -> Result<Vec<i64>> {
    if len > MAX_SAMPLE_LEN {
        return Err(TraceError::SampleTooLarge {
            requested: len,
            limit: MAX_SAMPLE_LEN,
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..len).map(|_| rng.gen_range(1..=99)).collect())
}

/// Like [`random_array`], sorted ascending for binary search.
pub fn random_sorted_array(len: usize, seed: u64) -> Result<Vec<i64>> {
    let mut values = random_array(len, seed)?;
    values.sort_unstable();
    Ok(values)
}
