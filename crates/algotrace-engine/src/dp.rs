//! Tabulated dynamic programming traces.
//!
//! `Step::array` and `DpAux::cells` both hold the table in row-major order;
//! `array` shows unfilled cells as 0. Base cases are recorded one cell at a
//! time before the fill. Every fill step lists the written cell first and
//! then the cells it reads.

use crate::error::{Result, TraceError};
use crate::step::{Auxiliary, DpAux, Recorder, Trace};

/// Largest n with F(n) representable as i64.
pub const MAX_FIBONACCI: usize = 92;

/// Largest table a single trace will fill.
pub const MAX_TABLE_CELLS: usize = 10_000;

/// One knapsack item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub weight: i64,
    pub value: i64,
}

impl Item {
    pub const fn new(weight: i64, value: i64) -> Self {
        Self { weight, value }
    }
}

struct Table {
    dp: DpAux,
}

impl Table {
    fn new(rows: usize, cols: usize) -> Result<Self> {
        let cells = rows.saturating_mul(cols);
        if cells > MAX_TABLE_CELLS {
            return Err(TraceError::SampleTooLarge {
                requested: cells,
                limit: MAX_TABLE_CELLS,
            });
        }
        Ok(Self {
            dp: DpAux {
                rows,
                cols,
                cells: vec![None; cells],
            },
        })
    }

    fn at(&self, row: usize, col: usize) -> usize {
        self.dp.index(row, col)
    }

    fn get(&self, row: usize, col: usize) -> i64 {
        self.dp.cells[self.at(row, col)].unwrap_or(0)
    }

    fn set(&mut self, row: usize, col: usize, value: i64) {
        let i = self.at(row, col);
        self.dp.cells[i] = Some(value);
    }

    fn array(&self) -> Vec<i64> {
        self.dp.cells.iter().map(|c| c.unwrap_or(0)).collect()
    }

    fn record<I>(&self, rec: &mut Recorder, active: I, description: String)
    where
        I: IntoIterator<Item = usize>,
    {
        rec.record_with(&self.array(), active, description, Auxiliary::Dp(self.dp.clone()));
    }
}

/// Fibonacci numbers F(0)..=F(n) in a single-row table.
pub fn fibonacci(n: usize) -> Result<Trace> {
    if n > MAX_FIBONACCI {
        return Err(TraceError::FibonacciOverflow(n));
    }

    let mut t = Table::new(1, n + 1)?;
    let mut rec = Recorder::new();
    t.record(&mut rec, [], format!("Computing F({n}) bottom-up"));

    t.set(0, 0, 0);
    t.record(&mut rec, [0], "Base case F(0) = 0".into());
    if n >= 1 {
        t.set(0, 1, 1);
        t.record(&mut rec, [1], "Base case F(1) = 1".into());
    }

    for i in 2..=n {
        let (a, b) = (t.get(0, i - 1), t.get(0, i - 2));
        t.set(0, i, a + b);
        t.record(
            &mut rec,
            [i, i - 1, i - 2],
            format!("F({i}) = F({}) + F({}) = {a} + {b} = {}", i - 1, i - 2, a + b),
        );
    }

    rec.resolve(n);
    t.record(&mut rec, [n], format!("F({n}) = {}", t.get(0, n)));
    Ok(rec.finish())
}

/// 0/1 knapsack over `items` with the given capacity.
///
/// Row `i` covers the first `i` items, column `w` the capacity `w`.
pub fn knapsack(items: &[Item], capacity: i64) -> Result<Trace> {
    if capacity < 0 {
        return Err(TraceError::Negative("capacity"));
    }
    if items.iter().any(|it| it.weight < 0) {
        return Err(TraceError::Negative("weight"));
    }
    if items.is_empty() {
        return Ok(Trace::nothing_to_do(Vec::new(), "item list"));
    }
    // Every cell lies between 0 and the sum of the positive values.
    items
        .iter()
        .try_fold(0i64, |sum, it| sum.checked_add(it.value.max(0)))
        .ok_or(TraceError::ValueOverflow)?;

    let cap = capacity as usize;
    let m = items.len();
    let mut t = Table::new(m + 1, cap + 1)?;
    let mut rec = Recorder::new();
    t.record(
        &mut rec,
        [],
        format!("Knapsack: {m} items, capacity {capacity}"),
    );

    for w in 0..=cap {
        t.set(0, w, 0);
        t.record(&mut rec, [t.at(0, w)], format!("Base case: no items, capacity {w} -> 0"));
    }

    // Column 0 is filled by the recurrence too: zero-weight items fit there.
    for i in 1..=m {
        let item = items[i - 1];
        let weight = item.weight as usize;
        for w in 0..=cap {
            let skip = t.get(i - 1, w);
            if weight > w {
                t.set(i, w, skip);
                t.record(
                    &mut rec,
                    [t.at(i, w), t.at(i - 1, w)],
                    format!("Item {i} (weight {weight}) does not fit in {w}: keep {skip}"),
                );
            } else {
                let take = t
                    .get(i - 1, w - weight)
                    .checked_add(item.value)
                    .ok_or(TraceError::ValueOverflow)?;
                let best = skip.max(take);
                t.set(i, w, best);
                t.record(
                    &mut rec,
                    [t.at(i, w), t.at(i - 1, w), t.at(i - 1, w - weight)],
                    format!(
                        "Item {i} at capacity {w}: max(skip {skip}, take {} + {}) = {best}",
                        t.get(i - 1, w - weight),
                        item.value
                    ),
                );
            }
        }
    }

    // Trace the decisions back from the answer cell.
    let mut chosen = Vec::new();
    let mut w = cap;
    for i in (1..=m).rev() {
        rec.resolve(t.at(i, w));
        if t.get(i, w) != t.get(i - 1, w) {
            chosen.push(i);
            w -= items[i - 1].weight as usize;
        }
    }
    chosen.reverse();

    let best = t.get(m, cap);
    t.record(
        &mut rec,
        [t.at(m, cap)],
        format!("Best value {best} using items {chosen:?}"),
    );
    Ok(rec.finish())
}

/// Longest common subsequence of two strings, compared by `char`.
pub fn lcs(a: &str, b: &str) -> Result<Trace> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return Ok(Trace::nothing_to_do(Vec::new(), "string"));
    }

    let (m, n) = (a.len(), b.len());
    let mut t = Table::new(m + 1, n + 1)?;
    let mut rec = Recorder::new();
    t.record(
        &mut rec,
        [],
        format!(
            "LCS of \"{}\" and \"{}\"",
            a.iter().collect::<String>(),
            b.iter().collect::<String>()
        ),
    );

    for j in 0..=n {
        t.set(0, j, 0);
        t.record(&mut rec, [t.at(0, j)], format!("Base case: empty prefix of A vs {j} chars -> 0"));
    }
    for i in 1..=m {
        t.set(i, 0, 0);
        t.record(&mut rec, [t.at(i, 0)], format!("Base case: {i} chars vs empty prefix of B -> 0"));
    }

    for i in 1..=m {
        for j in 1..=n {
            if a[i - 1] == b[j - 1] {
                let v = t.get(i - 1, j - 1) + 1;
                t.set(i, j, v);
                t.record(
                    &mut rec,
                    [t.at(i, j), t.at(i - 1, j - 1)],
                    format!("'{}' matches: diagonal + 1 = {v}", a[i - 1]),
                );
            } else {
                let (up, left) = (t.get(i - 1, j), t.get(i, j - 1));
                let v = up.max(left);
                t.set(i, j, v);
                t.record(
                    &mut rec,
                    [t.at(i, j), t.at(i - 1, j), t.at(i, j - 1)],
                    format!("'{}' != '{}': max({up}, {left}) = {v}", a[i - 1], b[j - 1]),
                );
            }
        }
    }

    let mut common = Vec::new();
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        rec.resolve(t.at(i, j));
        if a[i - 1] == b[j - 1] {
            common.push(a[i - 1]);
            i -= 1;
            j -= 1;
        } else if t.get(i - 1, j) >= t.get(i, j - 1) {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    common.reverse();

    let found: String = common.into_iter().collect();
    t.record(
        &mut rec,
        [t.at(m, n)],
        format!("LCS = \"{found}\" (length {})", t.get(m, n)),
    );
    Ok(rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(trace: &Trace) -> &DpAux {
        match &trace.terminal().aux {
            Auxiliary::Dp(dp) => dp,
            other => panic!("expected dp aux, got {other:?}"),
        }
    }

    #[test]
    fn fibonacci_fills_table() {
        let trace = fibonacci(10).unwrap();
        let dp = table(&trace);
        assert_eq!(dp.cells[10], Some(55));
        assert!(dp.cells.iter().all(Option::is_some));
        assert!(trace.terminal().description.contains("55"));
    }

    #[test]
    fn fibonacci_base_cases_come_first() {
        let trace = fibonacci(4).unwrap();
        let steps = trace.steps();
        assert_eq!(steps[1].description, "Base case F(0) = 0");
        assert_eq!(steps[2].description, "Base case F(1) = 1");
        assert_eq!(steps[3].active, vec![2, 1, 0]);
    }

    #[test]
    fn fibonacci_small_and_overflow() {
        assert_eq!(table(&fibonacci(0).unwrap()).cells, vec![Some(0)]);
        assert_eq!(table(&fibonacci(1).unwrap()).cells, vec![Some(0), Some(1)]);
        assert_eq!(
            table(&fibonacci(MAX_FIBONACCI).unwrap()).cells[MAX_FIBONACCI],
            Some(7_540_113_804_746_346_429)
        );
        assert_eq!(fibonacci(93).unwrap_err(), TraceError::FibonacciOverflow(93));
    }

    #[test]
    fn knapsack_classic() {
        let items = [Item::new(1, 1), Item::new(3, 4), Item::new(4, 5), Item::new(5, 7)];
        let trace = knapsack(&items, 7).unwrap();
        let dp = table(&trace);
        assert_eq!(dp.cells[dp.index(4, 7)], Some(9));
        assert!(trace.terminal().description.contains("Best value 9"));
        assert!(trace.terminal().description.contains("[2, 3]"));
    }

    #[test]
    fn knapsack_steps_read_prior_cells() {
        let trace = knapsack(&[Item::new(2, 3)], 3).unwrap();
        for step in trace.iter() {
            let Auxiliary::Dp(dp) = &step.aux else { unreachable!() };
            if let Some((&written, reads)) = step.active.split_first() {
                // Reads come from an earlier row and are already filled.
                for &r in reads {
                    assert!(r < written);
                    assert!(dp.cells[r].is_some());
                }
            }
        }
    }

    #[test]
    fn knapsack_counts_zero_weight_items() {
        let trace = knapsack(&[Item::new(0, 5), Item::new(2, 3)], 2).unwrap();
        let dp = table(&trace);
        assert_eq!(dp.cells[dp.index(1, 0)], Some(5));
        assert_eq!(dp.cells[dp.index(2, 2)], Some(8));
        assert_eq!(trace.terminal().description, "Best value 8 using items [1, 2]");

        let trace = knapsack(&[Item::new(0, 5)], 0).unwrap();
        assert_eq!(trace.terminal().description, "Best value 5 using items [1]");
    }

    #[test]
    fn knapsack_capacity_zero_skips_heavy_items() {
        let trace = knapsack(&[Item::new(1, 4), Item::new(2, 6)], 0).unwrap();
        assert_eq!(trace.terminal().description, "Best value 0 using items []");
    }

    #[test]
    fn knapsack_rejects_value_overflow() {
        assert_eq!(
            knapsack(&[Item::new(1, i64::MAX), Item::new(1, 1)], 2).unwrap_err(),
            TraceError::ValueOverflow
        );
        // Negative values never push a cell past the positive total.
        let trace = knapsack(&[Item::new(1, i64::MAX), Item::new(1, i64::MIN)], 2).unwrap();
        assert!(trace.terminal().description.starts_with(&format!("Best value {}", i64::MAX)));
    }

    #[test]
    fn knapsack_rejects_bad_input() {
        assert_eq!(knapsack(&[Item::new(1, 1)], -1).unwrap_err(), TraceError::Negative("capacity"));
        assert_eq!(knapsack(&[Item::new(-1, 1)], 3).unwrap_err(), TraceError::Negative("weight"));
        assert!(matches!(
            knapsack(&[Item::new(1, 1)], 1_000_000),
            Err(TraceError::SampleTooLarge { .. })
        ));
        assert_eq!(knapsack(&[], 5).unwrap().len(), 1);
    }

    #[test]
    fn lcs_recovers_subsequence() {
        let trace = lcs("ABCBDAB", "BDCABA").unwrap();
        let dp = table(&trace);
        assert_eq!(dp.cells[dp.index(7, 6)], Some(4));
        let desc = &trace.terminal().description;
        assert!(desc.contains("length 4"), "{desc}");
    }

    #[test]
    fn lcs_match_reads_diagonal() {
        let trace = lcs("A", "A").unwrap();
        let fill = trace
            .iter()
            .find(|s| s.description.contains("matches"))
            .unwrap();
        // 2x2 table: cell (1,1) = 3 reads (0,0) = 0.
        assert_eq!(fill.active, vec![3, 0]);
    }

    #[test]
    fn lcs_empty_string() {
        assert_eq!(lcs("", "ABC").unwrap().len(), 1);
    }

    #[test]
    fn indices_stay_in_table() {
        for trace in [
            fibonacci(12).unwrap(),
            knapsack(&[Item::new(2, 3), Item::new(3, 4)], 5).unwrap(),
            lcs("AGGTAB", "GXTXAYB").unwrap(),
        ] {
            assert!(trace.iter().all(|s| s.indices_in_bounds()));
        }
    }
}
