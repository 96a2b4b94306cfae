//! Comparison sort traces.
//!
//! Every comparison and every write is recorded. Divide-and-conquer sorts
//! record a dividing step for each sub-range before recursing into it, so the
//! step order is the pre-order walk of the recursion tree.

use crate::step::{Recorder, Trace};

/// Bubble sort with early exit on a swap-free pass.
///
/// After pass `p` the trailing window `n-1-p..n` is final.
pub fn bubble_sort(input: &[i64]) -> Trace {
    if input.is_empty() {
        return Trace::nothing_to_do(Vec::new(), "array");
    }

    let mut a = input.to_vec();
    let n = a.len();
    let mut rec = Recorder::new();
    rec.record(&a, [], format!("Starting bubble sort on {n} elements"));

    for pass in 0..n - 1 {
        let end = n - 1 - pass;
        let mut swapped = false;

        for j in 0..end {
            rec.record(&a, [j, j + 1], format!("Comparing {} and {}", a[j], a[j + 1]));
            if a[j] > a[j + 1] {
                a.swap(j, j + 1);
                swapped = true;
                rec.record(
                    &a,
                    [j, j + 1],
                    format!("Swapped {} and {}", a[j + 1], a[j]),
                );
            }
        }

        rec.resolve(end);
        if !swapped {
            rec.resolve_all(n);
            rec.record(&a, [], format!("Pass {} made no swaps, stopping early", pass + 1));
            break;
        }
        rec.record(&a, [end], format!("{} is in its final position", a[end]));
    }

    rec.resolve_all(n);
    rec.record(&a, [], "Array is sorted");
    rec.finish()
}

/// Selection sort. The prefix `0..=i` is final after pass `i`.
pub fn selection_sort(input: &[i64]) -> Trace {
    if input.is_empty() {
        return Trace::nothing_to_do(Vec::new(), "array");
    }

    let mut a = input.to_vec();
    let n = a.len();
    let mut rec = Recorder::new();
    rec.record(&a, [], format!("Starting selection sort on {n} elements"));

    for i in 0..n - 1 {
        let mut min = i;
        rec.record(&a, [i], format!("Pass {}: assume {} is the minimum", i + 1, a[i]));

        for j in i + 1..n {
            rec.record(&a, [min, j], format!("Comparing {} with minimum {}", a[j], a[min]));
            if a[j] < a[min] {
                min = j;
                rec.record(&a, [min], format!("New minimum {} at index {min}", a[min]));
            }
        }

        if min != i {
            a.swap(i, min);
            rec.record(&a, [i, min], format!("Swapped {} into index {i}", a[i]));
        }
        rec.resolve(i);
        rec.record(&a, [i], format!("{} is in its final position", a[i]));
    }

    rec.resolve_all(n);
    rec.record(&a, [], "Array is sorted");
    rec.finish()
}

/// Insertion sort, shifting larger elements right one slot at a time.
pub fn insertion_sort(input: &[i64]) -> Trace {
    if input.is_empty() {
        return Trace::nothing_to_do(Vec::new(), "array");
    }

    let mut a = input.to_vec();
    let n = a.len();
    let mut rec = Recorder::new();
    rec.record(&a, [], format!("Starting insertion sort on {n} elements"));

    for i in 1..n {
        let key = a[i];
        rec.record(&a, [i], format!("Inserting {key}"));

        let mut j = i;
        while j > 0 {
            rec.record(&a, [j - 1, j], format!("Comparing {} with {key}", a[j - 1]));
            if a[j - 1] <= key {
                break;
            }
            // Keep the key in the array while shifting so every step is a permutation.
            a[j] = a[j - 1];
            a[j - 1] = key;
            rec.record(&a, [j - 1, j], format!("Shifted {} right", a[j]));
            j -= 1;
        }

        rec.record(&a, [j], format!("Placed {key} at index {j}"));
    }

    rec.resolve_all(n);
    rec.record(&a, [], "Array is sorted");
    rec.finish()
}

/// Top-down merge sort.
pub fn merge_sort(input: &[i64]) -> Trace {
    if input.is_empty() {
        return Trace::nothing_to_do(Vec::new(), "array");
    }

    let mut a = input.to_vec();
    let n = a.len();
    let mut rec = Recorder::new();
    rec.record(&a, [], format!("Starting merge sort on {n} elements"));

    merge_sort_range(&mut rec, &mut a, 0, n - 1);

    rec.resolve_all(n);
    rec.record(&a, [], "Array is sorted");
    rec.finish()
}

/// Sort `a[lo..=hi]`, recording into `rec`.
pub fn merge_sort_range(rec: &mut Recorder, a: &mut [i64], lo: usize, hi: usize) {
    if lo >= hi || hi >= a.len() {
        return;
    }

    let mid = lo + (hi - lo) / 2;
    rec.record(
        a,
        lo..=hi,
        format!("Dividing [{lo}..{hi}] into [{lo}..{mid}] and [{}..{hi}]", mid + 1),
    );

    merge_sort_range(rec, a, lo, mid);
    merge_sort_range(rec, a, mid + 1, hi);
    merge(rec, a, lo, mid, hi);
}

fn merge(rec: &mut Recorder, a: &mut [i64], lo: usize, mid: usize, hi: usize) {
    let left = a[lo..=mid].to_vec();
    let right = a[mid + 1..=hi].to_vec();
    let (mut i, mut j, mut k) = (0, 0, lo);

    rec.record(a, lo..=hi, format!("Merging [{lo}..{mid}] and [{}..{hi}]", mid + 1));

    while i < left.len() && j < right.len() {
        // k is the write target; right[j] is still in place at mid + 1 + j.
        rec.record(
            a,
            [k, mid + 1 + j],
            format!("Comparing {} and {} for index {k}", left[i], right[j]),
        );
        let value = if left[i] <= right[j] {
            i += 1;
            left[i - 1]
        } else {
            j += 1;
            right[j - 1]
        };
        a[k] = value;
        rec.record(a, [k], format!("Wrote {value} to index {k}"));
        k += 1;
    }

    for &value in left[i..].iter().chain(&right[j..]) {
        a[k] = value;
        rec.record(a, [k], format!("Wrote remaining {value} to index {k}"));
        k += 1;
    }
}

/// Quicksort with Lomuto partitioning around the last element.
///
/// Each pivot is marked final as soon as it is placed.
pub fn quick_sort(input: &[i64]) -> Trace {
    if input.is_empty() {
        return Trace::nothing_to_do(Vec::new(), "array");
    }

    let mut a = input.to_vec();
    let n = a.len();
    let mut rec = Recorder::new();
    rec.record(&a, [], format!("Starting quick sort on {n} elements"));

    quick_sort_range(&mut rec, &mut a, 0, n - 1);

    rec.resolve_all(n);
    rec.record(&a, [], "Array is sorted");
    rec.finish()
}

/// Sort `a[lo..=hi]`, recording into `rec`.
///
/// Empty or out-of-bounds ranges record nothing.
pub fn quick_sort_range(rec: &mut Recorder, a: &mut [i64], lo: usize, hi: usize) {
    if lo > hi || hi >= a.len() {
        return;
    }
    if lo == hi {
        rec.resolve(lo);
        rec.record(a, [lo], format!("{} is alone in its range, final", a[lo]));
        return;
    }

    rec.record(
        a,
        lo..=hi,
        format!("Dividing [{lo}..{hi}] around pivot {}", a[hi]),
    );

    let p = partition(rec, a, lo, hi);
    rec.resolve(p);
    rec.record(a, [p], format!("Pivot {} placed at final index {p}", a[p]));

    if p > lo {
        quick_sort_range(rec, a, lo, p - 1);
    }
    if p < hi {
        quick_sort_range(rec, a, p + 1, hi);
    }
}

fn partition(rec: &mut Recorder, a: &mut [i64], lo: usize, hi: usize) -> usize {
    let pivot = a[hi];
    let mut i = lo;

    for j in lo..hi {
        rec.record(a, [j, hi], format!("Comparing {} with pivot {pivot}", a[j]));
        if a[j] < pivot {
            if i != j {
                a.swap(i, j);
                rec.record(a, [i, j], format!("Swapped {} and {}", a[i], a[j]));
            }
            i += 1;
        }
    }

    if i != hi {
        a.swap(i, hi);
        rec.record(a, [i, hi], format!("Moved pivot {pivot} to index {i}"));
    }
    i
}
