//! Linear and binary search traces.
//!
//! A successful search ends on "Found {target} at index k" with `k` resolved;
//! an unsuccessful one ends on "{target} not found" with nothing resolved.

use crate::step::{Recorder, Trace};

/// Scan left to right, stopping at the first match.
pub fn linear_search(input: &[i64], target: i64) -> Trace {
    if input.is_empty() {
        return Trace::nothing_to_do(Vec::new(), "array");
    }

    let mut rec = Recorder::new();
    rec.record(
        input,
        [],
        format!("Searching for {target} among {} elements", input.len()),
    );

    for (i, &value) in input.iter().enumerate() {
        rec.record(input, [i], format!("Checking index {i}: {value}"));
        if value == target {
            rec.resolve(i);
            rec.record(input, [i], format!("Found {target} at index {i}"));
            return rec.finish();
        }
    }

    rec.record(input, [], format!("{target} not found"));
    rec.finish()
}

/// Binary search over an ascending array.
///
/// Each probe records a "Checking middle element" step followed by a step
/// naming the narrowed `[left, right]` range.
pub fn binary_search(input: &[i64], target: i64) -> Trace {
    if input.is_empty() {
        return Trace::nothing_to_do(Vec::new(), "array");
    }

    let mut rec = Recorder::new();
    // Half-open [lo, hi); descriptions report the inclusive bounds.
    let (mut lo, mut hi) = (0usize, input.len());
    rec.record(
        input,
        lo..hi,
        format!("Searching for {target}: left = 0, right = {}", hi - 1),
    );

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let value = input[mid];
        rec.record(
            input,
            [mid, lo, hi - 1],
            format!("Checking middle element at index {mid}: {value}"),
        );

        if value == target {
            rec.resolve(mid);
            rec.record(input, [mid], format!("Found {target} at index {mid}"));
            return rec.finish();
        }

        let moved = if value < target {
            lo = mid + 1;
            format!("{value} < {target}, moving left to {lo}")
        } else {
            hi = mid;
            format!("{value} > {target}, moving right to {}", mid as i64 - 1)
        };

        let bounds = if lo < hi {
            format!("{moved}; searching [{lo}, {}]", hi - 1)
        } else {
            format!("{moved}; range is empty")
        };
        rec.record(input, lo..hi, bounds);
    }

    rec.record(input, [], format!("{target} not found"));
    rec.finish()
}
