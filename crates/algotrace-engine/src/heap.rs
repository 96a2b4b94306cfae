//! Max-heap construction by repeated insertion.
//!
//! Each value is appended and sifted up. The terminal step marks every heap
//! position as sorted: for heaps "sorted" means "built", not ascending order.

use crate::step::{Auxiliary, HeapAux, Recorder, Trace};

fn aux(pending: &[i64]) -> Auxiliary {
    Auxiliary::Heap(HeapAux {
        pending: pending.to_vec(),
    })
}

/// Insert `values` one by one into an empty max-heap.
pub fn max_heap_insert(values: &[i64]) -> Trace {
    if values.is_empty() {
        return Trace::nothing_to_do(Vec::new(), "value list");
    }

    let mut heap: Vec<i64> = Vec::with_capacity(values.len());
    let mut rec = Recorder::new();
    rec.record_with(
        &heap,
        [],
        format!("Building a max-heap from {} values", values.len()),
        aux(values),
    );

    for (k, &value) in values.iter().enumerate() {
        let pending = &values[k + 1..];
        heap.push(value);
        let mut i = heap.len() - 1;
        rec.record_with(&heap, [i], format!("Inserted {value} at index {i}"), aux(pending));

        while i > 0 {
            let parent = (i - 1) / 2;
            rec.record_with(
                &heap,
                [i, parent],
                format!("Comparing {} with parent {}", heap[i], heap[parent]),
                aux(pending),
            );
            if heap[i] <= heap[parent] {
                break;
            }
            heap.swap(i, parent);
            rec.record_with(
                &heap,
                [parent, i],
                format!("Swapped {} up to index {parent}", heap[parent]),
                aux(pending),
            );
            i = parent;
        }
    }

    rec.resolve_all(heap.len());
    rec.record_with(
        &heap,
        [],
        format!("Max-heap built with {} elements", heap.len()),
        aux(&[]),
    );
    rec.finish()
}

/// True when every parent is at least as large as its children.
pub fn is_max_heap(heap: &[i64]) -> bool {
    (1..heap.len()).all(|i| heap[(i - 1) / 2] >= heap[i])
}
