use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::util::exclusive_prefix_sum;

/// Compacts arbitrary cluster labels into the dense range
/// `[0, num_unique)`, in place.
///
/// Label values must lie in `[0, n)` where `n` is the length of the slice
/// (the clustering stage guarantees this: every label is a vertex id). The
/// presence of each distinct value is marked in an `n + 1` slot table, an
/// exclusive prefix sum over the table assigns each old value its new dense
/// id, and every label is rewritten through the table. The compaction is
/// order-preserving over old-id value, and applying it to already-dense
/// labels is a no-op.
///
/// # Arguments
/// * `labels` - Cluster labels to rewrite in place.
///
/// # Returns
/// * `usize` - The number of distinct clusters.
pub fn relabel(labels: &mut [u32]) -> usize {
    let n = labels.len();
    if n == 0 {
        return 0;
    }

    // Mark the presence of every label value. Concurrent marks of the same
    // slot all store the same value, so relaxed stores suffice.
    let presence: Vec<AtomicU32> = (0..=n).map(|_| AtomicU32::new(0)).collect();
    labels.par_iter().for_each(|&label| {
        let slot = &presence[label as usize];
        if slot.load(Ordering::Relaxed) == 0 {
            slot.store(1, Ordering::Relaxed);
        }
    });

    // The prefix sum turns the marks into dense ids: slot i holds the
    // number of distinct label values below i, and the trailing slot holds
    // the distinct count.
    let mut dense_ids: Vec<u32> = presence.into_iter().map(AtomicU32::into_inner).collect();
    let num_unique = exclusive_prefix_sum(&mut dense_ids) as usize;

    labels.par_iter_mut().for_each(|label| {
        *label = dense_ids[*label as usize];
    });
    num_unique
}

#[cfg(test)]
mod test_relabel {
    use super::*;

    /// Tests compaction of sparse labels into a dense range.
    ///
    /// Checks the distinct count, the dense range, the preservation of
    /// grouping, and the order-preservation over old label values.
    #[test]
    fn test_relabel_basic() {
        let mut labels = vec![5, 2, 5, 7, 2, 0];
        let num_unique = relabel(&mut labels);

        assert_eq!(num_unique, 4);
        assert!(labels.iter().all(|&label| (label as usize) < num_unique));

        // Grouping preserved: equal before iff equal after
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[1], labels[4]);
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[3], labels[5]);

        // Order-preserving over old values: 0 < 2 < 5 < 7
        assert_eq!(labels, vec![2, 1, 2, 3, 1, 0]);
    }

    /// Tests that relabeling is idempotent.
    ///
    /// A second application over already-dense labels must leave them
    /// unchanged and report the same distinct count.
    #[test]
    fn test_relabel_idempotent() {
        let mut labels = vec![9, 1, 9, 4, 1, 1, 0];
        let first_count = relabel(&mut labels);
        let dense = labels.clone();

        let second_count = relabel(&mut labels);
        assert_eq!(first_count, second_count);
        assert_eq!(labels, dense);
    }

    /// Tests the boundary cases of empty and single-entry label arrays.
    #[test]
    fn test_relabel_degenerate() {
        let mut empty: Vec<u32> = vec![];
        assert_eq!(relabel(&mut empty), 0);

        let mut single = vec![0];
        assert_eq!(relabel(&mut single), 1);
        assert_eq!(single, vec![0]);
    }

    /// Tests a label array where every entry is already distinct.
    #[test]
    fn test_relabel_all_distinct() {
        let mut labels: Vec<u32> = (0..100).rev().collect();
        let num_unique = relabel(&mut labels);

        assert_eq!(num_unique, 100);
        // Identity permutation was already dense, reversal preserved values
        assert_eq!(labels, (0..100).rev().collect::<Vec<u32>>());
    }
}
