use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Computes an exclusive prefix sum over `values` in place.
///
/// After the call, `values[i]` holds the sum of the original entries in
/// `[0, i)`. The total sum of all original entries is returned, and when the
/// caller allocates one trailing zero slot (the `n + 1` convention used by
/// the relabeling and contraction stages) that slot also ends up holding the
/// total.
///
/// # Arguments
/// * `values` - The slice to scan in place.
///
/// # Returns
/// * `u32` - The sum of all original entries.
pub fn exclusive_prefix_sum(values: &mut [u32]) -> u32 {
    let mut running = 0u32;
    for slot in values.iter_mut() {
        let current = *slot;
        *slot = running;
        running += current;
    }
    running
}

/// Generates a uniformly random permutation of the ids `[0, n)`.
///
/// The permutation is drawn from a `StdRng` seeded with `seed`, so repeated
/// calls with the same arguments produce the same permutation.
///
/// # Arguments
/// * `n` - Number of ids to permute.
/// * `seed` - Seed for the shuffle.
///
/// # Returns
/// * `Vec<u32>` - A permutation of `0..n`.
pub fn random_permutation(n: usize, seed: u64) -> Vec<u32> {
    let mut permutation: Vec<u32> = (0..n as u32).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);
    permutation
}

/// Derives the seed of one pseudorandom sub-stream from a base seed and a
/// stream index.
///
/// Uses a splitmix64-style finalizer so that nearby indices map to
/// well-separated seeds. The result depends only on `(seed, index)`, which
/// keeps per-vertex draws reproducible regardless of which worker thread
/// performs them.
pub fn stream_seed(seed: u64, index: u64) -> u64 {
    let mut mixed = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

#[cfg(test)]
mod test_util {
    use std::collections::HashSet;

    use super::*;

    /// Tests the exclusive prefix sum on a known input.
    ///
    /// Verifies that each slot receives the sum of the entries strictly
    /// before it and that the returned total matches the input sum.
    #[test]
    fn test_exclusive_prefix_sum() {
        let mut values = vec![1, 0, 2, 1, 0];
        let total = exclusive_prefix_sum(&mut values);

        assert_eq!(values, vec![0, 1, 1, 3, 4]);
        assert_eq!(total, 4);
    }

    /// Tests the prefix sum with the trailing-slot convention.
    ///
    /// When the last slot starts at zero, it holds the total of the
    /// preceding entries after the scan.
    #[test]
    fn test_prefix_sum_trailing_slot() {
        let mut flags = vec![1, 1, 0, 1, 0];
        let total = exclusive_prefix_sum(&mut flags);

        assert_eq!(flags[4], 3);
        assert_eq!(total, 3);
    }

    /// Tests the prefix sum on an empty slice.
    #[test]
    fn test_prefix_sum_empty() {
        let mut values: Vec<u32> = vec![];
        assert_eq!(exclusive_prefix_sum(&mut values), 0);
    }

    /// Tests that random_permutation returns a valid permutation and is
    /// deterministic for a fixed seed.
    #[test]
    fn test_random_permutation() {
        let permutation = random_permutation(100, 7);

        // Every id in [0, 100) appears exactly once
        let distinct: HashSet<u32> = permutation.iter().cloned().collect();
        assert_eq!(permutation.len(), 100);
        assert_eq!(distinct.len(), 100);
        assert!(permutation.iter().all(|&id| id < 100));

        // Same seed reproduces the same permutation
        assert_eq!(permutation, random_permutation(100, 7));

        // A different seed gives a different order for 100 elements
        assert_ne!(permutation, random_permutation(100, 8));
    }

    /// Tests that stream seeds separate nearby indices and stay stable.
    #[test]
    fn test_stream_seed() {
        let seeds: HashSet<u64> = (0..1000).map(|i| stream_seed(42, i)).collect();
        assert_eq!(seeds.len(), 1000);
        assert_eq!(stream_seed(42, 17), stream_seed(42, 17));
        assert_ne!(stream_seed(42, 17), stream_seed(43, 17));
    }
}
