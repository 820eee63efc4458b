use std::sync::atomic::{AtomicU32, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::UNSET_LABEL;
use crate::types::Graph;
use crate::util::{random_permutation, stream_seed};

/// Partitions the vertices of `graph` into clusters of bounded expected
/// diameter (low-diameter decomposition).
///
/// Every vertex draws one integer shift from an exponential distribution
/// with rate `beta` and vertices are grouped into buckets by
/// `max_shift - shift`, so the largest draws land in bucket 0. Processing
/// the buckets in order simulates a global BFS flood started simultaneously
/// from all vertices with priorities given by the shifts, which bounds the
/// expected radius of each cluster by O(log n / beta) with high
/// probability. Within each round, an unclaimed vertex whose bucket has
/// come up seeds a new cluster under its own id, and the frontier expands
/// one hop: every (frontier vertex, neighbor) pair races to claim the
/// neighbor's label slot with a single compare-and-swap, and only winners
/// join the next frontier. A slot, once set, is final for the pass, so
/// losers simply drop out; which concurrent writer wins does not affect
/// correctness, only cluster shapes.
///
/// Shift draws come from one RNG stream per vertex keyed by
/// `(seed, vertex id)`, so they are reproducible regardless of thread
/// scheduling. The optional permutation (drawn from `seed` as well) only
/// reorders vertices within buckets; the orchestrator enables it beyond
/// recursion level 0 to decorrelate repeated draws across levels.
///
/// # Arguments
/// * `graph` - The symmetric graph to decompose.
/// * `beta` - Rate of the shift distribution; must be positive. Smaller
///   values give larger, fewer clusters.
/// * `permute` - Whether to randomly permute the vertex processing order.
/// * `seed` - Base seed for shifts and the permutation.
///
/// # Returns
/// * `Vec<u32>` - One cluster label per vertex. Every label is the id of
///   the cluster's seed vertex, and two vertices sharing a label are always
///   connected in `graph`. Distinct clusters may still share a component;
///   the recursion in `connectivity` merges them.
pub fn cluster(graph: &Graph, beta: f64, permute: bool, seed: u64) -> Vec<u32> {
    let n = graph.vertex_count;
    if n == 0 {
        return Vec::new();
    }

    let vertex_permutation = if permute {
        Some(random_permutation(n, seed))
    } else {
        None
    };

    // Cluster ownership slots, one per vertex. The compare-and-swap claim
    // below is the only concurrent mutation in the whole pass.
    let labels: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(UNSET_LABEL)).collect();

    // One exponential draw per vertex, floored to an integer. rand carries
    // no exponential distribution, so the draw is inverse-transform sampled
    // from a uniform.
    let shifts: Vec<u32> = (0..n)
        .into_par_iter()
        .map(|vertex| {
            let mut rng = StdRng::seed_from_u64(stream_seed(seed, vertex as u64));
            let uniform: f64 = rng.gen();
            (-(1.0 - uniform).ln() / beta).floor() as u32
        })
        .collect();

    let max_shift = shifts.par_iter().copied().max().unwrap_or(0);

    // Bucket vertices by (max_shift - shift): the largest draws land in
    // bucket 0 and are processed first.
    let mut buckets: Vec<Vec<u32>> = vec![Vec::new(); max_shift as usize + 1];
    for position in 0..n {
        let vertex = match &vertex_permutation {
            Some(permutation) => permutation[position] as usize,
            None => position,
        };
        buckets[(max_shift - shifts[vertex]) as usize].push(vertex as u32);
    }

    let mut frontier: Vec<u32> = Vec::new();
    for bucket in &buckets {
        // Vertices of this bucket still unclaimed seed new clusters under
        // their own id and join the frontier.
        let new_seeds: Vec<u32> = bucket
            .par_iter()
            .copied()
            .filter(|&vertex| {
                let slot = &labels[vertex as usize];
                if slot.load(Ordering::Relaxed) != UNSET_LABEL {
                    return false;
                }
                // Each vertex appears in exactly one bucket, so this store
                // never races with another writer of the same slot.
                slot.store(vertex, Ordering::Relaxed);
                true
            })
            .collect();
        frontier.extend(new_seeds);

        // Expand one hop. Each (frontier vertex, neighbor) pair attempts a
        // single exchange of the neighbor's slot from unset to the frontier
        // vertex's cluster; exactly one attempt per slot succeeds and the
        // winners carry the cluster id into the next round.
        frontier = frontier
            .par_iter()
            .flat_map_iter(|&vertex| {
                let owner = labels[vertex as usize].load(Ordering::Relaxed);
                graph
                    .neighbors(vertex)
                    .iter()
                    .map(move |&neighbor| (owner, neighbor))
            })
            .filter_map(|(owner, neighbor)| {
                let slot = &labels[neighbor as usize];
                if slot.load(Ordering::Relaxed) != UNSET_LABEL {
                    return None;
                }
                slot.compare_exchange(UNSET_LABEL, owner, Ordering::Relaxed, Ordering::Relaxed)
                    .ok()
                    .map(|_| neighbor)
            })
            .collect();
    }

    // Every vertex self-claimed in its own bucket at the latest, so no slot
    // is left unset.
    labels.into_iter().map(AtomicU32::into_inner).collect()
}

#[cfg(test)]
mod test_ldd {
    use std::collections::HashMap;

    use super::*;

    /// Tests that every vertex receives a label and that each label is the
    /// id of a vertex inside the same cluster.
    #[test]
    fn test_all_vertices_labeled() {
        // Path graph on 8 vertices
        let edges: Vec<(u32, u32)> = (0..7).map(|i| (i, i + 1)).collect();
        let graph = Graph::from_edges(8, &edges);

        let labels = cluster(&graph, 0.5, false, 0);

        assert_eq!(labels.len(), 8);
        for &label in &labels {
            assert_ne!(label, UNSET_LABEL);
            assert!((label as usize) < 8);
            // The seed vertex of a cluster carries its own id
            assert_eq!(labels[label as usize], label);
        }
    }

    /// Tests that clusters never span connected components.
    ///
    /// Builds two disjoint triangles and asserts that no cluster label
    /// crosses from one triangle to the other, for several betas.
    #[test]
    fn test_clusters_respect_components() {
        let graph = Graph::from_edges(6, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]);

        for &beta in &[0.1, 0.5, 2.0] {
            let labels = cluster(&graph, beta, false, 0);
            let mut label_component = HashMap::<u32, usize>::new();
            for (vertex, &label) in labels.iter().enumerate() {
                let component = if vertex < 3 { 0 } else { 1 };
                let recorded = label_component.entry(label).or_insert(component);
                assert_eq!(
                    *recorded, component,
                    "cluster {} spans both triangles",
                    label
                );
            }
        }
    }

    /// Tests the degenerate case of a very large beta.
    ///
    /// With a huge rate every shift draw floors to zero, all vertices land
    /// in bucket 0, and every vertex self-claims before any expansion can
    /// reach it: the decomposition degenerates to singleton clusters.
    #[test]
    fn test_huge_beta_gives_singletons() {
        let edges: Vec<(u32, u32)> = (0..9).map(|i| (i, i + 1)).collect();
        let graph = Graph::from_edges(10, &edges);

        let labels = cluster(&graph, 1e9, false, 0);
        for (vertex, &label) in labels.iter().enumerate() {
            assert_eq!(label, vertex as u32);
        }
    }

    /// Tests that the permuted variant still labels every vertex and keeps
    /// clusters inside components.
    #[test]
    fn test_permuted_clustering() {
        let graph = Graph::from_edges(6, &[(0, 1), (1, 2), (3, 4), (4, 5)]);

        let labels = cluster(&graph, 0.5, true, 3);
        assert_eq!(labels.len(), 6);
        for (vertex, &label) in labels.iter().enumerate() {
            assert_ne!(label, UNSET_LABEL);
            // Both halves are paths; a label from the other half would
            // place two disconnected vertices in one cluster.
            assert_eq!((vertex < 3), ((label as usize) < 3));
        }
    }

    /// Tests the empty graph.
    #[test]
    fn test_empty_graph() {
        let graph = Graph::new(0);
        assert!(cluster(&graph, 0.5, false, 0).is_empty());
    }
}
