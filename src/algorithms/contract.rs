use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashSet;
use rayon::prelude::*;

use crate::config::UNSET_LABEL;
use crate::types::Graph;
use crate::util::exclusive_prefix_sum;

/// Result of contracting a clustered graph.
///
/// # Fields
///
/// * `graph` - The contracted graph over the non-singular clusters, one
///   vertex per cluster that still has an inter-cluster edge. Empty when
///   `stopped` is set.
/// * `flags` - Prefix-summed singularity table of length
///   `num_clusters + 1`: `flags[i] != flags[i + 1]` iff cluster `i` is
///   non-singular, in which case `flags[i]` is its id in the contracted
///   graph. `flags[num_clusters]` is the non-singular count.
/// * `map` - Original dense cluster id of each contracted vertex
///   (`map[j]` is the cluster that vertex `j` of `graph` stands for).
/// * `stopped` - Set when no cluster has any inter-cluster edge left, i.e.
///   every cluster already equals one full connected component and the
///   recursion terminates.
pub struct Contraction {
    pub graph: Graph,
    pub flags: Vec<u32>,
    pub map: Vec<u32>,
    pub stopped: bool,
}

/// Contracts each cluster of `graph` into a single vertex.
///
/// Intra-cluster edges disappear and duplicate inter-cluster edges are
/// merged. Clusters without any surviving inter-cluster edge ("singular")
/// are complete connected components already; they are excluded from the
/// contracted graph entirely rather than kept as isolated vertices, and
/// their dense label needs no further refinement. The label bookkeeping
/// through `flags` and `map` follows the GBBS formulation of this
/// contraction step.
///
/// # Arguments
/// * `graph` - The current-level graph.
/// * `clusters` - Dense cluster labels, one per vertex, in
///   `[0, num_clusters)` (the output of `relabel`).
/// * `num_clusters` - Number of distinct clusters.
///
/// # Returns
/// * `Contraction` - The contracted graph and its label bookkeeping; see
///   the struct documentation.
pub fn contract(graph: &Graph, clusters: &[u32], num_clusters: usize) -> Contraction {
    // Step 1. Sweep every directed edge and keep the inter-cluster pairs.
    // The direction test `cluster(u) < cluster(v)` drops intra-cluster
    // edges and emits each inter-cluster edge once; the concurrent set
    // deduplicates pairs emitted by parallel workers.
    let edge_set = DashSet::<(u32, u32)>::new();
    (0..graph.vertex_count).into_par_iter().for_each(|u| {
        let cluster_u = clusters[u];
        for &v in graph.neighbors(u as u32) {
            let cluster_v = clusters[v as usize];
            if cluster_u < cluster_v {
                edge_set.insert((cluster_u, cluster_v));
            }
        }
    });
    let edges: Vec<(u32, u32)> = edge_set.into_iter().collect();

    // Step 2. Mark both endpoints of every surviving pair as non-singular
    // and prefix-sum the marks into ranks.
    let flag_slots: Vec<AtomicU32> = (0..=num_clusters).map(|_| AtomicU32::new(0)).collect();
    edges.par_iter().for_each(|&(u, v)| {
        if flag_slots[u as usize].load(Ordering::Relaxed) == 0 {
            flag_slots[u as usize].store(1, Ordering::Relaxed);
        }
        if flag_slots[v as usize].load(Ordering::Relaxed) == 0 {
            flag_slots[v as usize].store(1, Ordering::Relaxed);
        }
    });
    let mut flags: Vec<u32> = flag_slots.into_iter().map(AtomicU32::into_inner).collect();
    let num_ns_clusters = exclusive_prefix_sum(&mut flags) as usize;

    // Step 3. No inter-cluster edge left: every cluster is a finished
    // component and the recursion stops here.
    if num_ns_clusters == 0 {
        return Contraction {
            graph: Graph::new(0),
            flags,
            map: Vec::new(),
            stopped: true,
        };
    }

    // Step 4. Build the renumbering. `map[j]` is the original cluster id of
    // contracted vertex j; the order-preserving parallel collect keeps the
    // non-singular clusters in ascending id order, so map[flags[i]] == i
    // holds for every non-singular cluster i.
    let map: Vec<u32> = (0..num_clusters as u32)
        .into_par_iter()
        .filter(|&cluster_id| {
            flags[cluster_id as usize] != flags[cluster_id as usize + 1]
        })
        .collect();

    // inv_map extends map with the inverse direction: the contracted id of
    // a non-singular cluster is its prefix-sum rank. Singular clusters keep
    // the sentinel and are never looked up.
    let inv_map: Vec<u32> = (0..num_clusters)
        .into_par_iter()
        .map(|cluster_id| {
            if flags[cluster_id] != flags[cluster_id + 1] {
                flags[cluster_id]
            } else {
                UNSET_LABEL
            }
        })
        .collect();

    // Step 5. Renumber the deduplicated edges into the contracted id space
    // and symmetrize them into the contracted graph.
    let renumbered: Vec<(u32, u32)> = edges
        .par_iter()
        .map(|&(u, v)| (inv_map[u as usize], inv_map[v as usize]))
        .collect();
    let contracted = Graph::from_edges(num_ns_clusters, &renumbered);

    Contraction {
        graph: contracted,
        flags,
        map,
        stopped: false,
    }
}
