use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use rustc_hash::FxHashSet;

use crate::algorithms::contract::{contract, Contraction};
use crate::algorithms::ldd::cluster;
use crate::algorithms::relabel::relabel;
use crate::config::{DEFAULT_BETA, DEFAULT_SEED};
use crate::types::Graph;

/// Computes connected-component labels for `graph` by recursive
/// low-diameter decomposition and contraction.
///
/// Each level runs one clustering pass, compacts the cluster labels into a
/// dense range, and contracts the clusters. When contraction reports that
/// no cluster has an inter-cluster edge left, the dense labels already
/// partition this level's vertices exactly along connected components and
/// are returned as-is. Otherwise the function recurses on the contracted
/// graph and pulls the recursive labels back onto this level: a vertex in
/// a non-singular cluster takes `map[new_labels[flags[c]]]`, while a
/// vertex in a singular cluster keeps its dense label, which is already
/// final. Each level strictly reduces the number of unresolved clusters,
/// so the recursion terminates on any finite graph.
///
/// Vertices are permuted only beyond level 0 (and only when `permute` is
/// requested): level 0 keeps the base seed so repeated runs are
/// reproducible, while deeper levels cluster with seed `seed + level` to
/// decorrelate repeated draws.
///
/// This follows the linear-work parallel connectivity algorithm of Shun,
/// Dhulipala and Blelloch, with the label bookkeeping of the GBBS
/// implementation.
///
/// # Arguments
/// * `graph` - The symmetric graph of this recursion level.
/// * `beta` - Rate parameter of the decomposition.
/// * `level` - Current recursion depth; callers pass 0.
/// * `permute` - Whether deeper levels permute vertex processing order.
/// * `seed` - Base seed for all randomized stages.
///
/// # Returns
/// * `Vec<u32>` - One label per vertex of `graph`; two vertices carry the
///   same label iff they are connected. Label values carry no further
///   meaning.
pub fn connectivity(graph: &Graph, beta: f64, level: u32, permute: bool, seed: u64) -> Vec<u32> {
    let n = graph.vertex_count;
    if n == 0 {
        return Vec::new();
    }

    let permute_level = level > 0 && permute;
    let mut clusters = cluster(graph, beta, permute_level, seed.wrapping_add(level as u64));

    let num_clusters = relabel(&mut clusters);

    let contraction = contract(graph, &clusters, num_clusters);
    if contraction.stopped {
        // Every cluster is a finished component; the dense labels are the
        // answer for this level.
        return clusters;
    }
    let Contraction {
        graph: contracted,
        flags,
        map,
        ..
    } = contraction;

    let new_labels = connectivity(&contracted, beta, level + 1, permute, seed);

    // Pull the recursive labels back onto this level's vertices. Singular
    // clusters never entered the contracted graph and keep their label.
    clusters.par_iter_mut().for_each(|label| {
        let cluster_id = *label as usize;
        let contracted_id = flags[cluster_id];
        if contracted_id != flags[cluster_id + 1] {
            *label = map[new_labels[contracted_id as usize] as usize];
        }
    });
    clusters
}

/// Configuration for the connectivity computation.
///
/// # Fields
///
/// * `thread_num` - Number of worker threads; 0 lets rayon size the pool.
/// * `beta` - Rate parameter of the decomposition; smaller values give
///   larger clusters and fewer recursion levels.
/// * `permute` - Whether recursion levels beyond the first permute their
///   vertex processing order.
/// * `seed` - Base seed for all randomized stages.
#[derive(Clone)]
pub struct ConnectivityConfig {
    pub thread_num: usize,
    pub beta: f64,
    pub permute: bool,
    pub seed: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            thread_num: 0,
            beta: DEFAULT_BETA,
            permute: false,
            seed: DEFAULT_SEED,
        }
    }
}

/// Trait for computing connected components of an undirected graph.
///
/// Two vertices receive the same label iff some path connects them. Label
/// values carry no meaning beyond equality.
pub trait ConnectedComponents<T> {
    /// Computes one component label per vertex.
    fn connected_components(&self, config: ConnectivityConfig) -> Vec<T>;

    /// Counts the distinct connected components.
    fn count_components(&self, config: ConnectivityConfig) -> usize;
}

/// Controller for connectivity computations over a shared graph.
///
/// Owns the thread pool setup so callers only supply a configuration; the
/// decomposition itself runs inside the pool.
pub struct ConnectivityController {
    graph: Arc<Graph>,
}

impl ConnectivityController {
    /// Creates a new controller over the given graph.
    pub fn new(graph: Arc<Graph>) -> Self {
        ConnectivityController { graph }
    }
}

impl ConnectedComponents<u32> for ConnectivityController {
    /// Runs the recursive decomposition inside a dedicated thread pool and
    /// returns the per-vertex component labels.
    fn connected_components(&self, config: ConnectivityConfig) -> Vec<u32> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.thread_num)
            .build()
            .unwrap();
        pool.install(|| connectivity(&self.graph, config.beta, 0, config.permute, config.seed))
    }

    /// Counts components by collecting the distinct labels.
    fn count_components(&self, config: ConnectivityConfig) -> usize {
        let labels = self.connected_components(config);
        labels.iter().collect::<FxHashSet<_>>().len()
    }
}
