use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::config::UNSET_LABEL;
use crate::types::graph_query::GraphQuery;

/// Computes connected-component labels with a conventional top-down
/// parallel BFS.
///
/// Vertices are scanned in id order; an unlabeled vertex takes its own id
/// and floods it through its component with synchronized frontier
/// expansion, claiming each reached vertex with the same single
/// compare-and-swap discipline the decomposition uses. This is the
/// comparison baseline for the decomposition-based `connectivity` and the
/// oracle of its tests; it performs one full BFS per component and does
/// not scale the way the decomposition does on high-diameter graphs.
///
/// Requires vertex ids dense in `[0, n)`.
///
/// # Arguments
/// * `graph` - Any graph exposing the `GraphQuery` surface.
///
/// # Returns
/// * `Vec<u32>` - One label per vertex; labels are equal iff the vertices
///   share a component. Each label is the smallest vertex id of its
///   component.
pub fn bfs_connected_components<G>(graph: &G) -> Vec<u32>
where
    G: GraphQuery<u32, u32> + Sync,
{
    let vertices = graph.vertex_list();
    let labels: Vec<AtomicU32> = (0..vertices.len())
        .map(|_| AtomicU32::new(UNSET_LABEL))
        .collect();

    for &vertex in &vertices {
        if labels[vertex as usize].load(Ordering::Relaxed) == UNSET_LABEL {
            labels[vertex as usize].store(vertex, Ordering::Relaxed);
            flood_label(vertex, graph, &labels);
        }
    }

    labels.into_iter().map(AtomicU32::into_inner).collect()
}

/// Floods `start`'s id over every vertex reachable from it.
///
/// Each round expands the whole frontier one hop in parallel; a neighbor
/// joins the next frontier only when its compare-and-swap claim succeeds,
/// so every vertex is admitted exactly once.
fn flood_label<G>(start: u32, graph: &G, labels: &[AtomicU32])
where
    G: GraphQuery<u32, u32> + Sync,
{
    let mut frontier = vec![start];
    while !frontier.is_empty() {
        frontier = frontier
            .par_iter()
            .flat_map_iter(|vertex| graph.read_neighbor(vertex).into_iter())
            .filter_map(|neighbor| {
                let slot = &labels[neighbor as usize];
                if slot.load(Ordering::Relaxed) != UNSET_LABEL {
                    return None;
                }
                slot.compare_exchange(UNSET_LABEL, start, Ordering::Relaxed, Ordering::Relaxed)
                    .ok()
                    .map(|_| neighbor)
            })
            .collect();
    }
}

#[cfg(test)]
mod test_bfs_cc {
    use super::*;
    use crate::types::Graph;

    /// Tests the baseline on two disjoint components.
    ///
    /// The flood starts from the smallest unlabeled id, so each component
    /// is labeled with its minimum vertex id.
    #[test]
    fn test_two_components() {
        let graph = Graph::from_edges(5, &[(0, 1), (1, 2), (3, 4)]);
        let labels = bfs_connected_components(&graph);

        assert_eq!(labels, vec![0, 0, 0, 3, 3]);
    }

    /// Tests the baseline on the bundled example graph.
    #[test]
    fn test_example_graph() {
        let graph = Graph::from_graph_file("data/example.graph");
        let labels = bfs_connected_components(&graph);

        // Component {0..9} takes label 0, the triangle {10, 11, 12}
        // takes label 10
        for vertex in 0..10 {
            assert_eq!(labels[vertex], 0);
        }
        for vertex in 10..13 {
            assert_eq!(labels[vertex], 10);
        }
    }

    /// Tests isolated vertices and degenerate graphs.
    #[test]
    fn test_degenerate() {
        assert!(bfs_connected_components(&Graph::new(0)).is_empty());
        assert_eq!(bfs_connected_components(&Graph::new(1)), vec![0]);
        // Three isolated vertices each form their own component
        assert_eq!(bfs_connected_components(&Graph::new(3)), vec![0, 1, 2]);
    }
}
