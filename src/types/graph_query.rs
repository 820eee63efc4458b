use std::collections::BTreeMap;

use crate::types::Graph;

/// A trait that defines query operations for graph components.
///
/// This trait provides the read-only surface algorithms traverse a graph
/// through: neighbor retrieval, existence checks for vertices and edges,
/// and whole-graph views. Algorithms that only need this surface (such as
/// the BFS labeling baseline) stay generic over it instead of binding to a
/// concrete representation.
///
/// # Type Parameters
///
/// * `T` - The vertex identifier type.
/// * `V` - The vertex data type returned by traversal methods.
pub trait GraphQuery<T, V> {
    /// Retrieves all neighbors of a given vertex.
    ///
    /// # Parameters
    ///
    /// * `vertex_id` - A reference to the identifier of the vertex whose
    ///   neighbors are being queried.
    ///
    /// # Returns
    ///
    /// A vector containing the vertex data of all neighboring vertices.
    /// Unknown vertices yield an empty vector.
    fn read_neighbor(&self, vertex_id: &T) -> Vec<V>;

    /// Checks if a specific vertex exists in the graph.
    ///
    /// # Parameters
    ///
    /// * `vertex_id` - A reference to the identifier of the vertex to check.
    ///
    /// # Returns
    ///
    /// `true` if the vertex exists, `false` otherwise.
    fn has_vertex(&self, vertex_id: &T) -> bool;

    /// Determines if an edge exists between two specified vertices.
    ///
    /// # Parameters
    ///
    /// * `src_id` - A reference to the identifier of the source vertex.
    /// * `dst_id` - A reference to the identifier of the destination vertex.
    ///
    /// # Returns
    ///
    /// `true` if an edge exists from the source vertex to the destination
    /// vertex, `false` otherwise.
    fn has_edge(&self, src_id: &T, dst_id: &T) -> bool;

    /// Retrieves a list of all vertices in the graph.
    ///
    /// # Returns
    ///
    /// A vector containing the vertex data of all vertices.
    fn vertex_list(&self) -> Vec<V>;

    /// Generates a complete representation of the graph as a map.
    ///
    /// # Returns
    ///
    /// A `BTreeMap` where keys are vertex identifiers and values are tuples
    /// of the vertex data and the neighbor data of that vertex.
    fn all(&self) -> BTreeMap<T, (V, Vec<V>)>;
}

impl GraphQuery<u32, u32> for Graph {
    /// Returns the neighbor list of `vertex_id`, or an empty vector when the
    /// id is outside the graph.
    fn read_neighbor(&self, vertex_id: &u32) -> Vec<u32> {
        if (*vertex_id as usize) >= self.vertex_count {
            return vec![];
        }
        self.neighbor_lists[*vertex_id as usize].to_vec()
    }

    /// Ids are dense, so existence is a range check.
    fn has_vertex(&self, vertex_id: &u32) -> bool {
        (*vertex_id as usize) < self.vertex_count
    }

    /// Scans the source vertex's neighbor list for the destination.
    fn has_edge(&self, src_id: &u32, dst_id: &u32) -> bool {
        if !self.has_vertex(src_id) {
            return false;
        }
        self.neighbor_lists[*src_id as usize]
            .iter()
            .any(|&vertex_id| vertex_id == *dst_id)
    }

    /// Sequential ids from 0 to vertex_count - 1.
    fn vertex_list(&self) -> Vec<u32> {
        (0..self.vertex_count as u32).collect()
    }

    fn all(&self) -> BTreeMap<u32, (u32, Vec<u32>)> {
        let mut all_graph_info = BTreeMap::<u32, (u32, Vec<u32>)>::new();
        for vertex_id in 0..self.vertex_count as u32 {
            let neighbor_list = self.neighbor_lists[vertex_id as usize].clone();
            all_graph_info.insert(vertex_id, (vertex_id, neighbor_list));
        }
        all_graph_info
    }
}
