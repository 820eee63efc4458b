use std::fs::File;
use std::io::{BufRead, BufReader};

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::config::READ_BUFFER_SIZE;
use crate::util::stream_seed;

pub mod graph_query;

/// An immutable, symmetric adjacency-list graph.
///
/// Vertex ids are dense in `[0, vertex_count)`. Every undirected edge is
/// stored in both directions, and the builders guarantee the lists are free
/// of self-loops and duplicates. The structure is never mutated once built;
/// the contraction stage materializes a fresh, smaller `Graph` per
/// recursion level instead of editing this one in place.
///
/// # Limits
///
/// Ids are `u32` and the largest id (`u32::MAX`) is reserved as the
/// unset-label sentinel, so a graph holds at most `u32::MAX - 1` vertices.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Total number of vertices in the graph
    pub vertex_count: usize,

    /// One neighbor list per vertex, indexed by vertex id
    pub neighbor_lists: Vec<Vec<u32>>,
}

impl Graph {
    /// Creates a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Graph {
        Graph {
            vertex_count,
            neighbor_lists: vec![Vec::new(); vertex_count],
        }
    }

    /// Builds a symmetric graph from a normalized undirected edge list.
    ///
    /// Each pair `(u, v)` stands for one undirected edge and is inserted in
    /// both directions. The caller supplies a list that is already free of
    /// self-loops and duplicates (the loader and the generators deduplicate
    /// before calling; the contraction stage deduplicates as part of its
    /// edge sweep).
    ///
    /// # Arguments
    /// * `vertex_count` - Number of vertices; every endpoint must be below it.
    /// * `edges` - One entry per undirected edge.
    ///
    /// # Returns
    /// * `Graph` - The symmetrized adjacency-list graph.
    pub fn from_edges(vertex_count: usize, edges: &[(u32, u32)]) -> Graph {
        let mut neighbor_lists = vec![Vec::new(); vertex_count];
        for &(src, dst) in edges {
            neighbor_lists[src as usize].push(dst);
            neighbor_lists[dst as usize].push(src);
        }
        Graph {
            vertex_count,
            neighbor_lists,
        }
    }

    /// Loads a symmetric graph from an edge-list text file.
    ///
    /// # Format
    /// - Lines starting with `#` and blank lines are ignored.
    /// - The first data line holds the header: `<vertex_count> <edge_count>`.
    /// - Every following data line holds one undirected edge: `<src> <dst>`.
    ///
    /// Self-loops are dropped and duplicate edges (in either direction) are
    /// merged while parsing, so a file may list an edge once or twice without
    /// changing the result. A progress bar tracks edge ingestion against the
    /// header's declared edge count.
    ///
    /// # Arguments
    /// * `file_path` - Path to the edge-list file.
    ///
    /// # Returns
    /// * `Graph` - The loaded graph.
    ///
    /// # Panics
    /// * If the file cannot be opened or read
    /// * If the header is missing or a line fails to parse
    /// * If an endpoint is outside `[0, vertex_count)`
    pub fn from_graph_file(file_path: &str) -> Graph {
        // Open the graph file with a buffered reader for efficient reading
        let graph_file = File::open(file_path).expect("Failed to open graph file.");
        let graph_reader = BufReader::with_capacity(READ_BUFFER_SIZE, graph_file);

        let mut vertex_count = 0usize;
        let mut header_seen = false;
        let mut progress: Option<ProgressBar> = None;

        // Normalized (smaller endpoint first), deduplicated undirected edges
        let mut edge_set = FxHashSet::<(u32, u32)>::default();

        for line in graph_reader.lines() {
            let line = line.expect("Failed to read graph file.");
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = trimmed.split_whitespace().collect();

            if !header_seen {
                // Header line: vertex count and declared edge count
                assert_eq!(tokens.len(), 2, "File format error.");
                vertex_count = tokens[0].parse::<usize>().expect("File format error.");
                let declared_edges = tokens[1].parse::<u64>().expect("File format error.");

                // Setup a progress bar for user feedback during ingestion
                let bar = ProgressBar::new(declared_edges);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                        .unwrap()
                        .progress_chars("=>-"),
                );
                bar.set_message("Graph Loading.");
                progress = Some(bar);
                header_seen = true;
                continue;
            }

            // Edge line
            let src = tokens[0].parse::<u32>().expect("File format error.");
            let dst = tokens[1].parse::<u32>().expect("File format error.");
            assert!(
                (src as usize) < vertex_count && (dst as usize) < vertex_count,
                "File format error."
            );
            if src != dst {
                let normalized = if src < dst { (src, dst) } else { (dst, src) };
                edge_set.insert(normalized);
            }
            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }
        assert!(header_seen, "File format error.");
        if let Some(bar) = &progress {
            bar.finish_with_message("Graph Loaded.");
        }

        let edges: Vec<(u32, u32)> = edge_set.into_iter().collect();
        Graph::from_edges(vertex_count, &edges)
    }

    /// Generates a synthetic symmetric graph with the R-MAT recursive-matrix
    /// model.
    ///
    /// Each of the `edge_count` samples descends the implicit adjacency
    /// matrix one bit per level, picking a quadrant with probabilities
    /// 0.5 / 0.1 / 0.1 / 0.3, from its own RNG stream keyed by
    /// `(seed, sample index)`. Self-loops and samples landing outside
    /// `[0, vertex_count)` are dropped, and duplicates are merged, so the
    /// resulting graph usually carries fewer than `edge_count` distinct
    /// edges. Repeated calls with the same arguments produce the same graph.
    ///
    /// # Arguments
    /// * `vertex_count` - Number of vertices.
    /// * `edge_count` - Number of edge samples to draw.
    /// * `seed` - Base seed for the per-sample RNG streams.
    ///
    /// # Returns
    /// * `Graph` - The generated graph.
    pub fn rmat(vertex_count: usize, edge_count: usize, seed: u64) -> Graph {
        if vertex_count == 0 {
            return Graph::new(0);
        }
        // Number of quadrant choices per sample: ceil(log2(vertex_count))
        let levels = usize::BITS - (vertex_count - 1).leading_zeros();

        let sampled: Vec<(u32, u32)> = (0..edge_count)
            .into_par_iter()
            .filter_map(|sample_index| {
                let mut rng = StdRng::seed_from_u64(stream_seed(seed, sample_index as u64));
                let mut src = 0usize;
                let mut dst = 0usize;
                for _ in 0..levels {
                    src <<= 1;
                    dst <<= 1;
                    let quadrant: f64 = rng.gen();
                    if quadrant < 0.5 {
                        // top-left quadrant, both bits stay clear
                    } else if quadrant < 0.6 {
                        dst |= 1;
                    } else if quadrant < 0.7 {
                        src |= 1;
                    } else {
                        src |= 1;
                        dst |= 1;
                    }
                }
                if src == dst || src >= vertex_count || dst >= vertex_count {
                    return None;
                }
                Some(if src < dst {
                    (src as u32, dst as u32)
                } else {
                    (dst as u32, src as u32)
                })
            })
            .collect();

        let edge_set: FxHashSet<(u32, u32)> = sampled.into_iter().collect();
        let edges: Vec<(u32, u32)> = edge_set.into_iter().collect();
        Graph::from_edges(vertex_count, &edges)
    }

    /// Returns the neighbor list of `vertex` as a slice.
    pub fn neighbors(&self, vertex: u32) -> &[u32] {
        &self.neighbor_lists[vertex as usize]
    }

    /// Returns the degree of `vertex`.
    pub fn degree(&self, vertex: u32) -> usize {
        self.neighbor_lists[vertex as usize].len()
    }

    /// Returns the number of undirected edges in the graph.
    pub fn edge_count(&self) -> usize {
        let directed: usize = self.neighbor_lists.iter().map(Vec::len).sum();
        directed / 2
    }

    /// Returns the largest vertex degree, or 0 for an empty graph.
    pub fn max_degree(&self) -> usize {
        self.neighbor_lists.iter().map(Vec::len).max().unwrap_or(0)
    }
}
