use std::collections::HashSet;
use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use serde::{Deserialize, Serialize};

use parconn::algorithms::bfs_cc::bfs_connected_components;
use parconn::algorithms::connectivity::{
    ConnectedComponents, ConnectivityConfig, ConnectivityController,
};
use parconn::config::{DEFAULT_BETA, DEFAULT_SEED};
use parconn::measure_time;
use parconn::types::Graph;

#[derive(Parser, Debug, Serialize)]
#[command(author, version, about)]
struct Args {
    /// Path of an edge-list graph file; a synthetic R-MAT graph is
    /// generated when omitted.
    #[arg(short, long)]
    dataset: Option<String>,

    /// Vertex count of the synthetic graph (20x as many edge samples).
    #[arg(short = 'n', long, default_value_t = 100_000)]
    synthetic_vertices: usize,

    /// The task to be performed ("ldd" or "bfs").
    #[arg(short, long, default_value_t = String::from("ldd"))]
    task: String,

    /// Rate parameter of the decomposition.
    #[arg(short, long, default_value_t = DEFAULT_BETA)]
    beta: f64,

    /// Permute vertex order beyond the first recursion level.
    #[arg(short, long)]
    permute: bool,

    /// Number of worker threads (0 lets rayon size the pool).
    #[arg(short = 'j', long, default_value_t = 4)]
    num_threads: usize,

    /// Base seed for all randomized stages.
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of timed rounds.
    #[arg(short, long, default_value_t = 5)]
    rounds: usize,

    /// Optional YAML file overriding the task parameters.
    #[arg(short, long)]
    config: Option<String>,
}

/// Benchmark parameters loadable from a YAML file.
///
/// Every field is optional; present fields override the corresponding
/// command-line argument.
#[derive(Debug, Deserialize)]
struct BenchmarkConfig {
    task: Option<String>,
    beta: Option<f64>,
    permute: Option<bool>,
    num_threads: Option<usize>,
    seed: Option<u64>,
    rounds: Option<usize>,
}

fn main() {
    let mut args: Args = Args::parse();

    // Apply YAML overrides when a config file is given
    if let Some(config_path) = args.config.clone() {
        let config_file = File::open(&config_path).expect("Failed to open config file.");
        let overrides: BenchmarkConfig =
            serde_yaml::from_reader(config_file).expect("Config format error.");
        if let Some(task) = overrides.task {
            args.task = task;
        }
        if let Some(beta) = overrides.beta {
            args.beta = beta;
        }
        if let Some(permute) = overrides.permute {
            args.permute = permute;
        }
        if let Some(num_threads) = overrides.num_threads {
            args.num_threads = num_threads;
        }
        if let Some(seed) = overrides.seed {
            args.seed = seed;
        }
        if let Some(rounds) = overrides.rounds {
            args.rounds = rounds;
        }
    }

    // Step 1. Materialize the input graph.
    let graph = match &args.dataset {
        Some(path) => {
            println!("Load graph from {}.", path);
            Graph::from_graph_file(path)
        }
        None => {
            let vertex_count = args.synthetic_vertices;
            println!("Generate R-MAT graph with {} vertices.", vertex_count);
            Graph::rmat(vertex_count, 20 * vertex_count, args.seed)
        }
    };

    // Step 2. Print graph statistics.
    println!("Vertex Count: {}", graph.vertex_count);
    println!("Edge Count: {}", graph.edge_count());
    println!("Max Degree: {}", graph.max_degree());

    // Step 3. Perform the task, timing each round.
    let mut labels = Vec::new();
    if args.task == "ldd" {
        let controller = ConnectivityController::new(Arc::new(graph));
        let config = ConnectivityConfig {
            thread_num: args.num_threads,
            beta: args.beta,
            permute: args.permute,
            seed: args.seed,
        };
        for _ in 0..args.rounds {
            labels = measure_time!("LDD", {
                controller.connected_components(config.clone())
            });
        }
    } else if args.task == "bfs" {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(args.num_threads)
            .build()
            .unwrap();
        for _ in 0..args.rounds {
            labels = measure_time!("BFS", { pool.install(|| bfs_connected_components(&graph)) });
        }
    } else {
        println!("Task {} not supported in parconn.", args.task);
        return;
    }

    let component_count = labels.iter().collect::<HashSet<_>>().len();
    println!("Number of Connected Components: {}", component_count);
}
