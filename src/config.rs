/// Buffer size (in bytes) used when reading graph files from disk.
pub const READ_BUFFER_SIZE: usize = 1 << 20;

/// Sentinel stored in a cluster-label slot that no cluster has claimed yet.
///
/// Reserving `u32::MAX` caps the supported graph size at `u32::MAX - 1`
/// vertices, which is also the largest id the edge-list loader accepts.
pub const UNSET_LABEL: u32 = u32::MAX;

/// Default rate parameter of the exponential shift distribution.
///
/// Smaller values produce larger (and fewer) clusters per decomposition
/// round; larger values produce more rounds of smaller clusters.
pub const DEFAULT_BETA: f64 = 0.5;

/// Default base seed for all randomized stages.
pub const DEFAULT_SEED: u64 = 0;
