pub mod bfs_cc;
pub mod connectivity;
pub mod contract;
pub mod ldd;
pub mod relabel;
