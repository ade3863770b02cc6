//! Network algorithms.
//!
//! This module provides the solvers that run on a [`ForwardStar`](crate::ForwardStar):
//! - [`dijkstra`]: Single-source shortest paths
//! - [`pagerank`]: Stochastic ranking by power iteration
//! - [`search`]: Breadth-first and depth-first search

pub mod dijkstra;
pub mod pagerank;
pub mod search;

pub use dijkstra::{shortest_paths, shortest_paths_batch, DijkstraConfig, ShortestPaths};
pub use pagerank::{pagerank, PageRank, PageRankConfig};
pub use search::{breadth_first_search, depth_first_search, SearchResult};
