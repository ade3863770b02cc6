//! Network algorithms on a compact forward-star graph representation.
//!
//! This crate provides a static, cache-friendly graph store and the solvers
//! that operate on it:
//!
//! - **Forward Star**: all arcs in one contiguous array grouped by tail node
//! - **Dijkstra**: single-source shortest paths over non-negative costs
//! - **PageRank**: power iteration with teleportation and dead-end handling
//! - **Search**: breadth-first and depth-first predecessor trees
//!
//! The store is immutable once built, so any number of solver runs may share
//! it by reference. Each run owns its own labels, heaps and rank vectors.
//!
//! # Example
//!
//! ```
//! use netflow_graph::{shortest_paths, ForwardStar, NodeId};
//!
//! // 0 -> 1 -> 2, plus an expensive shortcut 0 -> 2
//! let graph = ForwardStar::from_weighted_arcs(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)])?;
//!
//! let paths = shortest_paths(&graph, NodeId(0))?;
//! assert_eq!(paths.distance(NodeId(2)), Some(2.0));
//! assert_eq!(paths.predecessor(NodeId(2)), Some(NodeId(1)));
//! # Ok::<(), netflow_graph::GraphError>(())
//! ```

pub mod algorithms;
pub mod models;

// Re-export main types
pub use algorithms::dijkstra::{
    shortest_paths, shortest_paths_batch, shortest_paths_with_config, DijkstraConfig,
    DijkstraStrategy, ShortestPaths,
};
pub use algorithms::pagerank::{pagerank, Convergence, PageRank, PageRankConfig};
pub use algorithms::search::{
    breadth_first_search, depth_first_search, reconstruct_path, SearchResult,
};
pub use models::node::{Capacity, Cost, NodeId};
pub use models::star::{ArcRef, ForwardStar, ForwardStarBuilder, IncomingArcs, OutgoingArcs};

/// Graph algorithm error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Arc endpoint outside the node range.
    #[error("Invalid arc {from} -> {to}: node ids must be below {node_count}")]
    InvalidArc { from: u32, to: u32, node_count: usize },

    /// NaN cost, or NaN/negative capacity.
    #[error("Invalid weight on arc {from} -> {to}: {reason}")]
    InvalidWeight { from: u32, to: u32, reason: String },

    /// Node count does not fit the node id range.
    #[error("Invalid node count: {0}")]
    InvalidNodeCount(usize),

    /// Arcs were required but none were supplied.
    #[error("Empty input: no arcs supplied")]
    EmptyInput,

    /// Node id outside the node range.
    #[error("Node {node} out of range (node count {node_count})")]
    NodeOutOfRange { node: u32, node_count: usize },

    /// Source node outside the node range.
    #[error("Source node {node} out of range (node count {node_count})")]
    SourceOutOfRange { node: u32, node_count: usize },

    /// Negative arc cost reaching a label-setting solver.
    #[error("Negative cost {cost} on arc {tail} -> {head}")]
    NegativeCost { tail: u32, head: u32, cost: f64 },

    /// Teleportation probability outside (0, 1].
    #[error("Invalid teleport probability {0}: must be in (0.0, 1.0]")]
    InvalidTeleportProbability(f64),

    /// Convergence threshold not finite and positive.
    #[error("Invalid convergence tolerance {0}: must be finite and positive")]
    InvalidTolerance(f64),

    /// Iteration bound of zero.
    #[error("Invalid iteration limit: must be at least 1")]
    InvalidIterationLimit,

    /// Rank mass drifted away from 1.0.
    #[error("Rank mass invariant violated after iteration {iteration}: sum = {mass}")]
    RankMassInvariantViolated { iteration: usize, mass: f64 },

    /// Empty graph.
    #[error("Empty graph")]
    EmptyGraph,

    /// Invalid forward-star arrays.
    #[error("Invalid forward star: {0}")]
    InvalidStar(String),
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
