//! Dijkstra's shortest path algorithm.
//!
//! Label-setting single-source shortest paths over non-negative arc costs.
//! Every node is settled at most once, in non-decreasing distance order.
//! Equal distances are settled by ascending node id, so results are
//! reproducible run to run.
//!
//! Negative costs are rejected before any label is touched: the forward star
//! records its first negative arc at build time, so the check is O(1).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rayon::prelude::*;

use super::search::reconstruct_path;
use crate::models::{Cost, ForwardStar, NodeId};
use crate::{GraphError, Result};

/// Priority structure used to pick the next node to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DijkstraStrategy {
    /// Binary heap with lazy deletion, O((N + E) log N).
    #[default]
    BinaryHeap,
    /// Linear scan over unsettled labels, O(N^2). Suited to dense graphs.
    Scan,
}

/// Dijkstra configuration.
#[derive(Debug, Clone, Default)]
pub struct DijkstraConfig {
    /// Node selection strategy.
    pub strategy: DijkstraStrategy,
}

impl DijkstraConfig {
    /// Create new Dijkstra configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set node selection strategy.
    pub fn with_strategy(mut self, strategy: DijkstraStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Distance and predecessor labels from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    source: NodeId,
    distances: Vec<Cost>,
    predecessors: Vec<NodeId>,
    settled: Vec<NodeId>,
}

impl ShortestPaths {
    /// Source node of this run.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Distance labels, `f64::INFINITY` for unreachable nodes.
    pub fn distances(&self) -> &[Cost] {
        &self.distances
    }

    /// Predecessor labels, `NodeId::INVALID` for the source and unreachable nodes.
    pub fn predecessors(&self) -> &[NodeId] {
        &self.predecessors
    }

    /// Nodes in the order they were settled.
    pub fn settled(&self) -> &[NodeId] {
        &self.settled
    }

    /// Shortest distance to `node`, `None` if unreachable or out of range.
    pub fn distance(&self, node: NodeId) -> Option<Cost> {
        self.distances
            .get(node.index())
            .copied()
            .filter(|d| *d < Cost::INFINITY)
    }

    /// Preceding node on a shortest path to `node`.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessors
            .get(node.index())
            .copied()
            .filter(NodeId::is_valid)
    }

    /// Check if `node` is reachable from the source.
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_some()
    }

    /// Number of reachable nodes, the source included.
    pub fn reachable_count(&self) -> usize {
        self.settled.len()
    }

    /// Shortest path from the source to `target`.
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        reconstruct_path(&self.predecessors, self.source, target)
    }
}

/// Heap entry, ordered by distance then node id.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    distance: Cost,
    node: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Shortest paths from `source` using a binary heap.
///
/// # Errors
///
/// - [`GraphError::SourceOutOfRange`] if `source` is not a node of `graph`
/// - [`GraphError::NegativeCost`] if any arc of `graph` has a negative cost
pub fn shortest_paths(graph: &ForwardStar, source: NodeId) -> Result<ShortestPaths> {
    shortest_paths_with_config(graph, source, &DijkstraConfig::default())
}

/// Shortest paths with configuration.
pub fn shortest_paths_with_config(
    graph: &ForwardStar,
    source: NodeId,
    config: &DijkstraConfig,
) -> Result<ShortestPaths> {
    if !graph.contains(source) {
        return Err(GraphError::SourceOutOfRange {
            node: source.0,
            node_count: graph.node_count(),
        });
    }

    if let Some(arc) = graph.first_negative_arc() {
        return Err(GraphError::NegativeCost {
            tail: arc.tail.0,
            head: arc.head.0,
            cost: arc.cost,
        });
    }

    let paths = match config.strategy {
        DijkstraStrategy::BinaryHeap => heap_dijkstra(graph, source)?,
        DijkstraStrategy::Scan => scan_dijkstra(graph, source)?,
    };

    tracing::debug!(
        source = source.0,
        strategy = ?config.strategy,
        reachable = paths.reachable_count(),
        "dijkstra finished"
    );

    Ok(paths)
}

/// Independent shortest-path runs from each source, in parallel.
///
/// Results are returned in the order of `sources`. Fails if any run fails.
pub fn shortest_paths_batch(graph: &ForwardStar, sources: &[NodeId]) -> Result<Vec<ShortestPaths>> {
    sources
        .par_iter()
        .map(|&source| shortest_paths(graph, source))
        .collect()
}

fn heap_dijkstra(graph: &ForwardStar, source: NodeId) -> Result<ShortestPaths> {
    let n = graph.node_count();
    let mut distances = vec![Cost::INFINITY; n];
    let mut predecessors = vec![NodeId::INVALID; n];
    let mut is_settled = vec![false; n];
    let mut settled = Vec::new();
    let mut heap = BinaryHeap::new();

    distances[source.index()] = 0.0;
    heap.push(Reverse(HeapEntry {
        distance: 0.0,
        node: source,
    }));

    while let Some(Reverse(entry)) = heap.pop() {
        let u = entry.node.index();
        // Stale entry
        if is_settled[u] || entry.distance > distances[u] {
            continue;
        }

        is_settled[u] = true;
        settled.push(entry.node);

        for arc in graph.outgoing_arcs(entry.node)? {
            let v = arc.head.index();
            if is_settled[v] {
                continue;
            }
            let candidate = entry.distance + arc.cost;
            if candidate < distances[v] {
                distances[v] = candidate;
                predecessors[v] = entry.node;
                heap.push(Reverse(HeapEntry {
                    distance: candidate,
                    node: arc.head,
                }));
            }
        }
    }

    Ok(ShortestPaths {
        source,
        distances,
        predecessors,
        settled,
    })
}

fn scan_dijkstra(graph: &ForwardStar, source: NodeId) -> Result<ShortestPaths> {
    let n = graph.node_count();
    let mut distances = vec![Cost::INFINITY; n];
    let mut predecessors = vec![NodeId::INVALID; n];
    let mut is_settled = vec![false; n];
    let mut settled = Vec::new();

    distances[source.index()] = 0.0;

    loop {
        // Smallest finite label, lowest id on ties
        let mut next: Option<usize> = None;
        for v in 0..n {
            if is_settled[v] || distances[v] == Cost::INFINITY {
                continue;
            }
            if next.map_or(true, |best| distances[v] < distances[best]) {
                next = Some(v);
            }
        }
        let Some(u) = next else {
            break;
        };

        is_settled[u] = true;
        let node = NodeId(u as u32);
        settled.push(node);

        for arc in graph.outgoing_arcs(node)? {
            let v = arc.head.index();
            if is_settled[v] {
                continue;
            }
            let candidate = distances[u] + arc.cost;
            if candidate < distances[v] {
                distances[v] = candidate;
                predecessors[v] = node;
            }
        }
    }

    Ok(ShortestPaths {
        source,
        distances,
        predecessors,
        settled,
    })
}
