//! Graph search.
//!
//! Generic search from a start node: a node is taken from the frontier, one
//! of its unvisited heads is marked and pushed, and the node leaves the
//! frontier once all its arcs are exhausted. A FIFO frontier gives
//! breadth-first search, a LIFO frontier depth-first search.
//!
//! Each node keeps a cursor into its arc range so every arc is examined once,
//! giving O(N + E) for both orders.

use std::collections::VecDeque;

use crate::models::{ForwardStar, NodeId};
use crate::{GraphError, Result};

/// Predecessor tree and visit order of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Predecessor of each node in the search tree, `NodeId::INVALID` for
    /// the start node and unvisited nodes.
    pub predecessors: Vec<NodeId>,
    /// Visited nodes in the order they were marked, start node first.
    pub order: Vec<NodeId>,
}

impl SearchResult {
    /// Check if `node` was reached by the search.
    pub fn is_visited(&self, node: NodeId) -> bool {
        self.order.first() == Some(&node)
            || self
                .predecessors
                .get(node.index())
                .is_some_and(NodeId::is_valid)
    }

    /// Position of `node` in the visit order.
    pub fn visit_index(&self, node: NodeId) -> Option<usize> {
        self.order.iter().position(|&n| n == node)
    }
}

/// Frontier discipline of a search.
trait Frontier {
    fn push(&mut self, node: NodeId);
    fn peek(&self) -> Option<NodeId>;
    fn pop(&mut self);
}

/// FIFO frontier.
struct Queue(VecDeque<NodeId>);

impl Frontier for Queue {
    fn push(&mut self, node: NodeId) {
        self.0.push_back(node);
    }

    fn peek(&self) -> Option<NodeId> {
        self.0.front().copied()
    }

    fn pop(&mut self) {
        self.0.pop_front();
    }
}

/// LIFO frontier.
struct Stack(Vec<NodeId>);

impl Frontier for Stack {
    fn push(&mut self, node: NodeId) {
        self.0.push(node);
    }

    fn peek(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

/// Breadth-first search from `start`.
///
/// # Example
///
/// ```
/// use netflow_graph::{breadth_first_search, ForwardStar, NodeId};
///
/// let graph = ForwardStar::from_arcs(4, &[(0, 1), (0, 2), (1, 3)]).unwrap();
/// let result = breadth_first_search(&graph, NodeId(0)).unwrap();
/// assert_eq!(result.order, vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
/// assert_eq!(result.predecessors[3], NodeId(1));
/// ```
pub fn breadth_first_search(graph: &ForwardStar, start: NodeId) -> Result<SearchResult> {
    let mut queue = Queue(VecDeque::with_capacity(graph.node_count()));
    search(graph, &mut queue, start)
}

/// Depth-first search from `start`.
pub fn depth_first_search(graph: &ForwardStar, start: NodeId) -> Result<SearchResult> {
    let mut stack = Stack(Vec::with_capacity(graph.node_count()));
    search(graph, &mut stack, start)
}

fn search<F: Frontier>(graph: &ForwardStar, frontier: &mut F, start: NodeId) -> Result<SearchResult> {
    if !graph.contains(start) {
        return Err(GraphError::SourceOutOfRange {
            node: start.0,
            node_count: graph.node_count(),
        });
    }

    let n = graph.node_count();
    let mut predecessors = vec![NodeId::INVALID; n];
    let mut marked = vec![false; n];
    let mut cursor = vec![0usize; n];
    let mut order = Vec::new();

    marked[start.index()] = true;
    order.push(start);
    frontier.push(start);

    while let Some(node) = frontier.peek() {
        let i = node.index();
        let heads = graph.neighbors(node)?;

        // Advance past already marked heads
        while cursor[i] < heads.len() && marked[heads[cursor[i]] as usize] {
            cursor[i] += 1;
        }

        match heads.get(cursor[i]) {
            Some(&head) => {
                let j = head as usize;
                marked[j] = true;
                predecessors[j] = node;
                order.push(NodeId(head));
                frontier.push(NodeId(head));
            }
            None => frontier.pop(),
        }
    }

    tracing::trace!(start = start.0, visited = order.len(), "search finished");

    Ok(SearchResult {
        predecessors,
        order,
    })
}

/// Reconstruct the path from `source` to `target` using predecessor labels.
///
/// Returns `None` if `target` is out of range or was not reached.
pub fn reconstruct_path(
    predecessors: &[NodeId],
    source: NodeId,
    target: NodeId,
) -> Option<Vec<NodeId>> {
    if target.index() >= predecessors.len() {
        return None;
    }
    if target == source {
        return Some(vec![source]);
    }
    if !predecessors[target.index()].is_valid() {
        return None;
    }

    let mut path = vec![target];
    let mut current = target;

    // Walk back to source; a tree has at most len - 1 edges on any path
    while current != source {
        if path.len() > predecessors.len() {
            return None;
        }
        current = *predecessors.get(current.index())?;
        if !current.is_valid() {
            return None;
        }
        path.push(current);
    }

    path.reverse();
    Some(path)
}
