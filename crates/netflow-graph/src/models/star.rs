//! Compact forward-star network representation.
//!
//! The forward star stores every arc in one contiguous array grouped by tail
//! node, which gives:
//! - O(1) access to the arc range of a node
//! - O(out-degree) iteration over outgoing arcs
//! - a single allocation per attribute and sequential access patterns
//!
//! Memory layout:
//! - `point[v]` = index of the first outgoing arc of node v
//! - `head[point[v]..point[v+1]]` = heads of the outgoing arcs of v
//! - `costs`, `capacities` = arc attributes, parallel to `head`
//! - `rpoint[v]` / `trace[rpoint[v]..rpoint[v+1]]` = reverse star, the arc
//!   indices of the incoming arcs of v
//!
//! See Ahuja, Magnanti, Orlin: "Network Flows", section 2.2.

use std::ops::Range;

use super::node::{Capacity, Cost, NodeId};
use crate::{GraphError, Result};

/// Arc record yielded by the adjacency iterators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRef {
    /// Position of the arc in the forward-star arc array.
    pub index: usize,
    /// Tail (source) node.
    pub tail: NodeId,
    /// Head (target) node.
    pub head: NodeId,
    /// Arc cost.
    pub cost: Cost,
    /// Arc capacity.
    pub capacity: Capacity,
}

/// Immutable network in compact forward-star form.
///
/// For a network with N nodes and M arcs:
/// - `point`: N+1 elements, non-decreasing, `point[N] == M`
/// - `tail`, `head`, `costs`, `capacities`: M elements in tail order
/// - `rpoint`: N+1 elements, `trace`: M arc indices in head order
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardStar {
    node_count: usize,
    point: Vec<usize>,
    tail: Vec<u32>,
    head: Vec<u32>,
    costs: Vec<Cost>,
    capacities: Vec<Capacity>,
    rpoint: Vec<usize>,
    trace: Vec<usize>,
    cost_sum: Cost,
    first_negative: Option<usize>,
}

impl ForwardStar {
    /// Network with `node_count` isolated nodes.
    pub fn empty(node_count: usize) -> Result<Self> {
        ForwardStarBuilder::new(node_count).build()
    }

    /// Create a network from unweighted arcs (cost and capacity `0.0`).
    ///
    /// # Example
    ///
    /// ```
    /// use netflow_graph::ForwardStar;
    ///
    /// // 0 -> 1 -> 2
    /// let star = ForwardStar::from_arcs(3, &[(0, 1), (1, 2)]).unwrap();
    /// assert_eq!(star.arc_count(), 2);
    /// ```
    pub fn from_arcs(node_count: usize, arcs: &[(u32, u32)]) -> Result<Self> {
        ForwardStarBuilder::new(node_count).with_arcs(arcs).build()
    }

    /// Create a network from `(from, to, cost)` arcs.
    pub fn from_weighted_arcs(node_count: usize, arcs: &[(u32, u32, Cost)]) -> Result<Self> {
        ForwardStarBuilder::new(node_count)
            .with_weighted_arcs(arcs)
            .build()
    }

    /// Create a network from `(from, to, cost, capacity)` records.
    pub fn from_arc_records(
        node_count: usize,
        arcs: &[(u32, u32, Cost, Capacity)],
    ) -> Result<Self> {
        let mut builder = ForwardStarBuilder::new(node_count);
        for &(from, to, cost, cap) in arcs {
            builder.add_arc_with(from, to, Some(cost), Some(cap));
        }
        builder.build()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of arcs.
    pub fn arc_count(&self) -> usize {
        self.head.len()
    }

    /// Check if the network has no arcs.
    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }

    /// All node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count as u32).map(NodeId)
    }

    /// Check that `node` is a node of this network.
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count
    }

    fn check_node(&self, node: NodeId) -> Result<usize> {
        if self.contains(node) {
            Ok(node.index())
        } else {
            Err(GraphError::NodeOutOfRange {
                node: node.0,
                node_count: self.node_count,
            })
        }
    }

    fn arc_range(&self, node: usize) -> Range<usize> {
        self.point[node]..self.point[node + 1]
    }

    fn arc_at(&self, index: usize) -> ArcRef {
        ArcRef {
            index,
            tail: NodeId(self.tail[index]),
            head: NodeId(self.head[index]),
            cost: self.costs[index],
            capacity: self.capacities[index],
        }
    }

    /// Outgoing arcs of `node` in insertion order.
    ///
    /// The iterator is lazy and cheap to clone. Each call starts a fresh pass.
    pub fn outgoing_arcs(&self, node: NodeId) -> Result<OutgoingArcs<'_>> {
        let v = self.check_node(node)?;
        Ok(OutgoingArcs {
            star: self,
            range: self.arc_range(v),
        })
    }

    /// Incoming arcs of `node`, ordered by arc index.
    pub fn incoming_arcs(&self, node: NodeId) -> Result<IncomingArcs<'_>> {
        let v = self.check_node(node)?;
        Ok(IncomingArcs {
            star: self,
            positions: self.trace[self.rpoint[v]..self.rpoint[v + 1]].iter(),
        })
    }

    /// Heads of the outgoing arcs of `node`.
    pub fn neighbors(&self, node: NodeId) -> Result<&[u32]> {
        let v = self.check_node(node)?;
        Ok(&self.head[self.arc_range(v)])
    }

    /// Number of outgoing arcs of `node`.
    pub fn out_degree(&self, node: NodeId) -> Result<usize> {
        let v = self.check_node(node)?;
        Ok(self.point[v + 1] - self.point[v])
    }

    /// Number of incoming arcs of `node`.
    pub fn in_degree(&self, node: NodeId) -> Result<usize> {
        let v = self.check_node(node)?;
        Ok(self.rpoint[v + 1] - self.rpoint[v])
    }

    /// Arc at position `index` of the arc array.
    pub fn arc(&self, index: usize) -> Option<ArcRef> {
        (index < self.arc_count()).then(|| self.arc_at(index))
    }

    /// Index of the first arc `from -> to`, if any.
    pub fn arc_index(&self, from: NodeId, to: NodeId) -> Option<usize> {
        if !self.contains(from) {
            return None;
        }
        self.arc_range(from.index())
            .find(|&index| self.head[index] == to.0)
    }

    /// Check if an arc `from -> to` exists.
    pub fn has_arc(&self, from: NodeId, to: NodeId) -> bool {
        self.arc_index(from, to).is_some()
    }

    /// Cost of the first arc `from -> to`.
    pub fn cost(&self, from: NodeId, to: NodeId) -> Option<Cost> {
        self.arc_index(from, to).map(|index| self.costs[index])
    }

    /// Capacity of the first arc `from -> to`.
    pub fn capacity(&self, from: NodeId, to: NodeId) -> Option<Capacity> {
        self.arc_index(from, to).map(|index| self.capacities[index])
    }

    /// Sum of all arc costs.
    pub fn total_cost(&self) -> Cost {
        self.cost_sum
    }

    /// First arc (in arc-array order) with a negative cost.
    pub fn first_negative_arc(&self) -> Option<ArcRef> {
        self.first_negative.map(|index| self.arc_at(index))
    }

    /// Validate the forward-star structure.
    pub fn validate(&self) -> Result<()> {
        let n = self.node_count;
        let m = self.head.len();

        for (name, pointer) in [("point", &self.point), ("rpoint", &self.rpoint)] {
            if pointer.len() != n + 1 {
                return Err(GraphError::InvalidStar(format!(
                    "{} length {} != node_count + 1 = {}",
                    name,
                    pointer.len(),
                    n + 1
                )));
            }
            if pointer.windows(2).any(|w| w[0] > w[1]) {
                return Err(GraphError::InvalidStar(format!("{} not monotonic", name)));
            }
            if pointer[0] != 0 || pointer[n] != m {
                return Err(GraphError::InvalidStar(format!(
                    "{} does not span 0..{}",
                    name, m
                )));
            }
        }

        if self.tail.len() != m
            || self.costs.len() != m
            || self.capacities.len() != m
            || self.trace.len() != m
        {
            return Err(GraphError::InvalidStar(
                "arc attribute arrays differ in length".to_string(),
            ));
        }

        for v in 0..n {
            for index in self.arc_range(v) {
                if self.tail[index] as usize != v {
                    return Err(GraphError::InvalidStar(format!(
                        "arc {} stored in range of node {} but has tail {}",
                        index, v, self.tail[index]
                    )));
                }
                if self.head[index] as usize >= n {
                    return Err(GraphError::InvalidStar(format!(
                        "head {} >= node_count {}",
                        self.head[index], n
                    )));
                }
            }
            for &index in &self.trace[self.rpoint[v]..self.rpoint[v + 1]] {
                if index >= m || self.head[index] as usize != v {
                    return Err(GraphError::InvalidStar(format!(
                        "trace entry {} is not an incoming arc of node {}",
                        index, v
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Lazy iterator over the outgoing arcs of one node.
#[derive(Debug, Clone)]
pub struct OutgoingArcs<'a> {
    star: &'a ForwardStar,
    range: Range<usize>,
}

impl Iterator for OutgoingArcs<'_> {
    type Item = ArcRef;

    fn next(&mut self) -> Option<ArcRef> {
        self.range.next().map(|index| self.star.arc_at(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for OutgoingArcs<'_> {}

/// Lazy iterator over the incoming arcs of one node.
#[derive(Debug, Clone)]
pub struct IncomingArcs<'a> {
    star: &'a ForwardStar,
    positions: std::slice::Iter<'a, usize>,
}

impl Iterator for IncomingArcs<'_> {
    type Item = ArcRef;

    fn next(&mut self) -> Option<ArcRef> {
        self.positions.next().map(|&index| self.star.arc_at(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for IncomingArcs<'_> {}

/// Builder for forward-star networks.
///
/// Arcs may be added in any order; `build` groups them by tail with a stable
/// counting sort, so arcs of the same tail keep their insertion order.
#[derive(Debug, Default)]
pub struct ForwardStarBuilder {
    node_count: usize,
    arcs: Vec<(u32, u32, Option<Cost>, Option<Capacity>)>,
    require_arcs: bool,
}

impl ForwardStarBuilder {
    /// Create new builder with given number of nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            arcs: Vec::new(),
            require_arcs: false,
        }
    }

    /// Create new builder with room for `arcs` arcs.
    pub fn with_capacity(node_count: usize, arcs: usize) -> Self {
        Self {
            node_count,
            arcs: Vec::with_capacity(arcs),
            require_arcs: false,
        }
    }

    /// Fail the build with [`GraphError::EmptyInput`] if no arc is added.
    pub fn require_arcs(mut self) -> Self {
        self.require_arcs = true;
        self
    }

    /// Add unweighted arcs from slice.
    pub fn with_arcs(mut self, arcs: &[(u32, u32)]) -> Self {
        for &(from, to) in arcs {
            self.arcs.push((from, to, None, None));
        }
        self
    }

    /// Add weighted arcs from slice.
    pub fn with_weighted_arcs(mut self, arcs: &[(u32, u32, Cost)]) -> Self {
        for &(from, to, cost) in arcs {
            self.arcs.push((from, to, Some(cost), None));
        }
        self
    }

    /// Add a single arc.
    pub fn add_arc(&mut self, from: u32, to: u32) {
        self.arcs.push((from, to, None, None));
    }

    /// Add a weighted arc.
    pub fn add_weighted_arc(&mut self, from: u32, to: u32, cost: Cost) {
        self.arcs.push((from, to, Some(cost), None));
    }

    /// Add an arc with optional cost and capacity.
    pub fn add_arc_with(
        &mut self,
        from: u32,
        to: u32,
        cost: Option<Cost>,
        capacity: Option<Capacity>,
    ) {
        self.arcs.push((from, to, cost, capacity));
    }

    /// Number of arcs added so far.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Build the forward star.
    pub fn build(self) -> Result<ForwardStar> {
        let n = self.node_count;
        if n > u32::MAX as usize {
            return Err(GraphError::InvalidNodeCount(n));
        }
        if self.require_arcs && self.arcs.is_empty() {
            return Err(GraphError::EmptyInput);
        }

        for &(from, to, cost, cap) in &self.arcs {
            if from as usize >= n || to as usize >= n {
                return Err(GraphError::InvalidArc {
                    from,
                    to,
                    node_count: n,
                });
            }
            if cost.is_some_and(f64::is_nan) {
                return Err(GraphError::InvalidWeight {
                    from,
                    to,
                    reason: "cost is NaN".to_string(),
                });
            }
            if let Some(cap) = cap {
                if cap.is_nan() || cap < 0.0 {
                    return Err(GraphError::InvalidWeight {
                        from,
                        to,
                        reason: format!("capacity {} is not a non-negative number", cap),
                    });
                }
            }
        }

        let m = self.arcs.len();

        // Out-degree counts, then prefix sums
        let mut point = vec![0usize; n + 1];
        let mut rpoint = vec![0usize; n + 1];
        for &(from, to, _, _) in &self.arcs {
            point[from as usize + 1] += 1;
            rpoint[to as usize + 1] += 1;
        }
        for i in 1..=n {
            point[i] += point[i - 1];
            rpoint[i] += rpoint[i - 1];
        }

        // Stable placement by tail
        let mut next = point.clone();
        let mut tail = vec![0u32; m];
        let mut head = vec![0u32; m];
        let mut costs = vec![0.0; m];
        let mut capacities = vec![0.0; m];
        for &(from, to, cost, cap) in &self.arcs {
            let slot = &mut next[from as usize];
            tail[*slot] = from;
            head[*slot] = to;
            costs[*slot] = cost.unwrap_or(0.0);
            capacities[*slot] = cap.unwrap_or(0.0);
            *slot += 1;
        }

        // Reverse star, in arc-index order per head
        let mut next = rpoint.clone();
        let mut trace = vec![0usize; m];
        for (index, &to) in head.iter().enumerate() {
            let slot = &mut next[to as usize];
            trace[*slot] = index;
            *slot += 1;
        }

        let cost_sum = costs.iter().sum();
        let first_negative = costs.iter().position(|&c| c < 0.0);

        tracing::debug!(
            nodes = n,
            arcs = m,
            negative_costs = first_negative.is_some(),
            "built forward star"
        );

        Ok(ForwardStar {
            node_count: n,
            point,
            tail,
            head,
            costs,
            capacities,
            rpoint,
            trace,
            cost_sum,
            first_negative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample network from Ahuja, Magnanti, Orlin, figure 2.2.
    fn sample_network() -> ForwardStar {
        ForwardStar::from_arc_records(
            5,
            &[
                (0, 1, 25.0, 30.0),
                (0, 2, 35.0, 50.0),
                (1, 3, 15.0, 40.0),
                (2, 1, 45.0, 10.0),
                (3, 2, 15.0, 30.0),
                (3, 4, 45.0, 60.0),
                (4, 2, 25.0, 20.0),
                (4, 3, 35.0, 50.0),
            ],
        )
        .unwrap()
    }

    fn heads(star: &ForwardStar, node: u32) -> Vec<u32> {
        star.outgoing_arcs(NodeId(node))
            .unwrap()
            .map(|arc| arc.head.0)
            .collect()
    }

    #[test]
    fn test_empty_star() {
        let star = ForwardStar::empty(5).unwrap();
        assert_eq!(star.node_count(), 5);
        assert_eq!(star.arc_count(), 0);
        assert!(star.is_empty());
        assert_eq!(star.point, vec![0; 6]);
        assert!(star.validate().is_ok());
        assert_eq!(star.outgoing_arcs(NodeId(4)).unwrap().count(), 0);
    }

    #[test]
    fn test_sample_network_layout() {
        let star = sample_network();

        assert_eq!(star.point, vec![0, 2, 3, 4, 6, 8]);
        assert_eq!(star.rpoint, vec![0, 0, 2, 5, 7, 8]);
        assert_eq!(star.tail, vec![0, 0, 1, 2, 3, 3, 4, 4]);
        assert_eq!(star.head, vec![1, 2, 3, 1, 2, 4, 2, 3]);
        assert_eq!(star.trace, vec![0, 3, 1, 4, 6, 2, 7, 5]);
        assert_eq!(star.total_cost(), 240.0);
        assert!(star.validate().is_ok());
    }

    #[test]
    fn test_adjacency() {
        let star = sample_network();

        assert_eq!(heads(&star, 0), vec![1, 2]);
        assert_eq!(heads(&star, 1), vec![3]);
        assert_eq!(heads(&star, 2), vec![1]);
        assert_eq!(heads(&star, 3), vec![2, 4]);
        assert_eq!(heads(&star, 4), vec![2, 3]);
        assert_eq!(star.neighbors(NodeId(3)).unwrap(), &[2, 4]);
    }

    #[test]
    fn test_incoming_arcs() {
        let star = sample_network();

        let tails: Vec<u32> = star
            .incoming_arcs(NodeId(2))
            .unwrap()
            .map(|arc| arc.tail.0)
            .collect();
        assert_eq!(tails, vec![0, 3, 4]);
        assert_eq!(star.in_degree(NodeId(0)).unwrap(), 0);
        assert_eq!(star.in_degree(NodeId(1)).unwrap(), 2);
    }

    #[test]
    fn test_lookup() {
        let star = sample_network();

        assert_eq!(star.arc_index(NodeId(3), NodeId(4)), Some(5));
        assert_eq!(star.cost(NodeId(4), NodeId(3)), Some(35.0));
        assert_eq!(star.capacity(NodeId(1), NodeId(3)), Some(40.0));
        assert_eq!(star.cost(NodeId(1), NodeId(0)), None);
        assert!(star.has_arc(NodeId(0), NodeId(2)));
        assert!(!star.has_arc(NodeId(2), NodeId(0)));
        assert!(!star.has_arc(NodeId(9), NodeId(0)));
    }

    #[test]
    fn test_unsorted_input_keeps_insertion_order() {
        let star = ForwardStar::from_weighted_arcs(
            3,
            &[(2, 0, 1.0), (0, 2, 2.0), (2, 1, 3.0), (0, 1, 4.0)],
        )
        .unwrap();

        assert_eq!(heads(&star, 0), vec![2, 1]);
        assert_eq!(heads(&star, 2), vec![0, 1]);
        assert_eq!(star.point, vec![0, 2, 2, 4]);
        let costs: Vec<f64> = star
            .outgoing_arcs(NodeId(2))
            .unwrap()
            .map(|arc| arc.cost)
            .collect();
        assert_eq!(costs, vec![1.0, 3.0]);
    }

    #[test]
    fn test_trailing_isolated_nodes() {
        let star = ForwardStar::from_weighted_arcs(
            6,
            &[
                (0, 1, 6.0),
                (0, 2, 4.0),
                (1, 2, 2.0),
                (1, 3, 2.0),
                (2, 3, 1.0),
                (2, 4, 2.0),
                (3, 5, 7.0),
                (4, 3, 1.0),
                (4, 5, 3.0),
            ],
        )
        .unwrap();

        assert_eq!(star.node_count(), 6);
        assert_eq!(star.point, vec![0, 2, 4, 6, 7, 9, 9]);
    }

    #[test]
    fn test_parallel_arcs_and_self_loops() {
        let star = ForwardStar::from_weighted_arcs(2, &[(0, 1, 3.0), (0, 1, 1.0), (1, 1, 0.5)])
            .unwrap();

        assert_eq!(star.out_degree(NodeId(0)).unwrap(), 2);
        // Lookup returns the first arc
        assert_eq!(star.cost(NodeId(0), NodeId(1)), Some(3.0));
        assert_eq!(star.in_degree(NodeId(1)).unwrap(), 3);
    }

    #[test]
    fn test_iterator_is_restartable() {
        let star = sample_network();
        let arcs = star.outgoing_arcs(NodeId(0)).unwrap();
        assert_eq!(arcs.len(), 2);

        let first: Vec<ArcRef> = arcs.clone().collect();
        let second: Vec<ArcRef> = arcs.collect();
        assert_eq!(first, second);
        assert_eq!(first[0].tail, NodeId(0));
        assert_eq!(first[1].capacity, 50.0);
    }

    #[test]
    fn test_invalid_arc() {
        let result = ForwardStar::from_arcs(3, &[(0, 1), (1, 3)]);
        assert_eq!(
            result,
            Err(GraphError::InvalidArc {
                from: 1,
                to: 3,
                node_count: 3
            })
        );

        let result = ForwardStar::from_arcs(3, &[(5, 0)]);
        assert!(matches!(result, Err(GraphError::InvalidArc { from: 5, .. })));
    }

    #[test]
    fn test_invalid_weights() {
        let nan_cost = ForwardStar::from_weighted_arcs(2, &[(0, 1, f64::NAN)]);
        assert!(matches!(nan_cost, Err(GraphError::InvalidWeight { .. })));

        let negative_cap = ForwardStar::from_arc_records(2, &[(0, 1, 1.0, -1.0)]);
        assert!(matches!(negative_cap, Err(GraphError::InvalidWeight { .. })));

        // Negative costs are allowed in the store
        let negative_cost = ForwardStar::from_weighted_arcs(2, &[(0, 1, -1.0)]).unwrap();
        let arc = negative_cost.first_negative_arc().unwrap();
        assert_eq!((arc.tail, arc.head, arc.cost), (NodeId(0), NodeId(1), -1.0));
    }

    #[test]
    fn test_required_arcs() {
        let result = ForwardStarBuilder::new(3).require_arcs().build();
        assert_eq!(result, Err(GraphError::EmptyInput));

        let mut builder = ForwardStarBuilder::with_capacity(3, 1).require_arcs();
        builder.add_arc(0, 1);
        assert_eq!(builder.arc_count(), 1);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_node_out_of_range() {
        let star = sample_network();
        let err = star.outgoing_arcs(NodeId(5)).unwrap_err();
        assert_eq!(
            err,
            GraphError::NodeOutOfRange {
                node: 5,
                node_count: 5
            }
        );
        assert!(star.out_degree(NodeId::INVALID).is_err());
        assert!(star.incoming_arcs(NodeId(7)).is_err());
    }

    #[test]
    fn test_arc_access() {
        let star = sample_network();
        let arc = star.arc(3).unwrap();
        assert_eq!((arc.tail, arc.head), (NodeId(2), NodeId(1)));
        assert!(star.arc(8).is_none());
    }

    #[test]
    fn test_validation_detects_corruption() {
        let mut star = sample_network();
        star.point[2] = 1;
        assert!(matches!(star.validate(), Err(GraphError::InvalidStar(_))));

        let mut star = sample_network();
        star.trace.swap(1, 2);
        assert!(star.validate().is_err());
    }

    #[test]
    fn test_star_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForwardStar>();
    }
}
