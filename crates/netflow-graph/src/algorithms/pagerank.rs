//! PageRank by power iteration.
//!
//! Each iteration moves every node's rank along its outgoing arcs, split
//! evenly by out-degree. Rank held by dead ends (out-degree 0) is spread
//! uniformly over all nodes. With teleportation probability `beta`:
//!
//! ```text
//! new(u) = beta * (inbound(u) + dead_end_mass / n) + (1 - beta) / n
//! ```
//!
//! Arc costs and capacities are ignored. Convergence is measured in the L1
//! norm of the change between successive rank vectors.
//!
//! The rank vector must sum to 1 after every iteration. A drift beyond
//! [`MASS_TOLERANCE`] is reported as [`GraphError::RankMassInvariantViolated`]
//! and never renormalized away.

use crate::models::{ForwardStar, NodeId};
use crate::{GraphError, Result};

/// Allowed deviation of the rank mass from 1.0.
pub const MASS_TOLERANCE: f64 = 1e-6;

/// PageRank configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankConfig {
    /// Probability of following an arc, in (0.0, 1.0]. The remaining
    /// `1 - beta` restarts at a uniformly chosen node.
    pub beta: f64,
    /// L1 convergence threshold.
    pub epsilon: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            beta: 0.85,
            epsilon: 1e-8,
            max_iterations: 100,
        }
    }
}

impl PageRankConfig {
    /// Create new PageRank configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set teleportation probability.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set iteration bound.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check parameters before any computation.
    pub fn validate(&self) -> Result<()> {
        // beta = 0 leaves no restart mass; rejected by policy
        if self.beta.is_nan() || self.beta <= 0.0 || self.beta > 1.0 {
            return Err(GraphError::InvalidTeleportProbability(self.beta));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(GraphError::InvalidTolerance(self.epsilon));
        }
        if self.max_iterations == 0 {
            return Err(GraphError::InvalidIterationLimit);
        }
        Ok(())
    }
}

/// Outcome of the iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The L1 change fell below epsilon.
    Converged,
    /// The iteration bound was reached first. Ranks are usable but not final.
    DidNotConverge,
}

/// PageRank result.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRank {
    ranks: Vec<f64>,
    /// Iterations performed.
    pub iterations: usize,
    /// L1 change of the last iteration.
    pub residual: f64,
    /// Whether the threshold was reached.
    pub convergence: Convergence,
}

impl PageRank {
    /// Rank of every node, indexed by node id.
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    /// Consume the result, returning the rank vector.
    pub fn into_ranks(self) -> Vec<f64> {
        self.ranks
    }

    /// Rank of `node`.
    pub fn rank(&self, node: NodeId) -> Option<f64> {
        self.ranks.get(node.index()).copied()
    }

    /// Check if the threshold was reached.
    pub fn is_converged(&self) -> bool {
        self.convergence == Convergence::Converged
    }

    /// Sum of all ranks.
    pub fn mass(&self) -> f64 {
        self.ranks.iter().sum()
    }

    /// The `k` highest ranked nodes, highest first, ties by node id.
    pub fn top(&self, k: usize) -> Vec<(NodeId, f64)> {
        let mut ranked: Vec<(NodeId, f64)> = self
            .ranks
            .iter()
            .enumerate()
            .map(|(i, &r)| (NodeId(i as u32), r))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }
}

/// Compute PageRank over `graph`.
///
/// # Errors
///
/// - [`GraphError::InvalidTeleportProbability`] unless `0 < beta <= 1`
/// - [`GraphError::InvalidTolerance`], [`GraphError::InvalidIterationLimit`]
///   for bad convergence parameters
/// - [`GraphError::EmptyGraph`] for a graph without nodes
/// - [`GraphError::RankMassInvariantViolated`] if the rank mass leaves
///   `1 ± MASS_TOLERANCE`
///
/// # Example
///
/// ```
/// use netflow_graph::{pagerank, ForwardStar, PageRankConfig};
///
/// let graph = ForwardStar::from_arcs(2, &[(0, 1), (1, 0)]).unwrap();
/// let result = pagerank(&graph, &PageRankConfig::default()).unwrap();
/// assert!(result.is_converged());
/// assert!((result.ranks()[0] - 0.5).abs() < 1e-9);
/// ```
pub fn pagerank(graph: &ForwardStar, config: &PageRankConfig) -> Result<PageRank> {
    config.validate()?;

    let n = graph.node_count();
    if n == 0 {
        return Err(GraphError::EmptyGraph);
    }

    let inv_n = 1.0 / n as f64;
    let beta = config.beta;
    let teleport = (1.0 - beta) * inv_n;
    let inv_out_degree = inverse_out_degrees(graph)?;

    let mut ranks = vec![inv_n; n];
    let mut next = vec![0.0; n];
    let mut residual = f64::INFINITY;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        // Rank of dead ends, spread uniformly
        let dead_end_mass: f64 = ranks
            .iter()
            .zip(&inv_out_degree)
            .filter(|(_, &inv)| inv == 0.0)
            .map(|(&r, _)| r)
            .sum();

        next.fill(0.0);
        for (v, &rank) in ranks.iter().enumerate() {
            let share = rank * inv_out_degree[v];
            if share == 0.0 {
                continue;
            }
            for &head in graph.neighbors(NodeId(v as u32))? {
                next[head as usize] += share;
            }
        }

        let uniform = dead_end_mass * inv_n;
        for value in next.iter_mut() {
            *value = beta * (*value + uniform) + teleport;
        }

        residual = l1_distance(&ranks, &next);
        std::mem::swap(&mut ranks, &mut next);

        check_mass(&ranks, iterations)?;

        tracing::debug!(iteration = iterations, residual, "pagerank iteration");

        if residual < config.epsilon {
            break;
        }
    }

    let convergence = if residual < config.epsilon {
        Convergence::Converged
    } else {
        tracing::warn!(
            iterations,
            residual,
            epsilon = config.epsilon,
            "pagerank did not converge"
        );
        Convergence::DidNotConverge
    };

    Ok(PageRank {
        ranks,
        iterations,
        residual,
        convergence,
    })
}

/// Inverse out-degree per node, `0.0` for dead ends.
fn inverse_out_degrees(graph: &ForwardStar) -> Result<Vec<f64>> {
    graph
        .nodes()
        .map(|node| {
            let degree = graph.out_degree(node)?;
            Ok(if degree > 0 {
                1.0 / degree as f64
            } else {
                0.0
            })
        })
        .collect()
}

/// L1 norm of `a - b`.
fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

fn check_mass(ranks: &[f64], iteration: usize) -> Result<()> {
    let mass: f64 = ranks.iter().sum();
    if (mass - 1.0).abs() > MASS_TOLERANCE || mass.is_nan() {
        return Err(GraphError::RankMassInvariantViolated { iteration, mass });
    }
    Ok(())
}
