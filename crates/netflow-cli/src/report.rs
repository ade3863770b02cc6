//! Result rendering.
//!
//! Text output is colored for the terminal, JSON output is meant for scripts.
//! Both render complete results; `limit` only trims the number of rows.

use clap::ValueEnum;
use colored::Colorize;
use netflow_graph::{reconstruct_path, NodeId, PageRank, SearchResult, ShortestPaths};
use serde::Serialize;

use crate::error::CliResult;
use crate::loader::LoadedNetwork;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Debug, Serialize)]
struct PathRow<'a> {
    node: &'a str,
    distance: Option<f64>,
    predecessor: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DijkstraReport<'a> {
    source: &'a str,
    nodes: usize,
    reachable: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<&'a str>>,
    rows: Vec<PathRow<'a>>,
}

#[derive(Debug, Serialize)]
struct RankRow<'a> {
    node: &'a str,
    rank: f64,
}

#[derive(Debug, Serialize)]
struct PageRankReport<'a> {
    converged: bool,
    iterations: usize,
    residual: f64,
    mass: f64,
    rows: Vec<RankRow<'a>>,
}

#[derive(Debug, Serialize)]
struct SearchRow<'a> {
    node: &'a str,
    predecessor: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    start: &'a str,
    order: Vec<&'a str>,
    tree: Vec<SearchRow<'a>>,
}

fn names<'a>(network: &'a LoadedNetwork, nodes: &[NodeId]) -> Vec<&'a str> {
    nodes.iter().map(|&n| network.name(n)).collect()
}

fn optional_name(network: &LoadedNetwork, node: NodeId) -> Option<&str> {
    node.is_valid().then(|| network.name(node))
}

/// Render Dijkstra labels for the first `limit` nodes, plus the path to
/// `target` when one is given.
pub fn render_dijkstra(
    network: &LoadedNetwork,
    paths: &ShortestPaths,
    target: Option<NodeId>,
    limit: usize,
    format: Format,
) -> CliResult<String> {
    let rows: Vec<PathRow<'_>> = network
        .star
        .nodes()
        .take(limit)
        .map(|node| PathRow {
            node: network.name(node),
            distance: paths.distance(node),
            predecessor: paths.predecessor(node).map(|p| network.name(p)),
        })
        .collect();

    let report = DijkstraReport {
        source: network.name(paths.source()),
        nodes: network.star.node_count(),
        reachable: paths.reachable_count(),
        path: target.and_then(|t| paths.path_to(t)).map(|p| names(network, &p)),
        rows,
    };

    match format {
        Format::Json => Ok(serde_json::to_string_pretty(&report)?),
        Format::Text => {
            let mut output = String::new();
            output.push_str(&format!(
                "{} from {} ({} of {} nodes reachable)\n\n",
                "Shortest paths".bold(),
                report.source.bright_cyan(),
                report.reachable.to_string().bright_white(),
                report.nodes
            ));

            if let Some(target) = target {
                match (&report.path, paths.distance(target)) {
                    (Some(path), Some(distance)) => output.push_str(&format!(
                        "  Path to {}: {} (cost {})\n\n",
                        network.name(target).bright_cyan(),
                        path.join(" -> "),
                        distance.to_string().bright_green()
                    )),
                    _ => output.push_str(&format!(
                        "  {} {} is not reachable\n\n",
                        "Note:".yellow(),
                        network.name(target)
                    )),
                }
            }

            output.push_str(&format!(
                "  {:<20} {:>14} {:<20}\n",
                "node".dimmed(),
                "distance".dimmed(),
                "predecessor".dimmed()
            ));
            for row in &report.rows {
                let distance = match row.distance {
                    Some(d) => format!("{:>14}", d).bright_white(),
                    None => format!("{:>14}", "inf").dimmed(),
                };
                output.push_str(&format!(
                    "  {:<20} {} {:<20}\n",
                    row.node,
                    distance,
                    row.predecessor.unwrap_or("NONE")
                ));
            }
            if report.nodes > report.rows.len() {
                output.push_str(&format!(
                    "  {}\n",
                    format!("... {} more", report.nodes - report.rows.len()).dimmed()
                ));
            }
            Ok(output)
        }
    }
}

/// Render PageRank: the rank of `target` alone, or the `limit` best nodes.
pub fn render_pagerank(
    network: &LoadedNetwork,
    result: &PageRank,
    target: Option<NodeId>,
    limit: usize,
    format: Format,
) -> CliResult<String> {
    let ranked = match target {
        Some(node) => result
            .rank(node)
            .map(|rank| vec![(node, rank)])
            .unwrap_or_default(),
        None => result.top(limit),
    };

    let report = PageRankReport {
        converged: result.is_converged(),
        iterations: result.iterations,
        residual: result.residual,
        mass: result.mass(),
        rows: ranked
            .iter()
            .map(|&(node, rank)| RankRow {
                node: network.name(node),
                rank,
            })
            .collect(),
    };

    match format {
        Format::Json => Ok(serde_json::to_string_pretty(&report)?),
        Format::Text => {
            let mut output = String::new();
            let status = if report.converged {
                "converged".bright_green()
            } else {
                "did not converge".bright_red()
            };
            output.push_str(&format!(
                "{} {} after {} iterations (residual {:.3e}, mass {:.9})\n\n",
                "PageRank".bold(),
                status,
                report.iterations.to_string().bright_white(),
                report.residual,
                report.mass
            ));

            for (position, row) in report.rows.iter().enumerate() {
                output.push_str(&format!(
                    "  {:>5}  {:<20} {}\n",
                    (position + 1).to_string().dimmed(),
                    row.node,
                    format!("{:.10}", row.rank).bright_white()
                ));
            }
            Ok(output)
        }
    }
}

/// Render the visit order and the tree paths of the first `limit` visited
/// nodes.
pub fn render_search(
    network: &LoadedNetwork,
    start: NodeId,
    result: &SearchResult,
    limit: usize,
    format: Format,
) -> CliResult<String> {
    let report = SearchReport {
        start: network.name(start),
        order: names(network, &result.order),
        tree: result
            .order
            .iter()
            .take(limit)
            .map(|&node| SearchRow {
                node: network.name(node),
                predecessor: optional_name(network, result.predecessors[node.index()]),
            })
            .collect(),
    };

    match format {
        Format::Json => Ok(serde_json::to_string_pretty(&report)?),
        Format::Text => {
            let mut output = String::new();
            output.push_str(&format!(
                "{} from {}: {} of {} nodes visited\n\n",
                "Search".bold(),
                report.start.bright_cyan(),
                report.order.len().to_string().bright_white(),
                network.star.node_count()
            ));
            output.push_str(&format!("  Order: {}\n\n", report.order.join(" ")));
            for &node in result.order.iter().take(limit) {
                let path = reconstruct_path(&result.predecessors, start, node)
                    .map(|p| names(network, &p).join(" -> "))
                    .unwrap_or_default();
                output.push_str(&format!("  {:<20} {}\n", network.name(node), path.dimmed()));
            }
            if report.order.len() > report.tree.len() {
                output.push_str(&format!(
                    "  {}\n",
                    format!("... {} more", report.order.len() - report.tree.len()).dimmed()
                ));
            }
            Ok(output)
        }
    }
}
