//! `netflow dijkstra` command - single-source shortest paths.

use clap::ValueEnum;
use netflow_graph::{shortest_paths_with_config, DijkstraConfig, DijkstraStrategy};

use super::{InputArgs, OutputArgs};
use crate::config::Config;
use crate::error::CliResult;
use crate::report;

/// Priority structure used by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// Binary heap, O((N + E) log N).
    #[default]
    Heap,
    /// Linear scan for the minimum label, O(N²).
    Scan,
}

impl From<Strategy> for DijkstraStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Heap => DijkstraStrategy::BinaryHeap,
            Strategy::Scan => DijkstraStrategy::Scan,
        }
    }
}

/// Execute the dijkstra command.
pub fn execute(
    input: &InputArgs,
    output: &OutputArgs,
    source: &str,
    target: Option<&str>,
    strategy: Strategy,
    config: &Config,
) -> CliResult<()> {
    let network = input.load(config)?;
    let source = network.node_id(source)?;
    let target = target.map(|name| network.node_id(name)).transpose()?;

    let solver = DijkstraConfig::new().with_strategy(strategy.into());
    let paths = shortest_paths_with_config(&network.star, source, &solver)?;
    tracing::info!(
        "Settled {} of {} nodes",
        paths.reachable_count(),
        network.star.node_count()
    );

    let rendered = report::render_dijkstra(
        &network,
        &paths,
        target,
        output.limit(config),
        output.format,
    )?;
    print!("{}", rendered);
    Ok(())
}
