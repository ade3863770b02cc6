//! `netflow pagerank` command - stationary ranks by power iteration.

use netflow_graph::{pagerank, PageRankConfig};

use super::{InputArgs, OutputArgs};
use crate::config::{Config, DEFAULT_BETA, DEFAULT_EPS, DEFAULT_MAX_ITERATIONS};
use crate::error::CliResult;
use crate::report;

/// PageRank parameters given on the command line.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RankArgs {
    /// Probability of following a link instead of teleporting
    #[arg(short, long)]
    pub beta: Option<f64>,

    /// L1 convergence threshold
    #[arg(short, long)]
    pub epsilon: Option<f64>,

    /// Iteration bound
    #[arg(short, long)]
    pub max_iterations: Option<usize>,

    /// Print only the rank of this node
    #[arg(short, long)]
    pub node: Option<String>,
}

impl RankArgs {
    /// Merge flags over the config file and defaults.
    pub fn solver_config(&self, config: &Config) -> PageRankConfig {
        let section = &config.pagerank;
        PageRankConfig::new()
            .with_beta(self.beta.or(section.beta).unwrap_or(DEFAULT_BETA))
            .with_epsilon(self.epsilon.or(section.epsilon).unwrap_or(DEFAULT_EPS))
            .with_max_iterations(
                self.max_iterations
                    .or(section.max_iterations)
                    .unwrap_or(DEFAULT_MAX_ITERATIONS),
            )
    }
}

/// Execute the pagerank command.
pub fn execute(
    input: &InputArgs,
    output: &OutputArgs,
    args: &RankArgs,
    config: &Config,
) -> CliResult<()> {
    let network = input.load(config)?;
    let target = args
        .node
        .as_deref()
        .map(|name| network.node_id(name))
        .transpose()?;

    let solver = args.solver_config(config);
    tracing::debug!(
        "PageRank beta={} epsilon={} max_iterations={}",
        solver.beta,
        solver.epsilon,
        solver.max_iterations
    );
    let result = pagerank(&network.star, &solver)?;

    let rendered = report::render_pagerank(
        &network,
        &result,
        target,
        output.limit(config),
        output.format,
    )?;
    print!("{}", rendered);
    Ok(())
}
