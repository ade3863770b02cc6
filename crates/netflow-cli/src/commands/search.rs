//! `netflow search` command - breadth or depth first traversal.

use netflow_graph::{breadth_first_search, depth_first_search};

use super::{InputArgs, OutputArgs};
use crate::config::Config;
use crate::error::CliResult;
use crate::report;

/// Execute the search command.
pub fn execute(
    input: &InputArgs,
    output: &OutputArgs,
    start: &str,
    depth_first: bool,
    config: &Config,
) -> CliResult<()> {
    let network = input.load(config)?;
    let start = network.node_id(start)?;

    let result = if depth_first {
        depth_first_search(&network.star, start)?
    } else {
        breadth_first_search(&network.star, start)?
    };

    let rendered = report::render_search(
        &network,
        start,
        &result,
        output.limit(config),
        output.format,
    )?;
    print!("{}", rendered);
    Ok(())
}
