//! netflow CLI - shortest paths, PageRank and graph search over arc lists.
//!
//! # Commands
//!
//! - `netflow dijkstra <file> <source>` - Shortest path labels from a source
//! - `netflow pagerank <file>` - Stationary ranks with teleportation
//! - `netflow search <file> <start>` - Breadth or depth first traversal
//!
//! # Examples
//!
//! ```bash
//! # Distances from node a, with the route to node f
//! netflow dijkstra arcs.txt a --target f
//!
//! # Ten best ranked nodes as JSON
//! netflow pagerank arcs.txt --beta 0.9 --limit 10 --format json
//!
//! # Comma separated input with one header line
//! netflow search roads.csv A1 --pattern '^(?P<from>\w+),(?P<to>\w+)' --skip 1
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod loader;
mod report;

use commands::dijkstra::Strategy;
use commands::pagerank::RankArgs;
use commands::{InputArgs, OutputArgs};
use config::Config;

/// netflow - network algorithms over forward-star graphs
#[derive(Parser)]
#[command(name = "netflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (default: ./netflow.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute shortest path distances from a source node
    Dijkstra {
        #[command(flatten)]
        input: InputArgs,

        /// Source node name
        source: String,

        /// Also print the path to this node
        #[arg(short, long)]
        target: Option<String>,

        /// Priority structure
        #[arg(long, value_enum, default_value_t = Strategy::Heap)]
        strategy: Strategy,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compute PageRank scores
    Pagerank {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        rank: RankArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Traverse the network from a start node
    Search {
        #[command(flatten)]
        input: InputArgs,

        /// Start node name
        start: String,

        /// Depth first instead of breadth first
        #[arg(short, long)]
        depth_first: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> error::CliResult<()> {
    if let Commands::Completions { shell } = cli.command {
        use clap::CommandFactory;
        clap_complete::generate(shell, &mut Cli::command(), "netflow", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Dijkstra {
            input,
            source,
            target,
            strategy,
            output,
        } => commands::dijkstra::execute(
            &input,
            &output,
            &source,
            target.as_deref(),
            strategy,
            &config,
        ),

        Commands::Pagerank {
            input,
            rank,
            output,
        } => commands::pagerank::execute(&input, &output, &rank, &config),

        Commands::Search {
            input,
            start,
            depth_first,
            output,
        } => commands::search::execute(&input, &output, &start, depth_first, &config),

        Commands::Completions { .. } => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
