//! CLI command implementations.

pub mod dijkstra;
pub mod pagerank;
pub mod search;

use std::path::PathBuf;

use clap::Args;

use crate::config::{Config, DEFAULT_LIMIT};
use crate::error::CliResult;
use crate::loader::{ArcLoader, LoadedNetwork, LoaderConfig};
use crate::report::Format;

/// Input options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Arc list file
    pub file: PathBuf,

    /// Line pattern with named groups from, to and optionally cost, cap
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Header lines to skip
    #[arg(short, long)]
    pub skip: Option<usize>,

    /// Add the reverse of every arc
    #[arg(short, long)]
    pub undirected: bool,
}

impl InputArgs {
    /// Merge flags over the config file and defaults.
    pub fn loader_config(&self, config: &Config) -> LoaderConfig {
        let defaults = LoaderConfig::default();
        LoaderConfig {
            pattern: self
                .pattern
                .clone()
                .or_else(|| config.loader.pattern.clone())
                .unwrap_or(defaults.pattern),
            skip: self.skip.or(config.loader.skip).unwrap_or(defaults.skip),
            undirected: self.undirected || config.loader.undirected.unwrap_or(defaults.undirected),
        }
    }

    /// Read the network.
    pub fn load(&self, config: &Config) -> CliResult<LoadedNetwork> {
        ArcLoader::new(&self.loader_config(config))?.load_file(&self.file)
    }
}

/// Output options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Maximum number of rows printed
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl OutputArgs {
    /// Row limit after config and defaults.
    pub fn limit(&self, config: &Config) -> usize {
        self.limit
            .or(config.output.limit)
            .unwrap_or(DEFAULT_LIMIT)
    }
}
