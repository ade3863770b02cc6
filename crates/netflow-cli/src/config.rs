//! `netflow.toml` configuration.
//!
//! Every key is optional. Precedence is command-line flag, then config file,
//! then the built-in defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CliError, CliResult};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "netflow.toml";

/// Whitespace separated `from to [cost [capacity]]`.
pub const DEFAULT_PATTERN: &str =
    r"^\s*(?P<from>\S+)\s+(?P<to>\S+)(?:\s+(?P<cost>\S+))?(?:\s+(?P<cap>\S+))?\s*$";

/// Header lines skipped by default.
pub const DEFAULT_SKIP: usize = 0;

/// Default PageRank teleportation probability.
pub const DEFAULT_BETA: f64 = 0.85;

/// Default PageRank L1 convergence threshold.
pub const DEFAULT_EPS: f64 = 1e-8;

/// Default PageRank iteration bound.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default number of rows printed.
pub const DEFAULT_LIMIT: usize = 100;

/// Parsed configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Input parsing.
    pub loader: LoaderSection,
    /// PageRank parameters.
    pub pagerank: PageRankSection,
    /// Report settings.
    pub output: OutputSection,
}

/// `[loader]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderSection {
    pub pattern: Option<String>,
    pub skip: Option<usize>,
    pub undirected: Option<bool>,
}

/// `[pagerank]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageRankSection {
    pub beta: Option<f64>,
    pub epsilon: Option<f64>,
    pub max_iterations: Option<usize>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub limit: Option<usize>,
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, `netflow.toml` in the
    /// working directory is used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let path: PathBuf = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        tracing::debug!("Reading config from {}", path.display());
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> CliResult<Self> {
        Ok(toml::from_str(content)?)
    }
}
