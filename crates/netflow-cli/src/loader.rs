//! Regex-driven arc list loader.
//!
//! Every body line must match the pattern, which names the groups `from` and
//! `to` and optionally `cost` and `cap`. Node names are mapped to dense ids in
//! the order they first appear.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use netflow_graph::{ForwardStar, ForwardStarBuilder, NodeId};
use regex::{Captures, Regex};

use crate::config::{DEFAULT_PATTERN, DEFAULT_SKIP};
use crate::error::{CliError, CliResult};

/// Loader settings.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Regex with named groups `from`, `to`, optional `cost`, `cap`.
    pub pattern: String,
    /// Header lines to skip.
    pub skip: usize,
    /// Add the reverse arc for every line.
    pub undirected: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            skip: DEFAULT_SKIP,
            undirected: false,
        }
    }
}

/// Network read from text, with the node names behind the ids.
#[derive(Debug)]
pub struct LoadedNetwork {
    /// The network.
    pub star: ForwardStar,
    names: Vec<String>,
    ids: HashMap<String, NodeId>,
}

impl LoadedNetwork {
    /// Id of the node called `name`.
    pub fn node_id(&self, name: &str) -> CliResult<NodeId> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| CliError::UnknownNode(name.to_string()))
    }

    /// Name of `node`, `"NONE"` for the invalid id.
    pub fn name(&self, node: NodeId) -> &str {
        self.names
            .get(node.index())
            .map(String::as_str)
            .unwrap_or("NONE")
    }

    #[cfg(test)]
    fn names(&self) -> &[String] {
        &self.names
    }
}

/// Compiled loader.
#[derive(Debug)]
pub struct ArcLoader {
    regex: Regex,
    skip: usize,
    undirected: bool,
}

impl ArcLoader {
    /// Compile the pattern and check its groups.
    pub fn new(config: &LoaderConfig) -> CliResult<Self> {
        let regex = Regex::new(&config.pattern)?;
        for group in ["from", "to"] {
            if !regex.capture_names().flatten().any(|name| name == group) {
                return Err(CliError::InvalidPattern(format!(
                    "pattern must define the named group (?P<{}>...)",
                    group
                )));
            }
        }

        Ok(Self {
            regex,
            skip: config.skip,
            undirected: config.undirected,
        })
    }

    /// Load a network from a file.
    pub fn load_file(&self, path: &Path) -> CliResult<LoadedNetwork> {
        let file = File::open(path).map_err(|e| {
            CliError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        tracing::info!("Loading {}", path.display());
        self.load(BufReader::new(file))
    }

    /// Load a network from buffered text.
    pub fn load<R: BufRead>(&self, reader: R) -> CliResult<LoadedNetwork> {
        let mut names = Vec::new();
        let mut ids: HashMap<String, NodeId> = HashMap::new();
        let mut arcs = Vec::new();
        let mut blank_line: Option<usize> = None;

        for (index, line) in reader.lines().enumerate().skip(self.skip) {
            let line_no = index + 1;
            let line = line?;

            // Blank lines are only tolerated at the end of the input
            if line.trim().is_empty() {
                blank_line.get_or_insert(line_no);
                continue;
            }
            if let Some(blank) = blank_line {
                return Err(CliError::EmptyLine { line: blank });
            }

            let captures = self
                .regex
                .captures(&line)
                .ok_or_else(|| CliError::PatternMismatch {
                    line: line_no,
                    text: line.clone(),
                })?;

            let from = intern(group(&captures, "from", line_no)?, &mut names, &mut ids)?;
            let to = intern(group(&captures, "to", line_no)?, &mut names, &mut ids)?;
            let cost = number(&captures, "cost", line_no)?;
            let cap = number(&captures, "cap", line_no)?;

            arcs.push((from, to, cost, cap));
            if self.undirected {
                arcs.push((to, from, cost, cap));
            }
        }

        let mut builder = ForwardStarBuilder::with_capacity(names.len(), arcs.len()).require_arcs();
        for (from, to, cost, cap) in arcs {
            builder.add_arc_with(from.0, to.0, cost, cap);
        }
        let star = builder.build()?;

        tracing::info!(
            "Loaded {} nodes and {} arcs",
            star.node_count(),
            star.arc_count()
        );

        Ok(LoadedNetwork { star, names, ids })
    }
}

fn group<'t>(captures: &Captures<'t>, name: &str, line: usize) -> CliResult<&'t str> {
    captures
        .name(name)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CliError::PatternMismatch {
            line,
            text: format!("empty '{}' group", name),
        })
}

fn number(captures: &Captures<'_>, name: &'static str, line: usize) -> CliResult<Option<f64>> {
    match captures.name(name) {
        None => Ok(None),
        Some(m) => m
            .as_str()
            .parse()
            .map(Some)
            .map_err(|_| CliError::InvalidNumber {
                line,
                field: name,
                value: m.as_str().to_string(),
            }),
    }
}

fn intern(
    name: &str,
    names: &mut Vec<String>,
    ids: &mut HashMap<String, NodeId>,
) -> CliResult<NodeId> {
    if let Some(&id) = ids.get(name) {
        return Ok(id);
    }
    if names.len() > NodeId::MAX.index() {
        return Err(CliError::Graph(netflow_graph::GraphError::InvalidNodeCount(
            names.len() + 1,
        )));
    }
    let id = NodeId(names.len() as u32);
    names.push(name.to_string());
    ids.insert(name.to_string(), id);
    Ok(id)
}
