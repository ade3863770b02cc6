//! Node types for network algorithms.
//!
//! - [`NodeId`]: dense zero-based vertex identifier
//! - [`Cost`], [`Capacity`]: arc attributes

/// Arc cost (length). May be negative unless a solver forbids it.
pub type Cost = f64;

/// Arc capacity. Non-negative; only flow algorithms read it.
pub type Capacity = f64;

/// Node identifier (vertex ID).
///
/// Node ids are dense: a graph with `n` nodes uses exactly `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Maximum valid node ID.
    pub const MAX: NodeId = NodeId(u32::MAX - 1);

    /// Invalid/sentinel node ID ("no predecessor").
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    pub const fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// Check if this is a valid node ID.
    pub const fn is_valid(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Get the inner value.
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index into per-node arrays.
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("-")
        }
    }
}
