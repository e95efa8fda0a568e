//! Node identity for edit anchors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a node within one traversal pass.
///
/// Assigned by the traversal engine when a node enters the walk. Edit records
/// are anchored by id, so two structurally equal nodes with different ids are
/// never confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// The raw index.
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}
