//! Per-visit traversal contexts.
//!
//! The traversal engine builds one [`TraversalContext`] for each node it
//! visits and passes it to the visitor callback. The context carries the
//! node's edit view, the flags the recorder consults, and a handle to the
//! pass's shared edit buffer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::buffer::BufferHandle;
use crate::node::NodeId;
use crate::zipper::NodeZipper;

// ============================================================================
// Traversal Mode
// ============================================================================

/// Whether a pass walks the tree on one thread or across workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    /// Single-threaded walk. Repeated changes to a node overwrite each other.
    #[default]
    Sequential,
    /// Concurrent walk. A node may be changed at most once.
    Parallel,
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalMode::Sequential => write!(f, "sequential"),
            TraversalMode::Parallel => write!(f, "parallel"),
        }
    }
}

// ============================================================================
// Traversal Control
// ============================================================================

/// Signal returned to the traversal engine after a visit.
///
/// The recorder operations only ever return `Continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalControl {
    /// Traverse into children.
    Continue,
    /// Skip children, then move on to the next sibling.
    SkipChildren,
    /// Halt traversal immediately.
    Stop,
}

// ============================================================================
// Traversal Context
// ============================================================================

/// State for one node visit.
#[derive(Debug)]
pub struct TraversalContext<'s, T> {
    zipper: NodeZipper<T>,
    edited: bool,
    deleted: bool,
    buffer: BufferHandle<'s, T>,
}

impl<'s, T> TraversalContext<'s, T> {
    /// Create the context for a node entering traversal.
    ///
    /// `anchor` must be the id the engine assigned to `node`; all edits
    /// recorded through this context are attached to it.
    pub fn new(anchor: NodeId, node: T, buffer: impl Into<BufferHandle<'s, T>>) -> Self {
        TraversalContext {
            zipper: NodeZipper::new(anchor, node),
            edited: false,
            deleted: false,
            buffer: buffer.into(),
        }
    }

    /// Create the context for a nested visit sharing this context's buffer.
    ///
    /// The child borrows the buffer handle until it is dropped.
    pub fn child(&mut self, anchor: NodeId, node: T) -> TraversalContext<'_, T> {
        TraversalContext::new(anchor, node, self.buffer.reborrow())
    }

    /// The mode of the pass, as fixed by the buffer variant.
    pub fn mode(&self) -> TraversalMode {
        self.buffer.mode()
    }

    /// Returns true under a parallel traversal.
    pub fn is_parallel(&self) -> bool {
        self.mode() == TraversalMode::Parallel
    }

    /// The id of the node being visited, fixed for the whole visit.
    pub fn anchor(&self) -> NodeId {
        self.zipper.anchor()
    }

    /// The node's current value, including changes made during this visit.
    pub fn node(&self) -> &T {
        self.zipper.node()
    }

    /// The current edit view.
    pub fn zipper(&self) -> &NodeZipper<T> {
        &self.zipper
    }

    /// Returns true once the node has been changed during this visit.
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Returns true once the node has been marked for deletion.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Number of records in the shared buffer.
    pub fn queued(&self) -> usize {
        self.buffer.len()
    }

    /// Consume the context, returning the node's current value.
    pub fn into_node(self) -> T {
        self.zipper.into_node()
    }

    pub(crate) fn advance_node(&mut self, node: T) {
        self.zipper.advance(node);
    }

    pub(crate) fn mark_edited(&mut self) {
        self.edited = true;
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut BufferHandle<'s, T> {
        &mut self.buffer
    }
}
