//! Edit records and the per-visit edit view they are derived from.
//!
//! | Kind | Carries | Meaning |
//! |------|---------|---------|
//! | `Replace(node)` | new node | anchor is replaced by `node` |
//! | `Delete` | nothing | anchor is removed |
//! | `InsertBefore(node)` | sibling | `node` is spliced in before the anchor |
//! | `InsertAfter(node)` | sibling | `node` is spliced in after the anchor |
//!
//! Records are never mutated. Every change to a pending edit produces a new
//! record through one of the derivations on [`NodeZipper`] or
//! [`EditRecord::with_node`].

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

// ============================================================================
// Edit Kinds
// ============================================================================

/// The structural change an edit record requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "node", rename_all = "snake_case")]
pub enum EditKind<T> {
    /// Replace the anchor with a new node.
    Replace(T),
    /// Remove the anchor.
    Delete,
    /// Insert a sibling immediately before the anchor.
    InsertBefore(T),
    /// Insert a sibling immediately after the anchor.
    InsertAfter(T),
}

impl<T> EditKind<T> {
    /// Stable lowercase name, as used in JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            EditKind::Replace(_) => "replace",
            EditKind::Delete => "delete",
            EditKind::InsertBefore(_) => "insert_before",
            EditKind::InsertAfter(_) => "insert_after",
        }
    }

    /// The node carried by this edit, if any.
    pub fn node(&self) -> Option<&T> {
        match self {
            EditKind::Replace(node) | EditKind::InsertBefore(node) | EditKind::InsertAfter(node) => {
                Some(node)
            }
            EditKind::Delete => None,
        }
    }

    /// Returns true if this is an insertion (InsertBefore, InsertAfter).
    pub fn is_insertion(&self) -> bool {
        matches!(self, EditKind::InsertBefore(_) | EditKind::InsertAfter(_))
    }
}

// ============================================================================
// Edit Records
// ============================================================================

/// One pending edit, anchored to the node it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord<T> {
    anchor: NodeId,
    #[serde(flatten)]
    kind: EditKind<T>,
}

impl<T> EditRecord<T> {
    fn new(anchor: NodeId, kind: EditKind<T>) -> Self {
        EditRecord { anchor, kind }
    }

    /// The node this edit is attached to.
    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    /// The requested change.
    pub fn kind(&self) -> &EditKind<T> {
        &self.kind
    }

    /// Returns true for replace records.
    pub fn is_replace(&self) -> bool {
        matches!(self.kind, EditKind::Replace(_))
    }

    /// Derive a replace record for the same anchor carrying `node`.
    ///
    /// The receiver is left untouched, whatever its kind.
    #[must_use]
    pub fn with_node(&self, node: T) -> EditRecord<T> {
        EditRecord::new(self.anchor, EditKind::Replace(node))
    }

    /// Split the record into its anchor and kind.
    pub fn into_parts(self) -> (NodeId, EditKind<T>) {
        (self.anchor, self.kind)
    }
}

// ============================================================================
// Node Zipper
// ============================================================================

/// The current edit view of one node visit.
///
/// Holds the anchor id fixed at the start of the visit together with the
/// node's current value, which advances when the node is changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeZipper<T> {
    anchor: NodeId,
    node: T,
}

impl<T> NodeZipper<T> {
    /// Create the view for a node entering traversal.
    pub fn new(anchor: NodeId, node: T) -> Self {
        NodeZipper { anchor, node }
    }

    /// The anchor id of the visited node.
    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    /// The node's current value.
    pub fn node(&self) -> &T {
        &self.node
    }

    /// Derive a record replacing the anchor with `node`.
    #[must_use]
    pub fn with_node(&self, node: T) -> EditRecord<T> {
        EditRecord::new(self.anchor, EditKind::Replace(node))
    }

    /// Derive a record deleting the anchor.
    #[must_use]
    pub fn as_delete(&self) -> EditRecord<T> {
        EditRecord::new(self.anchor, EditKind::Delete)
    }

    /// Derive a record inserting `sibling` before the anchor.
    #[must_use]
    pub fn as_insert_before(&self, sibling: T) -> EditRecord<T> {
        EditRecord::new(self.anchor, EditKind::InsertBefore(sibling))
    }

    /// Derive a record inserting `sibling` after the anchor.
    #[must_use]
    pub fn as_insert_after(&self, sibling: T) -> EditRecord<T> {
        EditRecord::new(self.anchor, EditKind::InsertAfter(sibling))
    }

    pub(crate) fn advance(&mut self, node: T) {
        self.node = node;
    }

    /// Consume the view, returning the current node.
    pub fn into_node(self) -> T {
        self.node
    }
}
