//! A labeled tree model for driving rewrite passes from JSON.

use serde::{Deserialize, Serialize};

/// A node with a label and ordered children.
///
/// JSON form: `{"label": "call", "children": [...]}`; `children` may be
/// omitted for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf.
    pub fn leaf(label: impl Into<String>) -> Self {
        TreeNode {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with children.
    pub fn new(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode {
            label: label.into(),
            children,
        }
    }

    /// Parse a tree from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Trees the walkers know how to descend into.
pub trait Walkable: Sized {
    /// Ordered children.
    fn children(&self) -> &[Self];

    /// Number of nodes in this subtree, including `self`.
    fn size(&self) -> usize {
        1 + self.children().iter().map(Walkable::size).sum::<usize>()
    }
}

impl Walkable for TreeNode {
    fn children(&self) -> &[Self] {
        &self.children
    }
}
