//! Label-matching rewrite scripts.
//!
//! A script is a JSON list of rules. Each rule names a node label and the
//! edit to request when a node with that label is visited:
//!
//! ```json
//! [
//!   {"label": "old_call", "action": "replace", "node": {"label": "new_call"}},
//!   {"label": "debug", "action": "delete"},
//!   {"label": "stmt", "action": "insert_before", "node": {"label": "trace"}}
//! ]
//! ```
//!
//! Every rule whose label matches the visited node fires, in script order.
//! Matching uses the label the node had when the visit started, so a
//! replacement does not trigger rules for its own label within one visit.

use std::fmt;

use serde::{Deserialize, Serialize};

use tugzip_core::context::{TraversalContext, TraversalControl};
use tugzip_core::error::EditResult;
use tugzip_core::recorder::{change_node, delete_node, insert_after, insert_before};

use crate::error::TugzipError;
use crate::tree::TreeNode;
use crate::walk::Rewriter;

/// Edit requested by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    Replace,
    Delete,
    InsertBefore,
    InsertAfter,
}

impl RuleAction {
    /// Whether the action carries a node.
    pub fn takes_node(self) -> bool {
        !matches!(self, RuleAction::Delete)
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleAction::Replace => "replace",
            RuleAction::Delete => "delete",
            RuleAction::InsertBefore => "insert_before",
            RuleAction::InsertAfter => "insert_after",
        };
        f.write_str(name)
    }
}

/// One rule of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Label of the nodes this rule applies to.
    pub label: String,
    pub action: RuleAction,
    /// Replacement or sibling node; required unless `action` is `delete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<TreeNode>,
}

/// A validated list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RewriteScript {
    rules: Vec<RewriteRule>,
}

impl RewriteScript {
    /// Build a script, checking that every rule carries the node its action needs.
    pub fn new(rules: Vec<RewriteRule>) -> Result<Self, TugzipError> {
        for (index, rule) in rules.iter().enumerate() {
            match (rule.action.takes_node(), rule.node.is_some()) {
                (true, false) => {
                    return Err(TugzipError::invalid_args(format!(
                        "rule {} ({} on '{}') requires a node",
                        index, rule.action, rule.label
                    )));
                }
                (false, true) => {
                    return Err(TugzipError::invalid_args(format!(
                        "rule {} ({} on '{}') does not take a node",
                        index, rule.action, rule.label
                    )));
                }
                _ => {}
            }
        }
        Ok(RewriteScript { rules })
    }

    /// Parse and validate a script from JSON.
    pub fn from_json(json: &str) -> Result<Self, TugzipError> {
        let rules: Vec<RewriteRule> = serde_json::from_str(json)?;
        RewriteScript::new(rules)
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Rewriter<TreeNode> for RewriteScript {
    fn visit(&self, ctx: &mut TraversalContext<'_, TreeNode>) -> EditResult<TraversalControl> {
        let label = ctx.node().label.clone();
        for rule in self.rules.iter().filter(|rule| rule.label == label) {
            match (rule.action, &rule.node) {
                (RuleAction::Replace, Some(node)) => {
                    change_node(ctx, node.clone())?;
                }
                (RuleAction::InsertBefore, Some(node)) => {
                    insert_before(ctx, node.clone());
                }
                (RuleAction::InsertAfter, Some(node)) => {
                    insert_after(ctx, node.clone());
                }
                (RuleAction::Delete, _) => {
                    delete_node(ctx);
                }
                // Rejected by `RewriteScript::new`.
                (_, None) => {}
            }
        }

        // A deleted node's subtree goes with it.
        if ctx.is_deleted() {
            Ok(TraversalControl::SkipChildren)
        } else {
            Ok(TraversalControl::Continue)
        }
    }
}
