//! CLI front door for recording passes.
//!
//! `run_record` loads a tree and a rewrite script from disk, walks the tree
//! in the requested mode and returns the response envelope. The caller
//! (typically `main.rs`) is responsible for emitting it.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, TugzipError>`. Missing input files map to
//! `FileNotFound` (code 3), malformed JSON and invalid rules to
//! `InvalidArguments` (code 2), and recorder rejections to `EditConflict`
//! (code 4).

use std::fs;
use std::path::Path;

use tracing::info;

use tugzip_core::context::TraversalMode;
use tugzip_core::session::{SessionOptions, TransformSession};

use crate::error::TugzipError;
use crate::output::RecordResponse;
use crate::script::RewriteScript;
use crate::tree::{TreeNode, Walkable};
use crate::walk::walk;

/// Read a UTF-8 input file.
fn read_input(path: &Path) -> Result<String, TugzipError> {
    fs::read_to_string(path).map_err(|err| TugzipError::from_io(path, err))
}

/// Load a tree from a JSON file.
pub fn load_tree(path: &Path) -> Result<TreeNode, TugzipError> {
    Ok(TreeNode::from_json(&read_input(path)?)?)
}

/// Load and validate a rewrite script from a JSON file.
pub fn load_script(path: &Path) -> Result<RewriteScript, TugzipError> {
    RewriteScript::from_json(&read_input(path)?)
}

/// Run one recording pass over in-memory inputs.
///
/// The session's buffer is sized from the tree unless `options` already
/// carries a capacity hint.
pub fn record(
    tree: &TreeNode,
    script: &RewriteScript,
    mut options: SessionOptions,
) -> Result<RecordResponse, TugzipError> {
    if options.capacity_hint == 0 {
        options.capacity_hint = tree.size();
    }
    let mode = options.mode;

    let mut session = TransformSession::new(options);
    let summary = walk(&mut session, tree, script)?;

    let mut records = session.into_records();
    if mode == TraversalMode::Parallel {
        records.sort_by_key(|record| record.anchor());
    }

    info!(
        %mode,
        visited = summary.visited,
        records = records.len(),
        "recording pass complete"
    );
    Ok(RecordResponse::new(mode, summary, records))
}

/// Load inputs from disk and run one recording pass.
///
/// # Arguments
///
/// * `tree_path` - JSON tree (`{"label": ..., "children": [...]}`)
/// * `script_path` - JSON list of rewrite rules
/// * `options` - Traversal mode and buffer sizing
pub fn run_record(
    tree_path: &Path,
    script_path: &Path,
    options: SessionOptions,
) -> Result<RecordResponse, TugzipError> {
    let tree = load_tree(tree_path)?;
    let script = load_script(script_path)?;
    record(&tree, &script, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutputErrorCode;
    use crate::script::{RewriteRule, RuleAction};
    use tugzip_core::node::NodeId;
    use tugzip_core::zipper::EditKind;

    fn tree() -> TreeNode {
        // root(0) -> [x(1) -> [y(2)], y(3), x(4)]
        TreeNode::new(
            "root",
            vec![
                TreeNode::new("x", vec![TreeNode::leaf("y")]),
                TreeNode::leaf("y"),
                TreeNode::leaf("x"),
            ],
        )
    }

    fn script() -> RewriteScript {
        RewriteScript::new(vec![
            RewriteRule {
                label: "x".to_string(),
                action: RuleAction::Replace,
                node: Some(TreeNode::leaf("z")),
            },
            RewriteRule {
                label: "y".to_string(),
                action: RuleAction::InsertAfter,
                node: Some(TreeNode::leaf("w")),
            },
        ])
        .unwrap()
    }

    fn anchors_and_kinds(response: &RecordResponse) -> Vec<(NodeId, &'static str)> {
        response
            .records
            .iter()
            .map(|r| (r.anchor(), r.kind().name()))
            .collect()
    }

    #[test]
    fn sequential_record_in_visit_order() {
        let response = record(&tree(), &script(), SessionOptions::default()).unwrap();

        assert_eq!(response.visited, 5);
        assert_eq!(
            anchors_and_kinds(&response),
            vec![
                (NodeId::new(1), "replace"),
                (NodeId::new(2), "insert_after"),
                (NodeId::new(3), "insert_after"),
                (NodeId::new(4), "replace"),
            ]
        );
        assert_eq!(response.summary.replace, 2);
    }

    #[test]
    fn parallel_record_matches_sequential() {
        let sequential = record(&tree(), &script(), SessionOptions::default()).unwrap();
        let parallel = record(
            &tree(),
            &script(),
            SessionOptions::new(TraversalMode::Parallel),
        )
        .unwrap();

        assert_eq!(parallel.mode, TraversalMode::Parallel);
        assert_eq!(parallel.records, sequential.records);
        assert_eq!(parallel.summary, sequential.summary);
    }

    #[test]
    fn double_replace_conflicts_only_in_parallel() {
        let twice = RewriteScript::new(vec![
            RewriteRule {
                label: "y".to_string(),
                action: RuleAction::Replace,
                node: Some(TreeNode::leaf("y2")),
            },
            RewriteRule {
                label: "y".to_string(),
                action: RuleAction::Replace,
                node: Some(TreeNode::leaf("y3")),
            },
        ])
        .unwrap();

        let sequential = record(&tree(), &twice, SessionOptions::default()).unwrap();
        assert!(sequential
            .records
            .iter()
            .all(|r| r.kind() == &EditKind::Replace(TreeNode::leaf("y3"))));
        assert_eq!(sequential.records.len(), 2);

        let err = record(
            &tree(),
            &twice,
            SessionOptions::new(TraversalMode::Parallel),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
    }

    #[test]
    fn missing_tree_file_is_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_record(
            &dir.path().join("tree.json"),
            &dir.path().join("script.json"),
            SessionOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
    }
}
