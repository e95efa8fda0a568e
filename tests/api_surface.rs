//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Edit-Recording Protocol (tugzip-core)
// ============================================================================

use tugzip::buffer::{BufferHandle, EditBuffer, ParallelBuffer, SequentialBuffer};
use tugzip::context::{TraversalContext, TraversalControl, TraversalMode};
use tugzip::node::NodeId;
use tugzip::recorder::{change_node, delete_node, insert_after, insert_before};
use tugzip::session::{SessionOptions, TransformSession};
use tugzip::zipper::{EditKind, EditRecord, NodeZipper};

// ============================================================================
// Driver
// ============================================================================

use tugzip::cli::{load_script, load_tree, record, run_record};
use tugzip::error::{EditError, OutputErrorCode, TugzipError};
use tugzip::output::{
    emit_response, emit_response_compact, ErrorInfo, ErrorResponse, RecordResponse,
    RecordSummary, SCHEMA_VERSION,
};
use tugzip::script::{RewriteRule, RewriteScript, RuleAction};
use tugzip::tree::{TreeNode, Walkable};
use tugzip::walk::{walk, walk_parallel, walk_sequential, Rewriter, WalkSummary};

// ============================================================================
// Test
// ============================================================================

#[test]
fn api_surface_compiles() {
    // This test exists only to verify imports compile.
    // If you're here because this test broke, you may have
    // accidentally removed a public re-export.
    let _ = std::any::type_name::<TransformSession<TreeNode>>();
    let _ = std::any::type_name::<TraversalContext<'static, TreeNode>>();
    let _ = std::any::type_name::<EditRecord<TreeNode>>();
    let _ = std::any::type_name::<ParallelBuffer<TreeNode>>();
    let _ = std::any::type_name::<TugzipError>();
    let _ = std::any::type_name::<RecordResponse>();
    let _ = std::any::type_name::<RewriteScript>();
}

#[test]
fn schema_version_is_stable() {
    // The schema version is part of the public API contract
    assert_eq!(SCHEMA_VERSION, "1");
}

#[test]
fn parallel_session_is_shareable() {
    fn assert_sync<S: Sync>() {}
    assert_sync::<TransformSession<TreeNode>>();
    assert_sync::<ParallelBuffer<TreeNode>>();
}
