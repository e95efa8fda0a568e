//! Reference walkers that drive a rewriter over a tree.
//!
//! Both walkers visit nodes pre-order and number them by pre-order index over
//! the original tree (the root is `node_0`), so a node gets the same id in
//! either mode. Children always come from the original tree; edits requested
//! during a visit are only recorded.
//!
//! # Control Flow
//!
//! - `TraversalControl::Continue` - traverse into children
//! - `TraversalControl::SkipChildren` - skip children, continue with siblings
//! - `TraversalControl::Stop` - no further nodes are visited
//!
//! The first recorder error aborts the walk and is returned.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::debug;

use tugzip_core::buffer::ParallelBuffer;
use tugzip_core::context::{TraversalContext, TraversalControl, TraversalMode};
use tugzip_core::error::EditResult;
use tugzip_core::node::NodeId;
use tugzip_core::session::TransformSession;

use crate::error::TugzipError;
use crate::tree::Walkable;

/// Visitor callback invoked once per visited node.
pub trait Rewriter<T> {
    /// Inspect the node behind `ctx` and request edits through the recorder.
    fn visit(&self, ctx: &mut TraversalContext<'_, T>) -> EditResult<TraversalControl>;
}

/// Outcome of a completed walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Number of nodes handed to the rewriter.
    pub visited: usize,
    /// True if a visit returned `TraversalControl::Stop`.
    pub stopped: bool,
}

/// Walk `root` with the walker matching the session's mode.
pub fn walk<T, R>(
    session: &mut TransformSession<T>,
    root: &T,
    rewriter: &R,
) -> Result<WalkSummary, TugzipError>
where
    T: Walkable + Clone + Send + Sync,
    R: Rewriter<T> + Sync + ?Sized,
{
    match session.mode() {
        TraversalMode::Sequential => walk_sequential(session, root, rewriter),
        TraversalMode::Parallel => walk_parallel(session, root, rewriter),
    }
}

// ============================================================================
// Sequential
// ============================================================================

/// Walk `root` on the current thread, in source order.
pub fn walk_sequential<T, R>(
    session: &mut TransformSession<T>,
    root: &T,
    rewriter: &R,
) -> Result<WalkSummary, TugzipError>
where
    T: Walkable + Clone,
    R: Rewriter<T> + ?Sized,
{
    let mut summary = WalkSummary::default();
    let mut ctx = session.context(NodeId::new(0), root.clone());
    let control = visit_sequential(&mut ctx, root, 0, rewriter, &mut summary)?;
    summary.stopped = control == TraversalControl::Stop;

    debug!(
        visited = summary.visited,
        stopped = summary.stopped,
        "sequential walk finished"
    );
    Ok(summary)
}

fn visit_sequential<T, R>(
    ctx: &mut TraversalContext<'_, T>,
    original: &T,
    id: u32,
    rewriter: &R,
    summary: &mut WalkSummary,
) -> EditResult<TraversalControl>
where
    T: Walkable + Clone,
    R: Rewriter<T> + ?Sized,
{
    summary.visited += 1;
    match rewriter.visit(ctx)? {
        TraversalControl::Stop => return Ok(TraversalControl::Stop),
        TraversalControl::SkipChildren => return Ok(TraversalControl::Continue),
        TraversalControl::Continue => {}
    }

    for (child_id, child) in child_ids(original, id) {
        let mut child_ctx = ctx.child(NodeId::new(child_id), child.clone());
        if visit_sequential(&mut child_ctx, child, child_id, rewriter, summary)?
            == TraversalControl::Stop
        {
            return Ok(TraversalControl::Stop);
        }
    }
    Ok(TraversalControl::Continue)
}

// ============================================================================
// Parallel
// ============================================================================

/// Walk `root` with siblings visited concurrently on the rayon pool.
///
/// Requires a parallel session. `Stop` prevents visits that have not started
/// yet; visits already running on other workers complete.
pub fn walk_parallel<T, R>(
    session: &TransformSession<T>,
    root: &T,
    rewriter: &R,
) -> Result<WalkSummary, TugzipError>
where
    T: Walkable + Clone + Send + Sync,
    R: Rewriter<T> + Sync + ?Sized,
{
    let shared = session.shared_buffer().ok_or_else(|| {
        TugzipError::invalid_args(format!(
            "parallel walk requires a parallel session, got {}",
            session.mode()
        ))
    })?;

    let walk = ParallelWalk {
        shared,
        rewriter,
        visited: AtomicUsize::new(0),
        stopped: AtomicBool::new(false),
    };
    walk.visit(root, 0)?;

    let summary = WalkSummary {
        visited: walk.visited.into_inner(),
        stopped: walk.stopped.into_inner(),
    };
    debug!(
        visited = summary.visited,
        stopped = summary.stopped,
        "parallel walk finished"
    );
    Ok(summary)
}

struct ParallelWalk<'a, T, R: ?Sized> {
    shared: &'a ParallelBuffer<T>,
    rewriter: &'a R,
    visited: AtomicUsize,
    stopped: AtomicBool,
}

impl<T, R> ParallelWalk<'_, T, R>
where
    T: Walkable + Clone + Send + Sync,
    R: Rewriter<T> + Sync + ?Sized,
{
    fn visit(&self, node: &T, id: u32) -> EditResult<()> {
        if self.stopped.load(Ordering::Relaxed) {
            return Ok(());
        }
        self.visited.fetch_add(1, Ordering::Relaxed);

        let mut ctx = TraversalContext::new(NodeId::new(id), node.clone(), self.shared);
        match self.rewriter.visit(&mut ctx)? {
            TraversalControl::Stop => {
                self.stopped.store(true, Ordering::Relaxed);
                return Ok(());
            }
            TraversalControl::SkipChildren => return Ok(()),
            TraversalControl::Continue => {}
        }

        child_ids(node, id)
            .into_par_iter()
            .try_for_each(|(child_id, child)| self.visit(child, child_id))
    }
}

/// Pre-order ids of `node`'s children, given `node`'s own id.
fn child_ids<T: Walkable>(node: &T, id: u32) -> Vec<(u32, &T)> {
    let mut next = id + 1;
    node.children()
        .iter()
        .map(|child| {
            let child_id = next;
            next += child.size() as u32;
            (child_id, child)
        })
        .collect()
}
