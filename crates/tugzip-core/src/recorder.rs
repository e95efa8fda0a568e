//! Recorder operations: turn edit requests into queued edit records.
//!
//! Called from a visitor callback with the context of the node being visited.
//! None of these touch the tree; they only append to (or, for repeated
//! sequential changes, overwrite within) the pass's shared buffer.
//!
//! # Policies
//!
//! | Operation | Sequential | Parallel |
//! |-----------|------------|----------|
//! | [`change_node`], first call | append | append |
//! | [`change_node`], later calls | overwrite the node's replace record | [`EditError::ConcurrentEditConflict`] |
//! | [`delete_node`] | append | append |
//! | [`insert_before`] / [`insert_after`] | append | append |
//!
//! Deletes and inserts are never merged with each other or with a replace on
//! the same node. Folding them together is up to the commit phase.

use tracing::{debug, trace, warn};

use crate::buffer::BufferHandle;
use crate::context::{TraversalContext, TraversalControl};
use crate::error::{EditError, EditResult};

/// Replace the visited node with `node`.
///
/// May be called several times per visit in a sequential pass; the latest call
/// wins and the node keeps a single replace record. Under a parallel pass a
/// second call fails with [`EditError::ConcurrentEditConflict`] and nothing is
/// queued. Either error means the pass must be abandoned.
///
/// On success the context is marked edited and its current node becomes
/// `node`, so later requests in the same visit observe it.
pub fn change_node<T: Clone>(
    ctx: &mut TraversalContext<'_, T>,
    node: T,
) -> EditResult<TraversalControl> {
    let anchor = ctx.anchor();
    let edited = ctx.is_edited();
    let replaced = ctx.zipper().with_node(node.clone());

    match ctx.buffer_mut() {
        BufferHandle::Parallel(buffer) => {
            if edited {
                warn!(anchor = %anchor, "rejected second change under parallel traversal");
                return Err(EditError::ConcurrentEditConflict { anchor });
            }
            buffer.push(replaced);
            trace!(anchor = %anchor, "queued replace");
        }
        BufferHandle::Sequential(buffer) => {
            if edited {
                buffer.overwrite(replaced)?;
                debug!(anchor = %anchor, "overwrote replace");
            } else {
                buffer.push(replaced);
                trace!(anchor = %anchor, "queued replace");
            }
        }
    }

    ctx.advance_node(node);
    ctx.mark_edited();
    Ok(TraversalControl::Continue)
}

/// Mark the visited node for removal.
///
/// Always appends a new delete record, even if the node was changed or
/// deleted earlier in the visit.
pub fn delete_node<T>(ctx: &mut TraversalContext<'_, T>) -> TraversalControl {
    let record = ctx.zipper().as_delete();
    ctx.buffer_mut().push(record);
    ctx.mark_deleted();
    trace!(anchor = %ctx.anchor(), "queued delete");
    TraversalControl::Continue
}

/// Insert `sibling` immediately before the visited node.
///
/// Leaves the node itself and the edited flag alone. Repeated calls queue
/// independent records in call order.
pub fn insert_before<T>(ctx: &mut TraversalContext<'_, T>, sibling: T) -> TraversalControl {
    let record = ctx.zipper().as_insert_before(sibling);
    ctx.buffer_mut().push(record);
    trace!(anchor = %ctx.anchor(), "queued insert_before");
    TraversalControl::Continue
}

/// Insert `sibling` immediately after the visited node.
///
/// Leaves the node itself and the edited flag alone. Repeated calls queue
/// independent records in call order.
pub fn insert_after<T>(ctx: &mut TraversalContext<'_, T>, sibling: T) -> TraversalControl {
    let record = ctx.zipper().as_insert_after(sibling);
    ctx.buffer_mut().push(record);
    trace!(anchor = %ctx.anchor(), "queued insert_after");
    TraversalControl::Continue
}
