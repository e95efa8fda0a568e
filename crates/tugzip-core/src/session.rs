//! Transform sessions: one shared edit buffer per traversal pass.
//!
//! A session is created at the start of a pass, hands out contexts (or, for
//! parallel passes, the shared buffer workers build their own contexts from),
//! and is consumed at the end to give the commit phase every record in
//! accumulation order.
//!
//! # Sequential pass
//!
//! ```
//! use tugzip_core::node::NodeId;
//! use tugzip_core::recorder::{change_node, delete_node};
//! use tugzip_core::session::TransformSession;
//!
//! let mut session = TransformSession::sequential();
//! let mut root = session.context(NodeId::new(0), "root");
//! {
//!     let mut a = root.child(NodeId::new(1), "a");
//!     change_node(&mut a, "a2").unwrap();
//! }
//! {
//!     let mut b = root.child(NodeId::new(2), "b");
//!     delete_node(&mut b);
//! }
//! drop(root);
//! assert_eq!(session.into_records().len(), 2);
//! ```
//!
//! # Parallel pass
//!
//! ```
//! use std::thread;
//! use tugzip_core::context::TraversalContext;
//! use tugzip_core::node::NodeId;
//! use tugzip_core::recorder::change_node;
//! use tugzip_core::session::TransformSession;
//!
//! let session = TransformSession::parallel();
//! let shared = session.shared_buffer().unwrap();
//! thread::scope(|scope| {
//!     for id in 1..=4u32 {
//!         scope.spawn(move || {
//!             let mut ctx = TraversalContext::new(NodeId::new(id), id, shared);
//!             change_node(&mut ctx, id * 10).unwrap();
//!         });
//!     }
//! });
//! assert_eq!(session.into_records().len(), 4);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::{EditBuffer, ParallelBuffer};
use crate::context::{TraversalContext, TraversalMode};
use crate::node::NodeId;
use crate::zipper::EditRecord;

// ============================================================================
// Options
// ============================================================================

/// Configuration for one transform session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Traversal mode; selects the buffer variant.
    pub mode: TraversalMode,
    /// Expected number of records, used to preallocate the sequential buffer.
    pub capacity_hint: usize,
}

impl SessionOptions {
    /// Options for the given mode with no capacity hint.
    pub fn new(mode: TraversalMode) -> Self {
        SessionOptions {
            mode,
            capacity_hint: 0,
        }
    }

    /// Set the capacity hint.
    pub fn with_capacity_hint(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }
}

// ============================================================================
// Session
// ============================================================================

/// Owner of the shared edit buffer for one traversal pass.
#[derive(Debug)]
pub struct TransformSession<T> {
    buffer: EditBuffer<T>,
}

impl<T> TransformSession<T> {
    /// Create a session, choosing the buffer variant from `options.mode`.
    pub fn new(options: SessionOptions) -> Self {
        debug!(mode = %options.mode, capacity_hint = options.capacity_hint, "opening transform session");
        TransformSession {
            buffer: EditBuffer::new(options.mode, options.capacity_hint),
        }
    }

    /// Create a sequential session with default options.
    pub fn sequential() -> Self {
        Self::new(SessionOptions::new(TraversalMode::Sequential))
    }

    /// Create a parallel session with default options.
    pub fn parallel() -> Self {
        Self::new(SessionOptions::new(TraversalMode::Parallel))
    }

    /// The traversal mode of this session.
    pub fn mode(&self) -> TraversalMode {
        self.buffer.mode()
    }

    /// Build the context for a node entering traversal.
    ///
    /// The context holds the session's buffer until it is dropped. In a
    /// sequential pass nested visits go through [`TraversalContext::child`].
    pub fn context(&mut self, anchor: NodeId, node: T) -> TraversalContext<'_, T> {
        TraversalContext::new(anchor, node, self.buffer.handle())
    }

    /// The shared buffer of a parallel session.
    ///
    /// Workers build their own contexts with [`TraversalContext::new`].
    /// Returns `None` for sequential sessions.
    pub fn shared_buffer(&self) -> Option<&ParallelBuffer<T>> {
        self.buffer.shared()
    }

    /// Number of records queued so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no records are queued.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// End the pass, returning every record in accumulation order.
    pub fn into_records(self) -> Vec<EditRecord<T>> {
        let mode = self.buffer.mode();
        let records = self.buffer.into_records();
        debug!(mode = %mode, count = records.len(), "transform session finished");
        records
    }
}

impl<T> Default for TransformSession<T> {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}
