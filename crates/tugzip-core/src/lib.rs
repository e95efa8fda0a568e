//! Core edit-recording protocol for tugzip.
//!
//! This crate lets a visitor callback request structural edits while a tree
//! walk is in progress, without touching the tree itself:
//! - Stable node ids used as edit anchors
//! - Immutable edit records (replace, delete, insert before, insert after)
//! - Shared edit buffers for sequential and parallel walks
//! - Per-visit traversal contexts
//! - The recorder operations that accumulate edits
//! - Sessions that own the buffer for one pass
//!
//! Walking the tree and folding the recorded edits back into a new tree are
//! left to the caller.
//!
//! # Example
//!
//! ```
//! use tugzip_core::node::NodeId;
//! use tugzip_core::recorder::{change_node, insert_after};
//! use tugzip_core::session::TransformSession;
//! use tugzip_core::zipper::EditKind;
//!
//! let mut session = TransformSession::sequential();
//! {
//!     let mut ctx = session.context(NodeId::new(0), "a");
//!     change_node(&mut ctx, "a2").unwrap();
//!     change_node(&mut ctx, "a3").unwrap();
//!     insert_after(&mut ctx, "b");
//! }
//!
//! let records = session.into_records();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].kind(), &EditKind::Replace("a3"));
//! assert_eq!(records[1].kind(), &EditKind::InsertAfter("b"));
//! ```

pub mod buffer;
pub mod context;
pub mod error;
pub mod node;
pub mod recorder;
pub mod session;
pub mod zipper;

pub use context::{TraversalContext, TraversalControl, TraversalMode};
pub use error::{EditError, EditResult, OutputErrorCode};
pub use node::NodeId;
pub use zipper::{EditKind, EditRecord, NodeZipper};
