//! Shared edit buffers for one traversal pass.
//!
//! Two variants, chosen once per pass from the traversal mode:
//!
//! - [`SequentialBuffer`]: an ordered `Vec` of records plus an index of the
//!   replace record for each anchor. Reached through `&mut`, so it never needs
//!   to be thread safe. Supports keyed find-and-replace.
//! - [`ParallelBuffer`]: an append-only multi-producer queue. Reached through
//!   `&`, shared by every worker. There is no find or replace.
//!
//! Contexts reach the buffer through a [`BufferHandle`], which borrows the
//! variant the way that variant is meant to be accessed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::queue::SegQueue;

use crate::context::TraversalMode;
use crate::error::{EditError, EditResult};
use crate::node::NodeId;
use crate::zipper::EditRecord;

// ============================================================================
// Sequential Buffer
// ============================================================================

/// Ordered edit buffer for single-threaded walks.
#[derive(Debug)]
pub struct SequentialBuffer<T> {
    records: Vec<EditRecord<T>>,
    /// Position of the replace record for each anchor.
    replace_index: HashMap<NodeId, usize>,
}

impl<T> SequentialBuffer<T> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty buffer with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        SequentialBuffer {
            records: Vec::with_capacity(capacity),
            replace_index: HashMap::new(),
        }
    }

    /// Append a record.
    pub fn push(&mut self, record: EditRecord<T>) {
        if record.is_replace() {
            self.replace_index.insert(record.anchor(), self.records.len());
        }
        self.records.push(record);
    }

    /// Overwrite the queued replace record for `record.anchor()` with `record`.
    ///
    /// The record keeps its position in the buffer. Returns
    /// [`EditError::BookkeepingInvariantViolation`] if no replace record exists
    /// for the anchor.
    pub fn overwrite(&mut self, record: EditRecord<T>) -> EditResult<()> {
        debug_assert!(record.is_replace(), "only replace records are overwritten");
        let anchor = record.anchor();
        let slot = self
            .replace_index
            .get(&anchor)
            .and_then(|&index| self.records.get_mut(index))
            .ok_or(EditError::BookkeepingInvariantViolation { anchor })?;
        *slot = record;
        Ok(())
    }

    /// The replace record currently queued for `anchor`, if any.
    pub fn replace_record(&self, anchor: NodeId) -> Option<&EditRecord<T>> {
        self.replace_index
            .get(&anchor)
            .and_then(|&index| self.records.get(index))
    }

    /// Records in accumulation order.
    pub fn records(&self) -> &[EditRecord<T>] {
        &self.records
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records are queued.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the buffer, returning records in accumulation order.
    pub fn into_records(self) -> Vec<EditRecord<T>> {
        self.records
    }
}

impl<T> Default for SequentialBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Parallel Buffer
// ============================================================================

/// Append-only edit buffer shared by concurrent workers.
#[derive(Debug)]
pub struct ParallelBuffer<T> {
    queue: SegQueue<EditRecord<T>>,
    len: AtomicUsize,
}

impl<T> ParallelBuffer<T> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        ParallelBuffer {
            queue: SegQueue::new(),
            len: AtomicUsize::new(0),
        }
    }

    /// Append a record. Safe to call from any number of threads.
    pub fn push(&self, record: EditRecord<T>) {
        self.queue.push(record);
        self.len.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Check if no records are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the buffer, returning records in delivery order.
    pub fn into_records(self) -> Vec<EditRecord<T>> {
        let mut records = Vec::with_capacity(self.len.into_inner());
        while let Some(record) = self.queue.pop() {
            records.push(record);
        }
        records
    }
}

impl<T> Default for ParallelBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Edit Buffer
// ============================================================================

/// The buffer for one traversal pass, in the variant matching its mode.
#[derive(Debug)]
pub enum EditBuffer<T> {
    Sequential(SequentialBuffer<T>),
    Parallel(ParallelBuffer<T>),
}

impl<T> EditBuffer<T> {
    /// Create the buffer variant for `mode`.
    ///
    /// `capacity` preallocates the sequential variant; the parallel queue
    /// grows in segments and ignores it.
    pub fn new(mode: TraversalMode, capacity: usize) -> Self {
        match mode {
            TraversalMode::Sequential => {
                EditBuffer::Sequential(SequentialBuffer::with_capacity(capacity))
            }
            TraversalMode::Parallel => EditBuffer::Parallel(ParallelBuffer::new()),
        }
    }

    /// The mode this buffer serves.
    pub fn mode(&self) -> TraversalMode {
        match self {
            EditBuffer::Sequential(_) => TraversalMode::Sequential,
            EditBuffer::Parallel(_) => TraversalMode::Parallel,
        }
    }

    /// Borrow a handle for building traversal contexts.
    pub fn handle(&mut self) -> BufferHandle<'_, T> {
        match self {
            EditBuffer::Sequential(buffer) => BufferHandle::Sequential(buffer),
            EditBuffer::Parallel(buffer) => BufferHandle::Parallel(buffer),
        }
    }

    /// The parallel variant, shareable across worker threads.
    pub fn shared(&self) -> Option<&ParallelBuffer<T>> {
        match self {
            EditBuffer::Sequential(_) => None,
            EditBuffer::Parallel(buffer) => Some(buffer),
        }
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        match self {
            EditBuffer::Sequential(buffer) => buffer.len(),
            EditBuffer::Parallel(buffer) => buffer.len(),
        }
    }

    /// Check if no records are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the buffer, returning records in accumulation order.
    pub fn into_records(self) -> Vec<EditRecord<T>> {
        match self {
            EditBuffer::Sequential(buffer) => buffer.into_records(),
            EditBuffer::Parallel(buffer) => buffer.into_records(),
        }
    }
}

// ============================================================================
// Buffer Handle
// ============================================================================

/// A context's access path to the shared buffer.
///
/// The sequential variant is an exclusive borrow, so nested contexts reborrow
/// it; the parallel variant is a shared borrow and can be copied freely.
#[derive(Debug)]
pub enum BufferHandle<'s, T> {
    Sequential(&'s mut SequentialBuffer<T>),
    Parallel(&'s ParallelBuffer<T>),
}

impl<'s, T> BufferHandle<'s, T> {
    /// The mode of the underlying buffer.
    pub fn mode(&self) -> TraversalMode {
        match self {
            BufferHandle::Sequential(_) => TraversalMode::Sequential,
            BufferHandle::Parallel(_) => TraversalMode::Parallel,
        }
    }

    /// Reborrow for a shorter lifetime, e.g. for a nested visit.
    pub fn reborrow(&mut self) -> BufferHandle<'_, T> {
        match self {
            BufferHandle::Sequential(buffer) => BufferHandle::Sequential(buffer),
            BufferHandle::Parallel(buffer) => BufferHandle::Parallel(buffer),
        }
    }

    /// Append a record, whatever the variant.
    pub fn push(&mut self, record: EditRecord<T>) {
        match self {
            BufferHandle::Sequential(buffer) => buffer.push(record),
            BufferHandle::Parallel(buffer) => buffer.push(record),
        }
    }

    /// Number of records queued so far.
    pub fn len(&self) -> usize {
        match self {
            BufferHandle::Sequential(buffer) => buffer.len(),
            BufferHandle::Parallel(buffer) => buffer.len(),
        }
    }

    /// Check if no records are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'s, T> From<&'s mut SequentialBuffer<T>> for BufferHandle<'s, T> {
    fn from(buffer: &'s mut SequentialBuffer<T>) -> Self {
        BufferHandle::Sequential(buffer)
    }
}

impl<'s, T> From<&'s ParallelBuffer<T>> for BufferHandle<'s, T> {
    fn from(buffer: &'s ParallelBuffer<T>) -> Self {
        BufferHandle::Parallel(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zipper::{EditKind, NodeZipper};

    fn view(id: u32, node: &'static str) -> NodeZipper<&'static str> {
        NodeZipper::new(NodeId::new(id), node)
    }

    mod sequential {
        use super::*;

        #[test]
        fn push_keeps_order() {
            let mut buffer = SequentialBuffer::new();
            buffer.push(view(0, "a").as_insert_before("x"));
            buffer.push(view(0, "a").as_delete());
            buffer.push(view(1, "b").with_node("b2"));

            let kinds: Vec<_> = buffer.records().iter().map(|r| r.kind().name()).collect();
            assert_eq!(kinds, vec!["insert_before", "delete", "replace"]);
            assert_eq!(buffer.len(), 3);
        }

        #[test]
        fn overwrite_replaces_in_place() {
            let mut buffer = SequentialBuffer::new();
            buffer.push(view(0, "a").with_node("a2"));
            buffer.push(view(1, "b").with_node("b2"));

            buffer.overwrite(view(0, "a2").with_node("a3")).unwrap();

            assert_eq!(buffer.len(), 2);
            assert_eq!(buffer.records()[0].kind(), &EditKind::Replace("a3"));
            assert_eq!(buffer.records()[0].anchor(), NodeId::new(0));
            assert_eq!(
                buffer.replace_record(NodeId::new(1)).map(|r| r.kind()),
                Some(&EditKind::Replace("b2"))
            );
        }

        #[test]
        fn overwrite_ignores_non_replace_records() {
            let mut buffer = SequentialBuffer::new();
            buffer.push(view(0, "a").as_delete());

            let err = buffer.overwrite(view(0, "a").with_node("a2")).unwrap_err();
            assert_eq!(
                err,
                EditError::BookkeepingInvariantViolation {
                    anchor: NodeId::new(0)
                }
            );
            assert_eq!(buffer.records()[0].kind(), &EditKind::Delete);
        }

        #[test]
        fn overwrite_on_empty_buffer_is_invariant_violation() {
            let mut buffer = SequentialBuffer::default();
            assert!(buffer.overwrite(view(5, "x").with_node("y")).is_err());
            assert!(buffer.is_empty());
        }
    }

    mod parallel {
        use super::*;
        use rayon::prelude::*;

        #[test]
        fn into_records_preserves_delivery_order() {
            let buffer = ParallelBuffer::new();
            buffer.push(view(0, "a").with_node("a2"));
            buffer.push(view(1, "b").as_delete());
            assert_eq!(buffer.len(), 2);

            let records = buffer.into_records();
            assert_eq!(records[0].anchor(), NodeId::new(0));
            assert_eq!(records[1].kind(), &EditKind::Delete);
        }

        #[test]
        fn concurrent_pushes_are_all_retained() {
            let buffer = ParallelBuffer::new();
            (0..1000u32).into_par_iter().for_each(|id| {
                buffer.push(NodeZipper::new(NodeId::new(id), id).as_delete());
            });
            assert_eq!(buffer.len(), 1000);

            let mut anchors: Vec<_> = buffer
                .into_records()
                .into_iter()
                .map(|r| r.anchor().index())
                .collect();
            anchors.sort_unstable();
            assert_eq!(anchors, (0..1000).collect::<Vec<_>>());
        }
    }

    mod edit_buffer {
        use super::*;

        #[test]
        fn mode_selects_variant() {
            let sequential: EditBuffer<u8> = EditBuffer::new(TraversalMode::Sequential, 8);
            let parallel: EditBuffer<u8> = EditBuffer::new(TraversalMode::Parallel, 8);
            assert_eq!(sequential.mode(), TraversalMode::Sequential);
            assert_eq!(parallel.mode(), TraversalMode::Parallel);
            assert!(sequential.shared().is_none());
            assert!(parallel.shared().is_some());
        }

        #[test]
        fn handle_reports_mode_and_appends() {
            let mut buffer = EditBuffer::new(TraversalMode::Parallel, 0);
            {
                let mut handle = buffer.handle();
                assert_eq!(handle.mode(), TraversalMode::Parallel);
                handle.push(view(0, "a").as_delete());
                let mut nested = handle.reborrow();
                nested.push(view(1, "b").as_delete());
                assert_eq!(nested.len(), 2);
            }
            assert_eq!(buffer.len(), 2);
            assert!(!buffer.is_empty());
            assert_eq!(buffer.into_records().len(), 2);
        }
    }
}
