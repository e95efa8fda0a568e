//! JSON output types for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Always JSON:** All CLI output on stdout is valid JSON
//! 2. **Status first:** Every response has `status` as first field
//! 3. **Deterministic:** Same input -> same output (field order, record order)
//! 4. **Versioned:** Schema version in response enables forward compatibility
//!
//! Parallel walks append records in completion order, so the driver sorts
//! parallel output by anchor before building the response. The sort is
//! stable and keeps the per-node order of each visit.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use tugzip_core::context::TraversalMode;
use tugzip_core::node::NodeId;
use tugzip_core::zipper::{EditKind, EditRecord};

use crate::error::{OutputErrorCode, TugzipError};
use crate::tree::TreeNode;
use crate::walk::WalkSummary;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Record Response
// ============================================================================

/// Count of recorded edits per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub total: usize,
    pub replace: usize,
    pub delete: usize,
    pub insert_before: usize,
    pub insert_after: usize,
}

impl RecordSummary {
    pub fn from_records<T>(records: &[EditRecord<T>]) -> Self {
        let mut summary = RecordSummary {
            total: records.len(),
            ..RecordSummary::default()
        };
        for record in records {
            match record.kind() {
                EditKind::Replace(_) => summary.replace += 1,
                EditKind::Delete => summary.delete += 1,
                EditKind::InsertBefore(_) => summary.insert_before += 1,
                EditKind::InsertAfter(_) => summary.insert_after += 1,
            }
        }
        summary
    }
}

/// Response for `tugzip record`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    /// Traversal mode the walk ran in.
    pub mode: TraversalMode,
    /// Nodes handed to the rewriter.
    pub visited: usize,
    /// True if the walk ended early.
    pub stopped: bool,
    /// Recorded edits, in buffer order (sorted by anchor for parallel walks).
    pub records: Vec<EditRecord<TreeNode>>,
    pub summary: RecordSummary,
}

impl RecordResponse {
    pub fn new(mode: TraversalMode, walk: WalkSummary, records: Vec<EditRecord<TreeNode>>) -> Self {
        RecordResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            mode,
            visited: walk.visited,
            stopped: walk.stopped,
            summary: RecordSummary::from_records(&records),
            records,
        }
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Error details for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Numeric error code (2, 3, 4 or 10).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Node the error is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<NodeId>,
}

impl ErrorInfo {
    /// Create from a TugzipError.
    pub fn from_error(err: &TugzipError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            anchor: err.anchor(),
        }
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &TugzipError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emitting
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a response as compact JSON (single line) to a writer.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
