//! Unified error type for the tugzip driver and CLI.
//!
//! `TugzipError` bridges recorder errors from `tugzip-core` and input errors
//! (unreadable files, malformed JSON, invalid rule scripts) into one type with
//! a stable numeric code for JSON output and the process exit status.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (malformed tree or script, wrong session mode)
//! - `3`: Resolution errors (input file not found)
//! - `4`: Apply errors (edit request rejected by the recorder)
//! - `10`: Internal errors (bugs, unexpected state)

use std::io;
use std::path::Path;

use thiserror::Error;

pub use tugzip_core::error::{EditError, OutputErrorCode};
use tugzip_core::node::NodeId;

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum TugzipError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// An edit request was rejected during the walk.
    #[error("edit conflict at {anchor}: {message}")]
    EditConflict { anchor: NodeId, message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError {
        message: String,
        anchor: Option<NodeId>,
    },
}

impl From<&TugzipError> for OutputErrorCode {
    fn from(err: &TugzipError) -> Self {
        match err {
            TugzipError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            TugzipError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            TugzipError::EditConflict { .. } => OutputErrorCode::ApplyError,
            TugzipError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<EditError> for TugzipError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::ConcurrentEditConflict { anchor } => TugzipError::EditConflict {
                anchor,
                message: err.to_string(),
            },
            EditError::BookkeepingInvariantViolation { anchor } => TugzipError::InternalError {
                message: err.to_string(),
                anchor: Some(anchor),
            },
        }
    }
}

impl From<serde_json::Error> for TugzipError {
    fn from(err: serde_json::Error) -> Self {
        TugzipError::InvalidArguments {
            message: format!("malformed JSON: {}", err),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl TugzipError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        TugzipError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        TugzipError::FileNotFound { path: path.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        TugzipError::InternalError {
            message: message.into(),
            anchor: None,
        }
    }

    /// Map an IO error from reading `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => TugzipError::file_not_found(path.display().to_string()),
            _ => TugzipError::internal(format!("failed to read {}: {}", path.display(), err)),
        }
    }

    /// The node the error is attached to, if any.
    pub fn anchor(&self) -> Option<NodeId> {
        match self {
            TugzipError::EditConflict { anchor, .. } => Some(*anchor),
            TugzipError::InternalError { anchor, .. } => *anchor,
            _ => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn conflict_maps_to_apply_error() {
            let err = TugzipError::from(EditError::ConcurrentEditConflict {
                anchor: NodeId::new(2),
            });
            assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
            assert_eq!(err.anchor(), Some(NodeId::new(2)));
        }

        #[test]
        fn invariant_violation_maps_to_internal_error() {
            let err = TugzipError::from(EditError::BookkeepingInvariantViolation {
                anchor: NodeId::new(3),
            });
            assert_eq!(err.error_code().code(), 10);
            assert_eq!(err.anchor(), Some(NodeId::new(3)));
        }

        #[test]
        fn missing_file_maps_to_resolution_error() {
            let err = TugzipError::from_io(
                Path::new("missing.json"),
                io::Error::new(io::ErrorKind::NotFound, "gone"),
            );
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
            assert_eq!(err.to_string(), "file not found: missing.json");
        }

        #[test]
        fn other_io_errors_are_internal() {
            let err = TugzipError::from_io(
                Path::new("tree.json"),
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            );
            assert_eq!(err.error_code(), OutputErrorCode::InternalError);
            assert_eq!(err.anchor(), None);
        }

        #[test]
        fn json_errors_are_invalid_arguments() {
            let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            let err = TugzipError::from(json_err);
            assert_eq!(err.error_code().code(), 2);
            assert!(err.to_string().starts_with("invalid arguments: malformed JSON"));
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn conflict_display() {
            let err = TugzipError::from(EditError::ConcurrentEditConflict {
                anchor: NodeId::new(1),
            });
            assert_eq!(
                err.to_string(),
                "edit conflict at node_1: multiple changes per node are not supported under parallel traversal (node_1)"
            );
        }

        #[test]
        fn invalid_arguments_display() {
            let err = TugzipError::invalid_args("rule 0 needs a node");
            assert_eq!(err.to_string(), "invalid arguments: rule 0 needs a node");
        }
    }
}
