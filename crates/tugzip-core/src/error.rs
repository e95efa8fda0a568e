//! Error types and error codes for edit recording.
//!
//! Both error kinds signal logic errors rather than transient conditions.
//! Neither is retried: once one fires, the shared buffer is no longer
//! consistent and the traversal pass must be abandoned.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (input not found)
//! - `4`: Apply errors (an edit request could not be recorded)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

use crate::node::NodeId;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable numeric error codes, used for JSON output and process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (file not found).
    ResolutionError = 3,
    /// Apply errors (edit request rejected).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Edit Errors
// ============================================================================

/// Errors raised by the recorder operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A node was changed twice during a parallel traversal.
    ///
    /// The parallel buffer is append-only, so the first replace record cannot
    /// be located and overwritten.
    #[error("multiple changes per node are not supported under parallel traversal ({anchor})")]
    ConcurrentEditConflict { anchor: NodeId },

    /// A sequential overwrite found no replace record for a node flagged as
    /// edited.
    #[error("no replace record found for edited node {anchor}")]
    BookkeepingInvariantViolation { anchor: NodeId },
}

/// Result type for recorder operations.
pub type EditResult<T> = Result<T, EditError>;

impl EditError {
    /// The anchor of the node whose edit request failed.
    pub fn anchor(&self) -> NodeId {
        match self {
            EditError::ConcurrentEditConflict { anchor } => *anchor,
            EditError::BookkeepingInvariantViolation { anchor } => *anchor,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

impl From<&EditError> for OutputErrorCode {
    fn from(err: &EditError) -> Self {
        match err {
            EditError::ConcurrentEditConflict { .. } => OutputErrorCode::ApplyError,
            EditError::BookkeepingInvariantViolation { .. } => OutputErrorCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn conflict_maps_to_apply_error() {
            let err = EditError::ConcurrentEditConflict {
                anchor: NodeId::new(1),
            };
            assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn invariant_violation_maps_to_internal_error() {
            let err = EditError::BookkeepingInvariantViolation {
                anchor: NodeId::new(1),
            };
            assert_eq!(OutputErrorCode::from(&err), OutputErrorCode::InternalError);
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn conflict_display_names_node() {
            let err = EditError::ConcurrentEditConflict {
                anchor: NodeId::new(3),
            };
            assert_eq!(
                err.to_string(),
                "multiple changes per node are not supported under parallel traversal (node_3)"
            );
            assert_eq!(err.anchor(), NodeId::new(3));
        }

        #[test]
        fn invariant_violation_display() {
            let err = EditError::BookkeepingInvariantViolation {
                anchor: NodeId::new(9),
            };
            assert_eq!(err.to_string(), "no replace record found for edited node node_9");
        }

        #[test]
        fn output_code_display_shows_number() {
            assert_eq!(format!("{}", OutputErrorCode::InvalidArguments), "2");
            assert_eq!(format!("{}", OutputErrorCode::ResolutionError), "3");
            assert_eq!(format!("{}", OutputErrorCode::InternalError), "10");
        }
    }
}
