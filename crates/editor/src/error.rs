//! Commit-boundary error types
//!
//! Validation and persistence failures surface as values, never panics, so
//! the caller can keep the transaction open and let the user continue
//! editing. Display strings are user-visible.

use thiserror::Error;

use crate::ports::{ClipError, PersistenceError};

/// Failure modes of a transaction commit.
///
/// Transaction state is preserved on every variant; the caller decides
/// whether to retry, repair, or roll back.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommitError {
    /// Commit called with no active segment
    #[error("No segment to commit")]
    NoActiveSegment,

    /// Cleaning left fewer vertices than a closed polygon needs
    #[error("Region requires minimum 3 vertices")]
    TooFewVertices,

    /// The injected persistence call rejected
    #[error("{0}")]
    Persistence(#[from] PersistenceError),

    /// Polygon merge computation failed
    #[error("{0}")]
    Clip(#[from] ClipError),
}
