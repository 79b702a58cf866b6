//! Region and wall editing transactions
//!
//! A transaction wraps one in-progress edit (a region polygon or a set of
//! wall segments) together with local undo/redo stacks scoped to its
//! lifetime. Committed server state is untouched until the commit pipeline
//! runs; rollback simply drops the local state.

mod region;
mod wall;

use serde::{Deserialize, Serialize};

pub use region::{
    RegionCommit, RegionDefaults, RegionSegment, RegionSegmentPatch, RegionTransaction,
    RegionTransactionController, NULL_REGION_LABEL,
};
pub use wall::{
    WallCommitReport, WallSegment, WallSegmentDraft, WallSegmentOutcome, WallSegmentPatch,
    WallSegmentStatus, WallTransaction, WallTransactionController,
};

/// What an active transaction is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    /// Drawing a brand-new entity
    Placement,
    /// Modifying an existing persisted entity
    Editing,
}

/// tempId reserved for the single original segment when editing.
pub(crate) const ORIGINAL_TEMP_ID: i32 = 0;

/// tempId of the first freshly placed segment.
pub(crate) const FIRST_PLACEMENT_TEMP_ID: i32 = -1;
