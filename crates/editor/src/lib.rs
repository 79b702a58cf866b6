//! Tablewright editor core
//!
//! Client-side transaction layer for scene geometry editing: region and wall
//! transactions with local undo/redo, merge detection for overlapping
//! regions, and fog-of-war placement planning. Persistence and polygon
//! boolean operations are reached through ports so the core stays free of
//! transport and rendering concerns.

pub mod error;
pub mod fog;
pub mod history;
pub mod infrastructure;
pub mod merge;
pub mod ports;
pub mod transaction;

pub use error::CommitError;
pub use fog::{
    plan_fog_placement, FogMode, FogPlacement, FogRegionDraft, FOG_HIDDEN_VALUE,
    FOG_SUBTRACT_VALUE,
};
pub use history::{CallbackAction, LocalAction, UndoHistory};
pub use infrastructure::TessClipper;
pub use merge::{
    compute_clip_results, find_clippable_regions, find_mergeable_regions,
    find_regions_for_null_clip, merge_polygons, RegionClip,
};
pub use ports::{
    ClipError, PersistenceError, PolygonClipper, RegionWriteData, ScenePersistencePort,
    WallWriteData,
};
pub use transaction::{
    RegionCommit, RegionDefaults, RegionSegment, RegionSegmentPatch, RegionTransaction,
    RegionTransactionController, TransactionKind, WallCommitReport, WallSegment,
    WallSegmentDraft, WallSegmentOutcome, WallSegmentPatch, WallSegmentStatus, WallTransaction,
    WallTransactionController, NULL_REGION_LABEL,
};
