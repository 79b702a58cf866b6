//! Region placement and editing transactions
//!
//! Regions are always closed polygons requiring minimum 3 vertices. A
//! transaction manages exactly one segment; committing it creates or edits
//! a region, or resolves to one of three geometric outcomes against the
//! current scene, checked in order: null clip (an eraser segment carves
//! every overlapping same-kind region), merge (union with overlapping
//! regions of matching kind, value, and label), then clip (the segment
//! carves overlapping same-kind regions whose value or label differs).
//! Geometric outcomes are returned to the caller, which owns the actual
//! delete/update of the affected regions.

use std::sync::Arc;

use tracing::debug;

use tablewright_domain::{clean_vertices, GridConfig, Point, SceneId, SceneRegion};

use crate::error::CommitError;
use crate::history::{LocalAction, UndoHistory};
use crate::merge::{
    compute_clip_results, find_clippable_regions, find_mergeable_regions,
    find_regions_for_null_clip, merge_polygons, RegionClip,
};
use crate::ports::{PolygonClipper, RegionWriteData, ScenePersistencePort};

use super::{TransactionKind, FIRST_PLACEMENT_TEMP_ID, ORIGINAL_TEMP_ID};

/// Label marking a segment as an eraser: a null region is never persisted,
/// it only removes its area from overlapping same-kind regions.
pub const NULL_REGION_LABEL: &str = "null";

/// The region being placed or edited in a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSegment {
    /// Transaction-local identity: 0 for an edited original, -1 for a
    /// freshly placed segment
    pub temp_id: i32,
    /// Server slot, None until persisted
    pub region_index: Option<u32>,
    pub name: String,
    pub vertices: Vec<Point>,
    pub kind: String,
    pub value: Option<i32>,
    pub label: Option<String>,
    pub color: Option<String>,
}

impl RegionSegment {
    /// Whether this segment is an eraser rather than a real region.
    pub fn is_null_region(&self) -> bool {
        self.label.as_deref() == Some(NULL_REGION_LABEL)
    }
}

/// Transaction state for region operations.
#[derive(Debug, Clone, Default)]
pub struct RegionTransaction {
    pub kind: Option<TransactionKind>,
    pub original_region: Option<SceneRegion>,
    pub segment: Option<RegionSegment>,
    pub is_active: bool,
}

/// Seed properties for a placement transaction.
#[derive(Debug, Clone, Default)]
pub struct RegionDefaults {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub value: Option<i32>,
    pub label: Option<String>,
    pub color: Option<String>,
}

/// Partial update for the active segment.
///
/// `temp_id` and `region_index` are identity fields and deliberately absent:
/// no patch can alter them.
#[derive(Debug, Clone, Default)]
pub struct RegionSegmentPatch {
    pub name: Option<String>,
    pub vertices: Option<Vec<Point>>,
    pub kind: Option<String>,
    pub value: Option<i32>,
    pub label: Option<String>,
    pub color: Option<String>,
}

/// Outcome of a successful region commit.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionCommit {
    /// A new region was persisted at the returned index
    Created { region_index: u32 },
    /// The existing region at the returned index was updated
    Edited { region_index: u32 },
    /// The segment overlaps existing regions; the caller applies the merge.
    /// Nothing was persisted and the transaction stays open.
    Merge {
        /// Surviving region (smallest index among the matches)
        target_region_index: u32,
        /// Union of the segment and all matched regions
        merged_vertices: Vec<Point>,
        /// Absorbed regions, plus the edited original when it is not the target
        regions_to_delete: Vec<u32>,
        /// Snapshot of the matched regions before the merge
        original_regions: Vec<SceneRegion>,
    },
    /// The segment carves its area out of overlapping same-kind regions
    /// whose value or label differs. The caller applies the clips and then
    /// persists the segment itself; the transaction stays open.
    Clip {
        clip_results: Vec<RegionClip>,
        /// Snapshot of the clipped regions before the cut
        original_regions: Vec<SceneRegion>,
    },
    /// An eraser segment removed its area from overlapping same-kind
    /// regions. The segment itself is never persisted. Empty results mean
    /// there was nothing to erase.
    NullClip {
        clip_results: Vec<RegionClip>,
        original_regions: Vec<SceneRegion>,
    },
}

/// Manages region placement and editing transactions for the scene editor.
///
/// Provides transaction lifecycle management (start, update, commit,
/// rollback) and local undo/redo for vertex manipulation during active
/// transactions.
pub struct RegionTransactionController {
    clipper: Arc<dyn PolygonClipper>,
    transaction: RegionTransaction,
    history: UndoHistory<Box<dyn LocalAction + Send>>,
}

impl RegionTransactionController {
    pub fn new(clipper: Arc<dyn PolygonClipper>) -> Self {
        Self {
            clipper,
            transaction: RegionTransaction::default(),
            history: UndoHistory::new(),
        }
    }

    pub fn transaction(&self) -> &RegionTransaction {
        &self.transaction
    }

    pub fn active_segment(&self) -> Option<&RegionSegment> {
        self.transaction.segment.as_ref()
    }

    /// Begin a transaction.
    ///
    /// With an existing region the segment is seeded from it (tempId 0);
    /// otherwise a blank placement segment is created (tempId -1) using the
    /// supplied defaults. Both local stacks are reset.
    pub fn start(
        &mut self,
        kind: TransactionKind,
        existing: Option<&SceneRegion>,
        defaults: Option<RegionDefaults>,
    ) {
        self.history.clear();
        debug!(?kind, editing = existing.is_some(), "starting region transaction");

        self.transaction = match existing {
            Some(region) => RegionTransaction {
                kind: Some(kind),
                original_region: Some(region.clone()),
                segment: Some(RegionSegment {
                    temp_id: ORIGINAL_TEMP_ID,
                    region_index: Some(region.index),
                    name: region.name.clone(),
                    vertices: region.vertices.clone(),
                    kind: region.kind.clone(),
                    value: region.value,
                    label: region.label.clone(),
                    color: region.color.clone(),
                }),
                is_active: true,
            },
            None => {
                let defaults = defaults.unwrap_or_default();
                RegionTransaction {
                    kind: Some(kind),
                    original_region: None,
                    segment: Some(RegionSegment {
                        temp_id: FIRST_PLACEMENT_TEMP_ID,
                        region_index: None,
                        name: defaults.name.unwrap_or_default(),
                        vertices: Vec::new(),
                        kind: defaults.kind.unwrap_or_else(|| "custom".to_string()),
                        value: defaults.value,
                        label: defaults.label,
                        color: Some(defaults.color.unwrap_or_else(|| "#808080".to_string())),
                    }),
                    is_active: true,
                }
            }
        };
    }

    /// Append one vertex. No-op when no transaction is active.
    pub fn add_vertex(&mut self, vertex: Point) {
        if let Some(segment) = self.transaction.segment.as_mut() {
            segment.vertices.push(vertex);
        }
    }

    /// Replace the vertex list wholesale. No-op when no transaction is active.
    pub fn update_vertices(&mut self, vertices: Vec<Point>) {
        if let Some(segment) = self.transaction.segment.as_mut() {
            segment.vertices = vertices;
        }
    }

    /// Shallow-merge segment properties. Identity fields (tempId,
    /// regionIndex) cannot be touched. No-op when no transaction is active.
    pub fn update_properties(&mut self, patch: RegionSegmentPatch) {
        let Some(segment) = self.transaction.segment.as_mut() else {
            return;
        };
        if let Some(name) = patch.name {
            segment.name = name;
        }
        if let Some(vertices) = patch.vertices {
            segment.vertices = vertices;
        }
        if let Some(kind) = patch.kind {
            segment.kind = kind;
        }
        if let Some(value) = patch.value {
            segment.value = Some(value);
        }
        if let Some(label) = patch.label {
            segment.label = Some(label);
        }
        if let Some(color) = patch.color {
            segment.color = Some(color);
        }
    }

    /// Commit the active segment.
    ///
    /// When `current_regions` is supplied, geometric detection runs first,
    /// in order: null clip, merge, clip. Any hit becomes the corresponding
    /// [`RegionCommit`] outcome that defers persistence to the caller and
    /// keeps the transaction open. Otherwise the segment is validated,
    /// cleaned, and persisted - update when it carries a region index,
    /// create otherwise. Failures leave the transaction untouched so the
    /// user can keep editing.
    pub async fn commit(
        &mut self,
        scene_id: SceneId,
        persistence: &dyn ScenePersistencePort,
        current_regions: Option<&[SceneRegion]>,
        grid: Option<GridConfig>,
    ) -> Result<RegionCommit, CommitError> {
        let Some(segment) = self.transaction.segment.clone() else {
            return Err(CommitError::NoActiveSegment);
        };

        if let Some(regions) = current_regions {
            if let Some(null_clip) = self.detect_null_clip(regions, &segment, grid)? {
                debug!(segment_kind = %segment.kind, "region commit resolved to null clip");
                return Ok(null_clip);
            }
            if let Some(merge) = self.detect_merge(regions, &segment, grid)? {
                debug!(
                    segment_kind = %segment.kind,
                    "region commit resolved to merge"
                );
                return Ok(merge);
            }
            if let Some(clip) = self.detect_clip(regions, &segment, grid)? {
                debug!(segment_kind = %segment.kind, "region commit resolved to clip");
                return Ok(clip);
            }
        }

        // An eraser with no scene to erase from leaves no trace
        if segment.is_null_region() {
            self.reset();
            return Ok(RegionCommit::NullClip {
                clip_results: Vec::new(),
                original_regions: Vec::new(),
            });
        }

        let cleaned = clean_vertices(&segment.vertices, true);
        if cleaned.len() < 3 {
            return Err(CommitError::TooFewVertices);
        }

        let data = RegionWriteData {
            name: segment.name.clone(),
            vertices: cleaned,
            kind: segment.kind.clone(),
            value: segment.value,
            label: segment.label.clone(),
            color: segment.color.clone(),
        };

        let result = match segment.region_index {
            Some(region_index) => {
                persistence
                    .update_region(scene_id, region_index, data)
                    .await?;
                RegionCommit::Edited { region_index }
            }
            None => {
                let region_index = persistence.add_region(scene_id, data).await?;
                RegionCommit::Created { region_index }
            }
        };

        debug!(?result, "region transaction committed");
        self.reset();
        Ok(result)
    }

    /// Cancel the transaction, dropping all local state.
    pub fn rollback(&mut self) {
        self.reset();
    }

    /// Clear transaction state after the caller has applied a merge result.
    pub fn clear(&mut self) {
        self.reset();
    }

    pub fn push_local_action(&mut self, action: impl LocalAction + Send + 'static) {
        self.history.push(Box::new(action));
    }

    /// Undo the most recent local action. Returns whether one was applied;
    /// callers re-read [`Self::active_segment`] afterwards.
    pub fn undo_local(&mut self) -> bool {
        self.history.undo()
    }

    /// Redo the most recently undone local action.
    pub fn redo_local(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo_local(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo_local(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_local_stacks(&mut self) {
        self.history.clear();
    }

    fn detect_null_clip(
        &self,
        regions: &[SceneRegion],
        segment: &RegionSegment,
        grid: Option<GridConfig>,
    ) -> Result<Option<RegionCommit>, CommitError> {
        if !segment.is_null_region() {
            return Ok(None);
        }

        let to_clip = find_regions_for_null_clip(regions, &segment.vertices, &segment.kind);
        let clip_results =
            compute_clip_results(self.clipper.as_ref(), &to_clip, &segment.vertices, grid)?;

        Ok(Some(RegionCommit::NullClip {
            clip_results,
            original_regions: to_clip.into_iter().cloned().collect(),
        }))
    }

    fn detect_clip(
        &self,
        regions: &[SceneRegion],
        segment: &RegionSegment,
        grid: Option<GridConfig>,
    ) -> Result<Option<RegionCommit>, CommitError> {
        let clippable = find_clippable_regions(
            regions,
            &segment.vertices,
            &segment.kind,
            segment.value,
            segment.label.as_deref(),
        );
        if clippable.is_empty() {
            return Ok(None);
        }

        let clip_results =
            compute_clip_results(self.clipper.as_ref(), &clippable, &segment.vertices, grid)?;

        Ok(Some(RegionCommit::Clip {
            clip_results,
            original_regions: clippable.into_iter().cloned().collect(),
        }))
    }

    fn detect_merge(
        &self,
        regions: &[SceneRegion],
        segment: &RegionSegment,
        grid: Option<GridConfig>,
    ) -> Result<Option<RegionCommit>, CommitError> {
        let mut matches = find_mergeable_regions(
            regions,
            &segment.vertices,
            &segment.kind,
            segment.value,
            segment.label.as_deref(),
        );
        if matches.is_empty() {
            return Ok(None);
        }
        matches.sort_by_key(|r| r.index);
        let target = matches[0];

        let mut all_polygons = vec![segment.vertices.clone()];
        all_polygons.extend(matches.iter().map(|r| r.vertices.clone()));
        let merged_vertices = merge_polygons(self.clipper.as_ref(), &all_polygons, grid)?;

        let mut regions_to_delete: Vec<u32> = matches[1..].iter().map(|r| r.index).collect();
        if let Some(own_index) = segment.region_index {
            if own_index != target.index {
                regions_to_delete.push(own_index);
            }
        }

        Ok(Some(RegionCommit::Merge {
            target_region_index: target.index,
            merged_vertices,
            regions_to_delete,
            original_regions: matches.into_iter().cloned().collect(),
        }))
    }

    fn reset(&mut self) {
        self.transaction = RegionTransaction::default();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};

    use super::*;
    use crate::history::CallbackAction;
    use crate::ports::{MockPolygonClipper, MockScenePersistencePort, PersistenceError};

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn triangle() -> Vec<Point> {
        vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)]
    }

    fn controller() -> RegionTransactionController {
        RegionTransactionController::new(Arc::new(MockPolygonClipper::new()))
    }

    fn noop_action(label: &str) -> CallbackAction {
        CallbackAction::new(label.to_string(), label.to_string(), || {}, || {})
    }

    fn existing_region(index: u32, vertices: Vec<Point>) -> SceneRegion {
        SceneRegion::new(index, "Elevation", index.to_string()).with_vertices(vertices)
    }

    #[test]
    fn test_start_placement_seeds_defaults() {
        let mut ctl = controller();
        ctl.start(TransactionKind::Placement, None, None);

        let segment = ctl.active_segment().expect("segment active");
        assert_eq!(segment.temp_id, -1);
        assert_eq!(segment.region_index, None);
        assert_eq!(segment.name, "");
        assert_eq!(segment.kind, "custom");
        assert_eq!(segment.color.as_deref(), Some("#808080"));
        assert!(segment.vertices.is_empty());
        assert!(ctl.transaction().is_active);
    }

    #[test]
    fn test_start_editing_seeds_from_region() {
        let mut ctl = controller();
        let region = existing_region(7, triangle()).with_value(10).with_color("#ff0000");
        ctl.start(TransactionKind::Editing, Some(&region), None);

        let segment = ctl.active_segment().expect("segment active");
        assert_eq!(segment.temp_id, 0);
        assert_eq!(segment.region_index, Some(7));
        assert_eq!(segment.vertices, triangle());
        assert_eq!(segment.value, Some(10));
        assert_eq!(segment.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_start_clears_local_stacks() {
        let mut ctl = controller();
        ctl.start(TransactionKind::Placement, None, None);
        ctl.push_local_action(noop_action("A"));
        assert!(ctl.can_undo_local());

        ctl.start(TransactionKind::Placement, None, None);
        assert!(!ctl.can_undo_local());
        assert!(!ctl.can_redo_local());
    }

    #[test]
    fn test_mutators_are_noops_without_transaction() {
        let mut ctl = controller();
        ctl.add_vertex(pt(1.0, 1.0));
        ctl.update_vertices(triangle());
        ctl.update_properties(RegionSegmentPatch {
            name: Some("ignored".to_string()),
            ..Default::default()
        });
        assert!(ctl.active_segment().is_none());
    }

    #[test]
    fn test_update_properties_cannot_touch_identity_fields() {
        let mut ctl = controller();
        let region = existing_region(4, triangle());
        ctl.start(TransactionKind::Editing, Some(&region), None);

        ctl.update_properties(RegionSegmentPatch {
            name: Some("renamed".to_string()),
            kind: Some("FogOfWar".to_string()),
            value: Some(-1),
            label: Some("Hidden".to_string()),
            color: Some("#000000".to_string()),
            vertices: Some(vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)]),
        });

        let segment = ctl.active_segment().expect("segment active");
        assert_eq!(segment.temp_id, 0);
        assert_eq!(segment.region_index, Some(4));
        assert_eq!(segment.name, "renamed");
        assert_eq!(segment.kind, "FogOfWar");
    }

    #[tokio::test]
    async fn test_commit_without_segment_fails_without_persistence_call() {
        let mut ctl = controller();
        let persistence = MockScenePersistencePort::new();

        let result = ctl
            .commit(SceneId::new(), &persistence, None, None)
            .await;

        assert_eq!(result, Err(CommitError::NoActiveSegment));
        assert_eq!(
            CommitError::NoActiveSegment.to_string(),
            "No segment to commit"
        );
    }

    #[tokio::test]
    async fn test_commit_placement_creates_with_cleaned_vertices() {
        let mut ctl = controller();
        ctl.start(TransactionKind::Placement, None, None);
        // Duplicate + collinear noise that cleaning removes
        for v in [
            pt(0.0, 0.0),
            pt(0.0, 0.0),
            pt(5.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
        ] {
            ctl.add_vertex(v);
        }

        let mut persistence = MockScenePersistencePort::new();
        persistence
            .expect_add_region()
            .withf(|_, data| data.vertices == vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)])
            .times(1)
            .returning(|_, _| Ok(42));

        let result = ctl
            .commit(SceneId::new(), &persistence, None, None)
            .await
            .expect("commit succeeds");

        assert_eq!(result, RegionCommit::Created { region_index: 42 });
        assert!(!ctl.transaction().is_active);
        assert!(ctl.active_segment().is_none());
    }

    #[tokio::test]
    async fn test_commit_editing_updates_never_creates() {
        let mut ctl = controller();
        let region = existing_region(3, triangle());
        ctl.start(TransactionKind::Editing, Some(&region), None);
        ctl.update_properties(RegionSegmentPatch {
            name: Some("changed".to_string()),
            ..Default::default()
        });

        let mut persistence = MockScenePersistencePort::new();
        persistence
            .expect_update_region()
            .with(always(), eq(3u32), always())
            .times(1)
            .returning(|_, _, _| Ok(()));
        // No add_region expectation: any create call would panic the mock

        let result = ctl
            .commit(SceneId::new(), &persistence, None, None)
            .await
            .expect("commit succeeds");

        assert_eq!(result, RegionCommit::Edited { region_index: 3 });
        assert!(!ctl.transaction().is_active);
    }

    #[tokio::test]
    async fn test_commit_too_few_vertices_short_circuits() {
        let mut ctl = controller();
        ctl.start(TransactionKind::Placement, None, None);
        ctl.update_vertices(vec![pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0)]); // collinear

        let persistence = MockScenePersistencePort::new();
        let result = ctl
            .commit(SceneId::new(), &persistence, None, None)
            .await;

        assert_eq!(result, Err(CommitError::TooFewVertices));
        assert_eq!(
            CommitError::TooFewVertices.to_string(),
            "Region requires minimum 3 vertices"
        );
        // Transaction preserved so the user can keep editing
        assert!(ctl.transaction().is_active);
    }

    #[tokio::test]
    async fn test_commit_persistence_failure_preserves_transaction() {
        let mut ctl = controller();
        ctl.start(TransactionKind::Placement, None, None);
        ctl.update_vertices(triangle());

        let mut persistence = MockScenePersistencePort::new();
        persistence
            .expect_add_region()
            .returning(|_, _| Err(PersistenceError::Network("connection reset".to_string())));

        let result = ctl
            .commit(SceneId::new(), &persistence, None, None)
            .await;

        assert!(matches!(result, Err(CommitError::Persistence(_))));
        assert!(ctl.transaction().is_active);
        assert!(ctl.active_segment().is_some());
    }

    #[tokio::test]
    async fn test_commit_merge_targets_smallest_index() {
        let mut clipper = MockPolygonClipper::new();
        clipper
            .expect_union()
            .returning(|_, _| Ok(vec![vec![pt(0.0, 0.0), pt(30.0, 0.0), pt(30.0, 30.0)]]));
        let mut ctl = RegionTransactionController::new(Arc::new(clipper));

        ctl.start(TransactionKind::Placement, None, Some(RegionDefaults {
            kind: Some("Elevation".to_string()),
            ..Default::default()
        }));
        ctl.update_vertices(vec![pt(5.0, 1.0), pt(15.0, 1.0), pt(15.0, 9.0), pt(5.0, 9.0)]);

        // Both overlap the segment; index 2 must become the target
        let scene = vec![
            existing_region(9, vec![pt(10.0, 0.0), pt(20.0, 0.0), pt(20.0, 10.0), pt(10.0, 10.0)]),
            existing_region(2, vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]),
        ];

        let persistence = MockScenePersistencePort::new();
        let result = ctl
            .commit(SceneId::new(), &persistence, Some(&scene), None)
            .await
            .expect("merge result");

        match result {
            RegionCommit::Merge {
                target_region_index,
                regions_to_delete,
                original_regions,
                merged_vertices,
            } => {
                assert_eq!(target_region_index, 2);
                assert_eq!(regions_to_delete, vec![9]);
                assert_eq!(original_regions.len(), 2);
                assert_eq!(merged_vertices.len(), 3);
            }
            other => panic!("expected merge, got {other:?}"),
        }
        // Merge defers persistence to the caller; transaction stays open
        assert!(ctl.transaction().is_active);
    }

    #[tokio::test]
    async fn test_commit_merge_deletes_edited_original_when_not_target() {
        let mut clipper = MockPolygonClipper::new();
        clipper
            .expect_union()
            .returning(|_, _| Ok(vec![vec![pt(0.0, 0.0), pt(30.0, 0.0), pt(30.0, 30.0)]]));
        let mut ctl = RegionTransactionController::new(Arc::new(clipper));

        // Editing region 8; it overlaps region 2, which wins as target
        let original = existing_region(
            8,
            vec![pt(5.0, 0.0), pt(15.0, 0.0), pt(15.0, 10.0), pt(5.0, 10.0)],
        );
        ctl.start(TransactionKind::Editing, Some(&original), None);

        let scene = vec![existing_region(
            2,
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)],
        )];

        let persistence = MockScenePersistencePort::new();
        let result = ctl
            .commit(SceneId::new(), &persistence, Some(&scene), None)
            .await
            .expect("merge result");

        match result {
            RegionCommit::Merge {
                target_region_index,
                regions_to_delete,
                ..
            } => {
                assert_eq!(target_region_index, 2);
                assert_eq!(regions_to_delete, vec![8]);
            }
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commit_no_merge_when_no_overlap() {
        let mut ctl = controller();
        ctl.start(TransactionKind::Placement, None, None);
        ctl.update_vertices(triangle());

        let scene = vec![existing_region(
            0,
            vec![pt(100.0, 100.0), pt(110.0, 100.0), pt(110.0, 110.0)],
        )];

        let mut persistence = MockScenePersistencePort::new();
        persistence.expect_add_region().returning(|_, _| Ok(5));

        let result = ctl
            .commit(SceneId::new(), &persistence, Some(&scene), None)
            .await
            .expect("commit succeeds");

        assert_eq!(result, RegionCommit::Created { region_index: 5 });
    }

    #[tokio::test]
    async fn test_commit_null_region_clips_every_overlapping_same_kind_region() {
        let mut clipper = MockPolygonClipper::new();
        clipper
            .expect_difference()
            .times(2)
            .returning(|_, _, _| Ok(vec![vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 4.0)]]));
        let mut ctl = RegionTransactionController::new(Arc::new(clipper));

        ctl.start(
            TransactionKind::Placement,
            None,
            Some(RegionDefaults {
                kind: Some("Elevation".to_string()),
                label: Some(NULL_REGION_LABEL.to_string()),
                ..Default::default()
            }),
        );
        ctl.update_vertices(vec![pt(0.0, 0.0), pt(20.0, 0.0), pt(20.0, 20.0), pt(0.0, 20.0)]);

        // Different values and labels; an eraser ignores both
        let scene = vec![
            existing_region(1, triangle()).with_value(10),
            existing_region(5, vec![pt(2.0, 2.0), pt(8.0, 2.0), pt(8.0, 8.0)]).with_label("Ledge"),
        ];

        let persistence = MockScenePersistencePort::new();
        let result = ctl
            .commit(SceneId::new(), &persistence, Some(&scene), None)
            .await
            .expect("null clip result");

        match result {
            RegionCommit::NullClip {
                clip_results,
                original_regions,
            } => {
                assert_eq!(clip_results.len(), 2);
                assert_eq!(clip_results[0].region_index, 1);
                assert_eq!(clip_results[1].region_index, 5);
                assert_eq!(original_regions.len(), 2);
            }
            other => panic!("expected null clip, got {other:?}"),
        }
        // Caller applies the clips and clears; nothing was persisted
        assert!(ctl.transaction().is_active);
    }

    #[tokio::test]
    async fn test_commit_null_region_without_scene_leaves_no_trace() {
        let mut ctl = controller();
        ctl.start(
            TransactionKind::Placement,
            None,
            Some(RegionDefaults {
                kind: Some("Elevation".to_string()),
                label: Some(NULL_REGION_LABEL.to_string()),
                ..Default::default()
            }),
        );
        ctl.update_vertices(triangle());

        let persistence = MockScenePersistencePort::new();
        let result = ctl
            .commit(SceneId::new(), &persistence, None, None)
            .await
            .expect("null clip result");

        assert_eq!(
            result,
            RegionCommit::NullClip {
                clip_results: Vec::new(),
                original_regions: Vec::new(),
            }
        );
        assert!(!ctl.transaction().is_active);
    }

    #[tokio::test]
    async fn test_commit_null_clip_takes_precedence_over_merge() {
        let mut clipper = MockPolygonClipper::new();
        // Only difference may run; a union call would panic the mock
        clipper
            .expect_difference()
            .times(1)
            .returning(|_, _, _| Ok(vec![]));
        let mut ctl = RegionTransactionController::new(Arc::new(clipper));

        ctl.start(
            TransactionKind::Placement,
            None,
            Some(RegionDefaults {
                kind: Some("Elevation".to_string()),
                label: Some(NULL_REGION_LABEL.to_string()),
                ..Default::default()
            }),
        );
        ctl.update_vertices(vec![pt(0.0, 0.0), pt(20.0, 0.0), pt(20.0, 20.0), pt(0.0, 20.0)]);

        // Same kind, value, and label as the segment: merge-compatible, but
        // the eraser check runs first
        let scene =
            vec![existing_region(3, triangle()).with_label(NULL_REGION_LABEL)];

        let persistence = MockScenePersistencePort::new();
        let result = ctl
            .commit(SceneId::new(), &persistence, Some(&scene), None)
            .await
            .expect("null clip result");

        assert!(matches!(result, RegionCommit::NullClip { .. }));
    }

    #[tokio::test]
    async fn test_commit_clips_overlapping_region_with_different_value() {
        let mut clipper = MockPolygonClipper::new();
        clipper
            .expect_difference()
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![vec![pt(10.0, 0.0), pt(20.0, 0.0), pt(20.0, 10.0), pt(10.0, 10.0)]])
            });
        let mut ctl = RegionTransactionController::new(Arc::new(clipper));

        ctl.start(
            TransactionKind::Placement,
            None,
            Some(RegionDefaults {
                kind: Some("Elevation".to_string()),
                value: Some(10),
                ..Default::default()
            }),
        );
        ctl.update_vertices(vec![pt(0.0, 0.0), pt(12.0, 0.0), pt(12.0, 10.0), pt(0.0, 10.0)]);

        let scene = vec![existing_region(
            6,
            vec![pt(5.0, 0.0), pt(20.0, 0.0), pt(20.0, 10.0), pt(5.0, 10.0)],
        )
        .with_value(20)];

        let persistence = MockScenePersistencePort::new();
        let result = ctl
            .commit(SceneId::new(), &persistence, Some(&scene), None)
            .await
            .expect("clip result");

        match result {
            RegionCommit::Clip {
                clip_results,
                original_regions,
            } => {
                assert_eq!(clip_results.len(), 1);
                assert_eq!(clip_results[0].region_index, 6);
                assert_eq!(clip_results[0].clipped_vertices.len(), 1);
                assert_eq!(original_regions[0].index, 6);
            }
            other => panic!("expected clip, got {other:?}"),
        }
        // The caller applies the clips, persists the segment, then clears
        assert!(ctl.transaction().is_active);
    }

    #[tokio::test]
    async fn test_commit_merge_takes_precedence_over_clip() {
        let mut clipper = MockPolygonClipper::new();
        // Merge resolves first, so only union may run
        clipper
            .expect_union()
            .times(1)
            .returning(|_, _| Ok(vec![vec![pt(0.0, 0.0), pt(30.0, 0.0), pt(30.0, 30.0)]]));
        let mut ctl = RegionTransactionController::new(Arc::new(clipper));

        ctl.start(
            TransactionKind::Placement,
            None,
            Some(RegionDefaults {
                kind: Some("Elevation".to_string()),
                value: Some(10),
                ..Default::default()
            }),
        );
        ctl.update_vertices(vec![pt(0.0, 0.0), pt(12.0, 0.0), pt(12.0, 10.0), pt(0.0, 10.0)]);

        // Region 2 merges (matching value), region 9 would clip (different)
        let scene = vec![
            existing_region(9, vec![pt(5.0, 0.0), pt(20.0, 0.0), pt(20.0, 10.0), pt(5.0, 10.0)])
                .with_value(20),
            existing_region(2, vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)])
                .with_value(10),
        ];

        let persistence = MockScenePersistencePort::new();
        let result = ctl
            .commit(SceneId::new(), &persistence, Some(&scene), None)
            .await
            .expect("merge result");

        assert!(matches!(
            result,
            RegionCommit::Merge {
                target_region_index: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_commit_corner_touching_region_creates_instead_of_merging() {
        let mut ctl = controller();
        ctl.start(
            TransactionKind::Placement,
            None,
            Some(RegionDefaults {
                kind: Some("Elevation".to_string()),
                ..Default::default()
            }),
        );
        // Shares exactly one corner with the existing region at (10, 10)
        ctl.update_vertices(vec![
            pt(10.0, 10.0),
            pt(20.0, 10.0),
            pt(20.0, 20.0),
            pt(10.0, 20.0),
        ]);

        let scene = vec![existing_region(
            0,
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)],
        )];

        let mut persistence = MockScenePersistencePort::new();
        persistence.expect_add_region().returning(|_, _| Ok(8));

        let result = ctl
            .commit(SceneId::new(), &persistence, Some(&scene), None)
            .await
            .expect("commit succeeds");

        assert_eq!(result, RegionCommit::Created { region_index: 8 });
    }

    #[test]
    fn test_rollback_resets_everything() {
        let mut ctl = controller();
        ctl.start(TransactionKind::Placement, None, None);
        ctl.add_vertex(pt(0.0, 0.0));
        ctl.push_local_action(noop_action("A"));
        ctl.undo_local();

        ctl.rollback();

        assert!(!ctl.transaction().is_active);
        assert!(ctl.active_segment().is_none());
        assert!(!ctl.can_undo_local());
        assert!(!ctl.can_redo_local());
    }
}
