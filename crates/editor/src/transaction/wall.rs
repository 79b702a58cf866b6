//! Wall placement and editing transactions
//!
//! Unlike regions, a wall transaction holds a sequence of segments: editing
//! can split one wall into several (erasing the middle of a polyline leaves
//! two disjoint pieces). Segments are identified by negative tempIds assigned
//! as -(max(|existing|) + 1), which stays collision-free across ad-hoc
//! removals. Commit persists each segment independently and tolerates
//! partial failure - succeeded siblings are never rolled back.

use tracing::{debug, warn};

use tablewright_domain::{clean_poles, naming, Pole, SceneId, SceneWall, WallVisibility};

use crate::error::CommitError;
use crate::history::{LocalAction, UndoHistory};
use crate::ports::{ScenePersistencePort, WallWriteData};

use super::{TransactionKind, ORIGINAL_TEMP_ID};

/// One wall segment managed within a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    /// Transaction-local identity: 0 for the edited original, negative for
    /// new segments
    pub temp_id: i32,
    /// Server slot, None until persisted
    pub wall_index: Option<u32>,
    pub name: String,
    pub poles: Vec<Pole>,
    pub is_closed: bool,
    pub visibility: WallVisibility,
    pub material: Option<String>,
    pub color: Option<String>,
}

/// A segment without identity, as supplied by drawing tools; the controller
/// assigns the tempId.
#[derive(Debug, Clone, Default)]
pub struct WallSegmentDraft {
    pub wall_index: Option<u32>,
    pub name: String,
    pub poles: Vec<Pole>,
    pub is_closed: bool,
    pub visibility: WallVisibility,
    pub material: Option<String>,
    pub color: Option<String>,
}

impl WallSegmentDraft {
    fn into_segment(self, temp_id: i32) -> WallSegment {
        WallSegment {
            temp_id,
            wall_index: self.wall_index,
            name: self.name,
            poles: self.poles,
            is_closed: self.is_closed,
            visibility: self.visibility,
            material: self.material,
            color: self.color,
        }
    }
}

/// Partial update for one segment; identity fields are absent by design.
#[derive(Debug, Clone, Default)]
pub struct WallSegmentPatch {
    pub name: Option<String>,
    pub poles: Option<Vec<Pole>>,
    pub is_closed: Option<bool>,
    pub visibility: Option<WallVisibility>,
    pub material: Option<String>,
    pub color: Option<String>,
}

/// Transaction state for wall operations.
#[derive(Debug, Clone, Default)]
pub struct WallTransaction {
    pub kind: Option<TransactionKind>,
    pub original_wall: Option<SceneWall>,
    pub segments: Vec<WallSegment>,
    pub is_active: bool,
}

/// Per-segment result of a wall commit.
#[derive(Debug, Clone, PartialEq)]
pub enum WallSegmentStatus {
    /// A new wall was persisted at the returned index
    Created { wall_index: u32 },
    /// The existing wall at the returned index was updated
    Updated { wall_index: u32 },
    /// This segment failed; siblings were still attempted
    Failed { error: String },
}

/// Outcome of one segment in a commit.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegmentOutcome {
    pub temp_id: i32,
    /// Name the segment was persisted under (after split renaming)
    pub name: String,
    pub status: WallSegmentStatus,
}

/// Collected outcomes of a wall commit.
///
/// The commit is fully successful only when every segment succeeded;
/// individual successes stand regardless.
#[derive(Debug, Clone, PartialEq)]
pub struct WallCommitReport {
    pub results: Vec<WallSegmentOutcome>,
}

impl WallCommitReport {
    pub fn success(&self) -> bool {
        self.results
            .iter()
            .all(|o| !matches!(o.status, WallSegmentStatus::Failed { .. }))
    }

    pub fn failed_segments(&self) -> impl Iterator<Item = &WallSegmentOutcome> {
        self.results
            .iter()
            .filter(|o| matches!(o.status, WallSegmentStatus::Failed { .. }))
    }
}

/// Manages wall placement and editing transactions for the scene editor.
pub struct WallTransactionController {
    transaction: WallTransaction,
    history: UndoHistory<Box<dyn LocalAction + Send>>,
}

impl Default for WallTransactionController {
    fn default() -> Self {
        Self::new()
    }
}

impl WallTransactionController {
    pub fn new() -> Self {
        Self {
            transaction: WallTransaction::default(),
            history: UndoHistory::new(),
        }
    }

    pub fn transaction(&self) -> &WallTransaction {
        &self.transaction
    }

    pub fn segments(&self) -> &[WallSegment] {
        &self.transaction.segments
    }

    /// Begin a transaction. Editing seeds one segment (tempId 0) from the
    /// wall; placement starts with no segments. Both local stacks are reset.
    pub fn start(&mut self, kind: TransactionKind, existing: Option<&SceneWall>) {
        self.history.clear();
        debug!(?kind, editing = existing.is_some(), "starting wall transaction");

        self.transaction = match existing {
            Some(wall) => WallTransaction {
                kind: Some(kind),
                original_wall: Some(wall.clone()),
                segments: vec![WallSegment {
                    temp_id: ORIGINAL_TEMP_ID,
                    wall_index: Some(wall.index),
                    name: wall.name.clone(),
                    poles: wall.poles.clone(),
                    is_closed: wall.is_closed,
                    visibility: wall.visibility,
                    material: wall.material.clone(),
                    color: wall.color.clone(),
                }],
                is_active: true,
            },
            None => WallTransaction {
                kind: Some(kind),
                original_wall: None,
                segments: Vec::new(),
                is_active: true,
            },
        };
    }

    /// Append one segment; returns its assigned tempId. Returns None when
    /// no transaction is active.
    pub fn add_segment(&mut self, draft: WallSegmentDraft) -> Option<i32> {
        if !self.transaction.is_active {
            return None;
        }
        let temp_id = self.next_temp_id();
        self.transaction.segments.push(draft.into_segment(temp_id));
        Some(temp_id)
    }

    /// Append a batch of segments atomically with correctly incrementing
    /// tempIds; returns the assigned ids in order.
    pub fn add_segments(&mut self, drafts: Vec<WallSegmentDraft>) -> Vec<i32> {
        if !self.transaction.is_active {
            return Vec::new();
        }
        let mut assigned = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let temp_id = self.next_temp_id();
            self.transaction.segments.push(draft.into_segment(temp_id));
            assigned.push(temp_id);
        }
        assigned
    }

    /// Replace the whole segment list, renumbering tempIds sequentially
    /// from -1.
    pub fn set_all_segments(&mut self, drafts: Vec<WallSegmentDraft>) {
        if !self.transaction.is_active {
            return;
        }
        self.transaction.segments = drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| draft.into_segment(-(i as i32) - 1))
            .collect();
    }

    /// Remove exactly the segment with `temp_id`, leaving others' order and
    /// identity untouched.
    pub fn remove_segment(&mut self, temp_id: i32) {
        self.transaction.segments.retain(|s| s.temp_id != temp_id);
    }

    /// Replace one segment's pole list. No-op when the segment is absent.
    pub fn update_segment_poles(&mut self, temp_id: i32, poles: Vec<Pole>) {
        if let Some(segment) = self.segment_mut(temp_id) {
            segment.poles = poles;
        }
    }

    /// Shallow-merge one segment's properties. No-op when the segment is
    /// absent; identity fields cannot be touched.
    pub fn update_segment_properties(&mut self, temp_id: i32, patch: WallSegmentPatch) {
        let Some(segment) = self.segment_mut(temp_id) else {
            return;
        };
        if let Some(name) = patch.name {
            segment.name = name;
        }
        if let Some(poles) = patch.poles {
            segment.poles = poles;
        }
        if let Some(is_closed) = patch.is_closed {
            segment.is_closed = is_closed;
        }
        if let Some(visibility) = patch.visibility {
            segment.visibility = visibility;
        }
        if let Some(material) = patch.material {
            segment.material = Some(material);
        }
        if let Some(color) = patch.color {
            segment.color = Some(color);
        }
    }

    /// Commit every held segment, serially and independently.
    ///
    /// Poles are cleaned per segment (cleaning can reopen a collapsed
    /// closed shape). Multi-segment commits get derived names: splits of an
    /// edited wall use `base.1`, `base.2`, ... from the original's numeric
    /// suffix, multiple placements use `base 1`, `base 2`, .... A later
    /// segment is still attempted after an earlier failure; the transaction
    /// is cleared only when every segment succeeded.
    pub async fn commit(
        &mut self,
        scene_id: SceneId,
        persistence: &dyn ScenePersistencePort,
    ) -> Result<WallCommitReport, CommitError> {
        if !self.transaction.is_active || self.transaction.segments.is_empty() {
            return Err(CommitError::NoActiveSegment);
        }

        let segments = self.transaction.segments.clone();
        let names = self.assign_names(&segments);
        let mut results = Vec::with_capacity(segments.len());

        for (segment, name) in segments.iter().zip(names) {
            let cleaned = clean_poles(&segment.poles, segment.is_closed);
            if cleaned.poles.len() < 2 {
                results.push(WallSegmentOutcome {
                    temp_id: segment.temp_id,
                    name,
                    status: WallSegmentStatus::Failed {
                        error: "Wall segment requires minimum 2 poles".to_string(),
                    },
                });
                continue;
            }

            let data = WallWriteData {
                name: name.clone(),
                poles: cleaned.poles,
                is_closed: cleaned.is_closed,
                visibility: segment.visibility,
                material: segment.material.clone(),
                color: segment.color.clone(),
            };

            let status = match segment.wall_index {
                Some(wall_index) => match persistence.update_wall(scene_id, wall_index, data).await
                {
                    Ok(()) => WallSegmentStatus::Updated { wall_index },
                    Err(e) => WallSegmentStatus::Failed {
                        error: e.to_string(),
                    },
                },
                None => match persistence.add_wall(scene_id, data).await {
                    Ok(wall_index) => WallSegmentStatus::Created { wall_index },
                    Err(e) => WallSegmentStatus::Failed {
                        error: e.to_string(),
                    },
                },
            };

            results.push(WallSegmentOutcome {
                temp_id: segment.temp_id,
                name,
                status,
            });
        }

        let report = WallCommitReport { results };
        if report.success() {
            debug!(segments = report.results.len(), "wall transaction committed");
            self.reset();
        } else {
            warn!(
                failed = report.failed_segments().count(),
                total = report.results.len(),
                "wall commit partially failed; transaction kept open"
            );
        }
        Ok(report)
    }

    /// Cancel the transaction, dropping all local state.
    pub fn rollback(&mut self) {
        self.reset();
    }

    /// Clear transaction state.
    pub fn clear(&mut self) {
        self.reset();
    }

    pub fn push_local_action(&mut self, action: impl LocalAction + Send + 'static) {
        self.history.push(Box::new(action));
    }

    /// Undo the most recent local action. Returns whether one was applied;
    /// callers re-read [`Self::segments`] afterwards.
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

    fn segment_mut(&mut self, temp_id: i32) -> Option<&mut WallSegment> {
        self.transaction
            .segments
            .iter_mut()
            .find(|s| s.temp_id == temp_id)
    }

    // -(max(|existing|) + 1): collision-free even after removals, because
    // the maximum absolute id only ever grows while segments are held.
    fn next_temp_id(&self) -> i32 {
        let max_abs = self
            .transaction
            .segments
            .iter()
            .map(|s| s.temp_id.unsigned_abs())
            .max()
            .unwrap_or(0);
        -(max_abs as i32) - 1
    }

    fn assign_names(&self, segments: &[WallSegment]) -> Vec<String> {
        if segments.len() <= 1 {
            return segments.iter().map(|s| s.name.clone()).collect();
        }

        match &self.transaction.original_wall {
            // Splitting an edited wall: children of its numeric suffix
            Some(original) => {
                let base = naming::trailing_digits(&original.name)
                    .unwrap_or_else(|| original.name.clone());
                (1..=segments.len())
                    .map(|i| format!("{base}.{i}"))
                    .collect()
            }
            // Several fresh placements share the drawn name as a stem
            None => {
                let stem = segments
                    .first()
                    .map(|s| s.name.trim_end().to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Wall".to_string());
                (1..=segments.len())
                    .map(|i| format!("{stem} {i}"))
                    .collect()
            }
        }
    }

    fn reset(&mut self) {
        self.transaction = WallTransaction::default();
        self.history.clear();
    }
}
