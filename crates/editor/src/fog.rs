//! Fog-of-war placement planning
//!
//! Fog regions use hierarchical names: add-mode regions are roots ("1",
//! "2", ...) hiding an area; subtract-mode regions nest under the root they
//! carve into ("1.1", "1.2"). Adding over existing hidden regions absorbs
//! them into a geometric union, which can split into several disjoint
//! regions. The planner only computes what to create and delete; applying
//! the plan (persistence, scene refresh) is the caller's job.

use tracing::debug;

use tablewright_domain::{
    clean_vertices, naming, polygons_overlap, Point, SceneRegion,
};

use crate::ports::{ClipError, PolygonClipper};

/// Marker value of regions that hide their area.
pub const FOG_HIDDEN_VALUE: i32 = 2;

/// Marker value of subtract (reveal) regions.
pub const FOG_SUBTRACT_VALUE: i32 = -1;

/// Placement mode for a drawn fog polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogMode {
    /// Hide the drawn area, absorbing overlapping hidden regions
    Add,
    /// Punch a reveal hole, nested under the newest fog region
    Subtract,
}

/// One fog region to create.
#[derive(Debug, Clone, PartialEq)]
pub struct FogRegionDraft {
    pub name: String,
    pub value: i32,
    pub vertices: Vec<Point>,
}

/// What a fog placement resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct FogPlacement {
    pub regions_to_create: Vec<FogRegionDraft>,
    /// Indexes of hidden regions absorbed by a union
    pub regions_to_delete: Vec<u32>,
}

/// Plan a fog-of-war placement for a drawn (or bucket-fill-derived) polygon.
///
/// Degenerate input - fewer than 3 vertices after cleaning - is silently
/// ignored and yields `Ok(None)`.
pub fn plan_fog_placement(
    vertices: &[Point],
    mode: FogMode,
    existing_regions: &[SceneRegion],
    clipper: &dyn PolygonClipper,
) -> Result<Option<FogPlacement>, ClipError> {
    let drawn = clean_vertices(vertices, true);
    if drawn.len() < 3 {
        return Ok(None);
    }

    let fog_regions: Vec<&SceneRegion> = existing_regions
        .iter()
        .filter(|r| r.is_fog_of_war())
        .collect();

    let placement = match mode {
        FogMode::Add => plan_add(drawn, &fog_regions, clipper)?,
        FogMode::Subtract => plan_subtract(drawn, &fog_regions),
    };
    debug!(
        created = placement.regions_to_create.len(),
        deleted = placement.regions_to_delete.len(),
        "planned fog placement"
    );
    Ok(Some(placement))
}

fn plan_add(
    drawn: Vec<Point>,
    fog_regions: &[&SceneRegion],
    clipper: &dyn PolygonClipper,
) -> Result<FogPlacement, ClipError> {
    let base = naming::next_root_name(fog_regions.iter().map(|r| r.name.as_str()));

    let absorbed: Vec<&SceneRegion> = fog_regions
        .iter()
        .filter(|r| r.value == Some(FOG_HIDDEN_VALUE) && polygons_overlap(&drawn, &r.vertices))
        .copied()
        .collect();

    if absorbed.is_empty() {
        return Ok(FogPlacement {
            regions_to_create: vec![FogRegionDraft {
                name: base,
                value: FOG_HIDDEN_VALUE,
                vertices: drawn,
            }],
            regions_to_delete: Vec::new(),
        });
    }

    let mut polygons = vec![drawn];
    polygons.extend(absorbed.iter().map(|r| r.vertices.clone()));
    let contours = clipper.union(&polygons, None)?;

    // A disjoint union yields several regions, numbered under the base name
    let regions_to_create = if contours.len() == 1 {
        contours
            .into_iter()
            .map(|vertices| FogRegionDraft {
                name: base.clone(),
                value: FOG_HIDDEN_VALUE,
                vertices,
            })
            .collect()
    } else {
        contours
            .into_iter()
            .enumerate()
            .map(|(i, vertices)| FogRegionDraft {
                name: format!("{base}.{}", i + 1),
                value: FOG_HIDDEN_VALUE,
                vertices,
            })
            .collect()
    };

    Ok(FogPlacement {
        regions_to_create,
        regions_to_delete: absorbed.iter().map(|r| r.index).collect(),
    })
}

fn plan_subtract(drawn: Vec<Point>, fog_regions: &[&SceneRegion]) -> FogPlacement {
    // Nest under the most recently indexed fog region; with no parent to
    // carve into, fall back to a fresh root name
    let name = match fog_regions.iter().max_by_key(|r| r.index) {
        Some(parent) => {
            naming::next_child_name(&parent.name, fog_regions.iter().map(|r| r.name.as_str()))
        }
        None => naming::next_root_name(fog_regions.iter().map(|r| r.name.as_str())),
    };

    FogPlacement {
        regions_to_create: vec![FogRegionDraft {
            name,
            value: FOG_SUBTRACT_VALUE,
            vertices: drawn,
        }],
        regions_to_delete: Vec::new(),
    }
}
