//! Mergeable/clippable-region detection and polygon combination
//!
//! When a committed region overlaps existing regions of the same kind,
//! value, and label, the commit becomes a geometric union instead of a
//! plain create. Overlapping same-kind regions with a *different* value or
//! label are clipped instead: the new region's area is carved out of them.
//! Detection is pure; unions and differences run through the clipper port.

use tablewright_domain::{polygons_overlap, signed_area, GridConfig, Point, SceneRegion};

use crate::ports::{ClipError, PolygonClipper};

/// Existing regions that a candidate polygon should merge into.
///
/// A region is mergeable when its kind, value, and label all match the
/// candidate's and the two polygons overlap geometrically.
pub fn find_mergeable_regions<'a>(
    regions: &'a [SceneRegion],
    candidate_vertices: &[Point],
    kind: &str,
    value: Option<i32>,
    label: Option<&str>,
) -> Vec<&'a SceneRegion> {
    regions
        .iter()
        .filter(|region| {
            region.kind == kind
                && region.value == value
                && region.label.as_deref() == label
                && polygons_overlap(candidate_vertices, &region.vertices)
        })
        .collect()
}

/// Existing regions that a candidate polygon should clip.
///
/// Clippable regions share the candidate's kind and overlap it, but differ
/// in value or label - matching ones merge instead of clipping.
pub fn find_clippable_regions<'a>(
    regions: &'a [SceneRegion],
    candidate_vertices: &[Point],
    kind: &str,
    value: Option<i32>,
    label: Option<&str>,
) -> Vec<&'a SceneRegion> {
    regions
        .iter()
        .filter(|region| {
            region.kind == kind
                && (region.value != value || region.label.as_deref() != label)
                && polygons_overlap(candidate_vertices, &region.vertices)
        })
        .collect()
}

/// Existing regions a null (eraser) polygon should clip: every overlapping
/// region of the same kind, regardless of value or label.
pub fn find_regions_for_null_clip<'a>(
    regions: &'a [SceneRegion],
    candidate_vertices: &[Point],
    kind: &str,
) -> Vec<&'a SceneRegion> {
    regions
        .iter()
        .filter(|region| {
            region.kind == kind && polygons_overlap(candidate_vertices, &region.vertices)
        })
        .collect()
}

/// What remains of one region after a clip polygon is subtracted from it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionClip {
    pub region_index: u32,
    /// Remaining contours; empty when the region was erased entirely, more
    /// than one when the cut split it
    pub clipped_vertices: Vec<Vec<Point>>,
}

/// Subtract `clip_vertices` from each region, collecting the remainders.
pub fn compute_clip_results(
    clipper: &dyn PolygonClipper,
    regions: &[&SceneRegion],
    clip_vertices: &[Point],
    grid: Option<GridConfig>,
) -> Result<Vec<RegionClip>, ClipError> {
    regions
        .iter()
        .map(|region| {
            let clipped_vertices = clipper.difference(&region.vertices, clip_vertices, grid)?;
            Ok(RegionClip {
                region_index: region.index,
                clipped_vertices,
            })
        })
        .collect()
}

/// Union a set of polygons into one boundary.
///
/// The clipper can emit several contours (slivers from snapping, or
/// touching-only inputs); the merged region keeps the dominant one by area.
pub fn merge_polygons(
    clipper: &dyn PolygonClipper,
    polygons: &[Vec<Point>],
    grid: Option<GridConfig>,
) -> Result<Vec<Point>, ClipError> {
    let contours = clipper.union(polygons, grid)?;
    contours
        .into_iter()
        .max_by(|a, b| {
            signed_area(a)
                .abs()
                .total_cmp(&signed_area(b).abs())
        })
        .ok_or(ClipError::EmptyOutput)
}
