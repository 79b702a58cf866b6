//! Scene geometry primitives and polygon predicates
//!
//! Regions are closed polygons over [`Point`]; walls are open or closed
//! polylines over [`Pole`] (a 2D point with a height). Cleaning and overlap
//! predicates live here; boolean operations (union/merge) are behind the
//! editor's `PolygonClipper` port.

mod point;
mod polygon;

pub use point::{Point, Pole, COORD_EPSILON};
pub use polygon::{
    clean_poles, clean_vertices, point_in_polygon, polygons_overlap, segments_intersect,
    signed_area, CleanedPoles,
};

use serde::{Deserialize, Serialize};

/// Grid configuration for the active scene.
///
/// Only the snapping tolerance matters to this layer: polygon merging snaps
/// vertices within the tolerance so unions of hand-drawn shapes close cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Edge length of one grid cell in scene units
    pub cell_size: f64,
    /// Vertices closer than this are welded during merge operations
    pub snap_tolerance: f64,
}

impl GridConfig {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            snap_tolerance: cell_size / 20.0,
        }
    }

    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }
}
