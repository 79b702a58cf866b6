//! Polygon clipper port
//!
//! Boolean union of simple polygons. The shipped adapter is
//! [`crate::infrastructure::TessClipper`]; tests mock this trait to pin
//! down merge behavior without geometry noise.

use thiserror::Error;

use tablewright_domain::{GridConfig, Point};

/// Error from a polygon boolean operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClipError {
    /// The clipper could not process the input contours
    #[error("Polygon clipping failed: {0}")]
    Failed(String),

    /// No contour survived the operation
    #[error("Polygon clipping produced no output")]
    EmptyOutput,
}

/// Boolean operations over simple polygons.
///
/// Both operations return outer boundary contours; holes are dropped -
/// regions are simple polygons in this model. `grid`, when present, supplies
/// the snapping tolerance used to weld nearly-coincident vertices of
/// hand-drawn shapes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PolygonClipper: Send + Sync {
    /// Union of all input polygons. A disjoint union yields several
    /// contours; producing none is an error.
    fn union(
        &self,
        polygons: &[Vec<Point>],
        grid: Option<GridConfig>,
    ) -> Result<Vec<Vec<Point>>, ClipError>;

    /// `subject` minus `clip`. Cutting through the middle can split the
    /// subject into several contours; an empty result means the subject was
    /// erased entirely and is not an error.
    fn difference(
        &self,
        subject: &[Point],
        clip: &[Point],
        grid: Option<GridConfig>,
    ) -> Result<Vec<Vec<Point>>, ClipError>;
}
