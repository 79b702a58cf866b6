//! Polygon boolean operations via winding-rule tessellation
//!
//! Contours are fed with positive (counter-clockwise) winding so that
//! `WindingRule::Positive` keeps everything with winding number > 0;
//! `BoundaryContours` output then yields the result's boundary. Union adds
//! every polygon counter-clockwise; difference adds the clip polygon
//! clockwise so its area cancels the subject's.

use tess2_rust::{ElementType, Tessellator, WindingRule};

use tablewright_domain::{clean_vertices, signed_area, GridConfig, Point};

use crate::ports::{ClipError, PolygonClipper};

/// Clipper adapter backed by the tess2 tessellator.
#[derive(Debug, Default, Clone, Copy)]
pub struct TessClipper;

impl TessClipper {
    pub fn new() -> Self {
        Self
    }
}

impl PolygonClipper for TessClipper {
    fn union(
        &self,
        polygons: &[Vec<Point>],
        grid: Option<GridConfig>,
    ) -> Result<Vec<Vec<Point>>, ClipError> {
        let mut tess = Tessellator::new();
        let mut added = 0usize;

        for polygon in polygons {
            let cleaned = prepare_contour(polygon, grid);
            if cleaned.len() < 3 {
                continue;
            }
            tess.add_contour(2, &contour_coords(&cleaned));
            added += 1;
        }

        if added == 0 {
            return Err(ClipError::EmptyOutput);
        }

        let contours = run_boundary_tessellation(&mut tess)?;
        if contours.is_empty() {
            return Err(ClipError::EmptyOutput);
        }
        Ok(contours)
    }

    fn difference(
        &self,
        subject: &[Point],
        clip: &[Point],
        grid: Option<GridConfig>,
    ) -> Result<Vec<Vec<Point>>, ClipError> {
        let subject = prepare_contour(subject, grid);
        if subject.len() < 3 {
            return Ok(Vec::new());
        }
        let mut clip = prepare_contour(clip, grid);
        if clip.len() < 3 {
            return Ok(vec![subject]);
        }
        // Clockwise clip contour carries winding -1 inside, cancelling the
        // subject's +1 wherever they overlap
        clip.reverse();

        let mut tess = Tessellator::new();
        tess.add_contour(2, &contour_coords(&subject));
        tess.add_contour(2, &contour_coords(&clip));

        run_boundary_tessellation(&mut tess)
    }
}

// Snap to grid tolerance when configured, clean, and orient counter-clockwise.
fn prepare_contour(polygon: &[Point], grid: Option<GridConfig>) -> Vec<Point> {
    let snapped: Vec<Point> = match grid {
        Some(grid) if grid.snap_tolerance > 0.0 => polygon
            .iter()
            .map(|p| snap_point(*p, grid.snap_tolerance))
            .collect(),
        _ => polygon.to_vec(),
    };
    let mut cleaned = clean_vertices(&snapped, true);
    if signed_area(&cleaned) < 0.0 {
        cleaned.reverse();
    }
    cleaned
}

fn contour_coords(contour: &[Point]) -> Vec<f64> {
    contour.iter().flat_map(|p| [p.x, p.y]).collect()
}

fn run_boundary_tessellation(tess: &mut Tessellator) -> Result<Vec<Vec<Point>>, ClipError> {
    let ok = tess.tessellate(
        WindingRule::Positive,
        ElementType::BoundaryContours,
        0,
        2,
        None,
    );
    if !ok {
        return Err(ClipError::Failed(format!(
            "tessellator reported {:?}",
            tess.get_status()
        )));
    }

    // Elements are [start_vertex, vertex_count] pairs into the vertex
    // buffer. Outer boundaries wind counter-clockwise; clockwise contours
    // are holes and are dropped.
    let verts = tess.vertices();
    let elems = tess.elements();
    let mut contours = Vec::new();
    for i in 0..tess.element_count() {
        let start = elems[i * 2] as usize;
        let count = elems[i * 2 + 1] as usize;
        let mut contour = Vec::with_capacity(count);
        for j in start..start + count {
            contour.push(Point::new(f64::from(verts[j * 2]), f64::from(verts[j * 2 + 1])));
        }
        let contour = clean_vertices(&contour, true);
        if contour.len() >= 3 && signed_area(&contour) > 0.0 {
            contours.push(contour);
        }
    }
    Ok(contours)
}

fn snap_point(p: Point, tolerance: f64) -> Point {
    Point::new(
        (p.x / tolerance).round() * tolerance,
        (p.y / tolerance).round() * tolerance,
    )
}
