//! Polygon cleaning and predicates
//!
//! Hand-drawn shapes arrive with duplicated and collinear vertices from
//! pointer sampling; cleaning normalizes them before validation and
//! persistence. Predicates here are exact enough for overlap detection at
//! scene scale; boolean operations are delegated to the clipper port.

use super::point::{Point, Pole, COORD_EPSILON};

/// Cross products below this are treated as collinear.
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Result of cleaning a wall's pole list.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedPoles {
    pub poles: Vec<Pole>,
    /// Cleaning can reopen a closed shape when it collapses below a polygon.
    pub is_closed: bool,
}

/// Remove duplicate and collinear vertices from a polygon or polyline.
///
/// For closed shapes the first/last wrap-around is treated like any other
/// edge pair: a trailing vertex equal to the first is dropped, and collinear
/// checks run across the seam. Endpoints of open polylines are never removed.
pub fn clean_vertices(vertices: &[Point], closed: bool) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if pts.last().is_none_or(|p: &Point| !p.approx_eq(v)) {
            pts.push(*v);
        }
    }

    if closed {
        while pts.len() > 1 {
            let last = pts[pts.len() - 1];
            if pts[0].approx_eq(&last) {
                pts.pop();
            } else {
                break;
            }
        }
    }

    // Drop midpoints that add no turn. Removing one vertex can expose
    // another redundant one, so iterate to a fixed point.
    loop {
        let mut removed = false;
        let mut i = 0;
        while i < pts.len() {
            let n = pts.len();
            if n < 3 {
                break;
            }
            let (prev, next) = if closed {
                (pts[(i + n - 1) % n], pts[(i + 1) % n])
            } else if i == 0 || i == n - 1 {
                i += 1;
                continue;
            } else {
                (pts[i - 1], pts[i + 1])
            };
            if cross(prev, pts[i], next).abs() < COLLINEAR_EPSILON {
                pts.remove(i);
                removed = true;
            } else {
                i += 1;
            }
        }
        if !removed {
            break;
        }
    }

    pts
}

/// Remove poles occupying the same position as their predecessor.
///
/// A closed wall that collapses below 3 distinct positions can no longer
/// form a polygon and is reopened.
pub fn clean_poles(poles: &[Pole], closed: bool) -> CleanedPoles {
    let mut out: Vec<Pole> = Vec::with_capacity(poles.len());
    for p in poles {
        if out.last().is_none_or(|q: &Pole| !q.approx_eq_position(p)) {
            out.push(*p);
        }
    }

    if closed {
        while out.len() > 1 {
            let last = out[out.len() - 1];
            if out[0].approx_eq_position(&last) {
                out.pop();
            } else {
                break;
            }
        }
    }

    let is_closed = closed && out.len() >= 3;
    CleanedPoles {
        poles: out,
        is_closed,
    }
}

/// Signed area of a polygon; positive for counter-clockwise winding.
pub fn signed_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Ray-cast containment test. Points on the boundary may report either way;
/// overlap detection pairs this with edge intersection so the ambiguity
/// never matters there.
pub fn point_in_polygon(point: &Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether segments `a1-a2` and `b1-b2` intersect, including touching and
/// collinear overlap.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1.abs() < COLLINEAR_EPSILON && on_segment(b1, b2, a1))
        || (d2.abs() < COLLINEAR_EPSILON && on_segment(b1, b2, a2))
        || (d3.abs() < COLLINEAR_EPSILON && on_segment(a1, a2, b1))
        || (d4.abs() < COLLINEAR_EPSILON && on_segment(a1, a2, b2))
}

/// Whether two closed polygons share interior area or a collinear edge
/// stretch of positive length.
///
/// Contact at a single point - corner touching corner, or a corner resting
/// on an edge - does not count as overlap: such regions sit next to each
/// other and must stay separate.
pub fn polygons_overlap(a: &[Point], b: &[Point]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    if has_point_strictly_inside(a, b) || has_point_strictly_inside(b, a) {
        return true;
    }
    for i in 0..a.len() {
        let a1 = a[i];
        let a2 = a[(i + 1) % a.len()];
        for j in 0..b.len() {
            let b1 = b[j];
            let b2 = b[(j + 1) % b.len()];
            if segments_cross(a1, a2, b1, b2) || collinear_overlap(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

// Samples vertices and edge midpoints; midpoints catch chords whose
// endpoints land exactly on the other polygon's boundary.
fn has_point_strictly_inside(probe: &[Point], polygon: &[Point]) -> bool {
    for i in 0..probe.len() {
        let v = probe[i];
        let next = probe[(i + 1) % probe.len()];
        let mid = Point::new((v.x + next.x) / 2.0, (v.y + next.y) / 2.0);
        if strictly_inside(&v, polygon) || strictly_inside(&mid, polygon) {
            return true;
        }
    }
    false
}

fn strictly_inside(p: &Point, polygon: &[Point]) -> bool {
    point_in_polygon(p, polygon) && !point_on_boundary(p, polygon)
}

fn point_on_boundary(p: &Point, polygon: &[Point]) -> bool {
    (0..polygon.len()).any(|i| {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        cross(a, b, *p).abs() < COLLINEAR_EPSILON && on_segment(a, b, *p)
    })
}

// Proper crossing: each segment's endpoints lie strictly on opposite sides
// of the other segment. Endpoint contact is not a crossing.
fn segments_cross(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);
    ((d1 > COLLINEAR_EPSILON && d2 < -COLLINEAR_EPSILON)
        || (d1 < -COLLINEAR_EPSILON && d2 > COLLINEAR_EPSILON))
        && ((d3 > COLLINEAR_EPSILON && d4 < -COLLINEAR_EPSILON)
            || (d3 < -COLLINEAR_EPSILON && d4 > COLLINEAR_EPSILON))
}

// Collinear segments whose shared span is longer than a point.
fn collinear_overlap(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    if cross(a1, a2, b1).abs() >= COLLINEAR_EPSILON
        || cross(a1, a2, b2).abs() >= COLLINEAR_EPSILON
    {
        return false;
    }
    let dx = (a2.x - a1.x).abs();
    let dy = (a2.y - a1.y).abs();
    let (lo_a, hi_a, lo_b, hi_b) = if dx >= dy {
        (a1.x.min(a2.x), a1.x.max(a2.x), b1.x.min(b2.x), b1.x.max(b2.x))
    } else {
        (a1.y.min(a2.y), a1.y.max(a2.y), b1.y.min(b2.y), b1.y.max(b2.y))
    };
    hi_a.min(hi_b) - lo_a.max(lo_b) > COORD_EPSILON
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) - COORD_EPSILON
        && p.x <= a.x.max(b.x) + COORD_EPSILON
        && p.y >= a.y.min(b.y) - COORD_EPSILON
        && p.y <= a.y.max(b.y) + COORD_EPSILON
}
