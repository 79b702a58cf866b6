use serde::{Deserialize, Serialize};

/// Coordinates closer than this are considered the same position.
pub const COORD_EPSILON: f64 = 1e-6;

/// A 2D point in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Positional equality within [`COORD_EPSILON`]
    pub fn approx_eq(&self, other: &Point) -> bool {
        (self.x - other.x).abs() < COORD_EPSILON && (self.y - other.y).abs() < COORD_EPSILON
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A wall pole: a 2D position plus a height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pole {
    pub x: f64,
    pub y: f64,
    pub h: f64,
}

impl Pole {
    pub fn new(x: f64, y: f64, h: f64) -> Self {
        Self { x, y, h }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Positional equality within [`COORD_EPSILON`]; height is ignored so a
    /// pole stacked on top of another still counts as a duplicate position.
    pub fn approx_eq_position(&self, other: &Pole) -> bool {
        (self.x - other.x).abs() < COORD_EPSILON && (self.y - other.y).abs() < COORD_EPSILON
    }
}
