//! Plain geometry types shared by the surface, drag and gesture layers
//!
//! All coordinates are in CSS pixels with the origin at the top-left and the
//! y axis pointing down.

use serde::{Deserialize, Serialize};

/// A point on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset from `origin` to `self`
    pub fn delta_from(self, origin: Point) -> Vector2 {
        Vector2::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive on the top/left edge, exclusive on the bottom/right edge
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Position of this rect relative to `container`
    pub fn relative_to(&self, container: &Rect) -> Rect {
        Rect::new(self.x - container.x, self.y - container.y, self.width, self.height)
    }
}

/// 2D vector, used for stick deflection and drag deltas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
