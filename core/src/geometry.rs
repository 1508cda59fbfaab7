//! Axis-aligned rectangle helpers shared by the simulation and the adapters.

use serde::{Deserialize, Serialize};

/// Reports whether two rectangles overlap on both axes.
///
/// Edges are treated as open intervals: rectangles that merely touch along an
/// edge do not overlap. Gameplay collision is defined exclusively through this
/// test.
#[must_use]
#[allow(clippy::too_many_arguments)] // Mirrors the two (x, y, w, h) tuples being compared.
pub fn rect_overlap(
    x1: f64,
    y1: f64,
    w1: f64,
    h1: f64,
    x2: f64,
    y2: f64,
    w2: f64,
    h2: f64,
) -> bool {
    x1 < x2 + w2 && x1 + w1 > x2 && y1 < y2 + h2 && y1 + h1 > y2
}

/// Reports whether a point lies inside a rectangle, edges included.
///
/// Only used for pointer hit-testing of UI widgets.
#[must_use]
pub fn point_in_rect(px: f64, py: f64, rx: f64, ry: f64, rw: f64, rh: f64) -> bool {
    px >= rx && px <= rx + rw && py >= ry && py <= ry + rh
}

/// Axis-aligned rectangle anchored at its upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal coordinate of the left edge.
    pub x: f64,
    /// Vertical coordinate of the top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and extents.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal coordinate of the rectangle's center.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Open-interval overlap test against another rectangle.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        rect_overlap(
            self.x,
            self.y,
            self.width,
            self.height,
            other.x,
            other.y,
            other.width,
            other.height,
        )
    }

    /// Inclusive containment test for a point.
    #[must_use]
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        point_in_rect(px, py, self.x, self.y, self.width, self.height)
    }

    /// Shrinks the rectangle by `margin` on every side.
    ///
    /// Extents never become negative; an oversized margin collapses the
    /// rectangle to a zero-area box at its center.
    #[must_use]
    pub fn inset(&self, margin: f64) -> Self {
        let width = (self.width - 2.0 * margin).max(0.0);
        let height = (self.height - 2.0 * margin).max(0.0);
        Self {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }
}
