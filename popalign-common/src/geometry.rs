use serde::{Deserialize, Serialize};

/// A pixel position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A pixel size
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle.
///
/// Only origin and size are stored. Edges are always derived so they can
/// never drift out of sync with the size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-size rectangle at a point (used for point-anchored popups)
    pub fn from_point(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Area of the part of this rectangle, shifted by `(dx, dy)`, that lies
    /// inside `region`. Zero when they don't overlap.
    pub fn intersection_area(&self, dx: f64, dy: f64, region: &Region) -> f64 {
        let shifted = self.translated(dx, dy);
        let left = shifted.left().max(region.left);
        let top = shifted.top().max(region.top);
        let right = shifted.right().min(region.right);
        let bottom = shifted.bottom().min(region.bottom);
        (right - left).max(0.0) * (bottom - top).max(0.0)
    }
}

/// Edge-based rectangle describing where a popup may render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Region {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_rect(rect: &Rect) -> Self {
        Self::new(rect.left(), rect.top(), rect.right(), rect.bottom())
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Fold a clipping box into this region.
    ///
    /// The result never extends past `self` on any edge and keeps
    /// `left <= right` / `top <= bottom`: a disjoint clip collapses the
    /// region to an empty line inside the old bounds instead of inverting it.
    pub fn clipped_by(&self, clip: &Region) -> Self {
        let left = self.left.max(clip.left).min(self.right);
        let top = self.top.max(clip.top).min(self.bottom);
        let right = self.right.min(clip.right).max(left);
        let bottom = self.bottom.min(clip.bottom).max(top);
        Self::new(left, top, right, bottom)
    }

    pub fn contains_rect(&self, rect: &Rect) -> bool {
        rect.left() >= self.left
            && rect.top() >= self.top
            && rect.right() <= self.right
            && rect.bottom() <= self.bottom
    }
}
