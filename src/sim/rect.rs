//! Axis-aligned rectangle geometry for bricks and paddle
//!
//! Screen space: x grows right, y grows down. A rectangle is stored by its
//! min (top-left) and max (bottom-right) corners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

/// Face of a rectangle a circle was separated through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    /// Outward unit normal of the face
    #[inline]
    pub fn normal(self) -> Vec2 {
        match self {
            Face::Left => Vec2::NEG_X,
            Face::Right => Vec2::X,
            Face::Top => Vec2::NEG_Y,
            Face::Bottom => Vec2::Y,
        }
    }
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Nearest point of the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Overlap of a circle's bounding box with each face.
    ///
    /// Order: left, right, top, bottom. Each value is how far the circle
    /// would have to travel out through that face to clear the rectangle.
    pub fn face_overlaps(&self, center: Vec2, radius: f32) -> [(Face, f32); 4] {
        [
            (Face::Left, (center.x + radius) - self.min.x),
            (Face::Right, self.max.x - (center.x - radius)),
            (Face::Top, (center.y + radius) - self.min.y),
            (Face::Bottom, self.max.y - (center.y - radius)),
        ]
    }

    /// Face with the smallest overlap (closest-face heuristic)
    pub fn min_overlap_face(&self, center: Vec2, radius: f32) -> Face {
        let overlaps = self.face_overlaps(center, radius);
        let mut best = overlaps[0];
        for &candidate in &overlaps[1..] {
            if candidate.1 < best.1 {
                best = candidate;
            }
        }
        best.0
    }

    /// Place a circle center `distance` outside `face`, keeping the
    /// coordinate along the face unchanged.
    pub fn push_out(&self, center: Vec2, face: Face, distance: f32) -> Vec2 {
        match face {
            Face::Left => Vec2::new(self.min.x - distance, center.y),
            Face::Right => Vec2::new(self.max.x + distance, center.y),
            Face::Top => Vec2::new(center.x, self.min.y - distance),
            Face::Bottom => Vec2::new(center.x, self.max.y + distance),
        }
    }
}

/// Does a circle touch or overlap the rectangle?
#[inline]
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let nearest = rect.closest_point(center);
    center.distance_squared(nearest) <= radius * radius
}
