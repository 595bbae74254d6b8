//! Rectangle geometry for entities and the shield zone
//!
//! Entities are axis-aligned boxes anchored at their top-left corner.
//! The shield is a box rotated about its own center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Square box of side `size` at `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos, Vec2::splat(size))
    }

    /// Square box of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self::square(center - Vec2::splat(size / 2.0), size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.x < self.pos.x + self.size.x
            && p.y >= self.pos.y
            && p.y < self.pos.y + self.size.y
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && other.pos.x < self.pos.x + self.size.x
            && self.pos.y < other.pos.y + other.size.y
            && other.pos.y < self.pos.y + self.size.y
    }
}

/// A rectangle rotated by `angle` around its center
///
/// `half_extents.x` runs along the facing direction, `half_extents.y`
/// across it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Facing direction (radians)
    pub angle: f32,
}

impl OrientedRect {
    pub fn new(center: Vec2, size: Vec2, angle: f32) -> Self {
        Self {
            center,
            half_extents: size / 2.0,
            angle,
        }
    }

    /// Check if a world point lies inside the rotated box
    pub fn contains_point(&self, p: Vec2) -> bool {
        // Rotate into the box's local frame
        let local = Vec2::from_angle(-self.angle).rotate(p - self.center);
        local.x.abs() <= self.half_extents.x && local.y.abs() <= self.half_extents.y
    }

    /// World-space corners (for rendering or debugging)
    pub fn corners(&self) -> [Vec2; 4] {
        let rot = Vec2::from_angle(self.angle);
        let h = self.half_extents;
        [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
        .map(|c| self.center + rot.rotate(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rect_contains_point_edges() {
        let r = Rect::square(Vec2::new(10.0, 10.0), 20.0);
        assert!(r.contains_point(Vec2::new(10.0, 10.0)));
        assert!(r.contains_point(Vec2::new(29.9, 29.9)));
        assert!(!r.contains_point(Vec2::new(30.0, 15.0)));
        assert!(!r.contains_point(Vec2::new(9.9, 15.0)));
    }

    #[test]
    fn test_rect_centered() {
        let r = Rect::centered(Vec2::new(50.0, 50.0), 20.0);
        assert_eq!(r.pos, Vec2::new(40.0, 40.0));
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::square(Vec2::ZERO, 20.0);
        assert!(a.overlaps(&Rect::square(Vec2::new(10.0, 10.0), 20.0)));
        // Touching edges only
        assert!(!a.overlaps(&Rect::square(Vec2::new(20.0, 0.0), 20.0)));
    }

    #[test]
    fn test_oriented_rect_rotation() {
        // Long box (60 along facing, 10 across) facing straight down
        let r = OrientedRect::new(Vec2::ZERO, Vec2::new(60.0, 10.0), FRAC_PI_2);
        assert!(r.contains_point(Vec2::new(0.0, 25.0)));
        assert!(!r.contains_point(Vec2::new(25.0, 0.0)));
    }

    #[test]
    fn test_oriented_rect_corners() {
        let r = OrientedRect::new(Vec2::new(5.0, 5.0), Vec2::new(2.0, 2.0), 0.0);
        let c = r.corners();
        assert!((c[0] - Vec2::new(4.0, 4.0)).length() < 0.001);
        assert!((c[2] - Vec2::new(6.0, 6.0)).length() < 0.001);
    }
}
