//! Collision predicates
//!
//! The whole game gets by on two tests: axis-aligned box overlap for the
//! car vs. obstacles, and circle overlap for pickups (more forgiving than
//! a box, which is what you want for things the player is trying to touch).

use glam::Vec2;

/// An axis-aligned box, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the box
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// True iff the two boxes intersect (half-open intervals: touching edges
/// do not count as overlap)
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// True iff two circles overlap (center distance strictly below radius sum)
#[inline]
pub fn circles_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance_squared(c2) < (r1 + r2) * (r1 + r2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rects_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &b));
        assert!(rects_overlap(&b, &a));
    }

    #[test]
    fn test_rects_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!rects_overlap(&a, &b));

        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!rects_overlap(&a, &below));
    }

    #[test]
    fn test_rects_contained() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(rects_overlap(&outer, &inner));
    }

    #[test]
    fn test_circles_overlap() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(25.0, 0.0);
        assert!(circles_overlap(a, 15.0, b, 15.0));
        // Exactly touching: not an overlap
        assert!(!circles_overlap(a, 15.0, Vec2::new(30.0, 0.0), 15.0));
        assert!(!circles_overlap(a, 10.0, b, 10.0));
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(10.0, 20.0, 60.0, 100.0);
        assert_eq!(r.center(), Vec2::new(40.0, 70.0));
    }
}
