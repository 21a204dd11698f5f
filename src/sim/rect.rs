//! Axis-aligned rectangle geometry for every simulated entity
//!
//! Screen space: origin top-left, Y grows downward, so `bottom() > top()`.

use glam::Vec2;

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle whose bottom edge is centered on `point`
    pub fn from_midbottom(point: Vec2, size: Vec2) -> Self {
        Self {
            pos: Vec2::new(point.x - size.x / 2.0, point.y - size.y),
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Move vertically so the bottom edge sits at `y`
    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// Change height, keeping the bottom edge where it was
    pub fn set_height_keep_bottom(&mut self, height: f32) {
        let bottom = self.bottom();
        self.size.y = height;
        self.set_bottom(bottom);
    }

    /// Same x/y/width, half the height (top edge unchanged)
    pub fn top_half(&self) -> Self {
        Self {
            pos: self.pos,
            size: Vec2::new(self.size.x, self.size.y / 2.0),
        }
    }

    /// Strict overlap test; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_from_midbottom() {
        let r = Rect::from_midbottom(Vec2::new(100.0, 575.0), Vec2::new(100.0, 100.0));
        assert_eq!(r.left(), 50.0);
        assert_eq!(r.bottom(), 575.0);
        assert_eq!(r.top(), 475.0);
    }

    #[test]
    fn test_set_height_keep_bottom() {
        let mut r = Rect::new(0.0, 475.0, 100.0, 100.0);
        r.set_height_keep_bottom(50.0);
        assert_eq!(r.bottom(), 575.0);
        assert_eq!(r.top(), 525.0);
        r.set_height_keep_bottom(100.0);
        assert_eq!(r.top(), 475.0);
    }

    #[test]
    fn test_top_half_is_top_anchored() {
        let r = Rect::new(5.0, 455.0, 70.0, 120.0);
        let half = r.top_half();
        assert_eq!(half.top(), r.top());
        assert_eq!(half.left(), r.left());
        assert_eq!(half.width(), r.width());
        assert_eq!(half.height(), 60.0);
    }

    #[test]
    fn test_overlaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 10.0, 10.0)));
        // Touching edges only
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        // Containment
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 1.0, 1.0)));
    }
}
