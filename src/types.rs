//! Shared geometry and identity types

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Opaque identity of a game entity, as handed out by the game state provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Axis-aligned rectangle in screen-space pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Inclusive of the top-left edge, exclusive of the bottom-right edge
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.min + offset, self.size)
    }

    pub fn union(&self, other: &Rect) -> Self {
        let min = self.min.min(other.min);
        let max = self.max().max(other.max());
        Self::new(min, max - min)
    }

    /// Bounding box of all rects, None when empty
    pub fn bounding(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 5.0));
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(29.9, 14.9)));
        assert!(!r.contains(Vec2::new(30.0, 12.0)));
        assert!(!r.contains(Vec2::new(15.0, 15.0)));
    }

    #[test]
    fn test_bounding_of_several() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(20.0, -5.0), Vec2::new(5.0, 5.0));
        let bb = Rect::bounding([a, b]).unwrap();
        assert_eq!(bb.min, Vec2::new(0.0, -5.0));
        assert_eq!(bb.size, Vec2::new(25.0, 15.0));
        assert!(Rect::bounding(Vec::new()).is_none());
    }
}
