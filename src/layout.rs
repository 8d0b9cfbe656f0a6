//! Anchor resolution for HUD elements
//!
//! An anchor maps a reference point and an element size to the top-left corner
//! the element is drawn from.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Anchor {
    Center,
    Left,
    Right,
    Top,
    #[default]
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::Left,
        Anchor::Right,
        Anchor::Top,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::Bottom,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Anchor::Center => "Center",
            Anchor::Left => "Left",
            Anchor::Right => "Right",
            Anchor::Top => "Top",
            Anchor::TopLeft => "Top Left",
            Anchor::TopRight => "Top Right",
            Anchor::Bottom => "Bottom",
            Anchor::BottomLeft => "Bottom Left",
            Anchor::BottomRight => "Bottom Right",
        }
    }
}

/// Top-left draw position for an element of `size` anchored at `origin`
pub fn resolve(origin: Vec2, size: Vec2, anchor: Anchor) -> Vec2 {
    match anchor {
        Anchor::Center => origin - size / 2.0,
        Anchor::Left => origin + Vec2::new(0.0, -size.y / 2.0),
        Anchor::Right => origin + Vec2::new(-size.x, -size.y / 2.0),
        Anchor::Top => origin + Vec2::new(-size.x / 2.0, 0.0),
        Anchor::TopLeft => origin,
        Anchor::TopRight => origin + Vec2::new(-size.x, 0.0),
        Anchor::Bottom => origin + Vec2::new(-size.x / 2.0, -size.y),
        Anchor::BottomLeft => origin + Vec2::new(0.0, -size.y),
        Anchor::BottomRight => origin - size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Vec2 = Vec2::new(100.0, 50.0);
    const SIZE: Vec2 = Vec2::new(40.0, 20.0);

    #[test]
    fn test_resolve_all_anchor_modes() {
        let cases = [
            (Anchor::Center, Vec2::new(80.0, 40.0)),
            (Anchor::Left, Vec2::new(100.0, 40.0)),
            (Anchor::Right, Vec2::new(60.0, 40.0)),
            (Anchor::Top, Vec2::new(80.0, 50.0)),
            (Anchor::TopLeft, Vec2::new(100.0, 50.0)),
            (Anchor::TopRight, Vec2::new(60.0, 50.0)),
            (Anchor::Bottom, Vec2::new(80.0, 30.0)),
            (Anchor::BottomLeft, Vec2::new(100.0, 30.0)),
            (Anchor::BottomRight, Vec2::new(60.0, 30.0)),
        ];
        assert_eq!(cases.len(), Anchor::ALL.len());

        for (anchor, expected) in cases {
            assert_eq!(resolve(ORIGIN, SIZE, anchor), expected, "anchor {anchor:?}");
        }
    }

    #[test]
    fn test_top_left_is_identity() {
        for origin in [Vec2::ZERO, Vec2::new(-3.5, 7.25), ORIGIN] {
            assert_eq!(resolve(origin, SIZE, Anchor::TopLeft), origin);
        }
    }

    #[test]
    fn test_default_anchor_is_top_left() {
        assert_eq!(Anchor::default(), Anchor::TopLeft);
        assert_eq!(resolve(ORIGIN, SIZE, Anchor::default()), ORIGIN);
    }

    #[test]
    fn test_zero_size_collapses_to_origin() {
        for anchor in Anchor::ALL {
            assert_eq!(resolve(ORIGIN, Vec2::ZERO, anchor), ORIGIN);
        }
    }
}
