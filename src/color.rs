//! RGBA colour type used by configuration values and the renderer
//!
//! Colours are stored as straight (non-premultiplied) RGBA floats in 0..=1 and
//! can be written/read as `#AARRGGBB` hex strings in the editor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Parse `RRGGBB` or `AARRGGBB`, with optional leading '#'
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        let argb = match hex.len() {
            6 => 0xFF00_0000 | u32::from_str_radix(hex, 16).ok()?,
            8 => u32::from_str_radix(hex, 16).ok()?,
            _ => return None,
        };
        let [a, r, g, b] = argb.to_be_bytes();
        Some(Self::from_rgba8(r, g, b, a))
    }

    pub fn to_hex_string(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{a:02X}{r:02X}{g:02X}{b:02X}")
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Brighten (positive) or darken (negative) each channel by `amount`
    pub fn adjusted(self, amount: f32) -> Self {
        Self::rgba(
            (self.r + amount).clamp(0.0, 1.0),
            (self.g + amount).clamp(0.0, 1.0),
            (self.b + amount).clamp(0.0, 1.0),
            self.a,
        )
    }

    /// Straight RGB interpolation, `t = 0` gives `self`
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Colour for a health ratio between a low and a full colour.
///
/// Ratios below `min` use the low colour, above `max` the full colour and the
/// range between is interpolated.
pub fn color_by_health(ratio: f32, min: f32, max: f32, full: Color, low: Color) -> Color {
    let t = if ratio <= min {
        0.0
    } else if ratio >= max {
        1.0
    } else {
        (ratio - min) / (max - min).max(f32::EPSILON)
    };
    low.lerp(full, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_formats() {
        let c = Color::parse_hex("#7FFF0000").unwrap();
        assert_eq!(c.to_rgba8(), [255, 0, 0, 127]);

        let opaque = Color::parse_hex("00FF00").unwrap();
        assert_eq!(opaque.to_rgba8(), [0, 255, 0, 255]);

        assert!(Color::parse_hex("nope").is_none());
        assert!(Color::parse_hex("#12345").is_none());
    }

    #[test]
    fn test_hex_string_roundtrip() {
        let c = Color::from_rgba8(18, 52, 86, 200);
        assert_eq!(Color::parse_hex(&c.to_hex_string()), Some(c));
    }

    #[test]
    fn test_color_by_health_clamps_outside_thresholds() {
        let full = Color::rgba(0.0, 1.0, 0.0, 1.0);
        let low = Color::rgba(1.0, 0.0, 0.0, 1.0);
        assert_eq!(color_by_health(0.05, 0.1, 0.9, full, low), low);
        assert_eq!(color_by_health(0.95, 0.1, 0.9, full, low), full);

        let mid = color_by_health(0.5, 0.0, 1.0, full, low);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.5).abs() < 1e-6);
    }
}
