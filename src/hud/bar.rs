//! Bar drawing shared by the widgets

use crate::color::Color;
use crate::render::{Gradient, Renderer};
use crate::types::{Rect, Vec2};

/// Brightness spread of the vertical fill gradient
const GRADIENT_SPREAD: f32 = 0.08;

/// Background plus a left-to-right fill covering `ratio` of the width.
/// Returns the filled part.
pub fn draw_bar(renderer: &mut dyn Renderer, rect: Rect, ratio: f32, fill: Color, background: Color) -> Rect {
    renderer.rect_filled(rect, background);
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    let filled = Rect::new(rect.min, Vec2::new(rect.size.x * ratio, rect.size.y));
    if filled.size.x > 0.0 {
        renderer.rect_gradient(filled, Gradient::vertical(fill, GRADIENT_SPREAD));
    }
    filled
}

/// Split `rect` horizontally into `count` equal chunks separated by `spacing`
pub fn chunk_rects(rect: Rect, count: u32, spacing: f32) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let gaps = spacing * (count - 1) as f32;
    let width = ((rect.size.x - gaps) / count as f32).max(0.0);
    (0..count)
        .map(|i| {
            let x = rect.min.x + i as f32 * (width + spacing);
            Rect::new(Vec2::new(x, rect.min.y), Vec2::new(width, rect.size.y))
        })
        .collect()
}

/// Fill ratio of chunk `index` when every chunk holds `per_chunk` units
pub fn chunk_fill(value: f32, per_chunk: f32, index: u32) -> f32 {
    if per_chunk <= 0.0 {
        return 0.0;
    }
    ((value - index as f32 * per_chunk) / per_chunk).clamp(0.0, 1.0)
}

pub fn text_centered(renderer: &mut dyn Renderer, rect: Rect, text: &str, color: Color, outline: Color) {
    let size = renderer.text_size(text);
    let pos = rect.min + (rect.size - size) / 2.0;
    renderer.text_outlined(pos, text, color, outline);
}

/// Text vertically centered, `pad` pixels from the left edge
pub fn text_left(renderer: &mut dyn Renderer, rect: Rect, pad: f32, text: &str, color: Color, outline: Color) {
    let size = renderer.text_size(text);
    let pos = Vec2::new(rect.min.x + pad, rect.min.y + (rect.size.y - size.y) / 2.0);
    renderer.text_outlined(pos, text, color, outline);
}

/// Text vertically centered, `pad` pixels from the right edge
pub fn text_right(renderer: &mut dyn Renderer, rect: Rect, pad: f32, text: &str, color: Color, outline: Color) {
    let size = renderer.text_size(text);
    let pos = Vec2::new(rect.right() - pad - size.x, rect.min.y + (rect.size.y - size.y) / 2.0);
    renderer.text_outlined(pos, text, color, outline);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingRenderer};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_bar_fill_is_clamped() {
        let mut r = RecordingRenderer::new();
        let bar = rect(0.0, 0.0, 100.0, 10.0);
        assert_eq!(draw_bar(&mut r, bar, 0.25, Color::WHITE, Color::BLACK).size.x, 25.0);
        assert_eq!(draw_bar(&mut r, bar, 3.0, Color::WHITE, Color::BLACK).size.x, 100.0);
        assert_eq!(draw_bar(&mut r, bar, f32::NAN, Color::WHITE, Color::BLACK).size.x, 0.0);
    }

    #[test]
    fn test_empty_bar_draws_background_only() {
        let mut r = RecordingRenderer::new();
        draw_bar(&mut r, rect(0.0, 0.0, 100.0, 10.0), 0.0, Color::WHITE, Color::BLACK);
        assert_eq!(r.commands.len(), 1);
        assert!(matches!(r.commands[0], DrawCommand::Filled { .. }));
    }

    #[test]
    fn test_chunks_cover_width_with_spacing() {
        let chunks = chunk_rects(rect(10.0, 0.0, 100.0, 8.0), 3, 5.0);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].min.x, 10.0);
        assert_eq!(chunks[0].size.x, 30.0);
        assert_eq!(chunks[1].min.x, 45.0);
        assert_eq!(chunks[2].right(), 110.0);
        assert!(chunk_rects(rect(0.0, 0.0, 10.0, 10.0), 0, 1.0).is_empty());
    }

    #[test]
    fn test_chunk_fill() {
        assert_eq!(chunk_fill(13_500.0, 10_000.0, 0), 1.0);
        assert_eq!(chunk_fill(13_500.0, 10_000.0, 1), 0.35);
        assert_eq!(chunk_fill(13_500.0, 10_000.0, 2), 0.0);
        assert_eq!(chunk_fill(5.0, 0.0, 0), 0.0);
    }
}
