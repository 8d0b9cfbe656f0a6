//! Immediate-mode drawing surface
//!
//! Widgets only talk to [`Renderer`]. The host draws through egui, tests and
//! headless runs use [`RecordingRenderer`] to inspect what would be painted.

use crate::color::Color;
use crate::types::{Rect, Vec2};

/// Corner colours of a gradient fill, clockwise from the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub top_left: Color,
    pub top_right: Color,
    pub bottom_right: Color,
    pub bottom_left: Color,
}

impl Gradient {
    /// Lighter at the top, darker at the bottom
    pub fn vertical(base: Color, spread: f32) -> Self {
        let top = base.adjusted(spread);
        let bottom = base.adjusted(-spread);
        Self {
            top_left: top,
            top_right: top,
            bottom_right: bottom,
            bottom_left: bottom,
        }
    }
}

pub trait Renderer {
    fn rect_filled(&mut self, rect: Rect, color: Color);
    fn rect_bordered(&mut self, rect: Rect, color: Color, thickness: f32);
    fn rect_gradient(&mut self, rect: Rect, gradient: Gradient);
    /// Text with its top-left at `pos` and a one pixel outline
    fn text_outlined(&mut self, pos: Vec2, text: &str, color: Color, outline: Color);
    fn text_size(&self, text: &str) -> Vec2;
    /// Restrict drawing to `rect` (intersected with the current clip) until the
    /// matching `pop_clip`
    fn push_clip(&mut self, rect: Rect);
    fn pop_clip(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Filled { rect: Rect, color: Color },
    Bordered { rect: Rect, color: Color, thickness: f32 },
    Gradient { rect: Rect, gradient: Gradient },
    Text { pos: Vec2, text: String, color: Color },
    PushClip(Rect),
    PopClip,
}

/// Approximate glyph box used when no font is available
const GLYPH_SIZE: Vec2 = Vec2::new(7.0, 13.0);

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
    clip_depth: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_depth = 0;
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn filled(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Filled { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn borders(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Bordered { rect, color, .. } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    /// True when every `push_clip` had its `pop_clip`
    pub fn clips_balanced(&self) -> bool {
        self.clip_depth == 0
    }
}

impl Renderer for RecordingRenderer {
    fn rect_filled(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Filled { rect, color });
    }

    fn rect_bordered(&mut self, rect: Rect, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Bordered { rect, color, thickness });
    }

    fn rect_gradient(&mut self, rect: Rect, gradient: Gradient) {
        self.commands.push(DrawCommand::Gradient { rect, gradient });
    }

    fn text_outlined(&mut self, pos: Vec2, text: &str, color: Color, _outline: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }

    fn text_size(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * GLYPH_SIZE.x, GLYPH_SIZE.y)
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopClip);
    }
}
