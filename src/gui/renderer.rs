//! [`Renderer`] over an egui painter
//!
//! HUD coordinates are relative to the canvas the painter covers, so every
//! primitive is shifted by the canvas' top-left corner before painting.

use eframe::egui;
use egui::epaint::{Mesh, Shape};

use crate::color::Color;
use crate::render::{Gradient, Renderer};
use crate::types::{Rect, Vec2};

pub struct EguiRenderer {
    painter: egui::Painter,
    offset: egui::Vec2,
    font: egui::FontId,
    clips: Vec<egui::Rect>,
}

impl EguiRenderer {
    /// Draw onto `painter` with HUD (0, 0) at `canvas.min`
    pub fn new(painter: egui::Painter, canvas: egui::Rect, font_size: f32) -> Self {
        let painter = painter.with_clip_rect(canvas);
        Self {
            painter,
            offset: canvas.min.to_vec2(),
            font: egui::FontId::proportional(font_size),
            clips: Vec::new(),
        }
    }

    fn pos(&self, v: Vec2) -> egui::Pos2 {
        egui::pos2(v.x, v.y) + self.offset
    }

    fn rect(&self, r: Rect) -> egui::Rect {
        egui::Rect::from_min_size(self.pos(r.min), egui::vec2(r.size.x, r.size.y))
    }
}

pub fn to_color32(color: Color) -> egui::Color32 {
    let [r, g, b, a] = color.to_rgba8();
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

impl Renderer for EguiRenderer {
    fn rect_filled(&mut self, rect: Rect, color: Color) {
        self.painter.rect_filled(self.rect(rect), 0.0, to_color32(color));
    }

    fn rect_bordered(&mut self, rect: Rect, color: Color, thickness: f32) {
        self.painter.rect_stroke(
            self.rect(rect),
            0.0,
            egui::Stroke::new(thickness, to_color32(color)),
            egui::StrokeKind::Inside,
        );
    }

    fn rect_gradient(&mut self, rect: Rect, gradient: Gradient) {
        let r = self.rect(rect);
        let mut mesh = Mesh::default();
        mesh.colored_vertex(r.left_top(), to_color32(gradient.top_left));
        mesh.colored_vertex(r.right_top(), to_color32(gradient.top_right));
        mesh.colored_vertex(r.right_bottom(), to_color32(gradient.bottom_right));
        mesh.colored_vertex(r.left_bottom(), to_color32(gradient.bottom_left));
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        self.painter.add(Shape::mesh(mesh));
    }

    fn text_outlined(&mut self, pos: Vec2, text: &str, color: Color, outline: Color) {
        let pos = self.pos(pos);
        let outline = to_color32(outline);
        for (dx, dy) in [(-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)] {
            self.painter.text(
                pos + egui::vec2(dx, dy),
                egui::Align2::LEFT_TOP,
                text,
                self.font.clone(),
                outline,
            );
        }
        self.painter
            .text(pos, egui::Align2::LEFT_TOP, text, self.font.clone(), to_color32(color));
    }

    fn text_size(&self, text: &str) -> Vec2 {
        let galley = self
            .painter
            .layout_no_wrap(text.to_string(), self.font.clone(), egui::Color32::WHITE);
        let size = galley.size();
        Vec2::new(size.x, size.y)
    }

    fn push_clip(&mut self, rect: Rect) {
        let previous = self.painter.clip_rect();
        self.clips.push(previous);
        self.painter.set_clip_rect(previous.intersect(self.rect(rect)));
    }

    fn pop_clip(&mut self) {
        if let Some(previous) = self.clips.pop() {
            self.painter.set_clip_rect(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_renderer(f: impl Fn(&mut EguiRenderer)) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let canvas = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(400.0, 300.0));
            let painter = ctx.layer_painter(egui::LayerId::background());
            let mut renderer = EguiRenderer::new(painter, canvas, 13.0);
            f(&mut renderer);
        });
    }

    #[test]
    fn test_coordinates_are_canvas_relative() {
        with_renderer(|r| {
            let rect = r.rect(Rect::new(Vec2::new(10.0, 20.0), Vec2::new(5.0, 5.0)));
            assert_eq!(rect.min, egui::pos2(110.0, 70.0));
            assert_eq!(rect.max, egui::pos2(115.0, 75.0));
        });
    }

    #[test]
    fn test_clip_stack_restores() {
        with_renderer(|r| {
            let canvas = r.painter.clip_rect();
            r.push_clip(Rect::new(Vec2::ZERO, Vec2::new(50.0, 50.0)));
            r.push_clip(Rect::new(Vec2::new(25.0, 25.0), Vec2::new(100.0, 100.0)));
            assert_eq!(
                r.painter.clip_rect(),
                egui::Rect::from_min_max(egui::pos2(125.0, 75.0), egui::pos2(150.0, 100.0))
            );
            r.pop_clip();
            r.pop_clip();
            // unbalanced pops are ignored
            r.pop_clip();
            assert_eq!(r.painter.clip_rect(), canvas);
        });
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(to_color32(Color::WHITE), egui::Color32::WHITE);
        assert_eq!(to_color32(Color::TRANSPARENT), egui::Color32::TRANSPARENT);
    }
}
