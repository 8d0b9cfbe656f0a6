use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{anchored_top_left, preview_enabled};
use crate::color::Color;
use crate::config::{ChangeEvent, ConfigTree, Value};
use crate::constants::hud::LIMIT_BREAK_MAX_LEVEL;
use crate::constants::sections::LIMIT_BREAK;
use crate::game::LimitBreakState;
use crate::hud::bar::{chunk_fill, chunk_rects, draw_bar, text_centered};
use crate::hud::element::{Frame, HudElement};
use crate::types::{Rect, Vec2};

const PREVIEW_BAR_UNITS: u32 = 10_000;

/// Party limit break, one chunk per level
pub struct LimitBreakGauge {
    rng: StdRng,
    preview: Option<LimitBreakState>,
}

impl LimitBreakGauge {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            preview: None,
        }
    }

    fn rect(&self, tree: &ConfigTree) -> Rect {
        let size = tree.vec2_or(&format!("{LIMIT_BREAK}.size"), Vec2::new(500.0, 14.0));
        Rect::new(anchored_top_left(tree, LIMIT_BREAK, size), size)
    }
}

impl HudElement for LimitBreakGauge {
    fn section(&self) -> &str {
        LIMIT_BREAK
    }

    fn display_name(&self) -> &str {
        "Limit Break"
    }

    fn children_positions_and_sizes(&self, tree: &ConfigTree) -> (Vec<Vec2>, Vec<Vec2>) {
        let rect = self.rect(tree);
        (vec![rect.min], vec![rect.size])
    }

    fn draw_children(&mut self, origin: Vec2, frame: &mut Frame<'_>) {
        let tree = frame.tree;
        let state = if preview_enabled(tree, LIMIT_BREAK) {
            let rng = &mut self.rng;
            *self.preview.get_or_insert_with(|| {
                let max_level = rng.gen_range(1..=LIMIT_BREAK_MAX_LEVEL);
                LimitBreakState {
                    active: true,
                    max_level,
                    bar_units: PREVIEW_BAR_UNITS,
                    current: rng.gen_range(0..=max_level * PREVIEW_BAR_UNITS),
                }
            })
        } else {
            frame.game.limit_break()
        };

        if state.max_level == 0 || (!state.active && tree.bool_or(&format!("{LIMIT_BREAK}.hide_when_empty"), true)) {
            return;
        }

        let rect = self.rect(tree).translate(origin);
        let spacing = tree.f32_or(&format!("{LIMIT_BREAK}.chunk_spacing"), 4.0);
        let fill = tree.color_or(&format!("{LIMIT_BREAK}.fill_color"), Color::WHITE);
        let full = tree.color_or(&format!("{LIMIT_BREAK}.full_color"), Color::WHITE);
        let background = tree.color_or(&format!("{LIMIT_BREAK}.background_color"), Color::TRANSPARENT);

        let max_level = state.max_level.min(LIMIT_BREAK_MAX_LEVEL);
        for (i, chunk) in chunk_rects(rect, max_level, spacing).into_iter().enumerate() {
            let ratio = chunk_fill(state.current as f32, state.bar_units as f32, i as u32);
            let color = if ratio >= 1.0 { full } else { fill };
            draw_bar(frame.renderer, chunk, ratio, color, background);
        }

        if tree.bool_or(&format!("{LIMIT_BREAK}.show_text"), true) {
            let text = format!("{} / {}", state.level(), max_level);
            text_centered(frame.renderer, rect, &text, Color::WHITE, Color::BLACK);
        }
    }

    fn on_config_changed(&mut self, event: &ChangeEvent, _tree: &ConfigTree) {
        if event.field() == "preview" && event.new == Some(Value::Bool(true)) {
            self.preview = None;
        }
    }
}
