use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{anchored_top_left, interact, preview_enabled, preview_entity, smooth_step};
use crate::color::Color;
use crate::config::{ChangeEvent, ConfigTree, Value};
use crate::constants::hud::ENEMY_LIST_MAX;
use crate::constants::sections::ENEMY_LIST;
use crate::game::{EnemyListEntry, EntitySnapshot, Job};
use crate::hud::bar::{draw_bar, text_left, text_right};
use crate::hud::element::{Frame, HudElement};
use crate::hud::focus::{FocusArbiter, HoverTracker};
use crate::hud::smooth::SmoothValue;
use crate::types::{EntityId, Rect, Vec2};

const LABEL_PADDING: f32 = 5.0;

/// Enmity level at which an enemy is attacking the player
const ENMITY_LEADER: u8 = 3;
const ENMITY_SECOND: u8 = 2;

/// Enemies engaged with the party, one health bar per row
pub struct EnemyList {
    rng: StdRng,
    preview: Option<Vec<(EnemyListEntry, EntitySnapshot)>>,
    hover: HoverTracker,
    smooth: [SmoothValue; ENEMY_LIST_MAX],
}

impl EnemyList {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            preview: None,
            hover: HoverTracker::default(),
            smooth: [SmoothValue::default(); ENEMY_LIST_MAX],
        }
    }

    fn row_rects(&self, tree: &ConfigTree) -> Vec<Rect> {
        let row = tree.vec2_or(&format!("{ENEMY_LIST}.row_size"), Vec2::new(180.0, 24.0));
        let spacing = tree.f32_or(&format!("{ENEMY_LIST}.row_spacing"), 6.0);
        let grow_up = tree.bool_or(&format!("{ENEMY_LIST}.grow_up"), false);
        let step = row.y + spacing;
        let total = Vec2::new(row.x, ENEMY_LIST_MAX as f32 * step - spacing);
        let top_left = anchored_top_left(tree, ENEMY_LIST, total);

        (0..ENEMY_LIST_MAX)
            .map(|i| {
                let slot = if grow_up { ENEMY_LIST_MAX - 1 - i } else { i };
                Rect::new(top_left + Vec2::new(0.0, slot as f32 * step), row)
            })
            .collect()
    }

    fn rows(&mut self, frame: &Frame<'_>) -> Vec<(EnemyListEntry, EntitySnapshot)> {
        if preview_enabled(frame.tree, ENEMY_LIST) {
            return self
                .preview
                .get_or_insert_with(|| generate_preview(&mut self.rng))
                .clone();
        }
        frame
            .game
            .enemy_list_entries()
            .into_iter()
            .filter_map(|entry| frame.game.entity(entry.id).map(|e| (entry, e)))
            .take(ENEMY_LIST_MAX)
            .collect()
    }
}

fn generate_preview(rng: &mut StdRng) -> Vec<(EnemyListEntry, EntitySnapshot)> {
    let count = rng.gen_range(3..=ENEMY_LIST_MAX);
    (0..count)
        .map(|i| {
            let entity = preview_entity(rng, 100 + i as u64, &format!("Enemy {}", i + 1), Job::Other);
            let entry = EnemyListEntry {
                id: entity.id,
                letter: None,
                enmity_level: rng.gen_range(0..=ENMITY_LEADER),
            };
            (entry, entity)
        })
        .collect()
}

/// Border of a row: the current target first, then enmity
fn row_border(tree: &ConfigTree, entry: &EnemyListEntry, target: Option<EntityId>) -> Option<Color> {
    if target == Some(entry.id) {
        return Some(tree.color_or(&format!("{ENEMY_LIST}.target_color"), Color::WHITE));
    }
    if !tree.bool_or(&format!("{ENEMY_LIST}.enmity.enabled"), true) {
        return None;
    }
    match entry.enmity_level {
        level if level >= ENMITY_LEADER => Some(tree.color_or(&format!("{ENEMY_LIST}.enmity.leader_color"), Color::WHITE)),
        ENMITY_SECOND => Some(tree.color_or(&format!("{ENEMY_LIST}.enmity.second_color"), Color::WHITE)),
        _ => None,
    }
}

impl HudElement for EnemyList {
    fn section(&self) -> &str {
        ENEMY_LIST
    }

    fn display_name(&self) -> &str {
        "Enemy List"
    }

    fn children_positions_and_sizes(&self, tree: &ConfigTree) -> (Vec<Vec2>, Vec<Vec2>) {
        self.row_rects(tree).into_iter().map(|r| (r.min, r.size)).unzip()
    }

    fn draw_children(&mut self, origin: Vec2, frame: &mut Frame<'_>) {
        let tree = frame.tree;
        let preview = preview_enabled(tree, ENEMY_LIST);
        let rows = self.rows(frame);
        if rows.is_empty() {
            self.hover.stop(frame.focus);
            return;
        }

        let target = frame.game.soft_target().or_else(|| frame.game.target()).map(|t| t.id);
        let fill = tree.color_or(&format!("{ENEMY_LIST}.fill_color"), Color::WHITE);
        let background = tree.color_or(&format!("{ENEMY_LIST}.background_color"), Color::TRANSPARENT);
        let smooth = tree.bool_or(&format!("{ENEMY_LIST}.smooth_health"), true);
        let show_letter = tree.bool_or(&format!("{ENEMY_LIST}.show_order_letter"), true);
        let thickness = tree.int_or(&format!("{ENEMY_LIST}.enmity.thickness"), 2) as f32;

        let mut hits = Vec::with_capacity(rows.len());
        for (i, ((entry, entity), rect)) in rows.iter().zip(self.row_rects(tree)).enumerate() {
            let rect = rect.translate(origin);
            let max = entity.max_hp as f32;
            let hp = if smooth {
                self.smooth[i].update(Some(entity.id), entity.hp as f32, max, smooth_step(tree, max))
            } else {
                entity.hp as f32
            };
            let ratio = hp / max.max(1.0);
            draw_bar(frame.renderer, rect, ratio, fill, background);

            if let Some(color) = row_border(tree, entry, target) {
                frame.renderer.rect_bordered(rect, color, thickness);
            }

            let letter = entry.letter.unwrap_or((b'A' + i as u8) as char);
            let name = if show_letter {
                format!("{letter}  {}", entity.name)
            } else {
                entity.name.clone()
            };
            frame.renderer.push_clip(rect);
            text_left(frame.renderer, rect, LABEL_PADDING, &name, Color::WHITE, Color::BLACK);
            let percent = format!("{:.0}%", ratio * 100.0);
            text_right(frame.renderer, rect, LABEL_PADDING, &percent, Color::WHITE, Color::BLACK);
            frame.renderer.pop_clip();

            if !preview {
                hits.push((rect, entity.id));
            }
        }
        for slot in &mut self.smooth[rows.len()..] {
            slot.reset();
        }

        interact(frame, &mut self.hover, ENEMY_LIST, &hits);
    }

    fn on_config_changed(&mut self, event: &ChangeEvent, _tree: &ConfigTree) {
        if event.field() == "preview" && event.new == Some(Value::Bool(true)) {
            self.preview = None;
        }
    }

    fn release_focus(&mut self, focus: &mut FocusArbiter) {
        self.hover.stop(focus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tree;
    use crate::hud::element::FrameInput;
    use crate::hud::widgets::test_support::draw_once;
    use crate::render::DrawCommand;
    use crate::simulation::SimulatedGame;

    fn gradient_widths(out: &crate::render::RecordingRenderer) -> Vec<f32> {
        out.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Gradient { rect, .. } => Some(rect.size.x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_rows_are_lettered_in_order() {
        let tree = default_tree();
        let mut game = SimulatedGame::demo(1);
        let mut list = EnemyList::new(1);
        let out = draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);
        let texts = out.texts();
        assert!(texts.contains(&"A  Striking Dummy"));
        assert!(texts.contains(&"B  Forgiven Gossip"));
        assert!(texts.contains(&"C  Forgiven Rebellion"));
    }

    #[test]
    fn test_borders_follow_target_then_enmity() {
        let tree = default_tree();
        let mut game = SimulatedGame::demo(1);
        let mut list = EnemyList::new(1);
        let out = draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);

        let borders = out.borders();
        let target = tree.color_or("enemy_list.target_color", Color::BLACK);
        let second = tree.color_or("enemy_list.enmity.second_color", Color::BLACK);
        // row 0 is the target, row 1 has enmity 2, row 2 has enmity 1
        assert_eq!(borders.len(), 2);
        assert_eq!(borders[0].1, target);
        assert_eq!(borders[1].1, second);
    }

    #[test]
    fn test_grow_up_starts_at_the_bottom() {
        let mut tree = default_tree();
        let mut list = EnemyList::new(1);
        let down = list.row_rects(&tree);
        tree.set_value("enemy_list.grow_up", Value::Bool(true)).unwrap();
        let up = list.row_rects(&tree);
        assert_eq!(up[0], down[ENEMY_LIST_MAX - 1]);
        assert_eq!(up[ENEMY_LIST_MAX - 1], down[0]);
    }

    #[test]
    fn test_missing_entities_are_skipped() {
        let tree = default_tree();
        let mut game = SimulatedGame::demo(1);
        game.entities.remove(&EntityId(101));
        let mut list = EnemyList::new(1);
        let out = draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);
        assert!(out.texts().contains(&"B  Forgiven Rebellion"));
    }

    #[test]
    fn test_health_is_smoothed_per_slot() {
        let tree = default_tree();
        let mut game = SimulatedGame::demo(1);
        let mut list = EnemyList::new(1);
        draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);

        if let Some(dummy) = game.entities.get_mut(&EntityId(100)) {
            dummy.hp = 500_000;
        }
        let out = draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);
        // one step of 2% of max health from 90%
        assert!((gradient_widths(&out)[0] - 180.0 * 0.88).abs() < 0.01);
    }

    #[test]
    fn test_click_targets_row() {
        let tree = default_tree();
        let mut game = SimulatedGame::demo(1);
        let mut list = EnemyList::new(1);
        let second_row = list.row_rects(&tree)[1];
        let input = FrameInput {
            pointer: Some(second_row.min + Vec2::new(5.0, 5.0)),
            primary_pressed: true,
            primary_down: true,
            ..FrameInput::default()
        };
        draw_once(&mut list, &tree, &mut game, input, true);
        assert_eq!(game.target_calls, vec![EntityId(101)]);
    }

    #[test]
    fn test_preview_works_without_game_data() {
        let mut tree = default_tree();
        tree.set_value("enemy_list.preview", Value::Bool(true)).unwrap();
        let mut game = SimulatedGame::default();
        let mut list = EnemyList::new(3);
        let out = draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);
        assert!(out.texts().iter().any(|t| t.ends_with("Enemy 1")));
        assert!(game.target_calls.is_empty());
    }
}
