use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{anchored_top_left, interact, preview_enabled, preview_entity, short_number, smooth_step};
use crate::color::{Color, color_by_health};
use crate::config::{ChangeEvent, ConfigTree, Value};
use crate::constants::hud::PARTY_LIST_MAX;
use crate::constants::sections::PARTY_LIST;
use crate::game::{EntitySnapshot, Job, Role};
use crate::hud::bar::{draw_bar, text_left, text_right};
use crate::hud::element::{Frame, HudElement};
use crate::hud::focus::{FocusArbiter, HoverTracker};
use crate::hud::smooth::SmoothValue;
use crate::types::{EntityId, Rect, Vec2};

const LABEL_PADDING: f32 = 5.0;

/// Role order per sorting mode, same indices as the sorting combo
const ROLE_ORDERS: [[Role; 3]; 6] = [
    [Role::Tank, Role::Dps, Role::Healer],
    [Role::Tank, Role::Healer, Role::Dps],
    [Role::Dps, Role::Tank, Role::Healer],
    [Role::Dps, Role::Healer, Role::Tank],
    [Role::Healer, Role::Tank, Role::Dps],
    [Role::Healer, Role::Dps, Role::Tank],
];

const PREVIEW_JOBS: [Job; 8] = [
    Job::Paladin,
    Job::Warrior,
    Job::WhiteMage,
    Job::Scholar,
    Job::Machinist,
    Job::Ninja,
    Job::Dragoon,
    Job::BlackMage,
];

/// Order party members by role for the given sorting mode, names breaking
/// ties. Unknown modes fall back to the first one. With `player_first` the
/// local player always leads.
pub fn sort_party(members: &mut [EntitySnapshot], mode: usize, player: Option<EntityId>, player_first: bool) {
    let order = ROLE_ORDERS.get(mode).unwrap_or(&ROLE_ORDERS[0]);
    let rank = |role: Role| order.iter().position(|r| *r == role).unwrap_or(order.len());
    let leads = |m: &EntitySnapshot| player_first && Some(m.id) == player;

    members.sort_by(|a, b| match (leads(a), leads(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => rank(a.job.role())
            .cmp(&rank(b.job.role()))
            .then_with(|| a.name.cmp(&b.name)),
    });
}

pub struct PartyList {
    rng: StdRng,
    preview: Option<Vec<EntitySnapshot>>,
    hover: HoverTracker,
    smooth: [SmoothValue; PARTY_LIST_MAX],
}

impl PartyList {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            preview: None,
            hover: HoverTracker::default(),
            smooth: [SmoothValue::default(); PARTY_LIST_MAX],
        }
    }

    fn row_rects(&self, tree: &ConfigTree) -> Vec<Rect> {
        let row = tree.vec2_or(&format!("{PARTY_LIST}.row_size"), Vec2::new(180.0, 36.0));
        let spacing = tree.f32_or(&format!("{PARTY_LIST}.row_spacing"), 4.0);
        let step = row.y + spacing;
        let total = Vec2::new(row.x, PARTY_LIST_MAX as f32 * step - spacing);
        let top_left = anchored_top_left(tree, PARTY_LIST, total);
        (0..PARTY_LIST_MAX)
            .map(|i| Rect::new(top_left + Vec2::new(0.0, i as f32 * step), row))
            .collect()
    }

    fn members(&mut self, frame: &Frame<'_>) -> (Vec<EntitySnapshot>, Option<EntityId>) {
        if preview_enabled(frame.tree, PARTY_LIST) {
            let members = self.preview.get_or_insert_with(|| generate_preview(&mut self.rng)).clone();
            let player = members.first().map(|m| m.id);
            return (members, player);
        }
        let player = frame.game.local_player().map(|p| p.id);
        (frame.game.party_members(), player)
    }
}

fn generate_preview(rng: &mut StdRng) -> Vec<EntitySnapshot> {
    let mut jobs = PREVIEW_JOBS;
    jobs.shuffle(rng);
    jobs.iter()
        .enumerate()
        .map(|(i, job)| preview_entity(rng, i as u64, &format!("Party Member {}", i + 1), *job))
        .collect()
}

impl HudElement for PartyList {
    fn section(&self) -> &str {
        PARTY_LIST
    }

    fn display_name(&self) -> &str {
        "Party List"
    }

    fn children_positions_and_sizes(&self, tree: &ConfigTree) -> (Vec<Vec2>, Vec<Vec2>) {
        self.row_rects(tree).into_iter().map(|r| (r.min, r.size)).unzip()
    }

    fn draw_children(&mut self, origin: Vec2, frame: &mut Frame<'_>) {
        let tree = frame.tree;
        let preview = preview_enabled(tree, PARTY_LIST);
        let (mut members, player) = self.members(frame);
        if members.is_empty() {
            self.hover.stop(frame.focus);
            return;
        }

        let mode = tree.int_or(&format!("{PARTY_LIST}.sorting"), 0).max(0) as usize;
        let player_first = tree.bool_or(&format!("{PARTY_LIST}.player_first"), true);
        sort_party(&mut members, mode, player, player_first);

        let by_health = tree.bool_or(&format!("{PARTY_LIST}.color_by_health"), true);
        let full = tree.color_or(&format!("{PARTY_LIST}.full_health_color"), Color::WHITE);
        let low = tree.color_or(&format!("{PARTY_LIST}.low_health_color"), Color::WHITE);
        let low_threshold = tree.f32_or(&format!("{PARTY_LIST}.low_health_threshold"), 0.1);
        let full_threshold = tree.f32_or(&format!("{PARTY_LIST}.full_health_threshold"), 0.9);
        let background = tree.color_or(&format!("{PARTY_LIST}.background_color"), Color::TRANSPARENT);
        let smooth = tree.bool_or(&format!("{PARTY_LIST}.smooth_health"), true);

        let mut hits = Vec::with_capacity(members.len());
        for (i, (member, rect)) in members.iter().zip(self.row_rects(tree)).enumerate() {
            let rect = rect.translate(origin);
            let max = member.max_hp as f32;
            let hp = if smooth {
                self.smooth[i].update(Some(member.id), member.hp as f32, max, smooth_step(tree, max))
            } else {
                member.hp as f32
            };
            let ratio = hp / max.max(1.0);
            let fill = if by_health {
                color_by_health(ratio, low_threshold, full_threshold, full, low)
            } else {
                full
            };
            draw_bar(frame.renderer, rect, ratio, fill, background);

            let name = format!("{}  {}", member.job.abbreviation(), member.name);
            frame.renderer.push_clip(rect);
            text_left(frame.renderer, rect, LABEL_PADDING, &name, Color::WHITE, Color::BLACK);
            text_right(frame.renderer, rect, LABEL_PADDING, &short_number(member.hp), Color::WHITE, Color::BLACK);
            frame.renderer.pop_clip();

            if !preview {
                hits.push((rect, member.id));
            }
        }
        let shown = members.len().min(PARTY_LIST_MAX);
        for slot in &mut self.smooth[shown..] {
            slot.reset();
        }

        interact(frame, &mut self.hover, PARTY_LIST, &hits);
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
    use crate::simulation::SimulatedGame;

    fn names(members: &[EntitySnapshot]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_sort_tank_dps_healer_with_player_first() {
        let game = SimulatedGame::demo(1);
        let mut members = crate::game::GameStateProvider::party_members(&game);
        sort_party(&mut members, 0, Some(EntityId(1)), true);
        assert_eq!(
            names(&members),
            vec!["Alisaie Leveilleur", "Thancred Waters", "Estinien Varlineau", "Y'shtola Rhul"]
        );
    }

    #[test]
    fn test_sort_ties_break_by_name() {
        let game = SimulatedGame::demo(1);
        let mut members = crate::game::GameStateProvider::party_members(&game);
        sort_party(&mut members, 4, Some(EntityId(4)), false);
        assert_eq!(
            names(&members),
            vec!["Y'shtola Rhul", "Thancred Waters", "Alisaie Leveilleur", "Estinien Varlineau"]
        );
    }

    #[test]
    fn test_unknown_mode_falls_back_to_first() {
        let game = SimulatedGame::demo(1);
        let mut a = crate::game::GameStateProvider::party_members(&game);
        let mut b = a.clone();
        sort_party(&mut a, 99, None, false);
        sort_party(&mut b, 0, None, false);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rows_follow_sorting_mode() {
        let mut tree = default_tree();
        tree.set_value("party_list.sorting", Value::Int(2)).unwrap();
        tree.set_value("party_list.player_first", Value::Bool(false)).unwrap();
        let mut game = SimulatedGame::demo(1);
        let mut list = PartyList::new(1);
        let out = draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);
        let rows: Vec<&str> = out.texts().into_iter().filter(|t| t.contains("  ")).collect();
        assert_eq!(
            rows,
            vec!["MCH  Alisaie Leveilleur", "DRG  Estinien Varlineau", "WAR  Thancred Waters", "WHM  Y'shtola Rhul"]
        );
    }

    #[test]
    fn test_low_health_member_is_tinted() {
        let tree = default_tree();
        let mut game = SimulatedGame::demo(1);
        if let Some(dragoon) = game.entities.get_mut(&EntityId(4)) {
            dragoon.hp = 1_000;
        }
        let mut list = PartyList::new(1);
        let out = draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);
        let low = tree.color_or("party_list.low_health_color", Color::BLACK);
        let expected = crate::render::Gradient::vertical(low, 0.08);
        assert!(out.commands.iter().any(|c| matches!(
            c,
            crate::render::DrawCommand::Gradient { gradient, .. } if *gradient == expected
        )));
    }

    #[test]
    fn test_preview_fills_every_row() {
        let mut tree = default_tree();
        tree.set_value("party_list.preview", Value::Bool(true)).unwrap();
        let mut game = SimulatedGame::default();
        let mut list = PartyList::new(2);
        let out = draw_once(&mut list, &tree, &mut game, FrameInput::default(), true);
        let rows = out.texts().into_iter().filter(|t| t.contains("Party Member")).count();
        assert_eq!(rows, PARTY_LIST_MAX);
    }
}
