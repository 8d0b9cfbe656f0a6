//! Widgets built on the HUD element contract

mod enemy_list;
mod job_gauge;
mod limit_break;
mod party_list;
mod unit_frame;

pub use enemy_list::EnemyList;
pub use job_gauge::JobGaugeWidget;
pub use limit_break::LimitBreakGauge;
pub use party_list::{PartyList, sort_party};
pub use unit_frame::{UnitFrame, UnitFrameKind};

use rand::Rng;
use rand::rngs::StdRng;

use super::element::{Frame, HudElement};
use super::focus::HoverTracker;
use crate::color::Color;
use crate::config::ConfigTree;
use crate::constants::sections;
use crate::game::{EntitySnapshot, Job};
use crate::layout::{self, Anchor};
use crate::types::{EntityId, Rect, Vec2};

/// Every widget in draw order. Each gets its own preview seed.
pub fn default_elements(seed: u64) -> Vec<Box<dyn HudElement>> {
    vec![
        Box::new(UnitFrame::new(UnitFrameKind::Player, seed)),
        Box::new(UnitFrame::new(UnitFrameKind::Target, seed.wrapping_add(1))),
        Box::new(UnitFrame::new(UnitFrameKind::TargetOfTarget, seed.wrapping_add(2))),
        Box::new(UnitFrame::new(UnitFrameKind::Focus, seed.wrapping_add(3))),
        Box::new(EnemyList::new(seed.wrapping_add(4))),
        Box::new(PartyList::new(seed.wrapping_add(5))),
        Box::new(JobGaugeWidget::new(seed.wrapping_add(6))),
        Box::new(LimitBreakGauge::new(seed.wrapping_add(7))),
    ]
}

pub(crate) fn preview_enabled(tree: &ConfigTree, section: &str) -> bool {
    tree.bool_or(&format!("{section}.preview"), false)
}

/// Top-left of a box of `size` placed by the section's position and anchor
pub(crate) fn anchored_top_left(tree: &ConfigTree, section: &str, size: Vec2) -> Vec2 {
    let position = tree.vec2_or(&format!("{section}.position"), Vec2::ZERO);
    let anchor = tree.anchor_or(&format!("{section}.anchor"), Anchor::default());
    layout::resolve(position, size, anchor)
}

/// Largest per-frame step of a smoothed bar whose maximum is `max`
pub(crate) fn smooth_step(tree: &ConfigTree, max: f32) -> f32 {
    tree.f32_or(&format!("{}.smooth_speed", sections::GENERAL), 0.02) * max
}

/// Hover and click handling for a widget's entity boxes.
///
/// `hits` are in draw order; the last box under the pointer wins. Returns the
/// hovered entity.
pub(crate) fn interact(
    frame: &mut Frame<'_>,
    hover: &mut HoverTracker,
    section: &str,
    hits: &[(Rect, EntityId)],
) -> Option<EntityId> {
    let enabled = frame.tree.bool_or(&format!("{section}.mouseover.enabled"), true);
    if !frame.interactive || !enabled {
        hover.stop(frame.focus);
        return None;
    }

    let hovered = hits.iter().rev().find(|(rect, _)| frame.input.hovering(*rect)).copied();
    hover.update(hovered.map(|(_, id)| id), frame.focus);
    let (rect, id) = hovered?;

    let general = sections::GENERAL;
    if frame.tree.bool_or(&format!("{general}.hover_highlight"), true) {
        let color = frame.tree.color_or(&format!("{general}.hover_color"), Color::rgba(1.0, 1.0, 1.0, 0.25));
        frame.renderer.rect_filled(rect, color);
    }
    if frame.input.primary_pressed && frame.tree.bool_or(&format!("{section}.mouseover.target_on_click"), true) {
        frame.game.set_target(id);
    }
    Some(id)
}

/// Ids handed to synthesized entities, far away from anything the game uses
pub(crate) const PREVIEW_ID_BASE: u64 = u64::MAX - 1_000;

/// Made-up entity with random health for preview mode
pub(crate) fn preview_entity(rng: &mut StdRng, slot: u64, name: &str, job: Job) -> EntitySnapshot {
    let max_hp = rng.gen_range(30_000..150_000u32);
    EntitySnapshot {
        id: EntityId(PREVIEW_ID_BASE + slot),
        name: name.to_string(),
        job,
        level: 90,
        hp: rng.gen_range(max_hp / 10..=max_hp),
        max_hp,
    }
}

/// Compact hit point text: 950, 12.3K, 1.2M
pub fn short_number(value: u32) -> String {
    match value {
        0..=9_999 => value.to_string(),
        10_000..=999_999 => format!("{:.1}K", value as f32 / 1_000.0),
        _ => format!("{:.1}M", value as f32 / 1_000_000.0),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::hud::element::FrameInput;
    use crate::hud::focus::FocusArbiter;
    use crate::render::RecordingRenderer;
    use crate::simulation::SimulatedGame;

    /// Draw one element for one frame at the origin and settle focus
    pub fn draw_once(
        element: &mut dyn HudElement,
        tree: &ConfigTree,
        game: &mut SimulatedGame,
        input: FrameInput,
        interactive: bool,
    ) -> RecordingRenderer {
        let mut renderer = RecordingRenderer::new();
        let mut focus = FocusArbiter::new();
        {
            let mut frame = Frame {
                tree,
                game: &mut *game,
                renderer: &mut renderer,
                focus: &mut focus,
                input: &input,
                interactive,
            };
            element.draw_children(Vec2::ZERO, &mut frame);
        }
        focus.end_frame(game);
        assert!(renderer.clips_balanced());
        renderer
    }
}
