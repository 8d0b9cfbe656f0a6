use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::{anchored_top_left, interact, preview_enabled, preview_entity, short_number};
use crate::color::{Color, color_by_health};
use crate::config::{ChangeEvent, ConfigTree, Value};
use crate::constants::sections;
use crate::game::{EntitySnapshot, GameStateProvider, Job, StatusEffect};
use crate::hud::bar::{draw_bar, text_centered, text_left, text_right};
use crate::hud::element::{Frame, HudElement};
use crate::hud::focus::{FocusArbiter, HoverTracker};
use crate::render::Renderer;
use crate::types::{Rect, Vec2};

const STATUS_SPACING: f32 = 2.0;
const LABEL_PADDING: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFrameKind {
    Player,
    Target,
    TargetOfTarget,
    Focus,
}

impl UnitFrameKind {
    pub fn section(self) -> &'static str {
        match self {
            UnitFrameKind::Player => sections::PLAYER_UNIT_FRAME,
            UnitFrameKind::Target => sections::TARGET_UNIT_FRAME,
            UnitFrameKind::TargetOfTarget => sections::TARGET_OF_TARGET_UNIT_FRAME,
            UnitFrameKind::Focus => sections::FOCUS_UNIT_FRAME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitFrameKind::Player => "Player",
            UnitFrameKind::Target => "Target",
            UnitFrameKind::TargetOfTarget => "Target of Target",
            UnitFrameKind::Focus => "Focus",
        }
    }

    /// Entity shown by the frame. A soft target takes precedence over the
    /// hard target.
    fn subject(self, game: &dyn GameStateProvider) -> Option<EntitySnapshot> {
        let target = || game.soft_target().or_else(|| game.target());
        match self {
            UnitFrameKind::Player => game.local_player(),
            UnitFrameKind::Target => target(),
            UnitFrameKind::TargetOfTarget => target().and_then(|t| game.target_of(t.id)),
            UnitFrameKind::Focus => game.focus_target(),
        }
    }
}

/// Health bar of a single entity with name, health text and status effects
pub struct UnitFrame {
    kind: UnitFrameKind,
    rng: StdRng,
    preview: Option<(EntitySnapshot, Vec<StatusEffect>)>,
    hover: HoverTracker,
}

impl UnitFrame {
    pub fn new(kind: UnitFrameKind, seed: u64) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
            preview: None,
            hover: HoverTracker::default(),
        }
    }

    fn preview_data(&mut self) -> (EntitySnapshot, Vec<StatusEffect>) {
        let kind = self.kind;
        self.preview
            .get_or_insert_with(|| generate_preview(&mut self.rng, kind))
            .clone()
    }

    fn draw_statuses(&self, renderer: &mut dyn Renderer, tree: &ConfigTree, bar: Rect, statuses: &[StatusEffect]) {
        let base = format!("{}.statuses", self.kind.section());
        if !tree.bool_or(&format!("{base}.enabled"), true) {
            return;
        }
        let limit = tree.int_or(&format!("{base}.limit"), 8).max(0) as usize;
        let icon = tree.vec2_or(&format!("{base}.icon_size"), Vec2::new(28.0, 18.0));
        let buff = tree.color_or(&format!("{base}.buff_color"), Color::WHITE);
        let debuff = tree.color_or(&format!("{base}.debuff_color"), Color::WHITE);
        let hidden = tree.entries(&format!("{base}.blacklist")).ok();

        let visible = statuses
            .iter()
            .filter(|s| !hidden.is_some_and(|m| m.get(&s.name) == Some(&Value::Bool(true))))
            .take(limit);
        for (i, status) in visible.enumerate() {
            let pos = Vec2::new(bar.min.x + i as f32 * (icon.x + STATUS_SPACING), bar.bottom() + STATUS_SPACING);
            let rect = Rect::new(pos, icon);
            renderer.rect_filled(rect, if status.is_debuff { debuff } else { buff });
            let text = if status.stacks > 0 {
                status.stacks.to_string()
            } else if status.remaining > 0.0 {
                format!("{:.0}", status.remaining.ceil())
            } else {
                continue;
            };
            text_centered(renderer, rect, &text, Color::WHITE, Color::BLACK);
        }
    }
}

fn generate_preview(rng: &mut StdRng, kind: UnitFrameKind) -> (EntitySnapshot, Vec<StatusEffect>) {
    let entity = preview_entity(rng, kind as u64, kind.label(), Job::Machinist);
    let statuses = (0..rng.gen_range(1..=4))
        .map(|i| StatusEffect {
            name: format!("Preview Effect {}", i + 1),
            remaining: rng.gen_range(0.0..30.0f32).round(),
            stacks: 0,
            is_debuff: i % 2 == 1,
        })
        .collect();
    trace!(section = kind.section(), "generated preview data");
    (entity, statuses)
}

impl HudElement for UnitFrame {
    fn section(&self) -> &str {
        self.kind.section()
    }

    fn display_name(&self) -> &str {
        self.kind.label()
    }

    fn children_positions_and_sizes(&self, tree: &ConfigTree) -> (Vec<Vec2>, Vec<Vec2>) {
        let size = tree.vec2_or(&format!("{}.size", self.kind.section()), Vec2::new(250.0, 40.0));
        (vec![anchored_top_left(tree, self.kind.section(), size)], vec![size])
    }

    fn draw_children(&mut self, origin: Vec2, frame: &mut Frame<'_>) {
        let section = self.kind.section();
        let tree = frame.tree;
        let preview = preview_enabled(tree, section);
        let (entity, statuses) = if preview {
            self.preview_data()
        } else {
            let Some(entity) = self.kind.subject(&*frame.game) else {
                self.hover.stop(frame.focus);
                return;
            };
            let statuses = frame.game.statuses(entity.id);
            (entity, statuses)
        };

        let (positions, sizes) = self.children_positions_and_sizes(tree);
        let rect = Rect::new(origin + positions[0], sizes[0]);
        let ratio = entity.health_ratio();
        let mut fill = tree.color_or(&format!("{section}.fill_color"), Color::WHITE);
        if tree.bool_or(&format!("{section}.color_by_health"), false) {
            let low = tree.color_or(&format!("{section}.low_health_color"), Color::WHITE);
            fill = color_by_health(ratio, 0.0, 1.0, fill, low);
        }
        let background = tree.color_or(&format!("{section}.background_color"), Color::TRANSPARENT);
        draw_bar(frame.renderer, rect, ratio, fill, background);

        if tree.bool_or(&format!("{section}.border.enabled"), true) {
            let color = tree.color_or(&format!("{section}.border.color"), Color::BLACK);
            let thickness = tree.int_or(&format!("{section}.border.thickness"), 1) as f32;
            frame.renderer.rect_bordered(rect, color, thickness);
        }

        let text_color = tree.color_or(&format!("{section}.label.color"), Color::WHITE);
        let outline = tree.color_or(&format!("{section}.label.outline_color"), Color::BLACK);
        frame.renderer.push_clip(rect);
        if tree.bool_or(&format!("{section}.label.show_name"), true) {
            text_left(frame.renderer, rect, LABEL_PADDING, &entity.name, text_color, outline);
        }
        if tree.bool_or(&format!("{section}.label.show_health"), true) {
            let text = format!("{} ({:.0}%)", short_number(entity.hp), ratio * 100.0);
            text_right(frame.renderer, rect, LABEL_PADDING, &text, text_color, outline);
        }
        frame.renderer.pop_clip();

        self.draw_statuses(frame.renderer, tree, rect, &statuses);

        // synthesized entities can't be targeted
        let hits = if preview { Vec::new() } else { vec![(rect, entity.id)] };
        interact(frame, &mut self.hover, section, &hits);
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
