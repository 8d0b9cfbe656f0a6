//! Compiled-in default configuration
//!
//! [`default_tree`] is the single source of the HUD's configuration layout.
//! Profiles and imported blobs are always overlaid onto a fresh copy of it.

use super::node::{ConfigNode, ConfigTree};
use super::schema::{FieldKind, GroupBuilder, SectionBuilder};
use crate::color::Color;
use crate::constants::sections;
use crate::layout::Anchor;
use crate::types::Vec2;

const MAX: f32 = crate::constants::hud::MAX_COORDINATE;
const FRAME_SIZE: Vec2 = Vec2::new(250.0, 40.0);

/// Names shown in the party sorting combo, index = sorting mode
pub const PARTY_SORTING_MODES: [&str; 6] = [
    "Tank => DPS => Healer",
    "Tank => Healer => DPS",
    "DPS => Tank => Healer",
    "DPS => Healer => Tank",
    "Healer => Tank => DPS",
    "Healer => DPS => Tank",
];

pub fn default_tree() -> ConfigTree {
    ConfigTree::new(vec![
        general(),
        unit_frame(
            (sections::PLAYER_UNIT_FRAME, "Player", 10),
            Vec2::new(-160.0, 200.0),
            FRAME_SIZE,
            Color::from_rgba8(60, 170, 60, 255),
        ),
        unit_frame(
            (sections::TARGET_UNIT_FRAME, "Target", 20),
            Vec2::new(160.0, 200.0),
            FRAME_SIZE,
            Color::from_rgba8(200, 60, 60, 255),
        ),
        unit_frame(
            (sections::TARGET_OF_TARGET_UNIT_FRAME, "Target of Target", 30),
            Vec2::new(355.0, 200.0),
            Vec2::new(120.0, 24.0),
            Color::from_rgba8(160, 80, 80, 255),
        ),
        unit_frame(
            (sections::FOCUS_UNIT_FRAME, "Focus", 40),
            Vec2::new(-355.0, 200.0),
            Vec2::new(120.0, 24.0),
            Color::from_rgba8(150, 110, 200, 255),
        ),
        enemy_list(),
        party_list(),
        job_gauge(),
        limit_break(),
    ])
}

fn general() -> ConfigNode {
    SectionBuilder::new(sections::GENERAL, "General")
        .order(0)
        .checkbox("locked", "Lock HUD", true)
        .non_portable()
        .float("snap_threshold", "Snap Distance", 10.0, 0.0, 50.0)
        .checkbox("hover_highlight", "Highlight Hovered Frames", true)
        .color("hover_color", "Hover Highlight Color", Color::rgba(1.0, 1.0, 1.0, 0.25))
        .float("smooth_speed", "Smooth Health Speed", 0.02, 0.001, 1.0)
        .build()
}

/// Fields shared by every element with a position and anchor
fn movable((key, label, order): (&str, &str, i32), position: Vec2, anchor: Anchor) -> GroupBuilder {
    SectionBuilder::new(key, label)
        .order(order)
        .checkbox("enabled", "Enabled", true)
        .checkbox("preview", "Preview", false)
        .non_portable()
        .vec2("position", "Position", position, -MAX, MAX)
        .order(5)
        .anchor("anchor", "Anchor", anchor)
        .order(6)
}

fn unit_frame(id: (&str, &str, i32), position: Vec2, size: Vec2, fill: Color) -> ConfigNode {
    movable(id, position, Anchor::Center)
        .vec2("size", "Size", size, 1.0, MAX)
        .order(15)
        .color("fill_color", "Fill Color", fill)
        .checkbox("color_by_health", "Color By Health", false)
        .color("low_health_color", "Low Health Color", Color::from_rgba8(220, 40, 40, 255))
        .color("background_color", "Background Color", Color::rgba(0.0, 0.0, 0.0, 0.5))
        .group("border", "Border", |g| {
            g.checkbox("enabled", "Show Border", true)
                .color("color", "Color", Color::BLACK)
                .int("thickness", "Thickness", 1, 1, 10)
        })
        .group("label", "Label", |g| {
            g.checkbox("show_name", "Show Name", true)
                .checkbox("show_health", "Show Health", true)
                .color("color", "Color", Color::WHITE)
                .color("outline_color", "Outline Color", Color::BLACK)
        })
        .group("mouseover", "Mouseover", |g| {
            g.checkbox("enabled", "Enable Mouseover", true)
                .checkbox("target_on_click", "Target On Click", true)
        })
        .group("statuses", "Status Effects", |g| {
            g.checkbox("enabled", "Show Status Effects", true)
                .int("limit", "Limit", 8, 0, 30)
                .vec2("icon_size", "Icon Size", Vec2::new(28.0, 18.0), 1.0, 200.0)
                .color("buff_color", "Buff Color", Color::from_rgba8(40, 110, 200, 230))
                .color("debuff_color", "Debuff Color", Color::from_rgba8(180, 50, 50, 230))
                .map("blacklist", "Hidden Effects", FieldKind::Checkbox)
        })
        .build()
}

fn enemy_list() -> ConfigNode {
    movable((sections::ENEMY_LIST, "Enemy List", 50), Vec2::new(520.0, -120.0), Anchor::TopLeft)
        .vec2("row_size", "Row Size", Vec2::new(180.0, 24.0), 1.0, MAX)
        .order(15)
        .float("row_spacing", "Row Spacing", 6.0, 0.0, 100.0)
        .order(16)
        .checkbox("grow_up", "Grow Upwards", false)
        .color("fill_color", "Fill Color", Color::from_rgba8(195, 60, 60, 255))
        .color("background_color", "Background Color", Color::rgba(0.0, 0.0, 0.0, 0.5))
        .checkbox("smooth_health", "Smooth Health", true)
        .checkbox("show_order_letter", "Show Order Letter", true)
        .color("target_color", "Target Border Color", Color::WHITE)
        .group("enmity", "Enmity Border", |g| {
            g.checkbox("enabled", "Enabled", true)
                .color("leader_color", "Top Enmity Color", Color::from_rgba8(255, 40, 40, 255))
                .color("second_color", "Second Enmity Color", Color::from_rgba8(255, 200, 30, 255))
                .int("thickness", "Thickness", 2, 1, 10)
        })
        .group("mouseover", "Mouseover", |g| {
            g.checkbox("enabled", "Enable Mouseover", true)
                .checkbox("target_on_click", "Target On Click", true)
        })
        .build()
}

fn party_list() -> ConfigNode {
    movable((sections::PARTY_LIST, "Party List", 60), Vec2::new(-700.0, -200.0), Anchor::TopLeft)
        .vec2("row_size", "Row Size", Vec2::new(180.0, 36.0), 1.0, MAX)
        .order(15)
        .float("row_spacing", "Row Spacing", 4.0, 0.0, 100.0)
        .order(16)
        .combo("sorting", "Sorting Mode", &PARTY_SORTING_MODES, 0)
        .checkbox("player_first", "Player Always First", true)
        .checkbox("color_by_health", "Color By Health", true)
        .color("full_health_color", "Full Health Color", Color::from_rgba8(60, 170, 60, 255))
        .color("low_health_color", "Low Health Color", Color::from_rgba8(220, 40, 40, 255))
        .float("low_health_threshold", "Low Health Threshold", 0.1, 0.0, 1.0)
        .float("full_health_threshold", "Full Health Threshold", 0.9, 0.0, 1.0)
        .color("background_color", "Background Color", Color::rgba(0.0, 0.0, 0.0, 0.5))
        .checkbox("smooth_health", "Smooth Health", true)
        .group("mouseover", "Mouseover", |g| {
            g.checkbox("enabled", "Enable Mouseover", true)
                .checkbox("target_on_click", "Target On Click", true)
        })
        .build()
}

/// One bar of a job gauge; `position` is relative to the gauge position
fn gauge_bar(g: GroupBuilder, position: Vec2, size: Vec2, fill: Color) -> GroupBuilder {
    g.checkbox("enabled", "Enabled", true)
        .vec2("position", "Position", position, -MAX, MAX)
        .vec2("size", "Size", size, 1.0, MAX)
        .color("fill_color", "Fill Color", fill)
        .color("background_color", "Background Color", Color::rgba(0.0, 0.0, 0.0, 0.5))
        .checkbox("hide_when_inactive", "Hide When Inactive", false)
        .checkbox("show_value", "Show Value", true)
}

fn job_gauge() -> ConfigNode {
    let wide = Vec2::new(254.0, 20.0);
    let thin = Vec2::new(254.0, 10.0);
    movable((sections::JOB_GAUGE, "Job Gauge", 70), Vec2::new(0.0, 240.0), Anchor::Top)
        .group("machinist", "Machinist", |g| {
            g.group("overheat", "Overheat Gauge", |b| {
                gauge_bar(b, Vec2::new(-127.0, 0.0), thin, Color::from_rgba8(255, 239, 14, 255))
            })
            .group("heat", "Heat Gauge", |b| {
                gauge_bar(b, Vec2::new(-127.0, 14.0), wide, Color::from_rgba8(201, 13, 13, 255))
            })
            .group("battery", "Battery Gauge", |b| {
                gauge_bar(b, Vec2::new(-127.0, 38.0), wide, Color::from_rgba8(106, 255, 255, 255))
            })
        })
        .group("ninja", "Ninja", |g| {
            g.group("huton", "Huton Bar", |b| {
                gauge_bar(b, Vec2::new(-127.0, 0.0), thin, Color::from_rgba8(110, 197, 207, 255))
            })
            .group("ninki", "Ninki Gauge", |b| {
                gauge_bar(b, Vec2::new(-127.0, 14.0), wide, Color::from_rgba8(137, 82, 236, 255))
            })
        })
        .group("dragoon", "Dragoon", |g| {
            g.group("blood", "Blood Of The Dragon", |b| {
                gauge_bar(b, Vec2::new(-127.0, 0.0), thin, Color::from_rgba8(78, 198, 238, 255))
            })
            .group("eyes", "Eyes Of The Dragon", |b| {
                gauge_bar(b, Vec2::new(-127.0, 14.0), wide, Color::from_rgba8(1, 139, 255, 255))
            })
        })
        .build()
}

fn limit_break() -> ConfigNode {
    movable((sections::LIMIT_BREAK, "Limit Break", 80), Vec2::new(0.0, -300.0), Anchor::Center)
        .vec2("size", "Size", Vec2::new(500.0, 14.0), 1.0, MAX)
        .order(15)
        .float("chunk_spacing", "Chunk Spacing", 4.0, 0.0, 50.0)
        .color("fill_color", "Fill Color", Color::from_rgba8(0, 160, 230, 255))
        .color("full_color", "Full Chunk Color", Color::from_rgba8(255, 205, 50, 255))
        .color("background_color", "Background Color", Color::rgba(0.0, 0.0, 0.0, 0.5))
        .checkbox("show_text", "Show Level Text", true)
        .checkbox("hide_when_empty", "Hide When Empty", true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::node::{NodeKind, Value};

    #[test]
    fn test_every_movable_section_has_position_anchor_and_preview() {
        let tree = default_tree();
        for section in tree.sections().iter().filter(|s| s.key != sections::GENERAL) {
            for field in ["enabled", "preview", "position", "anchor"] {
                let path = format!("{}.{field}", section.key);
                assert!(tree.get_value(&path).is_ok(), "missing {path}");
            }
        }
    }

    #[test]
    fn test_preview_and_lock_are_not_portable() {
        let tree = default_tree();
        assert!(!tree.is_portable("general.locked"));
        assert!(!tree.is_portable("enemy_list.preview"));
        assert!(tree.is_portable("enemy_list.position"));
        assert!(tree.is_portable("player_unit_frame.statuses.blacklist.Doom"));
    }

    #[test]
    fn test_target_of_target_keeps_its_own_size() {
        let tree = default_tree();
        assert_eq!(
            tree.get_value("target_of_target_unit_frame.size"),
            Ok(&Value::Vec2(Vec2::new(120.0, 24.0)))
        );
        assert_eq!(
            tree.get_value("player_unit_frame.size"),
            Ok(&Value::Vec2(Vec2::new(250.0, 40.0)))
        );
    }

    #[test]
    fn test_sorting_combo_has_all_modes() {
        let tree = default_tree();
        let node = tree.find("party_list.sorting").unwrap();
        let NodeKind::Field { field: FieldKind::Combo { options }, .. } = &node.kind else {
            panic!("sorting should be a combo");
        };
        assert_eq!(options.len(), PARTY_SORTING_MODES.len());
    }

    #[test]
    fn test_sections_are_in_display_order() {
        let tree = default_tree();
        let keys: Vec<&str> = tree.ordered_sections().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys.first(), Some(&sections::GENERAL));
        assert_eq!(keys.last(), Some(&sections::LIMIT_BREAK));
    }
}
