//! Per-job resource bars
//!
//! Each job with a gauge has a config group holding one group per bar. The
//! widget remembers the last job that had a gauge so the layout stays stable
//! (and editable) while playing a job without one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::preview_enabled;
use crate::color::Color;
use crate::config::{ChangeEvent, ConfigTree, Value};
use crate::constants::sections::JOB_GAUGE;
use crate::game::{Job, JobGauge};
use crate::hud::bar::{draw_bar, text_centered};
use crate::hud::element::{Frame, HudElement};
use crate::layout::{self, Anchor};
use crate::types::{Rect, Vec2};

const OVERHEAT_DURATION: f32 = 10.0;
const HUTON_DURATION: f32 = 60.0;
const BLOOD_DURATION: f32 = 30.0;
const MAX_EYES: u8 = 2;

/// Current state of one bar
#[derive(Debug, Clone, PartialEq)]
struct BarReading {
    key: &'static str,
    ratio: f32,
    text: String,
    active: bool,
}

fn reading(key: &'static str, ratio: f32, text: String, active: bool) -> BarReading {
    BarReading { key, ratio, text, active }
}

/// Config group of a job's gauge, None for jobs without one
fn gauge_group(job: Job) -> Option<&'static str> {
    match job {
        Job::Machinist => Some("machinist"),
        Job::Ninja => Some("ninja"),
        Job::Dragoon => Some("dragoon"),
        _ => None,
    }
}

fn bar_keys(job: Job) -> &'static [&'static str] {
    match job {
        Job::Machinist => &["overheat", "heat", "battery"],
        Job::Ninja => &["huton", "ninki"],
        Job::Dragoon => &["blood", "eyes"],
        _ => &[],
    }
}

fn readings(gauge: &JobGauge) -> Vec<BarReading> {
    match *gauge {
        JobGauge::Machinist {
            heat,
            battery,
            overheat_remaining,
        } => vec![
            reading(
                "overheat",
                overheat_remaining / OVERHEAT_DURATION,
                format!("{:.0}", overheat_remaining.ceil()),
                overheat_remaining > 0.0,
            ),
            reading("heat", heat as f32 / 100.0, heat.to_string(), heat > 0),
            reading("battery", battery as f32 / 100.0, battery.to_string(), battery > 0),
        ],
        JobGauge::Ninja { ninki, huton_remaining } => vec![
            reading(
                "huton",
                huton_remaining / HUTON_DURATION,
                format!("{:.0}", huton_remaining.ceil()),
                huton_remaining > 0.0,
            ),
            reading("ninki", ninki as f32 / 100.0, ninki.to_string(), ninki > 0),
        ],
        JobGauge::Dragoon { blood_remaining, eyes } => vec![
            reading(
                "blood",
                blood_remaining / BLOOD_DURATION,
                format!("{:.0}", blood_remaining.ceil()),
                blood_remaining > 0.0,
            ),
            reading(
                "eyes",
                eyes as f32 / MAX_EYES as f32,
                format!("{eyes} / {MAX_EYES}"),
                eyes > 0,
            ),
        ],
    }
}

fn generate_preview(rng: &mut StdRng, job: Job) -> Option<JobGauge> {
    let gauge = match job {
        Job::Machinist => JobGauge::Machinist {
            heat: rng.gen_range(0..=100),
            battery: rng.gen_range(0..=100),
            overheat_remaining: rng.gen_range(0.0..OVERHEAT_DURATION),
        },
        Job::Ninja => JobGauge::Ninja {
            ninki: rng.gen_range(0..=100),
            huton_remaining: rng.gen_range(0.0..HUTON_DURATION),
        },
        Job::Dragoon => JobGauge::Dragoon {
            blood_remaining: rng.gen_range(0.0..BLOOD_DURATION),
            eyes: rng.gen_range(0..=MAX_EYES),
        },
        _ => return None,
    };
    Some(gauge)
}

pub struct JobGaugeWidget {
    rng: StdRng,
    last_job: Job,
    preview: Option<JobGauge>,
}

impl JobGaugeWidget {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            last_job: Job::Machinist,
            preview: None,
        }
    }

    /// Screen boxes of the enabled bars of `job`, relative to the HUD origin.
    /// The section anchor applies to the bounding box of all of them.
    fn bar_layout(&self, tree: &ConfigTree, job: Job) -> Vec<(&'static str, Rect)> {
        let Some(group) = gauge_group(job) else {
            return Vec::new();
        };
        let local: Vec<(&'static str, Rect)> = bar_keys(job)
            .iter()
            .filter(|key| tree.bool_or(&format!("{JOB_GAUGE}.{group}.{key}.enabled"), true))
            .map(|key| {
                let base = format!("{JOB_GAUGE}.{group}.{key}");
                let pos = tree.vec2_or(&format!("{base}.position"), Vec2::ZERO);
                let size = tree.vec2_or(&format!("{base}.size"), Vec2::new(254.0, 20.0));
                (*key, Rect::new(pos, size))
            })
            .collect();
        let Some(bounds) = Rect::bounding(local.iter().map(|(_, r)| *r)) else {
            return Vec::new();
        };

        let position = tree.vec2_or(&format!("{JOB_GAUGE}.position"), Vec2::ZERO);
        let anchor = tree.anchor_or(&format!("{JOB_GAUGE}.anchor"), Anchor::Top);
        let shift = layout::resolve(position, bounds.size, anchor) - bounds.min;
        local.into_iter().map(|(key, r)| (key, r.translate(shift))).collect()
    }

    fn current_gauge(&mut self, frame: &Frame<'_>) -> Option<JobGauge> {
        if preview_enabled(frame.tree, JOB_GAUGE) {
            let stale = self.preview.as_ref().is_none_or(|g| g.job() != self.last_job);
            if stale {
                self.preview = generate_preview(&mut self.rng, self.last_job);
            }
            return self.preview.clone();
        }

        let job = frame.game.local_player()?.job;
        if gauge_group(job).is_some() && job != self.last_job {
            debug!(job = job.abbreviation(), "job gauge switched job");
            self.last_job = job;
        }
        frame.game.job_gauge(job)
    }
}

impl HudElement for JobGaugeWidget {
    fn section(&self) -> &str {
        JOB_GAUGE
    }

    fn display_name(&self) -> &str {
        "Job Gauge"
    }

    fn children_positions_and_sizes(&self, tree: &ConfigTree) -> (Vec<Vec2>, Vec<Vec2>) {
        self.bar_layout(tree, self.last_job)
            .into_iter()
            .map(|(_, r)| (r.min, r.size))
            .unzip()
    }

    fn draw_children(&mut self, origin: Vec2, frame: &mut Frame<'_>) {
        let Some(gauge) = self.current_gauge(frame) else {
            return;
        };
        let tree = frame.tree;
        let job = gauge.job();
        let Some(group) = gauge_group(job) else {
            return;
        };
        let layout = self.bar_layout(tree, job);

        for bar in readings(&gauge) {
            let Some((_, rect)) = layout.iter().find(|(key, _)| *key == bar.key) else {
                continue;
            };
            let base = format!("{JOB_GAUGE}.{group}.{}", bar.key);
            if !bar.active && tree.bool_or(&format!("{base}.hide_when_inactive"), false) {
                continue;
            }
            let rect = rect.translate(origin);
            let fill = tree.color_or(&format!("{base}.fill_color"), Color::WHITE);
            let background = tree.color_or(&format!("{base}.background_color"), Color::TRANSPARENT);
            draw_bar(frame.renderer, rect, bar.ratio, fill, background);
            if bar.active && tree.bool_or(&format!("{base}.show_value"), true) {
                text_centered(frame.renderer, rect, &bar.text, Color::WHITE, Color::BLACK);
            }
        }
    }

    fn on_config_changed(&mut self, event: &ChangeEvent, _tree: &ConfigTree) {
        if event.field() == "preview" && event.new == Some(Value::Bool(true)) {
            self.preview = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tree;
    use crate::hud::element::FrameInput;
    use crate::hud::widgets::test_support::draw_once;
    use crate::simulation::SimulatedGame;
    use crate::types::EntityId;

    #[test]
    fn test_machinist_bars_show_active_values() {
        let tree = default_tree();
        let mut game = SimulatedGame::demo(1);
        let mut gauge = JobGaugeWidget::new(1);
        let out = draw_once(&mut gauge, &tree, &mut game, FrameInput::default(), true);
        // overheat is inactive so only heat and battery carry text
        assert_eq!(out.texts(), vec!["45", "70"]);
        assert_eq!(out.filled().len(), 3);
    }

    #[test]
    fn test_layout_anchors_the_bounding_box() {
        let tree = default_tree();
        let gauge = JobGaugeWidget::new(1);
        let (positions, sizes) = gauge.children_positions_and_sizes(&tree);
        assert_eq!(positions.len(), 3);
        // bars are authored centered around x = 0 with a Top anchor
        assert_eq!(positions[0], Vec2::new(-127.0, 240.0));
        assert_eq!(positions[2], Vec2::new(-127.0, 278.0));
        assert_eq!(sizes[1], Vec2::new(254.0, 20.0));
    }

    #[test]
    fn test_hidden_when_inactive() {
        let mut tree = default_tree();
        tree.set_value("job_gauge.machinist.overheat.hide_when_inactive", Value::Bool(true))
            .unwrap();
        let mut game = SimulatedGame::demo(1);
        let mut gauge = JobGaugeWidget::new(1);
        let out = draw_once(&mut gauge, &tree, &mut game, FrameInput::default(), true);
        assert_eq!(out.filled().len(), 2);
    }

    #[test]
    fn test_disabled_bar_leaves_layout() {
        let mut tree = default_tree();
        tree.set_value("job_gauge.machinist.heat.enabled", Value::Bool(false)).unwrap();
        let gauge = JobGaugeWidget::new(1);
        assert_eq!(gauge.children_positions_and_sizes(&tree).0.len(), 2);
    }

    #[test]
    fn test_remembers_last_job_with_a_gauge() {
        let tree = default_tree();
        let mut game = SimulatedGame::demo(1);
        if let Some(player) = game.entities.get_mut(&EntityId(1)) {
            player.job = Job::Dragoon;
        }
        let mut gauge = JobGaugeWidget::new(1);
        let out = draw_once(&mut gauge, &tree, &mut game, FrameInput::default(), true);
        assert_eq!(gauge.last_job, Job::Dragoon);
        assert!(out.texts().contains(&"22"));
        assert!(out.texts().contains(&"1 / 2"));

        if let Some(player) = game.entities.get_mut(&EntityId(1)) {
            player.job = Job::Warrior;
        }
        let out = draw_once(&mut gauge, &tree, &mut game, FrameInput::default(), true);
        assert!(out.commands.is_empty());
        assert_eq!(gauge.last_job, Job::Dragoon);
        assert_eq!(gauge.children_positions_and_sizes(&tree).0.len(), 2);
    }

    #[test]
    fn test_preview_uses_last_job() {
        let mut tree = default_tree();
        tree.set_value("job_gauge.preview", Value::Bool(true)).unwrap();
        let mut game = SimulatedGame::default();
        let mut gauge = JobGaugeWidget::new(4);
        let out = draw_once(&mut gauge, &tree, &mut game, FrameInput::default(), true);
        assert_eq!(out.filled().len(), 3);
        assert_eq!(gauge.preview.as_ref().map(JobGauge::job), Some(Job::Machinist));
    }
}
