//! Preview host implemented with egui/eframe
//!
//! The central panel is the HUD canvas, painted every frame from the simulated
//! game. The left panel carries edit-mode controls, the profile panel and the
//! settings editor.

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{error, info};

use super::StatusMessage;
use super::components::profile_selector::ProfileAction;
use super::components::{ProfileSelector, SettingsEditor};
use super::constants::*;
use super::renderer::EguiRenderer;
use crate::context::HudContext;
use crate::hud::FrameInput;
use crate::persistence::ConfigDir;
use crate::simulation::SimulatedGame;
use crate::types::Vec2;

/// HUD input for a canvas covering `canvas`. Presses outside the canvas are
/// dropped so clicks in the side panel never start a drag.
fn frame_input(pointer: Option<egui::Pos2>, pressed: bool, down: bool, released: bool, canvas: egui::Rect) -> FrameInput {
    let pointer = pointer
        .filter(|p| canvas.contains(*p))
        .map(|p| Vec2::new(p.x - canvas.min.x, p.y - canvas.min.y));
    FrameInput {
        pointer,
        primary_pressed: pressed && pointer.is_some(),
        primary_down: down,
        primary_released: released,
        screen_size: Vec2::new(canvas.width(), canvas.height()),
    }
}

struct HudApp {
    hud: HudContext,
    game: SimulatedGame,
    config_dir: ConfigDir,
    editor: SettingsEditor,
    profiles: ProfileSelector,
    status_message: Option<StatusMessage>,
    last_frame: Instant,
}

impl HudApp {
    fn new(_cc: &CreationContext<'_>, hud: HudContext, game: SimulatedGame, config_dir: ConfigDir) -> Self {
        info!(dir = ?config_dir.root(), "Initializing HUD preview host");
        Self {
            hud,
            game,
            config_dir,
            editor: SettingsEditor::new(),
            profiles: ProfileSelector::new(),
            status_message: None,
            last_frame: Instant::now(),
        }
    }

    fn save_profiles(&mut self) {
        if let Err(err) = self.config_dir.save_profiles(self.hud.profiles()) {
            error!(error = ?err, "Failed to save profile store");
            self.status_message = Some(StatusMessage::error(format!("Failed to save profiles: {err}")));
        }
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("HUD Overlay");
        ui.add_space(SECTION_SPACING);

        ui.group(|ui| {
            ui.label(egui::RichText::new("Layout").strong());
            let mut editing = self.hud.is_editing();
            if ui
                .checkbox(&mut editing, "Edit mode")
                .on_hover_text("Drag elements to move them, drag the bottom/right edge to resize")
                .changed()
            {
                self.hud.set_edit_mode(editing);
            }
            if ui.button("⏹ Stop all previews").clicked() {
                self.hud.stop_all_previews();
            }
        });

        ui.add_space(SECTION_SPACING);

        if self.profiles.ui(ui, &mut self.hud, &mut self.status_message) == ProfileAction::StoreChanged {
            self.save_profiles();
        }
        if let Some(message) = &self.status_message {
            ui.colored_label(message.color, &message.text);
        }

        ui.add_space(SECTION_SPACING);
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            if let Some(message) = self.editor.ui(ui, &mut self.hud) {
                self.status_message = Some(message);
            }
        });
    }
}

impl eframe::App for HudApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = self.last_frame.elapsed().as_secs_f32().min(MAX_FRAME_DT);
        self.last_frame = Instant::now();
        self.game.tick(dt);

        egui::SidePanel::left("settings")
            .default_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| self.side_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(CANVAS_FILL))
            .show(ctx, |ui| {
                let canvas = ui.max_rect();
                let input = ctx.input(|i| {
                    frame_input(
                        i.pointer.hover_pos(),
                        i.pointer.primary_pressed(),
                        i.pointer.primary_down(),
                        i.pointer.primary_released(),
                        canvas,
                    )
                });
                let mut renderer = EguiRenderer::new(ui.painter().clone(), canvas, HUD_FONT_SIZE);
                self.hud.frame(&mut self.game, &mut renderer, &input);
            });

        ctx.request_repaint_after(Duration::from_millis(FRAME_INTERVAL_MS));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.hud.save();
        self.hud.shutdown(&mut self.game);
        if let Err(err) = self.config_dir.save_tree(self.hud.tree()) {
            error!(error = ?err, "Failed to save config sections during shutdown");
        }
        if let Err(err) = self.config_dir.save_profiles(self.hud.profiles()) {
            error!(error = ?err, "Failed to save profile store during shutdown");
        }
        info!("Host exiting");
    }
}

pub fn run_gui(hud: HudContext, game: SimulatedGame, config_dir: ConfigDir) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("HUD Overlay Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "HUD Overlay Preview",
        options,
        Box::new(move |cc| Ok(Box::new(HudApp::new(cc, hud, game, config_dir)))),
    )
    .map_err(|err| anyhow!("Failed to launch preview host: {err}"))
}
