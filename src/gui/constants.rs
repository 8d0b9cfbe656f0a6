//! GUI-specific constants for layout, status colors and intervals

use egui;

/// Host window dimensions
pub const WINDOW_WIDTH: f32 = 1600.0;
pub const WINDOW_HEIGHT: f32 = 900.0;
pub const WINDOW_MIN_WIDTH: f32 = 900.0;
pub const WINDOW_MIN_HEIGHT: f32 = 600.0;

/// Settings side panel
pub const SIDE_PANEL_WIDTH: f32 = 380.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

/// HUD canvas background
pub const CANVAS_FILL: egui::Color32 = egui::Color32::from_rgb(24, 28, 36);

/// HUD text height in points
pub const HUD_FONT_SIZE: f32 = 13.0;

/// Simulation step cap, keeps a stalled window from jumping the game state
pub const MAX_FRAME_DT: f32 = 0.1;

/// Repaint cadence of the preview
pub const FRAME_INTERVAL_MS: u64 = 16;
