//! Preview host: an eframe window that drives the HUD against the simulated
//! game, with the settings editor and profile panel docked at the side

pub mod components;
pub mod constants;
pub mod manager;
pub mod renderer;

pub use manager::run_gui;

use constants::{STATUS_ERROR, STATUS_OK};

/// One-line feedback shown under the profile panel
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub color: egui::Color32,
}

impl StatusMessage {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: STATUS_OK,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: STATUS_ERROR,
        }
    }
}
