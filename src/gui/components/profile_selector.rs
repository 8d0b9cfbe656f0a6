use eframe::egui;
use tracing::{info, warn};

use crate::config::ProfileStore;
use crate::constants::profiles::DEFAULTS;
use crate::context::{HudContext, HudError, ProfileLoad};
use crate::gui::StatusMessage;
use crate::gui::constants::*;

/// What the host has to do after the panel ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    None,
    /// The profile store changed and should be written to disk
    StoreChanged,
}

#[derive(Default)]
pub struct ProfileSelector {
    edit_profile_name: String,
    import_text: String,
    show_new_dialog: bool,
    show_duplicate_dialog: bool,
    show_rename_dialog: bool,
    show_import_dialog: bool,
    show_delete_confirm: bool,
}

/// A store change is reported even when the newly current profile could not
/// be read, so the store still gets written.
fn outcome(result: Result<ProfileLoad, HudError>, success: String) -> (ProfileAction, StatusMessage) {
    match result {
        Ok(ProfileLoad { fallback: None }) => (ProfileAction::StoreChanged, StatusMessage::ok(success)),
        Ok(ProfileLoad { fallback: Some(err) }) => (
            ProfileAction::StoreChanged,
            StatusMessage::error(format!("{success}, but its settings are unreadable ({err}); defaults loaded")),
        ),
        Err(err) => {
            warn!(error = %err, "profile operation failed");
            (ProfileAction::None, StatusMessage::error(err.to_string()))
        }
    }
}

impl ProfileSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, hud: &mut HudContext, status: &mut Option<StatusMessage>) -> ProfileAction {
        let mut action = ProfileAction::None;
        let current = hud.profiles().current().to_string();

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Profile:").strong());

                let mut selected = current.clone();
                egui::ComboBox::from_id_salt("profile_selector")
                    .selected_text(current.as_str())
                    .show_ui(ui, |ui| {
                        for name in hud.profiles().names().filter(|n| !ProfileStore::is_default(n)) {
                            ui.selectable_value(&mut selected, name.to_string(), name);
                        }
                    });

                if selected != current {
                    let (a, message) = outcome(
                        hud.activate_profile(&selected),
                        format!("Switched to {selected}"),
                    );
                    action = a;
                    *status = Some(message);
                }
            });

            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                if ui.button("💾 Save").clicked() {
                    hud.save();
                    action = ProfileAction::StoreChanged;
                    *status = Some(StatusMessage::ok(format!("Saved {current}")));
                }

                if ui.button("➕ New").clicked() {
                    self.show_new_dialog = true;
                    self.edit_profile_name.clear();
                }

                if ui.button("📋 Duplicate").clicked() {
                    self.show_duplicate_dialog = true;
                    self.edit_profile_name = format!("{current} (copy)");
                }

                if ui.button("✏ Rename").clicked() {
                    self.show_rename_dialog = true;
                    self.edit_profile_name = current.clone();
                }

                let can_delete = hud.profiles().can_delete(&current);
                if ui.add_enabled(can_delete, egui::Button::new("🗑 Delete")).clicked() {
                    self.show_delete_confirm = true;
                }
            });

            ui.horizontal(|ui| {
                if ui.button("📤 Export").clicked() {
                    *status = Some(match hud.export(&current) {
                        Ok(blob) => {
                            ui.ctx().copy_text(blob);
                            info!(profile = %current, "exported profile to clipboard");
                            StatusMessage::ok(format!("Copied {current} to the clipboard"))
                        }
                        Err(err) => StatusMessage::error(err.to_string()),
                    });
                }

                if ui.button("📥 Import").clicked() {
                    self.show_import_dialog = true;
                    self.edit_profile_name.clear();
                    self.import_text.clear();
                }

                if ui
                    .button("📤 Export defaults")
                    .on_hover_text("Copy the built-in configuration")
                    .clicked()
                {
                    *status = Some(match hud.export(DEFAULTS) {
                        Ok(blob) => {
                            ui.ctx().copy_text(blob);
                            StatusMessage::ok("Copied the defaults to the clipboard")
                        }
                        Err(err) => StatusMessage::error(err.to_string()),
                    });
                }
            });

            if !hud.profiles().can_delete(&current) {
                ui.label(egui::RichText::new("(Cannot delete the last profile)").small().weak());
            }
        });

        // Modal dialogs
        let ctx = ui.ctx().clone();
        let mut result = None;
        if self.show_new_dialog {
            result = self.name_dialog(&ctx, hud, "New Profile", "Create", |hud, name| hud.create_profile(name));
        }
        if self.show_duplicate_dialog {
            result = self.name_dialog(&ctx, hud, "Duplicate Profile", "Duplicate", |hud, name| {
                hud.duplicate_profile(name).map(|()| ProfileLoad::default())
            });
        }
        if self.show_rename_dialog {
            let old = current.clone();
            result = self.name_dialog(&ctx, hud, "Rename Profile", "Rename", move |hud, name| {
                hud.rename_profile(&old, name).map(|()| ProfileLoad::default())
            });
        }
        if self.show_import_dialog {
            result = self.import_dialog(&ctx, hud);
        }
        if self.show_delete_confirm {
            result = self.delete_confirm_dialog(&ctx, hud, &current);
        }

        if let Some((a, message)) = result {
            if a != ProfileAction::None {
                action = a;
            }
            *status = Some(message);
        }
        action
    }

    /// Dialog asking for one profile name. Stays open when `apply` fails so
    /// the name can be corrected.
    fn name_dialog(
        &mut self,
        ctx: &egui::Context,
        hud: &mut HudContext,
        title: &str,
        confirm: &str,
        apply: impl FnOnce(&mut HudContext, &str) -> Result<ProfileLoad, HudError>,
    ) -> Option<(ProfileAction, StatusMessage)> {
        let mut open = true;
        let mut apply = Some(apply);
        let mut close = false;
        let mut result = None;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Profile Name:");
                ui.text_edit_singleline(&mut self.edit_profile_name);
                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    let name = self.edit_profile_name.trim().to_string();
                    if ui.add_enabled(!name.is_empty(), egui::Button::new(confirm)).clicked()
                        && let Some(apply) = apply.take()
                    {
                        let (a, message) = outcome(apply(hud, &name), format!("{title}: {name}"));
                        close = a == ProfileAction::StoreChanged;
                        result = Some((a, message));
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });

        if close || !open {
            self.show_new_dialog = false;
            self.show_duplicate_dialog = false;
            self.show_rename_dialog = false;
        }
        result
    }

    fn import_dialog(&mut self, ctx: &egui::Context, hud: &mut HudContext) -> Option<(ProfileAction, StatusMessage)> {
        let mut open = true;
        let mut close = false;
        let mut result = None;

        egui::Window::new("Import Profile")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Profile Name:");
                ui.text_edit_singleline(&mut self.edit_profile_name);
                ui.label("Exported text:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.import_text)
                        .desired_rows(4)
                        .hint_text("Paste here"),
                );
                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    let name = self.edit_profile_name.trim().to_string();
                    let ready = !name.is_empty() && !self.import_text.trim().is_empty();
                    if ui.add_enabled(ready, egui::Button::new("Import")).clicked() {
                        let (a, message) = outcome(
                            hud.import(&name, &self.import_text).map(|()| ProfileLoad::default()),
                            format!("Imported {name}"),
                        );
                        close = a == ProfileAction::StoreChanged;
                        result = Some((a, message));
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });

        if close || !open {
            self.show_import_dialog = false;
        }
        result
    }

    fn delete_confirm_dialog(
        &mut self,
        ctx: &egui::Context,
        hud: &mut HudContext,
        current: &str,
    ) -> Option<(ProfileAction, StatusMessage)> {
        let mut result = None;

        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Delete profile '{current}'?"));
                ui.label("This cannot be undone.");
                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        result = Some(outcome(hud.delete_profile(current), format!("Deleted {current}")));
                        self.show_delete_confirm = false;
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_delete_confirm = false;
                    }
                });
            });
        result
    }
}
