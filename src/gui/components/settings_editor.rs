//! Generic settings editor
//!
//! Walks the config tree in display order and draws one control per
//! [`FieldKind`]. Controls never touch the tree directly: they produce
//! [`Edit`]s that are applied once the whole panel has been drawn, so the tree
//! can be read freely while it is being laid out.

use std::collections::HashMap;

use eframe::egui;
use tracing::{debug, warn};

use crate::color::Color;
use crate::config::node::join_path;
use crate::config::{ConfigError, ConfigNode, ConfigTree, FieldKind, NodeKind, Value};
use crate::context::HudContext;
use crate::gui::StatusMessage;
use crate::gui::constants::ITEM_SPACING;
use crate::layout::Anchor;
use crate::types::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Set { path: String, value: Value },
    Reset { path: String },
    Insert { map: String, key: String, value: Value },
    Remove { map: String, key: String },
}

/// Apply queued edits in order. Failures are logged and returned, the
/// remaining edits still apply.
pub fn apply_edits(tree: &mut ConfigTree, edits: Vec<Edit>) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    for edit in edits {
        let result = match &edit {
            Edit::Set { path, value } => tree.set_value(path, value.clone()).map(|_| ()),
            Edit::Reset { path } => tree.reset_to_default(path),
            Edit::Insert { map, key, value } => tree.insert_entry(map, key, value.clone()).map(|_| ()),
            Edit::Remove { map, key } => tree.remove_entry(map, key).map(|_| ()),
        };
        if let Err(err) = result {
            warn!(?edit, error = %err, "settings edit rejected");
            errors.push(err);
        }
    }
    errors
}

#[derive(Default)]
pub struct SettingsEditor {
    /// Pending key text of each mapping's "add" row, by mapping path
    new_keys: HashMap<String, String>,
    paste: String,
}

impl SettingsEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, hud: &mut HudContext) -> Option<StatusMessage> {
        let mut status = None;
        let mut edits = Vec::new();

        // snapshot so controls can be laid out while edits queue up
        let sections: Vec<ConfigNode> = hud
            .tree()
            .ordered_sections()
            .into_iter()
            .filter(|s| s.meta.visible)
            .cloned()
            .collect();

        for section in &sections {
            egui::CollapsingHeader::new(egui::RichText::new(&section.label).strong())
                .id_salt(&section.key)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let copy = ui
                            .add_enabled(section.meta.portable, egui::Button::new("📋 Copy section"))
                            .on_hover_text("Copy this section's settings to the clipboard");
                        if copy.clicked() {
                            status = Some(match hud.export_section(&section.key) {
                                Some(blob) => {
                                    ui.ctx().copy_text(blob);
                                    StatusMessage::ok(format!("Copied {} to the clipboard", section.label))
                                }
                                None => StatusMessage::error(format!("{} cannot be exported", section.label)),
                            });
                        }
                    });
                    ui.add_space(ITEM_SPACING / 2.0);
                    self.children_ui(ui, &section.key, section, &mut edits);
                });
        }

        ui.add_space(ITEM_SPACING);
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.paste)
                    .hint_text("Paste a copied section")
                    .desired_width(200.0),
            );
            if ui.button("Import section").clicked() {
                status = Some(match hud.import_section(&self.paste) {
                    Ok(section) => {
                        self.paste.clear();
                        StatusMessage::ok(format!("Imported {section}"))
                    }
                    Err(err) => StatusMessage::error(format!("Import failed: {err}")),
                });
            }
        });

        if !edits.is_empty() {
            debug!(count = edits.len(), "applying settings edits");
            let errors = apply_edits(hud.tree_mut(), edits);
            if let Some(err) = errors.first() {
                status = Some(StatusMessage::error(err.to_string()));
            }
        }
        status
    }

    fn children_ui(&mut self, ui: &mut egui::Ui, path: &str, node: &ConfigNode, edits: &mut Vec<Edit>) {
        for child in node.ordered_children() {
            if !child.meta.visible {
                continue;
            }
            let child_path = join_path(path, &child.key);
            ui.add_enabled_ui(child.meta.enabled, |ui| {
                self.node_ui(ui, &child_path, child, edits);
            });
        }
    }

    fn node_ui(&mut self, ui: &mut egui::Ui, path: &str, node: &ConfigNode, edits: &mut Vec<Edit>) {
        match &node.kind {
            NodeKind::Field { field, value, default } => {
                ui.horizontal(|ui| {
                    if let Some(value) = field_control(ui, path, &node.label, field, value) {
                        edits.push(Edit::Set {
                            path: path.to_string(),
                            value,
                        });
                    }
                    if value != default && ui.small_button("⟲").on_hover_text("Reset to default").clicked() {
                        edits.push(Edit::Reset { path: path.to_string() });
                    }
                });
            }
            NodeKind::Group { .. } => {
                egui::CollapsingHeader::new(node.label.as_str())
                    .id_salt(path)
                    .show(ui, |ui| self.children_ui(ui, path, node, edits));
            }
            NodeKind::Map { entry_kind, entries } => {
                egui::CollapsingHeader::new(node.label.as_str()).id_salt(path).show(ui, |ui| {
                    if entries.is_empty() {
                        ui.label(egui::RichText::new("(empty)").italics().weak());
                    }
                    for (key, value) in entries {
                        ui.horizontal(|ui| {
                            let entry_path = join_path(path, key);
                            if let Some(value) = field_control(ui, &entry_path, key, entry_kind, value) {
                                edits.push(Edit::Insert {
                                    map: path.to_string(),
                                    key: key.clone(),
                                    value,
                                });
                            }
                            if ui.small_button("🗑").on_hover_text("Remove entry").clicked() {
                                edits.push(Edit::Remove {
                                    map: path.to_string(),
                                    key: key.clone(),
                                });
                            }
                        });
                    }

                    ui.horizontal(|ui| {
                        let new_key = self.new_keys.entry(path.to_string()).or_default();
                        ui.add(egui::TextEdit::singleline(new_key).hint_text("Name").desired_width(140.0));
                        let key = new_key.trim().to_string();
                        if ui.add_enabled(!key.is_empty(), egui::Button::new("➕ Add")).clicked() {
                            edits.push(Edit::Insert {
                                map: path.to_string(),
                                key,
                                value: entry_kind.default_value(),
                            });
                            new_key.clear();
                        }
                    });
                });
            }
        }
    }
}

/// Draw the control for one value. Returns the new value when the user changed it.
fn field_control(ui: &mut egui::Ui, id: &str, label: &str, kind: &FieldKind, value: &Value) -> Option<Value> {
    match (kind, value) {
        (FieldKind::Checkbox, Value::Bool(b)) => {
            let mut b = *b;
            ui.checkbox(&mut b, label).changed().then_some(Value::Bool(b))
        }
        (FieldKind::DragInt { min, max }, Value::Int(i)) => {
            ui.label(label);
            let mut i = *i;
            ui.add(egui::DragValue::new(&mut i).range(*min..=*max))
                .changed()
                .then_some(Value::Int(i))
        }
        (FieldKind::DragFloat { min, max, speed }, Value::Float(f)) => {
            ui.label(label);
            let mut f = *f;
            ui.add(egui::DragValue::new(&mut f).range(*min..=*max).speed(*speed))
                .changed()
                .then_some(Value::Float(f))
        }
        (FieldKind::DragVec2 { min, max }, Value::Vec2(v)) => {
            ui.label(label);
            let mut v: Vec2 = *v;
            let x = ui.add(egui::DragValue::new(&mut v.x).range(*min..=*max).prefix("x: "));
            let y = ui.add(egui::DragValue::new(&mut v.y).range(*min..=*max).prefix("y: "));
            (x.changed() || y.changed()).then_some(Value::Vec2(v))
        }
        (FieldKind::ColorEdit, Value::Color(c)) => {
            ui.label(label);
            let mut rgba = c.to_rgba8();
            let changed = ui.color_edit_button_srgba_unmultiplied(&mut rgba).changed();
            ui.label(egui::RichText::new(c.to_hex_string()).monospace().weak());
            let [r, g, b, a] = rgba;
            changed.then(|| Value::Color(Color::from_rgba8(r, g, b, a)))
        }
        (FieldKind::Combo { options }, Value::Int(i)) => {
            ui.label(label);
            let mut selected = *i;
            let text = usize::try_from(*i)
                .ok()
                .and_then(|idx| options.get(idx))
                .map(String::as_str)
                .unwrap_or("?");
            egui::ComboBox::from_id_salt(id)
                .selected_text(text)
                .show_ui(ui, |ui| {
                    for (idx, option) in options.iter().enumerate() {
                        ui.selectable_value(&mut selected, idx as i64, option.as_str());
                    }
                });
            (selected != *i).then_some(Value::Int(selected))
        }
        (FieldKind::Text { max_len }, Value::Text(s)) => {
            ui.label(label);
            let mut s = s.clone();
            let changed = ui
                .add(egui::TextEdit::singleline(&mut s).char_limit(*max_len).desired_width(160.0))
                .changed();
            changed.then_some(Value::Text(s))
        }
        (FieldKind::AnchorPicker, Value::Anchor(anchor)) => {
            ui.label(label);
            let mut selected = *anchor;
            egui::ComboBox::from_id_salt(id)
                .selected_text(anchor.label())
                .show_ui(ui, |ui| {
                    for option in Anchor::ALL {
                        ui.selectable_value(&mut selected, option, option.label());
                    }
                });
            (selected != *anchor).then_some(Value::Anchor(selected))
        }
        _ => {
            warn!(path = %id, kind = value.kind_name(), "no control for this value");
            ui.label(egui::RichText::new(format!("{label}: {}", value.kind_name())).weak());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tree;

    #[test]
    fn test_edits_apply_in_order() {
        let mut tree = default_tree();
        let errors = apply_edits(
            &mut tree,
            vec![
                Edit::Set {
                    path: "limit_break.chunk_spacing".into(),
                    value: Value::Float(7.0),
                },
                Edit::Insert {
                    map: "target_unit_frame.statuses.blacklist".into(),
                    key: "Bleed".into(),
                    value: Value::Bool(true),
                },
                Edit::Reset {
                    path: "limit_break.chunk_spacing".into(),
                },
            ],
        );
        assert!(errors.is_empty());
        assert_eq!(tree.f32_or("limit_break.chunk_spacing", 0.0), 4.0);
        assert!(tree.entries("target_unit_frame.statuses.blacklist").unwrap().contains_key("Bleed"));
        // set, insert, reset
        assert_eq!(tree.take_changes().len(), 3);
    }

    #[test]
    fn test_rejected_edit_does_not_stop_the_rest() {
        let mut tree = default_tree();
        let errors = apply_edits(
            &mut tree,
            vec![
                Edit::Set {
                    path: "limit_break.chunk_spacing".into(),
                    value: Value::Bool(true),
                },
                Edit::Remove {
                    map: "limit_break.show_text".into(),
                    key: "x".into(),
                },
                Edit::Set {
                    path: "limit_break.show_text".into(),
                    value: Value::Bool(false),
                },
            ],
        );
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ConfigError::TypeMismatch { .. }));
        assert!(!tree.bool_or("limit_break.show_text", true));
    }
}
