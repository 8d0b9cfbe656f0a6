//! Application context
//!
//! Owns everything the HUD needs between frames: the compiled-in defaults, the
//! live config tree, the profile store, the change bus, mouse-over focus, the
//! edit-mode drag state and the elements in draw order. Created once at start
//! and torn down with [`HudContext::shutdown`].

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::codec;
use crate::config::{ChangeBus, CodecError, ConfigTree, ProfileError, ProfileStore, Value};
use crate::constants::profiles::DEFAULTS;
use crate::constants::sections::GENERAL;
use crate::game::GameStateProvider;
use crate::hud::{DragController, DraggableHud, EditRegion, FocusArbiter, Frame, FrameInput, HudElement};
use crate::render::Renderer;

/// Errors surfaced to the profile panel
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HudError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Outcome of a profile operation that made another profile current.
///
/// The switch itself has happened even when `fallback` is set: the profile
/// is current and the store has changed, only its data could not be read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileLoad {
    /// Why the profile's data was unreadable; the defaults were loaded instead
    pub fallback: Option<CodecError>,
}

pub struct HudContext {
    defaults: ConfigTree,
    tree: ConfigTree,
    profiles: ProfileStore,
    bus: ChangeBus,
    focus: FocusArbiter,
    drag: DragController,
    elements: Vec<DraggableHud>,
}

impl HudContext {
    /// `tree` is the live configuration (usually loaded from disk), `defaults`
    /// the compiled-in one used as the base for every profile load.
    pub fn new(
        defaults: ConfigTree,
        tree: ConfigTree,
        profiles: ProfileStore,
        elements: Vec<Box<dyn HudElement>>,
    ) -> Self {
        let mut bus = ChangeBus::new();
        let elements = elements
            .into_iter()
            .map(|element| {
                let mut hud = DraggableHud::new(element);
                hud.attach(&mut bus);
                hud
            })
            .collect::<Vec<_>>();
        info!(elements = elements.len(), profile = %profiles.current(), "HUD context created");

        Self {
            defaults,
            tree,
            profiles,
            bus,
            focus: FocusArbiter::new(),
            drag: DragController::new(),
            elements,
        }
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Mutable access for editors. Changes are delivered to the elements at
    /// the start of the next frame.
    pub fn tree_mut(&mut self) -> &mut ConfigTree {
        &mut self.tree
    }

    pub fn defaults(&self) -> &ConfigTree {
        &self.defaults
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn elements(&self) -> &[DraggableHud] {
        &self.elements
    }

    pub fn is_editing(&self) -> bool {
        !self.tree.bool_or(&format!("{GENERAL}.locked"), true)
    }

    pub fn set_edit_mode(&mut self, editing: bool) {
        if let Err(err) = self.tree.set_value(&format!("{GENERAL}.locked"), Value::Bool(!editing)) {
            warn!(error = %err, "could not toggle edit mode");
        }
    }

    /// Run one frame: deliver config changes, handle edit-mode dragging, draw
    /// every enabled element and settle mouse-over focus.
    pub fn frame(&mut self, game: &mut dyn GameStateProvider, renderer: &mut dyn Renderer, input: &FrameInput) {
        let delivered = self.bus.dispatch(&mut self.tree);
        if delivered > 0 {
            for hud in &mut self.elements {
                hud.pump_events(&mut self.bus, &self.tree);
            }
        }

        let origin = input.screen_size / 2.0;
        let editing = self.is_editing();
        if editing {
            let regions: Vec<EditRegion> = self
                .elements
                .iter()
                .filter(|hud| hud.enabled(&self.tree))
                .map(|hud| hud.edit_region(&self.tree, origin))
                .collect();
            let threshold = self.tree.f32_or(&format!("{GENERAL}.snap_threshold"), 0.0);
            let elements = &self.elements;
            self.drag.update(input, &regions, &mut self.tree, threshold, |tree, section| {
                elements
                    .iter()
                    .find(|hud| hud.section() == section)
                    .and_then(|hud| hud.edit_region(tree, origin).bounds())
            });
        } else {
            self.drag.cancel();
        }

        {
            let captured = self.drag.captured();
            let mut frame = Frame {
                tree: &self.tree,
                game: &mut *game,
                renderer,
                focus: &mut self.focus,
                input,
                interactive: !editing,
            };
            for hud in &mut self.elements {
                let active = captured == Some(hud.section());
                hud.draw(origin, &mut frame, editing, active);
            }
        }
        self.focus.end_frame(game);
    }

    /// Decode `blob` over the defaults and make it the live configuration.
    /// Local-only values (lock state, previews) survive the switch. On a
    /// decode error the defaults are loaded instead and the error reported.
    fn load_blob(&mut self, blob: &str) -> ProfileLoad {
        let (mut loaded, fallback) = match codec::deserialize(blob, &self.defaults) {
            Ok(loaded) => (loaded, None),
            Err(err) => {
                warn!(profile = %self.profiles.current(), error = %err, "profile data is unreadable, loading defaults");
                (self.defaults.clone(), Some(err))
            }
        };
        for path in self.tree.field_paths() {
            if !self.tree.is_portable(&path)
                && let Ok(value) = self.tree.get_value(&path)
            {
                let _ = loaded.set_value(&path, value.clone());
            }
        }
        loaded.take_changes();
        self.tree.adopt_values(&loaded);
        ProfileLoad { fallback }
    }

    pub fn activate_profile(&mut self, name: &str) -> Result<ProfileLoad, HudError> {
        let blob = self.profiles.activate(name)?.to_string();
        Ok(self.load_blob(&blob))
    }

    /// Store the live tree in the current profile
    pub fn save(&mut self) {
        self.profiles.save_current(&self.tree);
        debug!(profile = %self.profiles.current(), "saved profile");
    }

    pub fn export(&self, name: &str) -> Result<String, HudError> {
        Ok(self.profiles.export(name, &self.tree)?)
    }

    /// Portable blob of one section of the live tree
    pub fn export_section(&self, section: &str) -> Option<String> {
        codec::encode_section(&self.tree, section)
    }

    /// Overlay one pasted section onto the live tree. Returns the section key.
    pub fn import_section(&mut self, segment: &str) -> Result<String, HudError> {
        let payload = codec::decode_section(segment)?;
        codec::apply_section(&mut self.tree, &payload);
        info!(section = %payload.section, "imported config section");
        Ok(payload.section)
    }

    /// Add a profile from pasted text. Text that does not decode is rejected
    /// before anything is stored.
    pub fn import(&mut self, name: &str, blob: &str) -> Result<(), HudError> {
        codec::deserialize(blob, &self.defaults)?;
        self.profiles.import_blob(name, blob)?;
        Ok(())
    }

    /// New profile with the compiled-in configuration, made current
    pub fn create_profile(&mut self, name: &str) -> Result<ProfileLoad, HudError> {
        let blob = self
            .profiles
            .blob(DEFAULTS)
            .map(str::to_string)
            .unwrap_or_else(|| codec::serialize(&self.defaults));
        self.profiles.create_from(name, &blob)?;
        Ok(self.load_blob(&blob))
    }

    /// New profile holding the live tree, made current
    pub fn duplicate_profile(&mut self, name: &str) -> Result<(), HudError> {
        let blob = codec::serialize(&self.tree);
        self.profiles.create_from(name, &blob)?;
        Ok(())
    }

    /// Delete a profile. Deleting the current one loads the profile the store
    /// moved to.
    pub fn delete_profile(&mut self, name: &str) -> Result<ProfileLoad, HudError> {
        let Some(next) = self.profiles.delete(name)? else {
            return Ok(ProfileLoad::default());
        };
        let blob = self.profiles.blob(&next).map(str::to_string).unwrap_or_default();
        Ok(self.load_blob(&blob))
    }

    pub fn rename_profile(&mut self, old: &str, new: &str) -> Result<(), HudError> {
        Ok(self.profiles.rename(old, new)?)
    }

    pub fn stop_all_previews(&mut self) {
        for hud in &mut self.elements {
            hud.element_mut().stop_preview(&mut self.tree);
        }
    }

    /// Release every subscription and any mouse-over still pushed to the game.
    /// Safe to call more than once.
    pub fn shutdown(&mut self, game: &mut dyn GameStateProvider) {
        self.drag.cancel();
        for hud in &mut self.elements {
            hud.element_mut().release_focus(&mut self.focus);
            hud.dispose(&mut self.bus);
        }
        self.focus.release();
        self.focus.end_frame(game);
        info!("HUD context shut down");
    }
}
