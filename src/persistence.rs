//! On-disk configuration
//!
//! Each top-level section lives in its own `<section>.json` file inside the
//! config directory, holding every value including local-only ones. The
//! profile store is kept next to them in `Profiles.json`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::codec::{self, Scope, SectionPayload};
use crate::config::{ConfigTree, ProfileStore};
use crate::constants::config::{APP_DIR, PROFILES_FILE, SECTION_EXT};

#[derive(Debug, Clone)]
pub struct ConfigDir {
    root: PathBuf,
}

impl ConfigDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<platform config dir>/hud-overlay`, or `./hud-overlay` if the platform
    /// has none
    pub fn platform_default() -> Self {
        let mut root = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        root.push(APP_DIR);
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn section_path(&self, section: &str) -> PathBuf {
        self.root.join(format!("{section}.{SECTION_EXT}"))
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.root.join(PROFILES_FILE)
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create config directory {:?}", self.root))
    }

    /// Load every section file over a copy of `defaults`. Missing files keep the
    /// defaults, unreadable JSON is logged and skipped.
    pub fn load_tree(&self, defaults: &ConfigTree) -> Result<ConfigTree> {
        let mut tree = defaults.clone();
        for section in defaults.sections() {
            let path = self.section_path(&section.key);
            if !path.exists() {
                continue;
            }
            let contents =
                fs::read_to_string(&path).with_context(|| format!("Failed to read section from {:?}", path))?;
            match serde_json::from_str::<SectionPayload>(&contents) {
                Ok(payload) if payload.section == section.key => {
                    codec::apply_payload(&mut tree, &payload, Scope::Local);
                }
                Ok(payload) => {
                    warn!(path = ?path, found = %payload.section, "section file belongs to another section, ignoring");
                }
                Err(err) => {
                    warn!(path = ?path, error = %err, "Failed to parse section file, using defaults");
                }
            }
        }
        tree.take_changes();
        info!(dir = ?self.root, "Loaded config sections");
        Ok(tree)
    }

    pub fn save_tree(&self, tree: &ConfigTree) -> Result<()> {
        self.ensure_root()?;
        for section in tree.sections() {
            let payload = codec::collect_payload(section, Scope::Local);
            let json = serde_json::to_string_pretty(&payload)
                .with_context(|| format!("Failed to serialize section {}", section.key))?;
            let path = self.section_path(&section.key);
            fs::write(&path, json).with_context(|| format!("Failed to write section to {:?}", path))?;
        }
        info!(dir = ?self.root, sections = tree.sections().len(), "Saved config sections");
        Ok(())
    }

    /// Load the profile store, creating the default profiles on first run.
    /// A damaged file is replaced by fresh defaults rather than failing start-up.
    pub fn load_profiles(&self, defaults: &ConfigTree) -> Result<ProfileStore> {
        let path = self.profiles_path();
        if !path.exists() {
            info!(path = ?path, "Profile store not found, creating default profiles");
            let mut store = ProfileStore::new();
            store.create_defaults_profile(defaults);
            self.save_profiles(&store)?;
            return Ok(store);
        }

        let contents =
            fs::read_to_string(&path).with_context(|| format!("Failed to read profiles from {:?}", path))?;
        let mut store = match serde_json::from_str::<ProfileStore>(&contents) {
            Ok(store) => store,
            Err(err) => {
                warn!(path = ?path, error = %err, "Failed to parse profile store, recreating defaults");
                ProfileStore::new()
            }
        };
        if store.repair(defaults) {
            self.save_profiles(&store)?;
        }
        info!(profiles = store.len(), current = %store.current(), "Loaded profile store");
        Ok(store)
    }

    pub fn save_profiles(&self, store: &ProfileStore) -> Result<()> {
        self.ensure_root()?;
        let path = self.profiles_path();
        let json = serde_json::to_string_pretty(store).context("Failed to serialize profile store")?;
        fs::write(&path, json).with_context(|| format!("Failed to write profiles to {:?}", path))?;
        info!(path = ?path, "Saved profile store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Value, default_tree};
    use crate::constants::profiles::{DEFAULT_PLAYER, DEFAULTS};
    use crate::types::Vec2;

    #[test]
    fn test_tree_roundtrip_keeps_local_values() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = ConfigDir::new(dir.path().join("nested"));
        let defaults = default_tree();

        let mut tree = defaults.clone();
        tree.set_value("general.locked", Value::Bool(false)).unwrap();
        tree.set_value("limit_break.size", Value::Vec2(Vec2::new(300.0, 9.0))).unwrap();
        tree.insert_entry("player_unit_frame.statuses.blacklist", "Bleed", Value::Bool(true))
            .unwrap();
        config_dir.save_tree(&tree).unwrap();

        assert!(config_dir.section_path("general").exists());
        let loaded = config_dir.load_tree(&defaults).unwrap();
        assert_eq!(loaded, tree);
        assert!(!loaded.has_pending_changes());
    }

    #[test]
    fn test_missing_and_corrupt_sections_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = ConfigDir::new(dir.path());
        let defaults = default_tree();

        fs::write(config_dir.section_path("party_list"), "{ not json").unwrap();
        fs::write(
            config_dir.section_path("enemy_list"),
            r#"{"section": "party_list", "values": {"sorting": {"int": 3}}}"#,
        )
        .unwrap();

        let loaded = config_dir.load_tree(&defaults).unwrap();
        assert_eq!(loaded, defaults);
    }

    #[test]
    fn test_first_run_creates_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = ConfigDir::new(dir.path());
        let defaults = default_tree();

        let store = config_dir.load_profiles(&defaults).unwrap();
        assert_eq!(store.current(), DEFAULT_PLAYER);
        assert!(store.contains(DEFAULTS));
        assert!(config_dir.profiles_path().exists());

        let reloaded = config_dir.load_profiles(&defaults).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_damaged_profile_store_is_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = ConfigDir::new(dir.path());
        fs::write(config_dir.profiles_path(), "][").unwrap();

        let store = config_dir.load_profiles(&default_tree()).unwrap();
        assert_eq!(store.current(), DEFAULT_PLAYER);
        assert_eq!(store.len(), 2);
    }
}
