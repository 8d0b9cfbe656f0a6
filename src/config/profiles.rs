//! Named profile store
//!
//! Every profile is an opaque blob produced by the codec. "Defaults" always
//! holds the compiled-in configuration and can only be exported. Exactly one
//! other profile is current at a time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::codec;
use super::error::ProfileError;
use super::node::ConfigTree;
use crate::constants::profiles::{DEFAULT_PLAYER, DEFAULTS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(default)]
    profiles: BTreeMap<String, String>,
    #[serde(default = "default_current")]
    current: String,
}

fn default_current() -> String {
    DEFAULTS.to_string()
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            current: default_current(),
        }
    }
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_default(name: &str) -> bool {
        name == DEFAULTS
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn blob(&self, name: &str) -> Option<&str> {
        self.profiles.get(name).map(String::as_str)
    }

    fn user_profile_count(&self) -> usize {
        self.profiles.keys().filter(|n| !Self::is_default(n)).count()
    }

    /// Whether `delete(name)` would be allowed
    pub fn can_delete(&self, name: &str) -> bool {
        !Self::is_default(name) && self.contains(name) && self.user_profile_count() > 1
    }

    /// Seed "Defaults" and "My profile" from `tree` and make the latter current
    pub fn create_defaults_profile(&mut self, tree: &ConfigTree) {
        let blob = codec::serialize(tree);
        self.profiles.insert(DEFAULTS.to_string(), blob.clone());
        self.profiles.insert(DEFAULT_PLAYER.to_string(), blob);
        self.current = DEFAULT_PLAYER.to_string();
        info!(profile = DEFAULT_PLAYER, "created default profiles");
    }

    /// Store the live tree in the current profile
    pub fn save_current(&mut self, tree: &ConfigTree) {
        if Self::is_default(&self.current) {
            warn!("current profile is the export-only defaults, not saving");
            return;
        }
        self.profiles.insert(self.current.clone(), codec::serialize(tree));
    }

    /// Make `name` current and return its blob. Decoding is up to the caller.
    pub fn activate(&mut self, name: &str) -> Result<&str, ProfileError> {
        if Self::is_default(name) {
            return Err(ProfileError::ProtectedProfile(name.to_string()));
        }
        let Some(blob) = self.profiles.get(name) else {
            return Err(ProfileError::UnknownProfile(name.to_string()));
        };
        self.current = name.to_string();
        info!(profile = %name, "activated profile");
        Ok(blob.as_str())
    }

    fn check_new_name(&self, name: &str) -> Result<String, ProfileError> {
        let name = name.trim();
        if name.is_empty() || self.profiles.contains_key(name) {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Add a profile holding `source_blob` and make it current
    pub fn create_from(&mut self, name: &str, source_blob: &str) -> Result<(), ProfileError> {
        let name = self.check_new_name(name)?;
        self.profiles.insert(name.clone(), source_blob.to_string());
        info!(profile = %name, "created profile");
        self.current = name;
        Ok(())
    }

    /// Add a profile from pasted text. The current profile does not change.
    pub fn import_blob(&mut self, name: &str, external: &str) -> Result<(), ProfileError> {
        let name = self.check_new_name(name)?;
        info!(profile = %name, "imported profile");
        self.profiles.insert(name, external.trim().to_string());
        Ok(())
    }

    /// Remove a profile. If it was current, the first remaining user profile
    /// (by name) becomes current and is returned so the caller can load it.
    pub fn delete(&mut self, name: &str) -> Result<Option<String>, ProfileError> {
        if Self::is_default(name) {
            return Err(ProfileError::ProtectedProfile(name.to_string()));
        }
        if !self.profiles.contains_key(name) {
            return Err(ProfileError::UnknownProfile(name.to_string()));
        }
        if self.user_profile_count() <= 1 {
            return Err(ProfileError::LastProfile(name.to_string()));
        }

        self.profiles.remove(name);
        info!(profile = %name, "deleted profile");

        if self.current != name {
            return Ok(None);
        }
        let next = self
            .profiles
            .keys()
            .find(|n| !Self::is_default(n))
            .cloned()
            .ok_or_else(|| ProfileError::LastProfile(name.to_string()))?;
        self.current = next.clone();
        Ok(Some(next))
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), ProfileError> {
        if Self::is_default(old) {
            return Err(ProfileError::ProtectedProfile(old.to_string()));
        }
        if !self.profiles.contains_key(old) {
            return Err(ProfileError::UnknownProfile(old.to_string()));
        }
        let new = self.check_new_name(new)?;
        if let Some(blob) = self.profiles.remove(old) {
            self.profiles.insert(new.clone(), blob);
        }
        if self.current == old {
            self.current = new.clone();
        }
        info!(from = %old, to = %new, "renamed profile");
        Ok(())
    }

    /// Blob to hand to the clipboard. The current profile is exported from the
    /// live tree so unsaved edits are included.
    pub fn export(&self, name: &str, live_tree: &ConfigTree) -> Result<String, ProfileError> {
        let blob = self
            .profiles
            .get(name)
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_string()))?;
        if name == self.current {
            Ok(codec::serialize(live_tree))
        } else {
            Ok(blob.clone())
        }
    }

    /// Restore the store's invariants after loading from disk. Returns true if
    /// anything had to change.
    pub fn repair(&mut self, defaults: &ConfigTree) -> bool {
        let mut repaired = false;

        if !self.profiles.contains_key(DEFAULTS) {
            warn!("profile store has no defaults profile, regenerating");
            self.profiles.insert(DEFAULTS.to_string(), codec::serialize(defaults));
            repaired = true;
        }
        if self.user_profile_count() == 0 {
            warn!(profile = DEFAULT_PLAYER, "profile store has no user profile, creating one");
            let blob = codec::serialize(defaults);
            self.profiles.insert(DEFAULT_PLAYER.to_string(), blob);
            repaired = true;
        }
        if (Self::is_default(&self.current) || !self.profiles.contains_key(&self.current))
            && let Some(first) = self.profiles.keys().find(|n| !Self::is_default(n))
        {
            warn!(current = %self.current, replacement = %first, "current profile is invalid, switching");
            self.current = first.clone();
            repaired = true;
        }
        repaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::CodecError;
    use crate::config::node::Value;
    use crate::config::sections::default_tree;
    use crate::types::Vec2;

    fn seeded() -> (ProfileStore, ConfigTree) {
        let tree = default_tree();
        let mut store = ProfileStore::new();
        store.create_defaults_profile(&tree);
        (store, tree)
    }

    #[test]
    fn test_create_defaults_profile_scenario() {
        let (store, mut tree) = seeded();
        let blob = codec::serialize(&tree);

        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec![DEFAULTS, DEFAULT_PLAYER]);
        assert_eq!(store.blob(DEFAULTS), Some(blob.as_str()));
        assert_eq!(store.blob(DEFAULT_PLAYER), Some(blob.as_str()));
        assert_eq!(store.current(), DEFAULT_PLAYER);

        // Exporting the defaults ignores later live edits
        tree.set_value("enemy_list.position", Value::Vec2(Vec2::new(1.0, 1.0)))
            .unwrap();
        assert_eq!(store.export(DEFAULTS, &tree), Ok(blob));
    }

    #[test]
    fn test_export_current_uses_live_tree() {
        let (store, mut tree) = seeded();
        tree.set_value("party_list.sorting", Value::Int(3)).unwrap();
        let exported = store.export(DEFAULT_PLAYER, &tree).unwrap();
        assert_eq!(exported, codec::serialize(&tree));
        assert_ne!(Some(exported.as_str()), store.blob(DEFAULT_PLAYER));
    }

    #[test]
    fn test_save_current_is_idempotent() {
        let (mut store, mut tree) = seeded();
        tree.set_value("party_list.sorting", Value::Int(5)).unwrap();
        store.save_current(&tree);
        let once = store.clone();
        store.save_current(&tree);
        assert_eq!(store, once);
        assert_ne!(store.blob(DEFAULT_PLAYER), store.blob(DEFAULTS));
    }

    #[test]
    fn test_activate_rules() {
        let (mut store, _) = seeded();
        assert_eq!(
            store.activate("nope"),
            Err(ProfileError::UnknownProfile("nope".to_string()))
        );
        assert_eq!(
            store.activate(DEFAULTS),
            Err(ProfileError::ProtectedProfile(DEFAULTS.to_string()))
        );
        assert_eq!(store.current(), DEFAULT_PLAYER);
    }

    #[test]
    fn test_activate_future_version_still_switches_current() {
        let (mut store, tree) = seeded();
        store.import_blob("B", "HUD99:AAAA").unwrap();
        assert_eq!(store.current(), DEFAULT_PLAYER);

        let blob = store.activate("B").unwrap().to_string();
        assert_eq!(store.current(), "B");
        assert_eq!(
            codec::deserialize(&blob, &tree),
            Err(CodecError::VersionMismatch {
                found: 99,
                supported: crate::constants::codec::VERSION,
            })
        );
    }

    #[test]
    fn test_duplicate_name_leaves_store_unchanged() {
        let (mut store, _) = seeded();
        let before = store.clone();
        assert_eq!(
            store.create_from(DEFAULT_PLAYER, "x"),
            Err(ProfileError::DuplicateName(DEFAULT_PLAYER.to_string()))
        );
        assert_eq!(store.import_blob("  ", "x"), Err(ProfileError::DuplicateName(String::new())));
        assert_eq!(store.create_from(DEFAULTS, "x"), Err(ProfileError::DuplicateName(DEFAULTS.to_string())));
        assert_eq!(store, before);
    }

    #[test]
    fn test_create_from_activates_and_import_trims() {
        let (mut store, _) = seeded();
        store.create_from("Raid", "HUD1:abc").unwrap();
        assert_eq!(store.current(), "Raid");

        store.import_blob("Pasted", "  HUD1:xyz\n").unwrap();
        assert_eq!(store.blob("Pasted"), Some("HUD1:xyz"));
        assert_eq!(store.current(), "Raid");
    }

    #[test]
    fn test_delete_rules() {
        let (mut store, _) = seeded();
        assert_eq!(
            store.delete(DEFAULTS),
            Err(ProfileError::ProtectedProfile(DEFAULTS.to_string()))
        );
        // only one user profile left
        assert_eq!(
            store.delete(DEFAULT_PLAYER),
            Err(ProfileError::LastProfile(DEFAULT_PLAYER.to_string()))
        );
        assert_eq!(store.delete("ghost"), Err(ProfileError::UnknownProfile("ghost".to_string())));

        store.create_from("B", "HUD1:b").unwrap();
        assert!(store.can_delete("B"));
        // deleting a non-current profile keeps current
        store.activate(DEFAULT_PLAYER).unwrap();
        assert_eq!(store.delete("B"), Ok(None));
        assert_eq!(store.current(), DEFAULT_PLAYER);
        assert!(!store.can_delete(DEFAULT_PLAYER));
    }

    #[test]
    fn test_deleting_current_moves_to_first_user_profile() {
        let (mut store, _) = seeded();
        store.create_from("Alpha", "HUD1:a").unwrap();
        store.create_from("Zed", "HUD1:z").unwrap();
        assert_eq!(store.current(), "Zed");

        assert_eq!(store.delete("Zed"), Ok(Some("Alpha".to_string())));
        assert_eq!(store.current(), "Alpha");
        assert!(store.contains(DEFAULTS));
    }

    #[test]
    fn test_rename() {
        let (mut store, _) = seeded();
        store.rename(DEFAULT_PLAYER, "Main").unwrap();
        assert_eq!(store.current(), "Main");
        assert!(!store.contains(DEFAULT_PLAYER));
        assert_eq!(
            store.rename(DEFAULTS, "x"),
            Err(ProfileError::ProtectedProfile(DEFAULTS.to_string()))
        );
        assert_eq!(store.rename("Main", DEFAULTS), Err(ProfileError::DuplicateName(DEFAULTS.to_string())));
    }

    #[test]
    fn test_repair_after_load() {
        let tree = default_tree();
        let mut store: ProfileStore = serde_json::from_str(r#"{"profiles": {"Solo": "HUD1:x"}, "current": "Gone"}"#).unwrap();
        assert!(store.repair(&tree));
        assert!(store.contains(DEFAULTS));
        assert_eq!(store.current(), "Solo");
        assert!(!store.repair(&tree));

        let mut empty = ProfileStore::new();
        assert!(empty.repair(&tree));
        assert_eq!(empty.current(), DEFAULT_PLAYER);
        assert_eq!(empty.len(), 2);
    }
}
