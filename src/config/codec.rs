//! Portable profile blobs
//!
//! A blob is one or more `|`-joined segments, one per top-level section:
//!
//! ```text
//! HUD1:<base64(deflate(json))>|HUD1:<...>
//! ```
//!
//! Each segment carries the portable leaves and mapping entries of a single
//! section keyed by their path inside it, so segments decode independently and
//! a section can be exported on its own. Decoding always overlays onto the
//! compiled-in defaults; anything the current build does not know is skipped.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::error::CodecError;
use super::node::{ConfigNode, ConfigTree, NodeKind, Value, join_path};
use crate::constants::codec::{SEGMENT_DELIMITER, TAG_PREFIX, TAG_TERMINATOR, VERSION};

/// Which nodes a payload covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only portable nodes, for exported blobs
    Portable,
    /// Everything, for the local section files
    Local,
}

impl Scope {
    fn includes(self, portable: bool) -> bool {
        portable || self == Scope::Local
    }
}

/// Decoded contents of one segment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionPayload {
    pub section: String,
    /// Leaf values keyed by path relative to the section
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    /// Mapping nodes keyed by path relative to the section
    #[serde(default)]
    pub maps: BTreeMap<String, BTreeMap<String, Value>>,
}

/// Encode every portable section of `tree`
pub fn serialize(tree: &ConfigTree) -> String {
    let segments: Vec<String> = tree
        .ordered_sections()
        .into_iter()
        .filter_map(|section| encode_section(tree, &section.key))
        .collect();
    join(&segments)
}

/// Decode `blob` on top of a copy of `defaults`
pub fn deserialize(blob: &str, defaults: &ConfigTree) -> Result<ConfigTree, CodecError> {
    let mut tree = defaults.clone();
    for segment in split(blob) {
        let payload = decode_section(&segment)?;
        apply_section(&mut tree, &payload);
    }
    // A freshly decoded tree has no listeners yet
    tree.take_changes();
    Ok(tree)
}

/// Encode a single section. None if the section is unknown or not portable.
pub fn encode_section(tree: &ConfigTree, section_key: &str) -> Option<String> {
    let section = tree.section(section_key)?;
    if !section.meta.portable {
        return None;
    }
    let payload = collect_payload(section, Scope::Portable);
    match encode_payload(VERSION, &payload) {
        Ok(segment) => Some(segment),
        Err(err) => {
            error!(section = %section_key, error = %err, "failed to encode config section");
            None
        }
    }
}

pub fn decode_section(segment: &str) -> Result<SectionPayload, CodecError> {
    let segment = segment.trim();
    let body = segment
        .strip_prefix(TAG_PREFIX)
        .ok_or_else(|| CodecError::Decode("missing version tag".to_string()))?;
    let (version, data) = body
        .split_once(TAG_TERMINATOR)
        .ok_or_else(|| CodecError::Decode("missing version tag".to_string()))?;
    let found: u32 = version
        .parse()
        .map_err(|_| CodecError::Decode(format!("invalid version '{version}'")))?;
    if found > VERSION {
        return Err(CodecError::VersionMismatch {
            found,
            supported: VERSION,
        });
    }

    let compressed = STANDARD
        .decode(data)
        .map_err(|e| CodecError::Decode(format!("invalid base64: {e}")))?;
    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| CodecError::Decode(format!("corrupt compressed data: {e}")))?;
    serde_json::from_slice(&json).map_err(|e| CodecError::Decode(format!("invalid payload: {e}")))
}

/// Overlay a decoded section onto `tree`. Unknown paths, non-portable nodes and
/// values of the wrong kind are skipped with a warning. Each applied difference
/// queues a change event.
pub fn apply_section(tree: &mut ConfigTree, payload: &SectionPayload) {
    apply_payload(tree, payload, Scope::Portable);
}

pub fn apply_payload(tree: &mut ConfigTree, payload: &SectionPayload, scope: Scope) {
    if tree.section(&payload.section).is_none() {
        warn!(section = %payload.section, "ignoring unknown config section");
        return;
    }

    for (relative, value) in &payload.values {
        let path = join_path(&payload.section, relative);
        if !scope.includes(tree.is_portable(&path)) {
            debug!(path = %path, "skipping non-portable value");
            continue;
        }
        if let Err(err) = tree.set_value(&path, value.clone()) {
            warn!(path = %path, error = %err, "ignoring imported value");
        }
    }

    for (relative, entries) in &payload.maps {
        let map_path = join_path(&payload.section, relative);
        if !scope.includes(tree.is_portable(&map_path)) {
            continue;
        }
        let existing: Vec<String> = match tree.entries(&map_path) {
            Ok(current) => current.keys().filter(|k| !entries.contains_key(*k)).cloned().collect(),
            Err(err) => {
                warn!(error = %err, "ignoring imported mapping");
                continue;
            }
        };
        for key in existing {
            let _ = tree.remove_entry(&map_path, &key);
        }
        for (key, value) in entries {
            if let Err(err) = tree.insert_entry(&map_path, key, value.clone()) {
                warn!(path = %map_path, key = %key, error = %err, "ignoring imported mapping entry");
            }
        }
    }
}

/// Join blobs into one composite, dropping empty ones
pub fn join<S: AsRef<str>>(blobs: &[S]) -> String {
    blobs
        .iter()
        .map(|b| b.as_ref().trim())
        .filter(|b| !b.is_empty())
        .collect::<Vec<_>>()
        .join(&SEGMENT_DELIMITER.to_string())
}

/// Split a composite into its segments, trimmed, without empty ones
pub fn split(composite: &str) -> Vec<String> {
    composite
        .split(SEGMENT_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Gather the values of one section
pub fn collect_payload(section: &ConfigNode, scope: Scope) -> SectionPayload {
    fn walk(prefix: &str, node: &ConfigNode, scope: Scope, payload: &mut SectionPayload) {
        for child in node.children() {
            if !scope.includes(child.meta.portable) {
                continue;
            }
            let path = join_path(prefix, &child.key);
            match &child.kind {
                NodeKind::Field { value, .. } => {
                    payload.values.insert(path, value.clone());
                }
                NodeKind::Map { entries, .. } => {
                    payload.maps.insert(path, entries.clone());
                }
                NodeKind::Group { .. } => walk(&path, child, scope, payload),
            }
        }
    }

    let mut payload = SectionPayload {
        section: section.key.clone(),
        ..SectionPayload::default()
    };
    walk("", section, scope, &mut payload);
    payload
}

fn encode_payload(version: u32, payload: &SectionPayload) -> std::io::Result<String> {
    let json = serde_json::to_vec(payload)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    Ok(format!(
        "{TAG_PREFIX}{version}{TAG_TERMINATOR}{}",
        STANDARD.encode(compressed)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::sections::default_tree;
    use crate::types::Vec2;

    fn edited() -> ConfigTree {
        let mut tree = default_tree();
        tree.set_value("enemy_list.position", Value::Vec2(Vec2::new(12.0, -40.0)))
            .unwrap();
        tree.set_value("party_list.sorting", Value::Int(4)).unwrap();
        tree.set_value("player_unit_frame.fill_color", Value::Color(Color::from_rgba8(1, 2, 3, 4)))
            .unwrap();
        tree.insert_entry("target_unit_frame.statuses.blacklist", "Weakness", Value::Bool(true))
            .unwrap();
        // not portable
        tree.set_value("general.locked", Value::Bool(false)).unwrap();
        tree.set_value("enemy_list.preview", Value::Bool(true)).unwrap();
        tree.take_changes();
        tree
    }

    #[test]
    fn test_roundtrip_keeps_portable_values_and_resets_others() {
        let defaults = default_tree();
        let tree = edited();

        let decoded = deserialize(&serialize(&tree), &defaults).unwrap();
        for path in defaults.field_paths() {
            let expected = if defaults.is_portable(&path) {
                tree.get_value(&path)
            } else {
                defaults.get_value(&path)
            };
            assert_eq!(decoded.get_value(&path), expected, "{path}");
        }
        assert_eq!(
            decoded.get_value("target_unit_frame.statuses.blacklist.Weakness"),
            Ok(&Value::Bool(true))
        );
        assert!(!decoded.has_pending_changes());
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let tree = edited();
        assert_eq!(serialize(&tree), serialize(&tree.clone()));
    }

    #[test]
    fn test_blob_is_clipboard_safe() {
        let blob = serialize(&edited());
        assert!(
            blob.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | ':' | '|'))
        );
        for segment in split(&blob) {
            assert!(segment.starts_with("HUD1:"));
        }
    }

    #[test]
    fn test_join_and_split_drop_empty_segments() {
        assert_eq!(split("a|b||c|"), vec!["a", "b", "c"]);
        assert_eq!(split(" a | b \n"), vec!["a", "b"]);
        assert!(split("").is_empty());
        assert!(split("|||").is_empty());
        assert_eq!(join(&["a", "", " b "]), "a|b");
    }

    #[test]
    fn test_trailing_delimiter_still_decodes() {
        let defaults = default_tree();
        let blob = format!("{}|", serialize(&edited()));
        assert!(deserialize(&blob, &defaults).is_ok());
    }

    #[test]
    fn test_decode_errors() {
        let defaults = default_tree();
        for bad in ["garbage", "HUD:abc", "HUDx:abc", "HUD1:!!!not base64!!!"] {
            assert!(
                matches!(deserialize(bad, &defaults), Err(CodecError::Decode(_))),
                "{bad}"
            );
        }

        // valid base64 that is not a deflate stream of a payload
        let junk = format!("HUD1:{}", STANDARD.encode(b"definitely not deflate"));
        assert!(matches!(deserialize(&junk, &defaults), Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_truncated_blob_fails() {
        let defaults = default_tree();
        let blob = encode_section(&edited(), "party_list").unwrap();
        let truncated = &blob[..blob.len() / 2];
        assert!(matches!(deserialize(truncated, &defaults), Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let payload = SectionPayload {
            section: "party_list".to_string(),
            ..SectionPayload::default()
        };
        let blob = encode_payload(VERSION + 1, &payload).unwrap();
        assert_eq!(
            deserialize(&blob, &default_tree()),
            Err(CodecError::VersionMismatch {
                found: VERSION + 1,
                supported: VERSION,
            })
        );
    }

    #[test]
    fn test_unknown_and_mismatched_data_is_ignored() {
        let defaults = default_tree();
        let mut values = BTreeMap::new();
        values.insert("row_spacing".to_string(), Value::Bool(true)); // wrong kind
        values.insert("no_such_field".to_string(), Value::Int(3));
        values.insert("sorting".to_string(), Value::Int(2));
        let known = SectionPayload {
            section: "party_list".to_string(),
            values,
            maps: BTreeMap::new(),
        };
        let unknown = SectionPayload {
            section: "removed_widget".to_string(),
            ..SectionPayload::default()
        };
        let blob = join(&[
            encode_payload(VERSION, &known).unwrap(),
            encode_payload(VERSION, &unknown).unwrap(),
        ]);

        let decoded = deserialize(&blob, &defaults).unwrap();
        assert_eq!(decoded.get_value("party_list.sorting"), Ok(&Value::Int(2)));
        assert_eq!(
            decoded.get_value("party_list.row_spacing"),
            defaults.get_value("party_list.row_spacing")
        );
    }

    #[test]
    fn test_single_section_export() {
        let tree = edited();
        let segment = encode_section(&tree, "enemy_list").unwrap();
        assert_eq!(split(&segment).len(), 1);

        let payload = decode_section(&segment).unwrap();
        assert_eq!(payload.section, "enemy_list");
        assert!(!payload.values.contains_key("preview"));

        let mut live = default_tree();
        apply_section(&mut live, &payload);
        assert_eq!(
            live.get_value("enemy_list.position"),
            Ok(&Value::Vec2(Vec2::new(12.0, -40.0)))
        );
        // applying to a live tree notifies listeners
        assert!(live.has_pending_changes());

        assert!(encode_section(&tree, "missing").is_none());
    }
}
