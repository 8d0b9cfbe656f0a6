//! Config node tree
//!
//! The whole HUD configuration is one tree of [`ConfigNode`]s. Top-level nodes
//! are sections (one per HUD element or subsystem), groups nest, and leaves
//! carry a typed [`Value`] plus the [`FieldKind`] that constrains and edits it.
//! Every node is addressed by a `.`-separated path of keys from the root.
//!
//! Mutations never call back into user code. They are recorded as
//! [`ChangeEvent`]s and handed to the [`ChangeBus`](super::notify::ChangeBus)
//! after the mutation has completed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ConfigError;
use super::schema::FieldKind;
use crate::color::Color;
use crate::layout::Anchor;
use crate::types::Vec2;

pub const PATH_SEPARATOR: char = '.';

/// A typed leaf value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f32),
    Vec2(Vec2),
    Color(Color),
    Text(String),
    Anchor(Anchor),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Vec2(_) => "vec2",
            Value::Color(_) => "color",
            Value::Text(_) => "text",
            Value::Anchor(_) => "anchor",
        }
    }

    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Editing/serialization metadata attached to every node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMeta {
    /// Display order among siblings, ties keep insertion order
    pub order: i32,
    /// Editable in the settings editor
    pub enabled: bool,
    /// Shown in the settings editor
    pub visible: bool,
    /// Included in exported blobs
    pub portable: bool,
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self {
            order: 0,
            enabled: true,
            visible: true,
            portable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Field {
        field: FieldKind,
        value: Value,
        default: Value,
    },
    Group {
        children: Vec<ConfigNode>,
    },
    /// Free-form key → value mapping (e.g. a status effect blacklist)
    Map {
        entry_kind: FieldKind,
        entries: BTreeMap<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNode {
    pub key: String,
    pub label: String,
    pub meta: NodeMeta,
    pub kind: NodeKind,
}

impl ConfigNode {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn children(&self) -> &[ConfigNode] {
        match &self.kind {
            NodeKind::Group { children } => children,
            _ => &[],
        }
    }

    fn child(&self, key: &str) -> Option<&ConfigNode> {
        self.children().iter().find(|c| c.key == key)
    }

    fn child_mut(&mut self, key: &str) -> Option<&mut ConfigNode> {
        match &mut self.kind {
            NodeKind::Group { children } => children.iter_mut().find(|c| c.key == key),
            _ => None,
        }
    }

    /// Children sorted for display: by `order`, then insertion order
    pub fn ordered_children(&self) -> Vec<&ConfigNode> {
        let mut children: Vec<&ConfigNode> = self.children().iter().collect();
        // sort_by_key is stable, which gives the insertion-order tie break
        children.sort_by_key(|c| c.meta.order);
        children
    }
}

/// A recorded mutation. `None` on either side means the mapping entry did not
/// exist before / no longer exists after.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub path: String,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

impl ChangeEvent {
    /// Last path component, e.g. `preview` for `enemy_list.preview`
    pub fn field(&self) -> &str {
        self.path.rsplit(PATH_SEPARATOR).next().unwrap_or(&self.path)
    }
}

pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}{PATH_SEPARATOR}{key}")
    }
}

#[derive(Debug)]
pub struct ConfigTree {
    sections: Vec<ConfigNode>,
    pending: Vec<ChangeEvent>,
}

/// A copy starts without pending notifications; they belong to the original.
impl Clone for ConfigTree {
    fn clone(&self) -> Self {
        Self {
            sections: self.sections.clone(),
            pending: Vec::new(),
        }
    }
}

impl PartialEq for ConfigTree {
    fn eq(&self, other: &Self) -> bool {
        self.sections == other.sections
    }
}

impl ConfigTree {
    pub fn new(sections: Vec<ConfigNode>) -> Self {
        Self {
            sections,
            pending: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[ConfigNode] {
        &self.sections
    }

    pub fn section(&self, key: &str) -> Option<&ConfigNode> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Sections in display order
    pub fn ordered_sections(&self) -> Vec<&ConfigNode> {
        let mut sections: Vec<&ConfigNode> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.meta.order);
        sections
    }

    pub fn find(&self, path: &str) -> Option<&ConfigNode> {
        let mut keys = path.split(PATH_SEPARATOR);
        let first = keys.next()?;
        let mut node = self.section(first)?;
        for key in keys {
            node = node.child(key)?;
        }
        Some(node)
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut ConfigNode> {
        let mut keys = path.split(PATH_SEPARATOR);
        let first = keys.next()?;
        let mut node = self.sections.iter_mut().find(|s| s.key == first)?;
        for key in keys {
            node = node.child_mut(key)?;
        }
        Some(node)
    }

    /// Whether any node on the path (including the node itself) is non-portable
    pub fn is_portable(&self, path: &str) -> bool {
        let mut keys = path.split(PATH_SEPARATOR);
        let Some(first) = keys.next() else {
            return false;
        };
        let Some(mut node) = self.section(first) else {
            return false;
        };
        if !node.meta.portable {
            return false;
        }
        for key in keys {
            match node.child(key) {
                Some(child) if child.meta.portable => node = child,
                Some(_) => return false,
                // mapping entries inherit from their map node
                None => return matches!(node.kind, NodeKind::Map { .. }),
            }
        }
        true
    }

    fn split_entry_path(path: &str) -> Option<(&str, &str)> {
        path.rsplit_once(PATH_SEPARATOR)
    }

    pub fn get_value(&self, path: &str) -> Result<&Value, ConfigError> {
        if let Some(node) = self.find(path) {
            return match &node.kind {
                NodeKind::Field { value, .. } => Ok(value),
                _ => Err(ConfigError::InvalidPath(path.to_string())),
            };
        }

        // Fall back to a mapping entry: `<map path>.<entry key>`
        let (map_path, key) =
            Self::split_entry_path(path).ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
        match self.find(map_path).map(|n| &n.kind) {
            Some(NodeKind::Map { entries, .. }) => {
                entries.get(key).ok_or_else(|| ConfigError::InvalidPath(path.to_string()))
            }
            _ => Err(ConfigError::InvalidPath(path.to_string())),
        }
    }

    /// Set a leaf or an existing mapping entry. Returns the previous value.
    ///
    /// The value is clamped to the field's constraints. A change event is queued
    /// only when the stored value actually changes.
    pub fn set_value(&mut self, path: &str, value: Value) -> Result<Value, ConfigError> {
        let (old, new) = match self.find_mut(path) {
            Some(node) => match &mut node.kind {
                NodeKind::Field { field, value: slot, .. } => {
                    let new = checked(path, field, slot, value)?;
                    (std::mem::replace(slot, new.clone()), new)
                }
                _ => return Err(ConfigError::InvalidPath(path.to_string())),
            },
            None => {
                let (map_path, key) = Self::split_entry_path(path)
                    .ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
                let node = self
                    .find_mut(map_path)
                    .ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
                let NodeKind::Map { entry_kind, entries } = &mut node.kind else {
                    return Err(ConfigError::InvalidPath(path.to_string()));
                };
                let slot = entries
                    .get_mut(key)
                    .ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
                let new = checked(path, entry_kind, slot, value)?;
                (std::mem::replace(slot, new.clone()), new)
            }
        };

        if old != new {
            debug!(path = %path, ?old, ?new, "config value changed");
            self.pending.push(ChangeEvent {
                path: path.to_string(),
                old: Some(old.clone()),
                new: Some(new),
            });
        }
        Ok(old)
    }

    /// Insert or replace an entry in a mapping node
    pub fn insert_entry(&mut self, map_path: &str, key: &str, value: Value) -> Result<Option<Value>, ConfigError> {
        if key.is_empty() || key.contains(PATH_SEPARATOR) {
            return Err(ConfigError::InvalidPath(join_path(map_path, key)));
        }
        let node = self
            .find_mut(map_path)
            .ok_or_else(|| ConfigError::InvalidPath(map_path.to_string()))?;
        let NodeKind::Map { entry_kind, entries } = &mut node.kind else {
            return Err(ConfigError::InvalidPath(map_path.to_string()));
        };
        let path = join_path(map_path, key);
        let expected = entry_kind.default_value();
        if !expected.same_kind(&value) {
            return Err(ConfigError::TypeMismatch {
                path,
                expected: expected.kind_name(),
                actual: value.kind_name(),
            });
        }
        let (value, _) = entry_kind.clamp(value);
        let old = entries.insert(key.to_string(), value.clone());
        if old.as_ref() != Some(&value) {
            self.pending.push(ChangeEvent {
                path,
                old: old.clone(),
                new: Some(value),
            });
        }
        Ok(old)
    }

    pub fn remove_entry(&mut self, map_path: &str, key: &str) -> Result<Option<Value>, ConfigError> {
        let node = self
            .find_mut(map_path)
            .ok_or_else(|| ConfigError::InvalidPath(map_path.to_string()))?;
        let NodeKind::Map { entries, .. } = &mut node.kind else {
            return Err(ConfigError::InvalidPath(map_path.to_string()));
        };
        let old = entries.remove(key);
        if old.is_some() {
            self.pending.push(ChangeEvent {
                path: join_path(map_path, key),
                old: old.clone(),
                new: None,
            });
        }
        Ok(old)
    }

    pub fn entries(&self, map_path: &str) -> Result<&BTreeMap<String, Value>, ConfigError> {
        match self.find(map_path).map(|n| &n.kind) {
            Some(NodeKind::Map { entries, .. }) => Ok(entries),
            _ => Err(ConfigError::InvalidPath(map_path.to_string())),
        }
    }

    /// Every node with its path, depth-first in display order
    pub fn enumerate(&self) -> Vec<(String, &ConfigNode)> {
        fn walk<'a>(prefix: &str, node: &'a ConfigNode, out: &mut Vec<(String, &'a ConfigNode)>) {
            let path = join_path(prefix, &node.key);
            out.push((path.clone(), node));
            for child in node.ordered_children() {
                walk(&path, child, out);
            }
        }

        let mut out = Vec::new();
        for section in self.ordered_sections() {
            walk("", section, &mut out);
        }
        out
    }

    /// Paths of every leaf field, in display order
    pub fn field_paths(&self) -> Vec<String> {
        self.enumerate()
            .into_iter()
            .filter(|(_, node)| matches!(node.kind, NodeKind::Field { .. }))
            .map(|(path, _)| path)
            .collect()
    }

    /// Reset a leaf to its compiled-in default
    pub fn reset_to_default(&mut self, path: &str) -> Result<(), ConfigError> {
        let default = match self.find(path).map(|n| &n.kind) {
            Some(NodeKind::Field { default, .. }) => default.clone(),
            _ => return Err(ConfigError::InvalidPath(path.to_string())),
        };
        self.set_value(path, default).map(|_| ())
    }

    /// Take the values of `other` for every node both trees share, queueing a
    /// change event for each value that differs. Structure is never changed.
    pub fn adopt_values(&mut self, other: &ConfigTree) {
        for path in self.field_paths() {
            if let Ok(value) = other.get_value(&path)
                && self.get_value(&path).ok() != Some(value)
                && let Err(err) = self.set_value(&path, value.clone())
            {
                warn!(path = %path, error = %err, "could not adopt config value");
            }
        }

        let map_paths: Vec<String> = self
            .enumerate()
            .into_iter()
            .filter(|(_, node)| matches!(node.kind, NodeKind::Map { .. }))
            .map(|(path, _)| path)
            .collect();
        for map_path in map_paths {
            let (Ok(mine), Ok(theirs)) = (self.entries(&map_path), other.entries(&map_path)) else {
                continue;
            };
            let removed: Vec<String> = mine.keys().filter(|k| !theirs.contains_key(*k)).cloned().collect();
            let upserts: Vec<(String, Value)> = theirs
                .iter()
                .filter(|(k, v)| mine.get(*k) != Some(*v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            for key in removed {
                let _ = self.remove_entry(&map_path, &key);
            }
            for (key, value) in upserts {
                if let Err(err) = self.insert_entry(&map_path, &key, value) {
                    warn!(path = %map_path, key = %key, error = %err, "could not adopt mapping entry");
                }
            }
        }
    }

    /// Drain queued change events (oldest first)
    pub fn take_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    // ---- typed reads -------------------------------------------------------
    //
    // Widgets read through these every frame. A path that does not resolve is
    // a programming error: it is logged and the caller's default is used.

    fn read<T>(&self, path: &str, default: T, extract: impl FnOnce(&Value) -> Option<T>) -> T {
        match self.get_value(path) {
            Ok(value) => extract(value).unwrap_or_else(|| {
                warn!(path = %path, kind = value.kind_name(), "config value has unexpected kind, using default");
                default
            }),
            Err(err) => {
                warn!(error = %err, "config read failed, using default");
                default
            }
        }
    }

    pub fn bool_or(&self, path: &str, default: bool) -> bool {
        self.read(path, default, |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    pub fn int_or(&self, path: &str, default: i64) -> i64 {
        self.read(path, default, |v| match v {
            Value::Int(i) => Some(*i),
            _ => None,
        })
    }

    pub fn f32_or(&self, path: &str, default: f32) -> f32 {
        self.read(path, default, |v| match v {
            Value::Float(f) => Some(*f),
            _ => None,
        })
    }

    pub fn vec2_or(&self, path: &str, default: Vec2) -> Vec2 {
        self.read(path, default, |v| match v {
            Value::Vec2(v) => Some(*v),
            _ => None,
        })
    }

    pub fn color_or(&self, path: &str, default: Color) -> Color {
        self.read(path, default, |v| match v {
            Value::Color(c) => Some(*c),
            _ => None,
        })
    }

    pub fn anchor_or(&self, path: &str, default: Anchor) -> Anchor {
        self.read(path, default, |v| match v {
            Value::Anchor(a) => Some(*a),
            _ => None,
        })
    }

    pub fn text_or(&self, path: &str, default: &str) -> String {
        self.read(path, default.to_string(), |v| match v {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        })
    }
}

fn checked(path: &str, field: &FieldKind, current: &Value, value: Value) -> Result<Value, ConfigError> {
    if !current.same_kind(&value) {
        return Err(ConfigError::TypeMismatch {
            path: path.to_string(),
            expected: current.kind_name(),
            actual: value.kind_name(),
        });
    }
    let (value, clamped) = field.clamp(value);
    if clamped {
        warn!(path = %path, ?value, "config value out of range, clamping");
    }
    Ok(value)
}
