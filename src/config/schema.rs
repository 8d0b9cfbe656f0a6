//! Declarative schema for config sections
//!
//! Sections are described once with [`SectionBuilder`]: each field carries its
//! key, label, default and a [`FieldKind`] that both constrains the value and
//! tells the settings editor which control to draw.

use std::collections::BTreeMap;

use tracing::error;

use super::node::{ConfigNode, NodeKind, NodeMeta, Value};
use crate::color::Color;
use crate::layout::Anchor;
use crate::types::Vec2;

/// Gap between automatically assigned display orders, leaves room to slot
/// fields in between with an explicit `.order(n)`
const AUTO_ORDER_STEP: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Checkbox,
    DragInt { min: i64, max: i64 },
    DragFloat { min: f32, max: f32, speed: f32 },
    DragVec2 { min: f32, max: f32 },
    ColorEdit,
    /// Value is the selected index into `options`
    Combo { options: Vec<String> },
    Text { max_len: usize },
    AnchorPicker,
}

impl FieldKind {
    /// Value of the right kind used when nothing else is known
    pub fn default_value(&self) -> Value {
        match self {
            FieldKind::Checkbox => Value::Bool(false),
            FieldKind::DragInt { min, max } => Value::Int(0.clamp(*min, *max)),
            FieldKind::DragFloat { min, max, .. } => Value::Float(0.0_f32.clamp(*min, *max)),
            FieldKind::DragVec2 { min, max } => Value::Vec2(Vec2::splat(0.0_f32.clamp(*min, *max))),
            FieldKind::ColorEdit => Value::Color(Color::WHITE),
            FieldKind::Combo { .. } => Value::Int(0),
            FieldKind::Text { .. } => Value::Text(String::new()),
            FieldKind::AnchorPicker => Value::Anchor(Anchor::default()),
        }
    }

    /// Bring `value` inside this field's constraints. The flag is true when the
    /// value had to be changed.
    pub fn clamp(&self, value: Value) -> (Value, bool) {
        let clamped = match (self, &value) {
            (FieldKind::DragInt { min, max }, Value::Int(i)) => Value::Int((*i).clamp(*min, *max)),
            (FieldKind::Combo { options }, Value::Int(i)) => {
                let last = options.len().saturating_sub(1) as i64;
                Value::Int((*i).clamp(0, last))
            }
            (FieldKind::DragFloat { min, max, .. }, Value::Float(f)) => Value::Float(clamp_f32(*f, *min, *max)),
            (FieldKind::DragVec2 { min, max }, Value::Vec2(v)) => {
                Value::Vec2(Vec2::new(clamp_f32(v.x, *min, *max), clamp_f32(v.y, *min, *max)))
            }
            (FieldKind::ColorEdit, Value::Color(c)) => Value::Color(Color::rgba(
                c.r.clamp(0.0, 1.0),
                c.g.clamp(0.0, 1.0),
                c.b.clamp(0.0, 1.0),
                c.a.clamp(0.0, 1.0),
            )),
            (FieldKind::Text { max_len }, Value::Text(s)) if s.chars().count() > *max_len => {
                Value::Text(s.chars().take(*max_len).collect())
            }
            _ => value.clone(),
        };
        let changed = clamped != value;
        (clamped, changed)
    }
}

// NaN goes to the lower bound
fn clamp_f32(v: f32, min: f32, max: f32) -> f32 {
    if v.is_nan() { min } else { v.clamp(min, max) }
}

/// Builds a section or nested group.
///
/// Modifiers such as [`order`](Self::order) and [`non_portable`](Self::non_portable)
/// apply to the most recently added child, or to the group itself when no
/// child has been added yet.
#[derive(Debug)]
pub struct GroupBuilder {
    key: String,
    label: String,
    meta: NodeMeta,
    children: Vec<ConfigNode>,
}

pub type SectionBuilder = GroupBuilder;

impl GroupBuilder {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            meta: NodeMeta::default(),
            children: Vec::new(),
        }
    }

    fn push(mut self, key: &str, label: &str, kind: NodeKind) -> Self {
        if self.children.iter().any(|c| c.key == key) {
            error!(group = %self.key, key = %key, "duplicate config key, keeping the first definition");
            return self;
        }
        let order = self.children.len() as i32 * AUTO_ORDER_STEP;
        self.children.push(ConfigNode {
            key: key.to_string(),
            label: label.to_string(),
            meta: NodeMeta {
                order,
                ..NodeMeta::default()
            },
            kind,
        });
        self
    }

    fn field(self, key: &str, label: &str, field: FieldKind, default: Value) -> Self {
        let (default, _) = field.clamp(default);
        self.push(
            key,
            label,
            NodeKind::Field {
                field,
                value: default.clone(),
                default,
            },
        )
    }

    fn last_meta(&mut self) -> &mut NodeMeta {
        match self.children.last_mut() {
            Some(child) => &mut child.meta,
            None => &mut self.meta,
        }
    }

    pub fn checkbox(self, key: &str, label: &str, default: bool) -> Self {
        self.field(key, label, FieldKind::Checkbox, Value::Bool(default))
    }

    pub fn int(self, key: &str, label: &str, default: i64, min: i64, max: i64) -> Self {
        self.field(key, label, FieldKind::DragInt { min, max }, Value::Int(default))
    }

    pub fn float(self, key: &str, label: &str, default: f32, min: f32, max: f32) -> Self {
        let speed = ((max - min) / 200.0).max(0.001);
        self.field(key, label, FieldKind::DragFloat { min, max, speed }, Value::Float(default))
    }

    pub fn vec2(self, key: &str, label: &str, default: Vec2, min: f32, max: f32) -> Self {
        self.field(key, label, FieldKind::DragVec2 { min, max }, Value::Vec2(default))
    }

    pub fn color(self, key: &str, label: &str, default: Color) -> Self {
        self.field(key, label, FieldKind::ColorEdit, Value::Color(default))
    }

    pub fn combo(self, key: &str, label: &str, options: &[&str], default: usize) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        self.field(key, label, FieldKind::Combo { options }, Value::Int(default as i64))
    }

    pub fn text(self, key: &str, label: &str, default: &str, max_len: usize) -> Self {
        self.field(key, label, FieldKind::Text { max_len }, Value::Text(default.to_string()))
    }

    pub fn anchor(self, key: &str, label: &str, default: Anchor) -> Self {
        self.field(key, label, FieldKind::AnchorPicker, Value::Anchor(default))
    }

    pub fn group(self, key: &str, label: &str, build: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        let group = build(GroupBuilder::new(key, label));
        self.push(key, label, NodeKind::Group { children: group.children })
    }

    /// A free-form mapping whose entries all use `entry_kind`
    pub fn map(self, key: &str, label: &str, entry_kind: FieldKind) -> Self {
        self.push(
            key,
            label,
            NodeKind::Map {
                entry_kind,
                entries: BTreeMap::new(),
            },
        )
    }

    pub fn order(mut self, order: i32) -> Self {
        self.last_meta().order = order;
        self
    }

    /// Keep out of exported blobs
    pub fn non_portable(mut self) -> Self {
        self.last_meta().portable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.last_meta().visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.last_meta().enabled = false;
        self
    }

    pub fn build(self) -> ConfigNode {
        ConfigNode {
            key: self.key,
            label: self.label,
            meta: self.meta,
            kind: NodeKind::Group { children: self.children },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_keys_keep_first() {
        let section = SectionBuilder::new("s", "S")
            .checkbox("a", "A", true)
            .int("a", "A again", 5, 0, 10)
            .build();
        assert_eq!(section.children().len(), 1);
        assert!(matches!(
            section.children()[0].kind,
            NodeKind::Field { value: Value::Bool(true), .. }
        ));
    }

    #[test]
    fn test_modifiers_apply_to_last_child_or_group() {
        let section = SectionBuilder::new("s", "S")
            .order(7)
            .non_portable()
            .checkbox("a", "A", true)
            .checkbox("b", "B", false)
            .hidden()
            .order(-1)
            .build();
        assert_eq!(section.meta.order, 7);
        assert!(!section.meta.portable);

        let [a, b] = section.children() else {
            panic!("expected two children");
        };
        assert!(a.meta.visible && a.meta.portable);
        assert!(!b.meta.visible);
        assert_eq!(b.meta.order, -1);
        assert_eq!(section.ordered_children()[0].key, "b");
    }

    #[test]
    fn test_defaults_are_clamped_at_build_time() {
        let section = SectionBuilder::new("s", "S").float("f", "F", 5.0, 0.0, 1.0).build();
        let NodeKind::Field { value, default, .. } = &section.children()[0].kind else {
            panic!("expected field");
        };
        assert_eq!(value, &Value::Float(1.0));
        assert_eq!(default, &Value::Float(1.0));
    }

    #[test]
    fn test_clamp_rules() {
        let combo = FieldKind::Combo {
            options: vec!["a".into(), "b".into()],
        };
        assert_eq!(combo.clamp(Value::Int(5)), (Value::Int(1), true));
        assert_eq!(combo.clamp(Value::Int(0)), (Value::Int(0), false));

        let text = FieldKind::Text { max_len: 3 };
        assert_eq!(text.clamp(Value::Text("abcdef".into())), (Value::Text("abc".into()), true));

        let float = FieldKind::DragFloat {
            min: 0.0,
            max: 1.0,
            speed: 0.01,
        };
        assert_eq!(float.clamp(Value::Float(f32::NAN)), (Value::Float(0.0), true));

        // a value of another kind is passed through unchanged
        assert_eq!(FieldKind::Checkbox.clamp(Value::Int(3)), (Value::Int(3), false));
    }

    #[test]
    fn test_group_builder_nests() {
        let section = SectionBuilder::new("s", "S")
            .group("g", "G", |g| g.anchor("anchor", "Anchor", Anchor::Center))
            .build();
        let group = &section.children()[0];
        assert!(group.is_group());
        assert_eq!(group.children()[0].key, "anchor");
    }
}
