//! Edit-mode pointer capture
//!
//! At most one element is captured at a time. A press on an element's
//! bottom/right edge resizes it (when its section has a `size`), a press
//! anywhere else inside one of its boxes moves it. Regions are given in draw
//! order, so the last one under the pointer is the topmost and wins.
//!
//! A resize keeps the element's top-left edge in place whatever its anchor:
//! after the new size is written the element is measured again and its
//! position is shifted back by however far the box moved.

use tracing::{debug, warn};

use super::element::{EditRegion, FrameInput};
use crate::config::{ConfigTree, Value};
use crate::constants::hud::{MIN_ELEMENT_SIZE, RESIZE_HANDLE};
use crate::snapping::find_snap_position;
use crate::types::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize { right: bool, bottom: bool },
}

#[derive(Debug, Clone)]
struct Capture {
    section: String,
    mode: DragMode,
    /// Pointer minus element position at the moment of the press
    grab_offset: Vec2,
    start_pointer: Vec2,
    start_size: Vec2,
    start_bounds: Rect,
}

#[derive(Debug, Default)]
pub struct DragController {
    capture: Option<Capture>,
}

fn hit_mode(region: &EditRegion, pointer: Vec2) -> Option<DragMode> {
    let bounds = region.bounds()?;
    if region.resizable {
        let grab = Rect::new(bounds.min, bounds.size + Vec2::splat(RESIZE_HANDLE / 2.0));
        if grab.contains(pointer) {
            let right = pointer.x >= bounds.right() - RESIZE_HANDLE;
            let bottom = pointer.y >= bounds.bottom() - RESIZE_HANDLE;
            if right || bottom {
                return Some(DragMode::Resize { right, bottom });
            }
        }
    }
    region
        .boxes
        .iter()
        .any(|b| b.contains(pointer))
        .then_some(DragMode::Move)
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section of the captured element
    pub fn captured(&self) -> Option<&str> {
        self.capture.as_ref().map(|c| c.section.as_str())
    }

    pub fn mode(&self) -> Option<DragMode> {
        self.capture.as_ref().map(|c| c.mode)
    }

    pub fn cancel(&mut self) {
        self.capture = None;
    }

    /// `measure` returns a section's current bounding box, read back after a
    /// resize changed its size.
    pub fn update(
        &mut self,
        input: &FrameInput,
        regions: &[EditRegion],
        tree: &mut ConfigTree,
        snap_threshold: f32,
        measure: impl Fn(&ConfigTree, &str) -> Option<Rect>,
    ) {
        if input.primary_released || !input.primary_down {
            if let Some(capture) = self.capture.take() {
                debug!(section = %capture.section, "drag finished");
            }
            if !input.primary_pressed {
                return;
            }
        }
        let Some(pointer) = input.pointer else {
            return;
        };

        if self.capture.is_none() {
            if input.primary_pressed {
                self.begin(pointer, regions, tree);
            }
            return;
        }

        if let Some(capture) = &self.capture {
            match capture.mode {
                DragMode::Move => {
                    let others: Vec<Rect> = regions
                        .iter()
                        .filter(|r| r.section != capture.section)
                        .filter_map(EditRegion::bounds)
                        .collect();
                    let mut delta = pointer - capture.start_pointer;
                    let moved = capture.start_bounds.translate(delta);
                    if let Some(snapped) = find_snap_position(moved, &others, snap_threshold) {
                        delta += snapped - moved.min;
                    }
                    // grab_offset is measured against the stored position
                    let position = capture.start_pointer - capture.grab_offset + delta;
                    write(tree, &capture.section, "position", position);
                }
                DragMode::Resize { right, bottom } => {
                    let delta = pointer - capture.start_pointer;
                    let grow = Vec2::new(if right { delta.x } else { 0.0 }, if bottom { delta.y } else { 0.0 });
                    let size = (capture.start_size + grow).max(Vec2::splat(MIN_ELEMENT_SIZE));
                    write(tree, &capture.section, "size", size);

                    if let Some(now) = measure(tree, &capture.section) {
                        let shift = capture.start_bounds.min - now.min;
                        if shift != Vec2::ZERO {
                            let path = format!("{}.position", capture.section);
                            let position = tree.vec2_or(&path, Vec2::ZERO) + shift;
                            write(tree, &capture.section, "position", position);
                        }
                    }
                }
            }
        }
    }

    fn begin(&mut self, pointer: Vec2, regions: &[EditRegion], tree: &ConfigTree) {
        let Some((region, mode)) = regions
            .iter()
            .rev()
            .find_map(|r| hit_mode(r, pointer).map(|mode| (r, mode)))
        else {
            return;
        };
        let Some(bounds) = region.bounds() else {
            return;
        };

        let position = tree.vec2_or(&format!("{}.position", region.section), Vec2::ZERO);
        let size = tree.vec2_or(&format!("{}.size", region.section), bounds.size);
        debug!(section = %region.section, ?mode, "drag started");
        self.capture = Some(Capture {
            section: region.section.clone(),
            mode,
            grab_offset: pointer - position,
            start_pointer: pointer,
            start_size: size,
            start_bounds: bounds,
        });
    }
}

fn write(tree: &mut ConfigTree, section: &str, field: &str, value: Vec2) {
    let path = format!("{section}.{field}");
    if let Err(err) = tree.set_value(&path, Value::Vec2(value)) {
        warn!(error = %err, "could not apply drag");
    }
}
