//! HUD element contract and the draggable wrapper around it

use tracing::{debug, trace};

use super::focus::FocusArbiter;
use crate::color::Color;
use crate::config::{ChangeBus, ChangeEvent, ConfigTree, SubscriptionId, Value};
use crate::constants::edit_mode;
use crate::game::GameStateProvider;
use crate::render::Renderer;
use crate::types::{Rect, Vec2};

/// Pointer state for one frame, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub pointer: Option<Vec2>,
    /// Primary button went down this frame
    pub primary_pressed: bool,
    pub primary_down: bool,
    /// Primary button went up this frame
    pub primary_released: bool,
    pub screen_size: Vec2,
}

impl FrameInput {
    pub fn hovering(&self, rect: Rect) -> bool {
        self.pointer.is_some_and(|p| rect.contains(p))
    }
}

/// Everything a widget needs while drawing
pub struct Frame<'a> {
    pub tree: &'a ConfigTree,
    pub game: &'a mut dyn GameStateProvider,
    pub renderer: &'a mut dyn Renderer,
    pub focus: &'a mut FocusArbiter,
    pub input: &'a FrameInput,
    /// False while the HUD is being edited; widgets then ignore hover and clicks
    pub interactive: bool,
}

/// A widget drawn relative to the HUD origin and laid out from its config
/// section
pub trait HudElement {
    /// Config section key, also the element's identity
    fn section(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Boxes the element occupies, as top-left positions relative to the HUD
    /// origin and sizes. Both vectors have the same length.
    fn children_positions_and_sizes(&self, tree: &ConfigTree) -> (Vec<Vec2>, Vec<Vec2>);

    fn draw_children(&mut self, origin: Vec2, frame: &mut Frame<'_>);

    fn on_config_changed(&mut self, _event: &ChangeEvent, _tree: &ConfigTree) {}

    /// Called instead of drawing while the element is disabled
    fn release_focus(&mut self, _focus: &mut FocusArbiter) {}

    /// Turn preview mode off
    fn stop_preview(&mut self, tree: &mut ConfigTree) {
        let path = format!("{}.preview", self.section());
        if let Err(err) = tree.set_value(&path, Value::Bool(false)) {
            debug!(error = %err, "element has no preview flag");
        }
    }
}

/// Screen-space hit boxes of one element while editing
#[derive(Debug, Clone, PartialEq)]
pub struct EditRegion {
    pub section: String,
    pub label: String,
    pub boxes: Vec<Rect>,
    /// The section has a `size` field that can be dragged
    pub resizable: bool,
}

impl EditRegion {
    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(self.boxes.iter().copied())
    }
}

pub struct DraggableHud {
    element: Box<dyn HudElement>,
    subscription: Option<SubscriptionId>,
}

impl DraggableHud {
    pub fn new(element: Box<dyn HudElement>) -> Self {
        Self {
            element,
            subscription: None,
        }
    }

    pub fn section(&self) -> &str {
        self.element.section()
    }

    pub fn display_name(&self) -> &str {
        self.element.display_name()
    }

    pub fn element_mut(&mut self) -> &mut dyn HudElement {
        self.element.as_mut()
    }

    /// Start receiving change events for the element's section
    pub fn attach(&mut self, bus: &mut ChangeBus) {
        if self.subscription.is_none() {
            self.subscription = Some(bus.subscribe(self.element.section()));
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Release the change subscription. Safe to call more than once or
    /// without a prior `attach`.
    pub fn dispose(&mut self, bus: &mut ChangeBus) {
        if let Some(id) = self.subscription.take() {
            bus.unsubscribe(id);
            debug!(section = %self.element.section(), "disposed hud element");
        }
    }

    /// Forward dispatched change events to the element
    pub fn pump_events(&mut self, bus: &mut ChangeBus, tree: &ConfigTree) {
        let Some(id) = self.subscription else {
            return;
        };
        for event in bus.drain(id) {
            trace!(section = %self.element.section(), path = %event.path, "config change for element");
            self.element.on_config_changed(&event, tree);
        }
    }

    pub fn enabled(&self, tree: &ConfigTree) -> bool {
        tree.bool_or(&format!("{}.enabled", self.element.section()), true)
    }

    pub fn edit_region(&self, tree: &ConfigTree, origin: Vec2) -> EditRegion {
        let (positions, sizes) = self.element.children_positions_and_sizes(tree);
        let boxes = positions
            .into_iter()
            .zip(sizes)
            .map(|(pos, size)| Rect::new(origin + pos, size))
            .collect();
        let size_path = format!("{}.size", self.element.section());
        EditRegion {
            section: self.element.section().to_string(),
            label: self.element.display_name().to_string(),
            boxes,
            resizable: matches!(tree.get_value(&size_path), Ok(Value::Vec2(_))),
        }
    }

    /// Draw the element. In edit mode its hit regions are drawn on top,
    /// highlighted when `active` (being dragged).
    pub fn draw(&mut self, origin: Vec2, frame: &mut Frame<'_>, editing: bool, active: bool) {
        if !self.enabled(frame.tree) {
            self.element.release_focus(frame.focus);
            return;
        }
        self.element.draw_children(origin, frame);
        if !editing {
            return;
        }

        let region = self.edit_region(frame.tree, origin);
        let fill = rgba8(edit_mode::REGION_FILL);
        let border = if active {
            rgba8(edit_mode::ACTIVE_BORDER)
        } else {
            rgba8(edit_mode::REGION_BORDER)
        };
        for rect in &region.boxes {
            frame.renderer.rect_filled(*rect, fill);
            frame.renderer.rect_bordered(*rect, border, 1.0);
        }
        if let Some(bounds) = region.bounds() {
            let label_size = frame.renderer.text_size(&region.label);
            let pos = bounds.min + (bounds.size - label_size) / 2.0;
            frame
                .renderer
                .text_outlined(pos, &region.label, rgba8(edit_mode::LABEL), Color::BLACK);
        }
    }
}

fn rgba8([r, g, b, a]: [u8; 4]) -> Color {
    Color::from_rgba8(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::SectionBuilder;
    use crate::render::RecordingRenderer;
    use crate::simulation::SimulatedGame;

    struct Boxy {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl HudElement for Boxy {
        fn section(&self) -> &str {
            "boxy"
        }

        fn display_name(&self) -> &str {
            "Boxy"
        }

        fn children_positions_and_sizes(&self, tree: &ConfigTree) -> (Vec<Vec2>, Vec<Vec2>) {
            let pos = tree.vec2_or("boxy.position", Vec2::ZERO);
            let size = tree.vec2_or("boxy.size", Vec2::ONE);
            (vec![pos, pos + Vec2::new(0.0, size.y)], vec![size, size])
        }

        fn draw_children(&mut self, _origin: Vec2, _frame: &mut Frame<'_>) {}

        fn on_config_changed(&mut self, event: &ChangeEvent, _tree: &ConfigTree) {
            self.events.borrow_mut().push(event.path.clone());
        }
    }

    fn tree() -> ConfigTree {
        ConfigTree::new(vec![
            SectionBuilder::new("boxy", "Boxy")
                .checkbox("enabled", "Enabled", true)
                .checkbox("preview", "Preview", true)
                .vec2("position", "Position", Vec2::new(10.0, 20.0), -100.0, 100.0)
                .vec2("size", "Size", Vec2::new(30.0, 5.0), 1.0, 100.0)
                .build(),
        ])
    }

    fn boxy_with_log() -> (DraggableHud, Rc<RefCell<Vec<String>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let hud = DraggableHud::new(Box::new(Boxy { events: events.clone() }));
        (hud, events)
    }

    fn boxy() -> DraggableHud {
        boxy_with_log().0
    }

    #[test]
    fn test_edit_region_offsets_by_origin() {
        let tree = tree();
        let hud = boxy();
        let region = hud.edit_region(&tree, Vec2::new(100.0, 100.0));
        assert!(region.resizable);
        assert_eq!(region.boxes[0], Rect::new(Vec2::new(110.0, 120.0), Vec2::new(30.0, 5.0)));
        assert_eq!(
            region.bounds(),
            Some(Rect::new(Vec2::new(110.0, 120.0), Vec2::new(30.0, 10.0)))
        );
    }

    #[test]
    fn test_edit_mode_draws_regions_and_label() {
        let tree = tree();
        let mut hud = boxy();
        let mut game = SimulatedGame::default();
        let mut renderer = RecordingRenderer::new();
        let mut focus = FocusArbiter::new();
        let input = FrameInput::default();
        let mut frame = Frame {
            tree: &tree,
            game: &mut game,
            renderer: &mut renderer,
            focus: &mut focus,
            input: &input,
            interactive: false,
        };

        hud.draw(Vec2::ZERO, &mut frame, false, false);
        assert!(renderer.commands.is_empty());

        let mut frame = Frame {
            tree: &tree,
            game: &mut game,
            renderer: &mut renderer,
            focus: &mut focus,
            input: &input,
            interactive: false,
        };
        hud.draw(Vec2::ZERO, &mut frame, true, false);
        assert_eq!(renderer.filled().len(), 2);
        assert_eq!(renderer.texts(), vec!["Boxy"]);
    }

    #[test]
    fn test_dispose_is_idempotent_and_safe_without_attach() {
        let mut bus = ChangeBus::new();
        let mut never_attached = boxy();
        never_attached.dispose(&mut bus);
        assert!(!never_attached.is_attached());

        let mut hud = boxy();
        hud.attach(&mut bus);
        assert!(hud.is_attached());
        hud.dispose(&mut bus);
        hud.dispose(&mut bus);
        assert!(!hud.is_attached());
    }

    #[test]
    fn test_events_reach_element_after_dispatch() {
        let mut tree = tree();
        let mut bus = ChangeBus::new();
        let (mut hud, events) = boxy_with_log();
        hud.attach(&mut bus);

        hud.element_mut().stop_preview(&mut tree);
        hud.pump_events(&mut bus, &tree);
        assert!(events.borrow().is_empty());

        bus.dispatch(&mut tree);
        hud.pump_events(&mut bus, &tree);
        assert_eq!(*events.borrow(), vec!["boxy.preview".to_string()]);
        assert_eq!(tree.get_value("boxy.preview"), Ok(&Value::Bool(false)));
        assert!(hud.enabled(&tree));
    }
}
