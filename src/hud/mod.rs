//! HUD element engine: draggable elements, edit-mode dragging, mouse-over
//! arbitration, smoothed bars and the widgets built on them

pub mod bar;
pub mod drag;
pub mod element;
pub mod focus;
pub mod smooth;
pub mod widgets;

pub use drag::{DragController, DragMode};
pub use element::{DraggableHud, EditRegion, Frame, FrameInput, HudElement};
pub use focus::{FocusArbiter, HoverTracker};
pub use smooth::SmoothValue;
