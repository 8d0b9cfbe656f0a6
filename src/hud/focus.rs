//! Mouse-over arbitration
//!
//! Widgets claim focus while the pointer is over one of their entities. Claims
//! overwrite each other within a frame, so the last-drawn (topmost) widget
//! wins. At the end of the frame the arbiter tells the game about the new
//! mouse-over target, but only when it actually changed.

use tracing::trace;

use crate::game::GameStateProvider;
use crate::types::EntityId;

#[derive(Debug, Default)]
pub struct FocusArbiter {
    /// Holder as of the last finished frame
    holder: Option<EntityId>,
    /// Last value sent to the provider
    pushed: Option<EntityId>,
    claimed: Option<EntityId>,
    released: bool,
}

impl FocusArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holder(&self) -> Option<EntityId> {
        self.holder
    }

    /// Take focus for this frame, replacing any earlier claim
    pub fn claim(&mut self, entity: EntityId) {
        self.claimed = Some(entity);
    }

    /// A widget that held focus stopped hovering. Ignored if anything claims
    /// focus during the same frame.
    pub fn release(&mut self) {
        self.released = true;
    }

    /// Settle this frame's claims and push a mouse-over change if there is one
    pub fn end_frame(&mut self, game: &mut dyn GameStateProvider) {
        if let Some(entity) = self.claimed.take() {
            self.holder = Some(entity);
        } else if self.released {
            self.holder = None;
        }
        self.released = false;

        if self.holder != self.pushed {
            trace!(mouseover = ?self.holder, "mouse-over target changed");
            game.set_mouseover(self.holder);
            self.pushed = self.holder;
        }
    }
}

/// Per-widget hover memory, makes sure focus is released exactly once
#[derive(Debug, Default)]
pub struct HoverTracker {
    was_hovering: bool,
}

impl HoverTracker {
    pub fn is_hovering(&self) -> bool {
        self.was_hovering
    }

    /// Report this frame's hovered entity (None when not hovered)
    pub fn update(&mut self, hovered: Option<EntityId>, arbiter: &mut FocusArbiter) {
        match hovered {
            Some(entity) => {
                arbiter.claim(entity);
                self.was_hovering = true;
            }
            None => self.stop(arbiter),
        }
    }

    /// Release focus if this widget had it, for example when it gets disabled
    pub fn stop(&mut self, arbiter: &mut FocusArbiter) {
        if self.was_hovering {
            arbiter.release();
            self.was_hovering = false;
        }
    }
}
