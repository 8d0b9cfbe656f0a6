use crate::types::EntityId;

/// Displayed value of an animated bar
///
/// Moves toward the observed value by a bounded step each frame and jumps
/// straight to it when a different entity takes over the slot or the maximum
/// changes, so unrelated values are never animated into each other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothValue {
    current: f32,
    max: f32,
    identity: Option<EntityId>,
}

impl SmoothValue {
    pub fn new(identity: Option<EntityId>, current: f32, max: f32) -> Self {
        Self { current, max, identity }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn update(&mut self, identity: Option<EntityId>, observed: f32, observed_max: f32, max_step: f32) -> f32 {
        if identity != self.identity || observed_max != self.max {
            self.identity = identity;
            self.max = observed_max;
            self.current = observed;
            return self.current;
        }

        let step = max_step.max(0.0);
        let delta = observed - self.current;
        self.current = if delta.abs() <= step {
            observed
        } else {
            self.current + step.copysign(delta)
        };
        self.current
    }

    /// Forget the slot occupant; the next update snaps
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
