//! Moving platforms: oscillating girders and blinking ghost platforms.

use girder_rescue_core::{EntityId, PlatformDef, PlatformMotion, Rect};

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

#[derive(Debug)]
pub(crate) struct Platform {
    pub(crate) id: EntityId,
    pub(crate) rect: Rect,
    pub(crate) sprite: u32,
    motion: PlatformMotion,
    direction: f32,
    blink_ticks: u32,
    pub(crate) visible: bool,
}

impl Platform {
    pub(crate) fn from_def(id: EntityId, def: &PlatformDef) -> Self {
        Self {
            id,
            rect: def.rect,
            sprite: def.sprite,
            motion: def.motion,
            direction: 1.0,
            blink_ticks: 0,
            visible: true,
        }
    }

    /// Advances the platform one update, returning the positional delta so
    /// riders can be carried along.
    pub(crate) fn tick(&mut self) -> (f32, f32) {
        match self.motion {
            PlatformMotion::Horizontal { speed, min, max } => {
                let dx = self.oscillate(speed, min, max, Axis::X);
                (dx, 0.0)
            }
            PlatformMotion::Vertical { speed, min, max } => {
                let dy = self.oscillate(speed, min, max, Axis::Y);
                (0.0, dy)
            }
            PlatformMotion::Blinking {
                visible_ticks,
                invisible_ticks,
            } => {
                self.blink_ticks += 1;
                let limit = if self.visible {
                    visible_ticks
                } else {
                    invisible_ticks
                };
                if self.blink_ticks >= limit.max(1) {
                    self.visible = !self.visible;
                    self.blink_ticks = 0;
                }
                (0.0, 0.0)
            }
        }
    }

    fn oscillate(&mut self, speed: f32, min: f32, max: f32, axis: Axis) -> f32 {
        let step = speed * self.direction;
        let before = match axis {
            Axis::X => self.rect.x,
            Axis::Y => self.rect.y,
        };
        let after = (before + step).clamp(min, max);
        match axis {
            Axis::X => self.rect.x = after,
            Axis::Y => self.rect.y = after,
        }
        if after <= min || after >= max {
            self.direction = -self.direction;
        }
        after - before
    }

    /// Whether a body standing at the given feet line rides this platform.
    pub(crate) fn carries(&self, feet: &Rect) -> bool {
        if !self.visible {
            return false;
        }
        let surface = Rect::new(self.rect.x, self.rect.y - 2.0, self.rect.w, 6.0);
        surface.intersects(feet)
    }
}
