//! Flames and barrels: one tick routine parameterised by behavior variant.

use girder_rescue_core::{EnemyBehavior, EntityId, EntityKind, Facing, Rect};

use crate::physics;

pub(crate) const FLAME_SIZE: f32 = 16.0;
pub(crate) const BARREL_SIZE: f32 = 16.0;
const BASE_SPEED: f32 = 2.0;
const FAST_SPEED: f32 = 3.5;
const BARREL_SPEED: f32 = 2.5;
const FALL_CAP: f32 = 12.0;
const JUMP_IMPULSE: f32 = -6.0;
const JUMP_COOLDOWN: u32 = 120;
const JUMP_CHANCE_PERCENT: u64 = 5;
const CHASE_RANGE_X: f32 = 300.0;
const CHASE_RANGE_Y: f32 = 50.0;
const DESPAWN_Y: f32 = 1000.0;
const CONTACT_INSET: f32 = 3.0;

#[derive(Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
    pub(crate) rect: Rect,
    vy: f32,
    pub(crate) facing: Facing,
    pub(crate) behavior: EnemyBehavior,
    grounded: bool,
    jump_cooldown: u32,
    pub(crate) alive: bool,
}

impl Enemy {
    pub(crate) fn flame(id: EntityId, x: f32, y: f32, behavior: EnemyBehavior, facing: Facing) -> Self {
        Self {
            id,
            kind: EntityKind::Flame,
            rect: Rect::new(x, y, FLAME_SIZE, FLAME_SIZE),
            vy: 0.0,
            facing,
            behavior,
            grounded: false,
            jump_cooldown: 0,
            alive: true,
        }
    }

    pub(crate) fn barrel(id: EntityId, x: f32, y: f32, facing: Facing) -> Self {
        Self {
            id,
            kind: EntityKind::Barrel,
            rect: Rect::new(x, y, BARREL_SIZE, BARREL_SIZE),
            vy: 0.0,
            facing,
            behavior: EnemyBehavior::Patrol,
            grounded: false,
            jump_cooldown: 0,
            alive: true,
        }
    }

    pub(crate) fn destroy(&mut self) {
        self.alive = false;
    }

    /// Contact hitbox, inset so grazing pixels do not register as hits.
    pub(crate) fn contact_rect(&self) -> Rect {
        self.rect.inset(CONTACT_INSET)
    }

    fn walk_speed(&self) -> f32 {
        if self.kind == EntityKind::Barrel {
            return BARREL_SPEED;
        }
        match self.behavior {
            EnemyBehavior::Static => 0.0,
            EnemyBehavior::Fast => FAST_SPEED,
            EnemyBehavior::Patrol | EnemyBehavior::Chaser | EnemyBehavior::Jumper => BASE_SPEED,
        }
    }

    /// Advances the enemy one update. Returns `false` when the enemy fell out
    /// of the level and should be removed.
    pub(crate) fn tick(
        &mut self,
        player_center: (f32, f32),
        player_alive: bool,
        solids: &[Rect],
        rng_state: &mut u64,
    ) -> bool {
        if self.behavior == EnemyBehavior::Static {
            return true;
        }

        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);

        let mut speed = self.walk_speed();
        if self.behavior == EnemyBehavior::Chaser && self.grounded && player_alive {
            let dx = player_center.0 - self.rect.center_x();
            let dy = player_center.1 - self.rect.center_y();
            if dx.abs() < CHASE_RANGE_X && dy.abs() < CHASE_RANGE_Y {
                self.facing = if dx < 0.0 { Facing::Left } else { Facing::Right };
                speed = FAST_SPEED;
            }
        }

        if self.behavior == EnemyBehavior::Jumper && self.grounded && self.jump_cooldown == 0 {
            *rng_state = crate::next_random(*rng_state);
            if (*rng_state >> 33) % 100 < JUMP_CHANCE_PERCENT {
                self.vy = JUMP_IMPULSE;
                self.grounded = false;
                self.jump_cooldown = JUMP_COOLDOWN;
            }
        }

        physics::apply_gravity(&mut self.vy, FALL_CAP);
        self.rect.x += self.facing.sign() * speed;
        self.rect.y += self.vy;

        let contact = physics::resolve_solids(&mut self.rect, &mut self.vy, solids);
        self.grounded = contact.grounded;
        if contact.hit_wall {
            self.facing = self.facing.flipped();
        }

        self.rect.y <= DESPAWN_Y
    }
}
