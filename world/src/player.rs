//! The controllable protagonist: input response, ladder climbing, and the
//! life-state machine.
//!
//! Life phases advance strictly `Alive -> Dying -> Dead -> Respawning ->
//! Alive`; at most one phase change happens per update and damage received
//! outside `Alive` is discarded, which makes overlapping hazards idempotent.

use girder_rescue_core::{
    DamageSource, Event, Facing, InputIntent, LifePhase, PlayerEvent, PlayerStatus, PowerUp, Rect,
    SpawnPoint,
};

use crate::physics;
use crate::Ladder;

pub(crate) const WIDTH: f32 = 24.0;
pub(crate) const HEIGHT: f32 = 32.0;
pub(crate) const WALK_SPEED: f32 = 2.2;
pub(crate) const CLIMB_SPEED: f32 = 1.0;
pub(crate) const JUMP_IMPULSE: f32 = -7.5;
pub(crate) const FALL_CAP: f32 = 10.0;
pub(crate) const FALL_DEATH_Y: f32 = 2000.0;
pub(crate) const HAMMER_DURATION: u32 = 600;

const DYING_TICKS: u32 = 120;
const DEAD_TICKS: u32 = 90;
const RESPAWN_TICKS: u32 = 120;
const MIN_CLIMB_TICKS: u32 = 5;
const TOP_EXIT_SNAP: f32 = 20.0;
const BOTTOM_EXIT_REACH: f32 = 15.0;
const DEATH_RISE_VY: f32 = -6.0;

/// Held state of every input intent, updated by `Command::Input`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct InputState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    jump: bool,
}

impl InputState {
    pub(crate) fn set(&mut self, intent: InputIntent, pressed: bool) {
        match intent {
            InputIntent::MoveLeft => self.left = pressed,
            InputIntent::MoveRight => self.right = pressed,
            InputIntent::ClimbUp => self.up = pressed,
            InputIntent::ClimbDown => self.down = pressed,
            InputIntent::Jump => self.jump = pressed,
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
pub(crate) struct Player {
    pub(crate) rect: Rect,
    vx: f32,
    vy: f32,
    facing: Facing,
    phase: LifePhase,
    phase_ticks: u32,
    climbing: bool,
    on_ladder: bool,
    climb_ticks: u32,
    grounded: bool,
    hammer_ticks: u32,
    spawn: SpawnPoint,
}

impl Player {
    pub(crate) fn at_spawn(spawn: SpawnPoint) -> Self {
        Self {
            rect: Rect::new(spawn.x, spawn.y, WIDTH, HEIGHT),
            vx: 0.0,
            vy: 0.0,
            facing: Facing::Right,
            phase: LifePhase::Alive,
            phase_ticks: 0,
            climbing: false,
            on_ladder: false,
            climb_ticks: 0,
            grounded: false,
            hammer_ticks: 0,
            spawn,
        }
    }

    pub(crate) fn phase(&self) -> LifePhase {
        self.phase
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.phase() == LifePhase::Alive
    }

    pub(crate) fn hammer_armed(&self) -> bool {
        self.hammer_ticks > 0
    }

    pub(crate) fn arm_hammer(&mut self) {
        self.hammer_ticks = HAMMER_DURATION;
        if self.climbing {
            self.leave_ladder();
        }
    }

    /// Revokes the hammer immediately, reporting whether it was armed.
    pub(crate) fn disarm_hammer(&mut self) -> bool {
        let was_armed = self.hammer_armed();
        self.hammer_ticks = 0;
        was_armed
    }

    fn death_frame(&self) -> u32 {
        match self.phase {
            LifePhase::Dying => (self.phase_ticks / 20).min(5),
            LifePhase::Dead => 5,
            _ => 0,
        }
    }

    fn visible(&self) -> bool {
        match self.phase {
            LifePhase::Dead => false,
            LifePhase::Respawning => self.phase_ticks % 10 < 5,
            _ => true,
        }
    }

    pub(crate) fn status(&self) -> PlayerStatus {
        PlayerStatus {
            phase: self.phase,
            rect: self.rect,
            facing: self.facing,
            climbing: self.climbing,
            grounded: self.grounded,
            invulnerable: self.phase == LifePhase::Respawning,
            visible: self.visible(),
            hammer_ticks: self.hammer_ticks,
            death_frame: self.death_frame(),
        }
    }

    /// The hazard hitbox: the lower half of the body, so a flame brushing the
    /// player's hat does not kill.
    pub(crate) fn hazard_rect(&self) -> Rect {
        Rect::new(
            self.rect.x,
            self.rect.y + self.rect.h / 2.0,
            self.rect.w,
            self.rect.h / 2.0,
        )
    }

    /// Registers a lethal hit. Damage outside `Alive` is discarded.
    pub(crate) fn damage(&mut self, source: DamageSource, out: &mut Vec<Event>) {
        if self.phase != LifePhase::Alive {
            return;
        }
        out.push(Event::Player(PlayerEvent::Damaged { source }));
        log::debug!("player damaged by {source:?}");
        self.phase = LifePhase::Dying;
        self.phase_ticks = 0;
        self.vx = 0.0;
        self.vy = 0.0;
        self.leave_ladder();
        self.grounded = false;
    }

    fn leave_ladder(&mut self) {
        self.climbing = false;
        self.on_ladder = false;
        self.climb_ticks = 0;
    }

    pub(crate) fn tick(
        &mut self,
        input: &InputState,
        solids: &[Rect],
        ladders: &[Ladder],
        lives: u32,
        out: &mut Vec<Event>,
    ) {
        match self.phase {
            LifePhase::Alive => self.tick_alive(input, solids, ladders, out),
            LifePhase::Dying => self.tick_dying(out),
            LifePhase::Dead => self.tick_dead(lives, out),
            LifePhase::Respawning => self.tick_respawning(),
        }
    }

    fn tick_alive(
        &mut self,
        input: &InputState,
        solids: &[Rect],
        ladders: &[Ladder],
        out: &mut Vec<Event>,
    ) {
        if self.hammer_ticks > 0 {
            self.hammer_ticks -= 1;
            if self.hammer_ticks == 0 {
                out.push(Event::Player(PlayerEvent::PowerUpExpired {
                    power: PowerUp::Hammer,
                }));
            }
        }

        if !self.climbing {
            self.try_engage_ladder(input, ladders);
        }

        if self.climbing {
            self.tick_climb(input, solids, ladders);
        } else {
            self.tick_walk(input, solids);
        }

        if self.rect.y > FALL_DEATH_Y {
            self.damage(DamageSource::Fall, out);
        }
    }

    fn tick_walk(&mut self, input: &InputState, solids: &[Rect]) {
        self.vx = 0.0;
        if input.left {
            self.vx -= WALK_SPEED;
            self.facing = Facing::Left;
        }
        if input.right {
            self.vx += WALK_SPEED;
            self.facing = Facing::Right;
        }

        if input.jump && self.grounded {
            self.vy = JUMP_IMPULSE;
            self.grounded = false;
        }

        physics::apply_gravity(&mut self.vy, FALL_CAP);
        self.rect.x += self.vx;
        self.rect.y += self.vy;

        let contact = physics::resolve_solids(&mut self.rect, &mut self.vy, solids);
        self.grounded = contact.grounded;
    }

    fn try_engage_ladder(&mut self, input: &InputState, ladders: &[Ladder]) {
        if self.hammer_armed() || (!input.up && !input.down) {
            return;
        }

        let engaged = if input.up {
            usable_ladder_at(&self.rect, ladders)
        } else {
            usable_ladder_at(&self.rect, ladders)
                .or_else(|| usable_ladder_at(&below_probe(&self.rect), ladders))
        };

        if let Some(ladder) = engaged {
            self.rect.x = ladder.rect.center_x() - self.rect.w / 2.0;
            self.vx = 0.0;
            self.vy = 0.0;
            self.climbing = true;
            self.on_ladder = true;
            self.climb_ticks = 0;
            self.grounded = false;
        }
    }

    fn tick_climb(&mut self, input: &InputState, solids: &[Rect], ladders: &[Ladder]) {
        self.vy = 0.0;
        if input.up {
            self.vy -= CLIMB_SPEED;
        }
        if input.down {
            self.vy += CLIMB_SPEED;
        }
        self.rect.y += self.vy;
        self.climb_ticks += 1;

        // A brief hold keeps single-tick taps from immediately re-exiting.
        if self.climb_ticks < MIN_CLIMB_TICKS {
            return;
        }

        if input.up && self.try_exit_top(solids) {
            return;
        }
        if input.down && self.try_exit_bottom(solids, ladders) {
            return;
        }

        // Climbed off the end of the ladder without a valid exit: drop.
        let reach = Rect::new(
            self.rect.x + self.rect.w / 4.0,
            self.rect.y + self.rect.h - 5.0,
            self.rect.w / 2.0,
            25.0,
        );
        if self.on_ladder && usable_ladder_at(&reach, ladders).is_none() && !input.down {
            self.leave_ladder();
        }
    }

    /// Steps off onto a solid whose top is in climbing reach above the head.
    fn try_exit_top(&mut self, solids: &[Rect]) -> bool {
        let above = Rect::new(
            self.rect.x + self.rect.w / 4.0,
            self.rect.y - 10.0,
            self.rect.w / 2.0,
            15.0,
        );

        for solid in solids {
            if !solid.intersects(&above) {
                continue;
            }
            let landing_y = solid.y - self.rect.h;
            if (self.rect.y - landing_y).abs() < TOP_EXIT_SNAP {
                self.rect.y = landing_y;
                self.vy = 0.0;
                self.leave_ladder();
                self.grounded = true;
                return true;
            }
        }
        false
    }

    fn try_exit_bottom(&mut self, solids: &[Rect], ladders: &[Ladder]) -> bool {
        let below = below_probe(&self.rect);
        if usable_ladder_at(&below, ladders).is_some() {
            return false;
        }

        let feet = self.rect.y + self.rect.h;
        let landing = solids
            .iter()
            .find(|solid| solid.intersects(&below) && (solid.y - feet).abs() < BOTTOM_EXIT_REACH);

        match landing {
            Some(solid) => {
                self.rect.y = solid.y - self.rect.h;
                self.leave_ladder();
                self.grounded = true;
                true
            }
            None => false,
        }
    }

    fn tick_dying(&mut self, out: &mut Vec<Event>) {
        let t = self.phase_ticks;
        if t < 20 {
            self.vy = DEATH_RISE_VY;
            self.rect.y += self.vy;
        } else if t < 90 {
            physics::apply_gravity(&mut self.vy, FALL_CAP);
            self.rect.y += self.vy;
        }

        self.phase_ticks += 1;
        if self.phase_ticks == DYING_TICKS {
            self.phase = LifePhase::Dead;
            self.phase_ticks = 0;
            out.push(Event::Player(PlayerEvent::Died));
        }
    }

    fn tick_dead(&mut self, lives: u32, out: &mut Vec<Event>) {
        self.phase_ticks = self.phase_ticks.saturating_add(1);
        if self.phase_ticks != DEAD_TICKS {
            return;
        }
        if lives == 0 {
            log::info!("no lives remain; holding in dead phase");
            return;
        }
        self.rect.x = self.spawn.x;
        self.rect.y = self.spawn.y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.grounded = false;
        self.phase = LifePhase::Respawning;
        self.phase_ticks = 0;
        out.push(Event::Player(PlayerEvent::Respawned {
            x: self.spawn.x,
            y: self.spawn.y,
        }));
    }

    fn tick_respawning(&mut self) {
        self.phase_ticks += 1;
        if self.phase_ticks == RESPAWN_TICKS {
            self.phase = LifePhase::Alive;
            self.phase_ticks = 0;
        }
    }
}

fn below_probe(body: &Rect) -> Rect {
    Rect::new(body.x + body.w / 4.0, body.y + body.h, body.w / 2.0, 10.0)
}

fn usable_ladder_at<'a>(probe: &Rect, ladders: &'a [Ladder]) -> Option<&'a Ladder> {
    ladders
        .iter()
        .find(|ladder| ladder.usable && ladder.rect.intersects(probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_rescue_core::EntityId;

    fn spawn() -> SpawnPoint {
        SpawnPoint { x: 50.0, y: 100.0 }
    }

    fn floor() -> Vec<Rect> {
        vec![Rect::new(0.0, 132.0, 400.0, 16.0)]
    }

    fn ladder(x: f32, y: f32, h: f32) -> Ladder {
        Ladder {
            id: EntityId::new(900),
            rect: Rect::new(x, y, 16.0, h),
            usable: true,
        }
    }

    fn settle(player: &mut Player, solids: &[Rect], ticks: u32) {
        let input = InputState::default();
        let mut events = Vec::new();
        for _ in 0..ticks {
            player.tick(&input, solids, &[], 3, &mut events);
        }
    }

    #[test]
    fn free_fall_matches_euler_order() {
        let mut player = Player::at_spawn(spawn());
        let input = InputState::default();
        let mut events = Vec::new();
        for _ in 0..10 {
            player.tick(&input, &[], &[], 3, &mut events);
        }
        // Gravity lands before integration, so velocity reaches 5.0 and the
        // displacement is the partial sum 0.5 + 1.0 + ... + 5.0 = 27.5.
        assert!((player.status().rect.y - (100.0 + 27.5)).abs() < 1e-4);
    }

    #[test]
    fn landing_seats_player_on_floor() {
        let mut player = Player::at_spawn(spawn());
        let solids = floor();
        settle(&mut player, &solids, 30);
        let status = player.status();
        assert!(status.grounded);
        assert!((status.rect.y - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn duplicate_damage_is_idempotent() {
        let mut player = Player::at_spawn(spawn());
        let mut events = Vec::new();
        player.damage(DamageSource::Flame, &mut events);
        player.damage(DamageSource::Barrel, &mut events);
        player.damage(DamageSource::Fall, &mut events);
        assert_eq!(player.phase(), LifePhase::Dying);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn life_phases_advance_on_exact_boundaries() {
        let mut player = Player::at_spawn(spawn());
        let input = InputState::default();
        let mut events = Vec::new();
        player.damage(DamageSource::Flame, &mut events);
        events.clear();

        for _ in 0..119 {
            player.tick(&input, &[], &[], 3, &mut events);
        }
        assert_eq!(player.phase(), LifePhase::Dying);
        player.tick(&input, &[], &[], 3, &mut events);
        assert_eq!(player.phase(), LifePhase::Dead);
        assert!(events.contains(&Event::Player(PlayerEvent::Died)));
        events.clear();

        for _ in 0..89 {
            player.tick(&input, &[], &[], 3, &mut events);
        }
        assert_eq!(player.phase(), LifePhase::Dead);
        player.tick(&input, &[], &[], 3, &mut events);
        assert_eq!(player.phase(), LifePhase::Respawning);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::Player(PlayerEvent::Respawned { .. }))));
        events.clear();

        for _ in 0..120 {
            player.tick(&input, &[], &[], 3, &mut events);
        }
        assert_eq!(player.phase(), LifePhase::Alive);
    }

    #[test]
    fn dead_without_lives_never_respawns() {
        let mut player = Player::at_spawn(spawn());
        let input = InputState::default();
        let mut events = Vec::new();
        player.damage(DamageSource::Flame, &mut events);
        for _ in 0..120 {
            player.tick(&input, &[], &[], 0, &mut events);
        }
        assert_eq!(player.phase(), LifePhase::Dead);
        for _ in 0..300 {
            player.tick(&input, &[], &[], 0, &mut events);
        }
        assert_eq!(player.phase(), LifePhase::Dead);
    }

    #[test]
    fn respawn_blinks_and_shields_damage() {
        let mut player = Player::at_spawn(spawn());
        let input = InputState::default();
        let mut events = Vec::new();
        player.damage(DamageSource::Flame, &mut events);
        for _ in 0..(120 + 90) {
            player.tick(&input, &[], &[], 3, &mut events);
        }
        assert_eq!(player.phase(), LifePhase::Respawning);
        assert!(player.status().invulnerable);

        events.clear();
        player.damage(DamageSource::Flame, &mut events);
        assert!(events.is_empty());

        // Visibility alternates in five-tick bands.
        let mut pattern = Vec::new();
        for _ in 0..10 {
            player.tick(&input, &[], &[], 3, &mut events);
            pattern.push(player.status().visible);
        }
        assert!(pattern.contains(&true));
        assert!(pattern.contains(&false));
    }

    #[test]
    fn hammer_blocks_ladder_engagement() {
        let mut player = Player::at_spawn(spawn());
        let solids = floor();
        settle(&mut player, &solids, 30);
        player.arm_hammer();

        let rail = ladder(50.0, 36.0, 96.0);
        let mut input = InputState::default();
        input.set(InputIntent::ClimbUp, true);
        let mut events = Vec::new();
        player.tick(&input, &solids, &[rail], 3, &mut events);
        assert!(!player.status().climbing);
    }

    #[test]
    fn hammer_expires_after_its_duration() {
        let mut player = Player::at_spawn(spawn());
        let solids = floor();
        settle(&mut player, &solids, 5);
        player.arm_hammer();

        let input = InputState::default();
        let mut events = Vec::new();
        for _ in 0..HAMMER_DURATION {
            player.tick(&input, &solids, &[], 3, &mut events);
        }
        assert!(!player.hammer_armed());
        assert!(events.contains(&Event::Player(PlayerEvent::PowerUpExpired {
            power: PowerUp::Hammer,
        })));
    }

    #[test]
    fn climbing_ascends_at_climb_speed() {
        let mut player = Player::at_spawn(spawn());
        let solids = floor();
        settle(&mut player, &solids, 30);
        let start_y = player.status().rect.y;

        let rail = ladder(50.0, 0.0, 160.0);
        let mut input = InputState::default();
        input.set(InputIntent::ClimbUp, true);
        let mut events = Vec::new();
        player.tick(&input, &solids, &[rail.clone()], 3, &mut events);
        assert!(player.status().climbing);

        for _ in 0..3 {
            player.tick(&input, &solids, &[rail.clone()], 3, &mut events);
        }
        let status = player.status();
        assert!(status.climbing);
        assert!((start_y - status.rect.y - 4.0 * CLIMB_SPEED).abs() < 1e-4);
        assert!((status.rect.x + status.rect.w / 2.0 - rail.rect.center_x()).abs() < 1e-4);
    }

    #[test]
    fn climbing_up_steps_off_onto_the_girder_above() {
        let mut player = Player::at_spawn(spawn());
        // Lower floor plus an upper girder pierced by the ladder.
        let solids = vec![
            Rect::new(0.0, 132.0, 400.0, 16.0),
            Rect::new(0.0, 52.0, 400.0, 16.0),
        ];
        settle(&mut player, &solids, 10);

        let rail = ladder(50.0, 36.0, 96.0);
        let mut input = InputState::default();
        input.set(InputIntent::ClimbUp, true);
        let mut events = Vec::new();

        let mut climbed = 0;
        while player.status().climbing || climbed == 0 {
            player.tick(&input, &solids, &[rail.clone()], 3, &mut events);
            climbed += 1;
            assert!(climbed < 70, "climber never stepped off the ladder");
        }

        let status = player.status();
        assert!(!status.climbing);
        assert!(status.grounded);
        // Feet seated on the upper girder's top edge, not the ladder top.
        assert!((status.rect.y - (52.0 - HEIGHT)).abs() < f32::EPSILON);
    }

    #[test]
    fn falling_past_the_world_floor_is_lethal() {
        let mut player = Player::at_spawn(SpawnPoint { x: 0.0, y: 1990.0 });
        let input = InputState::default();
        let mut events = Vec::new();
        for _ in 0..20 {
            player.tick(&input, &[], &[], 3, &mut events);
        }
        assert_eq!(player.phase(), LifePhase::Dying);
        assert!(events.contains(&Event::Player(PlayerEvent::Damaged {
            source: DamageSource::Fall,
        })));
    }
}
