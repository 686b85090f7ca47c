#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Girder Rescue engine.
//!
//! The world owns every entity in the loaded level together with the player's
//! life-state machine, the per-level flow machine, and the shared progress
//! tally. All mutation flows through [`apply`]; adapters and systems observe
//! the results through the emitted [`Event`] stream and the read-only
//! [`query`] functions.

mod enemy;
mod level;
mod physics;
mod platform;
mod player;

use girder_rescue_core::{
    Command, DamageSource, EnemyBehavior, EntityId, EntityKind, Event, Facing, GameProgress,
    ItemKind, LevelBlueprint, LevelPhase, PlayerEvent, PowerUp, Rect, WELCOME_BANNER,
};

use enemy::Enemy;
use level::{LevelFlow, Npc};
use platform::Platform;
use player::{InputState, Player};

const WORLD_RNG_SEED: u64 = 0x51ab_7cd3_9e02_f681;
const ITEM_SIZE: f32 = 16.0;
const SMASH_BASE_POINTS: u32 = 100;
const SMASH_STREAK_CAP: u32 = 5;

/// Static level geometry placed by a blueprint.
#[derive(Debug)]
struct Tile {
    id: EntityId,
    rect: Rect,
    sprite: u32,
    solid: bool,
    background: bool,
}

/// Climbable ladder segment.
#[derive(Clone, Debug)]
pub(crate) struct Ladder {
    pub(crate) id: EntityId,
    pub(crate) rect: Rect,
    pub(crate) usable: bool,
}

/// Floating collectible awaiting pickup.
#[derive(Debug)]
struct Item {
    id: EntityId,
    kind: ItemKind,
    rect: Rect,
    taken: bool,
}

/// Represents the authoritative Girder Rescue world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tiles: Vec<Tile>,
    ladders: Vec<Ladder>,
    platforms: Vec<Platform>,
    enemies: Vec<Enemy>,
    items: Vec<Item>,
    captor: Option<Npc>,
    captive: Option<Npc>,
    player: Player,
    input: InputState,
    flow: LevelFlow,
    progress: GameProgress,
    tick_index: u64,
    rng_state: u64,
    next_entity: u32,
}

impl World {
    /// Creates an empty world waiting for its first level blueprint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            tiles: Vec::new(),
            ladders: Vec::new(),
            platforms: Vec::new(),
            enemies: Vec::new(),
            items: Vec::new(),
            captor: None,
            captive: None,
            player: Player::at_spawn(girder_rescue_core::SpawnPoint { x: 0.0, y: 0.0 }),
            input: InputState::default(),
            flow: LevelFlow::idle(),
            progress: GameProgress::default(),
            tick_index: 0,
            rng_state: WORLD_RNG_SEED,
            next_entity: 0,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity);
        self.next_entity = self.next_entity.wrapping_add(1);
        id
    }

    fn solid_rects(&self) -> Vec<Rect> {
        let mut solids: Vec<Rect> = self
            .tiles
            .iter()
            .filter(|tile| tile.solid)
            .map(|tile| tile.rect)
            .collect();
        solids.extend(
            self.platforms
                .iter()
                .filter(|platform| platform.visible)
                .map(|platform| platform.rect),
        );
        solids
    }

    fn load_blueprint(&mut self, blueprint: LevelBlueprint, out_events: &mut Vec<Event>) {
        let from = self.flow.phase();

        self.tiles.clear();
        for def in &blueprint.tiles {
            let id = self.allocate_id();
            self.tiles.push(Tile {
                id,
                rect: def.rect,
                sprite: def.sprite,
                solid: def.solid,
                background: def.background,
            });
        }

        self.ladders.clear();
        for def in &blueprint.ladders {
            let id = self.allocate_id();
            self.ladders.push(Ladder {
                id,
                rect: def.rect,
                usable: def.usable,
            });
        }

        self.platforms.clear();
        for def in &blueprint.platforms {
            let id = self.allocate_id();
            self.platforms.push(Platform::from_def(id, def));
        }

        self.items.clear();
        self.enemies.clear();
        for def in &blueprint.static_flames {
            let id = self.allocate_id();
            self.enemies
                .push(Enemy::flame(id, def.at.x, def.at.y, def.behavior, def.facing));
            out_events.push(Event::EnemySpawned {
                id,
                kind: EntityKind::Flame,
                behavior: def.behavior,
            });
        }

        let captor_id = self.allocate_id();
        self.captor = Some(Npc::captor(captor_id, blueprint.captor));
        let captive_id = self.allocate_id();
        self.captive = Some(Npc::captive(captive_id, blueprint.captive));

        self.player = Player::at_spawn(blueprint.player_spawn);
        self.input.clear();
        self.progress.level = blueprint.level;
        self.flow = LevelFlow::begin(blueprint.level, blueprint.final_level, blueprint.exit);

        out_events.push(Event::LevelLoaded {
            level: blueprint.level,
        });
        if from != LevelPhase::Playing {
            out_events.push(Event::LevelPhaseChanged {
                from,
                to: LevelPhase::Playing,
            });
        }
        log::info!("level {} loaded", blueprint.level);
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        match self.flow.phase() {
            LevelPhase::Playing => self.tick_playing(out_events),
            LevelPhase::Victory | LevelPhase::Transition => {
                self.flow
                    .tick(self.captor.as_mut(), self.captive.as_mut(), out_events);
            }
            LevelPhase::Loading => {}
        }

        self.enemies.retain(|enemy| enemy.alive);
        self.items.retain(|item| !item.taken);
    }

    fn tick_playing(&mut self, out_events: &mut Vec<Event>) {
        self.tick_platforms();

        let solids = self.solid_rects();
        self.player.tick(
            &self.input,
            &solids,
            &self.ladders,
            self.progress.lives,
            out_events,
        );

        self.tick_enemies(&solids, out_events);
        self.tick_items(out_events);
        self.check_rescue(out_events);
    }

    /// Platforms advance before the player so riders inherit this update's
    /// motion rather than last update's.
    fn tick_platforms(&mut self) {
        let status = self.player.status();
        let riding = status.grounded && !status.climbing;
        let feet = Rect::new(
            status.rect.x + status.rect.w / 4.0,
            status.rect.y + status.rect.h - 2.0,
            status.rect.w / 2.0,
            4.0,
        );

        let mut carry = (0.0, 0.0);
        for platform in &mut self.platforms {
            let (dx, dy) = platform.tick();
            if riding && platform.carries(&feet) {
                carry.0 += dx;
                carry.1 += dy;
            }
        }
        self.player.rect.x += carry.0;
        self.player.rect.y += carry.1;
    }

    /// Enemies run against an id snapshot so spawns or removals during the
    /// pass never disturb iteration.
    fn tick_enemies(&mut self, solids: &[Rect], out_events: &mut Vec<Event>) {
        let ids: Vec<EntityId> = self.enemies.iter().map(|enemy| enemy.id).collect();
        for id in ids {
            let Some(index) = self.enemies.iter().position(|enemy| enemy.id == id) else {
                continue;
            };

            let player_center = (self.player.rect.center_x(), self.player.rect.center_y());
            let player_alive = self.player.is_alive();

            let in_level = self.enemies[index].tick(
                player_center,
                player_alive,
                solids,
                &mut self.rng_state,
            );
            if !in_level {
                self.enemies[index].destroy();
                out_events.push(Event::EnemyDestroyed {
                    id,
                    by_hammer: false,
                });
                continue;
            }

            if !player_alive || !self.enemies[index].alive {
                continue;
            }
            if !self.enemies[index]
                .contact_rect()
                .intersects(&self.player.hazard_rect())
            {
                continue;
            }

            if self.player.hammer_armed() {
                self.enemies[index].destroy();
                self.progress.streak += 1;
                self.progress.best_streak = self.progress.best_streak.max(self.progress.streak);
                self.progress.enemies_defeated += 1;
                let points = SMASH_BASE_POINTS * self.progress.streak.min(SMASH_STREAK_CAP);
                out_events.push(Event::Player(PlayerEvent::EnemySmashed { points }));
                out_events.push(Event::EnemyDestroyed {
                    id,
                    by_hammer: true,
                });
            } else {
                let source = match self.enemies[index].kind {
                    EntityKind::Barrel => DamageSource::Barrel,
                    _ => DamageSource::Flame,
                };
                self.player.damage(source, out_events);
            }
        }
    }

    fn tick_items(&mut self, out_events: &mut Vec<Event>) {
        if !self.player.is_alive() {
            return;
        }
        let body = self.player.rect;
        let mut hammer_collected = false;
        for item in &mut self.items {
            if item.taken || !item.rect.intersects(&body) {
                continue;
            }
            item.taken = true;
            out_events.push(Event::Player(PlayerEvent::ItemCollected {
                item: item.kind,
                points: item.kind.points(),
            }));
            if item.kind == ItemKind::Hammer {
                hammer_collected = true;
            }
        }
        if hammer_collected {
            self.player.arm_hammer();
            out_events.push(Event::Player(PlayerEvent::PowerUpActivated {
                power: PowerUp::Hammer,
            }));
        }
    }

    fn check_rescue(&mut self, out_events: &mut Vec<Event>) {
        if !self.player.is_alive() {
            return;
        }
        let Some(captive) = &self.captive else {
            return;
        };
        let dx = (self.player.rect.center_x() - captive.rect.center_x()).abs();
        let dy = (self.player.rect.center_y() - captive.rect.center_y()).abs();
        if dx < level::RESCUE_RANGE && dy < level::RESCUE_RANGE {
            self.flow.trigger_victory(out_events);
        }
    }

    fn spawn_flame(
        &mut self,
        x: f32,
        y: f32,
        behavior: EnemyBehavior,
        facing: Facing,
        out_events: &mut Vec<Event>,
    ) {
        if self.flow.phase() != LevelPhase::Playing {
            log::debug!("ignoring flame spawn outside playing phase");
            return;
        }
        let id = self.allocate_id();
        self.enemies.push(Enemy::flame(id, x, y, behavior, facing));
        out_events.push(Event::EnemySpawned {
            id,
            kind: EntityKind::Flame,
            behavior,
        });
    }

    fn spawn_barrel(&mut self, x: f32, y: f32, facing: Facing, out_events: &mut Vec<Event>) {
        if self.flow.phase() != LevelPhase::Playing {
            log::debug!("ignoring barrel spawn outside playing phase");
            return;
        }
        let id = self.allocate_id();
        self.enemies.push(Enemy::barrel(id, x, y, facing));
        out_events.push(Event::EnemySpawned {
            id,
            kind: EntityKind::Barrel,
            behavior: EnemyBehavior::Patrol,
        });
    }

    fn spawn_item(&mut self, x: f32, y: f32, kind: ItemKind) {
        if self.flow.phase() != LevelPhase::Playing {
            log::debug!("ignoring item spawn outside playing phase");
            return;
        }
        let id = self.allocate_id();
        self.items.push(Item {
            id,
            kind,
            rect: Rect::new(x, y, ITEM_SIZE, ITEM_SIZE),
            taken: false,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { blueprint } => world.load_blueprint(blueprint, out_events),
        Command::Tick => world.tick(out_events),
        Command::Input { intent, pressed } => world.input.set(intent, pressed),
        Command::SpawnFlame {
            x,
            y,
            behavior,
            facing,
        } => world.spawn_flame(x, y, behavior, facing, out_events),
        Command::SpawnBarrel { x, y, facing } => world.spawn_barrel(x, y, facing, out_events),
        Command::SpawnItem { x, y, item } => world.spawn_item(x, y, item),
        Command::AddScore { points } => {
            world.progress.score = world.progress.score.saturating_add(points);
        }
        Command::LoseLife => {
            world.progress.lives = world.progress.lives.saturating_sub(1);
        }
        Command::ResetStreak => world.progress.streak = 0,
        Command::CancelPowerUp => {
            if world.player.disarm_hammer() {
                out_events.push(Event::Player(PlayerEvent::PowerUpExpired {
                    power: PowerUp::Hammer,
                }));
            }
        }
        Command::ResetProgress => world.progress.reset(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use girder_rescue_core::{
        EntityKind, EntitySnapshot, EntityView, Facing, GameProgress, LevelPhase, PlayerStatus,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Copies the shared lives/score/level tally.
    #[must_use]
    pub fn progress(world: &World) -> GameProgress {
        world.progress
    }

    /// Reports the active level-flow phase.
    #[must_use]
    pub fn level_phase(world: &World) -> LevelPhase {
        world.flow.phase()
    }

    /// Total updates applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only summary of the player.
    #[must_use]
    pub fn player_status(world: &World) -> PlayerStatus {
        world.player.status()
    }

    /// Number of flames currently alive, used to gate the flame spawner.
    #[must_use]
    pub fn flame_count(world: &World) -> u32 {
        world
            .enemies
            .iter()
            .filter(|enemy| enemy.alive && enemy.kind == EntityKind::Flame)
            .count() as u32
    }

    /// Captures a read-only view of every non-player entity in the level.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        let mut snapshots = Vec::new();

        for tile in &world.tiles {
            snapshots.push(EntitySnapshot {
                id: tile.id,
                kind: EntityKind::Tile,
                rect: tile.rect,
                facing: Facing::Right,
                visible: true,
                background: tile.background,
                sprite: tile.sprite,
                behavior: None,
                item: None,
            });
        }
        for ladder in &world.ladders {
            snapshots.push(EntitySnapshot {
                id: ladder.id,
                kind: EntityKind::Ladder,
                rect: ladder.rect,
                facing: Facing::Right,
                visible: true,
                background: false,
                sprite: u32::from(!ladder.usable),
                behavior: None,
                item: None,
            });
        }
        for platform in &world.platforms {
            snapshots.push(EntitySnapshot {
                id: platform.id,
                kind: EntityKind::Tile,
                rect: platform.rect,
                facing: Facing::Right,
                visible: platform.visible,
                background: false,
                sprite: platform.sprite,
                behavior: None,
                item: None,
            });
        }
        for enemy in &world.enemies {
            snapshots.push(EntitySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                rect: enemy.rect,
                facing: enemy.facing,
                visible: enemy.alive,
                background: false,
                sprite: 0,
                behavior: Some(enemy.behavior),
                item: None,
            });
        }
        for item in &world.items {
            snapshots.push(EntitySnapshot {
                id: item.id,
                kind: EntityKind::Item,
                rect: item.rect,
                facing: Facing::Right,
                visible: !item.taken,
                background: false,
                sprite: 0,
                behavior: None,
                item: Some(item.kind),
            });
        }
        for npc in [&world.captor, &world.captive].into_iter().flatten() {
            snapshots.push(EntitySnapshot {
                id: npc.id,
                kind: npc.kind,
                rect: npc.rect,
                facing: Facing::Left,
                visible: npc.visible,
                background: false,
                sprite: npc.sprite,
                behavior: None,
                item: None,
            });
        }

        EntityView::from_snapshots(snapshots)
    }
}

pub(crate) fn next_random(state: u64) -> u64 {
    state
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1)
}
