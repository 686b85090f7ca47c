#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting flame, barrel, and
//! item spawn commands.
//!
//! Each hazard runs an interval spawner: a deadline drawn uniformly from a
//! per-kind tick range, a uniform choice among the level's spawn points, and
//! a per-kind gate and payload roll. All randomness flows through one seeded
//! ChaCha8 stream, so identical seeds replay identical command sequences.

use girder_rescue_core::{
    Command, EnemyBehavior, Event, Facing, ItemKind, LevelBlueprint, LevelPhase, SpawnPoint,
    SpawnerDef,
};
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Tick range between flame spawns.
pub const FLAME_INTERVAL: (u32, u32) = (180, 420);
/// Tick range between barrel spawns.
pub const BARREL_INTERVAL: (u32, u32) = (120, 300);
/// Tick range between item spawns.
pub const ITEM_INTERVAL: (u32, u32) = (300, 600);

const BARREL_RIGHT_BIAS_PERCENT: u32 = 71;

/// Validation failures raised while arming spawners from a blueprint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnerError {
    /// The interval range has `min` above `max`.
    #[error("spawn interval range is inverted: {min}..{max}")]
    InvertedInterval {
        /// Lower bound supplied.
        min: u32,
        /// Upper bound supplied.
        max: u32,
    },
    /// The interval upper bound is zero, so the spawner could never fire.
    #[error("spawn interval must be positive")]
    ZeroInterval,
    /// The spawner is active but the blueprint lists no spawn points.
    #[error("active spawner has no spawn points")]
    NoSpawnPoints,
}

/// Interval cadence shared by every spawner kind.
#[derive(Debug)]
struct Cadence {
    min: u32,
    max: u32,
    countdown: u32,
}

impl Cadence {
    fn new(min: u32, max: u32, rng: &mut ChaCha8Rng) -> Result<Self, SpawnerError> {
        if max == 0 {
            return Err(SpawnerError::ZeroInterval);
        }
        if min > max {
            return Err(SpawnerError::InvertedInterval { min, max });
        }
        let mut cadence = Self {
            min,
            max,
            countdown: 0,
        };
        cadence.rearm(rng);
        Ok(cadence)
    }

    fn rearm(&mut self, rng: &mut ChaCha8Rng) {
        self.countdown = rng.gen_range(self.min..=self.max);
    }

    /// Advances one tick; true when the deadline elapsed (and re-arms).
    fn advance(&mut self, rng: &mut ChaCha8Rng) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.rearm(rng);
            true
        } else {
            false
        }
    }
}

#[derive(Debug)]
struct Armed {
    cadence: Cadence,
    points: Vec<SpawnPoint>,
}

impl Armed {
    fn from_def(
        def: &SpawnerDef,
        interval: (u32, u32),
        rng: &mut ChaCha8Rng,
    ) -> Result<Option<Self>, SpawnerError> {
        if !def.active {
            return Ok(None);
        }
        if def.points.is_empty() {
            return Err(SpawnerError::NoSpawnPoints);
        }
        Ok(Some(Self {
            cadence: Cadence::new(interval.0, interval.1, rng)?,
            points: def.points.clone(),
        }))
    }

    fn pick_point(&self, rng: &mut ChaCha8Rng) -> SpawnPoint {
        let index = rng.gen_range(0..self.points.len());
        self.points[index]
    }
}

/// Read-only inputs the spawning system needs each pass.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext {
    /// Level-flow phase reported by the world.
    pub level_phase: LevelPhase,
    /// Whether the session screen accepts gameplay.
    pub session_playing: bool,
    /// Flames currently alive in the world.
    pub live_flames: u32,
}

/// Pure system that deterministically emits spawn commands while playing.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    flames: Option<Armed>,
    barrels: Option<Armed>,
    items: Option<Armed>,
    flame_cap: u32,
}

impl Spawning {
    /// Creates a disarmed spawning system from the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            flames: None,
            barrels: None,
            items: None,
            flame_cap: 0,
        }
    }

    /// Re-arms every spawner from a freshly loaded level blueprint.
    pub fn configure(&mut self, blueprint: &LevelBlueprint) -> Result<(), SpawnerError> {
        self.flames = Armed::from_def(&blueprint.flame_spawner, FLAME_INTERVAL, &mut self.rng)?;
        self.barrels = Armed::from_def(&blueprint.barrel_spawner, BARREL_INTERVAL, &mut self.rng)?;
        self.items = Armed::from_def(&blueprint.item_spawner, ITEM_INTERVAL, &mut self.rng)?;
        self.flame_cap = blueprint.flame_cap;
        Ok(())
    }

    /// Consumes events and the context view to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], ctx: SpawnContext, out: &mut Vec<Command>) {
        if !ctx.session_playing || ctx.level_phase != LevelPhase::Playing {
            return;
        }

        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();

        let mut pending_flames = 0;
        for _ in 0..ticks {
            if let Some(flames) = self.flames.as_mut() {
                if flames.cadence.advance(&mut self.rng)
                    && ctx.live_flames + pending_flames < self.flame_cap
                {
                    let at = flames.pick_point(&mut self.rng);
                    let behavior = roll_flame_behavior(&mut self.rng);
                    let facing = if self.rng.gen_range(0..2) == 0 {
                        Facing::Left
                    } else {
                        Facing::Right
                    };
                    out.push(Command::SpawnFlame {
                        x: at.x,
                        y: at.y,
                        behavior,
                        facing,
                    });
                    pending_flames += 1;
                }
            }

            if let Some(barrels) = self.barrels.as_mut() {
                if barrels.cadence.advance(&mut self.rng) {
                    let at = barrels.pick_point(&mut self.rng);
                    let facing = if self.rng.gen_range(0..100) < BARREL_RIGHT_BIAS_PERCENT {
                        Facing::Right
                    } else {
                        Facing::Left
                    };
                    out.push(Command::SpawnBarrel {
                        x: at.x,
                        y: at.y,
                        facing,
                    });
                }
            }

            if let Some(items) = self.items.as_mut() {
                if items.cadence.advance(&mut self.rng) {
                    let at = items.pick_point(&mut self.rng);
                    let item = roll_item_kind(&mut self.rng);
                    out.push(Command::SpawnItem {
                        x: at.x,
                        y: at.y,
                        item,
                    });
                }
            }
        }
    }
}

/// Behavior mix for spawned flames: mostly patrollers, with a fast and a
/// chasing minority.
fn roll_flame_behavior(rng: &mut ChaCha8Rng) -> EnemyBehavior {
    match rng.gen_range(0..100u32) {
        0..=69 => EnemyBehavior::Patrol,
        70..=89 => EnemyBehavior::Fast,
        _ => EnemyBehavior::Chaser,
    }
}

/// Item mix: the hammer stays rare relative to the lost belongings.
fn roll_item_kind(rng: &mut ChaCha8Rng) -> ItemKind {
    match rng.gen_range(0..100u32) {
        0..=9 => ItemKind::Hammer,
        10..=39 => ItemKind::Parasol,
        40..=64 => ItemKind::Handbag,
        _ => ItemKind::Bonnet,
    }
}
