#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Girder Rescue engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Girder Rescue.";

/// Number of simulation updates per second under the fixed timestep.
pub const TICKS_PER_SECOND: u32 = 60;

/// Lives granted when a fresh game begins.
pub const STARTING_LIVES: u32 = 3;

/// Highest level in the built-in campaign; completing it ends the game.
pub const FINAL_LEVEL: u32 = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the entity population with the contents of a blueprint.
    LoadLevel {
        /// Complete description of the level to instantiate.
        blueprint: LevelBlueprint,
    },
    /// Advances the simulation by exactly one fixed-timestep update.
    Tick,
    /// Records a change in the held state of a single input intent.
    Input {
        /// Intent whose held state changed.
        intent: InputIntent,
        /// Whether the intent is now held down.
        pressed: bool,
    },
    /// Requests that a flame enemy enter the world at the given position.
    SpawnFlame {
        /// Horizontal world coordinate of the spawn.
        x: f32,
        /// Vertical world coordinate of the spawn.
        y: f32,
        /// Behavior variant assigned to the flame.
        behavior: EnemyBehavior,
        /// Initial travel direction for the flame.
        facing: Facing,
    },
    /// Requests that a rolling barrel enter the world at the given position.
    SpawnBarrel {
        /// Horizontal world coordinate of the spawn.
        x: f32,
        /// Vertical world coordinate of the spawn.
        y: f32,
        /// Initial travel direction for the barrel.
        facing: Facing,
    },
    /// Requests that a collectible item appear at the given position.
    SpawnItem {
        /// Horizontal world coordinate of the spawn.
        x: f32,
        /// Vertical world coordinate of the spawn.
        y: f32,
        /// Kind of item to place.
        item: ItemKind,
    },
    /// Credits the provided points to the running score.
    AddScore {
        /// Points to add.
        points: u32,
    },
    /// Deducts one life from the shared progress tally.
    LoseLife,
    /// Resets the current kill-streak multiplier to zero.
    ResetStreak,
    /// Revokes any active power-up immediately.
    CancelPowerUp,
    /// Restores lives, score, streak, and level to their starting values.
    ResetProgress,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by one update.
    TimeAdvanced {
        /// Total updates applied since the world was created.
        tick: u64,
    },
    /// Wraps a notification about the player entity.
    Player(PlayerEvent),
    /// Confirms that an enemy was created by a spawner command.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        id: EntityId,
        /// Whether the enemy is a flame or a barrel.
        kind: EntityKind,
        /// Behavior variant the enemy runs.
        behavior: EnemyBehavior,
    },
    /// Confirms that an enemy left the world.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        id: EntityId,
        /// Whether the player's hammer caused the destruction.
        by_hammer: bool,
    },
    /// Announces that the level flow moved between phases.
    LevelPhaseChanged {
        /// Phase that was active before the change.
        from: LevelPhase,
        /// Phase that became active.
        to: LevelPhase,
    },
    /// Asks the hosting adapter to supply a blueprint for the given level.
    LevelLoadRequested {
        /// One-based level number being requested.
        level: u32,
    },
    /// Confirms that a blueprint was instantiated.
    LevelLoaded {
        /// One-based level number that is now active.
        level: u32,
    },
    /// Announces that the final level's rescue completed.
    GameCompleted,
}

/// Notifications describing the player's fortunes, published on the bus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerEvent {
    /// The player took a lethal hit.
    Damaged {
        /// What dealt the damage.
        source: DamageSource,
    },
    /// The death sequence finished and the player is out of play.
    Died,
    /// The player returned to the level spawn point.
    Respawned {
        /// Horizontal respawn coordinate.
        x: f32,
        /// Vertical respawn coordinate.
        y: f32,
    },
    /// The player picked up a collectible.
    ItemCollected {
        /// Kind of item collected.
        item: ItemKind,
        /// Points the item is worth.
        points: u32,
    },
    /// A power-up became active on the player.
    PowerUpActivated {
        /// Power that was armed.
        power: PowerUp,
    },
    /// An active power-up ran out or was revoked.
    PowerUpExpired {
        /// Power that ended.
        power: PowerUp,
    },
    /// The player destroyed an enemy with the hammer.
    EnemySmashed {
        /// Points the kill is worth after the streak multiplier.
        points: u32,
    },
}

/// Causes of lethal damage to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Contact with a flame enemy.
    Flame,
    /// Contact with a rolling barrel.
    Barrel,
    /// Falling out of the level.
    Fall,
}

/// Unique identifier assigned to a world entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Broad classification of every entity the world can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The controllable protagonist.
    Player,
    /// Static level geometry, solid or decorative.
    Tile,
    /// Climbable ladder segment.
    Ladder,
    /// Rolling barrel hazard.
    Barrel,
    /// Flame enemy.
    Flame,
    /// The antagonist holding the captive.
    Captor,
    /// The character the player is rescuing.
    Captive,
    /// Collectible item.
    Item,
    /// Transient visual effect.
    Effect,
}

/// Horizontal travel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    Right,
}

impl Facing {
    /// Signed unit factor for velocity math: -1.0 for left, 1.0 for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and dimensions.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Reports whether two rectangles overlap on both axes.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Reports whether the given point lies inside the rectangle.
    #[must_use]
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    /// Horizontal center of the rectangle.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Vertical center of the rectangle.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Returns a copy shrunk by the given margin on every side.
    #[must_use]
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            w: (self.w - margin * 2.0).max(0.0),
            h: (self.h - margin * 2.0).max(0.0),
        }
    }
}

/// The discrete intents a player can hold down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputIntent {
    /// Walk toward decreasing x.
    MoveLeft,
    /// Walk toward increasing x.
    MoveRight,
    /// Ascend a ladder.
    ClimbUp,
    /// Descend a ladder.
    ClimbDown,
    /// Leave the ground.
    Jump,
}

/// Behavior variant that parameterises the shared enemy tick routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Fixed in place; ignores gravity and never despawns by falling.
    Static,
    /// Walks at base speed, reversing on wall contact.
    Patrol,
    /// Patrols at elevated speed.
    Fast,
    /// Pursues the player while grounded and within sensing range.
    Chaser,
    /// Patrols and occasionally hops.
    Jumper,
}

/// Collectible items and their score values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Arms the hammer power-up in addition to scoring.
    Hammer,
    /// Lost parasol.
    Parasol,
    /// Lost handbag.
    Handbag,
    /// Lost bonnet.
    Bonnet,
}

impl ItemKind {
    /// Points credited when the item is collected.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Hammer => 300,
            Self::Parasol => 300,
            Self::Handbag => 500,
            Self::Bonnet => 200,
        }
    }
}

/// Temporary powers the player can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUp {
    /// Destroys enemies on contact and blocks climbing while armed.
    Hammer,
}

/// Phases of the player's life-state machine, exposed for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifePhase {
    /// Responsive to input and vulnerable to damage.
    Alive,
    /// Running the scripted death sequence.
    Dying,
    /// Out of play while the respawn decision is pending.
    Dead,
    /// Back at the spawn point, invulnerable and blinking.
    Respawning,
}

/// Phases of the per-level flow machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Normal simulation.
    Playing,
    /// Rescue cutscene in progress.
    Victory,
    /// Fade-out between levels.
    Transition,
    /// Waiting for the next blueprint.
    Loading,
}

/// Top-level screens managed by the session system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// Title menu.
    Menu,
    /// Active gameplay.
    Playing,
    /// Control reference screen.
    Controls,
    /// All lives spent.
    GameOver,
    /// Campaign completed.
    Victory,
}

/// Static tile placed by a blueprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    /// Body of the tile in world units.
    pub rect: Rect,
    /// Sprite identifier for renderers.
    pub sprite: u32,
    /// Whether the tile participates in collision.
    pub solid: bool,
    /// Whether the tile belongs to the far background layer.
    pub background: bool,
}

/// Ladder segment placed by a blueprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LadderDef {
    /// Body of the ladder in world units.
    pub rect: Rect,
    /// Broken ladders render but refuse climb engagement.
    pub usable: bool,
}

/// Motion profile for a moving platform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlatformMotion {
    /// Oscillates along the x axis between two limits.
    Horizontal {
        /// World units moved per update.
        speed: f32,
        /// Smallest x the platform reaches.
        min: f32,
        /// Largest x the platform reaches.
        max: f32,
    },
    /// Oscillates along the y axis between two limits.
    Vertical {
        /// World units moved per update.
        speed: f32,
        /// Smallest y the platform reaches.
        min: f32,
        /// Largest y the platform reaches.
        max: f32,
    },
    /// Alternates between solid-visible and intangible-invisible.
    Blinking {
        /// Updates spent visible each cycle.
        visible_ticks: u32,
        /// Updates spent invisible each cycle.
        invisible_ticks: u32,
    },
}

/// Moving platform placed by a blueprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    /// Body of the platform in world units.
    pub rect: Rect,
    /// Sprite identifier for renderers.
    pub sprite: u32,
    /// Motion profile driving the platform.
    pub motion: PlatformMotion,
}

/// World-space point used for spawns and exits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

/// Flame placed directly by a blueprint rather than a spawner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlameDef {
    /// Spawn location.
    pub at: SpawnPoint,
    /// Behavior variant for the flame.
    pub behavior: EnemyBehavior,
    /// Initial travel direction.
    pub facing: Facing,
}

/// Spawner placement data carried by a blueprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnerDef {
    /// Whether the spawner runs at all on this level.
    pub active: bool,
    /// Candidate emission points, chosen uniformly.
    pub points: Vec<SpawnPoint>,
}

impl SpawnerDef {
    /// A spawner that never fires, for levels that omit a hazard.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            active: false,
            points: Vec::new(),
        }
    }
}

/// Complete data needed to instantiate one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelBlueprint {
    /// One-based level number.
    pub level: u32,
    /// Completing a final level ends the campaign instead of advancing.
    pub final_level: bool,
    /// Where the player appears on load and respawn.
    pub player_spawn: SpawnPoint,
    /// Where the captor retreats to during the escape cutscene.
    pub exit: SpawnPoint,
    /// Static geometry.
    pub tiles: Vec<TileDef>,
    /// Climbable segments.
    pub ladders: Vec<LadderDef>,
    /// Moving platforms.
    pub platforms: Vec<PlatformDef>,
    /// Flames present from the first tick.
    pub static_flames: Vec<FlameDef>,
    /// Flame spawner placement.
    pub flame_spawner: SpawnerDef,
    /// Most flames allowed alive at once.
    pub flame_cap: u32,
    /// Barrel spawner placement.
    pub barrel_spawner: SpawnerDef,
    /// Item spawner placement.
    pub item_spawner: SpawnerDef,
    /// Where the captor stands.
    pub captor: SpawnPoint,
    /// Where the captive waits; reaching them wins the level.
    pub captive: SpawnPoint,
}

/// Shared tally of lives, score, and campaign position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    /// Lives remaining.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// One-based level currently loaded.
    pub level: u32,
    /// Consecutive hammer kills without dying.
    pub streak: u32,
    /// Longest streak achieved this game.
    pub best_streak: u32,
    /// Total enemies destroyed this game.
    pub enemies_defeated: u32,
}

impl GameProgress {
    /// Restores every field to its fresh-game value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for GameProgress {
    fn default() -> Self {
        Self {
            lives: STARTING_LIVES,
            score: 0,
            level: 1,
            streak: 0,
            best_streak: 0,
            enemies_defeated: 0,
        }
    }
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Identifier allocated by the world.
    pub id: EntityId,
    /// Classification of the entity.
    pub kind: EntityKind,
    /// Body rectangle in world units.
    pub rect: Rect,
    /// Travel direction, meaningful for mobile entities.
    pub facing: Facing,
    /// Whether renderers should draw the entity this frame.
    pub visible: bool,
    /// Whether the entity belongs to the far background layer.
    pub background: bool,
    /// Sprite identifier, where the entity carries one.
    pub sprite: u32,
    /// Behavior variant for enemies, absent otherwise.
    pub behavior: Option<EnemyBehavior>,
    /// Item kind for collectibles, absent otherwise.
    pub item: Option<ItemKind>,
}

/// Read-only snapshot describing all entities within the level.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// Read-only summary of the player used by systems and renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerStatus {
    /// Current life-state phase.
    pub phase: LifePhase,
    /// Body rectangle in world units.
    pub rect: Rect,
    /// Travel direction last applied.
    pub facing: Facing,
    /// Whether the player is attached to a ladder.
    pub climbing: bool,
    /// Whether the player is standing on solid ground.
    pub grounded: bool,
    /// Whether damage is currently ignored.
    pub invulnerable: bool,
    /// Whether renderers should draw the player this frame.
    pub visible: bool,
    /// Updates of hammer power remaining, zero when unarmed.
    pub hammer_ticks: u32,
    /// Frame index of the death animation while dying.
    pub death_frame: u32,
}
