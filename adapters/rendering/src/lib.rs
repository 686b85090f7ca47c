#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Girder Rescue adapters.
//!
//! Backends never touch the world directly. The adapter gathers read-only
//! views through world queries, asks [`build_scene`] for a layered draw list,
//! and hands the result to whichever [`RenderingBackend`] is active.

use anyhow::Result as AnyResult;
use girder_rescue_core::{
    EntityKind, EntitySnapshot, EntityView, Facing, GameProgress, LevelPhase, LifePhase,
    PlayerStatus, Rect, Screen, WELCOME_BANNER,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Placeholder fill used by backends that have no sprite sheet loaded.
#[must_use]
pub fn fallback_color(kind: EntityKind) -> Color {
    match kind {
        EntityKind::Player => Color::from_rgb_u8(220, 60, 60),
        EntityKind::Tile => Color::from_rgb_u8(120, 90, 50),
        EntityKind::Ladder => Color::from_rgb_u8(200, 180, 80),
        EntityKind::Barrel => Color::from_rgb_u8(150, 100, 40),
        EntityKind::Flame => Color::from_rgb_u8(255, 140, 30),
        EntityKind::Captor => Color::from_rgb_u8(90, 60, 120),
        EntityKind::Captive => Color::from_rgb_u8(250, 200, 220),
        EntityKind::Item => Color::from_rgb_u8(80, 200, 120),
        EntityKind::Effect => Color::from_rgb_u8(230, 230, 230),
    }
}

/// Draw layers ordered back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrawLayer {
    /// Decorative tiles behind everything else.
    Background,
    /// Solid tiles and moving platforms.
    Terrain,
    /// Ladders drawn over the terrain they connect.
    Ladders,
    /// Collectible items resting on platforms.
    Items,
    /// Enemies and level inhabitants.
    Actors,
    /// Short-lived visual effects.
    Effects,
    /// The player, always on top of the playfield.
    Player,
}

/// Single sprite draw request expressed in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRequest {
    /// Layer the sprite belongs to.
    pub layer: DrawLayer,
    /// Entity family used to select a sprite sheet.
    pub kind: EntityKind,
    /// Frame index within the sheet.
    pub sprite: u32,
    /// Destination rectangle in world units.
    pub rect: Rect,
    /// Whether the sprite should be mirrored horizontally.
    pub flipped: bool,
}

impl SpriteRequest {
    /// Creates a new sprite draw request.
    #[must_use]
    pub const fn new(
        layer: DrawLayer,
        kind: EntityKind,
        sprite: u32,
        rect: Rect,
        flipped: bool,
    ) -> Self {
        Self {
            layer,
            kind,
            sprite,
            rect,
            flipped,
        }
    }
}

/// Heads-up display summary drawn over the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Lives remaining.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// One-based level number.
    pub level: u32,
    /// Ticks of hammer time left, zero when unarmed.
    pub hammer_ticks: u32,
}

impl HudPresentation {
    /// Single-line HUD text for backends without layout support.
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.hammer_ticks > 0 {
            format!(
                "Lives {}  Score {}  Level {}  Hammer {}",
                self.lives, self.score, self.level, self.hammer_ticks
            )
        } else {
            format!(
                "Lives {}  Score {}  Level {}",
                self.lives, self.score, self.level
            )
        }
    }
}

/// Full-screen overlay shown when gameplay is not the active surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayPresentation {
    /// Headline text centered on screen.
    pub title: String,
    /// Supporting lines rendered under the headline.
    pub lines: Vec<String>,
}

impl OverlayPresentation {
    /// Creates a new overlay descriptor.
    #[must_use]
    pub fn new<T>(title: T, lines: Vec<String>) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            lines,
        }
    }
}

/// Visible slice of the level expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width of the visible area.
    pub width: f32,
    /// Height of the visible area.
    pub height: f32,
}

impl Viewport {
    /// Creates a new viewport.
    ///
    /// Returns an error when either dimension is not positive.
    pub fn new(width: f32, height: f32) -> std::result::Result<Self, RenderingError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(RenderingError::InvalidViewport { width, height });
        }

        Ok(Self { width, height })
    }

    /// Camera origin that centers the target while staying inside the level.
    #[must_use]
    pub fn camera_for(&self, target: Vec2, level_size: Vec2) -> Vec2 {
        let max_x = (level_size.x - self.width).max(0.0);
        let max_y = (level_size.y - self.height).max(0.0);

        Vec2::new(
            (target.x - self.width * 0.5).clamp(0.0, max_x),
            (target.y - self.height * 0.5).clamp(0.0, max_y),
        )
    }
}

/// Scene description combining the layered draw list, camera and HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Camera origin in world units.
    pub camera: Vec2,
    /// Sprites sorted back to front.
    pub sprites: Vec<SpriteRequest>,
    /// HUD summary, present only while a level is on screen.
    pub hud: Option<HudPresentation>,
    /// Full-screen overlay replacing or covering the playfield.
    pub overlay: Option<OverlayPresentation>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Visible slice of the level.
    pub viewport: Viewport,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, viewport: Viewport, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            viewport,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Girder Rescue scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and may replace the scene before it is rendered, allowing adapters to
    /// animate world snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static;
}

const CLEAR_COLOR: Color = Color::from_rgb_u8(12, 12, 24);

/// Picks the player's animation frame from its life-state summary.
///
/// `death_frame` already arrives as a 0..=5 animation index, so the death
/// arc maps straight onto sprites 4..=9.
#[must_use]
pub fn player_sprite(player: &PlayerStatus) -> u32 {
    match player.phase {
        LifePhase::Dying | LifePhase::Dead => 4 + player.death_frame.min(5),
        _ if player.climbing => 2,
        _ if player.hammer_ticks > 0 => 3,
        _ if !player.grounded => 1,
        _ => 0,
    }
}

/// Builds the layered scene for the active screen.
///
/// Gameplay layering runs background tiles, terrain, ladders, items, actors,
/// effects, and the player last. Entities flagged invisible (blinking
/// platforms, hidden captors, the respawn shield off-frames) are skipped
/// rather than dimmed so headless backends stay byte-deterministic.
#[must_use]
pub fn build_scene(
    screen: Screen,
    view: &EntityView,
    player: &PlayerStatus,
    progress: &GameProgress,
    phase: LevelPhase,
    viewport: Viewport,
) -> Scene {
    let overlay = overlay_for(screen, progress, phase);
    if screen != Screen::Playing {
        return Scene {
            clear_color: CLEAR_COLOR,
            camera: Vec2::ZERO,
            sprites: Vec::new(),
            hud: None,
            overlay,
        };
    }

    let mut sprites = Vec::new();
    for snapshot in view.iter() {
        if let Some(request) = sprite_for(snapshot) {
            sprites.push(request);
        }
    }

    if player.visible {
        sprites.push(SpriteRequest::new(
            DrawLayer::Player,
            EntityKind::Player,
            player_sprite(player),
            player.rect,
            player.facing == Facing::Left,
        ));
    }

    sprites.sort_by_key(|request| request.layer);

    let level_size = level_extent(view);
    let target = Vec2::new(player.rect.center_x(), player.rect.center_y());

    Scene {
        clear_color: CLEAR_COLOR,
        camera: viewport.camera_for(target, level_size),
        sprites,
        hud: Some(HudPresentation {
            lives: progress.lives,
            score: progress.score,
            level: progress.level,
            hammer_ticks: player.hammer_ticks,
        }),
        overlay,
    }
}

fn sprite_for(snapshot: &EntitySnapshot) -> Option<SpriteRequest> {
    if !snapshot.visible {
        return None;
    }

    let layer = match snapshot.kind {
        EntityKind::Tile if snapshot.background => DrawLayer::Background,
        EntityKind::Tile => DrawLayer::Terrain,
        EntityKind::Ladder => DrawLayer::Ladders,
        EntityKind::Item => DrawLayer::Items,
        EntityKind::Effect => DrawLayer::Effects,
        EntityKind::Player => return None,
        _ => DrawLayer::Actors,
    };

    Some(SpriteRequest::new(
        layer,
        snapshot.kind,
        snapshot.sprite,
        snapshot.rect,
        snapshot.facing == Facing::Left,
    ))
}

fn level_extent(view: &EntityView) -> Vec2 {
    let mut extent = Vec2::ZERO;
    for snapshot in view.iter() {
        if snapshot.kind == EntityKind::Tile {
            extent.x = extent.x.max(snapshot.rect.x + snapshot.rect.w);
            extent.y = extent.y.max(snapshot.rect.y + snapshot.rect.h);
        }
    }
    extent
}

fn overlay_for(
    screen: Screen,
    progress: &GameProgress,
    phase: LevelPhase,
) -> Option<OverlayPresentation> {
    match screen {
        Screen::Menu => Some(OverlayPresentation::new(
            WELCOME_BANNER,
            vec![
                String::from("Press Start to play"),
                String::from("Press Controls for the key reference"),
            ],
        )),
        Screen::Controls => Some(OverlayPresentation::new(
            "Controls",
            vec![
                String::from("Arrows - walk and climb"),
                String::from("Space  - jump"),
                String::from("P      - pause"),
            ],
        )),
        Screen::GameOver => Some(OverlayPresentation::new(
            "Game Over",
            vec![format!("Final score {}", progress.score)],
        )),
        Screen::Victory => Some(OverlayPresentation::new(
            "Rescue Complete",
            vec![format!("Final score {}", progress.score)],
        )),
        Screen::Playing => match phase {
            LevelPhase::Victory => Some(OverlayPresentation::new("Level Clear", Vec::new())),
            _ => None,
        },
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewport dimensions must be positive to give the camera an area.
    InvalidViewport {
        /// Provided width that failed validation.
        width: f32,
        /// Provided height that failed validation.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(
                    f,
                    "viewport dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
