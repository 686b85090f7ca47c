//! Terminal rendering backend for the demo subcommand.
//!
//! Draws each scene as a coarse character grid: one glyph per entity family,
//! tinted with the family's fallback color through ANSI truecolor escapes.
//! The grid is re-printed once per second together with the HUD line.

use std::{
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use girder_rescue_core::{EntityKind, TICKS_PER_SECOND};
use girder_rescue_rendering::{
    fallback_color, Color, DrawLayer, Presentation, RenderingBackend, Scene, SpriteRequest,
    Viewport,
};

const COLUMNS: usize = 64;
const ROWS: usize = 16;

/// Backend that paces the simulation against the wall clock and prints
/// frames to stdout.
pub(crate) struct TerminalBackend {
    seconds: u64,
}

impl TerminalBackend {
    pub(crate) fn new(seconds: u64) -> Self {
        Self { seconds }
    }
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            viewport,
            mut scene,
        } = presentation;
        println!("{window_title}");

        let tick_length = Duration::from_secs(1) / TICKS_PER_SECOND;
        let deadline = Instant::now() + Duration::from_secs(self.seconds);
        let mut previous = Instant::now();
        let mut accumulator = Duration::ZERO;
        let mut last_report = Instant::now();
        let mut ticks_since_report = 0u32;

        while Instant::now() < deadline {
            let now = Instant::now();
            accumulator += now - previous;
            previous = now;

            while accumulator >= tick_length {
                accumulator -= tick_length;
                update_scene(tick_length, &mut scene);
                ticks_since_report += 1;
            }

            if last_report.elapsed() >= Duration::from_secs(1) {
                last_report = Instant::now();
                log::info!("{ticks_since_report} ticks in the last second");
                ticks_since_report = 0;
                print!("{}", render_frame(&scene, viewport));
            }

            thread::sleep(Duration::from_millis(1));
        }

        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

fn glyph_for(kind: EntityKind) -> char {
    match kind {
        EntityKind::Player => '@',
        EntityKind::Tile => '=',
        EntityKind::Ladder => 'H',
        EntityKind::Barrel => 'o',
        EntityKind::Flame => '*',
        EntityKind::Captor => 'K',
        EntityKind::Captive => '?',
        EntityKind::Item => '$',
        EntityKind::Effect => '.',
    }
}

fn cell_for(request: &SpriteRequest) -> Cell {
    let color = fallback_color(request.kind);
    // Backdrop tiles wash toward white so solid terrain stays readable.
    let color = if request.layer == DrawLayer::Background {
        color.lighten(0.5)
    } else {
        color
    };

    Cell {
        glyph: glyph_for(request.kind),
        color,
    }
}

/// Rasterizes the scene's draw list into the character grid.
///
/// Sprites arrive sorted back to front, so later requests overwrite
/// earlier ones cell by cell.
fn compose(scene: &Scene, viewport: Viewport) -> Vec<Vec<Option<Cell>>> {
    let mut grid = vec![vec![None; COLUMNS]; ROWS];
    let cell_w = viewport.width / COLUMNS as f32;
    let cell_h = viewport.height / ROWS as f32;

    for request in &scene.sprites {
        let cell = cell_for(request);
        let left = ((request.rect.x - scene.camera.x) / cell_w).floor() as i32;
        let right = ((request.rect.x + request.rect.w - scene.camera.x) / cell_w).ceil() as i32;
        let top = ((request.rect.y - scene.camera.y) / cell_h).floor() as i32;
        let bottom = ((request.rect.y + request.rect.h - scene.camera.y) / cell_h).ceil() as i32;

        for row in top.max(0)..bottom.min(ROWS as i32) {
            for col in left.max(0)..right.min(COLUMNS as i32) {
                grid[row as usize][col as usize] = Some(cell);
            }
        }
    }

    grid
}

fn ansi(color: Color) -> String {
    let red = (color.red * 255.0).round() as u8;
    let green = (color.green * 255.0).round() as u8;
    let blue = (color.blue * 255.0).round() as u8;
    format!("\x1b[38;2;{red};{green};{blue}m")
}

fn status_line(scene: &Scene) -> String {
    match (&scene.hud, &scene.overlay) {
        (Some(hud), Some(overlay)) => format!("{}  [{}]", hud.status_line(), overlay.title),
        (Some(hud), None) => hud.status_line(),
        (None, Some(overlay)) => overlay.title.clone(),
        (None, None) => String::new(),
    }
}

fn render_frame(scene: &Scene, viewport: Viewport) -> String {
    let mut out = status_line(scene);
    out.push('\n');
    for row in compose(scene, viewport) {
        for cell in row {
            match cell {
                Some(cell) => {
                    out.push_str(&ansi(cell.color));
                    out.push(cell.glyph);
                }
                None => out.push(' '),
            }
        }
        out.push_str("\x1b[0m\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_rescue_core::{
        EntityId, EntitySnapshot, EntityView, Facing, GameProgress, LevelPhase, LifePhase,
        PlayerStatus, Rect, Screen,
    };
    use girder_rescue_rendering::build_scene;

    fn snapshot(id: u32, kind: EntityKind, rect: Rect) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(id),
            kind,
            rect,
            facing: Facing::Right,
            visible: true,
            background: false,
            sprite: 0,
            behavior: None,
            item: None,
        }
    }

    fn scene() -> Scene {
        let view = EntityView::from_snapshots(vec![
            snapshot(1, EntityKind::Tile, Rect::new(0.0, 450.0, 640.0, 16.0)),
            snapshot(2, EntityKind::Flame, Rect::new(200.0, 420.0, 24.0, 24.0)),
        ]);
        let player = PlayerStatus {
            phase: LifePhase::Alive,
            rect: Rect::new(100.0, 60.0, 24.0, 32.0),
            facing: Facing::Right,
            climbing: false,
            grounded: true,
            invulnerable: false,
            visible: true,
            hammer_ticks: 0,
            death_frame: 0,
        };
        build_scene(
            Screen::Playing,
            &view,
            &player,
            &GameProgress::default(),
            LevelPhase::Playing,
            viewport(),
        )
    }

    fn viewport() -> Viewport {
        Viewport::new(640.0, 480.0).expect("valid viewport")
    }

    #[test]
    fn compose_places_glyphs_at_their_world_cells() {
        let grid = compose(&scene(), viewport());

        // Cells are 10x30 world units; the level fits, so the camera is zero.
        assert_eq!(grid[2][10].expect("player cell").glyph, '@');
        assert_eq!(grid[14][20].expect("flame cell").glyph, '*');
        assert_eq!(grid[15][0].expect("floor cell").glyph, '=');
        assert!(grid[0][0].is_none());
    }

    #[test]
    fn backdrop_tiles_render_lighter_than_terrain() {
        let terrain = cell_for(&SpriteRequest::new(
            DrawLayer::Terrain,
            EntityKind::Tile,
            0,
            Rect::new(0.0, 0.0, 32.0, 16.0),
            false,
        ));
        let backdrop = cell_for(&SpriteRequest::new(
            DrawLayer::Background,
            EntityKind::Tile,
            0,
            Rect::new(0.0, 0.0, 32.0, 16.0),
            false,
        ));

        assert_eq!(terrain.glyph, backdrop.glyph);
        assert!(backdrop.color.red > terrain.color.red);
        assert!(backdrop.color.blue > terrain.color.blue);
    }

    #[test]
    fn frame_header_combines_hud_and_overlay() {
        let mut scene = scene();
        assert_eq!(status_line(&scene), "Lives 3  Score 0  Level 1");

        scene.overlay = Some(girder_rescue_rendering::OverlayPresentation::new(
            "Level Clear",
            Vec::new(),
        ));
        assert_eq!(
            status_line(&scene),
            "Lives 3  Score 0  Level 1  [Level Clear]"
        );
    }
}
