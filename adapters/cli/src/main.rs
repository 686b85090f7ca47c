#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots headless Girder Rescue sessions.
//!
//! The binary wires the world, the pure systems, and the player event bus
//! into a fixed-timestep loop. `run` replays a deterministic number of ticks
//! as fast as possible (optionally driven by a TOML input script), while
//! `demo` paces the same loop against the wall clock through the terminal
//! rendering backend.

mod backend;
mod levels;
mod script;

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use backend::TerminalBackend;
use clap::{Parser, Subcommand};
use girder_rescue_core::{Command, Event, LevelBlueprint, Screen, WELCOME_BANNER};
use girder_rescue_events::{PlayerBus, PlayerObserver, PowerUpRelay, ProgressRelay};
use girder_rescue_rendering::{build_scene, Presentation, RenderingBackend, Scene, Viewport};
use girder_rescue_system_session::{Session, SessionInput, SessionView};
use girder_rescue_system_spawning::{SpawnContext, Spawning};
use girder_rescue_world::{apply, query, World};
use script::{Directive, InputScript, ScriptAction};

const VIEWPORT_WIDTH: f32 = 640.0;
const VIEWPORT_HEIGHT: f32 = 480.0;

#[derive(Parser)]
#[command(name = "girder-rescue", about = "Headless Girder Rescue runner")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Replays a fixed number of ticks as fast as possible.
    Run {
        /// Number of simulation ticks to replay.
        #[arg(long, default_value_t = 3_600)]
        ticks: u64,
        /// Seed for the spawning system's random stream.
        #[arg(long, default_value_t = 7)]
        seed: u64,
        /// TOML level blueprint replacing the matching built-in level.
        #[arg(long)]
        level_file: Option<PathBuf>,
        /// TOML input script replayed against the session.
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Runs the session against the wall clock, printing the HUD every second.
    Demo {
        /// Wall-clock seconds to keep the session alive.
        #[arg(long, default_value_t = 10)]
        seconds: u64,
        /// Seed for the spawning system's random stream.
        #[arg(long, default_value_t = 7)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Run {
            ticks,
            seed,
            level_file,
            script,
        } => run_headless(ticks, seed, level_file, script),
        CliCommand::Demo { seconds, seed } => run_demo(seconds, seed),
    }
}

/// Session wiring shared by both subcommands.
struct Harness {
    world: World,
    session: Session,
    spawning: Spawning,
    bus: PlayerBus,
    custom_level: Option<LevelBlueprint>,
}

impl Harness {
    fn new(seed: u64, custom_level: Option<LevelBlueprint>) -> Self {
        let mut bus = PlayerBus::new();
        let _ = bus.subscribe(Arc::new(ProgressRelay) as Arc<dyn PlayerObserver>);
        let _ = bus.subscribe(Arc::new(PowerUpRelay) as Arc<dyn PlayerObserver>);

        Self {
            world: World::new(),
            session: Session::new(),
            spawning: Spawning::new(seed),
            bus,
            custom_level,
        }
    }

    /// Leaves the menu and loads the first level.
    fn start(&mut self) -> Result<()> {
        let mut out = Vec::new();
        self.session.handle_input(SessionInput::Start, &mut out);
        let mut events = Vec::new();
        for command in out {
            apply(&mut self.world, command, &mut events);
        }
        self.load_level(1)
    }

    fn blueprint_for(&self, level: u32) -> LevelBlueprint {
        match &self.custom_level {
            Some(plan) if plan.level == level => plan.clone(),
            _ => levels::builtin(level),
        }
    }

    fn load_level(&mut self, level: u32) -> Result<()> {
        let plan = self.blueprint_for(level);
        self.spawning
            .configure(&plan)
            .with_context(|| format!("level {level} spawner configuration"))?;
        let mut events = Vec::new();
        apply(
            &mut self.world,
            Command::LoadLevel { blueprint: plan },
            &mut events,
        );
        Ok(())
    }

    /// Advances the session by one tick.
    ///
    /// Returns `false` when gameplay is suspended (menus, pause, game over)
    /// and no world tick ran.
    fn advance(&mut self, directives: &[Directive]) -> Result<bool> {
        let mut menu_out = Vec::new();
        for directive in directives {
            if directive.action == ScriptAction::Pause && directive.pressed {
                self.session
                    .handle_input(SessionInput::TogglePause, &mut menu_out);
            }
        }

        let mut events = Vec::new();
        for command in menu_out {
            apply(&mut self.world, command, &mut events);
        }

        if !self.session.is_playing() {
            return Ok(false);
        }

        for directive in directives {
            if let Some(intent) = directive.action.intent() {
                apply(
                    &mut self.world,
                    Command::Input {
                        intent,
                        pressed: directive.pressed,
                    },
                    &mut events,
                );
            }
        }

        events.clear();
        apply(&mut self.world, Command::Tick, &mut events);

        let mut followups = Vec::new();
        for event in &events {
            if let Event::Player(player_event) = event {
                self.bus.publish(player_event, &mut followups);
            }
        }

        let ctx = SpawnContext {
            level_phase: query::level_phase(&self.world),
            session_playing: self.session.is_playing(),
            live_flames: query::flame_count(&self.world),
        };
        self.spawning.handle(&events, ctx, &mut followups);

        let progress = query::progress(&self.world);
        let view = SessionView {
            lives: progress.lives,
            life_phase: query::player_status(&self.world).phase,
        };
        self.session.handle_events(&events, view);

        let requested: Vec<u32> = events
            .iter()
            .filter_map(|event| match event {
                Event::LevelLoadRequested { level } => Some(*level),
                _ => None,
            })
            .collect();

        for command in followups {
            apply(&mut self.world, command, &mut events);
        }
        for level in requested {
            self.load_level(level)?;
        }

        Ok(true)
    }

    fn scene(&self, viewport: Viewport) -> Scene {
        let view = query::entity_view(&self.world);
        build_scene(
            self.session.screen(),
            &view,
            &query::player_status(&self.world),
            &query::progress(&self.world),
            query::level_phase(&self.world),
            viewport,
        )
    }

    fn finished(&self) -> bool {
        matches!(self.session.screen(), Screen::GameOver | Screen::Victory)
    }

    fn print_summary(&self) {
        let progress = query::progress(&self.world);
        println!(
            "screen {:?}  tick {}  level {}  lives {}  score {}  best streak {}",
            self.session.screen(),
            query::tick_index(&self.world),
            progress.level,
            progress.lives,
            progress.score,
            progress.best_streak,
        );
    }
}

fn load_blueprint(path: &PathBuf) -> Result<LevelBlueprint> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading level file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing level file {}", path.display()))
}

fn run_headless(
    ticks: u64,
    seed: u64,
    level_file: Option<PathBuf>,
    script_path: Option<PathBuf>,
) -> Result<()> {
    let custom_level = level_file.as_ref().map(load_blueprint).transpose()?;
    let mut script = match script_path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading script {}", path.display()))?;
            InputScript::parse(&text)?
        }
        None => InputScript::empty(),
    };

    println!("{WELCOME_BANNER}");

    let mut harness = Harness::new(seed, custom_level);
    harness.start()?;

    for tick in 0..ticks {
        let due = script.take_due(tick).to_vec();
        let _ = harness.advance(&due)?;
        if harness.finished() {
            log::info!("session ended after {tick} ticks");
            break;
        }
    }

    harness.print_summary();
    Ok(())
}

fn run_demo(seconds: u64, seed: u64) -> Result<()> {
    let viewport = Viewport::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)?;
    let mut harness = Harness::new(seed, None);
    harness.start()?;

    let presentation = Presentation::new(WELCOME_BANNER, viewport, harness.scene(viewport));
    TerminalBackend::new(seconds).run(presentation, move |_delta, scene| {
        if !harness.finished() {
            if let Err(error) = harness.advance(&[]) {
                log::error!("demo tick failed: {error:#}");
            }
        }
        *scene = harness.scene(viewport);
    })
}
