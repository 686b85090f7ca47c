//! Deterministic replay coverage for the spawning system driving a live world.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use girder_rescue_core::{Command, Event, LevelBlueprint, Rect, SpawnPoint, SpawnerDef, TileDef};
use girder_rescue_events::{PlayerBus, PlayerObserver, PowerUpRelay, ProgressRelay};
use girder_rescue_system_spawning::{SpawnContext, Spawning};
use girder_rescue_world::{apply, query, World};

fn blueprint() -> LevelBlueprint {
    LevelBlueprint {
        level: 1,
        final_level: false,
        player_spawn: SpawnPoint { x: 50.0, y: 100.0 },
        exit: SpawnPoint { x: 0.0, y: 40.0 },
        tiles: vec![TileDef {
            rect: Rect::new(0.0, 132.0, 2000.0, 16.0),
            sprite: 10,
            solid: true,
            background: false,
        }],
        ladders: Vec::new(),
        platforms: Vec::new(),
        static_flames: Vec::new(),
        flame_spawner: SpawnerDef {
            active: true,
            points: vec![
                SpawnPoint { x: 400.0, y: 60.0 },
                SpawnPoint { x: 900.0, y: 60.0 },
            ],
        },
        flame_cap: 4,
        barrel_spawner: SpawnerDef {
            active: true,
            points: vec![SpawnPoint { x: 600.0, y: 60.0 }],
        },
        item_spawner: SpawnerDef {
            active: true,
            points: vec![SpawnPoint { x: 700.0, y: 110.0 }],
        },
        captor: SpawnPoint { x: 1800.0, y: 100.0 },
        captive: SpawnPoint { x: 1700.0, y: 100.0 },
    }
}

struct ReplayOutcome {
    commands_applied: usize,
    fingerprint: u64,
}

fn run_session(seed: u64, ticks: u32) -> ReplayOutcome {
    let mut world = World::new();
    let mut spawning = Spawning::new(seed);
    let mut bus = PlayerBus::new();
    assert!(bus.subscribe(Arc::new(ProgressRelay) as Arc<dyn PlayerObserver>));
    assert!(bus.subscribe(Arc::new(PowerUpRelay) as Arc<dyn PlayerObserver>));

    let plan = blueprint();
    let mut events = Vec::new();
    apply(&mut world, Command::LoadLevel { blueprint: plan.clone() }, &mut events);
    spawning.configure(&plan).expect("configure spawners");

    let mut hasher = DefaultHasher::new();
    let mut commands_applied = 0;

    for _ in 0..ticks {
        events.clear();
        apply(&mut world, Command::Tick, &mut events);

        let mut followups = Vec::new();
        for event in &events {
            if let Event::Player(player_event) = event {
                bus.publish(player_event, &mut followups);
            }
        }

        let ctx = SpawnContext {
            level_phase: query::level_phase(&world),
            session_playing: true,
            live_flames: query::flame_count(&world),
        };
        spawning.handle(&events, ctx, &mut followups);

        for command in followups {
            format!("{command:?}").hash(&mut hasher);
            commands_applied += 1;
            apply(&mut world, command, &mut events);
        }
    }

    ReplayOutcome {
        commands_applied,
        fingerprint: hasher.finish(),
    }
}

#[test]
fn identical_seeds_produce_identical_fingerprints() {
    let first = run_session(42, 3_000);
    let second = run_session(42, 3_000);
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(first.commands_applied, second.commands_applied);
    assert!(first.commands_applied > 0, "expected spawns over 3000 ticks");
}

#[test]
fn different_seeds_diverge() {
    let first = run_session(1, 3_000);
    let second = run_session(2, 3_000);
    assert_ne!(first.fingerprint, second.fingerprint);
}

#[test]
fn flame_population_respects_the_cap() {
    let mut world = World::new();
    let mut spawning = Spawning::new(9);
    let plan = blueprint();
    let mut events = Vec::new();
    apply(&mut world, Command::LoadLevel { blueprint: plan.clone() }, &mut events);
    spawning.configure(&plan).expect("configure spawners");

    for _ in 0..10_000 {
        events.clear();
        apply(&mut world, Command::Tick, &mut events);
        let ctx = SpawnContext {
            level_phase: query::level_phase(&world),
            session_playing: true,
            live_flames: query::flame_count(&world),
        };
        let mut out = Vec::new();
        spawning.handle(&events, ctx, &mut out);
        for command in out {
            apply(&mut world, command, &mut events);
        }
        assert!(query::flame_count(&world) <= plan.flame_cap);
    }
}
