//! Built-in campaign blueprints used when no level file is supplied.
//!
//! Coordinates grow rightward and downward. Every level keeps the same broad
//! shape as the first: a ground floor, stacked girder rows joined by ladders,
//! and the captor pair on the top row. Later levels layer in barrels, moving
//! platforms, and denser flame traffic.

use girder_rescue_core::{
    EnemyBehavior, Facing, FlameDef, LadderDef, LevelBlueprint, PlatformDef, PlatformMotion, Rect,
    SpawnPoint, SpawnerDef, TileDef, FINAL_LEVEL,
};

const LEVEL_WIDTH: f32 = 1280.0;
const GIRDER_HEIGHT: f32 = 16.0;
const LADDER_WIDTH: f32 = 16.0;
const ROW_GAP: f32 = 96.0;
const FLOOR_Y: f32 = 440.0;

/// Blueprint for one of the built-in campaign levels.
///
/// Levels past the end of the campaign fall back to the first layout, which
/// only matters when a custom level file declares itself non-final.
pub(crate) fn builtin(level: u32) -> LevelBlueprint {
    match level {
        2 => level_two(),
        3 => level_three(),
        _ => level_one(),
    }
}

fn girder(x: f32, y: f32, w: f32) -> TileDef {
    TileDef {
        rect: Rect::new(x, y, w, GIRDER_HEIGHT),
        sprite: 10,
        solid: true,
        background: false,
    }
}

fn backdrop() -> TileDef {
    TileDef {
        rect: Rect::new(0.0, 0.0, LEVEL_WIDTH, FLOOR_Y + GIRDER_HEIGHT),
        sprite: 0,
        solid: false,
        background: true,
    }
}

fn ladder(x: f32, top: f32) -> LadderDef {
    LadderDef {
        rect: Rect::new(x, top, LADDER_WIDTH, ROW_GAP),
        usable: true,
    }
}

fn broken_ladder(x: f32, top: f32) -> LadderDef {
    LadderDef {
        usable: false,
        ..ladder(x, top)
    }
}

fn point(x: f32, y: f32) -> SpawnPoint {
    SpawnPoint { x, y }
}

fn patrol_flame(x: f32, y: f32, facing: Facing) -> FlameDef {
    FlameDef {
        at: point(x, y),
        behavior: EnemyBehavior::Patrol,
        facing,
    }
}

fn level_one() -> LevelBlueprint {
    LevelBlueprint {
        level: 1,
        final_level: false,
        player_spawn: point(60.0, 408.0),
        exit: point(40.0, 88.0),
        tiles: vec![
            backdrop(),
            girder(0.0, FLOOR_Y, LEVEL_WIDTH),
            girder(160.0, 344.0, 960.0),
            girder(0.0, 248.0, 1120.0),
            girder(160.0, 152.0, 960.0),
        ],
        ladders: vec![
            ladder(1040.0, 344.0),
            broken_ladder(600.0, 344.0),
            ladder(240.0, 248.0),
            ladder(1000.0, 152.0),
        ],
        platforms: Vec::new(),
        static_flames: vec![patrol_flame(800.0, 320.0, Facing::Left)],
        flame_spawner: SpawnerDef {
            active: true,
            points: vec![point(400.0, 128.0), point(900.0, 224.0)],
        },
        flame_cap: 3,
        barrel_spawner: SpawnerDef::disabled(),
        item_spawner: SpawnerDef {
            active: true,
            points: vec![point(700.0, 424.0), point(500.0, 232.0)],
        },
        captor: point(220.0, 120.0),
        captive: point(300.0, 120.0),
    }
}

fn level_two() -> LevelBlueprint {
    LevelBlueprint {
        level: 2,
        final_level: false,
        player_spawn: point(1200.0, 408.0),
        exit: point(1240.0, 88.0),
        tiles: vec![
            backdrop(),
            girder(0.0, FLOOR_Y, LEVEL_WIDTH),
            girder(0.0, 344.0, 540.0),
            girder(740.0, 344.0, 540.0),
            girder(160.0, 248.0, 960.0),
            girder(0.0, 152.0, 1120.0),
        ],
        ladders: vec![
            ladder(80.0, 344.0),
            ladder(1180.0, 344.0),
            broken_ladder(460.0, 248.0),
            ladder(820.0, 248.0),
            ladder(200.0, 152.0),
        ],
        platforms: vec![PlatformDef {
            // Ferries across the gap between the split girders.
            rect: Rect::new(560.0, 336.0, 96.0, GIRDER_HEIGHT),
            sprite: 11,
            motion: PlatformMotion::Horizontal {
                speed: 1.0,
                min: 540.0,
                max: 660.0,
            },
        }],
        static_flames: vec![
            patrol_flame(300.0, 320.0, Facing::Right),
            patrol_flame(900.0, 224.0, Facing::Left),
        ],
        flame_spawner: SpawnerDef {
            active: true,
            points: vec![point(200.0, 128.0), point(1000.0, 128.0)],
        },
        flame_cap: 4,
        barrel_spawner: SpawnerDef {
            active: true,
            points: vec![point(640.0, 120.0)],
        },
        item_spawner: SpawnerDef {
            active: true,
            points: vec![point(400.0, 424.0), point(600.0, 232.0)],
        },
        captor: point(1040.0, 120.0),
        captive: point(960.0, 120.0),
    }
}

fn level_three() -> LevelBlueprint {
    LevelBlueprint {
        level: 3,
        final_level: FINAL_LEVEL == 3,
        player_spawn: point(60.0, 408.0),
        exit: point(640.0, 24.0),
        tiles: vec![
            backdrop(),
            girder(0.0, FLOOR_Y, LEVEL_WIDTH),
            girder(160.0, 344.0, 400.0),
            girder(720.0, 344.0, 400.0),
            girder(0.0, 248.0, 500.0),
            girder(780.0, 248.0, 500.0),
            girder(480.0, 152.0, 320.0),
        ],
        ladders: vec![
            ladder(480.0, 344.0),
            ladder(760.0, 344.0),
            ladder(120.0, 248.0),
            broken_ladder(1140.0, 248.0),
            ladder(500.0, 152.0),
            ladder(764.0, 152.0),
        ],
        platforms: vec![
            PlatformDef {
                rect: Rect::new(600.0, 300.0, 96.0, GIRDER_HEIGHT),
                sprite: 11,
                motion: PlatformMotion::Vertical {
                    speed: 1.0,
                    min: 170.0,
                    max: 330.0,
                },
            },
            PlatformDef {
                rect: Rect::new(560.0, 232.0, 80.0, GIRDER_HEIGHT),
                sprite: 12,
                motion: PlatformMotion::Blinking {
                    visible_ticks: 90,
                    invisible_ticks: 45,
                },
            },
        ],
        static_flames: vec![
            patrol_flame(300.0, 320.0, Facing::Right),
            patrol_flame(900.0, 320.0, Facing::Left),
            FlameDef {
                at: point(600.0, 416.0),
                behavior: EnemyBehavior::Chaser,
                facing: Facing::Left,
            },
        ],
        flame_spawner: SpawnerDef {
            active: true,
            points: vec![
                point(100.0, 224.0),
                point(1100.0, 224.0),
                point(640.0, 128.0),
            ],
        },
        flame_cap: 5,
        barrel_spawner: SpawnerDef {
            active: true,
            points: vec![point(520.0, 120.0), point(740.0, 120.0)],
        },
        item_spawner: SpawnerDef {
            active: true,
            points: vec![point(300.0, 424.0), point(980.0, 424.0)],
        },
        captor: point(560.0, 120.0),
        captive: point(680.0, 120.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_levels_are_numbered_and_only_the_last_is_final() {
        for level in 1..=FINAL_LEVEL {
            let plan = builtin(level);
            assert_eq!(plan.level, level);
            assert_eq!(plan.final_level, level == FINAL_LEVEL);
        }
    }

    #[test]
    fn every_level_spawns_the_player_over_solid_ground() {
        for level in 1..=FINAL_LEVEL {
            let plan = builtin(level);
            let spawn = plan.player_spawn;
            let grounded = plan.tiles.iter().any(|tile| {
                tile.solid
                    && spawn.x >= tile.rect.x
                    && spawn.x <= tile.rect.x + tile.rect.w
                    && tile.rect.y >= spawn.y
            });
            assert!(grounded, "level {level} spawn is airborne");
        }
    }

    #[test]
    fn every_active_spawner_carries_points() {
        for level in 1..=FINAL_LEVEL {
            let plan = builtin(level);
            for spawner in [&plan.flame_spawner, &plan.barrel_spawner, &plan.item_spawner] {
                assert!(!spawner.active || !spawner.points.is_empty());
            }
        }
    }
}
