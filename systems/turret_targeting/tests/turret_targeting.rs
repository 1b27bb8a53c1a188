use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use scrap_station_core::{
    AsteroidSize, Command, CursorStep, Event, GameMode, TargetSelection, TileKind, WorldPoint,
};
use scrap_station_system_turret_targeting::TurretTargeting;
use scrap_station_world::{self as world, query, World};

fn prepare_world(turret_steps: &[CursorStep]) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    for step in turret_steps {
        world::apply(&mut world, Command::MoveCursor { step: *step }, &mut events);
    }
    world::apply(
        &mut world,
        Command::BuildTile {
            kind: TileKind::Turret,
        },
        &mut events,
    );
    world::apply(&mut world, Command::StartWave, &mut events);
    world
}

fn spawn(world: &mut World, position: WorldPoint, size: AsteroidSize) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnAsteroid {
            position,
            size,
            direction: 0.0,
            speed: 0.0,
        },
        &mut events,
    );
}

fn aim(world: &World, selection: TargetSelection) -> Vec<Command> {
    let mut targeting = TurretTargeting::new();
    let mut commands = Vec::new();
    targeting.handle(
        query::game_mode(world),
        &query::turret_snapshots(world),
        |point| query::turret_target(world, point, selection),
        &mut commands,
    );
    commands
}

fn fired_direction(commands: &[Command]) -> f32 {
    match commands {
        [Command::FireRocket { direction, .. }] => *direction,
        other => panic!("expected exactly one launch, got {other:?}"),
    }
}

#[test]
fn turret_aims_at_the_last_asteroid_in_range_by_default() {
    let mut world = prepare_world(&[CursorStep::Right]);
    let turret = query::turret_snapshots(&world)[0].position;
    spawn(&mut world, WorldPoint::new(turret.x + 20.0, turret.y), AsteroidSize::Large);
    spawn(&mut world, WorldPoint::new(turret.x, turret.y + 150.0), AsteroidSize::Medium);

    let classic = fired_direction(&aim(&world, TargetSelection::LastInRange));
    assert!(classic.abs() < 1e-5, "last in slot order lies straight down");

    let nearest = fired_direction(&aim(&world, TargetSelection::Nearest));
    assert!((nearest - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
}

#[test]
fn small_or_distant_asteroids_are_ignored() {
    let mut world = prepare_world(&[CursorStep::Down]);
    let turret = query::turret_snapshots(&world)[0].position;
    spawn(&mut world, WorldPoint::new(turret.x + 10.0, turret.y), AsteroidSize::Small);
    spawn(&mut world, WorldPoint::new(turret.x + 200.0, turret.y), AsteroidSize::Large);

    assert!(aim(&world, TargetSelection::LastInRange).is_empty());
    assert!(aim(&world, TargetSelection::Nearest).is_empty());
}

#[test]
fn unpowered_turrets_never_fire() {
    let mut events = Vec::new();
    let mut far_world = World::new();
    for step in [CursorStep::Right, CursorStep::Right] {
        world::apply(&mut far_world, Command::MoveCursor { step }, &mut events);
        world::apply(
            &mut far_world,
            Command::BuildTile {
                kind: TileKind::Wall,
            },
            &mut events,
        );
    }
    world::apply(
        &mut far_world,
        Command::MoveCursor {
            step: CursorStep::Right,
        },
        &mut events,
    );
    world::apply(
        &mut far_world,
        Command::BuildTile {
            kind: TileKind::Turret,
        },
        &mut events,
    );
    world::apply(&mut far_world, Command::StartWave, &mut events);
    spawn(&mut far_world, WorldPoint::new(420.0, 164.0), AsteroidSize::Large);

    assert!(query::turret_snapshots(&far_world).is_empty());
    assert!(aim(&far_world, TargetSelection::LastInRange).is_empty());
}

#[test]
fn build_mode_suppresses_fire() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::MoveCursor {
            step: CursorStep::Left,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::BuildTile {
            kind: TileKind::Turret,
        },
        &mut events,
    );
    spawn(&mut world, WorldPoint::new(250.0, 200.0), AsteroidSize::Large);

    assert_eq!(query::game_mode(&world), GameMode::Build);
    assert!(aim(&world, TargetSelection::LastInRange).is_empty());
}

#[test]
fn deterministic_replay_of_a_defended_wave() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.launches > 0, "turrets should engage the incoming rocks");
}

#[derive(Debug, PartialEq, Eq)]
struct Replay {
    launches: usize,
    fingerprint: u64,
}

fn replay() -> Replay {
    let mut world = prepare_world(&[CursorStep::Up]);
    let mut targeting = TurretTargeting::new();
    let mut hasher = DefaultHasher::new();
    let mut launches = 0;

    let target = query::spawn_target(&world);
    for index in 0..6 {
        let offset = index as f32 * 24.0;
        spawn(
            &mut world,
            WorldPoint::new(target.x - 120.0 + offset, target.y - 150.0),
            AsteroidSize::Medium,
        );
    }

    for _ in 0..400 {
        let mut events = Vec::new();
        world::apply(&mut world, Command::ChargeTurrets, &mut events);

        let mut commands = Vec::new();
        targeting.handle(
            query::game_mode(&world),
            &query::turret_snapshots(&world),
            |point| query::turret_target(&world, point, TargetSelection::LastInRange),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::AdvanceClock, &mut events);
        world::apply(&mut world, Command::AdvanceEntities, &mut events);

        for event in &events {
            match event {
                Event::RocketFired {
                    rocket, direction, ..
                } => {
                    launches += 1;
                    rocket.hash(&mut hasher);
                    direction.to_bits().hash(&mut hasher);
                }
                Event::AsteroidDestroyed {
                    size, fragments, ..
                } => {
                    size.hash(&mut hasher);
                    fragments.hash(&mut hasher);
                }
                _ => {}
            }
        }
    }

    Replay {
        launches,
        fingerprint: hasher.finish(),
    }
}
