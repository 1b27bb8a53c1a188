#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting asteroid spawn commands.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scrap_station_core::{AsteroidSize, Command, GameMode, WaveClock, WorldPoint};

/// Distance from the spawn target at which asteroids appear.
pub const SPAWN_DISTANCE: f32 = 356.0;

/// Asteroids spawn on frames divisible by this interval.
const SPAWN_INTERVAL: u64 = 10;

const BASE_SPEED: f32 = 1.0;
const SPEED_STEP: f32 = 0.2;
const MAX_SPEED_STEPS: i32 = 4;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically emits spawn commands in attack mode.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits the asteroids of a spawn tick.
    ///
    /// Spawn ticks happen in attack mode on every tenth frame while the wave
    /// timer is still running. Each tick emits between one and `difficulty`
    /// asteroids on a circle around `target`, every one of them heading
    /// straight at it.
    pub fn handle(&mut self, clock: WaveClock, target: WorldPoint, out: &mut Vec<Command>) {
        if clock.mode != GameMode::Attack {
            return;
        }

        if clock.game_timer % SPAWN_INTERVAL != 0 || clock.wave_timer <= 0 {
            return;
        }

        let count = self.rng.gen_range(1..=clock.difficulty.max(1));
        for _ in 0..count {
            out.push(self.next_asteroid(target));
        }
    }

    fn next_asteroid(&mut self, target: WorldPoint) -> Command {
        let degrees: i32 = self.rng.gen_range(0..=360);
        let direction = (degrees as f32).to_radians();
        let position = target.advanced(direction + PI, SPAWN_DISTANCE);
        let speed = BASE_SPEED + self.rng.gen_range(0..=MAX_SPEED_STEPS) as f32 * SPEED_STEP;
        let size = AsteroidSize::from_rank(self.rng.gen_range(0..=2)).unwrap_or(AsteroidSize::Small);

        Command::SpawnAsteroid {
            position,
            size,
            direction,
            speed,
        }
    }
}
