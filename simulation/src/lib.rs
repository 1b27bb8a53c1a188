#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestrator that drives the Scrap Station world with its systems.
//!
//! Each call to [`Simulation::step`] runs exactly one frame: the round
//! settlement, the mode-specific systems, the clock, asteroid spawning and
//! finally the entity update. Commands produced by systems are applied
//! immediately, and every event the world broadcast during the frame is
//! returned to the caller.

use scrap_station_core::{Command, Event, GameMode, TargetSelection};
use scrap_station_system_builder::{Builder, BuilderInput};
use scrap_station_system_spawning::{Config as SpawningConfig, Spawning};
use scrap_station_system_turret_targeting::TurretTargeting;
use scrap_station_world::{self as world, query, World, WorldConfig};

const SPAWNING_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
const GENERATION_STRIDE: u64 = 0xbf58_476d_1ce4_e5b9;

/// Parameters the simulation builds and rebuilds its world from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Config {
    /// World construction parameters.
    pub world: WorldConfig,
    /// How turrets choose among asteroids in range.
    pub targeting: TargetSelection,
}

/// Player input relevant to a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepInput {
    /// Build-mode requests.
    pub builder: BuilderInput,
    /// Whether the player asked to restart after losing the core.
    pub restart: bool,
}

/// Owns the world and the pure systems, stepping them once per frame.
#[derive(Debug)]
pub struct Simulation {
    config: Config,
    generation: u64,
    world: World,
    builder: Builder,
    spawning: Spawning,
    targeting: TurretTargeting,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    /// Creates a simulation for a fresh game.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let generation = 0;
        Self {
            config,
            generation,
            world: World::with_config(world_config(&config, generation)),
            builder: Builder::new(),
            spawning: Spawning::new(spawning_config(&config, generation)),
            targeting: TurretTargeting::new(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Read-only access to the world for rendering and inspection.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration the simulation was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Number of restarts performed so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs one frame and returns the events it produced.
    pub fn step(&mut self, input: StepInput) -> &[Event] {
        self.events.clear();

        self.apply(Command::SettleRound);

        let mode = query::game_mode(&self.world);
        match mode {
            GameMode::Build => self.builder.handle(mode, input.builder, &mut self.commands),
            GameMode::Attack => {
                self.apply(Command::ChargeTurrets);
                let world = &self.world;
                let selection = self.config.targeting;
                let turrets = query::turret_snapshots(world);
                self.targeting.handle(
                    mode,
                    &turrets,
                    |point| query::turret_target(world, point, selection),
                    &mut self.commands,
                );
            }
            GameMode::GameOver => {}
        }
        self.flush_commands();

        self.apply(Command::AdvanceClock);

        self.spawning.handle(
            query::wave_clock(&self.world),
            query::spawn_target(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.apply(Command::AdvanceEntities);

        if input.restart && query::game_mode(&self.world) == GameMode::GameOver {
            self.restart();
        }

        &self.events
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn restart(&mut self) {
        self.generation += 1;
        tracing::info!(generation = self.generation, "restarting station");
        self.world = World::with_config(world_config(&self.config, self.generation));
        self.spawning = Spawning::new(spawning_config(&self.config, self.generation));
    }
}

fn world_config(config: &Config, generation: u64) -> WorldConfig {
    WorldConfig {
        seed: derive_seed(config.world.seed, 0, generation),
        ..config.world
    }
}

fn spawning_config(config: &Config, generation: u64) -> SpawningConfig {
    SpawningConfig::new(derive_seed(config.world.seed, SPAWNING_STREAM, generation))
}

fn derive_seed(seed: u64, stream: u64, generation: u64) -> u64 {
    seed ^ stream ^ generation.wrapping_mul(GENERATION_STRIDE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_generation_keeps_the_configured_world_seed() {
        let config = Config::default();
        assert_eq!(world_config(&config, 0).seed, config.world.seed);
        assert_ne!(
            derive_seed(config.world.seed, SPAWNING_STREAM, 0),
            config.world.seed,
            "spawning draws from its own stream"
        );
        assert_ne!(world_config(&config, 1).seed, config.world.seed);
    }
}
