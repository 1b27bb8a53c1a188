#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Scrap Station.

mod asteroids;
mod particles;
mod pool;
mod rockets;
mod state;
mod station;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scrap_station_core::{
    BuildError, Command, Event, GameMode, PoolKind, TileKind, Viewport, WorldPoint,
    WELCOME_BANNER,
};

pub use asteroids::{Asteroid, AsteroidCollection, CollisionTargets, ENGAGEMENT_RADIUS};
pub use particles::{Particle, ParticleLedger};
pub use pool::{Allocation, SlotPool};
pub use rockets::{Rocket, RocketPool, ROCKET_LIFETIME, ROCKET_SPEED};
pub use state::GameState;
pub use station::{Settlement, Station, StationTile, TileDamage, TURRET_COOLDOWN};

use pool::report_eviction;

const DEFAULT_STATION_ORIGIN: WorldPoint = WorldPoint::new(304.0, 164.0);
const DEFAULT_SEED: u64 = 0x5c4a_9e11_d2f3_7b01;

/// Parameters a world is constructed from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// World position of the core tile.
    pub origin: WorldPoint,
    /// Visible area outside of which stale asteroids are culled.
    pub viewport: Viewport,
    /// Seed of the random stream used when asteroids split.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_STATION_ORIGIN,
            viewport: Viewport::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Represents the authoritative Scrap Station world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    state: GameState,
    station: Station,
    asteroids: AsteroidCollection,
    rockets: RocketPool,
    particles: ParticleLedger,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a fresh world: full scrap, a lone core and empty pools.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            config,
            state: GameState::new(),
            station: Station::new(config.origin),
            asteroids: AsteroidCollection::new(config.origin),
            rockets: RocketPool::new(),
            particles: ParticleLedger::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    fn settle_round(&mut self, out_events: &mut Vec<Event>) {
        if self.state.mode() != GameMode::Build || !self.state.take_reward() {
            return;
        }

        let settlement = self
            .station
            .settle_round(&mut self.state, &mut self.particles);
        out_events.push(Event::RoundSettled {
            scrap_awarded: settlement.scrap_awarded,
            rubber_band: self.state.rubber_band(),
        });
        if settlement.cursor_reset {
            out_events.push(Event::CursorReset);
        }

        if settlement.core_lost {
            self.state.end_game();
            tracing::info!(wave = self.state.wave(), "core lost, game over");
            out_events.push(Event::ModeChanged {
                mode: GameMode::GameOver,
            });
            out_events.push(Event::GameOver {
                wave: self.state.wave(),
            });
        }
    }

    fn build_tile(&mut self, kind: TileKind, out_events: &mut Vec<Event>) {
        let cell = self.station.cursor();
        if let Err(reason) = self.try_build(kind) {
            tracing::debug!(?kind, ?cell, ?reason, "build rejected");
            out_events.push(Event::BuildRejected { kind, cell, reason });
            return;
        }

        let allocation = self.station.add_tile(kind, cell);
        report_eviction(PoolKind::Tile, &allocation, out_events);
        out_events.push(Event::TileBuilt {
            tile: allocation.slot,
            kind,
            cell,
        });
    }

    fn try_build(&mut self, kind: TileKind) -> Result<(), BuildError> {
        if self.state.mode() != GameMode::Build {
            return Err(BuildError::InvalidMode);
        }
        let cost = kind.build_cost().ok_or(BuildError::NotBuildable)?;
        if !self.station.can_build_tile() {
            return Err(BuildError::Occupied);
        }
        if !self.state.spend_scrap(cost) {
            return Err(BuildError::InsufficientScrap);
        }
        Ok(())
    }

    fn advance_entities(&mut self, out_events: &mut Vec<Event>) {
        self.asteroids.tick(
            self.config.viewport,
            CollisionTargets {
                rockets: &mut self.rockets,
                station: &mut self.station,
                particles: &mut self.particles,
            },
            &mut self.rng,
            out_events,
        );
        self.particles.tick();
        self.rockets.tick(self.state.game_timer(), &mut self.particles);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SettleRound => world.settle_round(out_events),
        Command::MoveCursor { step } => {
            if world.state.mode() != GameMode::Build {
                return;
            }
            match world.station.move_cursor(step) {
                Some(cell) => out_events.push(Event::CursorMoved { cell }),
                None => out_events.push(Event::CursorBlocked {
                    target: world.station.cursor().step(step),
                }),
            }
        }
        Command::BuildTile { kind } => world.build_tile(kind, out_events),
        Command::StartWave => {
            if world.state.mode() != GameMode::Build {
                return;
            }
            world.state.activate_wave();
            tracing::info!(
                wave = world.state.wave(),
                duration = world.state.wave_timer(),
                difficulty = world.state.difficulty(),
                "wave started"
            );
            out_events.push(Event::ModeChanged {
                mode: GameMode::Attack,
            });
            out_events.push(Event::WaveStarted {
                wave: world.state.wave(),
                duration: world.state.wave_timer(),
                difficulty: world.state.difficulty(),
            });
        }
        Command::ChargeTurrets => {
            if world.state.mode() == GameMode::Attack {
                world.station.charge_turrets();
            }
        }
        Command::FireRocket { turret, direction } => {
            if world.state.mode() != GameMode::Attack {
                return;
            }
            if let Some(position) = world.station.fire_turret(turret) {
                let allocation = world.rockets.spawn(position, direction);
                report_eviction(PoolKind::Rocket, &allocation, out_events);
                out_events.push(Event::RocketFired {
                    turret,
                    rocket: allocation.slot,
                    direction,
                });
            }
        }
        Command::AdvanceClock => {
            let asteroids_alive = world.asteroids.any_alive();
            let wave_ended = world.state.advance(asteroids_alive);
            out_events.push(Event::TimeAdvanced {
                game_timer: world.state.game_timer(),
            });
            if wave_ended {
                tracing::info!(wave = world.state.wave(), "wave cleared");
                out_events.push(Event::ModeChanged {
                    mode: GameMode::Build,
                });
                out_events.push(Event::WaveCleared {
                    wave: world.state.wave(),
                });
            }
        }
        Command::SpawnAsteroid {
            position,
            size,
            direction,
            speed,
        } => {
            let allocation = world.asteroids.spawn(position, size, direction, speed);
            report_eviction(PoolKind::Asteroid, &allocation, out_events);
        }
        Command::AdvanceEntities => world.advance_entities(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use scrap_station_core::{GameMode, TargetSelection, TurretSnapshot, WaveClock, WorldPoint};

    use super::{
        AsteroidCollection, GameState, ParticleLedger, RocketPool, Station, World, WorldConfig,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Active gameplay mode.
    #[must_use]
    pub fn game_mode(world: &World) -> GameMode {
        world.state.mode()
    }

    /// Provides read-only access to scrap, clocks and wave counters.
    #[must_use]
    pub fn game_state(world: &World) -> &GameState {
        &world.state
    }

    /// Timing snapshot consumed by the spawning system.
    #[must_use]
    pub fn wave_clock(world: &World) -> WaveClock {
        world.state.wave_clock()
    }

    /// Provides read-only access to the station.
    #[must_use]
    pub fn station(world: &World) -> &Station {
        &world.station
    }

    /// Provides read-only access to live asteroids.
    #[must_use]
    pub fn asteroids(world: &World) -> &AsteroidCollection {
        &world.asteroids
    }

    /// Point incoming asteroids converge on.
    #[must_use]
    pub fn spawn_target(world: &World) -> WorldPoint {
        world.asteroids.target()
    }

    /// Provides read-only access to rockets in flight.
    #[must_use]
    pub fn rockets(world: &World) -> &RocketPool {
        &world.rockets
    }

    /// Provides read-only access to live particles.
    #[must_use]
    pub fn particles(world: &World) -> &ParticleLedger {
        &world.particles
    }

    /// Snapshots of every powered turret in slot order.
    #[must_use]
    pub fn turret_snapshots(world: &World) -> Vec<TurretSnapshot> {
        world.station.turret_snapshots().collect()
    }

    /// Position of the asteroid a turret at `point` would engage.
    #[must_use]
    pub fn turret_target(
        world: &World,
        point: WorldPoint,
        selection: TargetSelection,
    ) -> Option<WorldPoint> {
        world
            .asteroids
            .select_target(point, selection)
            .map(|asteroid| asteroid.position)
    }
}
