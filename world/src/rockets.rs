//! Turret projectiles.

use scrap_station_core::{Aabb, ParticleKind, PoolKind, SlotId, WorldPoint};

use crate::{
    particles::ParticleLedger,
    pool::{Allocation, SlotPool},
};

/// Distance a rocket travels per frame.
pub const ROCKET_SPEED: f32 = 4.5;

/// Frames a rocket flies before burning out.
pub const ROCKET_LIFETIME: i32 = 200;

/// Rockets leave an exhaust puff every this many frames.
const EXHAUST_INTERVAL: u64 = 4;

/// A rocket in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rocket {
    /// Current position.
    pub position: WorldPoint,
    /// Heading in radians.
    pub direction: f32,
    /// Distance travelled per frame.
    pub speed: f32,
    /// Frames left before burning out.
    pub life: i32,
}

impl Rocket {
    /// Collision box of the rocket.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::entity_at(self.position)
    }
}

/// Fixed-capacity rocket pool.
#[derive(Clone, Debug)]
pub struct RocketPool {
    rockets: SlotPool<Rocket>,
}

impl Default for RocketPool {
    fn default() -> Self {
        Self::new()
    }
}

impl RocketPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rockets: SlotPool::new(PoolKind::Rocket.capacity()),
        }
    }

    /// Launches a rocket from `position` along `direction`.
    pub fn spawn(&mut self, position: WorldPoint, direction: f32) -> Allocation<Rocket> {
        self.rockets.insert(Rocket {
            position,
            direction,
            speed: ROCKET_SPEED,
            life: ROCKET_LIFETIME,
        })
    }

    /// Moves every rocket, burns out expired ones and emits exhaust puffs.
    pub fn tick(&mut self, game_timer: u64, particles: &mut ParticleLedger) {
        let emit_exhaust = game_timer % EXHAUST_INTERVAL == 0;
        self.rockets.retain(|rocket| {
            rocket.position = rocket.position.advanced(rocket.direction, rocket.speed);
            rocket.life -= 1;
            if emit_exhaust {
                particles.spawn(rocket.position, ParticleKind::Pow);
            }
            rocket.life > 0
        });
    }

    /// First rocket in slot order whose box overlaps `bounds`.
    #[must_use]
    pub fn first_overlapping(&self, bounds: &Aabb) -> Option<SlotId> {
        self.rockets
            .iter()
            .find(|(_, rocket)| rocket.bounds().overlaps(bounds))
            .map(|(slot, _)| slot)
    }

    /// Removes a rocket from flight.
    pub fn remove(&mut self, slot: SlotId) -> Option<Rocket> {
        self.rockets.release(slot)
    }

    /// Iterator over rockets in flight in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Rocket)> {
        self.rockets.iter()
    }

    /// Number of rockets in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rockets.len()
    }

    /// Reports whether no rocket is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rockets.is_empty()
    }
}
