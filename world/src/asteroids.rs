//! Hostile asteroids: spawning, splitting, motion and collision resolution.

use rand::Rng;
use scrap_station_core::{
    Aabb, AsteroidSize, Event, ParticleKind, PoolKind, SlotId, TargetSelection, Viewport,
    WorldPoint,
};

use crate::{
    particles::ParticleLedger,
    pool::{report_eviction, Allocation, SlotPool},
    rockets::RocketPool,
    station::{Station, TileDamage},
};

/// Radius inside which turrets may engage an asteroid.
pub const ENGAGEMENT_RADIUS: f32 = 200.0;

/// Frames after spawning during which an off-screen asteroid is not culled.
const GRACE_FRAMES: i32 = 300;

/// Speed multiplier applied to fragments.
const FRAGMENT_SPEEDUP: f32 = 1.1;

/// Distance ahead of the asteroid at which its explosion appears.
const EXPLOSION_OFFSET: f32 = 16.0;

/// Screen shake requested when a rocket destroys an asteroid.
const ROCKET_HIT_SHAKE: f32 = 2.0;

/// Screen shake requested when an asteroid strikes the station.
const STATION_HIT_SHAKE: f32 = 0.5;

/// Damage an asteroid deals per unit of speed and size rank.
const IMPACT_DAMAGE_FACTOR: f32 = 10.0;

/// A single asteroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Asteroid {
    /// Current position.
    pub position: WorldPoint,
    /// Heading in radians.
    pub direction: f32,
    /// Distance travelled per frame.
    pub speed: f32,
    /// Size class.
    pub size: AsteroidSize,
    /// Frames left before the asteroid breaks apart on its own.
    pub life: i32,
}

impl Asteroid {
    /// Collision box of the asteroid.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::entity_at(self.position)
    }

    /// Damage dealt to a tile on impact.
    #[must_use]
    pub fn impact_damage(&self) -> i32 {
        (self.speed * self.size.rank() as f32 * IMPACT_DAMAGE_FACTOR) as i32
    }

    /// Reports whether turrets may target the asteroid.
    #[must_use]
    pub fn is_targetable(&self) -> bool {
        self.size > AsteroidSize::Small
    }

    fn outlived_grace_window(&self) -> bool {
        self.life < self.size.lifetime() - GRACE_FRAMES
    }
}

/// Mutable collaborators the asteroid tick resolves collisions against.
#[derive(Debug)]
pub struct CollisionTargets<'a> {
    /// Rockets that can shoot asteroids down.
    pub rockets: &'a mut RocketPool,
    /// Station whose tiles absorb impacts.
    pub station: &'a mut Station,
    /// Ledger receiving explosion effects.
    pub particles: &'a mut ParticleLedger,
}

/// Fixed-capacity collection of asteroids aimed at the station.
#[derive(Clone, Debug)]
pub struct AsteroidCollection {
    asteroids: SlotPool<Asteroid>,
    target: WorldPoint,
}

impl AsteroidCollection {
    /// Creates an empty collection converging on `target`.
    #[must_use]
    pub fn new(target: WorldPoint) -> Self {
        Self {
            asteroids: SlotPool::new(PoolKind::Asteroid.capacity()),
            target,
        }
    }

    /// Point new asteroids are aimed at.
    #[must_use]
    pub const fn target(&self) -> WorldPoint {
        self.target
    }

    /// Adds an asteroid with the full lifetime of its size.
    pub fn spawn(
        &mut self,
        position: WorldPoint,
        size: AsteroidSize,
        direction: f32,
        speed: f32,
    ) -> Allocation<Asteroid> {
        self.asteroids.insert(Asteroid {
            position,
            direction,
            speed,
            size,
            life: size.lifetime(),
        })
    }

    /// Target picked for a turret at `point` according to `selection`.
    #[must_use]
    pub fn select_target(&self, point: WorldPoint, selection: TargetSelection) -> Option<&Asteroid> {
        match selection {
            TargetSelection::LastInRange => self.find_closest(point),
            TargetSelection::Nearest => self.find_nearest(point),
        }
    }

    /// Classic turret query: the last targetable asteroid in slot order that
    /// lies strictly inside the engagement radius.
    #[must_use]
    pub fn find_closest(&self, point: WorldPoint) -> Option<&Asteroid> {
        let mut found = None;
        for (_, asteroid) in self.asteroids.iter() {
            if asteroid.is_targetable() && point.distance(asteroid.position) < ENGAGEMENT_RADIUS {
                found = Some(asteroid);
            }
        }
        found
    }

    /// Nearest targetable asteroid strictly inside the engagement radius.
    #[must_use]
    pub fn find_nearest(&self, point: WorldPoint) -> Option<&Asteroid> {
        let mut best: Option<(f32, &Asteroid)> = None;
        for (_, asteroid) in self.asteroids.iter() {
            if !asteroid.is_targetable() {
                continue;
            }

            let distance = point.distance(asteroid.position);
            if distance >= ENGAGEMENT_RADIUS {
                continue;
            }

            match best {
                Some((closest, _)) if closest <= distance => {}
                _ => best = Some((distance, asteroid)),
            }
        }
        best.map(|(_, asteroid)| asteroid)
    }

    /// Reports whether any asteroid is alive.
    #[must_use]
    pub fn any_alive(&self) -> bool {
        !self.asteroids.is_empty()
    }

    /// Number of live asteroids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    /// Reports whether no asteroid is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    /// Iterator over live asteroids in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Asteroid)> {
        self.asteroids.iter()
    }

    /// Returns the asteroid in the slot, if alive.
    #[must_use]
    pub fn get(&self, slot: SlotId) -> Option<&Asteroid> {
        self.asteroids.get(slot)
    }

    /// Breaks the asteroid apart.
    ///
    /// Emits an explosion ahead of the asteroid and spawns two or three
    /// fragments one size smaller, each with a random heading and 10% more
    /// speed. Small asteroids leave no fragments. Returns the number of
    /// fragments, or `None` when the slot held no asteroid.
    pub fn destroy<R>(
        &mut self,
        slot: SlotId,
        particles: &mut ParticleLedger,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Option<u32>
    where
        R: Rng + ?Sized,
    {
        let asteroid = self.asteroids.release(slot)?;
        Some(self.shatter(&asteroid, particles, rng, out_events))
    }

    fn shatter<R>(
        &mut self,
        asteroid: &Asteroid,
        particles: &mut ParticleLedger,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> u32
    where
        R: Rng + ?Sized,
    {
        particles.spawn(
            asteroid.position.advanced(asteroid.direction, EXPLOSION_OFFSET),
            ParticleKind::Pow,
        );

        let attempts: u32 = rng.gen_range(2..=3);
        let mut fragments = 0;
        if let Some(fragment_size) = asteroid.size.smaller() {
            for _ in 0..attempts {
                let direction = random_heading(rng);
                let allocation = self.spawn(
                    asteroid.position,
                    fragment_size,
                    direction,
                    asteroid.speed * FRAGMENT_SPEEDUP,
                );
                report_eviction(PoolKind::Asteroid, &allocation, out_events);
                fragments += 1;
            }
        }

        out_events.push(Event::AsteroidDestroyed {
            size: asteroid.size,
            position: asteroid.position,
            fragments,
        });
        fragments
    }

    /// Frees `slot` the first time its asteroid is taken out during a tick.
    ///
    /// Once freed, the slot may already hold a fragment, which must survive.
    fn vacate(&mut self, slot: SlotId, occupied: &mut bool) {
        if std::mem::take(occupied) {
            let _ = self.asteroids.release(slot);
        }
    }

    /// Advances every asteroid by one frame.
    ///
    /// Each asteroid ages and moves. It breaks apart when its life runs out
    /// and is silently dropped once it outlived its grace window while
    /// outside `viewport`. Medium and large asteroids are then shot down by
    /// every overlapping rocket, and an asteroid over a tile breaks apart and
    /// damages that tile. These checks use the asteroid as it was after
    /// moving, so an asteroid already taken out this frame still collides and
    /// splits again.
    pub fn tick<R>(
        &mut self,
        viewport: Viewport,
        targets: CollisionTargets<'_>,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        let CollisionTargets {
            rockets,
            station,
            particles,
        } = targets;
        let screen = viewport.bounds();

        for slot in self.asteroids.slot_ids() {
            let Some(asteroid) = self.asteroids.get_mut(slot) else {
                continue;
            };
            asteroid.life -= 1;
            asteroid.position = asteroid.position.advanced(asteroid.direction, asteroid.speed);
            let asteroid = *asteroid;
            let bounds = asteroid.bounds();
            let mut occupied = true;

            if asteroid.life == 0 {
                self.vacate(slot, &mut occupied);
                let _ = self.shatter(&asteroid, particles, rng, out_events);
            } else if asteroid.outlived_grace_window() && !bounds.overlaps(&screen) {
                self.vacate(slot, &mut occupied);
            }

            if asteroid.is_targetable() {
                while let Some(rocket) = rockets.first_overlapping(&bounds) {
                    self.vacate(slot, &mut occupied);
                    let _ = self.shatter(&asteroid, particles, rng, out_events);
                    let _ = rockets.remove(rocket);
                    out_events.push(Event::ScreenShake {
                        intensity: ROCKET_HIT_SHAKE,
                    });
                }
            }

            if let Some(tile) = station.first_overlapping(&bounds) {
                out_events.push(Event::ScreenShake {
                    intensity: STATION_HIT_SHAKE,
                });
                self.vacate(slot, &mut occupied);
                let _ = self.shatter(&asteroid, particles, rng, out_events);
                let damage = asteroid.impact_damage();
                match station.damage_tile(tile, damage) {
                    TileDamage::Damaged { health } => out_events.push(Event::TileDamaged {
                        tile,
                        damage,
                        health,
                    }),
                    TileDamage::Destroyed(retired) => {
                        tracing::debug!(kind = ?retired.kind, cell = ?retired.cell, "tile destroyed");
                        out_events.push(Event::TileDestroyed {
                            tile,
                            kind: retired.kind,
                            cell: retired.cell,
                        });
                    }
                    TileDamage::Missing => {}
                }
                station.update_powered_status();
            }
        }
    }
}

/// Uniform heading in whole degrees from 0 to 360 inclusive, in radians.
fn random_heading<R>(rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    let degrees: i32 = rng.gen_range(0..=360);
    (degrees as f32).to_radians()
}
