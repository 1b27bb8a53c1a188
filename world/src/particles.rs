//! Short-lived visual effects with countdown lifetimes.

use std::collections::VecDeque;

use scrap_station_core::{ParticleKind, WorldPoint};

/// Frames of the explosion animation.
const POW_FRAMES: f32 = 3.0;

/// Lifetime the explosion animation is keyed against.
const POW_ANIMATION_SPAN: f32 = 45.0;

/// A single visual effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position of the effect.
    pub position: WorldPoint,
    /// Effect category.
    pub kind: ParticleKind,
    /// Frames left before the effect disappears.
    pub life: i32,
}

impl Particle {
    /// Animation frame to display, always zero for static effects.
    #[must_use]
    pub fn animation_frame(&self) -> u8 {
        match self.kind {
            ParticleKind::Pow => {
                let frame = (self.life.max(0) as f32 / POW_ANIMATION_SPAN) * POW_FRAMES;
                (frame as u8).min(POW_FRAMES as u8 - 1)
            }
            ParticleKind::Scrap => 0,
        }
    }
}

/// Unbounded, ordered collection of live particles, newest first.
///
/// Effects are displayed as they stood just before they aged, so the ledger
/// keeps that view alongside the live set.
#[derive(Clone, Debug, Default)]
pub struct ParticleLedger {
    particles: VecDeque<Particle>,
    drawn: Vec<Particle>,
}

impl ParticleLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a particle in front of every existing one.
    pub fn spawn(&mut self, position: WorldPoint, kind: ParticleKind) {
        self.particles.push_front(Particle {
            position,
            kind,
            life: kind.lifetime(),
        });
    }

    /// Ages every particle by one frame and drops those whose life ran out.
    pub fn tick(&mut self) {
        self.drawn.clear();
        self.drawn.extend(self.particles.iter().copied());
        self.particles.retain_mut(|particle| {
            particle.life -= 1;
            particle.life > 0
        });
    }

    /// Iterator over live particles, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Particles as they stood when the last tick aged them, newest first.
    ///
    /// Includes effects that expired on that tick and excludes effects
    /// spawned after it.
    pub fn drawn(&self) -> impl Iterator<Item = &Particle> {
        self.drawn.iter()
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Reports whether no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_prepends_with_kind_lifetime() {
        let mut ledger = ParticleLedger::new();
        ledger.spawn(WorldPoint::new(1.0, 1.0), ParticleKind::Pow);
        ledger.spawn(WorldPoint::new(2.0, 2.0), ParticleKind::Scrap);

        let lives: Vec<i32> = ledger.iter().map(|particle| particle.life).collect();
        assert_eq!(lives, vec![45, 20]);
    }

    #[test]
    fn tick_reaps_expired_particles_and_keeps_order() {
        let mut ledger = ParticleLedger::new();
        ledger.spawn(WorldPoint::new(0.0, 0.0), ParticleKind::Scrap);
        ledger.spawn(WorldPoint::new(1.0, 0.0), ParticleKind::Pow);
        ledger.spawn(WorldPoint::new(2.0, 0.0), ParticleKind::Scrap);

        for _ in 0..19 {
            ledger.tick();
        }
        assert_eq!(ledger.len(), 3);

        ledger.tick();
        let survivors: Vec<f32> = ledger.iter().map(|particle| particle.position.x).collect();
        assert_eq!(survivors, vec![2.0, 0.0], "pow expired, scrap order kept");

        for _ in 0..25 {
            ledger.tick();
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn drawn_view_precedes_aging() {
        let mut ledger = ParticleLedger::new();
        ledger.spawn(WorldPoint::new(3.0, 4.0), ParticleKind::Pow);
        assert_eq!(ledger.drawn().count(), 0, "nothing drawn before the first tick");

        ledger.tick();
        let first: Vec<i32> = ledger.drawn().map(|particle| particle.life).collect();
        assert_eq!(first, vec![20]);
        assert_eq!(ledger.drawn().next().map(Particle::animation_frame), Some(1));

        for _ in 0..19 {
            ledger.tick();
        }
        assert!(ledger.is_empty());
        let last: Vec<i32> = ledger.drawn().map(|particle| particle.life).collect();
        assert_eq!(last, vec![1], "expiring effect shows on its final frame");

        ledger.spawn(WorldPoint::default(), ParticleKind::Scrap);
        let unchanged: Vec<i32> = ledger.drawn().map(|particle| particle.life).collect();
        assert_eq!(unchanged, vec![1], "late spawns wait for the next tick");
    }

    #[test]
    fn pow_animation_is_keyed_by_remaining_life() {
        let mut particle = Particle {
            position: WorldPoint::default(),
            kind: ParticleKind::Pow,
            life: 20,
        };
        assert_eq!(particle.animation_frame(), 1);

        particle.life = 14;
        assert_eq!(particle.animation_frame(), 0);

        particle.life = 45;
        assert_eq!(particle.animation_frame(), 2);
    }
}
