#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that aims ready turrets and emits rocket launch commands.

use scrap_station_core::{Command, GameMode, TurretSnapshot, WorldPoint};

/// Turret targeting system that queues firing commands for ready turrets.
#[derive(Debug, Default)]
pub struct TurretTargeting {
    scratch: Vec<Command>,
}

impl TurretTargeting {
    /// Creates a new turret targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireRocket` for every ready turret with a target.
    ///
    /// `target_for` should mirror the world's `query::turret_target` helper:
    /// given a turret position it returns the position of the asteroid that
    /// turret engages, if any. Rockets are aimed straight at that position.
    pub fn handle<F>(
        &mut self,
        mode: GameMode,
        turrets: &[TurretSnapshot],
        mut target_for: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(WorldPoint) -> Option<WorldPoint>,
    {
        if mode != GameMode::Attack {
            return;
        }

        self.scratch.clear();
        for turret in turrets.iter().filter(|turret| turret.is_ready()) {
            if let Some(target) = target_for(turret.position) {
                self.scratch.push(Command::FireRocket {
                    turret: turret.turret,
                    direction: turret.position.heading_to(target),
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrap_station_core::SlotId;

    fn turret(slot: u32, cooldown: i32) -> TurretSnapshot {
        TurretSnapshot {
            turret: SlotId::new(slot),
            position: WorldPoint::new(0.0, 0.0),
            cooldown,
        }
    }

    #[test]
    fn cooling_turrets_hold_fire() {
        let mut targeting = TurretTargeting::new();
        let mut commands = Vec::new();

        targeting.handle(
            GameMode::Attack,
            &[turret(0, 5), turret(1, 0), turret(2, -3)],
            |_| Some(WorldPoint::new(0.0, 50.0)),
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![
                Command::FireRocket {
                    turret: SlotId::new(1),
                    direction: 0.0,
                },
                Command::FireRocket {
                    turret: SlotId::new(2),
                    direction: 0.0,
                },
            ]
        );
    }
}
