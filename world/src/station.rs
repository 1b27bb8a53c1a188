//! Station tiles, the build cursor and power propagation.

use std::collections::HashSet;

use scrap_station_core::{
    Aabb, CursorStep, GridCoord, ParticleKind, PoolKind, SlotId, TileKind, TurretSnapshot,
    WorldPoint, TILE_LENGTH,
};

use crate::{
    particles::ParticleLedger,
    pool::{Allocation, SlotPool},
    state::GameState,
};

/// Frames a turret waits between shots.
pub const TURRET_COOLDOWN: i32 = 100;

/// A single tile of the station.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationTile {
    /// Functional role of the tile.
    pub kind: TileKind,
    /// Remaining health; the tile is retired once it drops below zero.
    pub health: i32,
    /// Health restored at every settlement.
    pub max_health: i32,
    /// Whether the tile currently receives power.
    pub powered: bool,
    /// World position of the top-left corner.
    pub position: WorldPoint,
    /// Grid cell relative to the core.
    pub cell: GridCoord,
    /// Frames until a turret may fire again.
    pub cooldown: i32,
}

impl StationTile {
    fn new(kind: TileKind, cell: GridCoord, position: WorldPoint) -> Self {
        Self {
            kind,
            health: kind.max_health(),
            max_health: kind.max_health(),
            powered: true,
            position,
            cell,
            cooldown: 0,
        }
    }

    /// Collision box of the tile.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::entity_at(self.position)
    }

    /// Reports whether the tile lost more than half of its health.
    #[must_use]
    pub const fn is_heavily_damaged(&self) -> bool {
        self.health < self.max_health / 2
    }

    /// Reports whether the tile lost any health.
    #[must_use]
    pub const fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }
}

/// Outcome of applying damage to a tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TileDamage {
    /// The tile absorbed the hit.
    Damaged {
        /// Health left after the hit.
        health: i32,
    },
    /// The tile was retired and its slot released.
    Destroyed(StationTile),
    /// The slot held no tile.
    Missing,
}

/// Summary of a round-end settlement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    /// Scrap granted by powered forges and the core.
    pub scrap_awarded: u32,
    /// Whether the build cursor had to be snapped back to the core.
    pub cursor_reset: bool,
    /// Whether the core tile is gone.
    pub core_lost: bool,
}

/// The player's station: a sparse grid of tiles around the core.
#[derive(Clone, Debug)]
pub struct Station {
    tiles: SlotPool<StationTile>,
    cursor: GridCoord,
    origin: WorldPoint,
}

impl Station {
    /// Creates a station consisting only of its core at `origin`.
    #[must_use]
    pub fn new(origin: WorldPoint) -> Self {
        let mut station = Self {
            tiles: SlotPool::new(PoolKind::Tile.capacity()),
            cursor: GridCoord::ORIGIN,
            origin,
        };
        let _ = station.add_tile(TileKind::Core, GridCoord::ORIGIN);
        station
    }

    /// World position of the core cell.
    #[must_use]
    pub const fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Cell under the build cursor.
    #[must_use]
    pub const fn cursor(&self) -> GridCoord {
        self.cursor
    }

    /// World position of the top-left corner of `cell`.
    #[must_use]
    pub fn cell_position(&self, cell: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (cell.column() * TILE_LENGTH) as f32,
            self.origin.y + (cell.row() * TILE_LENGTH) as f32,
        )
    }

    /// Places a tile at `cell` and recomputes power for the whole station.
    pub fn add_tile(&mut self, kind: TileKind, cell: GridCoord) -> Allocation<StationTile> {
        let tile = StationTile::new(kind, cell, self.cell_position(cell));
        let allocation = self.tiles.insert(tile);
        self.update_powered_status();
        allocation
    }

    /// Recomputes which tiles receive power.
    ///
    /// Walls, generators and the core are always powered. Turrets and forges
    /// need a generator or the core somewhere in their 3×3 neighbourhood.
    pub fn update_powered_status(&mut self) {
        let sources: HashSet<GridCoord> = self
            .tiles
            .iter()
            .filter(|(_, tile)| tile.kind.is_power_source())
            .map(|(_, tile)| tile.cell)
            .collect();

        for (_, tile) in self.tiles.iter_mut() {
            tile.powered = !tile.kind.requires_power() || has_power_source_near(&sources, tile.cell);
        }
    }

    /// Reports whether the cursor may occupy `cell`.
    #[must_use]
    pub fn can_cursor_move_to(&self, cell: GridCoord) -> bool {
        self.tiles
            .iter()
            .any(|(_, tile)| tile.cell.chebyshev_distance(cell) <= 1)
    }

    /// Reports whether the cursor cell is free for construction.
    #[must_use]
    pub fn can_build_tile(&self) -> bool {
        self.tile_at(self.cursor).is_none()
    }

    /// Moves the cursor one cell when the destination stays next to the station.
    pub fn move_cursor(&mut self, step: CursorStep) -> Option<GridCoord> {
        let destination = self.cursor.step(step);
        if !self.can_cursor_move_to(destination) {
            return None;
        }
        self.cursor = destination;
        Some(destination)
    }

    /// Tile occupying `cell`, if any.
    #[must_use]
    pub fn tile_at(&self, cell: GridCoord) -> Option<(SlotId, &StationTile)> {
        self.tiles.iter().find(|(_, tile)| tile.cell == cell)
    }

    /// Tile stored in the slot, if any.
    #[must_use]
    pub fn tile(&self, slot: SlotId) -> Option<&StationTile> {
        self.tiles.get(slot)
    }

    /// First tile in slot order whose box overlaps `bounds`.
    #[must_use]
    pub fn first_overlapping(&self, bounds: &Aabb) -> Option<SlotId> {
        self.tiles
            .iter()
            .find(|(_, tile)| tile.bounds().overlaps(bounds))
            .map(|(slot, _)| slot)
    }

    /// Subtracts `damage` from the tile, retiring it when health drops below zero.
    pub fn damage_tile(&mut self, slot: SlotId, damage: i32) -> TileDamage {
        let Some(tile) = self.tiles.get_mut(slot) else {
            return TileDamage::Missing;
        };
        tile.health -= damage;
        if tile.health >= 0 {
            return TileDamage::Damaged {
                health: tile.health,
            };
        }

        match self.tiles.release(slot) {
            Some(retired) => TileDamage::Destroyed(retired),
            None => TileDamage::Missing,
        }
    }

    /// Counts down the cooldown of every powered turret.
    pub fn charge_turrets(&mut self) {
        for (_, tile) in self.tiles.iter_mut() {
            if tile.kind == TileKind::Turret && tile.powered {
                tile.cooldown -= 1;
            }
        }
    }

    /// Snapshots of every powered turret in slot order.
    pub fn turret_snapshots(&self) -> impl Iterator<Item = TurretSnapshot> + '_ {
        self.tiles
            .iter()
            .filter(|(_, tile)| tile.kind == TileKind::Turret && tile.powered)
            .map(|(turret, tile)| TurretSnapshot {
                turret,
                position: tile.position,
                cooldown: tile.cooldown,
            })
    }

    /// Resets a ready, powered turret and returns its launch position.
    pub fn fire_turret(&mut self, slot: SlotId) -> Option<WorldPoint> {
        let tile = self.tiles.get_mut(slot)?;
        if tile.kind != TileKind::Turret || !tile.powered || tile.cooldown > 0 {
            return None;
        }
        tile.cooldown = TURRET_COOLDOWN;
        Some(tile.position)
    }

    /// Runs the round-end settlement.
    ///
    /// Every tile is healed. Powered forges and the powered core pay out
    /// scrap, each payout marked with a scrap particle. Afterwards the rubber
    /// band is raised, the cursor is snapped back to the core when it lost
    /// its footing, and the loss of the core is reported.
    pub fn settle_round(
        &mut self,
        state: &mut GameState,
        particles: &mut ParticleLedger,
    ) -> Settlement {
        let mut settlement = Settlement::default();
        for (_, tile) in self.tiles.iter_mut() {
            tile.health = tile.max_health;
            if !tile.powered {
                continue;
            }

            let reward = tile.kind.round_reward();
            if reward > 0 {
                state.add_scrap(reward);
                particles.spawn(tile.position, ParticleKind::Scrap);
                settlement.scrap_awarded += reward;
            }
        }

        state.raise_rubber_band();

        if !self.can_cursor_move_to(self.cursor) {
            self.cursor = GridCoord::ORIGIN;
            settlement.cursor_reset = true;
        }

        settlement.core_lost = !self.core_exists();
        settlement
    }

    /// Reports whether the core tile is still standing.
    #[must_use]
    pub fn core_exists(&self) -> bool {
        self.tiles.iter().any(|(_, tile)| tile.kind == TileKind::Core)
    }

    /// Iterator over tiles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &StationTile)> {
        self.tiles.iter()
    }

    /// Number of live tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the station has no tiles left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

fn has_power_source_near(sources: &HashSet<GridCoord>, cell: GridCoord) -> bool {
    for column in cell.column() - 1..=cell.column() + 1 {
        for row in cell.row() - 1..=cell.row() + 1 {
            if sources.contains(&GridCoord::new(column, row)) {
                return true;
            }
        }
    }
    false
}
