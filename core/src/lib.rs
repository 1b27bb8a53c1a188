#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scrap Station engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Systems consume immutable snapshots and respond
//! exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Scrap Station.";

/// Edge length of a station grid cell measured in world units.
pub const TILE_LENGTH: i32 = 32;

/// Edge length of the square collision box shared by tiles, asteroids and rockets.
pub const ENTITY_EXTENT: f32 = 32.0;

/// Scrap the player owns when a fresh game starts.
pub const STARTING_SCRAP: u32 = 300;

/// Describes the active gameplay mode for the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Between waves: the player moves the cursor and builds tiles.
    Build,
    /// A wave is running and turrets engage asteroids.
    Attack,
    /// The core was lost; only a restart leaves this mode.
    GameOver,
}

/// Functional role of a station tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    /// Cheap armour with no function of its own.
    Wall,
    /// Powers forges and turrets in its neighbourhood.
    Generator,
    /// Fires rockets at nearby asteroids while powered.
    Turret,
    /// Produces scrap at the end of every wave while powered.
    Forge,
    /// Heart of the station; losing it ends the game.
    Core,
}

impl TileKind {
    /// Tiles the player can construct, in hotkey order.
    pub const BUILDABLE: [TileKind; 4] = [
        TileKind::Wall,
        TileKind::Generator,
        TileKind::Turret,
        TileKind::Forge,
    ];

    /// Maximum health assigned to freshly built tiles of this kind.
    #[must_use]
    pub const fn max_health(self) -> i32 {
        match self {
            Self::Wall => 50,
            Self::Generator => 20,
            Self::Turret => 40,
            Self::Forge => 30,
            Self::Core => 100,
        }
    }

    /// Scrap required to build the tile, or `None` when the player cannot build it.
    #[must_use]
    pub const fn build_cost(self) -> Option<u32> {
        match self {
            Self::Wall => Some(20),
            Self::Generator => Some(30),
            Self::Turret => Some(40),
            Self::Forge => Some(40),
            Self::Core => None,
        }
    }

    /// Scrap granted at round end when the tile is powered.
    #[must_use]
    pub const fn round_reward(self) -> u32 {
        match self {
            Self::Forge => 20,
            Self::Core => 60,
            Self::Wall | Self::Generator | Self::Turret => 0,
        }
    }

    /// Reports whether the tile powers its neighbours.
    #[must_use]
    pub const fn is_power_source(self) -> bool {
        matches!(self, Self::Generator | Self::Core)
    }

    /// Reports whether the tile only works next to a power source.
    #[must_use]
    pub const fn requires_power(self) -> bool {
        matches!(self, Self::Turret | Self::Forge)
    }

    /// Short label shown next to the build hotkeys.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Generator => "pwr",
            Self::Turret => "gun",
            Self::Forge => "forge",
            Self::Core => "core",
        }
    }

    /// Resolves a zero-based build hotkey index into the tile it constructs.
    #[must_use]
    pub fn from_hotkey(index: usize) -> Option<Self> {
        Self::BUILDABLE.get(index).copied()
    }
}

/// Size class of an asteroid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AsteroidSize {
    /// Smallest fragment; never targeted and never splits.
    Small,
    /// Splits into small fragments.
    Medium,
    /// Splits into medium fragments.
    Large,
}

impl AsteroidSize {
    /// Frames a small asteroid survives; larger sizes scale linearly with rank.
    pub const SMALL_LIFETIME: i32 = 400;

    /// Resolves a numeric rank (0 = small) into a size, rejecting out-of-range ranks.
    #[must_use]
    pub const fn from_rank(rank: i32) -> Option<Self> {
        match rank {
            0 => Some(Self::Small),
            1 => Some(Self::Medium),
            2 => Some(Self::Large),
            _ => None,
        }
    }

    /// Numeric rank of the size, 0 for small through 2 for large.
    #[must_use]
    pub const fn rank(self) -> i32 {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }

    /// Size of the fragments produced when this asteroid splits.
    #[must_use]
    pub const fn smaller(self) -> Option<Self> {
        Self::from_rank(self.rank() - 1)
    }

    /// Total lifetime in frames of an asteroid of this size.
    #[must_use]
    pub const fn lifetime(self) -> i32 {
        Self::SMALL_LIFETIME * (self.rank() + 1)
    }
}

/// Visual effect categories tracked by the particle ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Short explosion puff.
    Pow,
    /// Scrap pickup marker shown when scrap is awarded.
    Scrap,
}

impl ParticleKind {
    /// Frames a particle of this kind stays alive.
    #[must_use]
    pub const fn lifetime(self) -> i32 {
        match self {
            Self::Pow => 20,
            Self::Scrap => 45,
        }
    }
}

/// Location of a station grid cell relative to the core at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: i32,
    row: i32,
}

impl GridCoord {
    /// Cell occupied by the core tile.
    pub const ORIGIN: GridCoord = GridCoord::new(0, 0);

    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column offset from the core, growing to the right.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row offset from the core, growing downwards.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell in the provided direction.
    #[must_use]
    pub const fn step(self, step: CursorStep) -> Self {
        match step {
            CursorStep::Up => Self::new(self.column, self.row - 1),
            CursorStep::Down => Self::new(self.column, self.row + 1),
            CursorStep::Left => Self::new(self.column - 1, self.row),
            CursorStep::Right => Self::new(self.column + 1, self.row),
        }
    }

    /// Computes the Chebyshev (king move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: GridCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

/// Discrete cursor movement requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorStep {
    /// Toward decreasing rows.
    Up,
    /// Toward increasing rows.
    Down,
    /// Toward decreasing columns.
    Left,
    /// Toward increasing columns.
    Right,
}

impl CursorStep {
    /// Steps in the order the builder processes them each frame.
    pub const ALL: [CursorStep; 4] = [
        CursorStep::Up,
        CursorStep::Down,
        CursorStep::Left,
        CursorStep::Right,
    ];
}

/// Position in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Moves the point `distance` units along `heading`.
    ///
    /// Headings follow the station convention: `x` advances with `sin` and
    /// `y` with `cos`, so a heading of zero points down the screen.
    #[must_use]
    pub fn advanced(self, heading: f32, distance: f32) -> Self {
        Self {
            x: self.x + heading.sin() * distance,
            y: self.y + heading.cos() * distance,
        }
    }

    /// Heading that points from `self` toward `target` in the station convention.
    #[must_use]
    pub fn heading_to(self, target: WorldPoint) -> f32 {
        (target.x - self.x).atan2(target.y - self.y)
    }
}

/// Axis-aligned rectangle in world units anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Aabb {
    /// Creates a rectangle from its top-left corner and dimensions.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Collision box of an entity anchored at `point`.
    #[must_use]
    pub const fn entity_at(point: WorldPoint) -> Self {
        Self::new(point.x, point.y, ENTITY_EXTENT, ENTITY_EXTENT)
    }

    /// Reports whether two rectangles overlap. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Visible play area used to cull asteroids that drifted off screen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport with the provided dimensions in world units.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Rectangle covering the viewport, anchored at the world origin.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        Aabb::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640.0, 420.0)
    }
}

/// Index of an occupied slot inside one of the world's fixed-capacity pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Fixed-capacity pools owned by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    /// Station tiles.
    Tile,
    /// Hostile asteroids.
    Asteroid,
    /// Turret rockets.
    Rocket,
}

impl PoolKind {
    /// Number of slots reserved for the pool.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Tile => 120,
            Self::Asteroid => 300,
            Self::Rocket => 30,
        }
    }
}

/// How turrets pick among asteroids inside their engagement radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetSelection {
    /// Last eligible asteroid in slot order that lies inside the radius.
    ///
    /// This is the classic turret behaviour: the radius is never narrowed
    /// while scanning, so the pick is not necessarily the nearest asteroid.
    #[default]
    LastInRange,
    /// Nearest eligible asteroid inside the radius; ties keep the earlier slot.
    Nearest,
}

/// Immutable snapshot of a powered turret used for targeting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretSnapshot {
    /// Slot of the turret tile.
    pub turret: SlotId,
    /// World position of the turret tile.
    pub position: WorldPoint,
    /// Frames until the turret may fire again; ready at zero or below.
    pub cooldown: i32,
}

impl TurretSnapshot {
    /// Reports whether the turret may fire this frame.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown <= 0
    }
}

/// Wave timing snapshot consumed by the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveClock {
    /// Active game mode.
    pub mode: GameMode,
    /// Frames elapsed since the game started.
    pub game_timer: u64,
    /// Frames of spawning left in the current wave.
    pub wave_timer: i32,
    /// Upper bound of asteroids spawned per spawn tick.
    pub difficulty: u32,
}

/// Reasons a build request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildError {
    /// The simulation is not in build mode.
    InvalidMode,
    /// A tile already occupies the cursor cell.
    Occupied,
    /// The player cannot afford the tile.
    InsufficientScrap,
    /// The requested kind cannot be built by the player.
    NotBuildable,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Runs the pending round-end settlement when the world is in build mode.
    SettleRound,
    /// Requests that the build cursor move one cell.
    MoveCursor {
        /// Direction of the requested move.
        step: CursorStep,
    },
    /// Requests construction of a tile at the build cursor.
    BuildTile {
        /// Kind of tile to construct.
        kind: TileKind,
    },
    /// Requests that the next wave begins.
    StartWave,
    /// Counts down the cooldown of every powered turret.
    ChargeTurrets,
    /// Requests that a turret launches a rocket.
    FireRocket {
        /// Slot of the firing turret tile.
        turret: SlotId,
        /// Heading of the rocket in radians.
        direction: f32,
    },
    /// Advances the game clock and wave timers by one frame.
    AdvanceClock,
    /// Requests a new asteroid.
    SpawnAsteroid {
        /// Spawn position.
        position: WorldPoint,
        /// Size class of the asteroid.
        size: AsteroidSize,
        /// Heading in radians.
        direction: f32,
        /// Distance travelled per frame.
        speed: f32,
    },
    /// Moves asteroids, particles and rockets by one frame and resolves collisions.
    AdvanceEntities,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the game clock advanced.
    TimeAdvanced {
        /// Frame counter after the advance.
        game_timer: u64,
    },
    /// Announces that the simulation entered a new mode.
    ModeChanged {
        /// Mode that became active.
        mode: GameMode,
    },
    /// Confirms that a wave began.
    WaveStarted {
        /// One-based number of the wave.
        wave: u32,
        /// Frames during which asteroids keep spawning.
        duration: i32,
        /// Upper bound of asteroids spawned per spawn tick.
        difficulty: u32,
    },
    /// Reports that the wave timer elapsed and every asteroid is gone.
    WaveCleared {
        /// Number of the cleared wave.
        wave: u32,
    },
    /// Reports the outcome of a round-end settlement.
    RoundSettled {
        /// Scrap granted by powered forges and the core.
        scrap_awarded: u32,
        /// Rubber-band modifier after the settlement.
        rubber_band: u32,
    },
    /// Confirms that the build cursor moved.
    CursorMoved {
        /// Cell the cursor occupies after moving.
        cell: GridCoord,
    },
    /// Reports that a cursor move was refused because the cell is not next to the station.
    CursorBlocked {
        /// Cell the cursor tried to enter.
        target: GridCoord,
    },
    /// Reports that the build cursor was snapped back to the core.
    CursorReset,
    /// Confirms that a tile was built.
    TileBuilt {
        /// Slot assigned to the tile.
        tile: SlotId,
        /// Kind of the new tile.
        kind: TileKind,
        /// Cell occupied by the tile.
        cell: GridCoord,
    },
    /// Reports that a build request was rejected.
    BuildRejected {
        /// Kind of tile requested.
        kind: TileKind,
        /// Cell the tile would have occupied.
        cell: GridCoord,
        /// Specific reason the build failed.
        reason: BuildError,
    },
    /// Reports that a tile took damage and survived.
    TileDamaged {
        /// Slot of the struck tile.
        tile: SlotId,
        /// Damage applied.
        damage: i32,
        /// Health left after the hit.
        health: i32,
    },
    /// Reports that a tile was destroyed and its slot released.
    TileDestroyed {
        /// Slot the tile occupied.
        tile: SlotId,
        /// Kind of the destroyed tile.
        kind: TileKind,
        /// Cell the tile occupied.
        cell: GridCoord,
    },
    /// Confirms that a turret launched a rocket.
    RocketFired {
        /// Slot of the firing turret.
        turret: SlotId,
        /// Slot assigned to the rocket.
        rocket: SlotId,
        /// Heading of the rocket in radians.
        direction: f32,
    },
    /// Reports that an asteroid was destroyed and split.
    AsteroidDestroyed {
        /// Size of the destroyed asteroid.
        size: AsteroidSize,
        /// Position where it broke apart.
        position: WorldPoint,
        /// Number of fragments spawned.
        fragments: u32,
    },
    /// Requests a camera shake from the presentation layer.
    ScreenShake {
        /// Strength of the shake.
        intensity: f32,
    },
    /// Diagnostic emitted when a saturated pool overwrote an occupied slot.
    SlotEvicted {
        /// Pool that was saturated.
        pool: PoolKind,
        /// Slot whose occupant was overwritten.
        slot: SlotId,
    },
    /// Announces that the core was lost.
    GameOver {
        /// Number of waves the station survived.
        wave: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        Aabb, AsteroidSize, CursorStep, GridCoord, ParticleKind, PoolKind, TileKind, WorldPoint,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        assert_round_trip(&GridCoord::new(-3, 7));
    }

    #[test]
    fn chebyshev_distance_uses_largest_axis() {
        let origin = GridCoord::ORIGIN;
        assert_eq!(origin.chebyshev_distance(GridCoord::new(1, 1)), 1);
        assert_eq!(origin.chebyshev_distance(GridCoord::new(-2, 1)), 2);
        assert_eq!(GridCoord::new(4, -1).chebyshev_distance(origin), 4);
    }

    #[test]
    fn cursor_steps_move_one_cell() {
        let cell = GridCoord::new(2, 2);
        assert_eq!(cell.step(CursorStep::Up), GridCoord::new(2, 1));
        assert_eq!(cell.step(CursorStep::Down), GridCoord::new(2, 3));
        assert_eq!(cell.step(CursorStep::Left), GridCoord::new(1, 2));
        assert_eq!(cell.step(CursorStep::Right), GridCoord::new(3, 2));
    }

    #[test]
    fn tile_tables_match_station_rules() {
        let health: Vec<i32> = [
            TileKind::Wall,
            TileKind::Generator,
            TileKind::Turret,
            TileKind::Forge,
            TileKind::Core,
        ]
        .iter()
        .map(|kind| kind.max_health())
        .collect();
        assert_eq!(health, vec![50, 20, 40, 30, 100]);

        let costs: Vec<Option<u32>> = TileKind::BUILDABLE
            .iter()
            .map(|kind| kind.build_cost())
            .collect();
        assert_eq!(costs, vec![Some(20), Some(30), Some(40), Some(40)]);
        assert_eq!(TileKind::Core.build_cost(), None);
        assert_eq!(TileKind::from_hotkey(2), Some(TileKind::Turret));
        assert_eq!(TileKind::from_hotkey(4), None);
    }

    #[test]
    fn asteroid_sizes_shrink_until_small() {
        assert_eq!(AsteroidSize::Large.smaller(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.smaller(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.smaller(), None);
        assert_eq!(AsteroidSize::from_rank(-1), None);
        assert_eq!(AsteroidSize::Large.lifetime(), 1200);
    }

    #[test]
    fn particle_lifetimes_follow_kind() {
        assert_eq!(ParticleKind::Pow.lifetime(), 20);
        assert_eq!(ParticleKind::Scrap.lifetime(), 45);
    }

    #[test]
    fn pool_capacities_are_fixed() {
        assert_eq!(PoolKind::Tile.capacity(), 120);
        assert_eq!(PoolKind::Asteroid.capacity(), 300);
        assert_eq!(PoolKind::Rocket.capacity(), 30);
    }

    #[test]
    fn boxes_overlap_only_when_interiors_intersect() {
        let a = Aabb::new(0.0, 0.0, 32.0, 32.0);
        assert!(a.overlaps(&Aabb::new(31.0, 31.0, 32.0, 32.0)));
        assert!(!a.overlaps(&Aabb::new(32.0, 0.0, 32.0, 32.0)));
        assert!(!a.overlaps(&Aabb::new(-40.0, 0.0, 32.0, 32.0)));
    }

    #[test]
    fn heading_round_trips_through_advance() {
        let origin = WorldPoint::new(10.0, 10.0);
        let target = WorldPoint::new(40.0, -30.0);
        let heading = origin.heading_to(target);
        let moved = origin.advanced(heading, origin.distance(target));
        assert!((moved.x - target.x).abs() < 1e-3);
        assert!((moved.y - target.y).abs() < 1e-3);
    }
}
