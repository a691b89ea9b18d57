//! Shared data types and tuning constants for the hex match engine.
//!
//! Everything here is plain data with no engine logic, so the same types can be
//! used by the core, the terminal front end, and any external presentation
//! layer that consumes the engine's event log.
//!
//! # Board Geometry
//!
//! The board is a hexagon made of vertical columns. Column `col` holds
//! `column_heights[col]` cells, stacked from row 0 at the bottom. Heights grow
//! by one cell per column up to the center column and shrink by one after it,
//! so the default board (column heights `3,4,5,6,5,4,3`) holds 30 tiles.
//!
//! Neighbor offsets therefore depend on which side of the center a column is
//! on; see `hexmatch_core::topology` for the tables.
//!
//! # Examples
//!
//! ```
//! use hexmatch_types::{Coord, Direction, Tile, TileKind};
//!
//! let tile = Tile::ordinary(TileKind::Red);
//! assert_eq!(tile.match_kind(), Some(TileKind::Red));
//! assert!(!tile.is_bomb());
//!
//! assert_eq!(Direction::NorthEast.opposite(), Direction::SouthWest);
//! assert_eq!(Coord::new(2, 3).offset(1, -1), Coord::new(3, 2));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default column heights (a 7-column hexagon holding 30 tiles).
pub const DEFAULT_COLUMN_HEIGHTS: [u8; 7] = [3, 4, 5, 6, 5, 4, 3];

/// Largest supported column count.
pub const MAX_COLUMNS: usize = 15;

/// Largest supported column height.
pub const MAX_COLUMN_HEIGHT: u8 = 16;

/// Shortest straight run that counts as a match.
pub const MIN_RUN: usize = 3;

/// Connected cluster size that promotes one member to a bomb.
pub const DEFAULT_BOMB_CLUSTER_MIN: u8 = 4;

/// Blast radius of an ordinary bomb detonation (the 1-ring).
pub const BOMB_RADIUS: u8 = 1;

/// Blast radius of each bomb when two bombs are swapped into each other.
pub const DOUBLE_BOMB_RADIUS: u8 = 2;

/// Blast radius of a bomb caught inside a double-bomb blast.
pub const CHAIN_BOMB_RADIUS: u8 = 1;

/// Hits an obstacle absorbs before it becomes removable.
pub const DEFAULT_OBSTACLE_HITS: u8 = 2;

/// Chance (percent) that a spawned tile is an obstacle.
pub const DEFAULT_OBSTACLE_SPAWN_PERCENT: u8 = 10;

/// Maximum number of obstacles alive on the board at once.
pub const DEFAULT_OBSTACLE_LIMIT: u8 = 10;

/// Largest board that may be played with only three kinds. Bigger boards
/// refill into fresh matches too often to settle.
pub const MAX_THREE_KIND_CAPACITY: usize = 40;

/// Detect/remove/refill passes one resolve cycle may run before it stops.
pub const MAX_CASCADE_PASSES: u32 = 256;

/// Bounded retries of the reshuffle-then-recheck loop.
pub const DEFAULT_MAX_RESHUFFLE_ATTEMPTS: u8 = 8;

/// Idle time before the front end shows a hint on its own.
pub const AUTO_HINT_DELAY_MS: u32 = 3000;

/// Fixed timestep of the terminal front end (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;


/// Board coordinate: column index and row index (row 0 is the bottom slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub col: i8,
    pub row: i8,
}

impl Coord {
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    /// Raw offset; callers must bounds-check the result.
    pub const fn offset(self, dcol: i8, drow: i8) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// The six hex directions, clockwise from straight up.
///
/// Index `i` and `i + 3` are always opposite, so the three match axes are
/// `N/S`, `NE/SW` and `SE/NW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Opposite direction pairs, one per straight-run axis.
    pub const AXES: [(Direction, Direction); 3] = [
        (Direction::North, Direction::South),
        (Direction::NorthEast, Direction::SouthWest),
        (Direction::SouthEast, Direction::NorthWest),
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Self {
        Self::ALL[(self as usize + 3) % 6]
    }

    /// Next direction clockwise (60° turn).
    pub const fn clockwise(self) -> Self {
        Self::ALL[(self as usize + 1) % 6]
    }
}

/// Ordinary tile colors.
///
/// `kind_count` in the engine config selects a prefix of [`TileKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Yellow,
}

impl TileKind {
    pub const ALL: [TileKind; 6] = [
        TileKind::Blue,
        TileKind::Green,
        TileKind::Orange,
        TileKind::Purple,
        TileKind::Red,
        TileKind::Yellow,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Hit counter carried by an obstacle tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleState {
    pub hits: u8,
    pub threshold: u8,
}

impl ObstacleState {
    pub const fn new(threshold: u8) -> Self {
        Self { hits: 0, threshold }
    }

    pub const fn is_removable(&self) -> bool {
        self.hits >= self.threshold
    }
}

/// One playable unit on the board.
///
/// A bomb is an ordinary color tile with `bomb = true`; it matches like any
/// other tile of its kind. Obstacles never match and never extend a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tile {
    Ordinary { kind: TileKind, bomb: bool },
    Obstacle(ObstacleState),
}

impl Tile {
    pub const fn ordinary(kind: TileKind) -> Self {
        Tile::Ordinary { kind, bomb: false }
    }

    pub const fn bomb(kind: TileKind) -> Self {
        Tile::Ordinary { kind, bomb: true }
    }

    pub const fn obstacle(threshold: u8) -> Self {
        Tile::Obstacle(ObstacleState::new(threshold))
    }

    /// Kind used for match detection; `None` for obstacles.
    #[inline(always)]
    pub const fn match_kind(&self) -> Option<TileKind> {
        match self {
            Tile::Ordinary { kind, .. } => Some(*kind),
            Tile::Obstacle(_) => None,
        }
    }

    pub const fn is_bomb(&self) -> bool {
        matches!(self, Tile::Ordinary { bomb: true, .. })
    }

    pub const fn is_obstacle(&self) -> bool {
        matches!(self, Tile::Obstacle(_))
    }
}

/// Why a coordinate was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Part of a detected match.
    Matched,
    /// Caught in a bomb blast.
    Exploded,
    /// Obstacle that reached its hit threshold.
    Broken,
}

/// Engine output consumed by presentation.
///
/// A `CascadeLog` is an ordered list of these; the presentation layer replays
/// them at its own pace while the engine's board already holds the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CascadeEvent {
    /// Two tiles exchanged coordinates.
    Swapped { a: Coord, b: Coord },
    /// A new detect/remove/refill pass begins (1-based).
    PassStarted { pass: u32 },
    Removed { coord: Coord, reason: RemovalReason },
    /// The tile at `coord` became a bomb instead of being removed.
    Promoted { coord: Coord },
    /// An obstacle took one hit and now has `hits` total.
    ObstacleHit { coord: Coord, hits: u8 },
    Moved { coord: Coord, from: Coord },
    Spawned { coord: Coord, tile: Tile },
    /// Reshuffle re-typed the tile at `coord` in place.
    Retyped { coord: Coord, kind: TileKind },
}

/// Actions the front end can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Select the tile under the cursor, or swap with the selected tile.
    Select,
    /// Drop the current selection.
    Cancel,
    Hint,
    Reshuffle,
    Restart,
}
