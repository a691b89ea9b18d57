//! Topology module - neighbor tables and bounds for the hexagon board
//!
//! The board is a hexagon of vertical columns whose heights step up by one
//! toward the center column and down by one after it. Because of that, a
//! column's neighbor offsets depend only on which side of the center it sits:
//!
//! | Direction | Left of center | Center  | Right of center |
//! |-----------|----------------|---------|-----------------|
//! | N         | (0,+1)         | (0,+1)  | (0,+1)          |
//! | NE        | (+1,+1)        | (+1,0)  | (+1,0)          |
//! | SE        | (+1,0)         | (+1,-1) | (+1,-1)         |
//! | S         | (0,-1)         | (0,-1)  | (0,-1)          |
//! | SW        | (-1,-1)        | (-1,-1) | (-1,0)          |
//! | NW        | (-1,0)         | (-1,0)  | (-1,+1)         |
//!
//! Every other module goes through [`HexTopology`] for adjacency; nothing else
//! re-derives offsets.

use arrayvec::ArrayVec;

use crate::config::ConfigError;
use crate::types::{Coord, Direction, MAX_COLUMNS, MAX_COLUMN_HEIGHT};

type OffsetTable = [(i8, i8); 6];

const LEFT_OFFSETS: OffsetTable = [(0, 1), (1, 1), (1, 0), (0, -1), (-1, -1), (-1, 0)];
const CENTER_OFFSETS: OffsetTable = [(0, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0)];
const RIGHT_OFFSETS: OffsetTable = [(0, 1), (1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1)];

/// Which neighbor table a column uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSide {
    Left,
    Center,
    Right,
}

/// Column heights plus the derived lookup data for a hexagon board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexTopology {
    heights: ArrayVec<u8, MAX_COLUMNS>,
    /// Flat index of row 0 for each column.
    starts: ArrayVec<u16, MAX_COLUMNS>,
    center: i8,
    capacity: usize,
}

impl HexTopology {
    /// Build a topology, validating that `heights` describes a hexagon.
    pub fn new(heights: &[u8]) -> Result<Self, ConfigError> {
        let count = heights.len();
        if count < 3 || count > MAX_COLUMNS || count % 2 == 0 {
            return Err(ConfigError::ColumnCount(count));
        }
        for (col, &h) in heights.iter().enumerate() {
            if h == 0 || h > MAX_COLUMN_HEIGHT {
                return Err(ConfigError::ColumnHeight { col, height: h });
            }
        }
        let center = count / 2;
        for col in 1..count {
            let step = heights[col] as i16 - heights[col - 1] as i16;
            let expected = if col <= center { 1 } else { -1 };
            if step != expected {
                return Err(ConfigError::NotHexagonal { col });
            }
        }

        let mut starts = ArrayVec::new();
        let mut capacity = 0usize;
        for &h in heights {
            starts.push(capacity as u16);
            capacity += h as usize;
        }

        Ok(Self {
            heights: heights.iter().copied().collect(),
            starts,
            center: center as i8,
            capacity,
        })
    }

    pub fn column_count(&self) -> usize {
        self.heights.len()
    }

    pub fn heights(&self) -> &[u8] {
        &self.heights
    }

    /// Height of `col`, or 0 for a column off the board.
    #[inline]
    pub fn column_height(&self, col: i8) -> u8 {
        if col < 0 {
            return 0;
        }
        self.heights.get(col as usize).copied().unwrap_or(0)
    }

    pub fn center_column(&self) -> i8 {
        self.center
    }

    /// Total number of slots on the board.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn side(&self, col: i8) -> ColumnSide {
        match col.cmp(&self.center) {
            std::cmp::Ordering::Less => ColumnSide::Left,
            std::cmp::Ordering::Equal => ColumnSide::Center,
            std::cmp::Ordering::Greater => ColumnSide::Right,
        }
    }

    /// The six `(dcol, drow)` offsets for `col`, indexed by [`Direction`].
    #[inline]
    pub fn neighbor_offsets(&self, col: i8) -> &'static [(i8, i8); 6] {
        match self.side(col) {
            ColumnSide::Left => &LEFT_OFFSETS,
            ColumnSide::Center => &CENTER_OFFSETS,
            ColumnSide::Right => &RIGHT_OFFSETS,
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0 && (coord.row as i16) < self.column_height(coord.col) as i16
    }

    /// Neighbor of `coord` in direction `dir`, if it is on the board.
    #[inline]
    pub fn step(&self, coord: Coord, dir: Direction) -> Option<Coord> {
        let (dc, dr) = self.neighbor_offsets(coord.col)[dir.index()];
        let next = coord.offset(dc, dr);
        self.in_bounds(next).then_some(next)
    }

    /// On-board neighbors in [`Direction::ALL`] order.
    pub fn neighbors(&self, coord: Coord) -> ArrayVec<Coord, 6> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.step(coord, dir))
            .collect()
    }

    pub fn are_adjacent(&self, a: Coord, b: Coord) -> bool {
        self.in_bounds(a) && Direction::ALL.iter().any(|&dir| self.step(a, dir) == Some(b))
    }

    /// Flat slot index of an on-board coordinate.
    #[inline]
    pub fn index(&self, coord: Coord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(self.starts[coord.col as usize] as usize + coord.row as usize)
    }

    /// Every on-board coordinate, column by column, bottom row first.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.heights
            .iter()
            .enumerate()
            .flat_map(|(col, &h)| (0..h as i8).map(move |row| Coord::new(col as i8, row)))
    }

    /// Vertical position of `coord` in half-cell units, 0 at the board's
    /// middle, growing upward. Columns are centered, so neighbors in
    /// adjacent columns sit exactly one unit above or below.
    pub fn half_row(&self, coord: Coord) -> i16 {
        2 * coord.row as i16 - (self.column_height(coord.col) as i16 - 1)
    }

    /// Row of `col` whose [`half_row`](Self::half_row) is nearest `half`,
    /// preferring the upper one on ties. `None` for a column off the board.
    pub fn row_near(&self, col: i8, half: i16) -> Option<i8> {
        let height = self.column_height(col) as i16;
        if height == 0 {
            return None;
        }
        // half = 2*row - (height - 1)  =>  row = (half + height - 1) / 2
        let doubled = half + height - 1;
        let row = (doubled + doubled.rem_euclid(2)) / 2;
        Some(row.clamp(0, height - 1) as i8)
    }

    /// Column visiting order for sideways sliding: outermost pair first,
    /// working inward, center last.
    pub fn exploration_order(&self) -> ArrayVec<i8, MAX_COLUMNS> {
        let last = self.heights.len() as i8 - 1;
        let mut order = ArrayVec::new();
        for offset in 0..self.center {
            order.push(offset);
            order.push(last - offset);
        }
        order.push(self.center);
        order
    }
}
