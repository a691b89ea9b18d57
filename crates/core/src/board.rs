//! Board module - the authoritative coordinate → tile mapping
//!
//! Storage is a flat `Vec<Option<Tile>>` laid out column by column, indexed
//! through [`HexTopology::index`]. One slot per coordinate means a coordinate
//! can never hold two tiles; the board owns no presentation state.

use crate::topology::HexTopology;
use crate::types::{Coord, Tile, TileKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    topology: HexTopology,
    slots: Vec<Option<Tile>>,
}

impl Board {
    /// Create an empty board for `topology`.
    pub fn new(topology: HexTopology) -> Self {
        let slots = vec![None; topology.capacity()];
        Self { topology, slots }
    }

    /// Build a board by asking `f` for the content of every slot.
    pub fn from_fn(topology: HexTopology, mut f: impl FnMut(Coord) -> Option<Tile>) -> Self {
        let slots = topology.coords().map(&mut f).collect();
        Self { topology, slots }
    }

    pub fn topology(&self) -> &HexTopology {
        &self.topology
    }

    /// Tile at `coord`; `None` when the slot is empty or off the board.
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<Tile> {
        self.topology.index(coord).and_then(|idx| self.slots[idx])
    }

    #[inline]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        let idx = self.topology.index(coord)?;
        self.slots[idx].as_mut()
    }

    /// Kind used by match detection at `coord`.
    #[inline(always)]
    pub fn match_kind(&self, coord: Coord) -> Option<TileKind> {
        self.get(coord).and_then(|tile| tile.match_kind())
    }

    /// Overwrite the slot at `coord`. Returns false if out of bounds.
    pub fn set(&mut self, coord: Coord, tile: Option<Tile>) -> bool {
        match self.topology.index(coord) {
            Some(idx) => {
                self.slots[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Place a tile into an empty slot. Refuses occupied or off-board slots.
    pub fn place(&mut self, coord: Coord, tile: Tile) -> bool {
        match self.topology.index(coord) {
            Some(idx) if self.slots[idx].is_none() => {
                self.slots[idx] = Some(tile);
                true
            }
            _ => false,
        }
    }

    pub fn take(&mut self, coord: Coord) -> Option<Tile> {
        let idx = self.topology.index(coord)?;
        self.slots[idx].take()
    }

    /// Exchange the contents of two slots. Returns false if either is off the board.
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        match (self.topology.index(a), self.topology.index(b)) {
            (Some(ia), Some(ib)) => {
                self.slots.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Move the tile at `from` into the empty slot `to`.
    pub fn move_tile(&mut self, from: Coord, to: Coord) -> bool {
        if self.is_occupied(to) || !self.topology.in_bounds(to) {
            return false;
        }
        match self.take(from) {
            Some(tile) => self.place(to, tile),
            None => false,
        }
    }

    #[inline]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    /// In bounds and empty.
    pub fn is_hole(&self, coord: Coord) -> bool {
        matches!(self.topology.index(coord), Some(idx) if self.slots[idx].is_none())
    }

    /// Number of occupied slots in `col`.
    pub fn column_fill(&self, col: i8) -> u8 {
        let height = self.topology.column_height(col);
        (0..height as i8)
            .filter(|&row| self.is_occupied(Coord::new(col, row)))
            .count() as u8
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn obstacle_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Some(tile) if tile.is_obstacle()))
            .count()
    }

    /// Empty in-bounds coordinates, column by column.
    pub fn holes(&self) -> impl Iterator<Item = Coord> + '_ {
        self.topology
            .coords()
            .zip(self.slots.iter())
            .filter(|(_, slot)| slot.is_none())
            .map(|(coord, _)| coord)
    }

    /// Occupied slots in column-major, row-ascending order.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        self.topology
            .coords()
            .zip(self.slots.iter())
            .filter_map(|(coord, slot)| slot.map(|tile| (coord, tile)))
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
    }
}
