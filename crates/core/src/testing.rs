//! Board builders shared by the unit tests.

use crate::board::Board;
use crate::topology::HexTopology;
use crate::types::{Coord, Tile, TileKind, DEFAULT_COLUMN_HEIGHTS};

pub(crate) fn default_topology() -> HexTopology {
    HexTopology::new(&DEFAULT_COLUMN_HEIGHTS).unwrap()
}

/// Kind of a proper 3-coloring: no two neighbors ever share a kind.
pub(crate) fn stripe_kind(topology: &HexTopology, coord: Coord) -> TileKind {
    let center = topology.center_column();
    let v = coord.row as i32 - coord.col.min(center) as i32;
    let idx = (coord.col as i32 + 2 * v).rem_euclid(3);
    TileKind::ALL[idx as usize]
}

/// Full board with no match and no productive swap.
pub(crate) fn dead_board() -> Board {
    let topology = default_topology();
    let kinds = topology.clone();
    Board::from_fn(topology, |coord| Some(Tile::ordinary(stripe_kind(&kinds, coord))))
}

/// Overwrite `coords` with ordinary tiles of `kind`.
pub(crate) fn with_kinds(mut board: Board, coords: &[Coord], kind: TileKind) -> Board {
    for &coord in coords {
        assert!(board.set(coord, Some(Tile::ordinary(kind))), "{coord} is off the board");
    }
    board
}
