//! Board builders shared by the integration tests.

#![allow(dead_code)]

use hexmatch::core::{Board, Engine, EngineConfig, HexTopology};
use hexmatch::types::{Coord, Tile, TileKind, DEFAULT_COLUMN_HEIGHTS};

pub fn default_topology() -> HexTopology {
    HexTopology::new(&DEFAULT_COLUMN_HEIGHTS).unwrap()
}

/// Kind of a proper 3-coloring of the board, so no two neighbors share it.
pub fn stripe_kind(topology: &HexTopology, coord: Coord) -> TileKind {
    let center = topology.center_column();
    let v = coord.row as i32 - coord.col.min(center) as i32;
    TileKind::ALL[(coord.col as i32 + 2 * v).rem_euclid(3) as usize]
}

/// Full board with no match and no productive swap.
pub fn dead_board() -> Board {
    let topology = default_topology();
    let kinds = topology.clone();
    Board::from_fn(topology, |coord| {
        Some(Tile::ordinary(stripe_kind(&kinds, coord)))
    })
}

pub fn with_tile(mut board: Board, coords: &[Coord], tile: Tile) -> Board {
    for &coord in coords {
        assert!(board.set(coord, Some(tile)), "{coord} is off the board");
    }
    board
}

/// Engine over `board` that never spawns obstacles.
pub fn quiet_engine(board: Board) -> Engine {
    Engine::with_board(EngineConfig::default().without_obstacles(), board).unwrap()
}

pub fn c(col: i8, row: i8) -> Coord {
    Coord::new(col, row)
}
