//! Match detection
//!
//! Two rules share one predicate (same ordinary kind; obstacles never take
//! part):
//!
//! - **Straight runs**: three or more tiles along one of the three hex axes.
//! - **Diamonds**: four tiles forming a rhombus, that is a cell, two
//!   clockwise-adjacent neighbors, and the far cell both of those touch. A
//!   diamond also pulls in every same-kind neighbor of its four cells.
//!
//! Detection never mutates the board, so it is safe on simulated boards.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::topology::HexTopology;
use crate::types::{Coord, Direction, TileKind, MAX_COLUMNS, MAX_COLUMN_HEIGHT, MIN_RUN};

const MAX_RUN_CELLS: usize = MAX_COLUMN_HEIGHT as usize + MAX_COLUMNS;

/// Deterministically ordered coordinate set used throughout the engine.
pub type CoordSet = BTreeSet<Coord>;

/// Every coordinate taking part in any match.
pub fn find_matches(board: &Board) -> CoordSet {
    let mut matches = CoordSet::new();
    for (coord, tile) in board.tiles() {
        let Some(kind) = tile.match_kind() else {
            continue;
        };
        collect_runs(board, coord, kind, &mut matches);
        collect_diamonds(board, coord, kind, &mut matches);
    }
    matches
}

/// True if any match exists; stops at the first one found.
pub fn has_match(board: &Board) -> bool {
    board.tiles().any(|(coord, tile)| {
        tile.match_kind().is_some_and(|kind| {
            Direction::AXES
                .iter()
                .any(|&(fwd, back)| run_length(board, coord, kind, fwd, back) >= MIN_RUN)
                || diamond_at(board, coord, kind).is_some()
        })
    })
}

fn collect_runs(board: &Board, coord: Coord, kind: TileKind, out: &mut CoordSet) {
    for (fwd, back) in Direction::AXES {
        // Only start at the first cell of a run so each run is walked once.
        if same_kind_step(board, coord, kind, back).is_some() {
            continue;
        }
        let mut run: ArrayVec<Coord, MAX_RUN_CELLS> = ArrayVec::new();
        run.push(coord);
        let mut cursor = coord;
        while let Some(next) = same_kind_step(board, cursor, kind, fwd) {
            if run.try_push(next).is_err() {
                break;
            }
            cursor = next;
        }
        if run.len() >= MIN_RUN {
            out.extend(run);
        }
    }
}

fn run_length(board: &Board, coord: Coord, kind: TileKind, fwd: Direction, back: Direction) -> usize {
    let walk = |dir: Direction| {
        let mut len = 0;
        let mut cursor = coord;
        while let Some(next) = same_kind_step(board, cursor, kind, dir) {
            len += 1;
            cursor = next;
        }
        len
    };
    1 + walk(fwd) + walk(back)
}

/// The rhombus spanned by `a` and its clockwise neighbor direction:
/// `[coord, side_a, side_b, far]`, if all four cells are on the board.
fn rhombus(topology: &HexTopology, coord: Coord, a: Direction) -> Option<[Coord; 4]> {
    let b = a.clockwise();
    let side_a = topology.step(coord, a)?;
    let side_b = topology.step(coord, b)?;
    let far = topology.step(side_a, b)?;
    Some([coord, side_a, side_b, far])
}

/// The rhombus from `coord` along `a`, if all four cells share `kind`.
fn diamond(board: &Board, coord: Coord, kind: TileKind, a: Direction) -> Option<[Coord; 4]> {
    let cells = rhombus(board.topology(), coord, a)?;
    cells
        .iter()
        .all(|&cell| board.match_kind(cell) == Some(kind))
        .then_some(cells)
}

/// True if a `kind` tile at `at` would complete a diamond with three tiles
/// already on the board. `at` itself is not read.
///
/// Every rhombus through `at` has an acute corner at `at` or at one of its
/// neighbors, so those seven origins cover them all.
pub fn completes_diamond(board: &Board, at: Coord, kind: TileKind) -> bool {
    let topology = board.topology();
    let mut origins = std::iter::once(at).chain(topology.neighbors(at));
    origins.any(|origin| {
        Direction::ALL.iter().any(|&a| {
            rhombus(topology, origin, a).is_some_and(|cells| {
                cells.contains(&at)
                    && cells
                        .iter()
                        .filter(|&&cell| cell != at)
                        .all(|&cell| board.match_kind(cell) == Some(kind))
            })
        })
    })
}

fn diamond_at(board: &Board, coord: Coord, kind: TileKind) -> Option<[Coord; 4]> {
    Direction::ALL
        .iter()
        .find_map(|&a| diamond(board, coord, kind, a))
}

fn collect_diamonds(board: &Board, coord: Coord, kind: TileKind, out: &mut CoordSet) {
    let topology = board.topology();
    for a in Direction::ALL {
        let Some(cells) = diamond(board, coord, kind, a) else {
            continue;
        };
        for cell in cells {
            out.insert(cell);
            for neighbor in topology.neighbors(cell) {
                if board.match_kind(neighbor) == Some(kind) {
                    out.insert(neighbor);
                }
            }
        }
    }
}

#[inline]
fn same_kind_step(board: &Board, from: Coord, kind: TileKind, dir: Direction) -> Option<Coord> {
    board
        .topology()
        .step(from, dir)
        .filter(|&next| board.match_kind(next) == Some(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dead_board, with_kinds};
    use crate::types::Tile;

    #[test]
    fn dead_board_has_no_matches() {
        let board = dead_board();
        assert!(find_matches(&board).is_empty());
        assert!(!has_match(&board));
    }

    #[test]
    fn vertical_run_of_three() {
        let cells = [Coord::new(3, 1), Coord::new(3, 2), Coord::new(3, 3)];
        let board = with_kinds(dead_board(), &cells, TileKind::Red);
        let found = find_matches(&board);
        assert_eq!(found, cells.into_iter().collect());
        assert!(has_match(&board));
    }

    #[test]
    fn diagonal_run_crosses_the_center_column() {
        // NE from (1,0): (2,1) then center (3,2), tables change per column.
        let cells = [Coord::new(1, 0), Coord::new(2, 1), Coord::new(3, 2)];
        let board = with_kinds(dead_board(), &cells, TileKind::Red);
        assert_eq!(find_matches(&board), cells.into_iter().collect());
    }

    #[test]
    fn two_in_a_row_is_not_a_match() {
        let cells = [Coord::new(4, 1), Coord::new(4, 2)];
        let board = with_kinds(dead_board(), &cells, TileKind::Red);
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn diamond_is_detected() {
        // Center (3,2), N (3,3), NE (4,2), and the far cell N of (4,2) = (4,3).
        let cells = [
            Coord::new(3, 2),
            Coord::new(3, 3),
            Coord::new(4, 2),
            Coord::new(4, 3),
        ];
        let board = with_kinds(dead_board(), &cells, TileKind::Yellow);
        assert_eq!(find_matches(&board), cells.into_iter().collect());
    }

    #[test]
    fn diamond_grows_into_touching_same_kind_cells() {
        let cells = [
            Coord::new(3, 2),
            Coord::new(3, 3),
            Coord::new(4, 2),
            Coord::new(4, 3),
        ];
        let tail = Coord::new(5, 3);
        let mut board = with_kinds(dead_board(), &cells, TileKind::Yellow);
        board.set(tail, Some(Tile::ordinary(TileKind::Yellow)));
        let found = find_matches(&board);
        assert!(found.contains(&tail));
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn any_missing_corner_completes_the_diamond() {
        let cells = [
            Coord::new(3, 2),
            Coord::new(3, 3),
            Coord::new(4, 2),
            Coord::new(4, 3),
        ];
        for &gap in &cells {
            let mut board = with_kinds(dead_board(), &cells, TileKind::Yellow);
            board.set(gap, None);
            assert!(find_matches(&board).is_empty(), "{gap}");
            assert!(completes_diamond(&board, gap, TileKind::Yellow), "{gap}");
            assert!(!completes_diamond(&board, gap, TileKind::Red), "{gap}");
        }
    }

    #[test]
    fn dead_board_completes_no_diamond() {
        let board = dead_board();
        for (coord, tile) in board.tiles() {
            for kind in TileKind::ALL {
                assert!(
                    !completes_diamond(&board, coord, kind),
                    "{coord} {kind:?} {tile:?}"
                );
            }
        }
    }

    #[test]
    fn obstacles_break_runs() {
        let cells = [Coord::new(3, 0), Coord::new(3, 1), Coord::new(3, 3)];
        let mut board = with_kinds(dead_board(), &cells, TileKind::Red);
        board.set(Coord::new(3, 2), Some(Tile::obstacle(2)));
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn bombs_match_by_kind() {
        let cells = [Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)];
        let mut board = with_kinds(dead_board(), &cells, TileKind::Red);
        board.set(Coord::new(0, 1), Some(Tile::bomb(TileKind::Red)));
        assert_eq!(find_matches(&board).len(), 3);
    }
}
