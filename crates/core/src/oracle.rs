//! Solvability oracle: playable-swap search, hint previews and reshuffles.

use tracing::debug;

use crate::board::Board;
use crate::matcher::{find_matches, has_match, CoordSet};
use crate::rng::SimpleRng;
use crate::types::{CascadeEvent, Coord, Tile};

/// First adjacent swap that would produce a match, in coordinate order then
/// neighbor-table order. Every pair without an obstacle is tried, same-kind
/// pairs included, so the answer agrees with what [`crate::Engine::apply_swap`]
/// accepts. `None` means the board is dead.
///
/// Simulation happens on a private copy; `board` is never touched.
pub fn try_find_swap(board: &Board) -> Option<(Coord, Coord)> {
    let topology = board.topology();
    let mut scratch = board.clone();
    for (coord, tile) in board.tiles() {
        if tile.is_obstacle() {
            continue;
        }
        for neighbor in topology.neighbors(coord) {
            let Some(other) = board.get(neighbor) else {
                continue;
            };
            if other.is_obstacle() {
                continue;
            }
            if is_productive(&mut scratch, coord, tile, neighbor, other) {
                return Some((coord, neighbor));
            }
        }
    }
    None
}

/// Coordinates that would match if `a` and `b` were swapped.
pub fn swap_preview(board: &Board, a: Coord, b: Coord) -> CoordSet {
    let mut scratch = board.clone();
    if !scratch.swap(a, b) {
        return CoordSet::new();
    }
    find_matches(&scratch)
}

/// Two bombs side by side always make a playable move.
fn is_productive(scratch: &mut Board, a: Coord, ta: Tile, b: Coord, tb: Tile) -> bool {
    if ta.is_bomb() && tb.is_bomb() {
        return true;
    }
    scratch.swap(a, b);
    let hit = has_match(scratch);
    scratch.swap(a, b);
    hit
}

/// Re-type every ordinary, non-bomb tile in place. Bombs and obstacles keep
/// their state and coordinates do not change.
pub fn reshuffle(board: &mut Board, rng: &mut SimpleRng, kind_count: u8, events: &mut Vec<CascadeEvent>) {
    let targets: Vec<Coord> = board
        .tiles()
        .filter(|(_, tile)| matches!(tile, Tile::Ordinary { bomb: false, .. }))
        .map(|(coord, _)| coord)
        .collect();
    debug!(tiles = targets.len(), "re-typing board");

    for coord in targets {
        let kind = rng.draw_kind(kind_count);
        board.set(coord, Some(Tile::ordinary(kind)));
        events.push(CascadeEvent::Retyped { coord, kind });
    }
}
