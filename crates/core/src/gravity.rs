//! Gravity and refill
//!
//! Refilling runs in three phases:
//!
//! 1. **Compaction** packs every column down to rows `0..fill`.
//! 2. **Relaxation** slides top tiles sideways into neighbor columns that sit
//!    lower, scanning columns outermost pair first. Every slide lowers the
//!    moved tile's row, so the sum of occupied rows strictly decreases and
//!    the phase terminates. At the fixed point any remaining hole implies a
//!    hole at the top of the center column.
//! 3. **Spawning** drops one tile at a time above the center column. It falls
//!    south, then south-west, then south-east until it rests, receives its
//!    kind there, and the board relaxes again before the next drop.
//!
//! Columns stay compacted after every move.

use arrayvec::ArrayVec;
use tracing::error;

use crate::board::Board;
use crate::config::EngineConfig;
use crate::matcher::completes_diamond;
use crate::rng::SimpleRng;
use crate::types::{CascadeEvent, Coord, Direction, Tile, TileKind};

/// What new tiles look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPolicy {
    pub kind_count: u8,
    pub obstacle_spawn_percent: u8,
    pub obstacle_limit: u8,
    pub obstacle_hits: u8,
}

impl From<&EngineConfig> for SpawnPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            kind_count: config.kind_count,
            obstacle_spawn_percent: config.obstacle_spawn_percent,
            obstacle_limit: config.obstacle_limit,
            obstacle_hits: config.obstacle_hits,
        }
    }
}

/// Compact, relax and spawn until the board is full.
pub fn fill(board: &mut Board, rng: &mut SimpleRng, policy: &SpawnPolicy, events: &mut Vec<CascadeEvent>) {
    compact(board, events);
    relax(board, events);

    let missing = board.topology().capacity() - board.occupied_count();
    for _ in 0..missing {
        if !spawn_one(board, rng, policy, events) {
            break;
        }
        relax(board, events);
    }

    debug_assert!(board.is_full(), "refill left a hole");
    if !board.is_full() {
        error!(holes = board.holes().count(), "refill left holes on the board");
    }
}

/// Pack each column's tiles down to the lowest rows, keeping their order.
pub fn compact(board: &mut Board, events: &mut Vec<CascadeEvent>) {
    for col in 0..board.topology().column_count() as i8 {
        let height = board.topology().column_height(col) as i8;
        let mut write = 0i8;
        for row in 0..height {
            let from = Coord::new(col, row);
            if !board.is_occupied(from) {
                continue;
            }
            if row != write {
                let to = Coord::new(col, write);
                board.move_tile(from, to);
                events.push(CascadeEvent::Moved { coord: to, from });
            }
            write += 1;
        }
    }
}

/// Slide tiles sideways until no column can donate to a neighbor.
pub fn relax(board: &mut Board, events: &mut Vec<CascadeEvent>) {
    let order = board.topology().exploration_order();
    loop {
        let mut changed = false;
        for &col in &order {
            while slide_from_column(board, col, events) {
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

/// Move the top tile of `col` into a neighbor column whose fill level is
/// below it. Side columns try left then right; the center column tries the
/// emptier side first. Returns true if a tile moved.
///
/// One call moves one tile by one column. The moved tile is not followed
/// further out: [`relax`] calls again on the same column, which slides the
/// column's new top tile, and the moved tile only travels on when its own
/// column comes up in the exploration order. [`relax`] still stops only when
/// no column can donate.
pub fn slide_from_column(board: &mut Board, col: i8, events: &mut Vec<CascadeEvent>) -> bool {
    let fill = board.column_fill(col);
    if fill == 0 {
        return false;
    }
    let top = fill as i8 - 1;

    let capacity = |c: i8| board.topology().column_height(c);
    let mut targets: ArrayVec<i8, 2> = [col - 1, col + 1]
        .into_iter()
        .filter(|&c| capacity(c) > 0)
        .collect();
    if col == board.topology().center_column() {
        // Stable sort keeps left first on ties.
        targets.sort_by_key(|&c| std::cmp::Reverse(capacity(c) - board.column_fill(c)));
    }

    let target = targets.into_iter().find_map(|dst| {
        let dst_fill = board.column_fill(dst);
        (top > dst_fill as i8 && dst_fill < capacity(dst)).then_some(Coord::new(dst, dst_fill as i8))
    });
    let Some(to) = target else {
        return false;
    };
    let from = Coord::new(col, top);
    board.move_tile(from, to);
    events.push(CascadeEvent::Moved { coord: to, from });
    true
}

/// Drop one new tile above the center column and let it settle. Returns
/// false if there was nowhere to put it.
fn spawn_one(
    board: &mut Board,
    rng: &mut SimpleRng,
    policy: &SpawnPolicy,
    events: &mut Vec<CascadeEvent>,
) -> bool {
    let topology = board.topology();
    let center = topology.center_column();
    let mut at = Coord::new(center, topology.column_height(center) as i8);

    loop {
        let next = [Direction::South, Direction::SouthWest, Direction::SouthEast]
            .into_iter()
            .filter_map(|dir| topology.step(at, dir))
            .find(|&c| !board.is_occupied(c));
        match next {
            Some(c) => at = c,
            None => break,
        }
    }

    if !topology.in_bounds(at) {
        // Center column full while holes remain: relaxation did not converge.
        let Some(hole) = board.holes().min_by_key(|c| (c.row, c.col)) else {
            return false;
        };
        error!(%hole, "spawned tile could not enter the board, placing it directly");
        at = hole;
    }

    let tile = spawn_tile(board, at, rng, policy);
    board.place(at, tile);
    events.push(CascadeEvent::Spawned { coord: at, tile });
    true
}

fn spawn_tile(board: &Board, at: Coord, rng: &mut SimpleRng, policy: &SpawnPolicy) -> Tile {
    if policy.obstacle_spawn_percent > 0
        && board.obstacle_count() < policy.obstacle_limit as usize
        && rng.chance_percent(policy.obstacle_spawn_percent)
    {
        return Tile::obstacle(policy.obstacle_hits);
    }
    let forbidden = forbidden_kinds(board, at);
    Tile::ordinary(rng.draw_kind_avoiding(policy.kind_count, &forbidden))
}

/// Kinds that would complete a straight run of three or a diamond through
/// `at`.
pub fn forbidden_kinds(board: &Board, at: Coord) -> ArrayVec<TileKind, 9> {
    let topology = board.topology();
    let mut forbidden = ArrayVec::new();
    let mut forbid = |kind: TileKind| {
        if !forbidden.contains(&kind) && !forbidden.is_full() {
            forbidden.push(kind);
        }
    };

    for dir in Direction::ALL {
        let Some(near) = topology.step(at, dir) else {
            continue;
        };
        let Some(kind) = board.match_kind(near) else {
            continue;
        };
        // at + two along one side.
        if topology.step(near, dir).and_then(|far| board.match_kind(far)) == Some(kind) {
            forbid(kind);
        }
        // at between two.
        if topology.step(at, dir.opposite()).and_then(|c| board.match_kind(c)) == Some(kind) {
            forbid(kind);
        }
    }
    for kind in TileKind::ALL {
        if completes_diamond(board, at, kind) {
            forbid(kind);
        }
    }
    forbidden
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dead_board, default_topology};

    fn policy(kind_count: u8) -> SpawnPolicy {
        SpawnPolicy {
            kind_count,
            obstacle_spawn_percent: 0,
            obstacle_limit: 0,
            obstacle_hits: 2,
        }
    }

    #[test]
    fn compaction_packs_columns_in_order() {
        let mut board = Board::new(default_topology());
        board.set(Coord::new(3, 1), Some(Tile::ordinary(TileKind::Red)));
        board.set(Coord::new(3, 4), Some(Tile::ordinary(TileKind::Blue)));
        let mut events = Vec::new();
        compact(&mut board, &mut events);
        assert_eq!(board.match_kind(Coord::new(3, 0)), Some(TileKind::Red));
        assert_eq!(board.match_kind(Coord::new(3, 1)), Some(TileKind::Blue));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn empty_board_fills_completely() {
        let mut board = Board::new(default_topology());
        let mut rng = SimpleRng::new(11);
        let mut events = Vec::new();
        fill(&mut board, &mut rng, &policy(6), &mut events);
        assert!(board.is_full());
        let spawned = events
            .iter()
            .filter(|e| matches!(e, CascadeEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 30);
    }

    #[test]
    fn holes_in_outer_column_are_refilled() {
        let mut board = dead_board();
        for row in 0..3 {
            board.take(Coord::new(0, row));
        }
        board.take(Coord::new(6, 1));
        let mut rng = SimpleRng::new(5);
        let mut events = Vec::new();
        fill(&mut board, &mut rng, &policy(6), &mut events);
        assert!(board.is_full());
        let spawned = events
            .iter()
            .filter(|e| matches!(e, CascadeEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 4);
    }

    #[test]
    fn relaxation_pushes_holes_to_the_center_top() {
        let mut board = dead_board();
        for row in 0..3 {
            board.take(Coord::new(0, row));
        }
        let mut events = Vec::new();
        relax(&mut board, &mut events);
        let fills: Vec<u8> = (0..7).map(|col| board.column_fill(col)).collect();
        assert_eq!(fills, vec![3, 3, 4, 5, 5, 4, 3]);
        assert!(board.is_hole(Coord::new(3, 5)));
        assert!(events.iter().all(|e| matches!(e, CascadeEvent::Moved { .. })));
    }

    #[test]
    fn spawn_kind_avoids_runs() {
        let mut board = Board::new(default_topology());
        let at = Coord::new(3, 2);
        // Two reds straight below.
        board.set(Coord::new(3, 0), Some(Tile::ordinary(TileKind::Red)));
        board.set(Coord::new(3, 1), Some(Tile::ordinary(TileKind::Red)));
        // Blue on both sides along the SE/NW axis.
        board.set(Coord::new(4, 1), Some(Tile::ordinary(TileKind::Blue)));
        board.set(Coord::new(2, 2), Some(Tile::ordinary(TileKind::Blue)));
        let forbidden = forbidden_kinds(&board, at);
        assert_eq!(forbidden.len(), 2);
        assert!(forbidden.contains(&TileKind::Red));
        assert!(forbidden.contains(&TileKind::Blue));

        let mut rng = SimpleRng::new(8);
        for _ in 0..50 {
            let tile = spawn_tile(&board, at, &mut rng, &policy(3));
            assert_eq!(tile, Tile::ordinary(TileKind::Green));
        }
    }

    #[test]
    fn spawn_kind_avoids_diamonds() {
        let mut board = Board::new(default_topology());
        let at = Coord::new(3, 2);
        for coord in [Coord::new(3, 3), Coord::new(4, 2), Coord::new(4, 3)] {
            board.set(coord, Some(Tile::ordinary(TileKind::Yellow)));
        }
        assert_eq!(forbidden_kinds(&board, at).as_slice(), &[TileKind::Yellow]);
    }

    #[test]
    fn spawn_respects_obstacle_limit() {
        let mut board = Board::new(default_topology());
        let mut rng = SimpleRng::new(3);
        let all_obstacles = SpawnPolicy {
            kind_count: 6,
            obstacle_spawn_percent: 100,
            obstacle_limit: 4,
            obstacle_hits: 2,
        };
        fill(&mut board, &mut rng, &all_obstacles, &mut Vec::new());
        assert!(board.is_full());
        assert_eq!(board.obstacle_count(), 4);
    }

    mod props {
        use super::*;
        use crate::rng::SimpleRng;
        use crate::topology::HexTopology;
        use proptest::prelude::*;

        /// A hexagon shape plus a removal mask sized for its largest case.
        fn arb_holes() -> impl Strategy<Value = (Vec<u8>, Vec<bool>)> {
            (1u8..=4, 1u8..=4).prop_flat_map(|(base, half)| {
                let heights: Vec<u8> = (0..=2 * half)
                    .map(|i| base + half - i.abs_diff(half))
                    .collect();
                let capacity = heights.iter().map(|&h| h as usize).sum::<usize>();
                (Just(heights), proptest::collection::vec(any::<bool>(), capacity))
            })
        }

        proptest! {
            #[test]
            fn prop_fill_always_completes_the_board((heights, mask) in arb_holes(), seed in any::<u32>()) {
                let topology = HexTopology::new(&heights).unwrap();
                let mut board = Board::from_fn(topology, |_| Some(Tile::ordinary(TileKind::Blue)));
                let coords: Vec<Coord> = board.topology().coords().collect();
                for (&coord, &hole) in coords.iter().zip(&mask) {
                    if hole {
                        board.take(coord);
                    }
                }
                let holes = board.holes().count();

                let mut events = Vec::new();
                fill(&mut board, &mut SimpleRng::new(seed), &policy(4), &mut events);

                prop_assert!(board.is_full());
                let spawned = events
                    .iter()
                    .filter(|e| matches!(e, CascadeEvent::Spawned { .. }))
                    .count();
                prop_assert_eq!(spawned, holes);
            }
        }
    }
}
