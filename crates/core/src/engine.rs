//! Engine - owns the board and runs complete resolve cycles
//!
//! Every public operation runs synchronously to a fixed point and returns a
//! [`CascadeLog`]: the ordered events a presentation layer replays while the
//! engine's board already holds the final state. While the presentation is
//! busy it calls [`Engine::block_input`], and swaps are rejected rather than
//! queued until it unblocks.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::board::Board;
use crate::cascade::{double_bomb_plan, plan_removal, RemovalPlan};
use crate::config::{ConfigError, EngineConfig};
use crate::gravity::{fill, SpawnPolicy};
use crate::matcher::{find_matches, has_match, CoordSet};
use crate::obstacle::notify_nearby;
use crate::oracle::{reshuffle, swap_preview, try_find_swap};
use crate::rng::SimpleRng;
use crate::scoring::Score;
use crate::snapshot::BoardSnapshot;
use crate::topology::HexTopology;
use crate::types::{CascadeEvent, Coord, RemovalReason, Tile, MAX_CASCADE_PASSES};

/// Why a swap request was turned down. The board is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    #[error("coordinate is outside the board")]
    OutOfBounds,
    #[error("tiles are not adjacent")]
    NotAdjacent,
    #[error("input is blocked or a tile cannot be moved")]
    Blocked,
    #[error("swap does not create a match")]
    NoMatch,
}

/// Ordered outcome of one engine operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeLog {
    pub events: Vec<CascadeEvent>,
    /// Detect/remove/refill passes run.
    pub passes: u32,
    /// Ordinary tiles cleared by matches and blasts.
    pub tiles_removed: u32,
    pub obstacles_broken: u32,
    pub bombs_promoted: u32,
    pub reshuffles: u32,
}

impl CascadeLog {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn removed(&self) -> impl Iterator<Item = (Coord, RemovalReason)> + '_ {
        self.events.iter().filter_map(|event| match *event {
            CascadeEvent::Removed { coord, reason } => Some((coord, reason)),
            _ => None,
        })
    }
}

/// A playable swap plus every cell it would match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub a: Coord,
    pub b: Coord,
    pub tiles: CoordSet,
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    board: Board,
    rng: SimpleRng,
    spawn: SpawnPolicy,
    score: Score,
    input_blocks: u32,
}

impl Engine {
    /// Validate `config` and create an engine with an empty board. Call
    /// [`Engine::start`] to deal the first board.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let topology = config.validate()?;
        Ok(Self {
            board: Board::new(topology),
            rng: SimpleRng::new(config.seed),
            spawn: SpawnPolicy::from(&config),
            score: Score::default(),
            input_blocks: 0,
            config,
        })
    }

    /// Create an engine around a prepared board. The board's shape must match
    /// `config.column_heights`.
    pub fn with_board(config: EngineConfig, board: Board) -> Result<Self, ConfigError> {
        let mut engine = Self::new(config)?;
        if board.topology() != engine.board.topology() {
            return Err(ConfigError::BoardShape);
        }
        engine.board = board;
        Ok(engine)
    }

    /// Deal a fresh board: fill, resolve accidental matches, and make sure a
    /// swap exists. Resets the score.
    pub fn start(&mut self) -> CascadeLog {
        self.board.clear();
        self.score.reset();
        let mut log = CascadeLog::default();
        fill(&mut self.board, &mut self.rng, &self.spawn, &mut log.events);
        self.run_cascade(&mut log);
        self.ensure_playable(&mut log);
        debug!(events = log.events.len(), reshuffles = log.reshuffles, "board dealt");
        log
    }

    /// Try to swap two adjacent tiles.
    ///
    /// Two bombs never trade places; they go off together instead. Any other
    /// pair must produce a match or the swap is reverted with
    /// [`RejectReason::NoMatch`].
    pub fn apply_swap(&mut self, a: Coord, b: Coord) -> Result<CascadeLog, RejectReason> {
        if self.is_input_blocked() {
            return Err(RejectReason::Blocked);
        }
        let topology = self.board.topology();
        if !topology.in_bounds(a) || !topology.in_bounds(b) {
            return Err(RejectReason::OutOfBounds);
        }
        if !topology.are_adjacent(a, b) {
            return Err(RejectReason::NotAdjacent);
        }
        let (ta, tb) = match (self.board.get(a), self.board.get(b)) {
            (Some(ta), Some(tb)) if !ta.is_obstacle() && !tb.is_obstacle() => (ta, tb),
            _ => return Err(RejectReason::Blocked),
        };

        let mut log = CascadeLog::default();
        if ta.is_bomb() && tb.is_bomb() {
            debug!(%a, %b, "double bomb");
            let plan = double_bomb_plan(&self.board, a, b);
            self.apply_plan(plan, &mut log);
        } else {
            self.board.swap(a, b);
            if !has_match(&self.board) {
                self.board.swap(a, b);
                return Err(RejectReason::NoMatch);
            }
            log.events.push(CascadeEvent::Swapped { a, b });
        }

        self.run_cascade(&mut log);
        self.ensure_playable(&mut log);
        self.score.record_move();
        self.score.record(&log);
        Ok(log)
    }

    /// Run the match/cascade/refill fixed point from the current board, then
    /// reshuffle if no swap is left.
    pub fn resolve(&mut self) -> CascadeLog {
        let mut log = CascadeLog::default();
        self.run_cascade(&mut log);
        self.ensure_playable(&mut log);
        self.score.record(&log);
        log
    }

    pub fn find_hint(&self) -> Option<(Coord, Coord)> {
        try_find_swap(&self.board)
    }

    /// Like [`Engine::find_hint`], plus the cells the swap would match.
    pub fn hint(&self) -> Option<Hint> {
        let (a, b) = self.find_hint()?;
        let both_bombs = self.board.get(a).is_some_and(|t| t.is_bomb())
            && self.board.get(b).is_some_and(|t| t.is_bomb());
        let tiles = if both_bombs {
            [a, b].into_iter().collect()
        } else {
            swap_preview(&self.board, a, b)
        };
        Some(Hint { a, b, tiles })
    }

    /// Re-deal the current board on request.
    pub fn force_reshuffle(&mut self) -> Result<CascadeLog, RejectReason> {
        if self.is_input_blocked() {
            return Err(RejectReason::Blocked);
        }
        let mut log = CascadeLog::default();
        self.reshuffle_once(&mut log);
        self.run_cascade(&mut log);
        self.ensure_playable(&mut log);
        self.score.record(&log);
        Ok(log)
    }

    /// Nested input blocking: every `true` needs a matching `false`.
    pub fn block_input(&mut self, blocked: bool) {
        if blocked {
            self.input_blocks = self.input_blocks.saturating_add(1);
        } else {
            self.input_blocks = self.input_blocks.saturating_sub(1);
        }
    }

    pub fn is_input_blocked(&self) -> bool {
        self.input_blocks > 0
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn topology(&self) -> &HexTopology {
        self.board.topology()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Fill an existing snapshot (reuses its buffers).
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.column_heights.clear();
        out.column_heights
            .extend_from_slice(self.board.topology().heights());
        out.tiles.clear();
        out.tiles.extend(
            self.board
                .topology()
                .coords()
                .map(|coord| self.board.get(coord)),
        );
        out.score = self.score;
        out.input_blocked = self.is_input_blocked();
        out.seed = self.config.seed;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Run passes until no match is left, or give up after
    /// [`MAX_CASCADE_PASSES`] with the remaining matches still on the board.
    fn run_cascade(&mut self, log: &mut CascadeLog) {
        for _ in 0..MAX_CASCADE_PASSES {
            let matches = find_matches(&self.board);
            if matches.is_empty() {
                return;
            }
            let plan = plan_removal(&self.board, &matches, self.config.bomb_cluster_min as usize);
            self.apply_plan(plan, log);
        }
        if has_match(&self.board) {
            error!(
                passes = MAX_CASCADE_PASSES,
                kinds = self.config.kind_count,
                capacity = self.board.topology().capacity(),
                "resolve cycle did not settle, stopping"
            );
        }
    }

    /// Promote, hit obstacles, remove and refill for one pass.
    fn apply_plan(&mut self, plan: RemovalPlan, log: &mut CascadeLog) {
        log.passes += 1;
        log.events.push(CascadeEvent::PassStarted { pass: log.passes });
        debug!(
            pass = log.passes,
            matched = plan.matched.len(),
            promoted = plan.promoted.len(),
            exploded = plan.exploded.len(),
            detonated = plan.detonated.len(),
            "cascade pass"
        );

        for &coord in &plan.promoted {
            if let Some(Tile::Ordinary { bomb, .. }) = self.board.get_mut(coord) {
                *bomb = true;
                log.bombs_promoted += 1;
                log.events.push(CascadeEvent::Promoted { coord });
            }
        }

        let removal = plan.removal_set();
        let report = notify_nearby(&mut self.board, &removal);
        log.events.extend(
            report
                .hits
                .iter()
                .map(|&(coord, hits)| CascadeEvent::ObstacleHit { coord, hits }),
        );

        for coord in removal {
            if self.board.take(coord).is_some() {
                log.tiles_removed += 1;
                log.events.push(CascadeEvent::Removed {
                    coord,
                    reason: plan.reason(coord),
                });
            }
        }
        for coord in report.removable {
            if self.board.take(coord).is_some() {
                log.obstacles_broken += 1;
                log.events.push(CascadeEvent::Removed {
                    coord,
                    reason: RemovalReason::Broken,
                });
            }
        }

        fill(&mut self.board, &mut self.rng, &self.spawn, &mut log.events);
    }

    /// Reshuffle until a swap exists, at most `max_reshuffle_attempts` times.
    /// A board that stays dead is left as is.
    fn ensure_playable(&mut self, log: &mut CascadeLog) {
        let mut attempts = 0;
        while try_find_swap(&self.board).is_none() {
            if attempts >= self.config.max_reshuffle_attempts {
                warn!(attempts, "no playable swap after reshuffling, giving up");
                return;
            }
            attempts += 1;
            self.reshuffle_once(log);
            self.run_cascade(log);
        }
    }

    fn reshuffle_once(&mut self, log: &mut CascadeLog) {
        info!(reshuffle = log.reshuffles + 1, "[Reshuffle] no playable swap, re-dealing");
        reshuffle(
            &mut self.board,
            &mut self.rng,
            self.config.kind_count,
            &mut log.events,
        );
        log.reshuffles += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dead_board, with_kinds};
    use crate::types::TileKind;

    fn quiet_config() -> EngineConfig {
        EngineConfig::default().without_obstacles()
    }

    fn engine_with(board: Board) -> Engine {
        Engine::with_board(quiet_config(), board).unwrap()
    }

    #[test]
    fn start_deals_a_full_playable_board() {
        let mut engine = Engine::new(EngineConfig::default().with_seed(42)).unwrap();
        engine.start();
        assert!(engine.board().is_full());
        assert!(find_matches(engine.board()).is_empty());
        assert_eq!(engine.score(), Score::default());
    }

    #[test]
    fn same_seed_same_board() {
        let mut a = Engine::new(EngineConfig::default().with_seed(9)).unwrap();
        let mut b = Engine::new(EngineConfig::default().with_seed(9)).unwrap();
        assert_eq!(a.start(), b.start());
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn rejects_invalid_requests_without_changes() {
        let mut engine = engine_with(dead_board());
        let before = engine.board().clone();

        assert_eq!(
            engine.apply_swap(Coord::new(0, 0), Coord::new(0, 5)),
            Err(RejectReason::OutOfBounds)
        );
        assert_eq!(
            engine.apply_swap(Coord::new(0, 0), Coord::new(0, 2)),
            Err(RejectReason::NotAdjacent)
        );
        assert_eq!(
            engine.apply_swap(Coord::new(0, 0), Coord::new(0, 1)),
            Err(RejectReason::NoMatch)
        );
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.score().moves, 0);
    }

    #[test]
    fn obstacles_and_blocked_input_are_refused() {
        let mut board = dead_board();
        board.set(Coord::new(0, 1), Some(Tile::obstacle(2)));
        let mut engine = engine_with(board);
        assert_eq!(
            engine.apply_swap(Coord::new(0, 0), Coord::new(0, 1)),
            Err(RejectReason::Blocked)
        );

        engine.block_input(true);
        engine.block_input(true);
        engine.block_input(false);
        assert!(engine.is_input_blocked());
        assert_eq!(
            engine.apply_swap(Coord::new(1, 0), Coord::new(1, 1)),
            Err(RejectReason::Blocked)
        );
        assert_eq!(engine.force_reshuffle(), Err(RejectReason::Blocked));
        engine.block_input(false);
        engine.block_input(false);
        assert!(!engine.is_input_blocked());
    }

    #[test]
    fn productive_swap_resolves_and_counts() {
        let board = with_kinds(
            dead_board(),
            &[Coord::new(3, 0), Coord::new(3, 1), Coord::new(4, 2)],
            TileKind::Red,
        );
        let mut engine = engine_with(board);
        let log = engine
            .apply_swap(Coord::new(3, 2), Coord::new(4, 2))
            .unwrap();

        assert_eq!(
            log.events[0],
            CascadeEvent::Swapped {
                a: Coord::new(3, 2),
                b: Coord::new(4, 2)
            }
        );
        assert!(log.passes >= 1);
        assert!(log.tiles_removed >= 3);
        assert!(engine.board().is_full());
        assert!(find_matches(engine.board()).is_empty());
        assert_eq!(engine.score().moves, 1);
        assert_eq!(engine.score().tiles, log.tiles_removed);
    }

    #[test]
    fn hint_lists_matching_tiles() {
        let board = with_kinds(
            dead_board(),
            &[Coord::new(3, 0), Coord::new(3, 1), Coord::new(4, 2)],
            TileKind::Red,
        );
        let engine = engine_with(board);
        let hint = engine.hint().unwrap();
        assert_eq!((hint.a, hint.b), (Coord::new(3, 2), Coord::new(4, 2)));
        let expected: CoordSet = [Coord::new(3, 0), Coord::new(3, 1), Coord::new(3, 2)]
            .into_iter()
            .collect();
        assert_eq!(hint.tiles, expected);
    }

    #[test]
    fn dead_board_reshuffles_on_resolve() {
        let mut engine = engine_with(dead_board());
        assert_eq!(engine.find_hint(), None);
        let log = engine.resolve();
        assert!(log.reshuffles >= 1);
        assert!(log
            .events
            .iter()
            .any(|e| matches!(e, CascadeEvent::Retyped { .. })));
        assert!(engine.board().is_full());
    }

    #[test]
    fn with_board_rejects_other_shapes() {
        let small = Board::new(HexTopology::new(&[2, 3, 2]).unwrap());
        assert!(matches!(
            Engine::with_board(quiet_config(), small),
            Err(ConfigError::BoardShape)
        ));
    }
}
