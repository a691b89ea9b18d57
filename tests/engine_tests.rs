//! End-to-end engine scenarios on hand-built boards.

mod common;

use common::{c, dead_board, quiet_engine, with_tile};
use hexmatch::core::{find_matches, ConfigError, Engine, EngineConfig, RejectReason};
use hexmatch::types::{CascadeEvent, RemovalReason, Tile, TileKind, MAX_COLUMNS, MAX_COLUMN_HEIGHT};

/// Events from `PassStarted { pass: 1 }` up to the start of pass 2.
fn first_pass(events: &[CascadeEvent]) -> &[CascadeEvent] {
    let is_start = |pass: u32| move |e: &CascadeEvent| *e == CascadeEvent::PassStarted { pass };
    let start = events.iter().position(is_start(1)).unwrap_or(0);
    let end = events.iter().position(is_start(2)).unwrap_or(events.len());
    &events[start..end]
}

#[test]
fn test_matching_swap_clears_refills_and_scores() {
    let red = Tile::ordinary(TileKind::Red);
    let board = with_tile(dead_board(), &[c(3, 0), c(3, 1), c(4, 2)], red);
    let mut engine = quiet_engine(board);

    let log = engine.apply_swap(c(3, 2), c(4, 2)).unwrap();

    assert_eq!(
        log.events[0],
        CascadeEvent::Swapped {
            a: c(3, 2),
            b: c(4, 2)
        }
    );
    assert!(log.passes >= 1);
    let removed: Vec<_> = log.removed().collect();
    for coord in [c(3, 0), c(3, 1), c(3, 2)] {
        assert!(removed.contains(&(coord, RemovalReason::Matched)), "{coord}");
    }
    assert!(engine.board().is_full());
    assert!(find_matches(engine.board()).is_empty());
    assert_eq!(engine.score().moves, 1);
    assert_eq!(engine.score().tiles, log.tiles_removed);
}

#[test]
fn test_run_of_four_promotes_its_middle_cell() {
    let red = Tile::ordinary(TileKind::Red);
    let board = with_tile(dead_board(), &[c(3, 0), c(3, 1), c(3, 3), c(4, 2)], red);
    let mut engine = quiet_engine(board);

    let log = engine.apply_swap(c(4, 2), c(3, 2)).unwrap();
    let pass = first_pass(&log.events);

    assert!(pass.contains(&CascadeEvent::Promoted { coord: c(3, 2) }));
    assert!(!pass.contains(&CascadeEvent::Removed {
        coord: c(3, 2),
        reason: RemovalReason::Matched
    }));
    let matched = pass
        .iter()
        .filter(|e| matches!(e, CascadeEvent::Removed { reason: RemovalReason::Matched, .. }))
        .count();
    assert_eq!(matched, 3);
    assert!(log.bombs_promoted >= 1);
}

#[test]
fn test_obstacle_next_to_a_match_takes_a_hit_and_breaks() {
    let red = Tile::ordinary(TileKind::Red);
    let board = with_tile(dead_board(), &[c(3, 0), c(3, 1), c(4, 2)], red);
    let board = with_tile(board, &[c(2, 0)], Tile::obstacle(1));
    let mut engine = quiet_engine(board);

    let log = engine.apply_swap(c(3, 2), c(4, 2)).unwrap();
    let pass = first_pass(&log.events);

    assert!(pass.contains(&CascadeEvent::ObstacleHit {
        coord: c(2, 0),
        hits: 1
    }));
    assert!(pass.contains(&CascadeEvent::Removed {
        coord: c(2, 0),
        reason: RemovalReason::Broken
    }));
    assert!(engine.score().hearts >= 1);
    assert_eq!(engine.board().obstacle_count(), 0);
}

#[test]
fn test_two_bombs_go_off_without_trading_places() {
    let mut board = dead_board();
    for coord in [c(3, 2), c(3, 3)] {
        if let Some(Tile::Ordinary { bomb, .. }) = board.get_mut(coord) {
            *bomb = true;
        }
    }
    let mut engine = quiet_engine(board);

    let log = engine.apply_swap(c(3, 2), c(3, 3)).unwrap();

    assert_eq!(log.events[0], CascadeEvent::PassStarted { pass: 1 });
    assert!(!log
        .events
        .iter()
        .any(|e| matches!(e, CascadeEvent::Swapped { .. })));
    let exploded = first_pass(&log.events)
        .iter()
        .filter(|e| matches!(e, CascadeEvent::Removed { reason: RemovalReason::Exploded, .. }))
        .count();
    assert!(exploded >= 19, "only {exploded} cells exploded");
    assert!(engine.board().is_full());
}

#[test]
fn test_rejected_swaps_leave_everything_alone() {
    let mut engine = quiet_engine(dead_board());
    let before = engine.snapshot();

    assert_eq!(
        engine.apply_swap(c(0, 0), c(0, 1)),
        Err(RejectReason::NoMatch)
    );
    assert_eq!(
        engine.apply_swap(c(0, 0), c(6, 0)),
        Err(RejectReason::NotAdjacent)
    );
    assert_eq!(
        engine.apply_swap(c(-1, 0), c(0, 0)),
        Err(RejectReason::OutOfBounds)
    );
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_reshuffle_never_retypes_bombs_or_obstacles() {
    let board = with_tile(dead_board(), &[c(0, 0)], Tile::bomb(TileKind::Blue));
    let board = with_tile(board, &[c(6, 0)], Tile::obstacle(2));
    let mut engine = quiet_engine(board);

    let log = engine.force_reshuffle().unwrap();

    assert!(log.reshuffles >= 1);
    for event in &log.events {
        if let CascadeEvent::Retyped { coord, .. } = event {
            assert_ne!(*coord, c(0, 0));
            assert_ne!(*coord, c(6, 0));
        }
    }
    assert!(engine.board().is_full());
}

#[test]
fn test_dead_board_is_repaired_by_resolve() {
    let mut engine = quiet_engine(dead_board());
    assert_eq!(engine.find_hint(), None);

    let log = engine.resolve();

    assert!(log.reshuffles >= 1);
    assert!(engine.find_hint().is_some());
    assert!(find_matches(engine.board()).is_empty());
}

#[test]
fn test_resolve_clears_a_run_already_on_the_board() {
    let run = [c(3, 0), c(3, 1), c(3, 2)];
    let board = with_tile(dead_board(), &run, Tile::ordinary(TileKind::Red));
    let mut engine = quiet_engine(board);

    let log = engine.resolve();

    let matched: Vec<_> = first_pass(&log.events)
        .iter()
        .filter_map(|e| match *e {
            CascadeEvent::Removed {
                coord,
                reason: RemovalReason::Matched,
            } => Some(coord),
            _ => None,
        })
        .collect();
    assert_eq!(matched, run);
    assert_eq!(engine.board().occupied_count(), 30);
    assert!(find_matches(engine.board()).is_empty());
}

/// 15 columns, 9 tiles at the edges and 16 in the middle.
fn largest_heights() -> Vec<u8> {
    let half = (MAX_COLUMNS / 2) as u8;
    let base = MAX_COLUMN_HEIGHT - half;
    (0..MAX_COLUMNS as u8)
        .map(|i| base + half - i.abs_diff(half))
        .collect()
}

#[test]
fn test_largest_board_settles() {
    for seed in [5, 17] {
        let config = EngineConfig {
            column_heights: largest_heights(),
            kind_count: 4,
            seed,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config).unwrap();
        let log = engine.start();
        assert!(log.passes < 64, "seed {seed}: {} passes", log.passes);
        assert!(engine.board().is_full(), "seed {seed}");
        assert!(find_matches(engine.board()).is_empty(), "seed {seed}");

        for _ in 0..3 {
            let Some((a, b)) = engine.find_hint() else {
                break;
            };
            engine.apply_swap(a, b).unwrap();
            assert!(find_matches(engine.board()).is_empty(), "seed {seed}");
        }
    }
}

#[test]
fn test_three_kinds_are_refused_on_the_largest_board() {
    let config = EngineConfig {
        column_heights: largest_heights(),
        kind_count: 3,
        ..EngineConfig::default()
    };
    assert!(matches!(
        Engine::new(config),
        Err(ConfigError::TooFewKinds { capacity: 184, .. })
    ));
}

#[test]
fn test_hinted_play_keeps_the_board_full_and_settled() {
    for seed in 1..=12 {
        let mut engine = Engine::new(EngineConfig::default().with_seed(seed)).unwrap();
        engine.start();
        let mut last = engine.score();
        for _ in 0..25 {
            let Some((a, b)) = engine.find_hint() else {
                break;
            };
            engine.apply_swap(a, b).unwrap();
            assert!(engine.board().is_full(), "seed {seed}");
            assert!(find_matches(engine.board()).is_empty(), "seed {seed}");
            let score = engine.score();
            assert_eq!(score.moves, last.moves + 1);
            assert!(score.tiles >= last.tiles && score.hearts >= last.hearts);
            last = score;
        }
        assert!(
            engine.board().obstacle_count() <= engine.config().obstacle_limit as usize,
            "seed {seed}"
        );
    }
}

#[test]
fn test_input_blocking_nests() {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    engine.start();
    engine.block_input(true);
    engine.block_input(true);
    engine.block_input(false);
    let (a, b) = engine.find_hint().unwrap();
    assert_eq!(engine.apply_swap(a, b), Err(RejectReason::Blocked));
    engine.block_input(false);
    engine.block_input(false);
    assert!(!engine.is_input_blocked());
    assert!(engine.apply_swap(a, b).is_ok());
}
