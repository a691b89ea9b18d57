//! Score tally
//!
//! There are no points, only counters: ordinary tiles cleared, obstacles
//! broken ("hearts") and successful swaps.

use serde::{Deserialize, Serialize};

use crate::engine::CascadeLog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub tiles: u32,
    pub hearts: u32,
    pub moves: u32,
}

impl Score {
    /// Add the removals of one cascade.
    pub fn record(&mut self, log: &CascadeLog) {
        self.tiles = self.tiles.saturating_add(log.tiles_removed);
        self.hearts = self.hearts.saturating_add(log.obstacles_broken);
    }

    pub fn record_move(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_adds_log_counters() {
        let mut score = Score::default();
        let log = CascadeLog {
            tiles_removed: 7,
            obstacles_broken: 1,
            ..CascadeLog::default()
        };
        score.record(&log);
        score.record(&log);
        score.record_move();
        assert_eq!(
            score,
            Score {
                tiles: 14,
                hearts: 2,
                moves: 1
            }
        );
        score.reset();
        assert_eq!(score, Score::default());
    }
}
