//! Obstacle bridge
//!
//! Obstacles sit on the board like tiles but never match. Each resolution pass
//! gives every obstacle touching the removal set exactly one hit; the caller
//! removes the ones that crossed their threshold.

use crate::board::Board;
use crate::matcher::CoordSet;
use crate::types::{Coord, ObstacleState, Tile};

/// Trigger contract of an obstacle.
pub trait Obstacle {
    /// One match or blast happened next to this obstacle.
    fn on_nearby_match(&mut self);
    fn is_removable(&self) -> bool;
}

impl Obstacle for ObstacleState {
    fn on_nearby_match(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    fn is_removable(&self) -> bool {
        ObstacleState::is_removable(self)
    }
}

/// Outcome of one [`notify_nearby`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitReport {
    /// Obstacles that took a hit, with their new hit count.
    pub hits: Vec<(Coord, u8)>,
    /// Obstacles that became removable during this call.
    pub removable: CoordSet,
}

/// Hit every obstacle adjacent to `removal` once, however many removed
/// neighbors it has.
pub fn notify_nearby(board: &mut Board, removal: &CoordSet) -> HitReport {
    let mut report = HitReport::default();
    let mut visited = CoordSet::new();

    for &coord in removal {
        let neighbors = board.topology().neighbors(coord);
        for neighbor in neighbors {
            let Some(Tile::Obstacle(state)) = board.get_mut(neighbor) else {
                continue;
            };
            if !visited.insert(neighbor) {
                continue;
            }
            let was_removable = Obstacle::is_removable(state);
            state.on_nearby_match();
            report.hits.push((neighbor, state.hits));
            if !was_removable && Obstacle::is_removable(state) {
                report.removable.insert(neighbor);
            }
        }
    }
    report
}
