use serde::Serialize;

use crate::scoring::Score;
use crate::types::{Coord, Tile};

/// Read-only copy of everything a presentation layer draws.
///
/// `tiles` is column-major with row 0 first in each column, matching
/// [`crate::HexTopology::coords`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub column_heights: Vec<u8>,
    pub tiles: Vec<Option<Tile>>,
    pub score: Score,
    pub input_blocked: bool,
    pub seed: u32,
}

impl BoardSnapshot {
    /// Tile at `coord`; `None` when empty or off the board.
    pub fn tile(&self, coord: Coord) -> Option<Tile> {
        if coord.col < 0 || coord.row < 0 {
            return None;
        }
        let col = coord.col as usize;
        let height = *self.column_heights.get(col)?;
        if coord.row as u8 >= height {
            return None;
        }
        let start: usize = self.column_heights[..col].iter().map(|&h| h as usize).sum();
        self.tiles.get(start + coord.row as usize).copied().flatten()
    }
}
