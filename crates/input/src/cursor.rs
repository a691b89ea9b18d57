//! Hex cursor and two-step selection.
//!
//! The cursor walks the board the way it is drawn: up/down within a column,
//! left/right to the cell of the next column closest to where the cursor
//! started. Selecting one tile and then an adjacent one yields a swap request.

use hexmatch_core::HexTopology;

use crate::types::{Coord, GameAction};

/// Result of feeding one action to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorOutcome {
    Moved,
    Selected(Coord),
    Deselected,
    /// Two adjacent cells were selected in turn.
    Swap(Coord, Coord),
    /// Not a cursor action, or the move hit the board edge.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexCursor {
    coord: Coord,
    /// Height remembered across horizontal moves, in half-cell units.
    target_half_row: i16,
    selected: Option<Coord>,
}

impl HexCursor {
    /// Cursor in the middle of the center column.
    pub fn new(topology: &HexTopology) -> Self {
        let col = topology.center_column();
        let row = topology.row_near(col, 0).unwrap_or(0);
        let coord = Coord::new(col, row);
        Self {
            coord,
            target_half_row: topology.half_row(coord),
            selected: None,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    pub fn move_to(&mut self, topology: &HexTopology, coord: Coord) {
        if topology.in_bounds(coord) {
            self.coord = coord;
            self.target_half_row = topology.half_row(coord);
        }
    }

    pub fn cancel(&mut self) {
        self.selected = None;
    }

    pub fn apply(&mut self, topology: &HexTopology, action: GameAction) -> CursorOutcome {
        match action {
            GameAction::CursorLeft => self.shift_column(topology, -1),
            GameAction::CursorRight => self.shift_column(topology, 1),
            GameAction::CursorUp => self.shift_row(topology, 1),
            GameAction::CursorDown => self.shift_row(topology, -1),
            GameAction::Select => self.select(topology),
            GameAction::Cancel => {
                if self.selected.take().is_some() {
                    CursorOutcome::Deselected
                } else {
                    CursorOutcome::Ignored
                }
            }
            _ => CursorOutcome::Ignored,
        }
    }

    fn shift_column(&mut self, topology: &HexTopology, delta: i8) -> CursorOutcome {
        let col = self.coord.col + delta;
        match topology.row_near(col, self.target_half_row) {
            Some(row) => {
                self.coord = Coord::new(col, row);
                CursorOutcome::Moved
            }
            None => CursorOutcome::Ignored,
        }
    }

    fn shift_row(&mut self, topology: &HexTopology, delta: i8) -> CursorOutcome {
        let next = self.coord.offset(0, delta);
        if !topology.in_bounds(next) {
            return CursorOutcome::Ignored;
        }
        self.coord = next;
        self.target_half_row = topology.half_row(next);
        CursorOutcome::Moved
    }

    fn select(&mut self, topology: &HexTopology) -> CursorOutcome {
        match self.selected {
            None => {
                self.selected = Some(self.coord);
                CursorOutcome::Selected(self.coord)
            }
            Some(first) if first == self.coord => {
                self.selected = None;
                CursorOutcome::Deselected
            }
            Some(first) if topology.are_adjacent(first, self.coord) => {
                self.selected = None;
                CursorOutcome::Swap(first, self.coord)
            }
            Some(_) => {
                self.selected = Some(self.coord);
                CursorOutcome::Selected(self.coord)
            }
        }
    }
}
