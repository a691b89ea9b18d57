//! BoardView: maps a [`BoardSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Columns are laid out left to right, and each tile is drawn two text rows
//! tall. A column's tiles are shifted by its half-row offset, so tiles in
//! neighboring columns sit one text row apart and the board reads as a hexagon.

use crate::core::{BoardSnapshot, HexTopology};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Coord, Tile, TileKind};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Front-end state drawn on top of the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewMarks<'a> {
    pub cursor: Option<Coord>,
    pub selected: Option<Coord>,
    /// Tiles to highlight for a hint (the swap pair plus what it would match).
    pub hint: &'a [Coord],
    /// One line shown under the score.
    pub status: &'a str,
}

const PANEL_W: u16 = 22;
const PANEL_GAP: u16 = 2;

const BOARD_BG: Rgb = Rgb::new(24, 24, 32);
const BORDER: Rgb = Rgb::new(190, 190, 200);
const OBSTACLE_BG: Rgb = Rgb::new(110, 100, 95);

pub struct BoardView {
    /// Terminal columns per board column (tile width plus a gap).
    cell_w: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        Self { cell_w: 4 }
    }
}

/// Screen placement of one rendered board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Top-left corner of the frame.
    pub frame_x: u16,
    pub frame_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
    /// Highest half-row on the board.
    top_half: i16,
    cell_w: u16,
}

impl BoardLayout {
    /// Screen position of the top-left text cell of `coord`'s tile.
    pub fn tile_origin(&self, topology: &HexTopology, coord: Coord) -> (u16, u16) {
        let x = self.frame_x + 2 + coord.col as u16 * self.cell_w;
        let y = self.frame_y + 1 + (self.top_half - topology.half_row(coord)) as u16;
        (x, y)
    }
}

impl BoardView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(3),
        }
    }

    /// Frame placement for `topology` in `viewport`, centered together with the
    /// side panel when the panel fits.
    pub fn layout(&self, topology: &HexTopology, viewport: Viewport) -> BoardLayout {
        let max_h = topology.heights().iter().copied().max().unwrap_or(1) as u16;
        let cols = topology.column_count() as u16;
        let frame_w = cols * self.cell_w - (self.cell_w - 3) + 4;
        let frame_h = 2 * max_h + 2;
        let with_panel = frame_w + PANEL_GAP + PANEL_W;
        let total_w = if with_panel <= viewport.width {
            with_panel
        } else {
            frame_w
        };
        BoardLayout {
            frame_x: viewport.width.saturating_sub(total_w) / 2,
            frame_y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
            top_half: max_h as i16 - 1,
            cell_w: self.cell_w,
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &BoardSnapshot,
        marks: &ViewMarks<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let Ok(topology) = HexTopology::new(&snap.column_heights) else {
            fb.put_str(0, 0, "no board", CellStyle::default());
            return;
        };
        let layout = self.layout(&topology, viewport);

        let bg = CellStyle::new(Rgb::new(70, 70, 80), BOARD_BG);
        fb.fill_rect(
            layout.frame_x + 1,
            layout.frame_y + 1,
            layout.frame_w - 2,
            layout.frame_h - 2,
            ' ',
            bg,
        );
        fb.draw_box(
            layout.frame_x,
            layout.frame_y,
            layout.frame_w,
            layout.frame_h,
            CellStyle::new(BORDER, Rgb::BLACK),
        );

        for coord in topology.coords() {
            let (x, y) = layout.tile_origin(&topology, coord);
            self.draw_tile(fb, x, y, snap.tile(coord), coord, marks);
        }

        let panel_x = layout.frame_x + layout.frame_w + PANEL_GAP;
        if panel_x + PANEL_W <= viewport.width {
            self.draw_panel(fb, panel_x, layout.frame_y, snap, marks);
        }
    }

    /// Convenience wrapper that allocates a fresh framebuffer.
    pub fn render(&self, snap: &BoardSnapshot, marks: &ViewMarks<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, marks, viewport, &mut fb);
        fb
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        tile: Option<Tile>,
        coord: Coord,
        marks: &ViewMarks<'_>,
    ) {
        let (mut style, top) = match tile {
            Some(Tile::Ordinary { kind, bomb }) => {
                let letter = kind_letter(kind);
                let style = CellStyle::new(Rgb::BLACK, kind_color(kind));
                if bomb {
                    (style.bold(), ['*', letter, '*'])
                } else {
                    (style, [' ', letter, ' '])
                }
            }
            Some(Tile::Obstacle(state)) => {
                let left = state.threshold.saturating_sub(state.hits).min(9);
                let digit = char::from_digit(left as u32, 10).unwrap_or('#');
                (
                    CellStyle::new(Rgb::new(240, 230, 220), OBSTACLE_BG).bold(),
                    ['#', digit, '#'],
                )
            }
            None => (CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG), [' ', '·', ' ']),
        };

        let bottom = if marks.selected == Some(coord) {
            style = style.bold();
            ['=', '=', '=']
        } else if marks.hint.contains(&coord) {
            ['~', '~', '~']
        } else {
            [' ', ' ', ' ']
        };
        if marks.cursor == Some(coord) {
            style = style.reversed();
        }

        for (dx, (&a, &b)) in top.iter().zip(bottom.iter()).enumerate() {
            fb.put_char(x + dx as u16, y, a, style);
            fb.put_char(x + dx as u16, y + 1, b, style);
        }
    }

    fn draw_panel(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        snap: &BoardSnapshot,
        marks: &ViewMarks<'_>,
    ) {
        let label = CellStyle::new(Rgb::new(160, 160, 170), Rgb::BLACK);
        let value = CellStyle::new(Rgb::new(240, 240, 240), Rgb::BLACK).bold();
        let title = CellStyle::new(Rgb::new(230, 200, 90), Rgb::BLACK).bold();

        fb.put_str(x, y, "HEXMATCH", title);
        let rows = [
            ("TILES", snap.score.tiles),
            ("HEARTS", snap.score.hearts),
            ("MOVES", snap.score.moves),
            ("SEED", snap.seed),
        ];
        for (i, (name, n)) in rows.iter().enumerate() {
            let row = y + 2 + i as u16;
            fb.put_str(x, row, name, label);
            fb.put_u32(x + 8, row, *n, value);
        }

        let mut row = y + 7;
        if snap.input_blocked {
            fb.put_str(x, row, "BUSY", title);
            row += 1;
        }
        for (i, ch) in marks.status.chars().take(PANEL_W as usize).enumerate() {
            fb.put_char(x + i as u16, row, ch, value);
        }

        let help = [
            "arrows/wasd  move",
            "enter  select",
            "esc  cancel",
            "h hint  space shuffle",
            "n new  q quit",
        ];
        for (i, line) in help.iter().enumerate() {
            fb.put_str(x, y + 10 + i as u16, line, label);
        }
    }
}

pub fn kind_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::Blue => Rgb::new(70, 120, 225),
        TileKind::Green => Rgb::new(70, 185, 95),
        TileKind::Orange => Rgb::new(235, 145, 45),
        TileKind::Purple => Rgb::new(155, 85, 205),
        TileKind::Red => Rgb::new(215, 65, 65),
        TileKind::Yellow => Rgb::new(230, 205, 65),
    }
}

fn kind_letter(kind: TileKind) -> char {
    match kind {
        TileKind::Blue => 'B',
        TileKind::Green => 'G',
        TileKind::Orange => 'O',
        TileKind::Purple => 'P',
        TileKind::Red => 'R',
        TileKind::Yellow => 'Y',
    }
}
