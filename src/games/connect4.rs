//! # Connect-Four Implementation
//!
//! The visible board is 7 columns by 6 rows, but the bitboard is laid out
//! as 8x8: column x=7 and rows y=6..7 are permanently empty guard cells.
//! The guards are what make the classic O(1) win check sound: for a
//! direction step `d`, `y = b & (b >> d)` marks pairs and
//! `y & (y >> 2*d)` marks runs of four, and any shift that would wrap
//! around a board edge passes through a guard cell and dies there.
//!
//! Direction steps in this layout: 1 steps along a row, 8 along a column
//! (the gravity axis), 7 and 9 along the two diagonals.

use std::fmt;
use std::time::Duration;

use crate::board::{BitBoard, Cell};
use crate::strategy::AiPreset;
use crate::{Color, Field, FieldMove};

/// Visible playing area inside the 8x8 plane.
const VISIBLE_WIDTH: usize = 7;
const VISIBLE_HEIGHT: usize = 6;

/// Mask of all visible cells (x < 7, y < 6).
const VISIBLE_MASK: u64 = 0x00007f7f7f7f7f7f;

/// Mask of the top visible row; a column is playable iff its top cell is
/// empty, and the board is full iff this whole row is occupied.
const TOP_ROW_MASK: u64 = 0x7f;

/// The four direction steps of the win check.
const DIRECTIONS: [u32; 4] = [1, 8, 7, 9];

/// Column generation order, center-out, to bias the search toward the
/// stronger central lines early.
const COLUMN_ORDER: [usize; 7] = [3, 2, 4, 5, 1, 0, 6];

/// Per-column weights for the open-three heuristic; center columns take
/// part in more potential lines.
const COLUMN_WEIGHTS: [i64; 7] = [3, 4, 6, 7, 6, 4, 3];

/// AI difficulty presets (time limit, depth).
pub const PRESETS: [AiPreset; 3] = [
    AiPreset::new("Easy", Duration::from_millis(500), 2),
    AiPreset::new("Medium", Duration::from_secs(1), 5),
    AiPreset::new("Hard", Duration::from_secs(5), 30),
];

/// A disc dropped into a column; `y` is the row the disc settles in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectFourMove {
    x: usize,
    y: usize,
    color: Color,
}

impl ConnectFourMove {
    pub fn new(x: usize, y: usize, color: Color) -> Self {
        ConnectFourMove { x, y, color }
    }
}

impl FieldMove for ConnectFourMove {
    fn x(&self) -> usize {
        self.x
    }

    fn y(&self) -> usize {
        self.y
    }

    fn color(&self) -> Color {
        self.color
    }
}

/// The Connect-Four playing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectFourField {
    board: BitBoard,
}

impl ConnectFourField {
    pub fn new() -> Self {
        ConnectFourField {
            board: BitBoard::new(8, 8),
        }
    }

    /// Restores a field from raw bit planes, for tests and embedders.
    /// Bits outside the visible area must be zero.
    pub fn from_bits(bits1: u64, bits2: u64) -> Self {
        assert!(
            bits1 & !VISIBLE_MASK == 0 && bits2 & !VISIBLE_MASK == 0,
            "guard cells must stay empty"
        );
        ConnectFourField {
            board: BitBoard::from_bits(8, 8, bits1, bits2),
        }
    }

    /// Counts weighted "three in a row with an empty fourth cell" patterns
    /// for one color, the same shift-AND cascades as the win check but
    /// intersected with empty completion cells.
    fn open_threes(&self, color: Color) -> i64 {
        let b = self.board.bits(color);
        let empty = !self.board.occupied() & VISIBLE_MASK;

        // Gravity axis: only completes on top of the stack.
        let mut possible = (b >> 8) & (b >> 16) & (b >> 24);

        // Row axis and both diagonals complete on either side and in the
        // two split patterns (X.XX / XX.X).
        for d in [1u32, 7, 9] {
            let intermed = (b << d) & (b << (2 * d));
            possible |= intermed & (b << (3 * d));
            possible |= intermed & (b >> d);
            let intermed = (b >> d) & (b >> (2 * d));
            possible |= intermed & (b >> (3 * d));
            possible |= intermed & (b << d);
        }

        possible &= empty;

        let mut total = 0;
        for (x, weight) in COLUMN_WEIGHTS.iter().enumerate() {
            let column = 0x0101010101010101u64 << x;
            total += weight * i64::from(BitBoard::count_bits(possible & column));
        }
        total
    }

    /// Marks every cell of every completed run for one color by folding the
    /// pair/quad products back out.
    fn run_cells(&self, color: Color) -> u64 {
        let b = self.board.bits(color);
        let mut out = 0;
        for d in DIRECTIONS {
            let pairs = b & (b >> d);
            let quads = pairs & (pairs >> (2 * d));
            let spread = quads | (quads << (2 * d));
            out |= spread | (spread << d);
        }
        out
    }
}

impl Default for ConnectFourField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for ConnectFourField {
    type Move = ConnectFourMove;

    fn width(&self) -> usize {
        VISIBLE_WIDTH
    }

    fn height(&self) -> usize {
        VISIBLE_HEIGHT
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(x < VISIBLE_WIDTH && y < VISIBLE_HEIGHT);
        self.board.get(x, y)
    }

    fn score(&self, color: Color) -> i64 {
        self.open_threes(color) - self.open_threes(color.other())
    }

    fn possible_moves(&self, color: Color) -> Vec<ConnectFourMove> {
        let mut out = Vec::with_capacity(VISIBLE_WIDTH);
        for &x in &COLUMN_ORDER {
            // Lowest empty cell of the column; row 5 is the bottom.
            for y in (0..VISIBLE_HEIGHT).rev() {
                if self.board.get(x, y) == Cell::Empty {
                    out.push(ConnectFourMove::new(x, y, color));
                    break;
                }
            }
        }
        out
    }

    fn apply(&self, mv: &ConnectFourMove) -> Self {
        ConnectFourField {
            board: self.board.set(mv.x, mv.y, mv.color.into()),
        }
    }

    fn has_won(&self, color: Color) -> bool {
        let b = self.board.bits(color);
        for d in DIRECTIONS {
            let pairs = b & (b >> d);
            if pairs & (pairs >> (2 * d)) != 0 {
                return true;
            }
        }
        false
    }

    fn is_full(&self) -> bool {
        self.board.occupied() & TOP_ROW_MASK == TOP_ROW_MASK
    }

    fn game_over(&self) -> bool {
        self.is_full() || self.has_won(Color::One) || self.has_won(Color::Two)
    }

    fn winning_moves(&self) -> Vec<ConnectFourMove> {
        let mut out = Vec::new();
        for color in [Color::One, Color::Two] {
            let cells = self.run_cells(color);
            if cells == 0 {
                continue;
            }
            for x in 0..VISIBLE_WIDTH {
                for y in 0..VISIBLE_HEIGHT {
                    if cells & self.board.mask(x, y) != 0 {
                        out.push(ConnectFourMove::new(x, y, color));
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for ConnectFourField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..VISIBLE_HEIGHT {
            for x in 0..VISIBLE_WIDTH {
                let symbol = match self.board.get(x, y) {
                    Cell::Color1 => "X",
                    Cell::Color2 => "O",
                    _ => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
