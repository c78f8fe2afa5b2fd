//! # Bitboard Representation
//!
//! A rectangular two-color board packed into a pair of 64-bit integers,
//! one bit per cell per color. Boards are plain `Copy` value types: every
//! mutation returns a new board, which is what makes it safe to hand a
//! position to an AI worker thread without any synchronization.
//!
//! ## Bit layout
//! Cell `(x, y)` maps to bit `x + y * width`. The product `width * height`
//! must not exceed 64. Games are free to reserve guard columns/rows inside
//! the 64-bit plane (Connect-Four does) to make shift-based pattern checks
//! wrap-safe.

use std::fmt;

use crate::Color;

/// The state of a single cell on a [`BitBoard`].
///
/// `Undefined` (both color bits set) is a defensive read result only.
/// Legal mutation never produces it; see [`BitBoard::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Color1,
    Color2,
    Undefined,
}

impl Cell {
    /// The color occupying this cell, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Color1 => Some(Color::One),
            Cell::Color2 => Some(Color::Two),
            Cell::Empty | Cell::Undefined => None,
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::One => Cell::Color1,
            Color::Two => Cell::Color2,
        }
    }
}

/// A fixed-size two-color bit-plane board.
///
/// Out-of-range coordinates are a programming error and panic; all callers
/// obtain coordinates from a game's move generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitBoard {
    width: usize,
    height: usize,
    bits1: u64,
    bits2: u64,
}

impl BitBoard {
    /// Creates an empty board of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_bits(width, height, 0, 0)
    }

    /// Creates a board from raw bit planes.
    ///
    /// Used by games with a fixed starting placement (Reversi) and by tests
    /// that craft specific positions.
    pub fn from_bits(width: usize, height: usize, bits1: u64, bits2: u64) -> Self {
        assert!(
            width * height <= 64 && width > 0 && height > 0,
            "board of {width}x{height} cells does not fit a 64-bit plane"
        );
        BitBoard {
            width,
            height,
            bits1,
            bits2,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw bit plane for one color.
    pub fn bits(&self, color: Color) -> u64 {
        match color {
            Color::One => self.bits1,
            Color::Two => self.bits2,
        }
    }

    /// All occupied cells, regardless of color.
    pub fn occupied(&self) -> u64 {
        self.bits1 | self.bits2
    }

    /// A mask with only the bit for `(x, y)` set.
    pub fn mask(&self, x: usize, y: usize) -> u64 {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} board",
            self.width,
            self.height
        );
        1u64 << (x + y * self.width)
    }

    /// A mask covering every addressable cell of the board.
    pub fn full_mask(&self) -> u64 {
        let cells = self.width * self.height;
        if cells == 64 {
            u64::MAX
        } else {
            (1u64 << cells) - 1
        }
    }

    /// Reads the cell at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        let mask = self.mask(x, y);
        match (self.bits1 & mask != 0, self.bits2 & mask != 0) {
            (false, false) => Cell::Empty,
            (true, false) => Cell::Color1,
            (false, true) => Cell::Color2,
            (true, true) => Cell::Undefined,
        }
    }

    /// Returns a new board with the cell at `(x, y)` set to `cell`.
    ///
    /// Writing `Cell::Undefined` is not a legal mutation.
    #[must_use]
    pub fn set(&self, x: usize, y: usize, cell: Cell) -> BitBoard {
        debug_assert!(cell != Cell::Undefined, "the undefined cell state is never written");
        let mask = self.mask(x, y);
        let mut next = *self;
        match cell {
            Cell::Empty => {
                next.bits1 &= !mask;
                next.bits2 &= !mask;
            }
            Cell::Color1 => {
                next.bits1 |= mask;
                next.bits2 &= !mask;
            }
            Cell::Color2 | Cell::Undefined => {
                next.bits1 &= !mask;
                next.bits2 |= mask;
            }
        }
        next
    }

    /// Returns a new board with raw plane updates applied.
    ///
    /// `gain` is set on `color`'s plane and cleared from the opponent's;
    /// used by Reversi to apply a whole flip set in one step.
    #[must_use]
    pub fn with_flipped(&self, color: Color, gain: u64) -> BitBoard {
        let mut next = *self;
        match color {
            Color::One => {
                next.bits1 |= gain;
                next.bits2 &= !gain;
            }
            Color::Two => {
                next.bits2 |= gain;
                next.bits1 &= !gain;
            }
        }
        next
    }

    /// Checks whether every addressable cell is occupied.
    pub fn is_full(&self) -> bool {
        self.occupied() & self.full_mask() == self.full_mask()
    }

    /// Population count, used by the positional heuristics.
    pub fn count_bits(bits: u64) -> u32 {
        bits.count_ones()
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let symbol = match self.get(x, y) {
                    Cell::Color1 => "X",
                    Cell::Color2 => "O",
                    Cell::Empty => ".",
                    Cell::Undefined => "?",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
