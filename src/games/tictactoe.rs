//! # Tic-Tac-Toe Implementation
//!
//! The 3x3 classic. Small enough that the AI at full depth (9 plies) plays
//! perfectly; its main role in the arena is as the simplest exerciser of the
//! `Field` contract and as a known-solved search test case.

use std::fmt;
use std::time::Duration;

use crate::board::{BitBoard, Cell};
use crate::strategy::AiPreset;
use crate::{Color, Field, FieldMove};

/// The 8 possible winning lines: 3 rows, 3 columns, 2 diagonals.
const ROWS: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Move generation order: center, then corners, then edges. Strong cells
/// first improves alpha-beta pruning without affecting correctness.
const ORDER: [(usize, usize); 9] = [
    (1, 1),
    (0, 0),
    (2, 2),
    (0, 2),
    (2, 0),
    (0, 1),
    (1, 0),
    (1, 2),
    (2, 1),
];

/// AI difficulty presets (time limit, depth). Hand-tuned configuration data;
/// depth 9 searches the full game tree.
pub const PRESETS: [AiPreset; 3] = [
    AiPreset::new("Easy", Duration::from_secs(1), 1),
    AiPreset::new("Medium", Duration::from_secs(1), 2),
    AiPreset::new("Hard", Duration::from_secs(5), 9),
];

/// A stone placement on an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToeMove {
    x: usize,
    y: usize,
    color: Color,
}

impl TicTacToeMove {
    pub fn new(x: usize, y: usize, color: Color) -> Self {
        TicTacToeMove { x, y, color }
    }
}

impl FieldMove for TicTacToeMove {
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

/// The 3x3 playing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToeField {
    board: BitBoard,
}

impl TicTacToeField {
    pub fn new() -> Self {
        TicTacToeField {
            board: BitBoard::new(3, 3),
        }
    }

    /// Restores a field from raw bit planes, for tests and embedders.
    pub fn from_bits(bits1: u64, bits2: u64) -> Self {
        TicTacToeField {
            board: BitBoard::from_bits(3, 3, bits1, bits2),
        }
    }

    fn line_cells(&self, color: Color) -> Vec<TicTacToeMove> {
        let mut out = Vec::new();
        for row in &ROWS {
            if row.iter().all(|&(x, y)| self.board.get(x, y) == color.into()) {
                out.extend(row.iter().map(|&(x, y)| TicTacToeMove::new(x, y, color)));
            }
        }
        out
    }
}

impl Default for TicTacToeField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for TicTacToeField {
    type Move = TicTacToeMove;

    fn width(&self) -> usize {
        3
    }

    fn height(&self) -> usize {
        3
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        self.board.get(x, y)
    }

    fn score(&self, color: Color) -> i64 {
        let other = color.other();
        let mut score = 0;
        for row in &ROWS {
            let mut rowscore: i64 = 0;
            for &(x, y) in row {
                match self.board.get(x, y) {
                    c if c == color.into() => rowscore += 1,
                    c if c == other.into() => rowscore -= 1,
                    _ => {}
                }
            }
            if rowscore == 3 {
                score += 32;
            } else if rowscore == -3 {
                score -= 32;
            } else if rowscore.abs() == 2 {
                score += rowscore;
            }
        }
        score
    }

    fn possible_moves(&self, color: Color) -> Vec<TicTacToeMove> {
        ORDER
            .iter()
            .filter(|&&(x, y)| self.board.get(x, y) == Cell::Empty)
            .map(|&(x, y)| TicTacToeMove::new(x, y, color))
            .collect()
    }

    fn apply(&self, mv: &TicTacToeMove) -> Self {
        TicTacToeField {
            board: self.board.set(mv.x, mv.y, mv.color.into()),
        }
    }

    fn has_won(&self, color: Color) -> bool {
        ROWS.iter()
            .any(|row| row.iter().all(|&(x, y)| self.board.get(x, y) == color.into()))
    }

    fn is_full(&self) -> bool {
        self.board.is_full()
    }

    fn game_over(&self) -> bool {
        self.is_full() || self.has_won(Color::One) || self.has_won(Color::Two)
    }

    fn winning_moves(&self) -> Vec<TicTacToeMove> {
        let mut out = self.line_cells(Color::One);
        out.extend(self.line_cells(Color::Two));
        out
    }
}

impl fmt::Display for TicTacToeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
