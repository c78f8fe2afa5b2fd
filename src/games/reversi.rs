//! # Reversi Implementation
//!
//! Full 8x8 bitboard Reversi. Legal-move generation runs a directional
//! flood fill over the whole plane at once (a Kogge-Stone-style dumb-fill):
//! for each of the eight directions, candidate empty cells survive as long
//! as each further step lands on an opponent disc, and become legal the
//! step a friendly disc is reached. Per-direction edge masks keep shifts
//! from wrapping across the horizontal board edges.
//!
//! Applying a move walks the eight directions from the played cell and
//! flips every sandwiched opponent disc; directions without a friendly
//! anchor flip nothing.

use std::fmt;
use std::time::Duration;

use crate::board::{BitBoard, Cell};
use crate::strategy::AiPreset;
use crate::{Color, Field, FieldMove};

const SIZE: usize = 8;

/// Starting placement: two discs per color in the center.
const START_BITS1: u64 = 0x18000000;
const START_BITS2: u64 = 0x1800000000;

/// Masks excluding the file a shift would wrap into.
const NOT_FILE_A: u64 = 0xfefefefefefefefe;
const NOT_FILE_H: u64 = 0x7f7f7f7f7f7f7f7f;

/// Positional masks of the heuristic: the four corners, the edge neighbors
/// of corners (C-squares), and the diagonal neighbors of corners
/// (X-squares).
const CORNER_MASK: u64 = 0x8100000000000081;
const C_SQUARE_MASK: u64 = 0x4281000000008142;
const X_SQUARE_MASK: u64 = 0x42000000004200;

/// Heuristic weights: corner occupancy, mobility, corner-adjacent exposure,
/// and a penalty on raw disc count to discourage early over-expansion.
/// Standard positional Reversi values.
const CORNER_WEIGHT: i64 = 1000;
const MOBILITY_WEIGHT: i64 = 238;
const C_SQUARE_WEIGHT: i64 = -166;
const X_SQUARE_WEIGHT: i64 = -401;
const DISC_WEIGHT: i64 = -26;

/// The eight scan directions as (dx, dy) steps, used by the flip walk.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// AI difficulty presets (time limit, depth).
pub const PRESETS: [AiPreset; 3] = [
    AiPreset::new("Easy", Duration::from_millis(500), 2),
    AiPreset::new("Medium", Duration::from_secs(1), 5),
    AiPreset::new("Hard", Duration::from_secs(5), 30),
];

fn shift_n(b: u64) -> u64 {
    b >> 8
}

fn shift_s(b: u64) -> u64 {
    b << 8
}

fn shift_e(b: u64) -> u64 {
    (b << 1) & NOT_FILE_A
}

fn shift_w(b: u64) -> u64 {
    (b >> 1) & NOT_FILE_H
}

fn shift_ne(b: u64) -> u64 {
    (b >> 7) & NOT_FILE_A
}

fn shift_nw(b: u64) -> u64 {
    (b >> 9) & NOT_FILE_H
}

fn shift_se(b: u64) -> u64 {
    (b << 9) & NOT_FILE_A
}

fn shift_sw(b: u64) -> u64 {
    (b << 7) & NOT_FILE_H
}

const SHIFTS: [fn(u64) -> u64; 8] = [
    shift_n, shift_ne, shift_e, shift_se, shift_s, shift_sw, shift_w, shift_nw,
];

/// A disc placement; the flip set is computed when the move is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReversiMove {
    x: usize,
    y: usize,
    color: Color,
}

impl ReversiMove {
    pub fn new(x: usize, y: usize, color: Color) -> Self {
        ReversiMove { x, y, color }
    }
}

impl FieldMove for ReversiMove {
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

/// The Reversi playing field, with running disc counts per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReversiField {
    board: BitBoard,
    count1: u32,
    count2: u32,
}

impl ReversiField {
    pub fn new() -> Self {
        Self::from_bits(START_BITS1, START_BITS2)
    }

    /// Restores a field from raw bit planes, for tests and embedders.
    pub fn from_bits(bits1: u64, bits2: u64) -> Self {
        assert!(bits1 & bits2 == 0, "a cell cannot hold both colors");
        ReversiField {
            board: BitBoard::from_bits(SIZE, SIZE, bits1, bits2),
            count1: BitBoard::count_bits(bits1),
            count2: BitBoard::count_bits(bits2),
        }
    }

    /// Number of discs on the board for `color`.
    pub fn disc_count(&self, color: Color) -> u32 {
        match color {
            Color::One => self.count1,
            Color::Two => self.count2,
        }
    }

    /// All legal target cells for `color`, as a bitmap.
    ///
    /// One flood fill per direction: candidates start as the empty cells,
    /// and a candidate stays alive while successive steps keep meeting
    /// opponent discs, becoming legal once a friendly disc follows.
    fn possible_bitmap(&self, color: Color) -> u64 {
        let own = self.board.bits(color);
        let opponent = self.board.bits(color.other());
        let free = !own & !opponent;

        SHIFTS
            .iter()
            .fold(0, |acc, &step| acc | Self::possible_dir(own, opponent, free, step))
    }

    fn possible_dir(own: u64, opponent: u64, free: u64, step: fn(u64) -> u64) -> u64 {
        // The first step away from a candidate must be an opponent disc.
        let mut own = step(own);
        let mut opponent_fill = step(opponent);
        let mut candidates = free & opponent_fill;

        let mut found = 0;
        while candidates != 0 {
            own = step(own);
            opponent_fill = step(opponent_fill);

            // Candidates now backed by a friendly disc are legal.
            let newly_found = own & candidates;
            candidates &= !newly_found;
            found |= newly_found;

            // The rest survive only if the run of opponent discs continues.
            candidates &= opponent_fill;
        }
        found
    }

    /// The flip set of playing at `(x, y)`: the played cell plus every
    /// sandwiched opponent disc, and the number of cells gained.
    fn flipped_stones(&self, x: usize, y: usize, color: Color) -> (u64, u32) {
        let other: Cell = color.other().into();
        let own: Cell = color.into();

        let mut flips = self.board.mask(x, y);
        let mut gained = 1;
        for &(dx, dy) in &DIRECTIONS {
            let mut cx = x as isize + dx;
            let mut cy = y as isize + dy;
            let mut flips_dir = 0u64;
            let mut gained_dir = 0;
            while Self::on_board(cx, cy) && self.board.get(cx as usize, cy as usize) == other {
                flips_dir |= self.board.mask(cx as usize, cy as usize);
                gained_dir += 1;
                cx += dx;
                cy += dy;
            }
            // Flips only count when anchored by a friendly disc.
            if Self::on_board(cx, cy) && self.board.get(cx as usize, cy as usize) == own {
                flips |= flips_dir;
                gained += gained_dir;
            }
        }
        (flips, gained)
    }

    fn on_board(x: isize, y: isize) -> bool {
        (0..SIZE as isize).contains(&x) && (0..SIZE as isize).contains(&y)
    }

    fn positional_score(&self, color: Color) -> i64 {
        let bits = self.board.bits(color);
        let mobility = i64::from(BitBoard::count_bits(self.possible_bitmap(color)));
        CORNER_WEIGHT * i64::from(BitBoard::count_bits(bits & CORNER_MASK))
            + MOBILITY_WEIGHT * mobility
            + C_SQUARE_WEIGHT * i64::from(BitBoard::count_bits(bits & C_SQUARE_MASK))
            + X_SQUARE_WEIGHT * i64::from(BitBoard::count_bits(bits & X_SQUARE_MASK))
            + DISC_WEIGHT * i64::from(self.disc_count(color))
    }

    fn moves_from_bitmap(&self, bitmap: u64, color: Color) -> Vec<ReversiMove> {
        let mut out = Vec::new();
        for y in 0..SIZE {
            for x in 0..SIZE {
                if bitmap & self.board.mask(x, y) != 0 {
                    out.push(ReversiMove::new(x, y, color));
                }
            }
        }
        out
    }
}

impl Default for ReversiField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for ReversiField {
    type Move = ReversiMove;

    fn width(&self) -> usize {
        SIZE
    }

    fn height(&self) -> usize {
        SIZE
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        self.board.get(x, y)
    }

    fn score(&self, color: Color) -> i64 {
        self.positional_score(color) - self.positional_score(color.other())
    }

    fn possible_moves(&self, color: Color) -> Vec<ReversiMove> {
        self.moves_from_bitmap(self.possible_bitmap(color), color)
    }

    fn apply(&self, mv: &ReversiMove) -> Self {
        let (flips, gained) = self.flipped_stones(mv.x, mv.y, mv.color);
        let board = self.board.with_flipped(mv.color, flips);
        // One gained cell is the placement itself; the rest were taken
        // from the opponent.
        let (count1, count2) = match mv.color {
            Color::One => (self.count1 + gained, self.count2 - (gained - 1)),
            Color::Two => (self.count1 - (gained - 1), self.count2 + gained),
        };
        ReversiField {
            board,
            count1,
            count2,
        }
    }

    fn has_won(&self, color: Color) -> bool {
        if !self.game_over() {
            return false;
        }
        self.disc_count(color) > self.disc_count(color.other())
    }

    fn is_full(&self) -> bool {
        self.board.occupied() == u64::MAX
    }

    fn game_over(&self) -> bool {
        self.is_full()
            || (self.possible_bitmap(Color::One) == 0 && self.possible_bitmap(Color::Two) == 0)
    }

    fn winning_moves(&self) -> Vec<ReversiMove> {
        let winner = if self.has_won(Color::One) {
            Color::One
        } else if self.has_won(Color::Two) {
            Color::Two
        } else {
            return Vec::new();
        };
        self.moves_from_bitmap(self.board.bits(winner), winner)
    }
}

impl fmt::Display for ReversiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let field = ReversiField::new();
        assert_eq!(field.disc_count(Color::One), 2);
        assert_eq!(field.disc_count(Color::Two), 2);
        assert_eq!(field.cell(3, 3), Cell::Color1);
        assert_eq!(field.cell(4, 3), Cell::Color1);
        assert_eq!(field.cell(3, 4), Cell::Color2);
        assert_eq!(field.cell(4, 4), Cell::Color2);
    }

    #[test]
    fn test_initial_legal_moves() {
        let field = ReversiField::new();
        let moves = field.possible_moves(Color::One);
        let mut cells: Vec<(usize, usize)> = moves.iter().map(|m| (m.x(), m.y())).collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![(2, 5), (3, 5), (4, 5), (5, 5)]);
    }

    #[test]
    fn test_apply_flips_sandwiched_disc() {
        let field = ReversiField::new();
        let next = field.apply(&ReversiMove::new(3, 5, Color::One));
        assert_eq!(next.cell(3, 5), Cell::Color1);
        assert_eq!(next.cell(3, 4), Cell::Color1);
        assert_eq!(next.disc_count(Color::One), 4);
        assert_eq!(next.disc_count(Color::Two), 1);
        // The source field is untouched.
        assert_eq!(field.cell(3, 4), Cell::Color2);
        assert_eq!(field.disc_count(Color::Two), 2);
    }

    #[test]
    fn test_flips_only_in_anchored_directions() {
        // Row 0: X(0,0) O(1,0) .(2,0) O(3,0) .(4,0)
        // Playing (2,0) as X flips (1,0) via the western anchor, but must
        // leave (3,0) alone: no friendly disc behind it.
        let field = ReversiField::from_bits(1, (1 << 1) | (1 << 3));
        let moves = field.possible_moves(Color::One);
        assert!(moves.contains(&ReversiMove::new(2, 0, Color::One)));

        let next = field.apply(&ReversiMove::new(2, 0, Color::One));
        assert_eq!(next.cell(1, 0), Cell::Color1);
        assert_eq!(next.cell(2, 0), Cell::Color1);
        assert_eq!(next.cell(3, 0), Cell::Color2);
        assert_eq!(next.disc_count(Color::One), 3);
        assert_eq!(next.disc_count(Color::Two), 1);
    }

    #[test]
    fn test_edge_no_wraparound() {
        // An east-edge disc must not produce candidates on the next row.
        // X at (7,0), O at (6,0): west sandwich candidate is (5,0) only.
        let field = ReversiField::from_bits(1 << 7, 1 << 6);
        let moves = field.possible_moves(Color::One);
        assert_eq!(moves.len(), 1);
        assert_eq!((moves[0].x(), moves[0].y()), (5, 0));
    }

    #[test]
    fn test_forced_pass_position() {
        // One has no moves while Two still does.
        // O at (0,0), X at (1,0); (2,0) sandwiches for Two only.
        let field = ReversiField::from_bits(1 << 1, 1);
        assert!(field.possible_moves(Color::One).is_empty());
        assert!(!field.possible_moves(Color::Two).is_empty());
        assert!(!field.game_over());
    }

    #[test]
    fn test_game_over_and_winner_by_count() {
        // Nobody can move: a single color fills a corner region.
        let field = ReversiField::from_bits(0b11, 0);
        assert!(field.game_over());
        assert!(field.has_won(Color::One));
        assert!(!field.has_won(Color::Two));
        assert_eq!(field.winning_moves().len(), 2);
    }

    #[test]
    fn test_corner_dominates_score() {
        let with_corner = ReversiField::from_bits(1, 1 << 10);
        assert!(with_corner.score(Color::One) > 0);
    }
}
