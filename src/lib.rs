//! # Bitboard Alpha-Beta Arena
//!
//! A two-player strategy-game engine built on 64-bit bitboards: a common
//! [`Field`] capability trait, three game implementations (Tic-Tac-Toe,
//! Connect-Four, Reversi), a depth- and wall-clock-bounded alpha-beta
//! search, Human/AI strategies, and a turn-based orchestrator.
//!
//! Fields are copy-on-write value types. Applying a move never mutates the
//! source position; it produces a fresh one. That single design decision is
//! what lets the AI search a position on a worker thread while the update
//! loop keeps polling input and rendering, with nothing shared but an
//! immutable snapshot and a one-shot result channel.

pub mod board;
pub mod game_controller;
pub mod game_wrapper;
pub mod games;
pub mod io;
pub mod strategy;

pub use board::{BitBoard, Cell};

use std::error::Error;
use std::fmt;
use std::time::Instant;

/// One of the two players. Corresponds to the two planes of a [`BitBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    One,
    Two,
}

impl Color {
    /// Returns the opponent of this color.
    pub fn other(self) -> Color {
        match self {
            Color::One => Color::Two,
            Color::Two => Color::One,
        }
    }
}

/// Coordinate and color accessors shared by every game's move type.
///
/// Moves compare equal by their effective coordinates and color; the human
/// strategy relies on this to track a selection across frames.
pub trait FieldMove {
    fn x(&self) -> usize;
    fn y(&self) -> usize;
    fn color(&self) -> Color;
}

/// The playing field of a two-player strategy game.
///
/// `Clone + Send` are required so a position can be snapshotted and handed
/// to an AI worker thread. Implementations are value types; [`Field::apply`]
/// must leave `self` untouched and return the successor position.
pub trait Field: Clone + Send + 'static {
    /// The type of a move in the game.
    type Move: FieldMove + Clone + PartialEq + Send + 'static;

    /// Visible board width, as addressed by moves.
    fn width(&self) -> usize;
    /// Visible board height, as addressed by moves.
    fn height(&self) -> usize;
    /// Reads a single cell of the visible board.
    fn cell(&self, x: usize, y: usize) -> Cell;

    /// Heuristic value of the position for `color`; higher is better.
    fn score(&self, color: Color) -> i64;
    /// All legal moves for `color`; empty means a forced pass or stalemate.
    fn possible_moves(&self, color: Color) -> Vec<Self::Move>;
    /// Applies a move, returning the successor position.
    #[must_use]
    fn apply(&self, mv: &Self::Move) -> Self;
    /// Checks whether `color` has won the game.
    fn has_won(&self, color: Color) -> bool;
    /// Checks whether no playable cell is left.
    fn is_full(&self) -> bool;
    /// Checks whether the game is finished.
    fn game_over(&self) -> bool;
    /// The cells participating in the winning line/set, for highlighting.
    fn winning_moves(&self) -> Vec<Self::Move>;
}

/// Control signal raised inside the search when the wall-clock deadline has
/// passed. Expected and recoverable: iterative deepening treats it as "no
/// result at this depth", never as a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTimeout;

impl fmt::Display for SearchTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "search exceeded its deadline")
    }
}

impl Error for SearchTimeout {}

/// Score awarded for a forced win, scaled by remaining depth so that faster
/// wins (and slower losses) are preferred.
pub const WIN_SCORE: i64 = 100_000;

const ALPHA_INIT: i64 = -111_111_111_111;
const BETA_INIT: i64 = -ALPHA_INIT;

/// Depth- and deadline-bounded alpha-beta minimax over any [`Field`].
///
/// The deadline is enforced cooperatively: every recursion entry compares
/// the wall clock against it and bails out with [`SearchTimeout`]. That
/// bounds an otherwise unbounded recursive search without killing threads.
pub struct AlphaBeta {
    depth: u8,
    deadline: Instant,
    player: Color,
}

impl AlphaBeta {
    /// Creates a search bounded to `depth` plies and the given wall-clock
    /// deadline.
    pub fn new(depth: u8, deadline: Instant) -> Self {
        assert!(depth >= 1, "search needs at least one ply");
        AlphaBeta {
            depth,
            deadline,
            player: Color::One,
        }
    }

    /// Finds the best move for `player` on `field`.
    ///
    /// Returns `Ok(None)` when `player` has no legal moves. Returns
    /// `Err(SearchTimeout)` when the deadline cut the search short; the
    /// caller decides what partial result to fall back to.
    pub fn search<F: Field>(
        mut self,
        player: Color,
        field: &F,
    ) -> Result<Option<F::Move>, SearchTimeout> {
        self.player = player;

        let mut best_score = ALPHA_INIT - 1;
        let mut best_move = None;
        for mv in field.possible_moves(player) {
            let next = field.apply(&mv);
            let score = self.get_min(&next, ALPHA_INIT, BETA_INIT, self.depth - 1)?;
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
        }
        Ok(best_move)
    }

    /// Best achievable score when the searching player is to move.
    fn get_max<F: Field>(
        &self,
        field: &F,
        mut alpha: i64,
        beta: i64,
        depth: u8,
    ) -> Result<i64, SearchTimeout> {
        if Instant::now() >= self.deadline {
            return Err(SearchTimeout);
        }
        if field.has_won(self.player.other()) {
            return Ok(-WIN_SCORE * (i64::from(depth) + 1));
        }
        if field.is_full() || depth == 0 {
            return Ok(field.score(self.player));
        }

        let mut best_score = ALPHA_INIT;
        for mv in field.possible_moves(self.player) {
            let next = field.apply(&mv);
            let score = self.get_min(&next, alpha, beta, depth - 1)?;
            if score > best_score {
                alpha = score;
                best_score = score;
            }
            if alpha >= beta {
                return Ok(alpha);
            }
        }
        Ok(best_score)
    }

    /// Best achievable score when the opponent is to move.
    fn get_min<F: Field>(
        &self,
        field: &F,
        alpha: i64,
        mut beta: i64,
        depth: u8,
    ) -> Result<i64, SearchTimeout> {
        if Instant::now() >= self.deadline {
            return Err(SearchTimeout);
        }
        if field.has_won(self.player) {
            return Ok(WIN_SCORE * (i64::from(depth) + 1));
        }
        if field.is_full() || depth == 0 {
            return Ok(field.score(self.player));
        }

        let mut best_score = BETA_INIT;
        for mv in field.possible_moves(self.player.other()) {
            let next = field.apply(&mv);
            let score = self.get_max(&next, alpha, beta, depth - 1)?;
            if score < best_score {
                beta = score;
                best_score = score;
            }
            if alpha >= beta {
                return Ok(beta);
            }
        }
        Ok(best_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{TicTacToeField, TicTacToeMove};
    use std::time::Duration;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    #[test]
    fn test_takes_immediate_win() {
        // X X .      X to move: (2, 0) completes the top row.
        // O O .
        // . . .
        let field = TicTacToeField::default()
            .apply(&TicTacToeMove::new(0, 0, Color::One))
            .apply(&TicTacToeMove::new(0, 1, Color::Two))
            .apply(&TicTacToeMove::new(1, 0, Color::One))
            .apply(&TicTacToeMove::new(1, 1, Color::Two));

        let best = AlphaBeta::new(3, far_deadline())
            .search(Color::One, &field)
            .unwrap()
            .unwrap();
        assert_eq!(best, TicTacToeMove::new(2, 0, Color::One));
    }

    #[test]
    fn test_blocks_immediate_loss() {
        // X X .      O to move: anything but (2, 0) loses.
        // O . .
        // . . .
        let field = TicTacToeField::default()
            .apply(&TicTacToeMove::new(0, 0, Color::One))
            .apply(&TicTacToeMove::new(0, 1, Color::Two))
            .apply(&TicTacToeMove::new(1, 0, Color::One));

        let best = AlphaBeta::new(4, far_deadline())
            .search(Color::Two, &field)
            .unwrap()
            .unwrap();
        assert_eq!(best, TicTacToeMove::new(2, 0, Color::Two));
    }

    #[test]
    fn test_expired_deadline_times_out() {
        let field = TicTacToeField::default();
        let result = AlphaBeta::new(9, Instant::now()).search(Color::One, &field);
        assert_eq!(result, Err(SearchTimeout));
    }

    #[test]
    fn test_no_moves_yields_none() {
        let mut field = TicTacToeField::default();
        // Fill the board in a drawn pattern:
        //   X O X
        //   X O O
        //   O X X
        let plan = [
            (0, 0, Color::One),
            (1, 0, Color::Two),
            (2, 0, Color::One),
            (0, 1, Color::One),
            (1, 1, Color::Two),
            (2, 1, Color::Two),
            (0, 2, Color::Two),
            (1, 2, Color::One),
            (2, 2, Color::One),
        ];
        for (x, y, color) in plan {
            field = field.apply(&TicTacToeMove::new(x, y, color));
        }
        assert!(field.is_full());
        let best = AlphaBeta::new(2, far_deadline())
            .search(Color::One, &field)
            .unwrap();
        assert!(best.is_none());
    }
}
