//! # Game Implementations
//!
//! The three games of the arena, each implementing the [`crate::Field`]
//! trait over a [`crate::BitBoard`]:
//!
//! - **Tic-Tac-Toe**: 3x3 line game, checked against 8 fixed win lines
//! - **Connect-Four**: 7x6 gravity game inside an 8x8 guarded bitboard,
//!   with O(1) shift-AND win detection
//! - **Reversi**: 8x8 sandwich-capture game with flood-fill move
//!   generation and a positional heuristic
//!
//! Each module also exports its hand-tuned AI difficulty presets.
//!
//! To add a game, implement a move type with [`crate::FieldMove`], a field
//! type with [`crate::Field`], and add both to the wrapper enums in
//! [`crate::game_wrapper`].

pub mod connect4;
pub mod reversi;
pub mod tictactoe;
