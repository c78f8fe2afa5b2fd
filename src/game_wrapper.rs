//! # Unified Game Interface
//!
//! Wraps the concrete game types behind a single pair of enums so the
//! search, strategies, and the turn controller can be written once against
//! [`Field`] and run any of the supported games, chosen at runtime.
//!
//! An enum rather than trait objects keeps the wrapped fields `Copy`-cheap
//! value types and lets `apply` stay a by-value successor function, which
//! the search relies on.

use std::fmt;

use crate::games::connect4::{self, ConnectFourField, ConnectFourMove};
use crate::games::reversi::{self, ReversiField, ReversiMove};
use crate::games::tictactoe::{self, TicTacToeField, TicTacToeMove};
use crate::strategy::AiPreset;
use crate::{Cell, Color, Field, FieldMove};

/// One of the supported playing fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWrapper {
    TicTacToe(TicTacToeField),
    ConnectFour(ConnectFourField),
    Reversi(ReversiField),
}

/// A move for the matching [`FieldWrapper`] variant.
///
/// Applying a move of one game to a field of another is a programming
/// error and panics.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveWrapper {
    TicTacToe(TicTacToeMove),
    ConnectFour(ConnectFourMove),
    Reversi(ReversiMove),
}

macro_rules! impl_field_dispatch {
    ($($variant:ident),*) => {
        impl Field for FieldWrapper {
            type Move = MoveWrapper;

            fn width(&self) -> usize {
                match self {
                    $(FieldWrapper::$variant(f) => f.width(),)*
                }
            }

            fn height(&self) -> usize {
                match self {
                    $(FieldWrapper::$variant(f) => f.height(),)*
                }
            }

            fn cell(&self, x: usize, y: usize) -> Cell {
                match self {
                    $(FieldWrapper::$variant(f) => f.cell(x, y),)*
                }
            }

            fn score(&self, color: Color) -> i64 {
                match self {
                    $(FieldWrapper::$variant(f) => f.score(color),)*
                }
            }

            fn possible_moves(&self, color: Color) -> Vec<Self::Move> {
                match self {
                    $(FieldWrapper::$variant(f) => f
                        .possible_moves(color)
                        .into_iter()
                        .map(MoveWrapper::$variant)
                        .collect(),)*
                }
            }

            fn apply(&self, mv: &Self::Move) -> Self {
                match (self, mv) {
                    $((FieldWrapper::$variant(f), MoveWrapper::$variant(m)) => {
                        FieldWrapper::$variant(f.apply(m))
                    })*
                    _ => panic!("Mismatched game and move types"),
                }
            }

            fn has_won(&self, color: Color) -> bool {
                match self {
                    $(FieldWrapper::$variant(f) => f.has_won(color),)*
                }
            }

            fn is_full(&self) -> bool {
                match self {
                    $(FieldWrapper::$variant(f) => f.is_full(),)*
                }
            }

            fn game_over(&self) -> bool {
                match self {
                    $(FieldWrapper::$variant(f) => f.game_over(),)*
                }
            }

            fn winning_moves(&self) -> Vec<Self::Move> {
                match self {
                    $(FieldWrapper::$variant(f) => f
                        .winning_moves()
                        .into_iter()
                        .map(MoveWrapper::$variant)
                        .collect(),)*
                }
            }
        }

        impl FieldMove for MoveWrapper {
            fn x(&self) -> usize {
                match self {
                    $(MoveWrapper::$variant(m) => m.x(),)*
                }
            }

            fn y(&self) -> usize {
                match self {
                    $(MoveWrapper::$variant(m) => m.y(),)*
                }
            }

            fn color(&self) -> Color {
                match self {
                    $(MoveWrapper::$variant(m) => m.color(),)*
                }
            }
        }

        impl fmt::Display for FieldWrapper {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(FieldWrapper::$variant(g) => write!(f, "{}", g),)*
                }
            }
        }
    };
}

impl_field_dispatch!(TicTacToe, ConnectFour, Reversi);

impl FieldWrapper {
    /// A fresh starting position of the same game.
    pub fn restarted(&self) -> Self {
        match self {
            FieldWrapper::TicTacToe(_) => FieldWrapper::TicTacToe(TicTacToeField::new()),
            FieldWrapper::ConnectFour(_) => FieldWrapper::ConnectFour(ConnectFourField::new()),
            FieldWrapper::Reversi(_) => FieldWrapper::Reversi(ReversiField::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldWrapper::TicTacToe(_) => "Tic-Tac-Toe",
            FieldWrapper::ConnectFour(_) => "Connect Four",
            FieldWrapper::Reversi(_) => "Reversi",
        }
    }

    /// The AI difficulty table tuned for this game's branching factor.
    pub fn presets(&self) -> [AiPreset; 3] {
        match self {
            FieldWrapper::TicTacToe(_) => tictactoe::PRESETS,
            FieldWrapper::ConnectFour(_) => connect4::PRESETS,
            FieldWrapper::Reversi(_) => reversi::PRESETS,
        }
    }
}

impl fmt::Display for MoveWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            MoveWrapper::TicTacToe(_) => "T",
            MoveWrapper::ConnectFour(_) => "C",
            MoveWrapper::Reversi(_) => "R",
        };
        write!(f, "{}({},{})", tag, self.x(), self.y())
    }
}
