//! # Turn Orchestrator
//!
//! [`StrategyGame`] drives one match of any [`Field`] game through a small
//! phase machine, polled once per frame from the embedder's loop:
//!
//! ```text
//! PreGame ──both players chosen──► MidGame ──game over──► GameOver
//!    ▲                                                        │
//!    └────────────────────── confirm ────────────────────────┘
//! ```
//!
//! In `PreGame` each color picks Human or one of the game's AI presets. In
//! `MidGame` the active strategy is polled for a move; a player without
//! legal moves is passed over, and when neither side can move the game
//! ends. `GameOver` keeps the final position around for rendering until a
//! confirm press starts the next match.

use std::time::Duration;

use crate::io::{Button, Controller};
use crate::strategy::{AiPreset, Strategy};
use crate::{Color, Field};

/// Where in the match lifecycle the orchestrator currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreGame,
    MidGame,
    GameOver,
}

/// Option count on the player-select screen: Human plus three presets.
const SELECT_OPTIONS: usize = 4;

/// One match of a two-player strategy game, any combination of human and
/// AI players. The field type is fixed per instance; a factory closure
/// produces fresh starting positions.
pub struct StrategyGame<F: Field> {
    factory: Box<dyn Fn() -> F + Send>,
    presets: [AiPreset; 3],
    phase: Phase,
    field: Option<F>,
    active: Color,
    player1: Option<Strategy<F>>,
    player2: Option<Strategy<F>>,
    select_index: usize,
}

impl<F: Field> StrategyGame<F> {
    pub fn new(factory: impl Fn() -> F + Send + 'static, presets: [AiPreset; 3]) -> Self {
        Self {
            factory: Box::new(factory),
            presets,
            phase: Phase::PreGame,
            field: None,
            active: Color::One,
            player1: None,
            player2: None,
            select_index: 0,
        }
    }

    /// Skips player selection and starts the match immediately. Used by
    /// embedders that configure players programmatically.
    pub fn start_with(&mut self, player1: Strategy<F>, player2: Strategy<F>) {
        self.player1 = Some(player1);
        self.player2 = Some(player2);
        self.field = Some((self.factory)());
        self.active = Color::One;
        self.phase = Phase::MidGame;
    }

    /// Discards the match in progress and returns to player selection.
    pub fn reset(&mut self) {
        self.phase = Phase::PreGame;
        self.field = None;
        self.active = Color::One;
        self.player1 = None;
        self.player2 = None;
        self.select_index = 0;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current position, `None` during `PreGame`.
    pub fn field(&self) -> Option<&F> {
        self.field.as_ref()
    }

    pub fn active_color(&self) -> Color {
        self.active
    }

    /// The color whose player is being chosen, `None` outside `PreGame`.
    pub fn selecting_for(&self) -> Option<Color> {
        match self.phase {
            Phase::PreGame if self.player1.is_none() => Some(Color::One),
            Phase::PreGame if self.player2.is_none() => Some(Color::Two),
            _ => None,
        }
    }

    /// Highlighted entry on the player-select screen: 0 is Human,
    /// 1 through 3 are the AI presets.
    pub fn select_index(&self) -> usize {
        self.select_index
    }

    pub fn presets(&self) -> &[AiPreset; 3] {
        &self.presets
    }

    /// The human cursor of the active player, for rendering.
    pub fn selected_move(&self) -> Option<&F::Move> {
        let slot = match self.active {
            Color::One => self.player1.as_ref(),
            Color::Two => self.player2.as_ref(),
        };
        slot.and_then(|s| s.selected_move())
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// The winning color once the game is over; `None` means a draw or a
    /// still-running game.
    pub fn winner(&self) -> Option<Color> {
        let field = self.field.as_ref()?;
        if field.has_won(Color::One) {
            Some(Color::One)
        } else if field.has_won(Color::Two) {
            Some(Color::Two)
        } else {
            None
        }
    }

    /// Cells of the winning line/set of the finished game.
    pub fn winning_moves(&self) -> Vec<F::Move> {
        self.field
            .as_ref()
            .map(|f| f.winning_moves())
            .unwrap_or_default()
    }

    /// Advances the match by one frame.
    pub fn update(&mut self, ctrl: &mut dyn Controller, _delta: Duration) {
        match self.phase {
            Phase::PreGame => self.update_pregame(ctrl),
            Phase::MidGame => self.update_midgame(ctrl),
            Phase::GameOver => self.update_gameover(ctrl),
        }
    }

    fn update_pregame(&mut self, ctrl: &mut dyn Controller) {
        let color = match self.selecting_for() {
            Some(color) => color,
            None => {
                // Both players chosen on an earlier frame.
                self.field = Some((self.factory)());
                self.active = Color::One;
                self.phase = Phase::MidGame;
                return;
            }
        };

        if ctrl.fresh_press(Button::Left) {
            self.select_index = (self.select_index + SELECT_OPTIONS - 1) % SELECT_OPTIONS;
        }
        if ctrl.fresh_press(Button::Right) {
            self.select_index = (self.select_index + 1) % SELECT_OPTIONS;
        }

        if ctrl.fresh_press(Button::A) {
            let strategy = match self.select_index {
                0 => Strategy::human(color),
                i => Strategy::ai(color, self.presets[i - 1]),
            };
            match color {
                Color::One => self.player1 = Some(strategy),
                Color::Two => self.player2 = Some(strategy),
            }
            self.select_index = 0;
        }

        if self.player1.is_some() && self.player2.is_some() {
            self.field = Some((self.factory)());
            self.active = Color::One;
            self.phase = Phase::MidGame;
        }
    }

    fn update_midgame(&mut self, ctrl: &mut dyn Controller) {
        let field = match self.field.clone() {
            Some(field) => field,
            None => return,
        };

        // A player without moves is passed over; two passes end the game.
        if field.possible_moves(self.active).is_empty() {
            self.active = self.active.other();
            if field.possible_moves(self.active).is_empty() {
                self.phase = Phase::GameOver;
            }
            return;
        }

        let slot = match self.active {
            Color::One => self.player1.as_mut(),
            Color::Two => self.player2.as_mut(),
        };
        let mv = match slot {
            Some(strategy) => strategy.make_move(ctrl, &field),
            None => None,
        };

        if let Some(mv) = mv {
            let next = field.apply(&mv);
            let over = next.game_over();
            self.field = Some(next);
            if over {
                self.phase = Phase::GameOver;
            } else {
                self.active = self.active.other();
            }
        }
    }

    fn update_gameover(&mut self, ctrl: &mut dyn Controller) {
        if ctrl.fresh_press(Button::A) {
            self.reset();
        }
    }
}
