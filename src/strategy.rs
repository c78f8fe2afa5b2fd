//! # Player Strategies
//!
//! A [`Strategy`] produces moves for one color of a running game, polled
//! once per frame. Two kinds exist:
//!
//! - [`HumanPlayer`] turns directional button edges into a cursor over the
//!   legal moves and confirms with `A`.
//! - [`AiPlayer`] snapshots the position and runs iterative-deepening
//!   alpha-beta on a worker thread, so the caller's loop never blocks on
//!   the search.
//!
//! Both answer `None` until a move is ready; the game loop keeps polling.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::io::{Button, Controller};
use crate::{AlphaBeta, Color, Field, FieldMove};

/// A named difficulty level: how long and how deep the AI may think.
///
/// Each game module exposes its own `PRESETS` table tuned to its branching
/// factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiPreset {
    pub name: &'static str,
    pub time_limit: Duration,
    pub max_depth: u8,
}

impl AiPreset {
    pub const fn new(name: &'static str, time_limit: Duration, max_depth: u8) -> Self {
        Self {
            name,
            time_limit,
            max_depth,
        }
    }
}

/// Cursor-based move selection for a person holding the controller.
///
/// The selection always rests on a legal move. Directional presses re-score
/// all legal moves relative to the current selection and jump to the best
/// match: the pressed axis dominates (weight 100, signed so only moves in
/// the pressed direction qualify as "forward"), the orthogonal axis breaks
/// ties by closeness. Distances wrap around the board edges, so pressing
/// right on the rightmost legal move lands on the leftmost one.
pub struct HumanPlayer<F: Field> {
    color: Color,
    selected: Option<F::Move>,
}

/// Shortest signed distance from `b` to `a` on a cyclic axis of length `size`.
fn wrapped_delta(a: usize, b: usize, size: usize) -> i64 {
    let size = size as i64;
    let d = (a as i64 - b as i64).rem_euclid(size);
    if d > size / 2 {
        d - size
    } else {
        d
    }
}

impl<F: Field> HumanPlayer<F> {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            selected: None,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The move the cursor currently rests on, for rendering.
    pub fn selected_move(&self) -> Option<&F::Move> {
        self.selected.as_ref()
    }

    /// Polls the controller once. Returns the selected move on a fresh
    /// press of `A`, `None` otherwise.
    pub fn make_move(&mut self, ctrl: &mut dyn Controller, field: &F) -> Option<F::Move> {
        let possible = field.possible_moves(self.color);
        if possible.is_empty() {
            self.selected = None;
            return None;
        }

        // Re-seat the cursor after the board changed under it.
        let still_legal = self
            .selected
            .as_ref()
            .map_or(false, |sel| possible.contains(sel));
        if !still_legal {
            self.selected = Some(possible[0].clone());
        }

        let mut direction: Option<(i64, i64)> = None;
        if ctrl.fresh_press(Button::Left) {
            direction = Some((-1, 0));
        }
        if ctrl.fresh_press(Button::Right) {
            direction = Some((1, 0));
        }
        if ctrl.fresh_press(Button::Up) {
            direction = Some((0, -1));
        }
        if ctrl.fresh_press(Button::Down) {
            direction = Some((0, 1));
        }

        if let (Some((dir_x, dir_y)), Some(sel)) = (direction, self.selected.clone()) {
            let width = field.width() as i64;
            let height = field.height() as i64;

            let mut best_score = i64::MIN;
            let mut best = sel.clone();
            for mv in &possible {
                if *mv == sel {
                    continue;
                }
                let dx = wrapped_delta(mv.x(), sel.x(), field.width());
                let dy = wrapped_delta(mv.y(), sel.y(), field.height());

                let mut score = 0;
                if dir_x == 0 {
                    score += width - dx.abs();
                } else {
                    let sign = if dir_x * dx > 0 { 1 } else { -1 };
                    score += 100 * (width - dx.abs()) * sign;
                }
                if dir_y == 0 {
                    score += height - dy.abs();
                } else {
                    let sign = if dir_y * dy > 0 { 1 } else { -1 };
                    score += 100 * (height - dy.abs()) * sign;
                }

                if score > best_score {
                    best_score = score;
                    best = mv.clone();
                }
            }
            self.selected = Some(best);
        }

        if ctrl.fresh_press(Button::A) {
            self.selected.clone()
        } else {
            None
        }
    }
}

/// Alpha-beta player running its search off-thread.
///
/// The first poll with a pending position snapshots the field and spawns a
/// worker; subsequent polls check the one-shot channel without blocking.
/// The worker deepens from one ply up to the preset's maximum, keeping the
/// move of the deepest fully completed pass, so a timeout always leaves the
/// best answer found so far.
pub struct AiPlayer<F: Field> {
    color: Color,
    time_limit: Duration,
    max_depth: u8,
    pending: Option<Receiver<Option<F::Move>>>,
}

impl<F: Field> AiPlayer<F> {
    pub fn new(color: Color, preset: AiPreset) -> Self {
        Self {
            color,
            time_limit: preset.time_limit,
            max_depth: preset.max_depth,
            pending: None,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    fn think(field: F, color: Color, time_limit: Duration, max_depth: u8) -> Option<F::Move> {
        let deadline = Instant::now() + time_limit;
        let mut best = None;
        for depth in 1..=max_depth.max(1) {
            match AlphaBeta::new(depth, deadline).search(color, &field) {
                Ok(mv) => best = mv,
                Err(_) => break,
            }
        }
        // Any legal move beats stalling the game when even depth 1 timed out.
        best.or_else(|| field.possible_moves(color).into_iter().next())
    }

    /// Polls the running search, spawning one if none is in flight.
    /// Returns `None` while the worker is still thinking, or when the
    /// position offers no legal move.
    pub fn make_move(&mut self, _ctrl: &mut dyn Controller, field: &F) -> Option<F::Move> {
        match &self.pending {
            None => {
                let (tx, rx) = mpsc::channel();
                let snapshot = field.clone();
                let color = self.color;
                let time_limit = self.time_limit;
                let max_depth = self.max_depth;
                thread::spawn(move || {
                    let mv = Self::think(snapshot, color, time_limit, max_depth);
                    // The receiver may already be gone after a reset.
                    let _ = tx.send(mv);
                });
                self.pending = Some(rx);
                None
            }
            Some(rx) => match rx.try_recv() {
                Ok(mv) => {
                    self.pending = None;
                    mv
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.pending = None;
                    field.possible_moves(self.color).into_iter().next()
                }
            },
        }
    }
}

/// A player slot: either kind of move producer behind one polling call.
pub enum Strategy<F: Field> {
    Human(HumanPlayer<F>),
    Ai(AiPlayer<F>),
}

impl<F: Field> Strategy<F> {
    pub fn human(color: Color) -> Self {
        Strategy::Human(HumanPlayer::new(color))
    }

    pub fn ai(color: Color, preset: AiPreset) -> Self {
        Strategy::Ai(AiPlayer::new(color, preset))
    }

    pub fn color(&self) -> Color {
        match self {
            Strategy::Human(p) => p.color(),
            Strategy::Ai(p) => p.color(),
        }
    }

    /// Polls the strategy once per frame. `None` means "not decided yet".
    pub fn make_move(&mut self, ctrl: &mut dyn Controller, field: &F) -> Option<F::Move> {
        match self {
            Strategy::Human(p) => p.make_move(ctrl, field),
            Strategy::Ai(p) => p.make_move(ctrl, field),
        }
    }

    /// The human cursor position, if this slot is a human with a selection.
    pub fn selected_move(&self) -> Option<&F::Move> {
        match self {
            Strategy::Human(p) => p.selected_move(),
            Strategy::Ai(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::connect4::ConnectFourField;
    use crate::games::tictactoe::{TicTacToeField, PRESETS};
    use crate::io::Keypad;

    fn poll_until_move<F: Field>(
        player: &mut AiPlayer<F>,
        field: &F,
        ctrl: &mut Keypad,
    ) -> Option<F::Move> {
        for _ in 0..1000 {
            if let Some(mv) = player.make_move(ctrl, field) {
                return Some(mv);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_ai_player_answers_with_legal_move() {
        let field = TicTacToeField::new();
        let mut ctrl = Keypad::new();
        let mut player = AiPlayer::new(Color::One, PRESETS[2]);

        let mv = poll_until_move(&mut player, &field, &mut ctrl).expect("AI never answered");
        assert!(field.possible_moves(Color::One).contains(&mv));
    }

    #[test]
    fn test_ai_player_survives_tiny_time_limit() {
        let field = ConnectFourField::new();
        let mut ctrl = Keypad::new();
        let preset = AiPreset::new("Instant", Duration::from_nanos(1), 30);
        let mut player = AiPlayer::new(Color::One, preset);

        let mv = poll_until_move(&mut player, &field, &mut ctrl).expect("AI never answered");
        assert!(field.possible_moves(Color::One).contains(&mv));
    }

    #[test]
    fn test_ai_polling_does_not_block() {
        let field = ConnectFourField::new();
        let mut ctrl = Keypad::new();
        let preset = AiPreset::new("Slow", Duration::from_secs(5), 30);
        let mut player = AiPlayer::new(Color::One, preset);

        let start = Instant::now();
        // First poll spawns the worker, the second checks the channel.
        player.make_move(&mut ctrl, &field);
        player.make_move(&mut ctrl, &field);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_human_starts_on_first_possible_move() {
        let field = TicTacToeField::new();
        let mut ctrl = Keypad::new();
        let mut player: HumanPlayer<TicTacToeField> = HumanPlayer::new(Color::One);

        assert_eq!(player.make_move(&mut ctrl, &field), None);
        let first = field.possible_moves(Color::One)[0].clone();
        assert_eq!(player.selected_move(), Some(&first));
    }

    #[test]
    fn test_human_cursor_follows_direction() {
        let field = TicTacToeField::new();
        let mut ctrl = Keypad::new();
        let mut player: HumanPlayer<TicTacToeField> = HumanPlayer::new(Color::One);

        // Seed the cursor on the center opening move.
        player.make_move(&mut ctrl, &field);
        let sel = player.selected_move().unwrap();
        assert_eq!((sel.x(), sel.y()), (1, 1));

        ctrl.press(Button::Right);
        player.make_move(&mut ctrl, &field);
        let sel = player.selected_move().unwrap();
        assert_eq!((sel.x(), sel.y()), (2, 1));
    }

    #[test]
    fn test_human_cursor_wraps_around_edge() {
        let field = TicTacToeField::new();
        let mut ctrl = Keypad::new();
        let mut player: HumanPlayer<TicTacToeField> = HumanPlayer::new(Color::One);

        player.make_move(&mut ctrl, &field);
        ctrl.press(Button::Right);
        player.make_move(&mut ctrl, &field);
        ctrl.release(Button::Right);
        ctrl.press(Button::Right);
        player.make_move(&mut ctrl, &field);
        // From x=2 another step right wraps to x=0 on the same row.
        let sel = player.selected_move().unwrap();
        assert_eq!((sel.x(), sel.y()), (0, 1));
    }

    #[test]
    fn test_human_confirms_with_a() {
        let field = TicTacToeField::new();
        let mut ctrl = Keypad::new();
        let mut player: HumanPlayer<TicTacToeField> = HumanPlayer::new(Color::One);

        player.make_move(&mut ctrl, &field);
        ctrl.press(Button::A);
        let mv = player
            .make_move(&mut ctrl, &field)
            .expect("fresh A press should confirm");
        assert_eq!((mv.x(), mv.y()), (1, 1));

        // Holding A does not confirm again.
        assert_eq!(player.make_move(&mut ctrl, &field), None);
    }

    #[test]
    fn test_human_returns_none_without_moves() {
        // A full board offers nothing to select.
        let field = TicTacToeField::from_bits(0b100_011_101, 0b011_100_010);
        let mut ctrl = Keypad::new();
        ctrl.press(Button::A);
        let mut player: HumanPlayer<TicTacToeField> = HumanPlayer::new(Color::One);
        assert_eq!(player.make_move(&mut ctrl, &field), None);
        assert!(player.selected_move().is_none());
    }

    #[test]
    fn test_wrapped_delta_prefers_short_way() {
        assert_eq!(wrapped_delta(2, 1, 3), 1);
        assert_eq!(wrapped_delta(0, 2, 3), 1);
        assert_eq!(wrapped_delta(2, 0, 3), -1);
        assert_eq!(wrapped_delta(6, 0, 7), -1);
        assert_eq!(wrapped_delta(0, 0, 8), 0);
    }
}
