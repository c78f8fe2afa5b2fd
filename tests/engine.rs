//! Randomized cross-checks of the bitboard game rules against naive
//! cell-by-cell reference implementations, plus search-level properties.

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use alphabeta::games::connect4::ConnectFourField;
use alphabeta::games::reversi::ReversiField;
use alphabeta::games::tictactoe::TicTacToeField;
use alphabeta::{AlphaBeta, Cell, Color, Field, FieldMove};

/// Plays random legal moves from the starting position, handling forced
/// passes, and stops after `steps` applied moves or at game over.
fn random_playout<F: Field>(mut field: F, rng: &mut Xoshiro256PlusPlus, steps: usize) -> F {
    let mut color = Color::One;
    for _ in 0..steps {
        let mut moves = field.possible_moves(color);
        if moves.is_empty() {
            color = color.other();
            moves = field.possible_moves(color);
            if moves.is_empty() {
                break;
            }
        }
        let mv = moves[rng.gen_range(0..moves.len())].clone();
        field = field.apply(&mv);
        if field.game_over() {
            break;
        }
        color = color.other();
    }
    field
}

fn cell_of(color: Color) -> Cell {
    match color {
        Color::One => Cell::Color1,
        Color::Two => Cell::Color2,
    }
}

/// Reference four-in-a-row check: scans every length-4 window on the
/// visible board in all four directions.
fn naive_connect4_won(field: &ConnectFourField, color: Color) -> bool {
    let want = cell_of(color);
    let dirs = [(1i64, 0i64), (0, 1), (1, 1), (1, -1)];
    for y in 0..6i64 {
        for x in 0..7i64 {
            for (dx, dy) in dirs {
                let end_x = x + 3 * dx;
                let end_y = y + 3 * dy;
                if !(0..7).contains(&end_x) || !(0..6).contains(&end_y) {
                    continue;
                }
                if (0..4).all(|i| {
                    field.cell((x + i * dx) as usize, (y + i * dy) as usize) == want
                }) {
                    return true;
                }
            }
        }
    }
    false
}

#[test]
fn test_connect4_win_detection_matches_window_scan() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5eed);
    for round in 0..10_000 {
        let steps = rng.gen_range(0..=42);
        let field = random_playout(ConnectFourField::new(), &mut rng, steps);
        for color in [Color::One, Color::Two] {
            assert_eq!(
                field.has_won(color),
                naive_connect4_won(&field, color),
                "round {round}: disagreement for {color:?} on\n{field}"
            );
        }
    }
}

#[test]
fn test_never_both_winners_in_any_game() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0xdead);
    for _ in 0..2_000 {
        let field = random_playout(ConnectFourField::new(), &mut rng, 42);
        assert!(!(field.has_won(Color::One) && field.has_won(Color::Two)));
    }
    for _ in 0..2_000 {
        let field = random_playout(TicTacToeField::new(), &mut rng, 9);
        assert!(!(field.has_won(Color::One) && field.has_won(Color::Two)));
    }
    for _ in 0..1_000 {
        let field = random_playout(ReversiField::new(), &mut rng, 60);
        assert!(!(field.has_won(Color::One) && field.has_won(Color::Two)));
    }
}

#[test]
fn test_connect4_moves_always_rest_on_support() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    for _ in 0..2_000 {
        let steps = rng.gen_range(0..=30);
        let field = random_playout(ConnectFourField::new(), &mut rng, steps);
        for mv in field.possible_moves(Color::One) {
            assert_eq!(field.cell(mv.x(), mv.y()), Cell::Empty);
            // Either the bottom row or a piece directly below.
            assert!(mv.y() == 5 || field.cell(mv.x(), mv.y() + 1) != Cell::Empty);
        }
    }
}

/// Reference Reversi legality check: a move must flank at least one
/// contiguous run of opponent discs against an own disc.
fn naive_reversi_moves(field: &ReversiField, color: Color) -> Vec<(usize, usize)> {
    let own = cell_of(color);
    let opp = cell_of(color.other());
    let dirs = [
        (1i64, 0i64),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    let mut moves = Vec::new();
    for y in 0..8i64 {
        for x in 0..8i64 {
            if field.cell(x as usize, y as usize) != Cell::Empty {
                continue;
            }
            let legal = dirs.iter().any(|&(dx, dy)| {
                let mut cx = x + dx;
                let mut cy = y + dy;
                let mut seen_opponent = false;
                while (0..8).contains(&cx) && (0..8).contains(&cy) {
                    match field.cell(cx as usize, cy as usize) {
                        c if c == opp => seen_opponent = true,
                        c if c == own => return seen_opponent,
                        _ => return false,
                    }
                    cx += dx;
                    cy += dy;
                }
                false
            });
            if legal {
                moves.push((x as usize, y as usize));
            }
        }
    }
    moves
}

/// Reference application of a Reversi move, flipping every flanked run.
fn naive_reversi_apply(field: &ReversiField, x: usize, y: usize, color: Color) -> Vec<Vec<Cell>> {
    let own = cell_of(color);
    let opp = cell_of(color.other());
    let mut grid: Vec<Vec<Cell>> = (0..8)
        .map(|gy| (0..8).map(|gx| field.cell(gx, gy)).collect())
        .collect();
    grid[y][x] = own;

    let dirs = [
        (1i64, 0i64),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    for (dx, dy) in dirs {
        let mut run = Vec::new();
        let mut cx = x as i64 + dx;
        let mut cy = y as i64 + dy;
        while (0..8).contains(&cx) && (0..8).contains(&cy) {
            match grid[cy as usize][cx as usize] {
                c if c == opp => run.push((cx as usize, cy as usize)),
                c if c == own => {
                    for (fx, fy) in &run {
                        grid[*fy][*fx] = own;
                    }
                    break;
                }
                _ => break,
            }
            cx += dx;
            cy += dy;
        }
    }
    grid
}

#[test]
fn test_reversi_move_generation_matches_directional_scan() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0xf100d);
    for round in 0..500 {
        let steps = rng.gen_range(0..=60);
        let field = random_playout(ReversiField::new(), &mut rng, steps);
        for color in [Color::One, Color::Two] {
            let mut fast: Vec<(usize, usize)> = field
                .possible_moves(color)
                .iter()
                .map(|m| (m.x(), m.y()))
                .collect();
            fast.sort_unstable();
            let mut naive = naive_reversi_moves(&field, color);
            naive.sort_unstable();
            assert_eq!(fast, naive, "round {round}: move sets differ for {color:?}");
        }
    }
}

#[test]
fn test_reversi_flips_match_directional_walk() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0xf11b);
    for _ in 0..300 {
        let steps = rng.gen_range(0..=50);
        let field = random_playout(ReversiField::new(), &mut rng, steps);
        for color in [Color::One, Color::Two] {
            for mv in field.possible_moves(color) {
                let applied = field.apply(&mv);
                let expected = naive_reversi_apply(&field, mv.x(), mv.y(), color);
                for y in 0..8 {
                    for x in 0..8 {
                        assert_eq!(
                            applied.cell(x, y),
                            expected[y][x],
                            "flip mismatch at ({x},{y}) after {:?}",
                            (mv.x(), mv.y())
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_reversi_disc_counts_track_cells() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    for _ in 0..500 {
        let field = random_playout(ReversiField::new(), &mut rng, 60);
        let mut counted = (0u32, 0u32);
        for y in 0..8 {
            for x in 0..8 {
                match field.cell(x, y) {
                    Cell::Color1 => counted.0 += 1,
                    Cell::Color2 => counted.1 += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(field.disc_count(Color::One), counted.0);
        assert_eq!(field.disc_count(Color::Two), counted.1);
    }
}

#[test]
fn test_apply_is_pure_for_all_games() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

    let ttt = random_playout(TicTacToeField::new(), &mut rng, 4);
    for mv in ttt.possible_moves(Color::One) {
        let before = ttt;
        let _ = ttt.apply(&mv);
        assert_eq!(ttt, before);
    }

    let c4 = random_playout(ConnectFourField::new(), &mut rng, 10);
    for mv in c4.possible_moves(Color::Two) {
        let before = c4;
        let _ = c4.apply(&mv);
        assert_eq!(c4, before);
    }

    let rv = random_playout(ReversiField::new(), &mut rng, 10);
    for mv in rv.possible_moves(Color::One) {
        let before = rv;
        let _ = rv.apply(&mv);
        assert_eq!(rv, before);
    }
}

#[test]
fn test_winning_moves_cover_a_win() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0xabc);
    let mut wins_seen = 0;
    for _ in 0..2_000 {
        let field = random_playout(ConnectFourField::new(), &mut rng, 42);
        for color in [Color::One, Color::Two] {
            if !field.has_won(color) {
                continue;
            }
            wins_seen += 1;
            let winning = field.winning_moves();
            assert!(winning.len() >= 4);
            for mv in &winning {
                assert_eq!(mv.color(), color);
                assert_eq!(field.cell(mv.x(), mv.y()), cell_of(color));
            }
        }
    }
    assert!(wins_seen > 100, "playouts produced too few finished games");
}

#[test]
fn test_search_returns_legal_moves_from_random_positions() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
    let deadline = Instant::now() + Duration::from_secs(30);
    for _ in 0..50 {
        let steps = rng.gen_range(0..=6);
        let field = random_playout(TicTacToeField::new(), &mut rng, steps);
        if field.game_over() {
            continue;
        }
        for color in [Color::One, Color::Two] {
            let possible = field.possible_moves(color);
            let found = AlphaBeta::new(9, deadline)
                .search(color, &field)
                .expect("deadline is far away");
            match found {
                Some(mv) => assert!(possible.contains(&mv)),
                None => assert!(possible.is_empty()),
            }
        }
    }
}

#[test]
fn test_search_prefers_faster_wins() {
    // A position with an immediate win and a slower one: take the fast one.
    // X X .        X to move, (2,0) wins now.
    // O O .
    // . . .
    let field = TicTacToeField::from_bits(0b000_000_011, 0b000_011_000);
    let deadline = Instant::now() + Duration::from_secs(10);
    let mv = AlphaBeta::new(9, deadline)
        .search(Color::One, &field)
        .expect("deadline is far away")
        .expect("moves exist");
    assert_eq!((mv.x(), mv.y()), (2, 0));
}
